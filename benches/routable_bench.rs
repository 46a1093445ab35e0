use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use document_protocol::core::document::{Document, DocumentId, FieldKind, FieldValue};
use document_protocol::core::repo::{DocumentType, StaticDocumentTypeRepo};
use document_protocol::protocol::routable::{
    BucketId, CreateVisitorMessage, GetDocumentMessage, PutDocumentMessage, Routable,
};
use document_protocol::{Generation, RoutableRegistry};

fn registry() -> RoutableRegistry {
    let repo = StaticDocumentTypeRepo::new([DocumentType::new("music")
        .with_field("title", FieldKind::String)
        .with_field("body", FieldKind::Raw)
        .with_field("plays", FieldKind::Long)])
    .unwrap();
    RoutableRegistry::standard(Arc::new(repo)).unwrap()
}

fn routables() -> Vec<(&'static str, Routable)> {
    let id = DocumentId::parse("id:bench:music::song-1").unwrap();

    let mut visitor = CreateVisitorMessage::new("DumpVisitor", "bench", "ctrl", "data");
    visitor.buckets = (0..256).map(|b| BucketId(0x4000_0000_0000_0000 | b)).collect();

    let put = PutDocumentMessage {
        document: Document::new(id.clone())
            .with_field("title", FieldValue::String("a".repeat(64)))
            .with_field("body", FieldValue::Raw(vec![7u8; 4096]))
            .with_field("plays", FieldValue::Long(42)),
        timestamp: 1,
        condition: String::new(),
    };

    vec![
        ("get_document", GetDocumentMessage::new(id).into()),
        ("put_document_4k", put.into()),
        ("create_visitor_256_buckets", visitor.into()),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("encode_routable");
    for (name, routable) in routables() {
        group.bench_function(name, |b| {
            b.iter(|| registry.encode_routable(&routable, Generation::V51).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let registry = registry();
    let mut group = c.benchmark_group("decode_routable");
    for (name, routable) in routables() {
        let bytes = registry.encode_routable(&routable, Generation::V51).unwrap();
        group.bench_function(name, |b| {
            b.iter_batched(
                || bytes.clone(),
                |bytes| registry.decode_routable(&bytes, Generation::V51).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
