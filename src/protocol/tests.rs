// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use crate::core::document::{Document, DocumentId, FieldKind, FieldValue};
use crate::core::repo::{DocumentType, StaticDocumentTypeRepo};
use crate::error::ProtocolError;
use crate::protocol::generation::Generation;
use crate::protocol::registry::RoutableRegistry;
use crate::protocol::routable::{
    type_code, CreateVisitorMessage, DocumentMessage, DocumentReply, GetDocumentMessage,
    GetDocumentReply, PutDocumentMessage, Routable, DEFAULT_BUCKET_SPACE,
};

fn registry() -> RoutableRegistry {
    let repo = StaticDocumentTypeRepo::new([DocumentType::new("type")
        .with_field("title", FieldKind::String)
        .with_field("year", FieldKind::Int)
        .with_field("cover", FieldKind::Raw)])
    .expect("repo should build");
    RoutableRegistry::standard(Arc::new(repo)).expect("standard registry should build")
}

#[test]
fn test_get_document_written_by_51_read_by_50() {
    let registry = registry();
    let id = DocumentId::parse("id:ns:type::abc").unwrap();
    let msg: Routable = GetDocumentMessage::new(id.clone()).into();

    let bytes = registry.encode_routable(&msg, Generation::V51).unwrap();
    let decoded = registry.decode_routable(&bytes, Generation::V50).unwrap();

    match decoded {
        Routable::Message(DocumentMessage::GetDocument(get)) => assert_eq!(get.document_id, id),
        other => panic!("Expected GetDocument message, got {other:?}"),
    }
}

#[test]
fn test_ignored_reply_written_by_51_unknown_to_50() {
    let registry = registry();
    let bytes = registry
        .encode_routable(&DocumentReply::DocumentIgnored.into(), Generation::V51)
        .unwrap();

    match registry.decode_routable(&bytes, Generation::V50) {
        Err(ProtocolError::UnknownTypeCode {
            type_code,
            generation,
        }) => {
            assert_eq!(type_code, type_code::DOCUMENT_IGNORED_REPLY);
            assert_eq!(generation, Generation::V50);
        }
        other => panic!("Expected UnknownTypeCode, got {other:?}"),
    }
}

#[test]
fn test_ignored_reply_cannot_be_encoded_for_50() {
    let err = registry()
        .encode_routable(&DocumentReply::DocumentIgnored.into(), Generation::V50)
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::UnsupportedTypeForVersion {
            type_code: type_code::DOCUMENT_IGNORED_REPLY,
            ..
        }
    ));
}

#[test]
fn test_documents_survive_both_generations() {
    let registry = registry();
    let document = Document::new(DocumentId::parse("id:ns:type:n=7:abc").unwrap())
        .with_field("title", FieldValue::String("Blue Train".into()))
        .with_field("year", FieldValue::Int(1957))
        .with_field("cover", FieldValue::Raw(vec![0xFF, 0x00, 0x7F]));

    let put: Routable = PutDocumentMessage {
        document: document.clone(),
        timestamp: 1_234,
        condition: String::new(),
    }
    .into();
    let reply: Routable = GetDocumentReply {
        document: Some(document),
        last_modified: 1_234,
    }
    .into();

    for writer in [Generation::V50, Generation::V51] {
        for reader in [Generation::V50, Generation::V51] {
            for routable in [&put, &reply] {
                let bytes = registry.encode_routable(routable, writer).unwrap();
                assert_eq!(
                    &registry.decode_routable(&bytes, reader).unwrap(),
                    routable,
                    "written by {writer}, read by {reader}"
                );
            }
        }
    }
}

#[test]
fn test_create_visitor_from_50_gets_default_space_in_51() {
    let registry = registry();
    let msg = CreateVisitorMessage::new("DumpVisitor", "v-1", "ctrl", "data");
    let bytes = registry
        .encode_routable(&msg.clone().into(), Generation::V50)
        .unwrap();

    match registry.decode_routable(&bytes, Generation::V51).unwrap() {
        Routable::Message(DocumentMessage::CreateVisitor(decoded)) => {
            assert_eq!(decoded.bucket_space, DEFAULT_BUCKET_SPACE);
            assert_eq!(decoded, msg);
        }
        other => panic!("Expected CreateVisitor message, got {other:?}"),
    }
}

#[test]
fn test_create_visitor_with_space_is_rejected_by_50() {
    let registry = registry();
    let mut msg = CreateVisitorMessage::new("DumpVisitor", "v-1", "ctrl", "data");
    msg.bucket_space = "global".into();
    let routable: Routable = msg.into();

    assert!(matches!(
        registry.encode_routable(&routable, Generation::V50),
        Err(ProtocolError::EncodeFailed(_))
    ));

    // a 50 reader does not know the trailing bucket space field
    let bytes = registry.encode_routable(&routable, Generation::V51).unwrap();
    assert!(matches!(
        registry.decode_routable(&bytes, Generation::V50),
        Err(ProtocolError::MalformedValue(_))
    ));
    assert_eq!(
        registry.decode_routable(&bytes, Generation::V51).unwrap(),
        routable
    );
}

#[test]
fn test_unknown_type_code_rejected() {
    let registry = registry();
    let mut bytes = 999_999i32.to_be_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    for generation in registry.generations().collect::<Vec<_>>() {
        assert!(matches!(
            registry.decode_routable(&bytes, generation),
            Err(ProtocolError::UnknownTypeCode {
                type_code: 999_999,
                ..
            })
        ));
    }
}

#[test]
fn test_schema_lookup_failure_on_decode() {
    let registry = registry();
    let other_repo =
        StaticDocumentTypeRepo::new([DocumentType::new("music")]).expect("repo should build");
    let other = RoutableRegistry::standard(Arc::new(other_repo)).unwrap();

    let put: Routable = PutDocumentMessage {
        document: Document::new(DocumentId::parse("id:ns:music::x").unwrap()),
        timestamp: 0,
        condition: String::new(),
    }
    .into();
    let bytes = other.encode(&put).unwrap();

    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::SchemaLookupFailed(name)) if name == "music"
    ));
}
