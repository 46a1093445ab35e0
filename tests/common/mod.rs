//! Shared fixtures for the integration tests
#![allow(dead_code, clippy::expect_used)]

use std::sync::Arc;

use document_protocol::core::document::{Document, DocumentId, FieldValue};
use document_protocol::core::repo::{DocumentTypeRepo, StaticDocumentTypeRepo};
use document_protocol::protocol::routable::{
    BucketId, CreateVisitorMessage, CreateVisitorReply, DestroyVisitorMessage, DocumentReply,
    GetDocumentMessage, GetDocumentReply, PutDocumentMessage, PutDocumentReply,
    RemoveDocumentMessage, RemoveDocumentReply, Routable, VisitorStatistics,
};
use document_protocol::RoutableRegistry;

pub const REPO_TOML: &str = r#"
[[document_type]]
name = "music"
fields = [
    { name = "title", kind = "string" },
    { name = "year", kind = "int" },
    { name = "plays", kind = "long" },
    { name = "explicit", kind = "bool" },
    { name = "cover", kind = "raw" },
]

[[document_type]]
name = "book"
fields = [{ name = "isbn", kind = "string" }]
"#;

pub fn repo() -> Arc<dyn DocumentTypeRepo> {
    Arc::new(StaticDocumentTypeRepo::from_toml(REPO_TOML).expect("fixture repo should parse"))
}

pub fn registry() -> RoutableRegistry {
    RoutableRegistry::standard(repo()).expect("standard registry should build")
}

pub fn music_id(specific: &str) -> DocumentId {
    DocumentId::parse(&format!("id:test:music::{specific}")).expect("fixture id should parse")
}

pub fn song(specific: &str) -> Document {
    Document::new(music_id(specific))
        .with_field("title", FieldValue::String(format!("Song {specific}")))
        .with_field("year", FieldValue::Int(1969))
        .with_field("plays", FieldValue::Long(i64::MAX))
        .with_field("explicit", FieldValue::Bool(false))
        .with_field("cover", FieldValue::Raw(vec![0x89, 0x50, 0x4E, 0x47]))
}

pub fn create_visitor() -> CreateVisitorMessage {
    let mut msg = CreateVisitorMessage::new("DumpVisitor", "visitor-7", "ctrl/0", "data/0");
    msg.document_selection = "music.year < 1970".into();
    msg.buckets = vec![BucketId(0x4000_0000_0000_00AB), BucketId(0x4000_0000_0000_00CD)];
    msg.from_timestamp = 100;
    msg.to_timestamp = 200;
    msg.visit_inconsistent_buckets = true;
    msg.parameters.insert("priority".into(), b"high".to_vec());
    msg.parameters.insert("chunk".into(), vec![]);
    msg
}

/// One instance of every routable generation 50 can carry
pub fn v50_routables() -> Vec<Routable> {
    vec![
        create_visitor().into(),
        DestroyVisitorMessage {
            instance_id: "visitor-7".into(),
        }
        .into(),
        GetDocumentMessage::new(music_id("a")).into(),
        PutDocumentMessage {
            document: song("a"),
            timestamp: 1_700_000_000,
            condition: "music.plays > 0".into(),
        }
        .into(),
        RemoveDocumentMessage {
            document_id: music_id("b"),
            condition: String::new(),
        }
        .into(),
        CreateVisitorReply {
            last_bucket: BucketId(0x4000_0000_0000_00CD),
            statistics: VisitorStatistics {
                buckets_visited: 2,
                documents_visited: 40,
                bytes_visited: 4096,
                documents_returned: 39,
                bytes_returned: 4000,
            },
        }
        .into(),
        DocumentReply::DestroyVisitor.into(),
        GetDocumentReply {
            document: Some(song("c")),
            last_modified: 55,
        }
        .into(),
        GetDocumentReply {
            document: None,
            last_modified: 0,
        }
        .into(),
        PutDocumentReply {
            highest_modification_timestamp: 77,
        }
        .into(),
        RemoveDocumentReply {
            was_found: false,
            highest_modification_timestamp: 0,
        }
        .into(),
    ]
}

/// Everything generation 51 can carry
pub fn v51_routables() -> Vec<Routable> {
    let mut all = v50_routables();
    let mut global = create_visitor();
    global.bucket_space = "global".into();
    all.push(global.into());
    all.push(DocumentReply::DocumentIgnored.into());
    all
}
