//! Routable definitions
//!
//! The operations exchanged between nodes: request-like messages and
//! response-like replies. Each concrete variant has exactly one wire type
//! code that stays the same across generations.

use std::collections::BTreeMap;

use crate::core::document::{Document, DocumentId};

/// Name of the bucket space every operation belongs to unless told otherwise
pub const DEFAULT_BUCKET_SPACE: &str = "default";

/// Field set fetching every field of a document
pub const ALL_FIELDS: &str = "[all]";

/// Wire type codes
pub mod type_code {
    pub const CREATE_VISITOR: i32 = 100001;
    pub const DESTROY_VISITOR: i32 = 100002;
    pub const GET_DOCUMENT: i32 = 100003;
    pub const PUT_DOCUMENT: i32 = 100004;
    pub const REMOVE_DOCUMENT: i32 = 100005;

    pub const CREATE_VISITOR_REPLY: i32 = 200001;
    pub const DESTROY_VISITOR_REPLY: i32 = 200002;
    pub const GET_DOCUMENT_REPLY: i32 = 200003;
    pub const PUT_DOCUMENT_REPLY: i32 = 200004;
    pub const REMOVE_DOCUMENT_REPLY: i32 = 200005;
    pub const DOCUMENT_IGNORED_REPLY: i32 = 200032;
}

/// Identifier of a storage bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketId(pub u64);

/// Start a visitor over a set of buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVisitorMessage {
    pub library_name: String,
    pub instance_id: String,
    pub control_destination: String,
    pub data_destination: String,
    pub document_selection: String,
    pub max_pending_reply_count: i32,
    pub buckets: Vec<BucketId>,
    pub from_timestamp: u64,
    pub to_timestamp: u64,
    pub visit_removes: bool,
    pub field_set: String,
    pub visit_inconsistent_buckets: bool,
    pub parameters: BTreeMap<String, Vec<u8>>,
    pub max_buckets_per_visitor: i32,
    pub bucket_space: String,
}

impl CreateVisitorMessage {
    pub fn new(
        library_name: impl Into<String>,
        instance_id: impl Into<String>,
        control_destination: impl Into<String>,
        data_destination: impl Into<String>,
    ) -> Self {
        Self {
            library_name: library_name.into(),
            instance_id: instance_id.into(),
            control_destination: control_destination.into(),
            data_destination: data_destination.into(),
            ..Self::default()
        }
    }
}

impl Default for CreateVisitorMessage {
    fn default() -> Self {
        Self {
            library_name: "DumpVisitor".to_string(),
            instance_id: String::new(),
            control_destination: String::new(),
            data_destination: String::new(),
            document_selection: String::new(),
            max_pending_reply_count: 8,
            buckets: Vec::new(),
            from_timestamp: 0,
            to_timestamp: u64::MAX,
            visit_removes: false,
            field_set: ALL_FIELDS.to_string(),
            visit_inconsistent_buckets: false,
            parameters: BTreeMap::new(),
            max_buckets_per_visitor: 1,
            bucket_space: DEFAULT_BUCKET_SPACE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyVisitorMessage {
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDocumentMessage {
    pub document_id: DocumentId,
    pub field_set: String,
}

impl GetDocumentMessage {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            field_set: ALL_FIELDS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutDocumentMessage {
    pub document: Document,
    pub timestamp: u64,
    /// Test-and-set condition; empty means unconditional
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveDocumentMessage {
    pub document_id: DocumentId,
    pub condition: String,
}

/// Request-like routables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMessage {
    CreateVisitor(CreateVisitorMessage),
    DestroyVisitor(DestroyVisitorMessage),
    GetDocument(GetDocumentMessage),
    PutDocument(PutDocumentMessage),
    RemoveDocument(RemoveDocumentMessage),
}

impl DocumentMessage {
    pub fn type_code(&self) -> i32 {
        match self {
            DocumentMessage::CreateVisitor(_) => type_code::CREATE_VISITOR,
            DocumentMessage::DestroyVisitor(_) => type_code::DESTROY_VISITOR,
            DocumentMessage::GetDocument(_) => type_code::GET_DOCUMENT,
            DocumentMessage::PutDocument(_) => type_code::PUT_DOCUMENT,
            DocumentMessage::RemoveDocument(_) => type_code::REMOVE_DOCUMENT,
        }
    }
}

/// Visitor progress reported back to the client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorStatistics {
    pub buckets_visited: i32,
    pub documents_visited: u64,
    pub bytes_visited: u64,
    pub documents_returned: u64,
    pub bytes_returned: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateVisitorReply {
    pub last_bucket: BucketId,
    pub statistics: VisitorStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDocumentReply {
    pub document: Option<Document>,
    pub last_modified: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutDocumentReply {
    pub highest_modification_timestamp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveDocumentReply {
    pub was_found: bool,
    pub highest_modification_timestamp: u64,
}

/// Response-like routables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReply {
    CreateVisitor(CreateVisitorReply),
    DestroyVisitor,
    GetDocument(GetDocumentReply),
    PutDocument(PutDocumentReply),
    RemoveDocument(RemoveDocumentReply),
    /// The operation was deliberately not applied
    DocumentIgnored,
}

impl DocumentReply {
    pub fn type_code(&self) -> i32 {
        match self {
            DocumentReply::CreateVisitor(_) => type_code::CREATE_VISITOR_REPLY,
            DocumentReply::DestroyVisitor => type_code::DESTROY_VISITOR_REPLY,
            DocumentReply::GetDocument(_) => type_code::GET_DOCUMENT_REPLY,
            DocumentReply::PutDocument(_) => type_code::PUT_DOCUMENT_REPLY,
            DocumentReply::RemoveDocument(_) => type_code::REMOVE_DOCUMENT_REPLY,
            DocumentReply::DocumentIgnored => type_code::DOCUMENT_IGNORED_REPLY,
        }
    }
}

/// A unit exchanged over the messaging substrate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routable {
    Message(DocumentMessage),
    Reply(DocumentReply),
}

impl Routable {
    pub fn type_code(&self) -> i32 {
        match self {
            Routable::Message(msg) => msg.type_code(),
            Routable::Reply(reply) => reply.type_code(),
        }
    }

    pub fn is_reply(&self) -> bool {
        matches!(self, Routable::Reply(_))
    }
}

impl From<DocumentMessage> for Routable {
    fn from(msg: DocumentMessage) -> Self {
        Routable::Message(msg)
    }
}

impl From<DocumentReply> for Routable {
    fn from(reply: DocumentReply) -> Self {
        Routable::Reply(reply)
    }
}

macro_rules! impl_into_routable {
    ($($ty:ty => $wrap:ident :: $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Routable {
                fn from(value: $ty) -> Self {
                    $wrap::$variant(value).into()
                }
            }
        )*
    };
}

impl_into_routable! {
    CreateVisitorMessage => DocumentMessage::CreateVisitor,
    DestroyVisitorMessage => DocumentMessage::DestroyVisitor,
    GetDocumentMessage => DocumentMessage::GetDocument,
    PutDocumentMessage => DocumentMessage::PutDocument,
    RemoveDocumentMessage => DocumentMessage::RemoveDocument,
    CreateVisitorReply => DocumentReply::CreateVisitor,
    GetDocumentReply => DocumentReply::GetDocument,
    PutDocumentReply => DocumentReply::PutDocument,
    RemoveDocumentReply => DocumentReply::RemoveDocument,
}
