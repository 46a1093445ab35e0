//! Concrete routable factories.
//!
//! Keep the factories ordered by the variant they encode; generation tables
//! in [`crate::protocol::standard`] decide which instance answers for which
//! type code.

pub mod bucket_space;
pub mod document;
pub mod visitor;

pub use bucket_space::{BucketSpaceCodec, EXPLICIT_BUCKET_SPACE, IMPLICIT_BUCKET_SPACE};
pub use document::{
    EmptyReplyFactory, GetDocumentMessageFactory, GetDocumentReplyFactory,
    PutDocumentMessageFactory, PutDocumentReplyFactory, RemoveDocumentMessageFactory,
    RemoveDocumentReplyFactory,
};
pub use visitor::{
    CreateVisitorMessageFactory, CreateVisitorReplyFactory, DestroyVisitorMessageFactory,
};
