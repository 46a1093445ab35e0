//! Standard generation tables.
//!
//! Generation 50 binds the full catalogue. Generation 51 is derived from it:
//! create-visitor switches to the explicit bucket space strategy and the
//! document-ignored reply is added. Every other binding is the same factory
//! instance in both tables.

use std::sync::Arc;

use crate::core::repo::DocumentTypeRepo;
use crate::error::Result;
use crate::protocol::factories::{
    CreateVisitorMessageFactory, CreateVisitorReplyFactory, DestroyVisitorMessageFactory,
    EmptyReplyFactory, GetDocumentMessageFactory, GetDocumentReplyFactory,
    PutDocumentMessageFactory, PutDocumentReplyFactory, RemoveDocumentMessageFactory,
    RemoveDocumentReplyFactory, EXPLICIT_BUCKET_SPACE, IMPLICIT_BUCKET_SPACE,
};
use crate::protocol::factory_set::FactorySet;
use crate::protocol::generation::Generation;
use crate::protocol::routable::type_code;

pub fn generation_50(repo: Arc<dyn DocumentTypeRepo>) -> Result<FactorySet> {
    FactorySet::builder(Generation::V50)
        .add(
            type_code::CREATE_VISITOR,
            CreateVisitorMessageFactory::new(IMPLICIT_BUCKET_SPACE),
        )?
        .add(type_code::DESTROY_VISITOR, DestroyVisitorMessageFactory)?
        .add(type_code::GET_DOCUMENT, GetDocumentMessageFactory)?
        .add(
            type_code::PUT_DOCUMENT,
            PutDocumentMessageFactory::new(Arc::clone(&repo)),
        )?
        .add(type_code::REMOVE_DOCUMENT, RemoveDocumentMessageFactory)?
        .add(type_code::CREATE_VISITOR_REPLY, CreateVisitorReplyFactory)?
        .add(
            type_code::DESTROY_VISITOR_REPLY,
            EmptyReplyFactory::destroy_visitor(),
        )?
        .add(type_code::GET_DOCUMENT_REPLY, GetDocumentReplyFactory::new(repo))?
        .add(type_code::PUT_DOCUMENT_REPLY, PutDocumentReplyFactory)?
        .add(type_code::REMOVE_DOCUMENT_REPLY, RemoveDocumentReplyFactory)?
        .build()
}

pub fn generation_51(previous: &FactorySet) -> Result<FactorySet> {
    previous
        .derive(Generation::V51)
        .replace(
            type_code::CREATE_VISITOR,
            CreateVisitorMessageFactory::new(EXPLICIT_BUCKET_SPACE),
        )?
        .add(
            type_code::DOCUMENT_IGNORED_REPLY,
            EmptyReplyFactory::document_ignored(),
        )?
        .build()
}

/// Every standard generation, oldest first
pub fn all_generations(repo: Arc<dyn DocumentTypeRepo>) -> Result<Vec<FactorySet>> {
    let v50 = generation_50(repo)?;
    let v51 = generation_51(&v50)?;
    Ok(vec![v50, v51])
}
