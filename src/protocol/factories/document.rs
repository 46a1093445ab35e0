//! Factories for single-document operations and their replies.

use std::sync::Arc;

use crate::core::buffer::{ByteBuffer, GrowableByteBuffer};
use crate::core::repo::DocumentTypeRepo;
use crate::error::Result;
use crate::protocol::factory::{
    decode_document, decode_document_id, decode_timestamp, encode_document, encode_document_id,
    encode_timestamp, wrong_variant, RoutableFactory,
};
use crate::protocol::routable::{
    type_code, DocumentMessage, DocumentReply, GetDocumentMessage, GetDocumentReply,
    PutDocumentMessage, PutDocumentReply, RemoveDocumentMessage, RemoveDocumentReply, Routable,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct GetDocumentMessageFactory;

impl RoutableFactory for GetDocumentMessageFactory {
    fn name(&self) -> &'static str {
        "GetDocumentMessageFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::GET_DOCUMENT
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Message(DocumentMessage::GetDocument(msg)) => {
                encode_document_id(&msg.document_id, out)?;
                out.write_length_prefixed_string(&msg.field_set)
            }
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let document_id = decode_document_id(input)?;
        let field_set = input.read_length_prefixed_string()?;
        Ok(GetDocumentMessage {
            document_id,
            field_set,
        }
        .into())
    }
}

/// Put codec; needs the type repo to lay out document fields.
#[derive(Clone)]
pub struct PutDocumentMessageFactory {
    repo: Arc<dyn DocumentTypeRepo>,
}

impl PutDocumentMessageFactory {
    pub fn new(repo: Arc<dyn DocumentTypeRepo>) -> Self {
        Self { repo }
    }
}

impl RoutableFactory for PutDocumentMessageFactory {
    fn name(&self) -> &'static str {
        "PutDocumentMessageFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::PUT_DOCUMENT
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        let msg = match routable {
            Routable::Message(DocumentMessage::PutDocument(msg)) => msg,
            other => return Err(wrong_variant(self.name(), other)),
        };
        encode_document(&msg.document, self.repo.as_ref(), out)?;
        encode_timestamp(msg.timestamp, out);
        out.write_length_prefixed_string(&msg.condition)
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let document = decode_document(input, self.repo.as_ref())?;
        let timestamp = decode_timestamp(input)?;
        let condition = input.read_length_prefixed_string()?;
        Ok(PutDocumentMessage {
            document,
            timestamp,
            condition,
        }
        .into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveDocumentMessageFactory;

impl RoutableFactory for RemoveDocumentMessageFactory {
    fn name(&self) -> &'static str {
        "RemoveDocumentMessageFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::REMOVE_DOCUMENT
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Message(DocumentMessage::RemoveDocument(msg)) => {
                encode_document_id(&msg.document_id, out)?;
                out.write_length_prefixed_string(&msg.condition)
            }
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let document_id = decode_document_id(input)?;
        let condition = input.read_length_prefixed_string()?;
        Ok(RemoveDocumentMessage {
            document_id,
            condition,
        }
        .into())
    }
}

/// Get reply codec; the returned document is optional.
#[derive(Clone)]
pub struct GetDocumentReplyFactory {
    repo: Arc<dyn DocumentTypeRepo>,
}

impl GetDocumentReplyFactory {
    pub fn new(repo: Arc<dyn DocumentTypeRepo>) -> Self {
        Self { repo }
    }
}

impl RoutableFactory for GetDocumentReplyFactory {
    fn name(&self) -> &'static str {
        "GetDocumentReplyFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::GET_DOCUMENT_REPLY
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        let reply = match routable {
            Routable::Reply(DocumentReply::GetDocument(reply)) => reply,
            other => return Err(wrong_variant(self.name(), other)),
        };
        out.write_bool(reply.document.is_some());
        if let Some(document) = &reply.document {
            encode_document(document, self.repo.as_ref(), out)?;
        }
        encode_timestamp(reply.last_modified, out);
        Ok(())
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let document = if input.read_bool()? {
            Some(decode_document(input, self.repo.as_ref())?)
        } else {
            None
        };
        let last_modified = decode_timestamp(input)?;
        Ok(GetDocumentReply {
            document,
            last_modified,
        }
        .into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PutDocumentReplyFactory;

impl RoutableFactory for PutDocumentReplyFactory {
    fn name(&self) -> &'static str {
        "PutDocumentReplyFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::PUT_DOCUMENT_REPLY
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Reply(DocumentReply::PutDocument(reply)) => {
                encode_timestamp(reply.highest_modification_timestamp, out);
                Ok(())
            }
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let highest_modification_timestamp = decode_timestamp(input)?;
        Ok(PutDocumentReply {
            highest_modification_timestamp,
        }
        .into())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RemoveDocumentReplyFactory;

impl RoutableFactory for RemoveDocumentReplyFactory {
    fn name(&self) -> &'static str {
        "RemoveDocumentReplyFactory"
    }

    fn type_code(&self) -> i32 {
        type_code::REMOVE_DOCUMENT_REPLY
    }

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()> {
        match routable {
            Routable::Reply(DocumentReply::RemoveDocument(reply)) => {
                out.write_bool(reply.was_found);
                encode_timestamp(reply.highest_modification_timestamp, out);
                Ok(())
            }
            other => Err(wrong_variant(self.name(), other)),
        }
    }

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable> {
        let was_found = input.read_bool()?;
        let highest_modification_timestamp = decode_timestamp(input)?;
        Ok(RemoveDocumentReply {
            was_found,
            highest_modification_timestamp,
        }
        .into())
    }
}

/// Codec for replies whose payload is empty.
#[derive(Debug, Clone, Copy)]
pub struct EmptyReplyFactory {
    name: &'static str,
    reply: fn() -> DocumentReply,
}

impl EmptyReplyFactory {
    pub fn destroy_visitor() -> Self {
        Self {
            name: "DestroyVisitorReplyFactory",
            reply: || DocumentReply::DestroyVisitor,
        }
    }

    pub fn document_ignored() -> Self {
        Self {
            name: "DocumentIgnoredReplyFactory",
            reply: || DocumentReply::DocumentIgnored,
        }
    }
}

impl RoutableFactory for EmptyReplyFactory {
    fn name(&self) -> &'static str {
        self.name
    }

    fn type_code(&self) -> i32 {
        (self.reply)().type_code()
    }

    fn encode(&self, routable: &Routable, _out: &mut GrowableByteBuffer) -> Result<()> {
        if routable.type_code() != self.type_code() {
            return Err(wrong_variant(self.name, routable));
        }
        Ok(())
    }

    fn decode(&self, _input: &mut ByteBuffer<'_>) -> Result<Routable> {
        Ok((self.reply)().into())
    }
}
