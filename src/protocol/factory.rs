//! # Routable Factory Contract
//!
//! A factory is the stateless codec for exactly one routable variant. The
//! registry writes the type code; a factory only ever sees the payload.
//!
//! ## Contract
//! - `encode` appends the payload to the output buffer. It fails only when
//!   the routable violates a payload invariant (or is not the variant the
//!   factory handles). The caller discards whatever was appended on failure.
//! - `decode` consumes exactly the bytes of one payload and returns a fully
//!   built routable. Any read failure aborts the whole call; values decoded
//!   so far are dropped with it.
//!
//! Factories are built once, shared between generation tables through `Arc`,
//! and never mutated afterwards, so they are `Send + Sync` by contract.

use crate::core::buffer::{ByteBuffer, GrowableByteBuffer};
use crate::core::document::{Document, DocumentId, FieldKind, FieldValue};
use crate::core::repo::DocumentTypeRepo;
use crate::error::{ProtocolError, Result};
use crate::protocol::routable::Routable;

/// Codec for one routable variant
pub trait RoutableFactory: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// The one type code this factory reads and writes
    fn type_code(&self) -> i32;

    fn encode(&self, routable: &Routable, out: &mut GrowableByteBuffer) -> Result<()>;

    fn decode(&self, input: &mut ByteBuffer<'_>) -> Result<Routable>;
}

/// Error for a factory handed a routable of the wrong variant
pub(crate) fn wrong_variant(factory: &str, routable: &Routable) -> ProtocolError {
    ProtocolError::EncodeFailed(format!(
        "{factory} cannot encode routable with type code {}",
        routable.type_code()
    ))
}

pub fn encode_document_id(id: &DocumentId, out: &mut GrowableByteBuffer) -> Result<()> {
    out.write_length_prefixed_string(id.as_str())
}

pub fn decode_document_id(input: &mut ByteBuffer<'_>) -> Result<DocumentId> {
    let raw = input.read_length_prefixed_string()?;
    DocumentId::parse(&raw)
}

/// Timestamps are unsigned in memory and carried as `i64` on the wire.
pub fn encode_timestamp(value: u64, out: &mut GrowableByteBuffer) {
    out.write_i64(value as i64);
}

pub fn decode_timestamp(input: &mut ByteBuffer<'_>) -> Result<u64> {
    Ok(input.read_i64()? as u64)
}

/// Encode a document, checking every field against its declared type.
pub fn encode_document(
    document: &Document,
    repo: &dyn DocumentTypeRepo,
    out: &mut GrowableByteBuffer,
) -> Result<()> {
    let doc_type = repo
        .resolve(document.doc_type())
        .ok_or_else(|| ProtocolError::SchemaLookupFailed(document.doc_type().to_string()))?;

    encode_document_id(document.id(), out)?;
    out.write_length_prefixed_string(document.doc_type())?;
    out.write_length(document.field_count())?;

    for (name, value) in document.fields() {
        let kind = doc_type.field_kind(name).ok_or_else(|| {
            ProtocolError::EncodeFailed(format!(
                "field '{name}' is not declared in document type '{}'",
                doc_type.name
            ))
        })?;
        if kind != value.kind() {
            return Err(ProtocolError::EncodeFailed(format!(
                "field '{name}' is declared as {kind:?} but holds {:?}",
                value.kind()
            )));
        }
        out.write_length_prefixed_string(name)?;
        encode_field_value(value, out)?;
    }
    Ok(())
}

fn encode_field_value(value: &FieldValue, out: &mut GrowableByteBuffer) -> Result<()> {
    match value {
        FieldValue::Int(v) => out.write_i32(*v),
        FieldValue::Long(v) => out.write_i64(*v),
        FieldValue::Bool(v) => out.write_bool(*v),
        FieldValue::String(v) => out.write_length_prefixed_string(v)?,
        FieldValue::Raw(v) => out.write_length_prefixed_bytes(v)?,
    }
    Ok(())
}

/// Decode a document, resolving its type through the repo.
pub fn decode_document(input: &mut ByteBuffer<'_>, repo: &dyn DocumentTypeRepo) -> Result<Document> {
    let id = decode_document_id(input)?;
    let type_name = input.read_length_prefixed_string()?;
    let doc_type = repo
        .resolve(&type_name)
        .ok_or_else(|| ProtocolError::SchemaLookupFailed(type_name.clone()))?;

    if id.doc_type() != type_name {
        return Err(ProtocolError::MalformedValue(format!(
            "document id '{id}' does not belong to document type '{type_name}'"
        )));
    }

    let field_count = input.read_length()?;
    let mut document = Document::new(id);
    for _ in 0..field_count {
        let name = input.read_length_prefixed_string()?;
        let kind = doc_type.field_kind(&name).ok_or_else(|| {
            ProtocolError::MalformedValue(format!(
                "field '{name}' is not declared in document type '{type_name}'"
            ))
        })?;
        if document.field(&name).is_some() {
            return Err(ProtocolError::MalformedValue(format!(
                "field '{name}' occurs more than once"
            )));
        }
        let value = decode_field_value(kind, input)?;
        document.set_field(name, value);
    }
    Ok(document)
}

fn decode_field_value(kind: FieldKind, input: &mut ByteBuffer<'_>) -> Result<FieldValue> {
    Ok(match kind {
        FieldKind::Int => FieldValue::Int(input.read_i32()?),
        FieldKind::Long => FieldValue::Long(input.read_i64()?),
        FieldKind::Bool => FieldValue::Bool(input.read_bool()?),
        FieldKind::String => FieldValue::String(input.read_length_prefixed_string()?),
        FieldKind::Raw => FieldValue::Raw(input.read_length_prefixed_bytes()?.to_vec()),
    })
}
