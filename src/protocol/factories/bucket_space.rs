//! Bucket space strategies for the create-visitor payload.
//!
//! The bucket space slice is the only part of the create-visitor layout that
//! differs between generations. A generation table picks the strategy when it
//! builds its create-visitor factory; the rest of the encode/decode body is
//! shared.

use crate::core::buffer::{ByteBuffer, GrowableByteBuffer};
use crate::error::{ProtocolError, Result};
use crate::protocol::routable::DEFAULT_BUCKET_SPACE;

pub type EncodeBucketSpaceFn = fn(&str, &mut GrowableByteBuffer) -> Result<()>;
pub type DecodeBucketSpaceFn = fn(&mut ByteBuffer<'_>) -> Result<String>;

/// Pair of functions producing and consuming the encoded bucket space
#[derive(Clone, Copy)]
pub struct BucketSpaceCodec {
    pub encode: EncodeBucketSpaceFn,
    pub decode: DecodeBucketSpaceFn,
}

impl std::fmt::Debug for BucketSpaceCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketSpaceCodec").finish_non_exhaustive()
    }
}

/// Bucket space is implicit: only the default space can be expressed.
pub const IMPLICIT_BUCKET_SPACE: BucketSpaceCodec = BucketSpaceCodec {
    encode: encode_implicit,
    decode: decode_implicit,
};

/// Bucket space is written as a trailing string.
///
/// A payload that ends where the bucket space would start is read as
/// [`DEFAULT_BUCKET_SPACE`], so messages from peers that never wrote the
/// field still decode. The same applies to a newer payload truncated at
/// exactly that offset: it cannot be told apart from a legacy one and
/// decodes with the default space instead of failing. Truncation anywhere
/// else is still a `BufferUnderrun`.
pub const EXPLICIT_BUCKET_SPACE: BucketSpaceCodec = BucketSpaceCodec {
    encode: encode_explicit,
    decode: decode_explicit,
};

fn encode_implicit(bucket_space: &str, _out: &mut GrowableByteBuffer) -> Result<()> {
    if bucket_space != DEFAULT_BUCKET_SPACE {
        return Err(ProtocolError::EncodeFailed(format!(
            "bucket space '{bucket_space}' cannot be expressed before it became a wire field"
        )));
    }
    Ok(())
}

fn decode_implicit(_input: &mut ByteBuffer<'_>) -> Result<String> {
    Ok(DEFAULT_BUCKET_SPACE.to_string())
}

fn encode_explicit(bucket_space: &str, out: &mut GrowableByteBuffer) -> Result<()> {
    out.write_length_prefixed_string(bucket_space)
}

fn decode_explicit(input: &mut ByteBuffer<'_>) -> Result<String> {
    // payload from a peer that predates the field ends right here
    if input.is_exhausted() {
        return Ok(DEFAULT_BUCKET_SPACE.to_string());
    }
    input.read_length_prefixed_string()
}
