//! # Core Codec Components
//!
//! Low-level byte buffers and the document model that routable payloads
//! carry.
//!
//! ## Components
//! - **Buffer**: read cursor and growable write buffer with fixed-width and
//!   length-prefixed primitives
//! - **Document**: document identifiers and typed documents
//! - **Repo**: the document type catalog consulted while decoding documents
//!
//! ## Security
//! - Every read is bounds-checked before the cursor moves
//! - Length prefixes are validated (non-negative, within the remaining bytes)
//!   before any allocation

pub mod buffer;
pub mod document;
pub mod repo;
