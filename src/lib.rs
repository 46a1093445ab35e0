//! # Document Protocol
//!
//! Versioned binary wire codec for document operations.
//!
//! Every routable (message or reply) is framed as a big-endian `i32` type
//! code followed by a payload whose layout belongs to a protocol generation.
//! Each generation has its own type code table; a newer table starts as a
//! copy of the previous one and only swaps the factories whose layout
//! changed, so unchanged types stay byte-compatible across generations.
//!
//! ## Quick Start
//! ```rust
//! use std::sync::Arc;
//! use document_protocol::core::document::DocumentId;
//! use document_protocol::core::repo::{DocumentType, StaticDocumentTypeRepo};
//! use document_protocol::protocol::generation::Generation;
//! use document_protocol::protocol::registry::RoutableRegistry;
//! use document_protocol::protocol::routable::{GetDocumentMessage, Routable};
//!
//! # fn main() -> document_protocol::Result<()> {
//! let repo = StaticDocumentTypeRepo::new([DocumentType::new("music")])?;
//! let registry = RoutableRegistry::standard(Arc::new(repo))?;
//!
//! let msg: Routable = GetDocumentMessage::new(DocumentId::parse("id:ns:music::abc")?).into();
//! let bytes = registry.encode_routable(&msg, Generation::V51)?;
//! assert_eq!(registry.decode_routable(&bytes, Generation::V50)?, msg);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//! - [`core`]: byte buffers, document model, document type repo
//! - [`protocol`]: routables, factories, generation tables, registry
//! - [`config`]: TOML/env configuration
//! - [`utils`]: logging, metrics sink, move operation limiter

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use config::CodecConfig;
pub use error::{ProtocolError, Result};
pub use protocol::generation::Generation;
pub use protocol::registry::RoutableRegistry;
pub use protocol::routable::{DocumentMessage, DocumentReply, Routable};
