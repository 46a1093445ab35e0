//! # Document Type Repository
//!
//! Read-only schema catalog consulted while decoding embedded documents.
//!
//! The repository is owned by the surrounding system and shared by reference
//! (`Arc<dyn DocumentTypeRepo>`) with the factories that need it. It must
//! tolerate any number of concurrent readers; the codec never mutates it.
//!
//! ## TOML Format
//! ```toml
//! [[document_type]]
//! name = "music"
//! fields = [
//!     { name = "title", kind = "string" },
//!     { name = "year", kind = "int" },
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::document::FieldKind;
use crate::error::{ProtocolError, Result};

/// Declared field of a document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
}

/// Structural definition of a document type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl DocumentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind,
        });
        self
    }

    /// Declared kind of `field`, if the type has it
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == field).map(|f| f.kind)
    }
}

/// Resolves document type names to their definitions.
pub trait DocumentTypeRepo: Send + Sync {
    fn resolve(&self, type_name: &str) -> Option<Arc<DocumentType>>;
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RepoFile {
    #[serde(default)]
    document_type: Vec<DocumentType>,
}

/// Immutable in-memory repository.
#[derive(Debug, Default, Clone)]
pub struct StaticDocumentTypeRepo {
    types: HashMap<String, Arc<DocumentType>>,
}

impl StaticDocumentTypeRepo {
    pub fn new<I>(types: I) -> Result<Self>
    where
        I: IntoIterator<Item = DocumentType>,
    {
        let mut map = HashMap::new();
        for doc_type in types {
            if doc_type.name.is_empty() {
                return Err(ProtocolError::ConfigError(
                    "Document type name cannot be empty".to_string(),
                ));
            }
            let name = doc_type.name.clone();
            if map.insert(name.clone(), Arc::new(doc_type)).is_some() {
                return Err(ProtocolError::ConfigError(format!(
                    "Document type '{name}' declared twice"
                )));
            }
        }
        debug!(type_count = map.len(), "Document type repo built");
        Ok(Self { types: map })
    }

    /// Load type definitions from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: RepoFile = toml::from_str(content).map_err(|e| {
            ProtocolError::ConfigError(format!("Failed to parse document types: {e}"))
        })?;
        Self::new(file.document_type)
    }

    /// Load type definitions from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProtocolError::ConfigError(format!("Failed to read document types file: {e}"))
        })?;
        Self::from_toml(&content)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl DocumentTypeRepo for StaticDocumentTypeRepo {
    fn resolve(&self, type_name: &str) -> Option<Arc<DocumentType>> {
        self.types.get(type_name).cloned()
    }
}
