//! Document identity and the typed document value embedded in put and get
//! operations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProtocolError, Result};

const ID_SCHEME: &str = "id";

/// Identifier of a single document instance.
///
/// Format: `id:<namespace>:<document-type>:<key-value pairs>:<user specific>`.
/// The key-value section may be empty (`id:ns:music::song-1`); the user
/// specific part may itself contain `:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId {
    raw: String,
    // byte offsets of the four separators following the scheme
    namespace_end: usize,
    doc_type_end: usize,
    key_values_end: usize,
}

impl DocumentId {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |why: &str| {
            ProtocolError::MalformedValue(format!("invalid document id '{raw}': {why}"))
        };

        let rest = raw
            .strip_prefix(ID_SCHEME)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(|| invalid("expected scheme 'id:'"))?;
        let base = ID_SCHEME.len() + 1;

        let mut parts = rest.splitn(4, ':');
        let namespace = parts.next().unwrap_or_default();
        let doc_type = parts.next().ok_or_else(|| invalid("missing document type"))?;
        let key_values = parts.next().ok_or_else(|| invalid("missing key-value section"))?;
        let specific = parts
            .next()
            .ok_or_else(|| invalid("missing user specific part"))?;

        if namespace.is_empty() {
            return Err(invalid("empty namespace"));
        }
        if doc_type.is_empty() {
            return Err(invalid("empty document type"));
        }
        if specific.is_empty() {
            return Err(invalid("empty user specific part"));
        }

        let namespace_end = base + namespace.len();
        let doc_type_end = namespace_end + 1 + doc_type.len();
        let key_values_end = doc_type_end + 1 + key_values.len();
        Ok(Self {
            raw: raw.to_owned(),
            namespace_end,
            doc_type_end,
            key_values_end,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn namespace(&self) -> &str {
        &self.raw[ID_SCHEME.len() + 1..self.namespace_end]
    }

    pub fn doc_type(&self) -> &str {
        &self.raw[self.namespace_end + 1..self.doc_type_end]
    }

    /// Raw key-value section, e.g. `n=1234` or `g=group`; empty when absent.
    pub fn key_values(&self) -> &str {
        &self.raw[self.doc_type_end + 1..self.key_values_end]
    }

    pub fn user_specific(&self) -> &str {
        &self.raw[self.key_values_end + 1..]
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DocumentId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Declared kind of a document field; selects the value's wire layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Long,
    Bool,
    String,
    Raw,
}

/// Value of a single document field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Int(i32),
    Long(i64),
    Bool(bool),
    String(String),
    Raw(Vec<u8>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Long(_) => FieldKind::Long,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Raw(_) => FieldKind::Raw,
        }
    }
}

/// A typed document: id, document type name and field values.
///
/// Fields are kept ordered by name so that encoding is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    doc_type: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create an empty document whose type is taken from the id.
    pub fn new(id: DocumentId) -> Self {
        let doc_type = id.doc_type().to_owned();
        Self {
            id,
            doc_type,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
