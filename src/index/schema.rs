//! Index Schema Definition
//!
//! Static description of an index: its name, the storage representation the
//! backend indexes, the key prefix documents live under, and the ordered list of
//! fields with their kind and sortability.
//!
//! Descriptors are assembled with a small builder and are never mutated after
//! they are handed to the `IndexManager`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Name of the tracks index served by this service.
pub const TRACKS_INDEX: &str = "idx:Tracks";
/// Key prefix of the hash documents covered by the tracks index.
pub const TRACKS_PREFIX: &str = "track:";

/// Value kind of an indexed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Text,
}

impl FieldKind {
    /// Keyword used for this kind in a schema declaration.
    pub fn keyword(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "NUMERIC",
            FieldKind::Text => "TEXT",
        }
    }
}

/// How documents are stored in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    Hash,
}

impl StorageKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StorageKind::Hash => "HASH",
        }
    }
}

/// A single field declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
    pub sortable: bool,
}

/// Errors found when checking a descriptor or resolving fields against it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("index name must not be empty")]
    EmptyName,
    #[error("index '{0}' declares no fields")]
    NoFields(String),
    #[error("index '{0}' has an empty key prefix")]
    EmptyPrefix(String),
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),
    #[error("field '{0}' is not part of the schema")]
    UnknownField(String),
    #[error("field '{field}' must be {expected:?} to be used as a filter")]
    WrongKind { field: String, expected: FieldKind },
}

/// Full description of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub storage: StorageKind,
    pub key_prefix: String,
    pub fields: Vec<FieldSchema>,
}

impl IndexDescriptor {
    /// Starts a hash-backed descriptor with no fields.
    pub fn new(name: impl Into<String>, key_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage: StorageKind::Hash,
            key_prefix: key_prefix.into(),
            fields: Vec::new(),
        }
    }

    fn field(mut self, name: &str, kind: FieldKind, sortable: bool) -> Self {
        self.fields.push(FieldSchema {
            name: name.to_string(),
            kind,
            sortable,
        });
        self
    }

    pub fn numeric(self, name: &str) -> Self {
        self.field(name, FieldKind::Numeric, false)
    }

    pub fn numeric_sortable(self, name: &str) -> Self {
        self.field(name, FieldKind::Numeric, true)
    }

    pub fn text(self, name: &str) -> Self {
        self.field(name, FieldKind::Text, false)
    }

    pub fn text_sortable(self, name: &str) -> Self {
        self.field(name, FieldKind::Text, true)
    }

    /// Looks up a field declaration by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Checks the structural invariants the backend relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.name.clone()));
        }
        if self.key_prefix.is_empty() {
            return Err(SchemaError::EmptyPrefix(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ON {} PREFIX {} ({} fields)",
            self.name,
            self.storage.keyword(),
            self.key_prefix,
            self.fields.len()
        )
    }
}

/// The `idx:Tracks` index over `track:*` hashes.
pub fn tracks_index() -> IndexDescriptor {
    IndexDescriptor::new(TRACKS_INDEX, TRACKS_PREFIX)
        .numeric("TrackId")
        .text_sortable("Name")
        .numeric("AlbumId")
        .text_sortable("Composer")
        .numeric("GenreId")
        .numeric("MediaType")
}
