use super::{BackendError, SearchBackend};
use crate::index::schema::{FieldKind, IndexDescriptor};
use crate::search::types::{Document, QuerySpec, ResultSet, SortDirection};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

/// In-process search backend.
///
/// Documents are flat string hashes keyed by their full key (`track:42`), the
/// same shape the Redis backend sees. An index covers every document whose key
/// starts with its prefix, including documents inserted after the index exists.
pub struct MemoryBackend {
    indexes: DashMap<String, IndexDescriptor>,
    documents: DashMap<String, BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            indexes: DashMap::new(),
            documents: DashMap::new(),
        }
    }

    /// Stores (or replaces) a hash document.
    pub fn insert_document(&self, key: impl Into<String>, fields: BTreeMap<String, String>) {
        self.documents.insert(key.into(), fields);
    }

    /// Loads documents from a JSON file holding an array of `{id, value}` objects.
    pub fn load_seed(&self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)?;
        let documents: Vec<Document> = serde_json::from_str(&raw)?;
        let count = documents.len();
        for doc in documents {
            self.insert_document(doc.id, doc.fields);
        }
        tracing::info!("Seeded {} documents from {}", count, path.display());
        Ok(count)
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), BackendError> {
        // The entry lock makes check-and-insert atomic under concurrent creates.
        match self.indexes.entry(descriptor.name.clone()) {
            Entry::Occupied(_) => Err(BackendError::IndexAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(descriptor.clone());
                Ok(())
            }
        }
    }

    async fn search(&self, index: &str, spec: &QuerySpec) -> Result<ResultSet, BackendError> {
        let descriptor = self
            .indexes
            .get(index)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackendError::UnknownIndex(index.to_string()))?;

        match descriptor.get_field(&spec.field) {
            Some(field) if field.kind == FieldKind::Numeric => {}
            Some(_) => {
                return Err(BackendError::Rejected(format!(
                    "field '{}' is not numeric",
                    spec.field
                )));
            }
            None => {
                return Err(BackendError::Rejected(format!(
                    "unknown field '{}'",
                    spec.field
                )));
            }
        }
        let sort_kind = descriptor
            .get_field(&spec.sort_field)
            .map(|f| f.kind)
            .ok_or_else(|| {
                BackendError::Rejected(format!("unknown sort field '{}'", spec.sort_field))
            })?;

        let low = spec.range_low as f64;
        let high = spec.range_high as f64;

        let mut matched: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| entry.key().starts_with(&descriptor.key_prefix))
            .filter(|entry| {
                entry
                    .value()
                    .get(&spec.field)
                    .and_then(|v| v.trim().parse::<f64>().ok())
                    .is_some_and(|v| v >= low && v <= high)
            })
            .map(|entry| Document {
                id: entry.key().clone(),
                fields: entry.value().clone(),
            })
            .collect();

        matched.sort_by(|a, b| {
            let ordering = compare_field(
                sort_kind,
                a.fields.get(&spec.sort_field),
                b.fields.get(&spec.sort_field),
            );
            let ordering = match spec.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.id.cmp(&b.id))
        });

        let total = matched.len();
        let documents = matched
            .into_iter()
            .skip(spec.offset)
            .take(spec.limit)
            .collect();

        Ok(ResultSet { total, documents })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

fn compare_field(kind: FieldKind, a: Option<&String>, b: Option<&String>) -> Ordering {
    match kind {
        FieldKind::Numeric => {
            let a = a.and_then(|v| v.trim().parse::<f64>().ok());
            let b = b.and_then(|v| v.trim().parse::<f64>().ok());
            match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            }
        }
        FieldKind::Text => a.cmp(&b),
    }
}
