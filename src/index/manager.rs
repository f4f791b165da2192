use super::schema::{IndexDescriptor, SchemaError};
use crate::backend::{BackendError, SearchBackend};

use dashmap::DashSet;
use std::sync::Arc;

/// What `ensure` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The backend created the index on this call.
    Created,
    /// The backend already had the index.
    AlreadyExists,
    /// This process had already provisioned the index; the backend was not asked.
    Cached,
}

/// Provisioning failure. Always fatal for the serving process.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("invalid index schema: {0}")]
    InvalidSchema(#[from] SchemaError),
    #[error("failed to provision index '{index}': {source}")]
    Provisioning {
        index: String,
        #[source]
        source: BackendError,
    },
}

/// Makes sure indexes exist before they are queried.
///
/// `ensure` is idempotent: an index that already exists counts as success, so
/// any number of concurrent first requests may race to create it.
pub struct IndexManager {
    backend: Arc<dyn SearchBackend>,
    provisioned: DashSet<String>,
}

impl IndexManager {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            provisioned: DashSet::new(),
        }
    }

    /// Asks the backend to create the index described by `descriptor`.
    pub async fn ensure(&self, descriptor: &IndexDescriptor) -> Result<EnsureOutcome, IndexError> {
        if let Err(e) = descriptor.validate() {
            tracing::error!("Refusing to create index {}: {}", descriptor.name, e);
            return Err(e.into());
        }

        match self.backend.create_index(descriptor).await {
            Ok(()) => {
                tracing::info!("Created index {}", descriptor);
                self.provisioned.insert(descriptor.name.clone());
                Ok(EnsureOutcome::Created)
            }
            Err(BackendError::IndexAlreadyExists) => {
                tracing::debug!("Index {} already exists", descriptor.name);
                self.provisioned.insert(descriptor.name.clone());
                Ok(EnsureOutcome::AlreadyExists)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to create index {} on {} backend, is the search module available? {}",
                    descriptor.name,
                    self.backend.name(),
                    e
                );
                Err(IndexError::Provisioning {
                    index: descriptor.name.clone(),
                    source: e,
                })
            }
        }
    }

    /// Like `ensure`, but skips the backend once this process has seen the
    /// index provisioned.
    pub async fn ensure_ready(
        &self,
        descriptor: &IndexDescriptor,
    ) -> Result<EnsureOutcome, IndexError> {
        if self.provisioned.contains(&descriptor.name) {
            return Ok(EnsureOutcome::Cached);
        }
        self.ensure(descriptor).await
    }

    pub fn is_provisioned(&self, index: &str) -> bool {
        self.provisioned.contains(index)
    }
}
