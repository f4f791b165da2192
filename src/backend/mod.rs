//! Search Backend Module
//!
//! The seam between this service and the engine that actually stores and indexes
//! documents. The service only ever issues two operations against it: create an
//! index from a descriptor, and run a range query with sort and pagination.
//!
//! ## Submodules
//! - **`redis_search`**: RediSearch adapter speaking `FT.CREATE` / `FT.SEARCH`
//!   over a shared, multiplexed connection.
//! - **`memory`**: In-process engine over `DashMap`, used for local runs and tests.

pub mod memory;
pub mod redis_search;

#[cfg(test)]
pub(crate) mod testing;


use crate::index::schema::IndexDescriptor;
use crate::search::types::{QuerySpec, ResultSet};
use async_trait::async_trait;

/// Classified failure reported by a backend.
///
/// Adapters map their native error replies onto these kinds once, so callers
/// match on variants instead of reply wording.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("index already exists")]
    IndexAlreadyExists,
    #[error("no such index: {0}")]
    UnknownIndex(String),
    #[error("backend unreachable: {0}")]
    Connection(String),
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("malformed backend reply: {0}")]
    Protocol(String),
}

/// Operations the search pipeline needs from a backend.
///
/// Implementations are shared between concurrent requests and must allow
/// overlapping calls.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Creates the index. Reports `IndexAlreadyExists` when it is already there.
    async fn create_index(&self, descriptor: &IndexDescriptor) -> Result<(), BackendError>;

    /// Runs a query and returns the matched page, already sorted and paginated.
    async fn search(&self, index: &str, spec: &QuerySpec) -> Result<ResultSet, BackendError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
