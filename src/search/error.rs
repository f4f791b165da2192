use crate::backend::BackendError;
use crate::index::manager::IndexError;

/// Caller-supplied parameters that cannot be turned into a query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFilterError {
    #[error("missing filter value")]
    Missing,
    #[error("filter value '{0}' is not an integer")]
    NotAnInteger(String),
    #[error("invalid {name} '{value}'")]
    Pagination { name: &'static str, value: String },
    #[error("unknown sort direction '{0}'")]
    Direction(String),
    #[error("malformed query string: {0}")]
    Malformed(String),
}

/// A query that reached the backend and failed there.
#[derive(Debug, Clone, thiserror::Error)]
#[error("query against '{index}' failed: {source}")]
pub struct QueryError {
    pub index: String,
    #[source]
    pub source: BackendError,
}

/// Everything that can stop a filter request.
///
/// Only `Fatal` means the service can no longer do useful work; the other
/// variants fail the single request.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fatal(#[from] IndexError),
    #[error(transparent)]
    InvalidFilter(#[from] InvalidFilterError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl PipelineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, PipelineError::Fatal(_))
    }
}
