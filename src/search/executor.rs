use super::error::QueryError;
use super::types::{QuerySpec, ResultSet};
use crate::backend::SearchBackend;
use crate::index::schema::IndexDescriptor;

use std::sync::Arc;

/// Sends built queries to the backend.
///
/// Results come back exactly as the backend ordered and paged them.
pub struct QueryExecutor {
    backend: Arc<dyn SearchBackend>,
}

impl QueryExecutor {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    pub async fn run(
        &self,
        descriptor: &IndexDescriptor,
        spec: &QuerySpec,
    ) -> Result<ResultSet, QueryError> {
        tracing::debug!(
            index = %descriptor.name,
            query = %spec.query_string(),
            sort_field = %spec.sort_field,
            direction = ?spec.sort_direction,
            offset = spec.offset,
            limit = spec.limit,
            backend = self.backend.name(),
            "Running query"
        );

        match self.backend.search(&descriptor.name, spec).await {
            Ok(results) => {
                tracing::debug!(
                    "Query matched {} documents, returning {}",
                    results.total,
                    results.documents.len()
                );
                Ok(results)
            }
            Err(e) => {
                tracing::error!(
                    "Query '{}' on {} failed: {}",
                    spec.query_string(),
                    descriptor.name,
                    e
                );
                Err(QueryError {
                    index: descriptor.name.clone(),
                    source: e,
                })
            }
        }
    }
}
