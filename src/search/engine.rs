use super::enrich::{LabelTable, enrich};
use super::error::PipelineError;
use super::query::{FilterRequest, GENRE_FIELD, QueryBuilder};
use super::executor::QueryExecutor;
use super::types::{ResultSet, SearchParams};
use crate::backend::SearchBackend;
use crate::index::manager::{EnsureOutcome, IndexError, IndexManager};
use crate::index::schema::{IndexDescriptor, SchemaError, tracks_index};

use std::sync::Arc;

/// The filter-search pipeline: provision, build, run, enrich.
///
/// One instance is shared by all requests. The only state it mutates is the
/// index manager's provisioned set.
pub struct SearchService {
    descriptor: IndexDescriptor,
    index_manager: IndexManager,
    builder: QueryBuilder,
    executor: QueryExecutor,
    labels: LabelTable,
    label_field: String,
}

impl SearchService {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        descriptor: IndexDescriptor,
        builder: QueryBuilder,
        labels: LabelTable,
        label_field: &str,
    ) -> Self {
        Self {
            descriptor,
            index_manager: IndexManager::new(backend.clone()),
            builder,
            executor: QueryExecutor::new(backend),
            labels,
            label_field: label_field.to_string(),
        }
    }

    /// Genre search over `idx:Tracks`, with genre codes replaced by names.
    pub fn tracks(backend: Arc<dyn SearchBackend>) -> Result<Self, SchemaError> {
        let descriptor = tracks_index();
        let builder = QueryBuilder::for_tracks(&descriptor)?;
        Ok(Self::new(
            backend,
            descriptor,
            builder,
            LabelTable::genres(),
            GENRE_FIELD,
        ))
    }

    pub fn descriptor(&self) -> &IndexDescriptor {
        &self.descriptor
    }

    /// Creates the index unconditionally (startup path).
    pub async fn provision(&self) -> Result<EnsureOutcome, IndexError> {
        self.index_manager.ensure(&self.descriptor).await
    }

    /// Runs one filter request end to end.
    ///
    /// Either the whole page comes back enriched, or an error does.
    pub async fn handle_filter_request(
        &self,
        params: &SearchParams,
    ) -> Result<ResultSet, PipelineError> {
        self.index_manager.ensure_ready(&self.descriptor).await?;

        let request = FilterRequest::parse(params)?;
        let spec = self.builder.build_request(&request);
        let mut results = self.executor.run(&self.descriptor, &spec).await?;

        enrich(&mut results, &self.labels, &self.label_field);
        Ok(results)
    }
}
