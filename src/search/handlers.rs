use super::engine::SearchService;
use super::error::{InvalidFilterError, PipelineError};
use super::types::{SearchParams, SearchReply};

use axum::extract::Query;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Channel used by request handlers to tell the server it must stop.
#[derive(Clone)]
pub struct FatalSignal {
    tx: mpsc::Sender<String>,
}

impl FatalSignal {
    pub fn new() -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx }, rx)
    }

    pub fn raise(&self, reason: String) {
        // A full channel means shutdown is already underway.
        if self.tx.try_send(reason).is_err() {
            tracing::debug!("Fatal signal already raised");
        }
    }
}

pub fn router(service: Arc<SearchService>, fatal: FatalSignal) -> Router {
    Router::new()
        .route("/search", get(handle_search))
        .route("/health", get(handle_health))
        .layer(Extension(service))
        .layer(Extension(fatal))
}

pub async fn handle_search(
    query: Result<Query<SearchParams>, QueryRejection>,
    Extension(service): Extension<Arc<SearchService>>,
    Extension(fatal): Extension<FatalSignal>,
) -> (StatusCode, Json<SearchReply>) {
    let request_id = uuid::Uuid::new_v4();
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            let err = InvalidFilterError::Malformed(rejection.body_text());
            tracing::warn!(%request_id, "Rejected search request: {}", err);
            return (StatusCode::BAD_REQUEST, Json(SearchReply::error()));
        }
    };
    let span = tracing::info_span!("search", %request_id, genre_id = ?params.genre_id);

    async move {
        match service.handle_filter_request(&params).await {
            Ok(results) => {
                tracing::info!(
                    "Returning {} of {} matching tracks",
                    results.documents.len(),
                    results.total
                );
                (StatusCode::OK, Json(SearchReply::Results(results)))
            }
            Err(err) => {
                let status = match &err {
                    PipelineError::Fatal(_) => {
                        tracing::error!("Search index unavailable, stopping service: {}", err);
                        fatal.raise(err.to_string());
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                    PipelineError::InvalidFilter(_) => {
                        tracing::warn!("Rejected search request: {}", err);
                        StatusCode::BAD_REQUEST
                    }
                    PipelineError::Query(_) => {
                        tracing::warn!("Search request failed: {}", err);
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, Json(SearchReply::error()))
            }
        }
    }
    .instrument(span)
    .await
}

pub async fn handle_health() -> &'static str {
    "ok"
}
