//! Scripted backend for tests: replays queued replies and records every call.

use super::{BackendError, SearchBackend};
use crate::index::schema::IndexDescriptor;
use crate::search::types::{QuerySpec, ResultSet};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub(crate) struct ScriptedBackend {
    create_replies: Mutex<VecDeque<Result<(), BackendError>>>,
    search_reply: Mutex<Option<Result<ResultSet, BackendError>>>,
    queries: Mutex<Vec<(String, QuerySpec)>>,
    create_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues replies for successive `create_index` calls; `Ok` once exhausted.
    pub(crate) fn with_create_replies(self, replies: Vec<Result<(), BackendError>>) -> Self {
        *self.create_replies.lock().unwrap() = replies.into();
        self
    }

    pub(crate) fn with_search_reply(self, reply: Result<ResultSet, BackendError>) -> Self {
        *self.search_reply.lock().unwrap() = Some(reply);
        self
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn queries(&self) -> Vec<(String, QuerySpec)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn create_index(&self, _descriptor: &IndexDescriptor) -> Result<(), BackendError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.create_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn search(&self, index: &str, spec: &QuerySpec) -> Result<ResultSet, BackendError> {
        self.queries
            .lock()
            .unwrap()
            .push((index.to_string(), spec.clone()));
        self.search_reply
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(ResultSet::default()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
