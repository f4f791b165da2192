//! Search Data Types
//!
//! Query specifications handed to the backend, the documents it returns, and the
//! DTOs exchanged with HTTP callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Offset used when the caller does not ask for one.
pub const DEFAULT_OFFSET: usize = 1;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 10;
/// Largest page a caller may request.
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Accepts `asc` / `desc` in any case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Offset/limit window over the matched documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    /// Builds a window, clamping `limit` into `1..=MAX_LIMIT`.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// A fully resolved single-field range query.
///
/// Built per request and consumed once by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    pub field: String,
    pub range_low: i64,
    pub range_high: i64,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub offset: usize,
    pub limit: usize,
}

impl QuerySpec {
    /// Renders the inclusive numeric range in query syntax, e.g. `@GenreId:[3 3]`.
    pub fn query_string(&self) -> String {
        format!("@{}:[{} {}]", self.field, self.range_low, self.range_high)
    }
}

/// A matched document: its key and its stored fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(rename = "value")]
    pub fields: BTreeMap<String, String>,
}

/// One page of matches.
///
/// `total` counts every match in the index; `documents` holds only the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub total: usize,
    pub documents: Vec<Document>,
}

/// Raw query parameters of `GET /search`.
///
/// Kept as strings so that malformed values surface as `InvalidFilterError`
/// rather than as an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "genreId")]
    pub genre_id: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub direction: Option<String>,
}

/// Body returned when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: bool,
}

/// Body of every `GET /search` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchReply {
    Results(ResultSet),
    Error(ErrorReply),
}

impl SearchReply {
    pub fn error() -> Self {
        SearchReply::Error(ErrorReply { error: true })
    }
}
