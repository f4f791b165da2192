//! Search Service Module
//!
//! Answers "tracks of genre N" requests against the search backend.
//!
//! ## Overview
//! A request flows through four steps, strictly in order:
//! 1. **Provision**: the `IndexManager` makes sure `idx:Tracks` exists.
//! 2. **Build**: the `QueryBuilder` turns the filter value into an inclusive
//!    `[n n]` range query, sorted by `TrackId` and paged.
//! 3. **Run**: the `QueryExecutor` sends it to the backend.
//! 4. **Enrich**: genre codes in the returned documents are replaced by names.
//!
//! ## Submodules
//! - **`engine`**: The pipeline tying the steps together (`SearchService`).
//! - **`query`**: Parameter validation and query construction.
//! - **`executor`**: Backend query execution.
//! - **`enrich`**: Code-to-label mapping.
//! - **`handlers`**: HTTP handlers for the Axum web server.
//! - **`types`**: Query specs, result sets and DTOs.
//! - **`error`**: Per-request and fatal error kinds.

pub mod engine;
pub mod enrich;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod query;
pub mod types;
