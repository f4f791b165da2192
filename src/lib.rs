//! Track Search Service Library
//!
//! A small search service over a RediSearch index of music tracks. Callers ask
//! for the tracks of one genre and get back a sorted, paged list with genre
//! codes replaced by genre names.
//!
//! ## Architecture Modules
//! - **`index`**: Index schema declarations and idempotent provisioning. Any
//!   provisioning failure other than "already exists" is fatal.
//! - **`search`**: The request pipeline (build query, execute, enrich) and its
//!   HTTP handlers.
//! - **`backend`**: The `SearchBackend` trait with a RediSearch implementation and
//!   an in-memory one.
//! - **`config`**: Environment and command-line settings for the binary.

pub mod backend;
pub mod config;
pub mod index;
pub mod search;
