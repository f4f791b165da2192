//! Index Lifecycle Module
//!
//! Declares the indexes this service queries and provisions them on the backend.
//!
//! ## Submodules
//! - **`schema`**: Field kinds, index descriptors and the `idx:Tracks` definition.
//! - **`manager`**: Idempotent index creation with fatal escalation of anything
//!   other than "already exists".

pub mod manager;
pub mod schema;
