//! Port layer - Abstract interfaces for infrastructure dependencies
//!
//! The DAO only ever talks to the content-addressed store through these
//! traits, so a network client, an in-memory store or a test double can be
//! swapped in without touching the application layer.

pub mod storage_backend;

pub use storage_backend::{BackendError, BackendResult, StorageBackend};
