//! Storage backend capability consumed by the DAO.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ContentId;

pub type BackendResult<T> = Result<T, BackendError>;

/// Failures raised by a storage backend.
///
/// These never cross the DAO boundary; they are logged and flattened into
/// [`crate::DaoError::StorageOperationFailed`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("content not found: {0}")]
    NotFound(String),

    #[error("content is not pinned: {0}")]
    NotPinned(String),

    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// Abstract interface to a hash-addressed object store.
///
/// Implementations own chunking, multihash encoding, networking and garbage
/// collection. Every method is a single request/response against the store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store a payload and return the identifiers of the nodes created for
    /// it, in the order the store reports them.
    async fn add(&self, content: Vec<u8>) -> BackendResult<Vec<String>>;

    /// Fetch the bytes stored under `id`.
    async fn cat(&self, id: &ContentId) -> BackendResult<Vec<u8>>;

    /// Exempt `id` from garbage collection.
    async fn pin_add(&self, id: &ContentId) -> BackendResult<()>;

    /// Drop the pin on `id`. Does not delete anything by itself.
    async fn pin_rm(&self, id: &ContentId) -> BackendResult<()>;
}

#[async_trait]
impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    async fn add(&self, content: Vec<u8>) -> BackendResult<Vec<String>> {
        (**self).add(content).await
    }

    async fn cat(&self, id: &ContentId) -> BackendResult<Vec<u8>> {
        (**self).cat(id).await
    }

    async fn pin_add(&self, id: &ContentId) -> BackendResult<()> {
        (**self).pin_add(id).await
    }

    async fn pin_rm(&self, id: &ContentId) -> BackendResult<()> {
        (**self).pin_rm(id).await
    }
}
