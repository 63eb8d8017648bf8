//! Storage access layer between the application and the content-addressed store.

use std::fmt;

use crate::domain::{ContentId, ContentIdError};
use crate::port::{BackendError, StorageBackend};

pub type DaoResult<T> = Result<T, DaoError>;

/// Backend operation a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageOperation {
    Add,
    Get,
    Pin,
    Unpin,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOperation::Add => "add",
            StorageOperation::Get => "get",
            StorageOperation::Pin => "pin",
            StorageOperation::Unpin => "unpin",
        };
        f.write_str(name)
    }
}

/// The only two ways a DAO call can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DaoError {
    /// The request was rejected before reaching the backend.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend failed or answered with something unusable.
    #[error("storage operation {operation} failed: {reason}")]
    StorageOperationFailed {
        operation: StorageOperation,
        reason: String,
    },
}

impl From<ContentIdError> for DaoError {
    fn from(err: ContentIdError) -> Self {
        DaoError::InvalidArgument(err.to_string())
    }
}

/// Stateless façade over a [`StorageBackend`].
///
/// Validates requests, delegates each one to a single backend call and
/// translates backend failures. Holds nothing but the backend handle, so it
/// can be shared across tasks behind an `Arc` without locking.
pub struct StorageDao<B> {
    backend: B,
}

impl<B> StorageDao<B>
where
    B: StorageBackend,
{
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Persist `content` and return its canonical identifier.
    ///
    /// The backend may report several nodes for one submission; the first
    /// one addresses the whole payload.
    pub async fn create_content(&self, content: &[u8]) -> DaoResult<ContentId> {
        if content.is_empty() {
            return Err(DaoError::InvalidArgument("content must not be empty".into()));
        }

        tracing::debug!(size = content.len(), "adding content to storage backend");

        let hashes = self
            .backend
            .add(content.to_vec())
            .await
            .map_err(|err| translate(StorageOperation::Add, err))?;

        if hashes.len() > 1 {
            tracing::warn!(
                count = hashes.len(),
                "storage backend returned several identifiers, using the first"
            );
        }

        let first = hashes.into_iter().next().ok_or_else(|| {
            invalid_response(
                StorageOperation::Add,
                "storage backend returned no identifier".into(),
            )
        })?;

        let id = ContentId::parse(&first).map_err(|err| {
            invalid_response(
                StorageOperation::Add,
                format!("storage backend returned an unusable identifier: {err}"),
            )
        })?;

        tracing::info!(content_id = %id, size = content.len(), "content stored");
        Ok(id)
    }

    /// Fetch the exact bytes previously stored under `id`.
    pub async fn get_content(&self, id: &str) -> DaoResult<Vec<u8>> {
        let id = ContentId::parse(id)?;

        tracing::debug!(content_id = %id, "fetching content from storage backend");

        let content = self
            .backend
            .cat(&id)
            .await
            .map_err(|err| translate(StorageOperation::Get, err))?;

        tracing::debug!(content_id = %id, size = content.len(), "content fetched");
        Ok(content)
    }

    /// Ask the backend to retain `id`.
    pub async fn pin(&self, id: &str) -> DaoResult<()> {
        let id = ContentId::parse(id)?;

        tracing::debug!(content_id = %id, "pinning content");

        self.backend
            .pin_add(&id)
            .await
            .map_err(|err| translate(StorageOperation::Pin, err))?;

        tracing::info!(content_id = %id, "content pinned");
        Ok(())
    }

    /// Release the retention hint on `id`. The backend decides when to collect it.
    pub async fn unpin(&self, id: &str) -> DaoResult<()> {
        let id = ContentId::parse(id)?;

        tracing::debug!(content_id = %id, "unpinning content");

        self.backend
            .pin_rm(&id)
            .await
            .map_err(|err| translate(StorageOperation::Unpin, err))?;

        tracing::info!(content_id = %id, "content unpinned");
        Ok(())
    }
}

fn translate(operation: StorageOperation, err: BackendError) -> DaoError {
    tracing::error!(%operation, error = %err, "storage backend call failed");
    DaoError::StorageOperationFailed {
        operation,
        reason: err.to_string(),
    }
}

fn invalid_response(operation: StorageOperation, reason: String) -> DaoError {
    tracing::warn!(%operation, %reason, "storage backend response rejected");
    DaoError::StorageOperationFailed { operation, reason }
}
