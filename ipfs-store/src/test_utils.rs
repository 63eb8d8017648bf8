//! Test utilities and mock implementations for unit testing.
//!
//! `MockStorageBackend` stands in for a real store so the DAO can be tested
//! for call counts and error translation without any infrastructure.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application_service::storage_dao::StorageOperation;
use crate::domain::ContentId;
use crate::port::{BackendError, BackendResult, StorageBackend};

// ============================================================================
// MockStorageBackend
// ============================================================================

/// Scripted backend that records every call it receives.
#[derive(Default)]
pub struct MockStorageBackend {
    hashes: Vec<String>,
    content: Vec<u8>,
    fail: bool,
    add_calls: AtomicUsize,
    cat_calls: AtomicUsize,
    pin_add_calls: AtomicUsize,
    pin_rm_calls: AtomicUsize,
    last_added: Mutex<Option<Vec<u8>>>,
    last_requested: Mutex<Option<ContentId>>,
}

impl MockStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifiers returned by `add`.
    pub fn with_hashes(self, hashes: &[&str]) -> Self {
        Self {
            hashes: hashes.iter().map(|h| h.to_string()).collect(),
            ..self
        }
    }

    /// Bytes returned by `cat`.
    pub fn with_content(self, content: &[u8]) -> Self {
        Self {
            content: content.to_vec(),
            ..self
        }
    }

    /// Every call fails with an IO error.
    pub fn failing(self) -> Self {
        Self { fail: true, ..self }
    }

    pub fn calls(&self, operation: StorageOperation) -> usize {
        let counter = match operation {
            StorageOperation::Add => &self.add_calls,
            StorageOperation::Get => &self.cat_calls,
            StorageOperation::Pin => &self.pin_add_calls,
            StorageOperation::Unpin => &self.pin_rm_calls,
        };
        counter.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        [
            StorageOperation::Add,
            StorageOperation::Get,
            StorageOperation::Pin,
            StorageOperation::Unpin,
        ]
        .into_iter()
        .map(|op| self.calls(op))
        .sum()
    }

    pub async fn last_added(&self) -> Option<Vec<u8>> {
        self.last_added.lock().await.clone()
    }

    pub async fn last_requested(&self) -> Option<ContentId> {
        self.last_requested.lock().await.clone()
    }

    fn io_failure(&self) -> BackendResult<()> {
        if self.fail {
            Err(BackendError::Io(std::io::Error::other("")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StorageBackend for MockStorageBackend {
    async fn add(&self, content: Vec<u8>) -> BackendResult<Vec<String>> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_added.lock().await = Some(content);
        self.io_failure()?;
        Ok(self.hashes.clone())
    }

    async fn cat(&self, id: &ContentId) -> BackendResult<Vec<u8>> {
        self.cat_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_requested.lock().await = Some(id.clone());
        self.io_failure()?;
        Ok(self.content.clone())
    }

    async fn pin_add(&self, id: &ContentId) -> BackendResult<()> {
        self.pin_add_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_requested.lock().await = Some(id.clone());
        self.io_failure()
    }

    async fn pin_rm(&self, id: &ContentId) -> BackendResult<()> {
        self.pin_rm_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_requested.lock().await = Some(id.clone());
        self.io_failure()
    }
}
