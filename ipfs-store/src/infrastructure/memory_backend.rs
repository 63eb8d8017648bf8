//! In-process content-addressed backend.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use cid::Cid;
use multihash_codetable::{Code, MultihashDigest};

use crate::domain::ContentId;
use crate::port::{BackendError, BackendResult, StorageBackend};

/// Multicodec code for raw binary blocks.
const RAW_CODEC: u64 = 0x55;

/// Keeps blocks in memory, addressed by a CIDv1 over their sha2-256 digest.
///
/// Content is never chunked: one payload is one block. Unpinned blocks stay
/// readable until [`MemoryStorageBackend::gc`] runs.
#[derive(Default)]
pub struct MemoryStorageBackend {
    blocks: RwLock<HashMap<Cid, Vec<u8>>>,
    pins: RwLock<HashSet<Cid>>,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier this backend assigns to `content`.
    pub fn cid_for(content: &[u8]) -> Cid {
        Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(content))
    }

    pub fn contains(&self, id: &ContentId) -> BackendResult<bool> {
        Ok(self.read_blocks()?.contains_key(id.cid()))
    }

    pub fn is_pinned(&self, id: &ContentId) -> BackendResult<bool> {
        Ok(read(&self.pins)?.contains(id.cid()))
    }

    pub fn len(&self) -> BackendResult<usize> {
        Ok(self.read_blocks()?.len())
    }

    pub fn is_empty(&self) -> BackendResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop every unpinned block. Returns how many were removed.
    pub fn gc(&self) -> BackendResult<usize> {
        let pins = read(&self.pins)?;
        let mut blocks = write(&self.blocks)?;
        let before = blocks.len();
        blocks.retain(|cid, _| pins.contains(cid));
        let removed = before - blocks.len();
        tracing::debug!(removed, retained = blocks.len(), "memory backend gc");
        Ok(removed)
    }

    fn read_blocks(&self) -> BackendResult<RwLockReadGuard<'_, HashMap<Cid, Vec<u8>>>> {
        read(&self.blocks)
    }
}

fn read<T>(lock: &RwLock<T>) -> BackendResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| poisoned())
}

fn write<T>(lock: &RwLock<T>) -> BackendResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| poisoned())
}

fn poisoned() -> BackendError {
    BackendError::Io(std::io::Error::other("memory backend lock poisoned"))
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn add(&self, content: Vec<u8>) -> BackendResult<Vec<String>> {
        let cid = Self::cid_for(&content);
        write(&self.blocks)?.insert(cid, content);
        Ok(vec![cid.to_string()])
    }

    async fn cat(&self, id: &ContentId) -> BackendResult<Vec<u8>> {
        self.read_blocks()?
            .get(id.cid())
            .cloned()
            .ok_or_else(|| BackendError::NotFound(id.to_string()))
    }

    async fn pin_add(&self, id: &ContentId) -> BackendResult<()> {
        // pins before blocks, same order as gc
        let mut pins = write(&self.pins)?;
        if !self.read_blocks()?.contains_key(id.cid()) {
            return Err(BackendError::NotFound(id.to_string()));
        }
        pins.insert(*id.cid());
        Ok(())
    }

    async fn pin_rm(&self, id: &ContentId) -> BackendResult<()> {
        if write(&self.pins)?.remove(id.cid()) {
            Ok(())
        } else {
            Err(BackendError::NotPinned(id.to_string()))
        }
    }
}
