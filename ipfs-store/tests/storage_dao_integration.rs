//! Integration tests for the storage DAO.
//!
//! These run the DAO against the in-memory backend, covering the
//! store/fetch round trip and the pin → unpin → GC lifecycle.

use std::sync::Arc;

use ipfs_store::{
    init_dao_from_str, ContentId, DaoError, MemoryStorageBackend, StorageDao, StorageOperation,
};
use proptest::prelude::*;

const HELLO_CONTENT: &[u8] = b"{\"hello\": \"world\"}";

fn memory_dao() -> StorageDao<MemoryStorageBackend> {
    StorageDao::new(MemoryStorageBackend::new())
}

#[tokio::test]
async fn test_round_trip() {
    let dao = memory_dao();

    let id = dao.create_content(HELLO_CONTENT).await.unwrap();
    let content = dao.get_content(id.as_str()).await.unwrap();

    assert_eq!(content, HELLO_CONTENT);
}

#[tokio::test]
async fn test_identifier_is_deterministic() {
    let dao = memory_dao();

    let first = dao.create_content(HELLO_CONTENT).await.unwrap();
    let second = dao.create_content(HELLO_CONTENT).await.unwrap();
    let other = dao.create_content(b"{\"hello\": \"moon\"}").await.unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[tokio::test]
async fn test_get_unknown_content() {
    let dao = memory_dao();
    let id = ContentId::from_cid(MemoryStorageBackend::cid_for(b"never stored"));

    let err = dao.get_content(id.as_str()).await.unwrap_err();

    assert!(matches!(
        err,
        DaoError::StorageOperationFailed {
            operation: StorageOperation::Get,
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_content_is_not_stored() {
    let dao = memory_dao();

    let err = dao.create_content(b"").await.unwrap_err();

    assert!(matches!(err, DaoError::InvalidArgument(_)));
    assert!(dao.backend().is_empty().unwrap());
}

#[tokio::test]
async fn test_pin_unpin_gc_lifecycle() {
    let dao = memory_dao();
    let id = dao.create_content(HELLO_CONTENT).await.unwrap();

    dao.pin(id.as_str()).await.unwrap();
    assert!(dao.backend().is_pinned(&id).unwrap());

    // pinned content survives collection
    assert_eq!(dao.backend().gc().unwrap(), 0);
    assert_eq!(dao.get_content(id.as_str()).await.unwrap(), HELLO_CONTENT);

    dao.unpin(id.as_str()).await.unwrap();
    assert!(!dao.backend().is_pinned(&id).unwrap());

    // unpinning alone does not delete
    assert_eq!(dao.get_content(id.as_str()).await.unwrap(), HELLO_CONTENT);

    assert_eq!(dao.backend().gc().unwrap(), 1);
    let err = dao.get_content(id.as_str()).await.unwrap_err();
    assert!(matches!(err, DaoError::StorageOperationFailed { .. }));
}

#[tokio::test]
async fn test_unpin_without_pin() {
    let dao = memory_dao();
    let id = dao.create_content(HELLO_CONTENT).await.unwrap();

    let err = dao.unpin(id.as_str()).await.unwrap_err();

    assert!(matches!(
        err,
        DaoError::StorageOperationFailed {
            operation: StorageOperation::Unpin,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_identifiers_reject_all_operations() {
    let dao = memory_dao();

    for id in ["", "not-a-content-id"] {
        assert!(matches!(
            dao.get_content(id).await,
            Err(DaoError::InvalidArgument(_))
        ));
        assert!(matches!(dao.pin(id).await, Err(DaoError::InvalidArgument(_))));
        assert!(matches!(
            dao.unpin(id).await,
            Err(DaoError::InvalidArgument(_))
        ));
    }
}

#[tokio::test]
async fn test_concurrent_callers() {
    let dao = Arc::new(memory_dao());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let dao = Arc::clone(&dao);
            tokio::spawn(async move {
                let payload = format!("payload-{i}").into_bytes();
                let id = dao.create_content(&payload).await.unwrap();
                let fetched = dao.get_content(id.as_str()).await.unwrap();
                assert_eq!(fetched, payload);
                id
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(dao.backend().len().unwrap(), 16);
}

#[tokio::test]
async fn test_dao_from_config() {
    let dao = init_dao_from_str("backend = \"memory\"\n").unwrap();

    let id = dao.create_content(HELLO_CONTENT).await.unwrap();
    assert_eq!(dao.get_content(id.as_str()).await.unwrap(), HELLO_CONTENT);
}

proptest! {
    #[test]
    fn prop_round_trip(content in proptest::collection::vec(any::<u8>(), 1..4096)) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let dao = memory_dao();

        let fetched = rt.block_on(async {
            let id = dao.create_content(&content).await.unwrap();
            dao.get_content(id.as_str()).await.unwrap()
        });

        prop_assert_eq!(fetched, content);
    }
}
