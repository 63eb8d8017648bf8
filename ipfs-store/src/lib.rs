//! Content-addressed storage access layer.
//!
//! [`StorageDao`] stores byte payloads in an IPFS-style object store and
//! hands back the content identifier that retrieves them, plus pin/unpin
//! hints for the store's garbage collector. The store itself sits behind
//! the [`StorageBackend`] port.
//!
//! ```ignore
//! use ipfs_store::{MemoryStorageBackend, StorageDao};
//!
//! let dao = StorageDao::new(MemoryStorageBackend::new());
//! let id = dao.create_content(b"{\"hello\": \"world\"}").await?;
//! let bytes = dao.get_content(id.as_str()).await?;
//! ```

pub mod application_service;
pub mod domain;
pub mod infrastructure;
pub mod port;

#[cfg(test)]
mod test_utils;

pub use application_service::{DaoError, DaoResult, StorageDao, StorageOperation};
pub use domain::{ContentId, ContentIdError};
pub use infrastructure::{backend_from_config, MemoryStorageBackend, StoreConfig};
#[cfg(feature = "ipfs-http")]
pub use infrastructure::IpfsHttpBackend;
pub use port::{BackendError, BackendResult, StorageBackend};

/// Initialize a DAO from a configuration file
pub fn init_dao_from_file<P: AsRef<std::path::Path>>(
    config_path: P,
) -> Result<StorageDao<std::sync::Arc<dyn StorageBackend>>, infrastructure::ConfigError> {
    let config = StoreConfig::from_file(config_path)?;
    Ok(StorageDao::new(backend_from_config(&config)?))
}

/// Initialize a DAO from a configuration string
pub fn init_dao_from_str(
    config_str: &str,
) -> Result<StorageDao<std::sync::Arc<dyn StorageBackend>>, infrastructure::ConfigError> {
    let config = StoreConfig::from_toml_str(config_str)?;
    Ok(StorageDao::new(backend_from_config(&config)?))
}
