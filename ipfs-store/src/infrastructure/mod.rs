pub mod config;
#[cfg(feature = "ipfs-http")]
pub mod ipfs_http_backend;
pub mod memory_backend;

pub use config::{BackendKind, ConfigError, IpfsConfig, StoreConfig};
#[cfg(feature = "ipfs-http")]
pub use ipfs_http_backend::IpfsHttpBackend;
pub use memory_backend::MemoryStorageBackend;

use std::sync::Arc;

use crate::port::StorageBackend;

/// Build the backend selected by `config`.
pub fn backend_from_config(config: &StoreConfig) -> Result<Arc<dyn StorageBackend>, ConfigError> {
    match config.backend {
        BackendKind::Memory => Ok(Arc::new(MemoryStorageBackend::new())),
        #[cfg(feature = "ipfs-http")]
        BackendKind::Ipfs => {
            let backend = IpfsHttpBackend::new(&config.ipfs)
                .map_err(|e| ConfigError::Unsupported(e.to_string()))?;
            Ok(Arc::new(backend))
        }
        #[cfg(not(feature = "ipfs-http"))]
        BackendKind::Ipfs => Err(ConfigError::Unsupported(
            "the ipfs backend requires enabling the `ipfs-http` feature".into(),
        )),
    }
}
