pub mod storage_dao;

pub use storage_dao::{DaoError, DaoResult, StorageDao, StorageOperation};
