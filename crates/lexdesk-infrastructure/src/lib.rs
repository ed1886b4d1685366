pub mod config_service;
pub mod key_value;
pub mod migration;
pub mod paths;
pub mod record_store;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::key_value::{FileKeyValueStorage, MemoryKeyValueStorage};
pub use crate::paths::LexdeskPaths;
pub use crate::record_store::{JsonFileEngine, MemoryEngine, StorageEngine, VersionedStore};
