//! Local file-based dataset store constructors

use crate::backend::LocalJsonStore;
use crate::config::PersistenceConfig;
use crate::error::Result;

/// Create a new local store with default configuration
pub fn create_local_store(data_file: impl Into<std::path::PathBuf>) -> Result<LocalJsonStore> {
    LocalJsonStore::with_default_config(data_file)
}

/// Create a new local store with custom configuration
pub fn create_local_store_with_config(config: PersistenceConfig) -> Result<LocalJsonStore> {
    LocalJsonStore::new(config)
}
