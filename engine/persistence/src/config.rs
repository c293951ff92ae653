//! Configuration for the dataset store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Suffix of the scratch file a save writes before renaming it into place
pub const DEFAULT_TEMP_SUFFIX: &str = ".tmp";

/// Configuration for the local dataset store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Dataset file path
    pub data_file: PathBuf,

    /// Appended to `data_file` to name the scratch file
    pub temp_suffix: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { data_file: PathBuf::from("data.json"), temp_suffix: DEFAULT_TEMP_SUFFIX.to_string() }
    }
}

impl PersistenceConfig {
    /// Create a new configuration for the given dataset file
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self { data_file: data_file.into(), ..Default::default() }
    }

    /// Path of the scratch file next to the dataset
    pub fn temp_file(&self) -> PathBuf {
        let mut name = self.data_file.clone().into_os_string();
        name.push(&self.temp_suffix);
        PathBuf::from(name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_file.as_os_str().is_empty() {
            return Err("data_file must not be empty".to_string());
        }

        if self.temp_suffix.is_empty() {
            return Err("temp_suffix must not be empty".to_string());
        }

        Ok(())
    }
}
