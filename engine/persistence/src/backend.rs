//! Dataset store trait and implementations

use crate::config::PersistenceConfig;
use crate::dataset::Dataset;
use crate::error::{PersistenceError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Abstract trait for dataset stores
#[async_trait::async_trait]
pub trait DatasetStore: Send + Sync {
    /// Load the stored dataset; a store with nothing in it yields an empty dataset
    async fn load(&self) -> Result<Dataset>;

    /// Replace the stored dataset
    async fn save(&self, dataset: &Dataset) -> Result<()>;

    /// Human-readable location, used in status output
    fn location(&self) -> String;
}

/// JSON file store that replaces the dataset atomically
pub struct LocalJsonStore {
    config: PersistenceConfig,
}

impl LocalJsonStore {
    /// Create a new local store
    pub fn new(config: PersistenceConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;
        Ok(Self { config })
    }

    /// Create a new local store with default config for the given file
    pub fn with_default_config(data_file: impl Into<PathBuf>) -> Result<Self> {
        Self::new(PersistenceConfig::new(data_file))
    }

    /// Dataset file path
    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    fn write_temp_file(&self, dataset: &Dataset) -> Result<PathBuf> {
        let temp_path = self.config.temp_file();
        write_or_discard(&temp_path, |writer| dataset.write_pretty(writer))?;
        Ok(temp_path)
    }
}

/// Write `path` through `write`; a failed write leaves no file behind
fn write_or_discard<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(PersistenceError::Io)?;

    let mut writer = BufWriter::new(file);
    if let Err(e) = write(&mut writer) {
        drop(writer);
        let _ = std::fs::remove_file(path);
        return Err(e);
    }

    Ok(())
}

#[async_trait::async_trait]
impl DatasetStore for LocalJsonStore {
    async fn load(&self) -> Result<Dataset> {
        let path = &self.config.data_file;

        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No dataset at {:?}, starting empty", path);
                return Ok(Dataset::default());
            }
            Err(e) => return Err(PersistenceError::Io(e)),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(PersistenceError::Io)?;

        let dataset = Dataset::from_slice(path, &bytes)?;
        tracing::debug!("Loaded {} stored matches from {:?}", dataset.matches.len(), path);

        Ok(dataset)
    }

    async fn save(&self, dataset: &Dataset) -> Result<()> {
        let temp_path = self.write_temp_file(dataset)?;

        if let Err(e) = std::fs::rename(&temp_path, &self.config.data_file) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(PersistenceError::Io(e));
        }

        tracing::info!(
            "Saved dataset with {} matches to {:?}",
            dataset.matches.len(),
            self.config.data_file
        );

        Ok(())
    }

    fn location(&self) -> String {
        self.config.data_file.display().to_string()
    }
}

/// In-memory dataset store (for testing)
#[derive(Clone, Default)]
pub struct InMemoryStore {
    dataset: Arc<Mutex<Option<Dataset>>>,
    saves: Arc<Mutex<usize>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a dataset
    pub fn with_dataset(dataset: Dataset) -> Self {
        Self { dataset: Arc::new(Mutex::new(Some(dataset))), saves: Arc::new(Mutex::new(0)) }
    }

    /// Current contents, if anything was ever stored
    pub async fn snapshot(&self) -> Option<Dataset> {
        self.dataset.lock().await.clone()
    }

    /// Number of completed saves
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait::async_trait]
impl DatasetStore for InMemoryStore {
    async fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, dataset: &Dataset) -> Result<()> {
        *self.dataset.lock().await = Some(dataset.clone());
        *self.saves.lock().await += 1;

        tracing::info!("Stored dataset with {} matches in memory", dataset.matches.len());

        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
