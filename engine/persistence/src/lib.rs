//! # Persistence Layer
//!
//! This crate stores the fixtures dataset consumed by the front end.
//!
//! ## Architecture
//!
//! - **DatasetStore**: Abstract trait for different storage backends
//! - **LocalJsonStore**: JSON file store; a save writes a scratch file next to
//!   the dataset and renames it over the target, so readers never observe a
//!   partially written file
//! - **InMemoryStore**: Shared in-memory store for tests
//!
//! ## Usage
//!
//! ```rust
//! use persistence::{create_local_store, DatasetStore};
//! use tempfile::TempDir;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let store = create_local_store(temp_dir.path().join("data.json"))?;
//!
//!     let mut dataset = store.load().await?;
//!     dataset.team = "הפ׳ גליל עליון".to_string();
//!     store.save(&dataset).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod dataset;
pub mod error;
pub mod local;

pub use backend::{DatasetStore, InMemoryStore, LocalJsonStore};
pub use config::PersistenceConfig;
pub use dataset::Dataset;
pub use error::{PersistenceError, Result};
pub use local::{create_local_store, create_local_store_with_config};
