//! Storage selection.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::repository::{ItemRepository, JsonFileRepository, SqliteRepository, StorageError};

/// Which persistence strategy backs the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Single JSON document, rewritten on every change.
    Json { path: PathBuf },
    /// SQLite database with one row per item.
    Sqlite { url: String },
}

impl StorageConfig {
    /// Open the configured repository.
    ///
    /// Only connection-level failures surface here; unreadable *content* is
    /// handled later by the store's recovery path.
    pub async fn open(&self) -> Result<Arc<dyn ItemRepository>, StorageError> {
        let repo: Arc<dyn ItemRepository> = match self {
            StorageConfig::Json { path } => Arc::new(JsonFileRepository::new(path.clone())),
            StorageConfig::Sqlite { url } => Arc::new(SqliteRepository::connect(url).await?),
        };
        info!(backend = %repo.describe(), "storage opened");
        Ok(repo)
    }
}
