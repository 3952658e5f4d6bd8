use std::sync::Arc;

use mediashelf_infra::{InventoryStore, ItemRepository, StorageConfig, StorageError};

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub store: Arc<InventoryStore>,
}

impl AppServices {
    /// Open the store over an existing repository (tests, embedding).
    pub async fn with_repository(repo: Arc<dyn ItemRepository>) -> Self {
        Self {
            store: Arc::new(InventoryStore::open(repo).await),
        }
    }
}

/// Open the configured repository and load the store from it.
pub async fn build_services(storage: &StorageConfig) -> Result<AppServices, StorageError> {
    let repo = storage.open().await?;
    Ok(AppServices::with_repository(repo).await)
}
