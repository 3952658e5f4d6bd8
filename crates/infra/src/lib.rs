//! Infrastructure layer: persistence strategies, storage config, and the
//! inventory store that ties them to the domain rules.

pub mod config;
pub mod repository;
pub mod store;

pub use config::StorageConfig;
pub use repository::{
    InMemoryRepository, ItemRepository, JsonFileRepository, SqliteRepository, StorageError,
};
pub use store::{InventoryStore, StoreError};
