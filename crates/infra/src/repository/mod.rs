//! Persistence strategies for the item collection.
//!
//! Every strategy stores the whole catalogue; the store hands over the full
//! collection on each mutation and reads it back once at startup.

use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use mediashelf_core::Entity;
use mediashelf_inventory::Item;

pub mod in_memory;
pub mod json_file;
pub mod sqlite;

pub use in_memory::InMemoryRepository;
pub use json_file::JsonFileRepository;
pub use sqlite::SqliteRepository;

/// Storage operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation). `Corrupt` means the medium was readable but its content does
/// not describe a valid catalogue.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt catalogue data: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode catalogue: {0}")]
    Encode(String),
}

impl StorageError {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Corrupt(_))
    }
}

/// Load/save contract every persistence strategy implements.
#[async_trait::async_trait]
pub trait ItemRepository: Send + Sync {
    /// Read the persisted catalogue.
    ///
    /// `Ok(None)` means nothing has been persisted yet (first start), which is
    /// different from a persisted but empty catalogue.
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError>;

    /// Replace the persisted catalogue with `items`.
    async fn save(&self, items: &[Item]) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Reject a loaded catalogue that repeats an id.
pub fn ensure_unique_ids(items: &[Item]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(StorageError::Corrupt(format!("duplicate item id {}", item.id())));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_inventory::seed_catalogue;

    #[test]
    fn unique_ids_pass() {
        assert!(ensure_unique_ids(&seed_catalogue()).is_ok());
    }

    #[test]
    fn duplicate_ids_are_corrupt() {
        let mut items = seed_catalogue();
        items.push(items[0].clone());
        let err = ensure_unique_ids(&items).unwrap_err();
        assert!(err.is_corrupt());
        assert!(err.to_string().contains("duplicate item id 1"));
    }
}
