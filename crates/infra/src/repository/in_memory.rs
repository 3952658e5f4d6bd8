//! In-memory repository for tests/dev.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use mediashelf_inventory::Item;

use super::{ItemRepository, StorageError};

/// Keeps the last saved snapshot in memory.
///
/// Writes can be switched to fail, which is how tests exercise the store's
/// behaviour when the medium is unavailable.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshot: Mutex<Option<Vec<Item>>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryRepository {
    /// Nothing persisted yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already persisted catalogue.
    pub fn with_snapshot(items: Vec<Item>) -> Self {
        Self {
            snapshot: Mutex::new(Some(items)),
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Last successfully saved catalogue.
    pub fn snapshot(&self) -> Option<Vec<Item>> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ItemRepository for InMemoryRepository {
    async fn load(&self) -> Result<Option<Vec<Item>>, StorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, items: &[Item]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io {
                path: "memory".into(),
                source: std::io::Error::other("writes disabled"),
            });
        }
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) = Some(items.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}
