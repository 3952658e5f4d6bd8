//! The inventory store: authoritative item collection plus its persistence.
//!
//! ## Durability
//!
//! Every mutation is written through the repository before it is
//! acknowledged. When the write fails the mutation is undone in memory and
//! the caller gets [`StoreError::Persistence`], so memory never runs ahead of
//! what is on disk. The id counter is *not* rewound: an id handed out once is
//! never handed out again within the process.
//!
//! ## Concurrency
//!
//! All operations serialise on one async mutex, held across the repository
//! write, so read-modify-write sequences from concurrent requests cannot
//! interleave.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use mediashelf_core::{Entity, ItemId};
use mediashelf_inventory::{seed_catalogue, CreateItem, Item, ItemQuery, ValidationError};

use crate::repository::{ensure_unique_ids, ItemRepository, StorageError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("change was not persisted: {0}")]
    Persistence(#[source] StorageError),

    #[error("no item ids left to assign")]
    IdsExhausted,
}

#[derive(Debug)]
struct State {
    items: Vec<Item>,
    /// `None` once the largest id has been handed out.
    next_id: Option<ItemId>,
}

impl State {
    fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_id: Some(ItemId::FIRST),
        }
    }

    fn from_items(items: Vec<Item>) -> Self {
        let next_id = items
            .iter()
            .map(|i| i.id())
            .max()
            .map_or(Some(ItemId::FIRST), ItemId::next);
        Self { items, next_id }
    }
}

/// Owns the catalogue and the id counter. Share it as `Arc<InventoryStore>`.
pub struct InventoryStore {
    repo: Arc<dyn ItemRepository>,
    state: Mutex<State>,
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("repo", &self.repo.describe())
            .finish_non_exhaustive()
    }
}

impl InventoryStore {
    /// Build a store over `repo` and load it.
    pub async fn open(repo: Arc<dyn ItemRepository>) -> Self {
        let store = Self {
            repo,
            state: Mutex::new(State::empty()),
        };
        store.initialize().await;
        store
    }

    /// (Re)load the collection from the repository.
    ///
    /// - nothing persisted: the sample catalogue is written and used
    /// - unreadable or corrupt data: logged, continue with an empty collection
    ///
    /// Never fails. Reloading never lowers the id counter below ids this store
    /// has already handed out.
    pub async fn initialize(&self) {
        let mut state = self.state.lock().await;
        let backend = self.repo.describe();

        let loaded = self
            .repo
            .load()
            .await
            .and_then(|opt| match opt {
                Some(items) => ensure_unique_ids(&items).map(|_| Some(items)),
                None => Ok(None),
            });

        let fresh = match loaded {
            Ok(Some(items)) => {
                info!(backend = %backend, count = items.len(), "catalogue loaded");
                State::from_items(items)
            }
            Ok(None) => {
                let items = seed_catalogue();
                match self.repo.save(&items).await {
                    Ok(()) => info!(backend = %backend, count = items.len(), "seeded sample catalogue"),
                    Err(e) => error!(backend = %backend, error = %e, "failed to persist sample catalogue"),
                }
                State::from_items(items)
            }
            Err(e) if e.is_corrupt() => {
                warn!(backend = %backend, error = %e, "discarding corrupt catalogue; starting empty");
                State::empty()
            }
            Err(e) => {
                error!(backend = %backend, error = %e, "failed to read catalogue; starting empty");
                State::empty()
            }
        };

        let high_water = state.next_id;
        *state = fresh;
        state.next_id = match (state.next_id, high_water) {
            (Some(loaded), Some(issued)) => Some(loaded.max(issued)),
            _ => None,
        };
    }

    /// Filtered, title-ordered snapshot of the catalogue.
    pub async fn list(&self, query: &ItemQuery) -> Vec<Item> {
        let state = self.state.lock().await;
        query.apply(&state.items)
    }

    /// Validate, assign the next id, append and persist.
    pub async fn create(&self, cmd: &CreateItem) -> Result<Item, StoreError> {
        let new_item = cmd.validate().inspect_err(|e| {
            debug!(reason = %e, "rejected item");
        })?;

        let mut state = self.state.lock().await;
        let Some(id) = state.next_id else {
            error!("item id space exhausted; refusing to create");
            return Err(StoreError::IdsExhausted);
        };
        state.next_id = id.next();

        let item = new_item.into_item(id);
        state.items.push(item.clone());

        if let Err(e) = self.repo.save(&state.items).await {
            state.items.pop();
            error!(item_id = %id, error = %e, "failed to persist new item; change rolled back");
            return Err(StoreError::Persistence(e));
        }

        info!(item_id = %id, item_type = %item.item_type(), "item created");
        Ok(item)
    }

    /// Remove the item with `id`. `Ok(false)` when there is no such item.
    pub async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;

        let Some(pos) = state.items.iter().position(|i| i.id() == id) else {
            debug!(item_id = %id, "delete of unknown item");
            return Ok(false);
        };
        let removed = state.items.remove(pos);

        if let Err(e) = self.repo.save(&state.items).await {
            state.items.insert(pos, removed);
            error!(item_id = %id, error = %e, "failed to persist deletion; change rolled back");
            return Err(StoreError::Persistence(e));
        }

        info!(item_id = %id, "item deleted");
        Ok(true)
    }

    /// The id the next successful create will receive, `None` when exhausted.
    pub async fn next_id(&self) -> Option<ItemId> {
        self.state.lock().await.next_id
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
