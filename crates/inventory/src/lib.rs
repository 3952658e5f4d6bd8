//! Inventory domain module.
//!
//! This crate contains the catalogue rules for media items (validation,
//! normalisation, filtering and ordering), implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod query;
pub mod seed;

pub use item::{CreateItem, Item, ItemType, NewItem, ValidationError};
pub use query::ItemQuery;
pub use seed::seed_catalogue;
