//! HTTP client and terminal rendering for the mediashelf API.

pub mod client;
pub mod error;
pub mod table;

pub use client::{ApiClient, ItemFilter, NewItemRequest, DEFAULT_API_URL};
pub use error::ClientError;
pub use table::render_table;
