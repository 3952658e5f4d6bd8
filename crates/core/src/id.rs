//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a catalogue item.
///
/// Ids are positive integers handed out by the inventory store; zero is never
/// a valid id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ItemId(u64);

impl ItemId {
    /// The first id handed out by an empty store.
    pub const FIRST: ItemId = ItemId(1);

    /// Wrap a raw value. Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<ItemId> for u64 {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl TryFrom<u64> for ItemId {
    type Error = DomainError;

    fn try_from(value: u64) -> DomainResult<Self> {
        Self::new(value).ok_or_else(|| DomainError::invalid_id("ItemId: must be positive"))
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let raw = u64::from_str(s).map_err(|e| DomainError::invalid_id(format!("ItemId: {e}")))?;
        Self::try_from(raw)
    }
}
