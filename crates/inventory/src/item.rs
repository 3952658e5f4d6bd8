use serde::{Deserialize, Serialize};
use thiserror::Error;

use mediashelf_core::{Entity, ItemId};

/// Closed set of media kinds the catalogue accepts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Book,
    Magazine,
    Film,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Book, ItemType::Magazine, ItemType::Film];

    /// Case-insensitive lookup. Surrounding whitespace is not stripped.
    pub fn parse(raw: &str) -> Option<Self> {
        let lower = raw.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Book => "book",
            ItemType::Magazine => "magazine",
            ItemType::Film => "film",
        }
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection reasons for item input.
///
/// The `Display` strings are part of the HTTP contract.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("type and title are required")]
    MissingRequiredField,

    #[error("invalid type")]
    InvalidType,
}

/// A catalogue record.
///
/// Items are only minted by the inventory store (from a validated [`NewItem`])
/// or restored from storage through [`Item::restore`], so every instance holds
/// a known type and a non-blank, trimmed title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct Item {
    id: ItemId,
    #[serde(rename = "type")]
    item_type: ItemType,
    title: String,
    author: String,
    year: Option<i64>,
}

/// Loose on-disk shape, checked by `Item::restore` on the way in.
#[derive(Deserialize)]
struct ItemRecord {
    id: ItemId,
    #[serde(rename = "type")]
    item_type: String,
    title: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    year: Option<i64>,
}

impl TryFrom<ItemRecord> for Item {
    type Error = ValidationError;

    fn try_from(record: ItemRecord) -> Result<Self, Self::Error> {
        Item::restore(
            record.id,
            &record.item_type,
            record.title.as_deref().unwrap_or_default(),
            record.author.as_deref(),
            record.year,
        )
    }
}

impl Item {
    /// Rebuild an item read back from storage, re-checking the catalogue rules.
    pub fn restore(
        id: ItemId,
        item_type: &str,
        title: &str,
        author: Option<&str>,
        year: Option<i64>,
    ) -> Result<Self, ValidationError> {
        NewItem::validate(Some(item_type), Some(title), author, year).map(|n| n.into_item(id))
    }

    pub(crate) fn trusted(
        id: ItemId,
        item_type: ItemType,
        title: &str,
        author: &str,
        year: Option<i64>,
    ) -> Self {
        Self {
            id,
            item_type,
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

/// Command: CreateItem.
///
/// Raw, unvalidated field values as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateItem {
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
}

impl CreateItem {
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        NewItem::validate(
            self.item_type.as_deref(),
            self.title.as_deref(),
            self.author.as_deref(),
            self.year,
        )
    }
}

/// Validated, normalised input for a new item (no id yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    item_type: ItemType,
    title: String,
    author: String,
    year: Option<i64>,
}

impl NewItem {
    /// Check raw input in order: required fields first, then the type enum.
    ///
    /// Type is lowercased, title and author are trimmed (absent author becomes
    /// ""), and year is kept exactly as given.
    pub fn validate(
        item_type: Option<&str>,
        title: Option<&str>,
        author: Option<&str>,
        year: Option<i64>,
    ) -> Result<Self, ValidationError> {
        let item_type = item_type.filter(|t| !t.is_empty());
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        let (Some(item_type), Some(title)) = (item_type, title) else {
            return Err(ValidationError::MissingRequiredField);
        };
        let item_type = ItemType::parse(item_type).ok_or(ValidationError::InvalidType)?;

        Ok(Self {
            item_type,
            title: title.to_string(),
            author: author.unwrap_or_default().trim().to_string(),
            year,
        })
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Stamp the store-assigned id onto the record.
    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            item_type: self.item_type,
            title: self.title,
            author: self.author,
            year: self.year,
        }
    }
}
