//! Read-side filtering and ordering of the catalogue.

use crate::item::{Item, ItemType};

/// Normalised list filter.
///
/// Both parts are optional. A type filter outside the closed set is dropped
/// rather than rejected, and the text filter is matched case-insensitively
/// against title OR author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    text: Option<String>,
    item_type: Option<ItemType>,
}

impl ItemQuery {
    /// Unfiltered query.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a query from raw request parameters (trimmed and lower-cased here).
    pub fn new(text: Option<&str>, item_type: Option<&str>) -> Self {
        let text = text
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let item_type = item_type.and_then(|t| ItemType::parse(t.trim()));
        Self { text, item_type }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(t) = self.item_type {
            if item.item_type() != t {
                return false;
            }
        }
        match &self.text {
            Some(needle) => {
                item.title().to_lowercase().contains(needle.as_str())
                    || item.author().to_lowercase().contains(needle.as_str())
            }
            None => true,
        }
    }

    /// Filter `items` and return the survivors ordered by title.
    ///
    /// Titles compare case-sensitively; the sort is stable so equal titles
    /// keep their collection order.
    pub fn apply<'a, I>(&self, items: I) -> Vec<Item>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut out: Vec<Item> = items.into_iter().filter(|i| self.matches(i)).cloned().collect();
        out.sort_by(|a, b| a.title().cmp(b.title()));
        out
    }
}
