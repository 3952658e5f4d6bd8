//! Sample catalogue written on first start when nothing is persisted yet.

use mediashelf_core::ItemId;

use crate::item::{Item, ItemType};

const SEED: [(ItemType, &str, &str, i64); 5] = [
    (ItemType::Book, "The Pragmatic Engineer", "John Doe", 2020),
    (ItemType::Magazine, "Science Monthly", "Editorial Team", 2024),
    (ItemType::Film, "Space Adventure", "Jane Director", 2019),
    (ItemType::Book, "A Brief History of Time", "Stephen Hawking", 1988),
    (ItemType::Book, "Zen and the Art of Motorcycle Maintenance", "Robert Pirsig", 1974),
];

/// The five sample items, numbered from 1 in the order above.
pub fn seed_catalogue() -> Vec<Item> {
    SEED.iter()
        .zip(1u64..)
        .filter_map(|(&(item_type, title, author, year), n)| {
            ItemId::new(n).map(|id| Item::trusted(id, item_type, title, author, Some(year)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediashelf_core::Entity;

    #[test]
    fn seed_ids_are_one_through_five() {
        let ids: Vec<u64> = seed_catalogue().iter().map(|i| i.id().get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seed_items_satisfy_catalogue_rules() {
        for item in seed_catalogue() {
            let restored = Item::restore(
                item.id(),
                item.item_type().as_str(),
                item.title(),
                Some(item.author()),
                item.year(),
            )
            .unwrap();
            assert_eq!(restored, item);
        }
    }
}
