use crate::id::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stack of identical items. Station slots hold at most one stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    pub quantity: u32,
}

impl ItemStack {
    pub fn new(item: ItemId, quantity: u32) -> Self {
        Self { item, quantity }
    }

    pub fn single(item: ItemId) -> Self {
        Self::new(item, 1)
    }
}

/// Player inventory as an item -> count map.
///
/// The core never mutates this directly: hosts own the real inventory and
/// expose counts through [`crate::world::World::inventory_count`]. This type
/// is provided for hosts without a richer model and for tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: BTreeMap<ItemId, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items. Saturates rather than wrapping.
    pub fn add(&mut self, item: ItemId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.counts.entry(item).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Remove items. Returns the amount actually removed.
    #[must_use = "returns the quantity actually removed, which may be less than requested"]
    pub fn remove(&mut self, item: ItemId, quantity: u32) -> u32 {
        let Some(count) = self.counts.get_mut(&item) else {
            return 0;
        };
        let removed = quantity.min(*count);
        *count -= removed;
        if *count == 0 {
            self.counts.remove(&item);
        }
        removed
    }

    /// Get quantity of a specific item.
    pub fn count(&self, item: ItemId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(ItemId, u32)> for Inventory {
    fn from_iter<T: IntoIterator<Item = (ItemId, u32)>>(iter: T) -> Self {
        let mut inv = Inventory::new();
        for (item, count) in iter {
            inv.add(item, count);
        }
        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() {
        let mut inv = Inventory::new();
        let log = ItemId(0);
        inv.add(log, 5);
        assert_eq!(inv.count(log), 5);

        let removed = inv.remove(log, 3);
        assert_eq!(removed, 3);
        assert_eq!(inv.count(log), 2);
    }

    #[test]
    fn remove_more_than_available() {
        let mut inv = Inventory::new();
        let fish = ItemId(4);
        inv.add(fish, 2);
        let removed = inv.remove(fish, 10);
        assert_eq!(removed, 2);
        assert_eq!(inv.count(fish), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn remove_missing_item_is_noop() {
        let mut inv = Inventory::new();
        assert_eq!(inv.remove(ItemId(9), 1), 0);
    }

    #[test]
    fn adding_zero_leaves_no_entry() {
        let mut inv = Inventory::new();
        inv.add(ItemId(1), 0);
        assert!(inv.is_empty());
    }

    #[test]
    fn collect_from_pairs_merges_duplicates() {
        let inv: Inventory = vec![(ItemId(1), 2), (ItemId(2), 1), (ItemId(1), 3)]
            .into_iter()
            .collect();
        assert_eq!(inv.count(ItemId(1)), 5);
        assert_eq!(inv.count(ItemId(2)), 1);
    }

    #[test]
    fn add_saturates() {
        let mut inv = Inventory::new();
        inv.add(ItemId(0), u32::MAX);
        inv.add(ItemId(0), 10);
        assert_eq!(inv.count(ItemId(0)), u32::MAX);
    }
}
