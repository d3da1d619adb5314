//! Slot reconciliation: which slots to refill and with what.
//!
//! [`PreparationPlan::calculate`] is a pure function of the recipe cost list,
//! the station's current slots, and inventory counts. Each cost entry, in
//! recipe order:
//!
//! 1. Claims up to `amount` unclaimed slots that already hold an accepted
//!    item. Those slots are left alone.
//! 2. Covers the remaining shortfall from inventory, drawing accepted items in
//!    their declared order.
//! 3. If still short, is recorded as unsatisfied.
//!
//! Every slot not claimed in step 1 is a slot to replace. A well-formed
//! recipe needs exactly as many items as it has unclaimed slots; anything
//! else is reported as a [`PrepError::PlanInconsistency`].

use crate::error::PrepError;
use crate::id::{ItemId, SlotId};
use crate::registry::CostEntry;
use crate::rng::PrepRng;
use crate::station::SlotView;
use crate::world::World;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparationPlan {
    slots_to_replace: Vec<SlotId>,
    items_to_place: Vec<ItemId>,
    unsatisfied: BTreeSet<usize>,
    calculated: bool,
}

/// Outcome of applying a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Units inserted into slots.
    pub inserted: usize,
    /// Slots whose previous contents went back to the player.
    pub evicted: usize,
    /// Pairs skipped because the slot refused the item.
    pub skipped: Vec<PrepError>,
}

impl PreparationPlan {
    /// Compute a plan. `available` reports how many of an item the player
    /// carries. Units drawn for one cost entry are not offered again to a
    /// later entry.
    pub fn calculate<F>(costs: &[CostEntry], slots: &[SlotView], available: F) -> Self
    where
        F: Fn(ItemId) -> u32,
    {
        let mut pool: Vec<&SlotView> = slots.iter().collect();
        let mut items_to_place = Vec::new();
        let mut unsatisfied = BTreeSet::new();
        let mut reserved: BTreeMap<ItemId, u32> = BTreeMap::new();

        for (index, cost) in costs.iter().enumerate() {
            let mut covered = claim_prepared_slots(&mut pool, cost);
            if covered == cost.amount {
                continue;
            }

            for &item in &cost.items {
                let taken = reserved.entry(item).or_insert(0);
                let free = available(item).saturating_sub(*taken);
                let to_add = (cost.amount - covered).min(free);
                if to_add > 0 {
                    *taken += to_add;
                    covered += to_add;
                    items_to_place.extend(std::iter::repeat_n(item, to_add as usize));
                    if covered == cost.amount {
                        break;
                    }
                }
            }

            if covered < cost.amount {
                unsatisfied.insert(index);
            }
        }

        Self {
            slots_to_replace: pool.into_iter().map(|s| s.id).collect(),
            items_to_place,
            unsatisfied,
            calculated: true,
        }
    }

    pub fn slots_to_replace(&self) -> &[SlotId] {
        &self.slots_to_replace
    }

    pub fn items_to_place(&self) -> &[ItemId] {
        &self.items_to_place
    }

    /// Indices of cost entries that slots plus inventory cannot cover.
    pub fn unsatisfied(&self) -> &BTreeSet<usize> {
        &self.unsatisfied
    }

    pub fn is_calculated(&self) -> bool {
        self.calculated
    }

    /// True when every slot to replace has exactly one item to go in it.
    pub fn is_consistent(&self) -> bool {
        self.slots_to_replace.len() == self.items_to_place.len()
    }

    /// Nothing to place: the slots already hold the recipe.
    pub fn is_prepared(&self) -> bool {
        self.calculated && self.unsatisfied.is_empty() && self.items_to_place.is_empty()
    }

    /// Check that the plan can be applied as-is.
    pub fn validate(&self) -> Result<(), PrepError> {
        if !self.unsatisfied.is_empty() {
            return Err(PrepError::MissingIngredients {
                missing: self.unsatisfied.len(),
            });
        }
        if !self.is_consistent() {
            return Err(PrepError::PlanInconsistency {
                slots: self.slots_to_replace.len(),
                items: self.items_to_place.len(),
            });
        }
        Ok(())
    }

    /// Pair each slot to replace with an item. With an rng the items are
    /// shuffled first, so ingredients land in varying slots.
    pub fn pairs(&self, rng: Option<&mut PrepRng>) -> Vec<(SlotId, ItemId)> {
        let mut items = self.items_to_place.clone();
        if let Some(rng) = rng {
            rng.shuffle(&mut items);
        }
        self.slots_to_replace.iter().copied().zip(items).collect()
    }

    /// Place the planned items, then invalidate the plan.
    ///
    /// Occupied slots are emptied back to the player first. A slot that
    /// refuses its item is left empty and the pair is reported as skipped;
    /// the remaining pairs are still processed. Nothing is rolled back.
    pub fn apply<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        rng: Option<&mut PrepRng>,
    ) -> Result<ApplyReport, PrepError> {
        self.validate()?;

        let current: BTreeMap<SlotId, bool> = self
            .slots_to_replace
            .first()
            .map(|slot| {
                world
                    .slots(slot.station)
                    .into_iter()
                    .map(|s| (s.id, s.has_item()))
                    .collect()
            })
            .unwrap_or_default();

        let mut report = ApplyReport::default();
        for (slot, item) in self.pairs(rng) {
            if current.get(&slot).copied().unwrap_or(false) {
                world.evict_item(slot);
                report.evicted += 1;
            }

            if !world.accepts_item(slot, item) {
                tracing::warn!(?slot, ?item, "item can not be placed in station slot");
                report.skipped.push(PrepError::IncompatibleSlotItem { slot, item });
                continue;
            }

            world.insert_item(slot, item);
            report.inserted += 1;
        }

        tracing::debug!(
            inserted = report.inserted,
            evicted = report.evicted,
            skipped = report.skipped.len(),
            "applied preparation plan"
        );
        self.clear();
        Ok(report)
    }

    /// Drop the plan; the next observation recomputes it.
    pub fn clear(&mut self) {
        self.slots_to_replace.clear();
        self.items_to_place.clear();
        self.unsatisfied.clear();
        self.calculated = false;
    }
}

/// Remove up to `cost.amount` slots already holding an accepted item from the
/// pool. Returns how many were claimed.
fn claim_prepared_slots(pool: &mut Vec<&SlotView>, cost: &CostEntry) -> u32 {
    let mut claimed = 0u32;
    pool.retain(|slot| {
        if claimed < cost.amount && slot.item().is_some_and(|item| cost.accepts(item)) {
            claimed += 1;
            false
        } else {
            true
        }
    });
    claimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::StationIndex;
    use crate::item::Inventory;

    const LOG: ItemId = ItemId(0);
    const PLANK: ItemId = ItemId(1);
    const FISH: ItemId = ItemId(2);
    const POTATO: ItemId = ItemId(3);

    fn slot(i: u16) -> SlotId {
        SlotId::new(StationIndex(0), i)
    }

    fn empty_slots(n: u16) -> Vec<SlotView> {
        (0..n).map(|i| SlotView::empty(slot(i))).collect()
    }

    fn inv(pairs: &[(ItemId, u32)]) -> Inventory {
        pairs.iter().copied().collect()
    }

    #[test]
    fn pulls_from_accepted_items_in_declared_order() {
        let costs = vec![CostEntry::new(vec![LOG, PLANK], 2)];
        let inventory = inv(&[(LOG, 1), (PLANK, 3)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(2), |i| inventory.count(i));

        assert_eq!(plan.items_to_place(), &[LOG, PLANK]);
        assert!(plan.unsatisfied().is_empty());
        assert_eq!(plan.slots_to_replace().len(), 2);
        assert!(plan.is_consistent());
    }

    #[test]
    fn stops_once_shortfall_covered() {
        let costs = vec![CostEntry::new(vec![LOG, PLANK], 2)];
        let inventory = inv(&[(LOG, 5), (PLANK, 5)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(2), |i| inventory.count(i));
        assert_eq!(plan.items_to_place(), &[LOG, LOG]);
    }

    #[test]
    fn already_prepared_slots_need_nothing() {
        let costs = vec![CostEntry::new(vec![FISH], 1), CostEntry::new(vec![POTATO], 1)];
        let slots = vec![SlotView::holding(slot(0), POTATO), SlotView::holding(slot(1), FISH)];
        let plan = PreparationPlan::calculate(&costs, &slots, |_| 0);

        assert!(plan.items_to_place().is_empty());
        assert!(plan.slots_to_replace().is_empty());
        assert!(plan.unsatisfied().is_empty());
        assert!(plan.is_prepared());
    }

    #[test]
    fn missing_ingredient_is_unsatisfied() {
        let costs = vec![CostEntry::new(vec![FISH], 1)];
        let plan = PreparationPlan::calculate(&costs, &empty_slots(1), |_| 0);
        assert_eq!(plan.unsatisfied().iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(plan.items_to_place().is_empty());
        assert!(!plan.is_prepared());
        assert_eq!(plan.validate(), Err(PrepError::MissingIngredients { missing: 1 }));
    }

    #[test]
    fn partial_inventory_is_listed_but_entry_unsatisfied() {
        let costs = vec![CostEntry::new(vec![FISH], 3)];
        let inventory = inv(&[(FISH, 2)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(3), |i| inventory.count(i));
        assert_eq!(plan.items_to_place(), &[FISH, FISH]);
        assert!(plan.unsatisfied().contains(&0));
    }

    #[test]
    fn wrong_items_are_replaced() {
        let costs = vec![CostEntry::new(vec![FISH], 2)];
        let slots = vec![SlotView::holding(slot(0), FISH), SlotView::holding(slot(1), LOG)];
        let inventory = inv(&[(FISH, 1)]);
        let plan = PreparationPlan::calculate(&costs, &slots, |i| inventory.count(i));
        assert_eq!(plan.slots_to_replace(), &[slot(1)]);
        assert_eq!(plan.items_to_place(), &[FISH]);
    }

    #[test]
    fn surplus_matching_slots_are_not_claimed_twice() {
        // Two fish slots but the recipe needs one fish and one potato.
        let costs = vec![CostEntry::new(vec![FISH], 1), CostEntry::new(vec![POTATO], 1)];
        let slots = vec![SlotView::holding(slot(0), FISH), SlotView::holding(slot(1), FISH)];
        let inventory = inv(&[(POTATO, 1)]);
        let plan = PreparationPlan::calculate(&costs, &slots, |i| inventory.count(i));
        assert_eq!(plan.slots_to_replace(), &[slot(1)]);
        assert_eq!(plan.items_to_place(), &[POTATO]);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn shared_item_is_not_double_counted_across_entries() {
        let costs = vec![
            CostEntry::new(vec![FISH], 1),
            CostEntry::new(vec![FISH, POTATO], 1),
        ];
        let inventory = inv(&[(FISH, 1)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(2), |i| inventory.count(i));
        assert_eq!(plan.items_to_place(), &[FISH]);
        assert!(plan.unsatisfied().contains(&1));
    }

    #[test]
    fn slot_count_mismatch_is_inconsistent() {
        let costs = vec![CostEntry::new(vec![FISH], 1)];
        let inventory = inv(&[(FISH, 1)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(3), |i| inventory.count(i));
        assert!(plan.unsatisfied().is_empty());
        assert_eq!(
            plan.validate(),
            Err(PrepError::PlanInconsistency { slots: 3, items: 1 })
        );
    }

    #[test]
    fn calculate_is_repeatable() {
        let costs = vec![CostEntry::new(vec![LOG, PLANK], 2), CostEntry::new(vec![FISH], 1)];
        let inventory = inv(&[(LOG, 1), (PLANK, 1), (FISH, 4)]);
        let slots = empty_slots(3);
        let a = PreparationPlan::calculate(&costs, &slots, |i| inventory.count(i));
        let b = PreparationPlan::calculate(&costs, &slots, |i| inventory.count(i));
        assert_eq!(a, b);
    }

    #[test]
    fn pairs_keep_every_item() {
        let costs = vec![CostEntry::new(vec![LOG, PLANK], 4)];
        let inventory = inv(&[(LOG, 2), (PLANK, 2)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(4), |i| inventory.count(i));
        let mut rng = PrepRng::new(11);
        let pairs = plan.pairs(Some(&mut rng));

        let slots: Vec<SlotId> = pairs.iter().map(|p| p.0).collect();
        assert_eq!(slots, plan.slots_to_replace());
        let mut items: Vec<ItemId> = pairs.iter().map(|p| p.1).collect();
        items.sort();
        assert_eq!(items, vec![LOG, LOG, PLANK, PLANK]);
    }

    #[test]
    fn pairs_without_rng_keep_plan_order() {
        let costs = vec![CostEntry::new(vec![LOG, PLANK], 2)];
        let inventory = inv(&[(LOG, 1), (PLANK, 1)]);
        let plan = PreparationPlan::calculate(&costs, &empty_slots(2), |i| inventory.count(i));
        assert_eq!(plan.pairs(None), vec![(slot(0), LOG), (slot(1), PLANK)]);
    }

    #[test]
    fn clear_resets_everything() {
        let costs = vec![CostEntry::new(vec![FISH], 1)];
        let mut plan = PreparationPlan::calculate(&costs, &empty_slots(1), |_| 0);
        plan.clear();
        assert_eq!(plan, PreparationPlan::default());
        assert!(!plan.is_calculated());
    }
}
