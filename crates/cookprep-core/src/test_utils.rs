//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. Provides named
//! item and recipe ids matching [`sample_registry`], and [`MockWorld`], an
//! in-memory host that records every command the core issues.

use crate::event::HostEvent;
use crate::fixed::Position;
use crate::flags::Color;
use crate::id::*;
use crate::item::{Inventory, ItemStack};
use crate::registry::{CostEntry, RecipeKind, Registry, RegistryBuilder};
use crate::station::{BoardInfo, FuelGauge, Readiness, SlotView, StationInfo, StationKind};
use crate::status::Status;
use crate::world::World;
use std::collections::{HashMap, HashSet};

// ===========================================================================
// Positions
// ===========================================================================

pub fn pos(x: f64) -> Position {
    Position::from_f64(x, 0.0, 0.0)
}

// ===========================================================================
// Items (ids match sample_registry)
// ===========================================================================

pub fn wood_log() -> ItemId {
    ItemId(0)
}
pub fn plank() -> ItemId {
    ItemId(1)
}
pub fn raw_fish() -> ItemId {
    ItemId(2)
}
pub fn potato() -> ItemId {
    ItemId(3)
}
pub fn berries() -> ItemId {
    ItemId(4)
}
pub fn charcoal() -> ItemId {
    ItemId(5)
}
pub fn fish_soup() -> ItemId {
    ItemId(6)
}
pub fn berry_juice() -> ItemId {
    ItemId(7)
}
pub fn grilled_fish() -> ItemId {
    ItemId(8)
}
/// Fuel burned by mock cooking pots.
pub fn fuel_brick() -> ItemId {
    ItemId(9)
}

// ===========================================================================
// Recipes (ids match sample_registry)
// ===========================================================================

/// Pot: 2x (wood log | plank) -> charcoal.
pub fn charcoal_recipe() -> RecipeId {
    RecipeId(0)
}
/// Pot: 1x raw fish + 1x potato -> fish soup.
pub fn fish_soup_recipe() -> RecipeId {
    RecipeId(1)
}
/// Juicer: 2x berries -> berry juice.
pub fn berry_juice_recipe() -> RecipeId {
    RecipeId(2)
}
/// Pot: 1x raw fish -> grilled fish.
pub fn grilled_fish_recipe() -> RecipeId {
    RecipeId(3)
}

pub fn sample_registry() -> Registry {
    let mut b = RegistryBuilder::new();
    let log = b.register_item("wood_log", "Wood log");
    let plank = b.register_item("plank", "Plank");
    let fish = b.register_item("raw_fish", "Raw fish");
    let potato = b.register_item("potato", "Potato");
    let berries = b.register_item("berries", "Berries");
    let charcoal = b.register_item("charcoal", "Charcoal");
    let soup = b.register_item("fish_soup", "Fish soup");
    let juice = b.register_item("berry_juice", "Berry juice");
    let grilled = b.register_item("grilled_fish", "Grilled fish");
    b.register_item("fuel_brick", "Fuel brick");

    b.register_recipe(
        "charcoal",
        charcoal,
        RecipeKind::CookingPot,
        vec![CostEntry::new(vec![log, plank], 2)],
    );
    b.register_recipe(
        "fish_soup",
        soup,
        RecipeKind::CookingPot,
        vec![CostEntry::new(vec![fish], 1), CostEntry::new(vec![potato], 1)],
    );
    b.register_recipe(
        "berry_juice",
        juice,
        RecipeKind::Juicer,
        vec![CostEntry::new(vec![berries], 2)],
    );
    b.register_recipe(
        "grilled_fish",
        grilled,
        RecipeKind::CookingPot,
        vec![CostEntry::new(vec![fish], 1)],
    );
    b.build().expect("sample registry is valid")
}

// ===========================================================================
// MockWorld
// ===========================================================================

#[derive(Debug, Clone)]
pub struct MockStation {
    pub info: StationInfo,
    pub slots: Vec<Option<ItemStack>>,
    pub readiness: Readiness,
    pub fuel: Option<FuelGauge>,
    /// Items every slot of this station refuses.
    pub rejects: HashSet<ItemId>,
}

/// In-memory host. Stations are reported in insertion order.
#[derive(Debug, Default)]
pub struct MockWorld {
    pub stations: Vec<MockStation>,
    pub boards: Vec<BoardInfo>,
    pub inventory: Inventory,
    pub labels: HashMap<(BoardId, usize), Color>,
    pub status: Option<Status>,
    pub cooking_started: Vec<StationIndex>,
    pub fuel_added: Vec<(StationIndex, u32)>,
    /// Events produced by commands, waiting for the test to dispatch them.
    pub pending: Vec<HostEvent>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(&mut self, index: u32, kind: StationKind, position: Position, slot_count: u16) -> StationInfo {
        let info = StationInfo {
            index: StationIndex(index),
            kind,
            position,
            placed: true,
        };
        let fuel = (kind == StationKind::CookingPot).then_some(FuelGauge {
            fuel_item: fuel_brick(),
            current: 4,
            max: 4,
        });
        self.stations.push(MockStation {
            info,
            slots: vec![None; slot_count as usize],
            readiness: Readiness::Idle,
            fuel,
            rejects: HashSet::new(),
        });
        info
    }

    pub fn add_pot(&mut self, index: u32, x: f64, slot_count: u16) -> StationInfo {
        self.add_station(index, StationKind::CookingPot, pos(x), slot_count)
    }

    pub fn add_juicer(&mut self, index: u32, x: f64, slot_count: u16) -> StationInfo {
        self.add_station(index, StationKind::Juicer, pos(x), slot_count)
    }

    pub fn remove_station(&mut self, index: StationIndex) -> Option<StationInfo> {
        let at = self.stations.iter().position(|s| s.info.index == index)?;
        Some(self.stations.remove(at).info)
    }

    pub fn add_board(&mut self, id: u32, recipe: RecipeId, x: f64) -> BoardInfo {
        let board = BoardInfo {
            id: BoardId(id),
            recipe,
            position: pos(x),
        };
        self.boards.push(board);
        board
    }

    /// Give a board's cost labels initial colours.
    pub fn set_labels(&mut self, board: BoardId, colors: &[Color]) {
        for (index, &color) in colors.iter().enumerate() {
            self.labels.insert((board, index), color);
        }
    }

    pub fn label(&self, board: BoardId, index: usize) -> Option<Color> {
        self.labels.get(&(board, index)).copied()
    }

    pub fn give(&mut self, item: ItemId, quantity: u32) {
        self.inventory.add(item, quantity);
    }

    pub fn station_mut(&mut self, index: StationIndex) -> Option<&mut MockStation> {
        self.stations.iter_mut().find(|s| s.info.index == index)
    }

    pub fn station(&self, index: StationIndex) -> Option<&MockStation> {
        self.stations.iter().find(|s| s.info.index == index)
    }

    /// Put an item straight into a slot without touching the inventory.
    pub fn fill_slot(&mut self, slot: SlotId, item: ItemId) {
        if let Some(cell) = self.cell_mut(slot) {
            *cell = Some(ItemStack::single(item));
        }
    }

    pub fn slot_item(&self, slot: SlotId) -> Option<ItemId> {
        self.station(slot.station)
            .and_then(|s| s.slots.get(slot.index as usize).copied().flatten())
            .map(|stack| stack.item)
    }

    /// Items currently in a station's slots, in slot order.
    pub fn slot_items(&self, station: StationIndex) -> Vec<Option<ItemId>> {
        self.station(station)
            .map(|s| s.slots.iter().map(|c| c.map(|stack| stack.item)).collect())
            .unwrap_or_default()
    }

    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending)
    }

    fn cell_mut(&mut self, slot: SlotId) -> Option<&mut Option<ItemStack>> {
        self.station_mut(slot.station)
            .and_then(|s| s.slots.get_mut(slot.index as usize))
    }
}

impl World for MockWorld {
    fn placed_stations(&self) -> Vec<StationInfo> {
        self.stations.iter().map(|s| s.info).collect()
    }

    fn placed_boards(&self) -> Vec<BoardInfo> {
        self.boards.clone()
    }

    fn slots(&self, station: StationIndex) -> Vec<SlotView> {
        self.station(station)
            .map(|s| {
                s.slots
                    .iter()
                    .enumerate()
                    .map(|(i, contents)| SlotView {
                        id: SlotId::new(station, i as u16),
                        contents: *contents,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn inventory_count(&self, item: ItemId) -> u32 {
        self.inventory.count(item)
    }

    fn accepts_item(&self, slot: SlotId, item: ItemId) -> bool {
        self.station(slot.station)
            .is_some_and(|s| !s.rejects.contains(&item))
    }

    fn readiness(&self, station: StationIndex) -> Readiness {
        self.station(station)
            .map(|s| s.readiness)
            .unwrap_or(Readiness::Idle)
    }

    fn fuel(&self, station: StationIndex) -> Option<FuelGauge> {
        self.station(station).and_then(|s| s.fuel)
    }

    fn evict_item(&mut self, slot: SlotId) {
        let Some(stack) = self.cell_mut(slot).and_then(Option::take) else {
            return;
        };
        self.inventory.add(stack.item, stack.quantity);
        self.pending.push(HostEvent::SlotChanged(slot));
        self.pending.push(HostEvent::InventoryRefreshed);
    }

    fn insert_item(&mut self, slot: SlotId, item: ItemId) {
        if self.inventory.remove(item, 1) == 0 {
            return;
        }
        if let Some(cell) = self.cell_mut(slot) {
            *cell = Some(ItemStack::single(item));
        }
        self.pending.push(HostEvent::SlotChanged(slot));
        self.pending.push(HostEvent::InventoryRefreshed);
    }

    fn start_cooking(&mut self, station: StationIndex) {
        self.cooking_started.push(station);
        if let Some(s) = self.station_mut(station) {
            s.readiness = Readiness::Cooking;
        }
    }

    fn add_fuel(&mut self, station: StationIndex, amount: u32) {
        let Some(fuel_item) = self.fuel(station).map(|g| g.fuel_item) else {
            return;
        };
        let moved = self.inventory.remove(fuel_item, amount);
        if let Some(gauge) = self.station_mut(station).and_then(|s| s.fuel.as_mut()) {
            gauge.current += moved;
        }
        self.fuel_added.push((station, moved));
        self.pending.push(HostEvent::InventoryRefreshed);
    }

    fn present_status(&mut self, status: &Status) {
        self.status = Some(status.clone());
    }

    fn hide_status(&mut self) {
        self.status = None;
    }

    fn cost_label_color(&self, board: BoardId, index: usize) -> Option<Color> {
        self.label(board, index)
    }

    fn set_cost_label_color(&mut self, board: BoardId, index: usize, color: Color) {
        self.labels.insert((board, index), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_registry_ids_line_up() {
        let reg = sample_registry();
        assert_eq!(reg.item_id("berries"), Some(berries()));
        assert_eq!(reg.item_id("grilled_fish"), Some(grilled_fish()));
        assert_eq!(reg.recipe_id("berry_juice"), Some(berry_juice_recipe()));
        assert_eq!(reg.get_recipe(charcoal_recipe()).unwrap().result, charcoal());
        assert_eq!(reg.get_recipe(fish_soup_recipe()).unwrap().result, fish_soup());
        assert_eq!(reg.get_recipe(grilled_fish_recipe()).unwrap().costs.len(), 1);
        assert_eq!(reg.display_name(berry_juice()), "Berry juice");
        assert_eq!(reg.item_id("potato"), Some(potato()));
        assert_eq!(reg.item_id("wood_log"), Some(wood_log()));
        assert_eq!(reg.item_id("raw_fish"), Some(raw_fish()));
    }

    #[test]
    fn insert_consumes_inventory() {
        let mut world = MockWorld::new();
        let pot = world.add_pot(0, 1.0, 1);
        world.give(raw_fish(), 1);
        let slot = SlotId::new(pot.index, 0);
        world.insert_item(slot, raw_fish());
        assert_eq!(world.slot_item(slot), Some(raw_fish()));
        assert_eq!(world.inventory.count(raw_fish()), 0);
        assert_eq!(world.take_events().len(), 2);
    }

    #[test]
    fn evict_returns_to_inventory() {
        let mut world = MockWorld::new();
        let pot = world.add_pot(0, 1.0, 1);
        let slot = SlotId::new(pot.index, 0);
        world.fill_slot(slot, potato());
        world.evict_item(slot);
        assert_eq!(world.slot_item(slot), None);
        assert_eq!(world.inventory.count(potato()), 1);
    }

    #[test]
    fn add_fuel_moves_inventory_into_tank() {
        let mut world = MockWorld::new();
        let pot = world.add_pot(0, 1.0, 1);
        world.station_mut(pot.index).unwrap().fuel.as_mut().unwrap().current = 1;
        world.give(fuel_brick(), 5);
        world.add_fuel(pot.index, 3);
        assert_eq!(world.fuel(pot.index).unwrap().current, 4);
        assert_eq!(world.inventory.count(fuel_brick()), 2);
    }
}
