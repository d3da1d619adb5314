//! The host game as seen by the core.
//!
//! Everything the engine reads or changes in the running game goes through
//! [`World`]. Hosts implement it over their entity system; tests use
//! `test_utils::MockWorld`.
//!
//! Commands must not call back into the coordinator. Slot and inventory
//! notifications caused by a command are dispatched by the host after the
//! current handler returns.

use crate::flags::{Color, CostLabels};
use crate::id::{BoardId, ItemId, SlotId, StationIndex};
use crate::station::{BoardInfo, FuelGauge, Readiness, SlotView, StationInfo};
use crate::status::Status;

pub trait World {
    // -- Queries --

    /// Every station currently in the world, placed or not.
    fn placed_stations(&self) -> Vec<StationInfo>;

    /// Every recipe board currently placed in the world.
    fn placed_boards(&self) -> Vec<BoardInfo>;

    /// Slots of a station in the host's slot order. Empty if the station no
    /// longer exists.
    fn slots(&self, station: StationIndex) -> Vec<SlotView>;

    /// How many of `item` the local player carries.
    fn inventory_count(&self, item: ItemId) -> u32;

    /// Whether `slot` can physically hold `item`.
    fn accepts_item(&self, slot: SlotId, item: ItemId) -> bool;

    fn readiness(&self, station: StationIndex) -> Readiness;

    /// Fuel tank of the station, if it burns fuel.
    fn fuel(&self, station: StationIndex) -> Option<FuelGauge>;

    // -- Commands --

    /// Move the slot's contents back to the player's inventory.
    fn evict_item(&mut self, slot: SlotId);

    /// Move one unit of `item` from the player's inventory into the slot.
    fn insert_item(&mut self, slot: SlotId, item: ItemId);

    fn start_cooking(&mut self, station: StationIndex);

    /// Move `amount` fuel units from the player into the station's tank.
    fn add_fuel(&mut self, station: StationIndex, amount: u32);

    fn present_status(&mut self, status: &Status);

    fn hide_status(&mut self);

    // -- Recipe board cost labels --

    /// Colour of a board's cost label. Hosts without label styling keep the
    /// default and read the plan's unsatisfied set instead.
    fn cost_label_color(&self, _board: BoardId, _index: usize) -> Option<Color> {
        None
    }

    fn set_cost_label_color(&mut self, _board: BoardId, _index: usize, _color: Color) {}
}

/// The cost labels of one board, borrowed from the world.
pub struct BoardLabels<'a, W: World + ?Sized> {
    world: &'a mut W,
    board: BoardId,
}

impl<'a, W: World + ?Sized> BoardLabels<'a, W> {
    pub fn new(world: &'a mut W, board: BoardId) -> Self {
        Self { world, board }
    }
}

impl<W: World + ?Sized> CostLabels for BoardLabels<'_, W> {
    fn color(&self, index: usize) -> Option<Color> {
        self.world.cost_label_color(self.board, index)
    }

    fn set_color(&mut self, index: usize, color: Color) {
        self.world.set_cost_label_color(self.board, index, color);
    }
}
