//! Host-facing descriptions of stations, their slots, and recipe boards.
//!
//! These are plain snapshots: the host fills them in on demand and the core
//! never holds on to a host object. Pots and juicers share one engine; the
//! differences between them are captured by [`StationKind`] and by what the
//! host reports through [`Readiness`] and [`FuelGauge`].

use crate::fixed::Position;
use crate::id::{BoardId, ItemId, RecipeId, SlotId, StationIndex};
use crate::item::ItemStack;
use crate::registry::RecipeKind;
use serde::{Deserialize, Serialize};

/// The station family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    /// Fuel-burning pot.
    CookingPot,
    /// Battery-powered juicer.
    Juicer,
}

impl StationKind {
    /// Whether a station of this kind can cook recipes of `kind`.
    pub fn serves(self, kind: RecipeKind) -> bool {
        matches!(
            (self, kind),
            (StationKind::CookingPot, RecipeKind::CookingPot)
                | (StationKind::Juicer, RecipeKind::Juicer)
        )
    }
}

/// Snapshot of a station as seen by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationInfo {
    pub index: StationIndex,
    pub kind: StationKind,
    pub position: Position,
    /// False while the station is still a placement ghost.
    pub placed: bool,
}

/// Snapshot of one station slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    pub id: SlotId,
    pub contents: Option<ItemStack>,
}

impl SlotView {
    pub fn empty(id: SlotId) -> Self {
        Self { id, contents: None }
    }

    pub fn holding(id: SlotId, item: ItemId) -> Self {
        Self {
            id,
            contents: Some(ItemStack::single(item)),
        }
    }

    pub fn has_item(&self) -> bool {
        self.contents.is_some()
    }

    pub fn item(&self) -> Option<ItemId> {
        self.contents.map(|s| s.item)
    }
}

/// Whether a station can start cooking right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Idle with fuel or power available.
    Idle,
    /// A recipe is already in progress.
    Cooking,
    /// Pot with an empty fuel tank.
    NoFuel,
    /// Juicer with a flat battery.
    NoPower,
}

/// Fuel tank state of a fuel-burning station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelGauge {
    pub fuel_item: ItemId,
    pub current: u32,
    pub max: u32,
}

impl FuelGauge {
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Units that still fit in the tank.
    pub fn headroom(&self) -> u32 {
        self.max.saturating_sub(self.current)
    }
}

/// A placed recipe board: the block showing a recipe that the player looks
/// at to trigger auto-preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub id: BoardId,
    pub recipe: RecipeId,
    pub position: Position,
}
