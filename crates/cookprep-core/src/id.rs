use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a live preparation calculator inside the coordinator.
    pub struct CalculatorId;
}

/// Identifies an item type in the registry. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Identifies a recipe in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Stable host-side index of a placed station. Survives reference churn in
/// the host, so bindings compare on this rather than on object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationIndex(pub u32);

/// Stable host-side index of a placed recipe board (the block that displays
/// a recipe and that the player looks at).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardId(pub u32);

/// Identifies one ingredient slot on a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub station: StationIndex,
    pub index: u16,
}

impl SlotId {
    pub fn new(station: StationIndex, index: u16) -> Self {
        Self { station, index }
    }
}
