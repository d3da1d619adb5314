use crate::id::{ItemId, SlotId};
use crate::registry::RecipeKind;

/// Non-fatal preparation failures. Each one is recovered locally and shows up
/// only as a status line and a diagnostic log event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrepError {
    /// The slot refused the planned item; that pair is skipped.
    #[error("item {item:?} can not be placed in slot {slot:?}")]
    IncompatibleSlotItem { slot: SlotId, item: ItemId },

    /// The plan pairs a different number of slots and items.
    #[error("{slots} slots should be replaced, but there are {items} items to place")]
    PlanInconsistency { slots: usize, items: usize },

    /// Some cost entries cannot be covered, so nothing is placed.
    #[error("{missing} ingredients are missing")]
    MissingIngredients { missing: usize },

    #[error("no {kind} in proximity")]
    NoEligibleStation { kind: RecipeKind },
}
