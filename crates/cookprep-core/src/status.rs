//! Interaction states and the status lines shown for each.

use crate::registry::RecipeKind;
use std::fmt;

/// Why a focused board cannot prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// This many cost entries cannot be covered by slots plus inventory.
    MissingIngredients(usize),
    /// Slot and item counts disagree; see the diagnostic log.
    Inconsistent,
}

/// Why a fully prepared station cannot start cooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyReason {
    Cooking,
    NoFuel,
    NoPower,
}

/// Where a calculator sits in the interaction flow after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// Not focused, or the observation was gated out.
    #[default]
    Idle,
    /// Focused but no eligible station nearby.
    FocusedUnbound,
    Blocked(BlockReason),
    /// A plan exists and confirm will apply it.
    ReadyToPrepare,
    /// Slots already hold the recipe and confirm will start cooking.
    ReadyToCook,
    Busy(BusyReason),
}

impl InteractionState {
    pub fn is_focused(self) -> bool {
        self != InteractionState::Idle
    }
}

/// The second line of a status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusText {
    NoStation(RecipeKind),
    Missing(usize),
    UnableToPrepare,
    StationBusy(RecipeKind),
    NoFuel(RecipeKind),
    NoPower(RecipeKind),
    StartCooking,
    Prepare,
}

impl StatusText {
    /// Whether the line invites the confirm input.
    pub fn wants_confirm(self) -> bool {
        matches!(self, StatusText::StartCooking | StatusText::Prepare)
    }
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusText::NoStation(kind) => write!(f, "No {kind} in proximity"),
            StatusText::Missing(n) => write!(f, "Missing {n} ingredients"),
            StatusText::UnableToPrepare => f.write_str("Unable to auto-prepare, check logs"),
            StatusText::StationBusy(kind) => write!(f, "Prepared, but {kind} is busy"),
            StatusText::NoFuel(kind) => write!(f, "No fuel in {kind}"),
            StatusText::NoPower(kind) => write!(f, "No power in {kind}"),
            StatusText::StartCooking => f.write_str("Start cooking"),
            StatusText::Prepare => f.write_str("Prepare"),
        }
    }
}

/// A status display: the recipe's result name over one status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub title: String,
    pub text: StatusText,
    /// Show the confirm key next to the text.
    pub confirm_hint: bool,
}

impl Status {
    pub fn new(title: impl Into<String>, text: StatusText) -> Self {
        Self {
            title: title.into(),
            text,
            confirm_hint: text.wants_confirm(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.text)
    }
}
