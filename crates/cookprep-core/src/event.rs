//! Events the host delivers after its own state has changed.

use crate::id::{BoardId, SlotId};
use crate::station::{BoardInfo, StationInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A station finished placement.
    StationPlaced(StationInfo),
    /// A station is being destroyed. Ignored for stations that were never
    /// placed (cancelled ghosts).
    StationRemoved(StationInfo),
    /// A station slot gained or lost its item.
    SlotChanged(SlotId),
    /// The player's inventory changed.
    InventoryRefreshed,
    /// A recipe board finished placement.
    BoardPlaced(BoardInfo),
    /// A recipe board is being destroyed.
    BoardRemoved(BoardId),
}

/// Discriminant tag for host events, used in logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
    StationPlaced,
    StationRemoved,
    SlotChanged,
    InventoryRefreshed,
    BoardPlaced,
    BoardRemoved,
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::StationPlaced(_) => HostEventKind::StationPlaced,
            HostEvent::StationRemoved(_) => HostEventKind::StationRemoved,
            HostEvent::SlotChanged(_) => HostEventKind::SlotChanged,
            HostEvent::InventoryRefreshed => HostEventKind::InventoryRefreshed,
            HostEvent::BoardPlaced(_) => HostEventKind::BoardPlaced,
            HostEvent::BoardRemoved(_) => HostEventKind::BoardRemoved,
        }
    }
}
