//! Nearest-station binding for one recipe board.

use crate::error::PrepError;
use crate::fixed::{Fixed64, Position};
use crate::id::StationIndex;
use crate::registry::RecipeKind;
use crate::station::StationInfo;

/// Pick the closest eligible station.
///
/// A candidate is eligible when it is placed, serves `kind`, and lies within
/// `max_distance` of `origin` (inclusive). Equal distances go to whichever
/// candidate comes first, so the host's iteration order decides ties.
pub fn bind_nearest<'a, I>(
    candidates: I,
    origin: Position,
    max_distance: Fixed64,
    kind: RecipeKind,
) -> Option<StationInfo>
where
    I: IntoIterator<Item = &'a StationInfo>,
{
    let mut best: Option<(Fixed64, StationInfo)> = None;
    for candidate in candidates {
        if !is_eligible(candidate, origin, max_distance, kind) {
            continue;
        }
        let dist = origin.distance_sq(&candidate.position);
        if best.is_none_or(|(best_dist, _)| dist < best_dist) {
            best = Some((dist, *candidate));
        }
    }
    best.map(|(_, station)| station)
}

fn is_eligible(station: &StationInfo, origin: Position, max_distance: Fixed64, kind: RecipeKind) -> bool {
    station.placed && station.kind.serves(kind) && origin.within(&station.position, max_distance)
}

/// Holds the single station a recipe board is currently bound to.
#[derive(Debug, Clone)]
pub struct StationBinder {
    origin: Position,
    max_distance: Fixed64,
    kind: RecipeKind,
    bound: Option<StationInfo>,
}

impl StationBinder {
    pub fn new(origin: Position, max_distance: Fixed64, kind: RecipeKind) -> Self {
        Self {
            origin,
            max_distance,
            kind,
            bound: None,
        }
    }

    pub fn bound(&self) -> Option<&StationInfo> {
        self.bound.as_ref()
    }

    pub fn bound_index(&self) -> Option<StationIndex> {
        self.bound.map(|s| s.index)
    }

    /// The bound station, or [`PrepError::NoEligibleStation`].
    pub fn require(&self) -> Result<StationIndex, PrepError> {
        self.bound_index()
            .ok_or(PrepError::NoEligibleStation { kind: self.kind })
    }

    /// Rebind to the nearest eligible candidate. Returns true if the binding
    /// changed.
    pub fn rebind<'a, I>(&mut self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a StationInfo>,
    {
        let nearest = bind_nearest(candidates, self.origin, self.max_distance, self.kind);
        self.set(nearest)
    }

    /// A station finished placement. Takes it if it is eligible and strictly
    /// closer than the current binding. Returns true if the binding changed.
    pub fn on_station_placed(&mut self, station: &StationInfo) -> bool {
        if !is_eligible(station, self.origin, self.max_distance, self.kind) {
            return false;
        }
        let new_dist = self.origin.distance_sq(&station.position);
        let closer = match &self.bound {
            None => true,
            Some(current) => new_dist < self.origin.distance_sq(&current.position),
        };
        closer && self.set(Some(*station))
    }

    /// A station was removed. Clears the binding if it was the bound one.
    /// Returns true if the binding changed.
    pub fn on_station_removed(&mut self, index: StationIndex) -> bool {
        if self.bound_index() != Some(index) {
            return false;
        }
        self.set(None)
    }

    pub fn clear(&mut self) -> bool {
        self.set(None)
    }

    fn set(&mut self, station: Option<StationInfo>) -> bool {
        let changed = self.bound_index() != station.map(|s| s.index);
        self.bound = station;
        changed
    }
}
