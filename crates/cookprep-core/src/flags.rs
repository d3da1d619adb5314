//! Reversible highlighting of cost entries that cannot be covered.
//!
//! [`DeficiencyFlags`] remembers each label's original colour the first time
//! it is marked and puts every one back on [`DeficiencyFlags::clear_all`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An RGBA colour with components in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Cost labels of a recipe display, addressed by cost entry index.
pub trait CostLabels {
    /// Current colour of the label, or `None` if there is no such label.
    fn color(&self, index: usize) -> Option<Color>;

    fn set_color(&mut self, index: usize, color: Color);
}

/// Labels with no visual side, for hosts that read
/// [`crate::plan::PreparationPlan::unsatisfied`] directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLabels;

impl CostLabels for NoLabels {
    fn color(&self, _index: usize) -> Option<Color> {
        None
    }

    fn set_color(&mut self, _index: usize, _color: Color) {}
}

#[derive(Debug, Clone, Default)]
pub struct DeficiencyFlags {
    originals: BTreeMap<usize, Color>,
}

impl DeficiencyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the label for `index` with `alert`. The first call per clearing
    /// cycle saves the label's current colour; later calls keep that saved
    /// value. Missing labels are ignored.
    pub fn mark_deficient<L: CostLabels + ?Sized>(&mut self, index: usize, alert: Color, labels: &mut L) {
        if !self.originals.contains_key(&index) {
            let Some(original) = labels.color(index) else {
                return;
            };
            self.originals.insert(index, original);
        }
        labels.set_color(index, alert);
    }

    /// Restore every saved colour and forget them.
    pub fn clear_all<L: CostLabels + ?Sized>(&mut self, labels: &mut L) {
        for (index, color) in std::mem::take(&mut self.originals) {
            labels.set_color(index, color);
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.originals.contains_key(&index)
    }

    /// Number of labels currently marked.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
