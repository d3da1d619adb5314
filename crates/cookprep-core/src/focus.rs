/// Detects focus loss the host failed to report.
///
/// Some hosts skip the exit callback when the player's view jumps straight
/// from one board to another within a single frame. The tracker notices a
/// board that was observed in the previous frame but not in the one that
/// just ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusTracker {
    this_frame: bool,
    last_frame: bool,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_observed(&mut self) {
        self.this_frame = true;
    }

    /// Close the current frame. Returns true if focus was silently lost.
    pub fn end_frame(&mut self) -> bool {
        if self.last_frame && !self.this_frame {
            self.reset();
            return true;
        }
        self.last_frame = self.this_frame;
        self.this_frame = false;
        false
    }

    pub fn reset(&mut self) {
        self.this_frame = false;
        self.last_frame = false;
    }
}
