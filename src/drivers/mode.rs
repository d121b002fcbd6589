use crate::drivers::measure::CursorState;
use crate::drivers::zoom::ZoomState;
use crate::input::ControlInputs;
use crate::types::{ButtonEdge, Mode};
/// Four-state mode cycle driven by button edges. Owns the cursor flag,
/// which only lives while in `Measure`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModeController {
    mode: Mode,
    cursor: CursorState,
}
impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    #[cfg(test)]
    pub fn cursor(&self) -> CursorState {
        self.cursor
    }
    pub fn cursor_mut(&mut self) -> &mut CursorState {
        &mut self.cursor
    }
    pub fn handle_edge<I: ControlInputs + ?Sized>(
        &mut self,
        edge: ButtonEdge,
        zoom: &mut ZoomState,
        inputs: &mut I,
    ) {
        match edge {
            ButtonEdge::ModeAdvance => {
                self.advance(inputs);
            }
            ButtonEdge::ScaleAxisToggle => {
                zoom.toggle_axis();
            }
            ButtonEdge::CursorToggle => {
                self.toggle_cursor();
            }
        }
    }
    /// Moves to the next mode. Entering `Trigger` or `Measure` zeroes the
    /// primary counter; entering `TriggerOffset` keeps it as the offset.
    pub fn advance<I: ControlInputs + ?Sized>(&mut self, inputs: &mut I) -> Mode {
        let from = self.mode;
        let to = from.next();
        if from == Mode::Measure {
            self.cursor = CursorState::default();
        }
        if matches!(to, Mode::Trigger | Mode::Measure) {
            inputs.zero_primary();
        }
        self.mode = to;
        log::info!("mode: {} -> {}", from.label(), to.label());
        to
    }
    /// Only honoured in `Measure`; returns the resulting cursor flag.
    pub fn toggle_cursor(&mut self) -> bool {
        if self.mode == Mode::Measure {
            self.cursor.enabled = !self.cursor.enabled;
            log::info!("cursor: {}", if self.cursor.enabled { "ON" } else { "OFF" });
        } else {
            log::debug!("cursor toggle ignored in {}", self.mode.label());
        }
        self.cursor.enabled
    }
}
