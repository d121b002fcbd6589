use crate::types::ScalingAxis;
pub const FULL_RANGE_VOLTS: f32 = 10.0;
pub const MIN_RANGE_VOLTS: f32 = 0.5;
/// Codes per vertical zoom step, out of a 4096-code full scale.
pub const Y_ZOOM_STEP_CODES: f32 = 400.0;
pub const BASE_X_WINDOW: usize = 1024;
pub const MAX_X_SHIFT: u32 = 6;
pub const MIN_X_WINDOW: usize = 16;
pub const MAX_X_WINDOW: usize = 8192;
/// Symmetric vertical range for a step count. Negative steps zoom out.
pub fn y_range(y_steps: i64) -> (f32, f32) {
    let per_step = FULL_RANGE_VOLTS / (4096.0 / Y_ZOOM_STEP_CODES);
    let range = (FULL_RANGE_VOLTS - y_steps as f32 * per_step).max(MIN_RANGE_VOLTS);
    (-range / 2.0, range / 2.0)
}
/// Horizontal span in samples; each step halves it, down to 16.
pub fn x_window(x_steps: i64) -> usize {
    let level = x_steps.clamp(0, MAX_X_SHIFT as i64) as u32;
    (BASE_X_WINDOW >> level).clamp(MIN_X_WINDOW, MAX_X_WINDOW)
}
/// Scale counter is latched into whichever axis is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZoomState {
    pub axis: ScalingAxis,
    pub y_steps: i64,
    pub x_steps: i64,
}
impl ZoomState {
    pub fn toggle_axis(&mut self) -> ScalingAxis {
        self.axis = self.axis.toggled();
        log::info!("scaling axis: {}", self.axis.label());
        self.axis
    }
    pub fn apply(&mut self, scale_steps: i64) {
        match self.axis {
            ScalingAxis::Y => self.y_steps = scale_steps,
            ScalingAxis::X => self.x_steps = scale_steps.max(0),
        }
    }
    pub fn y_range(&self) -> (f32, f32) {
        y_range(self.y_steps)
    }
    /// Horizontal zoom only takes effect while the X axis is selected.
    pub fn x_window(&self) -> usize {
        match self.axis {
            ScalingAxis::X => x_window(self.x_steps),
            ScalingAxis::Y => x_window(0),
        }
    }
}
