//! Rising-edge trigger search and fixed-width windowing around the hit.
/// Samples in every trigger window.
pub const WINDOW_SAMPLES: usize = 1024;
/// Offset counter steps are this many samples apart.
pub const OFFSET_QUANTUM: i64 = 10;
/// Threshold codes per volt for the trigger comparator. Tuned independently
/// of the ADC transform even though the two currently agree.
pub const THRESHOLD_CODES_PER_VOLT: f32 = 409.5;
pub const THRESHOLD_OFFSET_VOLTS: f32 = 5.0;
pub const DEFAULT_THRESHOLD_CODE: u16 = 2048;
/// Threshold codes per primary counter step.
pub const THRESHOLD_STEP_CODES: i64 = 10;
pub fn threshold_voltage(threshold_code: u16) -> f32 {
    threshold_code as f32 / THRESHOLD_CODES_PER_VOLT - THRESHOLD_OFFSET_VOLTS
}
/// Threshold code selected by the primary counter while arming.
pub fn threshold_code_from_steps(steps: i64) -> u16 {
    (DEFAULT_THRESHOLD_CODE as i64)
        .saturating_add(steps.saturating_mul(THRESHOLD_STEP_CODES))
        .clamp(0, 4095) as u16
}
/// First index `i` in `1..len-1` with `signal[i-1] <= level < signal[i+1]`.
pub fn find_rising_edge(signal: &[f32], level: f32) -> Option<usize> {
    if signal.len() < 3 {
        return None;
    }
    (1..signal.len() - 1).find(|&i| signal[i - 1] <= level && level < signal[i + 1])
}
/// Slice of the signal around a trigger plus its time axis in microseconds
/// relative to the trigger sample.
#[derive(Clone, Debug)]
pub struct TriggerWindow {
    pub trigger_index: usize,
    pub start: usize,
    pub end: usize,
    pub segment: Vec<f32>,
    pub relative_us: Vec<f32>,
}
impl TriggerWindow {
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.segment.len()
    }
    pub fn time_span_us(&self) -> (f32, f32) {
        match (self.relative_us.first(), self.relative_us.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 0.0),
        }
    }
}
/// `[start, end)` of the window anchored at `trigger_index + offset`,
/// pulled back from the end so the width stays fixed when possible.
pub fn window_bounds(len: usize, trigger_index: usize, offset: i64, width: usize) -> (usize, usize) {
    let anchor = (trigger_index as i64).saturating_add(offset).max(0) as usize;
    let mut start = anchor.min(len);
    let mut end = start.saturating_add(width);
    if end > len {
        end = len;
        start = end.saturating_sub(width);
    }
    (start, end)
}
pub struct TriggerEngine {
    threshold_code: u16,
    offset_samples: i64,
}
impl TriggerEngine {
    pub fn new(threshold_code: u16, offset_samples: i64) -> Self {
        Self {
            threshold_code: threshold_code.min(4095),
            offset_samples,
        }
    }
    pub fn threshold_volts(&self) -> f32 {
        threshold_voltage(self.threshold_code)
    }
    pub fn locate(&self, signal: &[f32]) -> Option<usize> {
        find_rising_edge(signal, self.threshold_volts())
    }
    /// `None` means no crossing this cycle; the caller blanks and retries.
    pub fn capture(&self, signal: &[f32], sample_rate_hz: f32) -> Option<TriggerWindow> {
        let trigger_index = self.locate(signal)?;
        let (start, end) = window_bounds(signal.len(), trigger_index, self.offset_samples, WINDOW_SAMPLES);
        let relative_us = (start..end)
            .map(|i| (i as f32 - trigger_index as f32) / sample_rate_hz * 1e6)
            .collect();
        Some(TriggerWindow {
            trigger_index,
            start,
            end,
            segment: signal[start..end].to_vec(),
            relative_us,
        })
    }
}
