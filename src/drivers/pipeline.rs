use serde::Serialize;
use crate::drivers::calibrate::{calibrate, CalibratedFrame};
use crate::drivers::error::ScopeError;
use crate::drivers::fft::SpectrumAnalyzer;
use crate::drivers::link::Link;
use crate::drivers::measure::{read_cursor, CursorReadout, Measurement};
use crate::drivers::mode::ModeController;
use crate::drivers::source::SpiTransport;
use crate::drivers::trigger::{
    threshold_code_from_steps, TriggerEngine, TriggerWindow, DEFAULT_THRESHOLD_CODE,
    OFFSET_QUANTUM,
};
use crate::drivers::zoom::ZoomState;
use crate::input::ControlInputs;
use crate::types::{Mode, ScalingAxis, StepCounters};
/// Everything the renderer needs for one cycle. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct DisplayFrame {
    pub mode: Mode,
    pub axis: ScalingAxis,
    /// Sample index in `Live`, microseconds from the trigger otherwise.
    #[serde(skip)]
    pub x: Vec<f32>,
    #[serde(skip)]
    pub volts: Vec<f32>,
    pub x_range: (f32, f32),
    pub y_range: (f32, f32),
    pub cursor: Option<CursorReadout>,
    pub measurement: Option<Measurement>,
    pub vpp_text: String,
    pub vmax_text: String,
    pub title: String,
    pub sample_rate_hz: f32,
    pub dominant_hz: f32,
    pub trigger_index: Option<usize>,
    pub blank: bool,
}
impl DisplayFrame {
    #[cfg(test)]
    pub fn samples(&self) -> usize {
        self.volts.len()
    }
}
#[derive(Debug)]
pub enum CycleOutcome {
    Display(DisplayFrame),
    /// Trigger armed but no crossing; carries the blank frame to show.
    NoTrigger(DisplayFrame),
    /// Frame rejected; nothing to show this cycle.
    Dropped(ScopeError),
}
/// Mutable state carried from cycle to cycle.
#[derive(Clone, Debug)]
pub struct ScopeContext {
    pub modes: ModeController,
    pub zoom: ZoomState,
    pub threshold_code: u16,
    pub offset_samples: i64,
    pub counters: StepCounters,
}
impl Default for ScopeContext {
    fn default() -> Self {
        Self {
            modes: ModeController::new(),
            zoom: ZoomState::default(),
            threshold_code: DEFAULT_THRESHOLD_CODE,
            offset_samples: 0,
            counters: StepCounters::default(),
        }
    }
}
impl ScopeContext {
    /// Consumes pending edges, then samples the counters once.
    pub fn begin_cycle<I: ControlInputs + ?Sized>(&mut self, inputs: &mut I) {
        for edge in inputs.drain_edges() {
            self.modes.handle_edge(edge, &mut self.zoom, inputs);
        }
        self.counters = inputs.counters();
        self.zoom.apply(self.counters.scale);
        match self.modes.mode() {
            Mode::Live => {}
            Mode::Trigger => {
                self.threshold_code = threshold_code_from_steps(self.counters.primary);
                self.offset_samples = 0;
            }
            Mode::Measure | Mode::TriggerOffset => {
                self.offset_samples = self.counters.primary.saturating_mul(OFFSET_QUANTUM);
            }
        }
    }
    fn title(&self, dominant_hz: f32, measurement: Option<&Measurement>) -> String {
        let mode = self.modes.mode().label();
        let axis = self.zoom.axis.label();
        match measurement {
            Some(m) => format!(
                "{dominant_hz:.2} Hz | Vpp: {:.2} V | Vmax: {:.2} V | Mode: {mode} | Scale: {axis}",
                m.vpp, m.vmax
            ),
            None => format!("{dominant_hz:.2} Hz | no trigger | Mode: {mode} | Scale: {axis}"),
        }
    }
}
/// Acquire, calibrate and analyse one frame per call.
pub struct ScopePipeline<T: SpiTransport> {
    link: Link<T>,
    spectrum: SpectrumAnalyzer,
    context: ScopeContext,
    frame_words: usize,
}
impl<T: SpiTransport> ScopePipeline<T> {
    pub fn new(link: Link<T>, frame_words: usize) -> Self {
        Self {
            link,
            spectrum: SpectrumAnalyzer::new(),
            context: ScopeContext::default(),
            frame_words,
        }
    }
    pub fn context(&self) -> &ScopeContext {
        &self.context
    }
    /// Link errors come back as `Err`; a bad frame is `Dropped`.
    pub fn cycle<I: ControlInputs + ?Sized>(
        &mut self,
        inputs: &mut I,
    ) -> Result<CycleOutcome, ScopeError> {
        self.context.begin_cycle(inputs);
        self.link.sync()?;
        let words = self.link.read(self.frame_words)?;
        let frame = match calibrate(&words, self.frame_words) {
            Ok(frame) => frame,
            Err(e) if !e.is_fatal() => {
                log::warn!("dropping frame: {e}");
                return Ok(CycleOutcome::Dropped(e));
            }
            Err(e) => return Err(e),
        };
        let dominant_hz = self
            .spectrum
            .dominant_frequency(&frame.volts, frame.sample_rate_hz)
            .unwrap_or(0.0);
        log::debug!(
            "frame: fs {:.0} Hz, dominant {:.2} Hz",
            frame.sample_rate_hz,
            dominant_hz
        );
        if !self.context.modes.mode().uses_trigger() {
            return Ok(CycleOutcome::Display(self.live_frame(frame, dominant_hz)));
        }
        let engine = TriggerEngine::new(self.context.threshold_code, self.context.offset_samples);
        match engine.capture(&frame.volts, frame.sample_rate_hz) {
            Some(window) => {
                log::debug!("trigger at {} window {}..{}", window.trigger_index, window.start, window.end);
                Ok(CycleOutcome::Display(self.window_frame(&frame, window, dominant_hz)))
            }
            None => Ok(CycleOutcome::NoTrigger(self.blank_frame(&frame, dominant_hz))),
        }
    }
    fn live_frame(&self, frame: CalibratedFrame, dominant_hz: f32) -> DisplayFrame {
        let ctx = &self.context;
        let measurement = Measurement::of(&frame.volts);
        DisplayFrame {
            mode: ctx.modes.mode(),
            axis: ctx.zoom.axis,
            x: (0..frame.volts.len()).map(|i| i as f32).collect(),
            x_range: (0.0, ctx.zoom.x_window() as f32),
            y_range: ctx.zoom.y_range(),
            cursor: None,
            vpp_text: measurement.map(|m| m.vpp_text()).unwrap_or_default(),
            vmax_text: measurement.map(|m| m.vmax_text()).unwrap_or_default(),
            title: ctx.title(dominant_hz, measurement.as_ref()),
            measurement,
            sample_rate_hz: frame.sample_rate_hz,
            dominant_hz,
            trigger_index: None,
            blank: false,
            volts: frame.volts,
        }
    }
    fn window_frame(
        &mut self,
        frame: &CalibratedFrame,
        window: TriggerWindow,
        dominant_hz: f32,
    ) -> DisplayFrame {
        let cursor_steps = self.context.counters.cursor;
        let cursor = read_cursor(
            self.context.modes.cursor_mut(),
            cursor_steps,
            &window.segment,
            &window.relative_us,
        );
        let ctx = &self.context;
        let measurement = Measurement::of(&window.segment);
        DisplayFrame {
            mode: ctx.modes.mode(),
            axis: ctx.zoom.axis,
            x_range: window.time_span_us(),
            y_range: ctx.zoom.y_range(),
            cursor,
            vpp_text: measurement.map(|m| m.vpp_text()).unwrap_or_default(),
            vmax_text: measurement.map(|m| m.vmax_text()).unwrap_or_default(),
            title: ctx.title(dominant_hz, measurement.as_ref()),
            measurement,
            sample_rate_hz: frame.sample_rate_hz,
            dominant_hz,
            trigger_index: Some(window.trigger_index),
            blank: false,
            x: window.relative_us,
            volts: window.segment,
        }
    }
    fn blank_frame(&self, frame: &CalibratedFrame, dominant_hz: f32) -> DisplayFrame {
        let ctx = &self.context;
        DisplayFrame {
            mode: ctx.modes.mode(),
            axis: ctx.zoom.axis,
            x: Vec::new(),
            volts: Vec::new(),
            x_range: (0.0, ctx.zoom.x_window() as f32),
            y_range: ctx.zoom.y_range(),
            cursor: None,
            measurement: None,
            vpp_text: String::new(),
            vmax_text: String::new(),
            title: ctx.title(dominant_hz, None),
            sample_rate_hz: frame.sample_rate_hz,
            dominant_hz,
            trigger_index: None,
            blank: true,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::link::FRAME_WORDS;
    use crate::drivers::source::SimulatedPeripheral;
    use crate::drivers::trigger::WINDOW_SAMPLES;
    use crate::input::SharedInputs;
    use crate::types::ButtonEdge;
    use std::time::Duration;
    fn pipeline(frame_words: usize) -> ScopePipeline<SimulatedPeripheral> {
        let sim = SimulatedPeripheral::new(FRAME_WORDS, 42).with_timebase(255);
        let link = Link::with_timing(sim, 2048, Duration::ZERO);
        ScopePipeline::new(link, frame_words)
    }
    fn expect_display(outcome: CycleOutcome) -> DisplayFrame {
        match outcome {
            CycleOutcome::Display(frame) => frame,
            other => panic!("expected a display frame, got {other:?}"),
        }
    }
    #[test]
    fn live_cycle_shows_full_frame() {
        let mut scope = pipeline(FRAME_WORDS);
        let mut inputs = SharedInputs::new();
        let frame = expect_display(scope.cycle(&mut inputs).unwrap());
        assert_eq!(frame.mode, Mode::Live);
        assert_eq!(frame.samples(), FRAME_WORDS - 1);
        assert_eq!(frame.x_range, (0.0, 1024.0));
        assert_eq!(frame.y_range, (-5.0, 5.0));
        assert_eq!(frame.sample_rate_hz, 250_000.0);
        assert!((frame.dominant_hz - 10_000.0).abs() < 50.0);
        let m = frame.measurement.unwrap();
        assert!((m.vpp - 5.0).abs() < 0.2);
        assert!(frame.title.contains("Mode: LIVE"));
        assert!(frame.title.contains("Scale: Y"));
        assert!(frame.vpp_text.starts_with("Vpp = "));
        assert!(frame.cursor.is_none());
    }
    #[test]
    fn trigger_cycle_returns_fixed_window() {
        let mut scope = pipeline(FRAME_WORDS);
        let mut inputs = SharedInputs::new();
        inputs.step_primary(4);
        inputs.press(ButtonEdge::ModeAdvance);
        let frame = expect_display(scope.cycle(&mut inputs).unwrap());
        assert_eq!(frame.mode, Mode::Trigger);
        assert_eq!(scope.context().threshold_code, 2048);
        assert_eq!(frame.samples(), WINDOW_SAMPLES);
        assert_eq!(frame.x.len(), WINDOW_SAMPLES);
        assert!(frame.trigger_index.is_some());
        assert!(frame.x_range.0 <= 0.0 && 0.0 <= frame.x_range.1);
        assert!(frame.title.contains("Mode: TRIGGER"));
    }
    #[test]
    fn unreachable_threshold_blanks_the_display() {
        let mut scope = pipeline(FRAME_WORDS);
        let mut inputs = SharedInputs::new();
        inputs.press(ButtonEdge::ModeAdvance);
        expect_display(scope.cycle(&mut inputs).unwrap());
        inputs.step_primary(300);
        match scope.cycle(&mut inputs).unwrap() {
            CycleOutcome::NoTrigger(frame) => {
                assert!(frame.blank);
                assert!(frame.volts.is_empty());
                assert_eq!(frame.x_range, (0.0, 1024.0));
                assert!(frame.vpp_text.is_empty());
            }
            other => panic!("expected no trigger, got {other:?}"),
        }
        assert_eq!(scope.context().threshold_code, 4095);
    }
    #[test]
    fn measure_cursor_reads_window_sample() {
        let mut scope = pipeline(FRAME_WORDS);
        let mut inputs = SharedInputs::new();
        inputs.press(ButtonEdge::ModeAdvance);
        inputs.press(ButtonEdge::ModeAdvance);
        inputs.press(ButtonEdge::CursorToggle);
        inputs.step_cursor(WINDOW_SAMPLES as i64 + 5);
        let frame = expect_display(scope.cycle(&mut inputs).unwrap());
        assert_eq!(frame.mode, Mode::Measure);
        let cursor = frame.cursor.unwrap();
        assert_eq!(cursor.index, 5);
        assert_eq!(cursor.volts, frame.volts[5]);
        assert_eq!(cursor.time_us, frame.x[5]);
    }
    #[test]
    fn offset_follows_primary_in_measure_and_offset_modes() {
        let mut scope = pipeline(FRAME_WORDS);
        let mut inputs = SharedInputs::new();
        inputs.press(ButtonEdge::ModeAdvance);
        inputs.press(ButtonEdge::ModeAdvance);
        scope.cycle(&mut inputs).unwrap();
        inputs.step_primary(-3);
        scope.cycle(&mut inputs).unwrap();
        assert_eq!(scope.context().offset_samples, -30);
        inputs.press(ButtonEdge::ModeAdvance);
        inputs.step_primary(-2);
        scope.cycle(&mut inputs).unwrap();
        assert_eq!(scope.context().modes.mode(), Mode::TriggerOffset);
        assert_eq!(scope.context().offset_samples, -50);
    }
    #[test]
    fn dominant_frequency_tracks_the_tone() {
        let sim = SimulatedPeripheral::new(FRAME_WORDS, 9)
            .with_timebase(255)
            .with_tone(5_000.0, 1.0)
            .with_noise(0);
        let mut scope = ScopePipeline::new(Link::with_timing(sim, 2048, Duration::ZERO), FRAME_WORDS);
        let frame = expect_display(scope.cycle(&mut SharedInputs::new()).unwrap());
        assert!((frame.dominant_hz - 5_000.0).abs() < 50.0);
        assert!((frame.measurement.unwrap().vpp - 2.0).abs() < 0.02);
        assert!(frame.title.starts_with(&format!("{:.2} Hz", frame.dominant_hz)));
    }
    #[test]
    fn malformed_frame_is_dropped() {
        let mut scope = pipeline(1);
        let mut inputs = SharedInputs::new();
        assert!(matches!(
            scope.cycle(&mut inputs).unwrap(),
            CycleOutcome::Dropped(ScopeError::MalformedFrame { .. })
        ));
    }
    struct DeadTransport;
    impl SpiTransport for DeadTransport {
        fn write(&mut self, _bytes: &[u8]) -> Result<(), ScopeError> {
            Err(ScopeError::Io(std::io::Error::other("unplugged")))
        }
        fn transfer(&mut self, _tx: &[u8], _rx: &mut [u8]) -> Result<(), ScopeError> {
            Err(ScopeError::Io(std::io::Error::other("unplugged")))
        }
    }
    #[test]
    fn link_failure_is_fatal() {
        let link = Link::with_timing(DeadTransport, 2048, Duration::ZERO);
        let mut scope = ScopePipeline::new(link, FRAME_WORDS);
        let err = scope.cycle(&mut SharedInputs::new()).unwrap_err();
        assert!(err.is_fatal());
    }
}
