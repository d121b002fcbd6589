// src/drivers/mod.rs
pub mod calibrate;
pub mod error;
pub mod fft;
pub mod handoff;
pub mod link;
pub mod measure;
pub mod mode;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod trigger;
pub mod zoom;
pub use calibrate::{calibrate, CalibratedFrame};
pub use error::ScopeError;
pub use fft::{FrequencySpectrum, SpectrumAnalyzer};
pub use handoff::LatestSlot;
pub use link::Link;
pub use measure::{CursorReadout, CursorState, Measurement};
pub use mode::ModeController;
pub use pipeline::{CycleOutcome, DisplayFrame, ScopeContext, ScopePipeline};
pub use plot::{render_display_png, PlotStyle};
pub use source::{SerialBridge, SimulatedPeripheral, SpiTransport};
pub use trigger::{TriggerEngine, TriggerWindow};
pub use zoom::ZoomState;
