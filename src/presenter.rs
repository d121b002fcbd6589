// src/presenter.rs
use std::path::PathBuf;
use anyhow::{Context, Result};
use crate::drivers::{render_display_png, DisplayFrame, PlotStyle};

/// Consumer side of the handoff: draws (or otherwise reports) a frame.
pub trait Presenter {
    fn present(&mut self, frame: &DisplayFrame) -> Result<()>;
}

/// Console presenter: the title line when it changes, full JSON at debug.
#[derive(Default)]
pub struct LogPresenter {
    last_title: Option<String>,
    frames: u64,
}

impl LogPresenter {
    #[cfg(test)]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &DisplayFrame) -> Result<()> {
        self.frames += 1;
        if self.last_title.as_deref() != Some(frame.title.as_str()) {
            log::info!("{}", frame.title);
            if let Some(cursor) = frame.cursor {
                log::info!("cursor: {}", cursor.label());
            }
            self.last_title = Some(frame.title.clone());
        }
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("{}", serde_json::to_string(frame)?);
        }
        Ok(())
    }
}

/// Renders every `every`-th frame to PNG, keeps the bytes and optionally
/// writes them to `path`.
pub struct SnapshotPresenter {
    style: PlotStyle,
    path: Option<PathBuf>,
    every: u64,
    seen: u64,
    latest: Option<Vec<u8>>,
}

impl SnapshotPresenter {
    pub fn new(path: Option<PathBuf>, every: u64) -> Self {
        Self {
            style: PlotStyle::default(),
            path,
            every: every.max(1),
            seen: 0,
            latest: None,
        }
    }
    #[cfg(test)]
    pub fn latest_png(&self) -> Option<&[u8]> {
        self.latest.as_deref()
    }
}

impl Presenter for SnapshotPresenter {
    fn present(&mut self, frame: &DisplayFrame) -> Result<()> {
        self.seen += 1;
        if (self.seen - 1) % self.every != 0 {
            return Ok(());
        }
        let png = render_display_png(frame, &self.style)?;
        if let Some(path) = &self.path {
            std::fs::write(path, &png)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
        }
        self.latest = Some(png);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::Measurement;
    use crate::types::{Mode, ScalingAxis};

    fn frame(title: &str) -> DisplayFrame {
        let volts = vec![0.0, 1.0, -1.0, 0.5];
        DisplayFrame {
            mode: Mode::Live,
            axis: ScalingAxis::Y,
            x: vec![0.0, 1.0, 2.0, 3.0],
            measurement: Measurement::of(&volts),
            volts,
            x_range: (0.0, 1024.0),
            y_range: (-5.0, 5.0),
            cursor: None,
            vpp_text: "Vpp = 2.00 V".into(),
            vmax_text: "Vmax = 1.00 V".into(),
            title: title.into(),
            sample_rate_hz: 250_000.0,
            dominant_hz: 0.0,
            trigger_index: None,
            blank: false,
        }
    }

    #[test]
    fn log_presenter_counts_frames() {
        let mut presenter = LogPresenter::default();
        presenter.present(&frame("a")).unwrap();
        presenter.present(&frame("a")).unwrap();
        presenter.present(&frame("b")).unwrap();
        assert_eq!(presenter.frames(), 3);
        assert_eq!(presenter.last_title.as_deref(), Some("b"));
    }

    #[test]
    fn snapshot_presenter_renders_every_nth_frame() {
        let mut presenter = SnapshotPresenter::new(None, 3);
        presenter.present(&frame("first")).unwrap();
        let first = presenter.latest_png().map(|p| p.to_vec()).unwrap();
        presenter.present(&frame("second")).unwrap();
        assert_eq!(presenter.latest_png(), Some(first.as_slice()));
        assert!(!first.is_empty());
    }
}
