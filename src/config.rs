// src/config.rs
use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::drivers::link::{FRAME_WORDS, MAX_CHUNK_WORDS};

/// Runtime knobs. Defaults match the peripheral's fixed protocol; only
/// the bridge port and snapshot path come from the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Serial SPI bridge; `None` runs against the simulated peripheral.
    pub port: Option<String>,
    pub baud_rate: u32,
    pub io_timeout_ms: u64,
    pub frame_words: usize,
    pub chunk_words: usize,
    pub settle_ms: u64,
    pub idle_tick_ms: u64,
    /// Blank redraws per no-trigger cycle before the next acquisition.
    pub idle_ticks: u32,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 2_000_000,
            io_timeout_ms: 500,
            frame_words: FRAME_WORDS,
            chunk_words: MAX_CHUNK_WORDS,
            settle_ms: 1,
            idle_tick_ms: 5,
            idle_ticks: 1,
            snapshot_path: None,
        }
    }
}

impl ScopeConfig {
    pub const PORT_ENV: &'static str = "SCOPE_PORT";
    pub const SNAPSHOT_ENV: &'static str = "SCOPE_SNAPSHOT";

    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(Self::PORT_ENV).ok(),
            std::env::var(Self::SNAPSHOT_ENV).ok(),
        )
    }

    fn with_overrides(mut self, port: Option<String>, snapshot: Option<String>) -> Self {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.port = Some(port.trim().to_string());
        }
        if let Some(path) = snapshot.filter(|p| !p.trim().is_empty()) {
            self.snapshot_path = Some(PathBuf::from(path.trim()));
        }
        self
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
    pub fn idle_tick(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }
}
