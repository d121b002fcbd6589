// src/engine.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use anyhow::{Context, Result};
use crate::config::ScopeConfig;
use crate::drivers::{
    CycleOutcome, DisplayFrame, LatestSlot, Link, ScopeError, ScopePipeline, SerialBridge,
    SimulatedPeripheral, SpiTransport,
};
use crate::input::ControlInputs;

/// Counters reported when the acquisition loop ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub displayed: u64,
    pub idle: u64,
    pub dropped: u64,
}

pub type BoxedTransport = Box<dyn SpiTransport + Send>;

pub fn open_transport(cfg: &ScopeConfig) -> Result<BoxedTransport> {
    match &cfg.port {
        Some(port) => {
            let bridge = SerialBridge::open(port, cfg.baud_rate, cfg.io_timeout())
                .with_context(|| format!("opening SPI bridge on {port}"))?;
            log::info!("using SPI bridge on {}", bridge.port_name());
            Ok(Box::new(bridge))
        }
        None => {
            log::info!("no {} set, using simulated peripheral", ScopeConfig::PORT_ENV);
            Ok(Box::new(SimulatedPeripheral::new(cfg.frame_words, 0x5C09E)))
        }
    }
}

/// Runs cycles until `running` clears, `limit` cycles have run, or the link
/// fails. When armed without a crossing the blank frame is republished for
/// a bounded number of idle ticks before the next acquisition.
pub fn run_cycles<T, I>(
    pipeline: &mut ScopePipeline<T>,
    inputs: &mut I,
    slot: &LatestSlot<DisplayFrame>,
    running: &AtomicBool,
    cfg: &ScopeConfig,
    limit: Option<u64>,
) -> Result<CycleStats, ScopeError>
where
    T: SpiTransport,
    I: ControlInputs + ?Sized,
{
    let mut stats = CycleStats::default();
    while running.load(Ordering::SeqCst) && limit.map_or(true, |max| stats.cycles < max) {
        stats.cycles += 1;
        match pipeline.cycle(inputs) {
            Ok(CycleOutcome::Display(frame)) => {
                stats.displayed += 1;
                slot.publish(frame);
            }
            Ok(CycleOutcome::NoTrigger(blank)) => {
                for _ in 0..cfg.idle_ticks.max(1) {
                    stats.idle += 1;
                    slot.publish(blank.clone());
                    thread::sleep(cfg.idle_tick());
                    if !running.load(Ordering::SeqCst) {
                        break;
                    }
                }
            }
            Ok(CycleOutcome::Dropped(_)) => {
                stats.dropped += 1;
            }
            Err(e) => {
                log::error!("acquisition stopped after {} cycles: {e}", stats.cycles);
                return Err(e);
            }
        }
    }
    Ok(stats)
}

/// Starts the acquisition thread. The link is opened and released inside
/// the thread, so it is closed on every exit path.
pub fn spawn_acquisition<I>(
    cfg: ScopeConfig,
    mut inputs: I,
    slot: Arc<LatestSlot<DisplayFrame>>,
    running: Arc<AtomicBool>,
) -> JoinHandle<Result<CycleStats>>
where
    I: ControlInputs + Send + 'static,
{
    thread::spawn(move || {
        let transport = open_transport(&cfg)?;
        acquire(transport, &cfg, &mut inputs, &slot, &running)
    })
}

/// Body of the acquisition thread. The link lives in this frame, so it is
/// released on return whether the loop was cancelled or failed.
pub fn acquire<T, I>(
    transport: T,
    cfg: &ScopeConfig,
    inputs: &mut I,
    slot: &LatestSlot<DisplayFrame>,
    running: &AtomicBool,
) -> Result<CycleStats>
where
    T: SpiTransport,
    I: ControlInputs + ?Sized,
{
    let link = Link::with_timing(transport, cfg.chunk_words, cfg.settle());
    let mut pipeline = ScopePipeline::new(link, cfg.frame_words);
    let result = run_cycles(&mut pipeline, inputs, slot, running, cfg, None);
    // wake the presenter so it notices the end
    running.store(false, Ordering::SeqCst);
    let stats = result.context("acquisition failed")?;
    log::info!(
        "acquisition finished: {} cycles, {} shown, {} idle ticks, {} dropped",
        stats.cycles,
        stats.displayed,
        stats.idle,
        stats.dropped
    );
    Ok(stats)
}
