// src/main.rs
mod config;
mod drivers;
mod engine;
mod input;
mod presenter;
mod types;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use config::ScopeConfig;
use drivers::LatestSlot;
use input::SharedInputs;
use presenter::{LogPresenter, Presenter, SnapshotPresenter};

// 控制台前面板: one key per line item, see SharedInputs::apply_key
fn spawn_key_reader(inputs: SharedInputs) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for key in line.chars().filter(|c| !c.is_whitespace()) {
                if !inputs.apply_key(key) {
                    log::warn!("unknown key '{key}' (m s c + - > < ] [)");
                }
            }
        }
    });
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cfg = ScopeConfig::from_env();
    log::info!("config: {}", serde_json::to_string(&cfg)?);

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        log::info!("interrupt received, stopping");
        r.store(false, Ordering::SeqCst);
    })
    .context("installing Ctrl+C handler")?;

    let inputs = SharedInputs::new();
    spawn_key_reader(inputs.clone());

    let slot = Arc::new(LatestSlot::new());
    let acquisition =
        engine::spawn_acquisition(cfg.clone(), inputs, Arc::clone(&slot), Arc::clone(&running));

    let mut presenters: Vec<Box<dyn Presenter>> = vec![Box::new(LogPresenter::default())];
    if cfg.snapshot_path.is_some() {
        presenters.push(Box::new(SnapshotPresenter::new(cfg.snapshot_path.clone(), 25)));
    }
    while running.load(Ordering::SeqCst) && !acquisition.is_finished() {
        let Some(frame) = slot.take_timeout(Duration::from_millis(50)) else {
            continue;
        };
        for presenter in presenters.iter_mut() {
            if let Err(e) = presenter.present(&frame) {
                log::warn!("presenter failed: {e:#}");
            }
        }
    }
    running.store(false, Ordering::SeqCst);

    let stats = acquisition
        .join()
        .map_err(|_| anyhow!("acquisition thread panicked"))??;
    log::info!("stopped after {} cycles", stats.cycles);
    Ok(())
}
