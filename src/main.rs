// src/main.rs
mod config;
mod gui;
mod monitor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use eframe::egui;
use log::{info, warn};

use config::MonitorConfig;
use gui::Ch4ScopeApp;
use monitor::{Monitor, SampleLog, SerialLineSource};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cfg = MonitorConfig::parse();
    info!(
        "opening {} at {} baud ({} channel(s), window {})",
        cfg.device, cfg.baud, cfg.channels, cfg.window
    );

    // No device, nothing to monitor: open failures are fatal, no retry.
    let source = SerialLineSource::open(&cfg.device, cfg.baud)?;
    let log = SampleLog::create(&cfg.log_file)?;

    // SIGUSR1 clears the on-screen window without restarting the process.
    let reset = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&reset))
        .context("failed to register SIGUSR1 handler")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            warn!("interrupt received; shutting down");
            shutdown.store(true, Ordering::SeqCst);
        })
        .context("failed to register interrupt handler")?;
    }

    let monitor = Monitor::new(source, log, cfg.channels as usize, cfg.capacity(), reset);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([960.0, 540.0])
        .with_title("ch4scope");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "ch4scope",
        options,
        Box::new(move |_cc| Box::new(Ch4ScopeApp::new(monitor, shutdown))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run UI: {err}"))
}
