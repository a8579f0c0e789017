// src/gui.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{Line, Plot, PlotPoints};
use std::fs::File;
use std::io::BufWriter;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::error;

use crate::monitor::{Monitor, SerialLineSource};

const LOG_TAIL: usize = 8;

// Stable per-channel trace styling. A single-channel run keeps the plain
// CH4 look; the two-sensor rig keeps its historic labels and colors.
fn trace_style(channel: usize, channel_count: usize) -> (&'static str, Color32) {
    if channel_count == 1 {
        return ("CH4 (ppm)", Color32::from_rgb(255, 165, 0));
    }
    match channel {
        0 => ("Sensor 1 (inside)", Color32::from_rgb(255, 165, 0)),
        _ => ("Sensor 2 (outside)", Color32::from_rgb(0, 200, 80)),
    }
}

pub struct Ch4ScopeApp {
    monitor: Monitor<SerialLineSource, BufWriter<File>>,
    shutdown: Arc<AtomicBool>,
    tail: Vec<String>,
    fatal: Option<String>,
}

impl Ch4ScopeApp {
    pub fn new(
        monitor: Monitor<SerialLineSource, BufWriter<File>>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            monitor,
            shutdown,
            tail: Vec::new(),
            fatal: None,
        }
    }

    fn push_tail(&mut self, line: String) {
        self.tail.push(line);
        if self.tail.len() > LOG_TAIL {
            self.tail.remove(0);
        }
    }
}

impl eframe::App for Ch4ScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.shutdown.load(Ordering::SeqCst) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // One tick: drain every complete line already waiting, then draw.
        // Serial and log-sink errors are fatal (fail-fast on the log by
        // decision; the record trail is the point of the tool).
        if self.fatal.is_none() {
            match self.monitor.poll_pending() {
                Ok(records) => {
                    for record in records {
                        self.push_tail(record.log_line);
                    }
                }
                Err(err) => {
                    error!("monitor stopped: {err}");
                    self.fatal = Some(err.to_string());
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            }
        }

        egui::TopBottomPanel::bottom("log_tail").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(err) = &self.fatal {
                ui.colored_label(Color32::RED, format!("FATAL: {err}"));
            }
            for line in &self.tail {
                ui.monospace(line);
            }
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("ch4scope");
                ui.label(format!(
                    "samples on screen: {}",
                    self.monitor.window().len()
                ));
                if ui.button("🔄 RESET VIEW").clicked() {
                    // Same path as SIGUSR1: applied at the next poll,
                    // never mid-append. The sample index keeps counting.
                    self.monitor.reset_flag().store(true, Ordering::SeqCst);
                }
            });

            let channel_count = self.monitor.channels();
            Plot::new("ch4_plot")
                .view_aspect(2.0)
                .include_y(0.0)
                .show(ui, |plot_ui| {
                    for channel in 0..channel_count {
                        let points = self.monitor.window().points(channel);
                        if points.is_empty() {
                            continue;
                        }
                        let (label, color) = trace_style(channel, channel_count);
                        plot_ui.line(
                            Line::new(PlotPoints::new(points))
                                .name(label)
                                .color(color),
                        );
                    }
                });
        });

        // Keep polling even while the device is quiet.
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(err) = self.monitor.flush_log() {
            error!("failed to flush sample log on exit: {err}");
        }
    }
}
