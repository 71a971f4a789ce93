//! JPainter - headless host for the touch canvas
//!
//! Starts the render loop on an in-memory display, replays a scripted
//! drawing session and saves the page as a PNG.

use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use jpainter_color_picker::ColorPicker;
use painting::{DoubleBufferedSurface, Painter, ScaleListener};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod save;
mod script;

use config::AppConfig;
use script::Step;

/// Logs scale changes the way the toolbar label shows them
struct ScaleLabel;

impl ScaleListener for ScaleLabel {
    fn on_scale_change_start(&mut self, start_scale: f32) {
        info!("Scale {:.1}x", start_scale);
    }

    fn on_scale_change(&mut self, current_scale: f32) {
        info!("Scale {:.1}x", current_scale);
    }

    fn on_scale_change_end(&mut self, end_scale: f32) {
        info!("Scale {:.1}x (done)", end_scale);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let (width, height) = (config.painter.display.width, config.painter.display.height);
    info!(
        "Starting JPainter {}x{}, output to {}",
        width,
        height,
        config.output_dir.display()
    );

    let mut painter = Painter::new(config.painter.clone())?;
    painter.set_scale_listener(Box::new(ScaleLabel));

    let mut picker = ColorPicker::new();
    picker.set_color(0xFFFF_0000);
    painter.set_paint_color(picker.color());

    let surface = DoubleBufferedSurface::new(width, height)?;
    let presented = surface.presented();
    painter.surface_created(Box::new(surface))?;
    painter.surface_changed(width, height)?;

    replay(&mut painter, script::demo_script(width as f32, height as f32));

    let snapshot = painter.snapshot_bitmap()?;
    let saved = save::save_snapshot(&snapshot, &config.output_dir, &Local::now());

    let failed = painter.render_stats().map_or(0, |s| s.frames_failed());
    painter.surface_destroyed()?;
    info!(
        "Presented {} frames, {} failed",
        presented.frames_posted(),
        failed
    );

    let path = saved?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Feed the script to the painter in real time
fn replay(painter: &mut Painter, steps: Vec<Step>) {
    let mut last_time = None;
    for step in steps {
        if let (Some(previous), Some(now)) = (last_time, step.time()) {
            thread::sleep(Duration::from_millis(now.saturating_sub(previous)));
        }
        if let Some(now) = step.time() {
            last_time = Some(now);
        }

        match step {
            Step::Touch(event) => {
                painter.on_touch_event(&event);
            }
            Step::UseEraser => painter.use_eraser(),
            Step::UsePaint => painter.use_paint(),
        }
    }
}
