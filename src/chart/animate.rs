use std::path::Path;

use anyhow::{Result, anyhow};
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::chart::config::ChartConfig;
use crate::chart::ensure_parent_dir;
use crate::chart::render::draw_sweep;
use crate::core::sweep::{AngleSweep, SweepQuantity};

const SWEEP_HOLD_FRAMES_PER_90_DEG: f64 = 60.0;

pub(crate) fn gif_area<'a>(
    path: &'a Path,
    config: &ChartConfig,
    frame_delay_ms: u32,
) -> Result<DrawingArea<BitMapBackend<'a>, Shift>> {
    ensure_parent_dir(path)?;
    let backend = BitMapBackend::gif(path, (config.width_px, config.height_px), frame_delay_ms)
        .map_err(|e| anyhow!("failed to start GIF {}: {e}", path.display()))?;
    Ok(backend.into_drawing_area())
}

/// Frames the finished curve is held for. Apex sweeps hold only for whole
/// 90-degree spans; landing sweeps scale with the exact range.
fn hold_frames(sweep: &AngleSweep) -> usize {
    let spans = sweep.max_angle_deg / 90.0;
    match sweep.quantity {
        SweepQuantity::LandingDistance => (SWEEP_HOLD_FRAMES_PER_90_DEG * spans) as usize,
        SweepQuantity::ApexHeight => (SWEEP_HOLD_FRAMES_PER_90_DEG * spans.trunc()) as usize,
    }
}

/// Points revealed on each frame of a sweep animation: one more point per
/// frame, then the finished curve is held for a while.
pub fn sweep_frame_plan(sweep: &AngleSweep) -> Vec<usize> {
    let steps = (sweep.max_angle_deg / sweep.interval_deg) as usize;
    let hold = hold_frames(sweep);
    (0..(steps + hold).max(1))
        .map(|frame| (frame + 1).min(sweep.len()))
        .collect()
}

pub fn render_sweep_gif(sweep: &AngleSweep, path: &Path, config: &ChartConfig) -> Result<()> {
    let root = gif_area(path, config, config.sweep_frame_delay_ms)?;
    let plan = sweep_frame_plan(sweep);
    let target = path.display();

    for (frame, &revealed) in plan.iter().enumerate() {
        draw_sweep(&root, sweep, revealed, config)?;
        root.present()
            .map_err(|e| anyhow!("failed to write frame {frame} of {target}: {e}"))?;
        debug!("sweep frame {frame}/{} shows {revealed} points", plan.len());
    }

    info!("wrote {target} ({} frames)", plan.len());
    Ok(())
}
