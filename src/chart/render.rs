use std::path::Path;

use anyhow::{Result, anyhow, ensure};
use log::{info, warn};
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::chart::config::ChartConfig;
use crate::chart::ensure_parent_dir;
use crate::core::ballistics::{Landing, LaunchParameters, Vertex, landing, sample_curve, vertex};
use crate::core::color::{Rgb, rainbow_color};
use crate::core::sweep::{AngleSweep, SweepQuantity};
use crate::core::window::ChartWindow;

pub const MAX_SERIES: usize = 256;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Markers {
    pub launch: bool,
    pub apex: bool,
    pub landing: bool,
}

impl Markers {
    pub const NONE: Markers = Markers {
        launch: false,
        apex: false,
        landing: false,
    };
    pub const ALL: Markers = Markers {
        launch: true,
        apex: true,
        landing: true,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySeries {
    pub params: LaunchParameters,
    pub markers: Markers,
    pub color: Option<Rgb>,
}

impl TrajectorySeries {
    pub fn new(params: LaunchParameters) -> Self {
        Self {
            params,
            markers: Markers::NONE,
            color: None,
        }
    }

    pub fn with_markers(self, markers: Markers) -> Self {
        Self { markers, ..self }
    }

    pub fn with_color(self, color: Rgb) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }
}

/// A series with everything the chart needs already computed.
#[derive(Clone, Debug, PartialEq)]
pub struct PlottedSeries {
    pub series: TrajectorySeries,
    pub landing: Landing,
    pub apex: Vertex,
    pub color: Rgb,
    pub samples: Vec<(f64, f64)>,
}

pub fn plot_series(
    series: &[TrajectorySeries],
    config: &ChartConfig,
) -> Result<Vec<PlottedSeries>> {
    ensure!(
        series.len() <= MAX_SERIES,
        "a chart holds at most {MAX_SERIES} trajectories, got {}",
        series.len()
    );

    let total = series.len() as i64;
    let policy = config.trajectory_policy;
    series
        .iter()
        .enumerate()
        .map(|(idx, s)| -> Result<PlottedSeries> {
            let color = match s.color {
                Some(color) => color,
                None => rainbow_color(idx as i64, total)?,
            };
            let landing = landing(s.params, policy);
            if !landing.is_defined() {
                warn!(
                    "trajectory at {} deg, {} m/s, {} m has no defined landing point",
                    s.params.angle_deg, s.params.speed_mps, s.params.height_m
                );
            }
            Ok(PlottedSeries {
                series: *s,
                landing,
                apex: vertex(s.params, policy),
                color,
                samples: sample_curve(s.params, policy, config.sample_step_m)?,
            })
        })
        .collect()
}

pub fn trajectory_window(plotted: &[PlottedSeries], config: &ChartConfig) -> ChartWindow {
    let window = ChartWindow::for_trajectories(
        plotted.iter().map(|p| p.landing.distance()),
        // A reflected apex can sit below the arc it labels.
        plotted
            .iter()
            .flat_map(|p| p.samples.iter().map(|&(_, y)| y))
            .chain(plotted.iter().map(|p| p.apex.y)),
        &config.padding(),
    );
    match config.distance_to_height_ratio {
        Some(ratio) => window.with_fixed_ratio(ratio),
        None => window,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extreme {
    Highest,
    Lowest,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepMarker {
    pub extreme: Extreme,
    /// Position in the sweep, so animations know when the marker is reached.
    pub index: usize,
    pub angle_deg: f64,
    pub value: f64,
}

fn sweep_index(sweep: &AngleSweep, angle_deg: f64) -> usize {
    (angle_deg / sweep.interval_deg).round() as usize
}

/// Highest/lowest annotations for a sweep. Landing sweeps only mark extremes
/// that leave the baseline; apex sweeps always mark the lowest point, and a
/// half-circle apex sweep marks it at both ends.
pub fn sweep_markers(sweep: &AngleSweep) -> Vec<SweepMarker> {
    let marker = |extreme, (angle_deg, value): (f64, f64)| SweepMarker {
        extreme,
        index: sweep_index(sweep, angle_deg),
        angle_deg,
        value,
    };

    let mut markers = Vec::new();
    if let Some(point) = sweep.max_point() {
        markers.push(marker(Extreme::Highest, point));
    }
    match sweep.quantity {
        SweepQuantity::LandingDistance => {
            if let Some(point) = sweep.min_point() {
                markers.push(marker(Extreme::Lowest, point));
            }
        }
        SweepQuantity::ApexHeight => {
            if let Some(point) = sweep.lowest_point() {
                markers.push(marker(Extreme::Lowest, point));
                if sweep.max_angle_deg == 180.0 {
                    markers.push(marker(Extreme::Lowest, (180.0, point.1)));
                }
            }
        }
    }
    markers
}

pub fn sweep_title(sweep: &AngleSweep, shown_max_angle_deg: f64) -> String {
    let quantity = match sweep.quantity {
        SweepQuantity::LandingDistance => "landing distance",
        SweepQuantity::ApexHeight => "apex height",
    };
    let speed = sweep.base.speed_mps;
    let height = sweep.base.height_m;
    let launch = format!("launch speed: {speed} m/s, launch height: {height} m");
    format!("Launch angle (0-{shown_max_angle_deg}) vs {quantity}, {launch}")
}

pub fn sweep_window(sweep: &AngleSweep, config: &ChartConfig) -> ChartWindow {
    ChartWindow::for_sweep(sweep.max_angle_deg, &sweep.values, config.headroom_ratio)
}

fn plot_color(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn font(config: &ChartConfig, size_px: u32) -> FontDesc<'_> {
    FontDesc::new(
        FontFamily::Name(&config.font_family),
        f64::from(size_px),
        FontStyle::Normal,
    )
}

fn visible_points(samples: &[(f64, f64)], window: &ChartWindow) -> Vec<(f64, f64)> {
    samples
        .iter()
        .copied()
        .filter(|&(x, y)| {
            x.is_finite() && y.is_finite() && window.x.contains(&x) && window.y.contains(&y)
        })
        .collect()
}

fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    window: &ChartWindow,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    config: &ChartConfig,
) -> Result<Chart<'a, DB>> {
    area.fill(&plot_color(config.background_color))
        .map_err(|e| anyhow!("failed to clear drawing area: {e}"))?;

    let mut chart = ChartBuilder::on(area)
        .caption(title, font(config, config.title_font_px))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(window.x.clone(), window.y.clone())
        .map_err(|e| anyhow!("failed to build chart: {e}"))?;

    let grid = plot_color(config.grid_color);
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .label_style(font(config, config.label_font_px))
        .axis_desc_style(font(config, config.label_font_px))
        .bold_line_style(grid.mix(0.5))
        .light_line_style(grid.mix(0.15))
        .draw()
        .map_err(|e| anyhow!("failed to draw grid: {e}"))?;

    let baseline = || plot_color(config.baseline_color).stroke_width(3);
    chart
        .draw_series(LineSeries::new(
            [(window.x.start, 0.0), (window.x.end, 0.0)],
            baseline(),
        ))
        .map_err(|e| anyhow!("failed to draw baseline: {e}"))?;
    if window.x.start <= 0.0 {
        chart
            .draw_series(LineSeries::new(
                [(0.0, window.y.start), (0.0, window.y.end)],
                baseline(),
            ))
            .map_err(|e| anyhow!("failed to draw baseline: {e}"))?;
    }

    Ok(chart)
}

fn draw_marker<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    at: (f64, f64),
    label: String,
    color: RGBColor,
    above: bool,
    config: &ChartConfig,
) -> Result<()> {
    let (offset, anchor) = if above {
        (-10, VPos::Bottom)
    } else {
        (10, VPos::Top)
    };
    let style = TextStyle::from(font(config, config.annotation_font_px))
        .pos(Pos::new(HPos::Center, anchor));

    chart
        .draw_series(std::iter::once(
            EmptyElement::at(at)
                + Circle::new((0, 0), config.marker_radius_px, color.filled())
                + Text::new(label, (0, offset), style),
        ))
        .map_err(|e| anyhow!("failed to draw marker: {e}"))?;
    Ok(())
}

pub(crate) fn draw_trajectories<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    plotted: &[PlottedSeries],
    window: &ChartWindow,
    title: &str,
    config: &ChartConfig,
) -> Result<()> {
    let mut chart = build_chart(
        area,
        window,
        title,
        "Horizontal distance (m)",
        "Height (m)",
        config,
    )?;

    for p in plotted {
        let color = plot_color(p.color);
        chart
            .draw_series(LineSeries::new(
                visible_points(&p.samples, window),
                color.stroke_width(config.line_width_px),
            ))
            .map_err(|e| anyhow!("failed to draw trajectory: {e}"))?;

        let height = p.series.params.height_m;
        if p.series.markers.launch {
            draw_marker(
                &mut chart,
                (0.0, height),
                format!("Launch (0, {height:.0})"),
                color,
                true,
                config,
            )?;
        }
        if p.series.markers.apex {
            if window.x.contains(&p.apex.x) && window.y.contains(&p.apex.y) {
                draw_marker(
                    &mut chart,
                    (p.apex.x, p.apex.y),
                    format!("Apex ({:.2}, {:.2})", p.apex.x, p.apex.y),
                    color,
                    true,
                    config,
                )?;
            } else {
                warn!(
                    "skipping apex marker ({}, {}) outside the chart",
                    p.apex.x, p.apex.y
                );
            }
        }
        if p.series.markers.landing {
            if p.landing.is_defined() {
                let end = p.landing.distance();
                draw_marker(
                    &mut chart,
                    (end, 0.0),
                    format!("Landing ({end:.2}, 0)"),
                    color,
                    false,
                    config,
                )?;
            } else {
                warn!("skipping undefined landing marker");
            }
        }
    }

    Ok(())
}

/// Draws the first `revealed` points of a sweep, plus whichever extreme
/// markers fall inside that prefix.
pub(crate) fn draw_sweep<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    sweep: &AngleSweep,
    revealed: usize,
    config: &ChartConfig,
) -> Result<()> {
    let window = sweep_window(sweep, config);
    let shown_max = sweep
        .angles
        .get(revealed.min(sweep.len()).saturating_sub(1))
        .copied()
        .unwrap_or(0.0);
    let title = sweep_title(sweep, shown_max);
    let mut chart = build_chart(
        area,
        &window,
        &title,
        "Launch angle (deg)",
        sweep.quantity.label(),
        config,
    )?;

    let curve_color = match sweep.quantity {
        SweepQuantity::LandingDistance => config.landing_curve_color,
        SweepQuantity::ApexHeight => config.apex_curve_color,
    };
    let shown: Vec<(f64, f64)> = sweep.points().take(revealed).collect();
    chart
        .draw_series(LineSeries::new(
            visible_points(&shown, &window),
            plot_color(curve_color).stroke_width(config.line_width_px),
        ))
        .map_err(|e| anyhow!("failed to draw sweep: {e}"))?;

    for marker in sweep_markers(sweep) {
        if marker.index >= revealed {
            continue;
        }
        let (name, color) = match marker.extreme {
            Extreme::Highest => ("Highest", config.highest_marker_color),
            Extreme::Lowest => ("Lowest", config.lowest_marker_color),
        };
        draw_marker(
            &mut chart,
            (marker.angle_deg, marker.value),
            format!("{name} ({:.2}, {:.2})", marker.angle_deg, marker.value),
            plot_color(color),
            true,
            config,
        )?;
    }

    Ok(())
}

pub fn render_trajectories(
    series: &[TrajectorySeries],
    title: &str,
    path: &Path,
    config: &ChartConfig,
) -> Result<Vec<PlottedSeries>> {
    let plotted = plot_series(series, config)?;
    render_plotted(&plotted, title, path, config)?;
    Ok(plotted)
}

pub fn render_plotted(
    plotted: &[PlottedSeries],
    title: &str,
    path: &Path,
    config: &ChartConfig,
) -> Result<()> {
    let window = trajectory_window(plotted, config);

    ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, (config.width_px, config.height_px)).into_drawing_area();
    draw_trajectories(&root, plotted, &window, title, config)?;
    root.present()
        .map_err(|e| anyhow!("failed to write chart {}: {e}", path.display()))?;

    info!("wrote {} ({} trajectories)", path.display(), plotted.len());
    Ok(())
}

pub fn render_sweep(sweep: &AngleSweep, path: &Path, config: &ChartConfig) -> Result<()> {
    ensure_parent_dir(path)?;
    let root = BitMapBackend::new(path, (config.width_px, config.height_px)).into_drawing_area();
    draw_sweep(&root, sweep, sweep.len(), config)?;
    root.present()
        .map_err(|e| anyhow!("failed to write chart {}: {e}", path.display()))?;

    info!("wrote {}", path.display());
    Ok(())
}
