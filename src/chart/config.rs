use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::core::ballistics::{AnglePolicy, DEFAULT_GRAVITY_MPS2, DEFAULT_SAMPLE_STEP_M};
use crate::core::color::Rgb;
use crate::core::window::AxisPadding;

/// Everything the renderer needs to know about how charts look. Passed to
/// each render call; nothing is kept in global state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub gravity_mps2: f64,
    pub sample_step_m: f64,
    pub sweep_interval_deg: f64,
    pub trajectory_policy: AnglePolicy,

    pub font_family: String,
    pub title_font_px: u32,
    pub label_font_px: u32,
    pub annotation_font_px: u32,
    pub line_width_px: u32,
    pub marker_radius_px: u32,

    pub background_color: Rgb,
    pub grid_color: Rgb,
    pub baseline_color: Rgb,
    pub landing_curve_color: Rgb,
    pub apex_curve_color: Rgb,
    pub highest_marker_color: Rgb,
    pub lowest_marker_color: Rgb,

    pub axis_left_m: f64,
    pub overshoot_ratio: f64,
    pub headroom_ratio: f64,
    pub distance_to_height_ratio: Option<f64>,

    pub spectrum_frames: u32,
    pub spectrum_frame_delay_ms: u32,
    pub sweep_frame_delay_ms: u32,
    pub output_dir: PathBuf,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_px: 1600,
            height_px: 900,
            gravity_mps2: DEFAULT_GRAVITY_MPS2,
            sample_step_m: DEFAULT_SAMPLE_STEP_M,
            sweep_interval_deg: 0.5,
            trajectory_policy: AnglePolicy::ForwardOnly,

            font_family: "sans-serif".to_string(),
            title_font_px: 28,
            label_font_px: 20,
            annotation_font_px: 16,
            line_width_px: 2,
            marker_radius_px: 5,

            background_color: Rgb::new(255, 255, 255),
            grid_color: Rgb::new(128, 128, 128),
            baseline_color: Rgb::new(250, 128, 114),
            landing_curve_color: Rgb::new(154, 205, 50),
            apex_curve_color: Rgb::new(147, 112, 219),
            highest_marker_color: Rgb::new(255, 0, 0),
            lowest_marker_color: Rgb::new(65, 105, 225),

            axis_left_m: 40.0,
            overshoot_ratio: 0.5,
            headroom_ratio: 0.1,
            distance_to_height_ratio: None,

            spectrum_frames: 150,
            spectrum_frame_delay_ms: 66,
            sweep_frame_delay_ms: 33,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ChartConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chart config {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("failed to load chart config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width_px >= 100 && self.height_px >= 100,
            "canvas must be at least 100x100 px, got {}x{}",
            self.width_px,
            self.height_px
        );
        ensure!(
            self.gravity_mps2.is_finite() && self.gravity_mps2 > 0.0,
            "gravity_mps2 must be positive, got {}",
            self.gravity_mps2
        );
        ensure!(
            self.sample_step_m.is_finite() && self.sample_step_m > 0.0,
            "sample_step_m must be positive, got {}",
            self.sample_step_m
        );
        ensure!(
            self.sweep_interval_deg.is_finite() && self.sweep_interval_deg > 0.0,
            "sweep_interval_deg must be positive, got {}",
            self.sweep_interval_deg
        );
        ensure!(
            self.overshoot_ratio >= 0.0 && self.headroom_ratio >= 0.0 && self.axis_left_m >= 0.0,
            "axis padding must be non-negative"
        );
        if let Some(ratio) = self.distance_to_height_ratio {
            ensure!(
                ratio.is_finite() && ratio > 0.0,
                "distance_to_height_ratio must be positive, got {ratio}"
            );
        }
        ensure!(
            self.spectrum_frames > 0,
            "spectrum_frames must be at least 1"
        );
        Ok(())
    }

    pub fn padding(&self) -> AxisPadding {
        AxisPadding {
            left_m: self.axis_left_m,
            overshoot_ratio: self.overshoot_ratio,
            headroom_ratio: self.headroom_ratio,
        }
    }
}
