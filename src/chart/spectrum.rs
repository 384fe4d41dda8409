use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow, ensure};
use log::{debug, info};

use crate::chart::animate::gif_area;
use crate::chart::config::ChartConfig;
use crate::chart::render::{
    PlottedSeries, TrajectorySeries, draw_trajectories, plot_series, render_plotted,
    render_trajectories, trajectory_window,
};
use crate::core::ballistics::LaunchParameters;
use crate::core::color::rainbow_color;

pub const SPECTRUM_MAX_ANGLE_DEG: u32 = 90;
const SPECTRUM_COLOR_SLOTS: i64 = SPECTRUM_MAX_ANGLE_DEG as i64 + 1;

/// Whole-degree launches `0..=up_to_deg` sharing one speed and height.
pub fn spectrum_launches(
    speed_mps: f64,
    height_m: f64,
    up_to_deg: u32,
    config: &ChartConfig,
) -> Result<Vec<LaunchParameters>> {
    (0..=up_to_deg)
        .map(|angle| -> Result<LaunchParameters> {
            Ok(LaunchParameters::with_gravity(
                f64::from(angle),
                speed_mps,
                height_m,
                config.gravity_mps2,
            )?)
        })
        .collect()
}

/// Launch angle of each GIF frame: one degree per frame up to 90, then held.
pub fn spectrum_frame_angles(frames: u32) -> impl Iterator<Item = u32> {
    (0..frames).map(|frame| frame.min(SPECTRUM_MAX_ANGLE_DEG))
}

pub fn launch_title(plotted: &PlottedSeries) -> String {
    let LaunchParameters {
        angle_deg,
        speed_mps,
        height_m,
        ..
    } = plotted.series.params;
    let apex = plotted.apex.y;
    let end = plotted.landing.distance();
    let shape = format!("apex height: {apex:.2} m, landing distance: {end:.2} m");
    let launch = format!("launch speed: {speed_mps} m/s, launch height: {height_m} m");
    format!("{angle_deg}° launch, {shape}, {launch}")
}

/// Every whole angle below `below_deg` on one chart.
pub fn render_spectrum(
    speed_mps: f64,
    height_m: f64,
    below_deg: u32,
    path: &Path,
    config: &ChartConfig,
) -> Result<Vec<PlottedSeries>> {
    ensure!(below_deg > 0, "spectrum needs at least one angle");
    let series: Vec<_> = spectrum_launches(speed_mps, height_m, below_deg - 1, config)?
        .into_iter()
        .map(TrajectorySeries::new)
        .collect();
    let title = format!(
        "Height vs distance spectrum | launch speed: {speed_mps} m/s | launch height: {height_m} m"
    );
    render_trajectories(&series, &title, path, config)
}

/// Writes `dir/0.png`, `dir/1.png`, ... where frame `i` holds angles `0..=i`.
pub fn render_spectrum_frames(
    speed_mps: f64,
    height_m: f64,
    count: u32,
    dir: &Path,
    config: &ChartConfig,
) -> Result<Vec<PathBuf>> {
    ensure!(
        count <= SPECTRUM_MAX_ANGLE_DEG + 1,
        "at most {} spectrum frames, got {count}",
        SPECTRUM_MAX_ANGLE_DEG + 1
    );

    if count == 0 {
        return Ok(Vec::new());
    }

    let launches = spectrum_launches(speed_mps, height_m, count - 1, config)?;
    let mut written = Vec::with_capacity(launches.len());
    for i in 0..launches.len() {
        let series: Vec<_> = launches[..=i]
            .iter()
            .copied()
            .map(TrajectorySeries::new)
            .collect();
        let plotted = plot_series(&series, config)?;
        let newest = plotted
            .last()
            .ok_or_else(|| anyhow!("frame {i} has no trajectories"))?;
        let path = dir.join(format!("{i}.png"));
        render_plotted(&plotted, &launch_title(newest), &path, config)?;
        written.push(path);
    }

    Ok(written)
}

/// Animated spectrum: each frame adds the next whole-degree launch, colored
/// on a fixed 91-slot rainbow so earlier arcs keep their color.
pub fn render_spectrum_gif(
    speed_mps: f64,
    height_m: f64,
    path: &Path,
    config: &ChartConfig,
) -> Result<()> {
    let series = spectrum_launches(speed_mps, height_m, SPECTRUM_MAX_ANGLE_DEG, config)?
        .into_iter()
        .enumerate()
        .map(|(idx, params)| -> Result<TrajectorySeries> {
            let color = rainbow_color(idx as i64, SPECTRUM_COLOR_SLOTS)?;
            Ok(TrajectorySeries::new(params).with_color(color))
        })
        .collect::<Result<Vec<_>>>()?;
    let plotted = plot_series(&series, config)?;

    let root = gif_area(path, config, config.spectrum_frame_delay_ms)?;
    let target = path.display();
    for (frame, angle) in spectrum_frame_angles(config.spectrum_frames).enumerate() {
        let shown = &plotted[..=angle as usize];
        let window = trajectory_window(shown, config);
        let title = launch_title(&shown[shown.len() - 1]);
        draw_trajectories(&root, shown, &window, &title, config)?;
        root.present()
            .map_err(|e| anyhow!("failed to write frame {frame} of {target}: {e}"))?;
        debug!("spectrum frame {frame} up to {angle} deg");
    }

    info!("wrote {target} ({} frames)", config.spectrum_frames);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_angles_climb_then_hold_at_90() {
        let angles: Vec<u32> = spectrum_frame_angles(150).collect();
        assert_eq!(angles.len(), 150);
        assert_eq!(angles[0], 0);
        assert_eq!(angles[45], 45);
        assert_eq!(angles[90], 90);
        assert_eq!(angles[149], 90);
    }

    #[test]
    fn launches_cover_every_whole_degree() {
        let launches = spectrum_launches(55.0, 0.0, 89, &ChartConfig::default())
            .expect("valid launches");
        assert_eq!(launches.len(), 90);
        assert_eq!(launches[0].angle_deg, 0.0);
        assert_eq!(launches[89].angle_deg, 89.0);
        assert!(launches.iter().all(|p| p.gravity_mps2 == 10.0));
    }

    #[test]
    fn negative_speed_is_rejected() {
        assert!(spectrum_launches(-1.0, 0.0, 10, &ChartConfig::default()).is_err());
    }

    #[test]
    fn too_many_frames_are_rejected_before_drawing() {
        let dir = Path::new("never-written");
        let err = render_spectrum_frames(55.0, 0.0, 92, dir, &ChartConfig::default())
            .expect_err("92 frames exceed the spectrum");
        assert!(err.to_string().contains("at most 91"));
    }

    #[test]
    fn title_reports_newest_launch() {
        let series = [TrajectorySeries::new(LaunchParameters::unchecked(45.0, 40.0, 0.0))];
        let plotted = plot_series(&series, &ChartConfig::default()).expect("one series");
        let title = launch_title(&plotted[0]);
        assert!(title.starts_with("45° launch, apex height: 40.00 m, landing distance: 160.00 m"));
    }
}
