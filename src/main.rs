use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use parabolic_spectrum::chart::animate::render_sweep_gif;
use parabolic_spectrum::chart::render::{render_sweep, render_trajectories};
use parabolic_spectrum::chart::spectrum::{
    SPECTRUM_MAX_ANGLE_DEG, render_spectrum, render_spectrum_frames, render_spectrum_gif,
};
use parabolic_spectrum::chart::{ChartConfig, Markers, TrajectorySeries, timestamped_path};
use parabolic_spectrum::core::ballistics::{
    AnglePolicy, Landing, LaunchParameters, flight_time_and_range, landing, vertex,
};
use parabolic_spectrum::core::sweep::{AngleSweep, SweepQuantity};

#[derive(Clone, Copy, Debug)]
struct Inputs {
    angle_deg: f64,
    speed_mps: f64,
    height_m: f64,
}

impl Inputs {
    fn launch(self, config: &ChartConfig) -> Result<LaunchParameters> {
        Ok(LaunchParameters::with_gravity(
            self.angle_deg,
            self.speed_mps,
            self.height_m,
            config.gravity_mps2,
        )?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MarkerKind {
    Launch,
    Apex,
    Landing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum QuantityArg {
    Landing,
    Apex,
}

impl From<QuantityArg> for SweepQuantity {
    fn from(arg: QuantityArg) -> Self {
        match arg {
            QuantityArg::Landing => SweepQuantity::LandingDistance,
            QuantityArg::Apex => SweepQuantity::ApexHeight,
        }
    }
}

#[derive(Parser)]
#[command(name = "parabolic-spectrum", version)]
#[command(
    about = "Projectile arcs by launch angle: numbers, charts and animations",
    long_about = None
)]
struct Cli {
    /// Chart settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print landing distance, apex and time of flight for one launch.
    /// Prompts for the values when none are given.
    Solve {
        /// Launch angle (degrees)
        #[arg(allow_negative_numbers = true)]
        angle: Option<f64>,
        /// Launch velocity (m/s)
        velocity: Option<f64>,
        /// Launch height (m)
        #[arg(allow_negative_numbers = true)]
        height: Option<f64>,
        /// Gravity (m/s^2), defaults to the config value
        #[arg(long)]
        gravity: Option<f64>,
        /// Root selection: quadrant-band or forward-only
        #[arg(long, default_value = "quadrant-band")]
        policy: AnglePolicy,
    },

    /// Draw one or more trajectories on a single chart
    Chart {
        /// angle,velocity,height (repeat for more trajectories, up to 256)
        #[arg(
            short,
            long = "launch",
            value_parser = parse_launch,
            required = true,
            allow_hyphen_values = true
        )]
        launches: Vec<Inputs>,
        /// Points to annotate on every trajectory
        #[arg(short, long, value_enum, value_delimiter = ',')]
        markers: Vec<MarkerKind>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Every whole launch angle below --below on one chart
    Spectrum {
        /// Launch velocity (m/s)
        #[arg(short, long, default_value = "55")]
        velocity: f64,
        /// Launch height (m)
        #[arg(long, default_value = "0")]
        height: f64,
        #[arg(long, default_value = "90")]
        below: u32,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Landing distance or apex height as a function of launch angle
    Sweep {
        #[arg(short, long, value_enum, default_value = "landing")]
        quantity: QuantityArg,
        /// Launch velocity (m/s)
        #[arg(short, long, default_value = "55")]
        velocity: f64,
        /// Launch height (m)
        #[arg(long, default_value = "0")]
        height: f64,
        /// Largest launch angle (degrees)
        #[arg(long, default_value = "90")]
        max_angle: f64,
        /// Write an animated GIF instead of a PNG
        #[arg(long)]
        gif: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Animated spectrum GIF, one more launch angle per frame
    Animate {
        /// Launch velocity (m/s)
        #[arg(short, long, default_value = "55")]
        velocity: f64,
        /// Launch height (m)
        #[arg(long, default_value = "0")]
        height: f64,
        /// Frame count, defaults to the config value
        #[arg(long)]
        frames: Option<u32>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// PNG sequence dir/0.png, dir/1.png, ... of the growing spectrum
    Frames {
        /// Launch velocity (m/s)
        #[arg(short, long, default_value = "55")]
        velocity: f64,
        /// Launch height (m)
        #[arg(long, default_value = "0")]
        height: f64,
        #[arg(long, default_value = "90")]
        count: u32,
        /// Output directory, defaults to <output_dir>/frames
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

fn parse_f64(value: &str, label: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid {label}: '{value}'. Expected a number."))
}

fn parse_launch(value: &str) -> Result<Inputs, String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid launch '{value}'. Expected <angle_deg>,<velocity_mps>,<height_m>."
        ));
    }

    Ok(Inputs {
        angle_deg: parse_f64(parts[0], "angle")?,
        speed_mps: parse_f64(parts[1], "velocity")?,
        height_m: parse_f64(parts[2], "height")?,
    })
}

fn read_f64(prompt: &str) -> Result<f64> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            bail!("Input ended unexpectedly (EOF).");
        }

        match line.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => eprintln!("Please enter a valid number (e.g., 45 or 12.5)."),
        }
    }
}

fn get_inputs_from_user() -> Result<Inputs> {
    Ok(Inputs {
        angle_deg: read_f64("Angle (degrees): ")?,
        speed_mps: read_f64("Velocity (m/s): ")?,
        height_m: read_f64("Height (m): ")?,
    })
}

fn markers_from(kinds: &[MarkerKind]) -> Markers {
    Markers {
        launch: kinds.contains(&MarkerKind::Launch),
        apex: kinds.contains(&MarkerKind::Apex),
        landing: kinds.contains(&MarkerKind::Landing),
    }
}

/// Positional values for `solve`: all three, or none to prompt for them.
fn given_inputs(
    angle: Option<f64>,
    velocity: Option<f64>,
    height: Option<f64>,
) -> Result<Option<Inputs>> {
    match (angle, velocity, height) {
        (None, None, None) => Ok(None),
        (Some(angle_deg), Some(speed_mps), Some(height_m)) => Ok(Some(Inputs {
            angle_deg,
            speed_mps,
            height_m,
        })),
        _ => bail!("Expected all of <angle> <velocity> <height>, or none to be prompted."),
    }
}

fn solve_report(inputs: Inputs, gravity: f64, policy: AnglePolicy) -> Result<Vec<String>> {
    let params = LaunchParameters::with_gravity(
        inputs.angle_deg,
        inputs.speed_mps,
        inputs.height_m,
        gravity,
    )?;

    let mut lines = Vec::new();
    lines.push(match landing(params, policy) {
        Landing::Root(distance) => format!("Landing distance: {distance:.4} m"),
        Landing::Vertical(value) => format!(
            "Landing distance: {value:.4} (vertical launch; this is the fall time sqrt(2h/g) in s)"
        ),
        Landing::NoRoot => format!("Landing distance: 0.0000 m (no landing under {policy:?})"),
        Landing::Undefined => "Landing distance: undefined".to_string(),
    });

    let apex = vertex(params, policy);
    lines.push(format!("Apex: ({:.4}, {:.4}) m", apex.x, apex.y));

    match flight_time_and_range(params) {
        Ok((time, distance)) => {
            lines.push(format!("Time of flight: {time:.4} s"));
            lines.push(format!("Horizontal distance: {distance:.4} m"));
        }
        Err(err) => lines.push(format!("Time of flight: n/a ({err})")),
    }

    Ok(lines)
}

fn output_or(output: Option<PathBuf>, dir: &Path, stem: &str, extension: &str) -> PathBuf {
    output.unwrap_or_else(|| timestamped_path(dir, stem, extension))
}

fn load_config(path: Option<&PathBuf>) -> Result<ChartConfig> {
    match path {
        Some(path) => {
            let config = ChartConfig::from_file(path)?;
            info!("loaded chart config from {}", path.display());
            Ok(config)
        }
        None => Ok(ChartConfig::default()),
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Solve {
            angle,
            velocity,
            height,
            gravity,
            policy,
        } => {
            let inputs = match given_inputs(angle, velocity, height)? {
                Some(inputs) => inputs,
                None => get_inputs_from_user()?,
            };
            let gravity = gravity.unwrap_or(config.gravity_mps2);
            println!();
            for line in solve_report(inputs, gravity, policy)? {
                println!("{line}");
            }
        }

        Commands::Chart {
            launches,
            markers,
            title,
            output,
        } => {
            let markers = markers_from(&markers);
            let series = launches
                .iter()
                .map(|inputs| -> Result<TrajectorySeries> {
                    let params = inputs.launch(&config)?;
                    Ok(TrajectorySeries::new(params).with_markers(markers))
                })
                .collect::<Result<Vec<_>>>()?;
            let title = title.unwrap_or_else(|| match launches.as_slice() {
                [only] => format!(
                    "Angle: {}, launch speed: {} m/s, launch height: {} m",
                    only.angle_deg, only.speed_mps, only.height_m
                ),
                _ => format!("Height vs distance | {} trajectories", launches.len()),
            });
            let path = output_or(output, &config.output_dir, "trajectories", "png");
            let plotted = render_trajectories(&series, &title, &path, &config)?;
            for p in &plotted {
                println!(
                    "{:>6} deg: landing {:.2} m, apex ({:.2}, {:.2}) m",
                    p.series.params.angle_deg,
                    p.landing.distance(),
                    p.apex.x,
                    p.apex.y
                );
            }
        }

        Commands::Spectrum {
            velocity,
            height,
            below,
            output,
        } => {
            let path = output_or(output, &config.output_dir, "spectrum", "png");
            let below = below.min(SPECTRUM_MAX_ANGLE_DEG + 1);
            render_spectrum(velocity, height, below, &path, &config)?;
        }

        Commands::Sweep {
            quantity,
            velocity,
            height,
            max_angle,
            gif,
            output,
        } => {
            let base = LaunchParameters::with_gravity(0.0, velocity, height, config.gravity_mps2)?;
            let interval = config.sweep_interval_deg;
            let sweep = AngleSweep::new(quantity.into(), base, max_angle, interval)?;
            let stem = match quantity {
                QuantityArg::Landing => "landing-sweep",
                QuantityArg::Apex => "apex-sweep",
            };
            if gif {
                let path = output_or(output, &config.output_dir, stem, "gif");
                render_sweep_gif(&sweep, &path, &config)?;
            } else {
                let path = output_or(output, &config.output_dir, stem, "png");
                render_sweep(&sweep, &path, &config)?;
            }
            if let Some((angle, value)) = sweep.highest_point() {
                println!("Highest: {value:.2} at {angle} deg");
            }
            if let Some((angle, value)) = sweep.lowest_point() {
                println!("Lowest: {value:.2} at {angle} deg");
            }
        }

        Commands::Animate {
            velocity,
            height,
            frames,
            output,
        } => {
            if let Some(frames) = frames {
                config.spectrum_frames = frames.max(1);
            }
            let path = output_or(output, &config.output_dir, "spectrum", "gif");
            render_spectrum_gif(velocity, height, &path, &config)?;
        }

        Commands::Frames {
            velocity,
            height,
            count,
            dir,
        } => {
            let dir = dir.unwrap_or_else(|| config.output_dir.join("frames"));
            let written = render_spectrum_frames(velocity, height, count, &dir, &config)?;
            println!("Wrote {} frames to {}", written.len(), dir.display());
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
