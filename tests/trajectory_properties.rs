use std::path::Path;

use approx::assert_abs_diff_eq;

use parabolic_spectrum::chart::ChartConfig;
use parabolic_spectrum::core::{
    AnglePolicy, CoreError, Landing, LaunchParameters, landing, landing_distance, rainbow_color,
    sample_curve, vertex,
};

const POLICIES: [AnglePolicy; 2] = [AnglePolicy::QuadrantBand, AnglePolicy::ForwardOnly];

fn launch(angle_deg: f64, speed_mps: f64, height_m: f64) -> LaunchParameters {
    LaunchParameters::new(angle_deg, speed_mps, height_m).expect("valid launch")
}

#[test]
fn ground_launch_matches_closed_form_range() {
    for policy in POLICIES {
        for angle in [0.0_f64, 30.0, 45.0, 60.0] {
            let expected = 40.0 * 40.0 * (2.0 * angle).to_radians().sin() / 10.0;
            let got = landing_distance(launch(angle, 40.0, 0.0), policy);
            assert_abs_diff_eq!(got, expected, epsilon = 1e-9);
        }
        assert_eq!(landing_distance(launch(90.0, 40.0, 0.0), policy), 0.0);
    }
}

#[test]
fn vertical_launch_returns_fall_time_from_height() {
    assert_eq!(
        landing(launch(90.0, 25.0, 5.0), AnglePolicy::QuadrantBand),
        Landing::Vertical(1.0)
    );
    let down = landing(launch(270.0, 25.0, 5.0), AnglePolicy::ForwardOnly);
    assert_eq!(down.distance(), 1.0);
    let grounded = landing(launch(90.0, 25.0, 0.0), AnglePolicy::QuadrantBand);
    assert_eq!(grounded, Landing::NoRoot);
}

#[test]
fn flat_launch_apex_is_launch_point() {
    for (speed, height) in [(0.0, 0.0), (40.0, 3.5), (12.0, 100.0)] {
        let apex = vertex(launch(0.0, speed, height), AnglePolicy::QuadrantBand);
        assert_eq!((apex.x, apex.y), (0.0, height));
    }
}

#[test]
fn apex_height_at_45_degrees() {
    let apex = vertex(launch(45.0, 40.0, 0.0), AnglePolicy::QuadrantBand);
    let expected = 40.0_f64.powi(2) * 45.0_f64.to_radians().sin().powi(2) / 20.0;
    assert_abs_diff_eq!(apex.y, expected, epsilon = 1e-9);
    assert_abs_diff_eq!(apex.y, 40.0, epsilon = 1e-9);
}

#[test]
fn lower_half_apex_is_reflected_about_launch_height() {
    for angle in [181.0, 225.0, 300.0, 359.0] {
        let params = launch(angle, 30.0, 8.0);
        let plain = vertex(params, AnglePolicy::ForwardOnly);
        let reflected = vertex(params, AnglePolicy::QuadrantBand);

        assert_abs_diff_eq!(reflected.y, 2.0 * 8.0 - plain.y, epsilon = 1e-9);
        assert_eq!(reflected.x, plain.x);
    }

    let at_180 = launch(180.0, 30.0, 8.0);
    assert_eq!(
        vertex(at_180, AnglePolicy::QuadrantBand),
        vertex(at_180, AnglePolicy::ForwardOnly)
    );
}

#[test]
fn rainbow_endpoints_are_red_and_violet() {
    assert_eq!(rainbow_color(0, 7).expect("in range").to_hex(), "#ff0000");
    assert_eq!(rainbow_color(6, 7).expect("in range").to_hex(), "#9400d3");
}

#[test]
fn rainbow_rejects_indices_outside_total() {
    for (index, total) in [(-1, 10), (10, 10)] {
        let err = rainbow_color(index, total).expect_err("out of range");
        assert!(matches!(err, CoreError::ColorIndexOutOfRange { .. }));
        assert!(err.is_invalid_argument());
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    for angle in [0.0, 17.5, 45.0, 90.0, 135.0, 200.0, 300.0] {
        let params = launch(angle, 33.3, 2.5);
        for policy in POLICIES {
            assert_eq!(
                landing_distance(params, policy).to_bits(),
                landing_distance(params, policy).to_bits()
            );
            assert_eq!(vertex(params, policy), vertex(params, policy));
            assert_eq!(
                sample_curve(params, policy, 0.2).expect("valid step"),
                sample_curve(params, policy, 0.2).expect("valid step")
            );
        }
    }
}

#[test]
fn sampled_curve_starts_at_launch_and_stops_past_landing() {
    for (angle, height) in [(45.0, 0.0), (30.0, 12.0), (75.0, 1.5)] {
        let params = launch(angle, 40.0, height);
        let end = landing_distance(params, AnglePolicy::ForwardOnly);
        let samples = sample_curve(params, AnglePolicy::ForwardOnly, 0.2).expect("valid step");

        assert_eq!(samples[0], (0.0, height));
        let (last_x, _) = samples[samples.len() - 1];
        assert!(last_x <= 1.05 * end + 1e-9);
        assert!(last_x + 0.2 >= end);
    }
}

#[test]
fn zero_velocity_is_undefined_not_an_error() {
    let stalled = launch(30.0, 0.0, 4.0);
    let result = landing(stalled, AnglePolicy::QuadrantBand);
    assert_eq!(result, Landing::Undefined);
    assert!(landing_distance(stalled, AnglePolicy::QuadrantBand).is_nan());
    assert!(
        sample_curve(stalled, AnglePolicy::QuadrantBand, 0.2)
            .expect("valid step")
            .is_empty()
    );
}

#[test]
fn sample_config_file_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/chart.toml");
    let config = ChartConfig::from_file(&path).expect("sample config is valid");
    assert_eq!(config, ChartConfig::default());
}
