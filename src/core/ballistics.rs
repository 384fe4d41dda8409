use serde::Deserialize;

use crate::core::error::CoreError;

pub const DEFAULT_GRAVITY_MPS2: f64 = 10.0;
pub const DEFAULT_SAMPLE_STEP_M: f64 = 0.2;

const CURVE_OVERSHOOT_RATIO: f64 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaunchParameters {
    pub angle_deg: f64,
    pub speed_mps: f64,
    pub height_m: f64,
    pub gravity_mps2: f64,
}

impl LaunchParameters {
    /// Validated parameters under the default gravity of 10 m/s^2.
    pub fn new(angle_deg: f64, speed_mps: f64, height_m: f64) -> Result<Self, CoreError> {
        Self::with_gravity(angle_deg, speed_mps, height_m, DEFAULT_GRAVITY_MPS2)
    }

    pub fn with_gravity(
        angle_deg: f64,
        speed_mps: f64,
        height_m: f64,
        gravity_mps2: f64,
    ) -> Result<Self, CoreError> {
        let params = Self {
            angle_deg,
            speed_mps,
            height_m,
            gravity_mps2,
        };
        params.validate()?;
        Ok(params)
    }

    /// Unchecked parameters under the default gravity. Degenerate inputs are
    /// allowed through and surface as [`Landing::Undefined`] or NaN.
    pub const fn unchecked(angle_deg: f64, speed_mps: f64, height_m: f64) -> Self {
        Self {
            angle_deg,
            speed_mps,
            height_m,
            gravity_mps2: DEFAULT_GRAVITY_MPS2,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |name, value, reason| CoreError::InvalidParameter {
            name,
            value,
            reason,
        };

        if !self.angle_deg.is_finite() {
            return Err(invalid("angle", self.angle_deg, "must be finite"));
        }
        if !self.speed_mps.is_finite() || self.speed_mps < 0.0 {
            return Err(invalid(
                "velocity",
                self.speed_mps,
                "must be finite and non-negative",
            ));
        }
        if !self.height_m.is_finite() {
            return Err(invalid("height", self.height_m, "must be finite"));
        }
        if !self.gravity_mps2.is_finite() || self.gravity_mps2 <= 0.0 {
            return Err(invalid(
                "gravity",
                self.gravity_mps2,
                "must be finite and positive",
            ));
        }
        Ok(())
    }

    pub fn at_angle(self, angle_deg: f64) -> Self {
        Self { angle_deg, ..self }
    }
}

/// Which quadratic root counts as the landing point, and whether apex
/// heights below the horizontal are mirrored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnglePolicy {
    /// Full-circle convention: even 90-degree bands take the first positive
    /// root, odd bands the first negative one. Apex heights for angles in
    /// (180, 360) are reflected about the launch height.
    #[default]
    QuadrantBand,
    /// Only a forward (positive) landing counts, and apexes are never
    /// reflected.
    ForwardOnly,
}

impl std::str::FromStr for AnglePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quadrant-band" => Ok(AnglePolicy::QuadrantBand),
            "forward-only" => Ok(AnglePolicy::ForwardOnly),
            other => Err(format!(
                "Unknown angle policy '{other}'. Expected quadrant-band or forward-only."
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Landing {
    Root(f64),
    /// Straight up or down from above the baseline. Carries `sqrt(2h/g)`,
    /// which is a fall time rather than a distance; charts plot it as a
    /// distance regardless.
    Vertical(f64),
    /// Negative discriminant, or no root on the side the policy asks for.
    NoRoot,
    /// Coefficients blew up (zero velocity, zero gravity, NaN input).
    Undefined,
}

impl Landing {
    /// `NoRoot` reads as 0, `Undefined` as NaN.
    pub fn distance(self) -> f64 {
        match self {
            Landing::Root(x) | Landing::Vertical(x) => x,
            Landing::NoRoot => 0.0,
            Landing::Undefined => f64::NAN,
        }
    }

    pub fn is_defined(self) -> bool {
        !matches!(self, Landing::Undefined)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

/// Height over horizontal distance, `y(x) = a*x^2 + b*x + c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parabola {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Parabola {
    pub fn of(params: LaunchParameters) -> Self {
        let theta = params.angle_deg.to_radians();
        let cos_theta = theta.cos();
        Self {
            a: -params.gravity_mps2
                / (2.0 * params.speed_mps * params.speed_mps * cos_theta * cos_theta),
            b: theta.tan(),
            c: params.height_m,
        }
    }

    pub fn height_at(&self, x: f64) -> f64 {
        (self.a * x * x) + (self.b * x) + self.c
    }

    pub fn discriminant(&self) -> f64 {
        (self.b * self.b) - (4.0 * self.a * self.c)
    }
}

fn is_vertical(angle_deg: f64) -> bool {
    angle_deg.rem_euclid(180.0) == 90.0
}

fn in_even_band(angle_deg: f64) -> bool {
    (angle_deg / 90.0).floor().rem_euclid(2.0) == 0.0
}

pub fn landing(params: LaunchParameters, policy: AnglePolicy) -> Landing {
    if is_vertical(params.angle_deg) {
        return if params.height_m > 0.0 {
            Landing::Vertical((2.0 * params.height_m / params.gravity_mps2).sqrt())
        } else {
            Landing::NoRoot
        };
    }

    let curve = Parabola::of(params);
    let disc = curve.discriminant();
    if !curve.a.is_finite() || curve.a == 0.0 || !curve.b.is_finite() || !disc.is_finite() {
        return Landing::Undefined;
    }

    if disc < 0.0 {
        return Landing::NoRoot;
    }
    if disc == 0.0 {
        return Landing::Root(-curve.b / (2.0 * curve.a));
    }

    let sqrt_disc = disc.sqrt();
    let roots = [
        (-curve.b + sqrt_disc) / (2.0 * curve.a),
        (-curve.b - sqrt_disc) / (2.0 * curve.a),
    ];
    let forward = match policy {
        AnglePolicy::ForwardOnly => true,
        AnglePolicy::QuadrantBand => in_even_band(params.angle_deg),
    };

    roots
        .into_iter()
        .find(|&root| if forward { root > 0.0 } else { root < 0.0 })
        .map_or(Landing::NoRoot, Landing::Root)
}

pub fn landing_distance(params: LaunchParameters, policy: AnglePolicy) -> f64 {
    landing(params, policy).distance()
}

/// Apex of the arc. For angles in (180, 360) under [`AnglePolicy::QuadrantBand`]
/// only `y` is reflected about the launch height; `x` keeps the unreflected
/// value.
pub fn vertex(params: LaunchParameters, policy: AnglePolicy) -> Vertex {
    if params.angle_deg == 0.0 {
        return Vertex {
            x: 0.0,
            y: params.height_m,
        };
    }

    let theta = params.angle_deg.to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let v_sq = params.speed_mps * params.speed_mps;
    let x = v_sq * sin_theta * cos_theta / params.gravity_mps2;
    let mut y = params.height_m + (v_sq * sin_theta * sin_theta) / (2.0 * params.gravity_mps2);

    let lower_half = params.angle_deg > 180.0 && params.angle_deg < 360.0;
    if policy == AnglePolicy::QuadrantBand && lower_half {
        y = -y + params.height_m + params.height_m;
    }

    Vertex { x, y }
}

/// Samples the arc from `x = 0` up to 5% past the landing point. Empty when
/// there is no positive landing distance.
pub fn sample_curve(
    params: LaunchParameters,
    policy: AnglePolicy,
    step_m: f64,
) -> Result<Vec<(f64, f64)>, CoreError> {
    if !step_m.is_finite() || step_m <= 0.0 {
        return Err(CoreError::InvalidStep(step_m));
    }

    let end = landing_distance(params, policy);
    if !end.is_finite() || end <= 0.0 {
        return Ok(Vec::new());
    }

    let limit = end + (end * CURVE_OVERSHOOT_RATIO);
    let curve = Parabola::of(params);
    Ok((0u64..)
        .map(|i| i as f64 * step_m)
        .take_while(|&x| x < limit)
        .map(|x| (x, curve.height_at(x)))
        .collect())
}

pub fn velocity_components(params: LaunchParameters) -> (f64, f64) {
    let theta = params.angle_deg.to_radians();
    let vx = params.speed_mps * theta.cos();
    let vy = params.speed_mps * theta.sin();
    (vx, vy)
}

pub fn flight_time_and_range(params: LaunchParameters) -> Result<(f64, f64), CoreError> {
    params.validate()?;

    let (vx, vy) = velocity_components(params);
    let g = params.gravity_mps2;
    let disc = vy * vy + 2.0 * g * params.height_m;
    if disc < 0.0 {
        return Err(CoreError::NoLandingTime(disc));
    }

    let t_land = (vy + disc.sqrt()) / g;
    if t_land < 0.0 {
        return Err(CoreError::NegativeLandingTime(t_land));
    }

    Ok((t_land, vx * t_land))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    fn launch(angle_deg: f64, speed_mps: f64, height_m: f64) -> LaunchParameters {
        LaunchParameters::unchecked(angle_deg, speed_mps, height_m)
    }

    #[test]
    fn flat_ground_matches_closed_form_range() {
        for angle in [0.0_f64, 30.0, 45.0, 60.0] {
            let expected = 40.0 * 40.0 * (2.0 * angle).to_radians().sin() / 10.0;
            let actual = landing_distance(launch(angle, 40.0, 0.0), AnglePolicy::default());
            assert_close(actual, expected, 1e-9);
        }
    }

    #[test]
    fn vertical_launch_uses_fall_time_branch() {
        let policy = AnglePolicy::QuadrantBand;
        assert_eq!(landing_distance(launch(90.0, 40.0, 0.0), policy), 0.0);
        let up = landing(launch(90.0, 40.0, 5.0), policy);
        assert_eq!(up, Landing::Vertical(1.0));
        let down = landing(launch(270.0, 40.0, 5.0), policy);
        assert_eq!(down, Landing::Vertical(1.0));
        assert_eq!(
            landing(launch(90.0, 40.0, 5.0), AnglePolicy::ForwardOnly),
            Landing::Vertical(1.0)
        );
    }

    #[test]
    fn odd_band_prefers_negative_root() {
        let params = launch(120.0, 40.0, 0.0);
        let backward = landing_distance(params, AnglePolicy::QuadrantBand);
        assert_close(backward, -138.564_064_605_510_1, 1e-9);
        assert_eq!(landing_distance(params, AnglePolicy::ForwardOnly), 0.0);
    }

    #[test]
    fn raised_launch_lands_past_flat_range() {
        let params = launch(45.0, 20.0, 10.0);
        let flat = landing_distance(launch(45.0, 20.0, 0.0), AnglePolicy::default());
        let raised = landing_distance(params, AnglePolicy::default());
        assert!(raised > flat);
        assert_close(Parabola::of(params).height_at(raised), 0.0, 1e-9);
    }

    #[test]
    fn negative_discriminant_has_no_root() {
        let params = launch(30.0, 10.0, -100.0);
        assert_eq!(landing(params, AnglePolicy::default()), Landing::NoRoot);
        assert_eq!(landing_distance(params, AnglePolicy::default()), 0.0);
    }

    #[test]
    fn zero_velocity_is_undefined() {
        let result = landing(launch(30.0, 0.0, 2.0), AnglePolicy::default());
        assert_eq!(result, Landing::Undefined);
        assert!(result.distance().is_nan());
        assert!(!result.is_defined());
    }

    #[test]
    fn flat_launch_vertex_is_launch_point() {
        let apex = vertex(launch(0.0, 55.0, 7.5), AnglePolicy::default());
        assert_eq!(apex, Vertex { x: 0.0, y: 7.5 });
    }

    #[test]
    fn vertex_at_45_degrees() {
        let apex = vertex(launch(45.0, 40.0, 0.0), AnglePolicy::default());
        assert_close(apex.x, 80.0, 1e-9);
        assert_close(apex.y, 40.0, 1e-9);
    }

    #[test]
    fn lower_half_apex_is_reflected_about_launch_height() {
        let params = launch(225.0, 30.0, 4.0);
        let plain = vertex(params, AnglePolicy::ForwardOnly);
        let reflected = vertex(params, AnglePolicy::QuadrantBand);
        assert_eq!(reflected.y, -plain.y + 4.0 + 4.0);
        assert_eq!(reflected.x, plain.x);
    }

    #[test]
    fn sampled_curve_starts_at_launch_and_stops_past_landing() {
        let params = launch(60.0, 40.0, 3.0);
        let end = landing_distance(params, AnglePolicy::default());
        let samples = sample_curve(params, AnglePolicy::default(), DEFAULT_SAMPLE_STEP_M)
            .expect("step is valid");

        assert_eq!(samples[0], (0.0, 3.0));
        let last = samples.last().expect("curve has samples");
        assert!(last.0 <= 1.05 * end + 1e-9);
        assert!(last.0 + DEFAULT_SAMPLE_STEP_M >= 1.05 * end - 1e-9);
    }

    #[test]
    fn sampled_curve_is_empty_without_forward_landing() {
        let samples = sample_curve(launch(90.0, 40.0, 0.0), AnglePolicy::default(), 0.2)
            .expect("step is valid");
        assert!(samples.is_empty());
    }

    #[test]
    fn rejects_non_positive_step() {
        let err = sample_curve(launch(45.0, 10.0, 0.0), AnglePolicy::default(), 0.0)
            .expect_err("zero step should fail");
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn validating_constructor_rejects_bad_inputs() {
        assert!(LaunchParameters::new(45.0, -1.0, 0.0).is_err());
        assert!(LaunchParameters::with_gravity(45.0, 1.0, 0.0, 0.0).is_err());
        assert!(LaunchParameters::new(f64::NAN, 1.0, 0.0).is_err());
        assert!(LaunchParameters::new(45.0, 0.0, 0.0).is_ok());
    }

    #[test]
    fn computes_known_flight_time_for_flat_ground() {
        let (time, distance) =
            flight_time_and_range(launch(45.0, 10.0, 0.0)).expect("calculation should succeed");

        assert_close(time, 1.4142, 0.001);
        assert_close(distance, 10.0, 0.001);
    }

    #[test]
    fn zero_velocity_falls_straight_down() {
        let (time, distance) =
            flight_time_and_range(launch(10.0, 0.0, 2.0)).expect("calculation should succeed");

        assert_close(time, 0.6325, 0.001);
        assert_close(distance, 0.0, 0.0001);
    }

    #[test]
    fn rejects_impossible_landing_time() {
        let err = flight_time_and_range(launch(0.0, 1.0, -10.0))
            .expect_err("calculation should fail");

        assert!(matches!(err, CoreError::NoLandingTime(_)));
        assert!(err.to_string().contains("no real landing time"));
    }
}
