use crate::core::ballistics::{AnglePolicy, LaunchParameters, landing_distance, vertex};
use crate::core::error::CoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepQuantity {
    LandingDistance,
    ApexHeight,
}

impl SweepQuantity {
    pub fn label(self) -> &'static str {
        match self {
            SweepQuantity::LandingDistance => "Landing distance (m)",
            SweepQuantity::ApexHeight => "Apex height (m)",
        }
    }

    fn evaluate(self, params: LaunchParameters) -> f64 {
        match self {
            SweepQuantity::LandingDistance => landing_distance(params, AnglePolicy::QuadrantBand),
            SweepQuantity::ApexHeight => vertex(params, AnglePolicy::QuadrantBand).y,
        }
    }
}

/// One quantity evaluated over launch angles `0, interval, ..., max_angle`.
#[derive(Clone, Debug, PartialEq)]
pub struct AngleSweep {
    pub quantity: SweepQuantity,
    pub base: LaunchParameters,
    pub max_angle_deg: f64,
    pub interval_deg: f64,
    pub angles: Vec<f64>,
    pub values: Vec<f64>,
}

impl AngleSweep {
    pub fn new(
        quantity: SweepQuantity,
        base: LaunchParameters,
        max_angle_deg: f64,
        interval_deg: f64,
    ) -> Result<Self, CoreError> {
        if !interval_deg.is_finite() || interval_deg <= 0.0 {
            return Err(CoreError::InvalidStep(interval_deg));
        }
        if !max_angle_deg.is_finite() || max_angle_deg < 0.0 {
            return Err(CoreError::InvalidParameter {
                name: "max angle",
                value: max_angle_deg,
                reason: "must be finite and non-negative",
            });
        }

        let angles: Vec<f64> = (0u64..)
            .map(|i| i as f64 * interval_deg)
            .take_while(|&angle| angle < max_angle_deg + interval_deg)
            .collect();
        let values = angles
            .iter()
            .map(|&angle| quantity.evaluate(base.at_angle(angle)))
            .collect();

        Ok(Self {
            quantity,
            base,
            max_angle_deg,
            interval_deg,
            angles,
            values,
        })
    }

    pub fn landing(
        base: LaunchParameters,
        max_angle_deg: f64,
        interval_deg: f64,
    ) -> Result<Self, CoreError> {
        Self::new(
            SweepQuantity::LandingDistance,
            base,
            max_angle_deg,
            interval_deg,
        )
    }

    pub fn apex(
        base: LaunchParameters,
        max_angle_deg: f64,
        interval_deg: f64,
    ) -> Result<Self, CoreError> {
        Self::new(SweepQuantity::ApexHeight, base, max_angle_deg, interval_deg)
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.angles.iter().copied().zip(self.values.iter().copied())
    }

    /// First sampled point with the largest finite value.
    pub fn highest_point(&self) -> Option<(f64, f64)> {
        self.points()
            .filter(|(_, value)| value.is_finite())
            .fold(None, |best: Option<(f64, f64)>, point| match best {
                Some(b) if b.1 >= point.1 => Some(b),
                _ => Some(point),
            })
    }

    /// First sampled point with the smallest finite value.
    pub fn lowest_point(&self) -> Option<(f64, f64)> {
        self.points()
            .filter(|(_, value)| value.is_finite())
            .fold(None, |best: Option<(f64, f64)>, point| match best {
                Some(b) if b.1 <= point.1 => Some(b),
                _ => Some(point),
            })
    }

    /// The highest point, only when it rises above zero.
    pub fn max_point(&self) -> Option<(f64, f64)> {
        self.highest_point().filter(|(_, value)| *value > 0.0)
    }

    /// The lowest point, only when it dips below zero.
    pub fn min_point(&self) -> Option<(f64, f64)> {
        self.lowest_point().filter(|(_, value)| *value < 0.0)
    }

    pub fn point_at_angle(&self, angle_deg: f64) -> Option<(f64, f64)> {
        let idx = (angle_deg / self.interval_deg).round();
        if idx < 0.0 {
            return None;
        }
        let idx = idx as usize;
        Some((*self.angles.get(idx)?, *self.values.get(idx)?))
    }
}
