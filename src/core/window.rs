use std::ops::Range;

#[derive(Clone, Debug, PartialEq)]
pub struct AxisPadding {
    /// Room left of the launch point, in metres.
    pub left_m: f64,
    /// Extra x span past the furthest landing, as a fraction of it.
    pub overshoot_ratio: f64,
    /// Extra y span above the highest apex, as a fraction of it.
    pub headroom_ratio: f64,
}

impl Default for AxisPadding {
    fn default() -> Self {
        Self {
            left_m: 40.0,
            overshoot_ratio: 0.5,
            headroom_ratio: 0.1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartWindow {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

fn finite_max(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

fn finite_min(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
}

impl ChartWindow {
    /// Window for a set of trajectories, from their landing distances and
    /// the heights they reach. Undefined values are ignored; an all-zero set still gets
    /// a unit span so the chart has something to draw into.
    pub fn for_trajectories(
        landings: impl IntoIterator<Item = f64>,
        heights: impl IntoIterator<Item = f64>,
        padding: &AxisPadding,
    ) -> Self {
        let end = finite_max(landings).unwrap_or(0.0).max(0.0);
        let top = finite_max(heights).unwrap_or(0.0).max(0.0);

        let x_max = if end > 0.0 {
            end + end * padding.overshoot_ratio
        } else {
            1.0
        };
        let y_max = if top > 0.0 {
            top + top * padding.headroom_ratio
        } else {
            1.0
        };

        Self {
            x: -padding.left_m..x_max,
            y: 0.0..y_max,
        }
    }

    /// Window for an angle sweep: angles on x, the swept quantity on y.
    pub fn for_sweep(max_angle_deg: f64, values: &[f64], headroom_ratio: f64) -> Self {
        let high = finite_max(values.iter().copied()).unwrap_or(0.0).max(0.0);
        let low = finite_min(values.iter().copied()).unwrap_or(0.0).min(0.0);
        let mut y_max = high + high * headroom_ratio;
        let mut y_min = low + low * headroom_ratio;
        if y_max - y_min <= 0.0 {
            y_min = -1.0;
            y_max = 1.0;
        }

        Self {
            x: 0.0..max_angle_deg.max(1.0),
            y: y_min..y_max,
        }
    }

    /// Stretches one axis so the data window keeps a fixed x:y ratio.
    pub fn with_fixed_ratio(self, distance_to_height_ratio: f64) -> Self {
        let mut x_span = (self.x.end - self.x.start).max(1.0);
        let mut y_span = (self.y.end - self.y.start).max(1.0);

        if x_span / y_span < distance_to_height_ratio {
            x_span = y_span * distance_to_height_ratio;
        } else {
            y_span = x_span / distance_to_height_ratio;
        }

        Self {
            x: self.x.start..self.x.start + x_span,
            y: self.y.start..self.y.start + y_span,
        }
    }
}
