use thiserror::Error;

/// Arguments the trajectory core refuses to work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("color index {index} is outside 0..{total}")]
    ColorIndexOutOfRange { index: i64, total: i64 },

    #[error("invalid {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid hex color '{0}', expected #rrggbb")]
    InvalidHexColor(String),

    #[error("sample step must be a positive finite number, got {0}")]
    InvalidStep(f64),

    #[error("no real landing time: vy^2 + 2*g*h is negative ({0})")]
    NoLandingTime(f64),

    #[error("landing time computed as negative ({0})")]
    NegativeLandingTime(f64),
}

impl CoreError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            CoreError::ColorIndexOutOfRange { .. }
                | CoreError::InvalidParameter { .. }
                | CoreError::InvalidHexColor(_)
                | CoreError::InvalidStep(_)
        )
    }
}
