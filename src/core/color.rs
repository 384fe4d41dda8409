use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::core::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidHexColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl TryFrom<String> for Rgb {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// red, orange, yellow, green, blue, indigo, violet
pub const RAINBOW_ANCHORS: [Rgb; 7] = [
    Rgb::new(255, 0, 0),
    Rgb::new(255, 127, 0),
    Rgb::new(255, 255, 0),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(75, 0, 130),
    Rgb::new(148, 0, 211),
];

fn lerp_channel(start: u8, end: u8, t: f64) -> u8 {
    let value = f64::from(start) + (f64::from(end) - f64::from(start)) * t;
    // `as` truncates toward zero and saturates into 0..=255.
    value as u8
}

/// Spreads `total` series evenly over the seven rainbow anchors and returns
/// the interpolated color for series `index`.
pub fn rainbow_color(index: i64, total: i64) -> Result<Rgb, CoreError> {
    if index < 0 || index >= total {
        return Err(CoreError::ColorIndexOutOfRange { index, total });
    }

    let anchors = RAINBOW_ANCHORS.len();
    let position = index as f64 * anchors as f64 / total as f64;
    let segment = (position.floor() as usize).min(anchors - 1);
    let start = RAINBOW_ANCHORS[segment];
    let end = RAINBOW_ANCHORS[(segment + 1).min(anchors - 1)];
    let t = position - segment as f64;

    Ok(Rgb {
        r: lerp_channel(start.r, end.r, t),
        g: lerp_channel(start.g, end.g, t),
        b: lerp_channel(start.b, end.b, t),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_pure_red_and_violet() {
        assert_eq!(rainbow_color(0, 7).unwrap().to_hex(), "#ff0000");
        assert_eq!(rainbow_color(6, 7).unwrap().to_hex(), "#9400d3");
        assert_eq!(rainbow_color(6, 7).unwrap(), Rgb::new(148, 0, 211));
    }

    #[test]
    fn interpolates_between_anchors() {
        // position 0.5 sits halfway between red and orange
        assert_eq!(rainbow_color(1, 14).unwrap(), Rgb::new(255, 63, 0));
        // position 3.5 sits halfway between green and blue
        assert_eq!(rainbow_color(7, 14).unwrap(), Rgb::new(0, 127, 127));
    }

    #[test]
    fn every_anchor_is_hit_when_total_is_seven() {
        for (i, anchor) in RAINBOW_ANCHORS.iter().enumerate() {
            assert_eq!(rainbow_color(i as i64, 7).unwrap(), *anchor);
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        for (index, total) in [(-1, 10), (10, 10), (0, 0)] {
            let err = rainbow_color(index, total).expect_err("index should be rejected");
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(Rgb::new(1, 2, 3).to_hex(), "#010203");
    }

    #[test]
    fn parses_hex_codes() {
        assert_eq!("#fa8072".parse::<Rgb>(), Ok(Rgb::new(250, 128, 114)));
        assert_eq!("#9400D3".parse::<Rgb>(), Ok(Rgb::new(148, 0, 211)));
        for bad in ["fa8072", "#fa807", "#gg0000", "#ff00001"] {
            assert!(bad.parse::<Rgb>().is_err(), "{bad} should not parse");
        }
    }
}
