//! Hex color parsing and linear color mixing.
//!
//! Highlight styles are derived from a cluster's base color by blending it
//! toward a dark tone. Colors are validated once, when the catalog loads,
//! so mixing itself cannot fail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// RGB color (0-255 per channel), written as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color string that is not `#` followed by six hex digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorError {
    pub value: String,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed color '{}': expected '#' followed by 6 hex digits",
            self.value
        )
    }
}

impl std::error::Error for ColorError {}

impl HexColor {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a strict `#rrggbb` string (either case).
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let err = || ColorError { value: s.to_string() };
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[0] != b'#' {
            return Err(err());
        }
        let byte = |hi: u8, lo: u8| -> Option<u8> { Some(hex_digit(hi)? << 4 | hex_digit(lo)?) };
        match (
            byte(bytes[1], bytes[2]),
            byte(bytes[3], bytes[4]),
            byte(bytes[5], bytes[6]),
        ) {
            (Some(r), Some(g), Some(b)) => Ok(Self { r, g, b }),
            _ => Err(err()),
        }
    }
}

#[inline]
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Linear interpolation of one scalar channel.
#[inline]
pub fn mix(start: f64, end: f64, percent: f64) -> f64 {
    start + percent * (end - start)
}

/// Blend `a` toward `b` by `percent` (0.0 = `a`, 1.0 = `b`), per channel,
/// rounded to the nearest integer.
pub fn mix_colors(a: HexColor, b: HexColor, percent: f64) -> HexColor {
    let channel = |x: u8, y: u8| mix(x as f64, y as f64, percent).round().clamp(0.0, 255.0) as u8;
    HexColor {
        r: channel(a.r, b.r),
        g: channel(a.g, b.g),
        b: channel(a.b, b.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> HexColor {
        HexColor::parse(s).unwrap()
    }

    #[test]
    fn parses_either_case() {
        assert_eq!(hex("#FF8800"), HexColor::new(255, 136, 0));
        assert_eq!(hex("#ff8800"), HexColor::new(255, 136, 0));
    }

    #[test]
    fn displays_lowercase_padded() {
        assert_eq!(HexColor::new(10, 0, 255).to_string(), "#0a00ff");
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "#fff", "ff8800", "#ff880", "#ff88000", "#gg0000", "#ff 800"] {
            let err = HexColor::parse(bad).unwrap_err();
            assert_eq!(err.value, bad);
        }
    }

    #[test]
    fn scalar_mix() {
        assert_eq!(mix(0.0, 100.0, 0.25), 25.0);
        assert_eq!(mix(200.0, 100.0, 0.5), 150.0);
    }

    #[test]
    fn self_mix_is_identity() {
        let c = hex("#3a7bd5");
        for p in [0.0, 0.1, 0.33, 0.5, 0.9, 1.0] {
            assert_eq!(mix_colors(c, c, p), c);
        }
    }

    #[test]
    fn endpoints() {
        let a = hex("#00ff00");
        let b = hex("#111111");
        assert_eq!(mix_colors(a, b, 0.0), a);
        assert_eq!(mix_colors(a, b, 1.0), b);
    }

    #[test]
    fn blend_rounds_to_nearest() {
        // 0 + 0.3 * 17 = 5.1, 255 + 0.3 * (17 - 255) = 183.6
        assert_eq!(mix_colors(hex("#00ff00"), hex("#111111"), 0.3), hex("#05b805"));
        assert_eq!(mix_colors(hex("#000000"), hex("#ffffff"), 0.5), hex("#808080"));
    }

    #[test]
    fn deserializes_from_toml_string() {
        #[derive(Deserialize)]
        struct Holder {
            color: HexColor,
        }
        let h: Holder = toml::from_str("color = \"#00FF00\"").unwrap();
        assert_eq!(h.color, HexColor::new(0, 255, 0));
        assert!(toml::from_str::<Holder>("color = \"green\"").is_err());
    }
}
