use std::fmt;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An sRGB color written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);
    pub const WHITE: HexColor = HexColor::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl FromStr for HexColor {
    type Err = Error;

    /// Parse `#RRGGBB`; the leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!("#FF1744".parse::<HexColor>().unwrap(), HexColor::new(255, 23, 68));
        assert_eq!("8d6e63".parse::<HexColor>().unwrap(), HexColor::new(141, 110, 99));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "#FFF", "#GG0000", "#FF00000", "#ÿÿÿ", "##FF0000", "#+F+F+F", "+FF+FF"] {
            assert!(
                matches!(bad.parse::<HexColor>(), Err(Error::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn displays_uppercase() {
        assert_eq!(HexColor::new(248, 187, 217).to_string(), "#F8BBD9");
    }

    #[test]
    fn deserializes_from_json_string() {
        let c: HexColor = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(c, HexColor::BLACK);
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }
}
