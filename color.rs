//! color - `#rrggbb` colors and alpha-encoded paints

use core::fmt::{self, Write};
use heapless::String;

/// An opaque RGB color, written as `#rrggbb`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const BLACK: HexColor = HexColor::new(0x00, 0x00, 0x00);
    pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or the `#rgb` shorthand, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?.as_bytes();
        match digits.len() {
            6 => Some(Self::new(
                byte(digits[0], digits[1])?,
                byte(digits[2], digits[3])?,
                byte(digits[4], digits[5])?,
            )),
            3 => Some(Self::new(
                byte(digits[0], digits[0])?,
                byte(digits[1], digits[1])?,
                byte(digits[2], digits[2])?,
            )),
            _ => None,
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Rgba {
        Rgba { color: self, alpha: alpha_byte(opacity) }
    }

    pub fn to_hex(self) -> String<7> {
        let mut out = String::new();
        let _ = write!(out, "{}", self);
        out
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A color plus an 8-bit alpha, as handed to a [`Canvas`](crate::Canvas).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub color: HexColor,
    pub alpha: u8,
}

impl Rgba {
    pub fn opacity(self) -> f32 {
        self.alpha as f32 / 255.0
    }

    /// `#rrggbbaa`: the base color with the alpha appended as two hex digits.
    pub fn to_hex(self) -> String<9> {
        let mut out = String::new();
        let _ = write!(out, "{}{:02x}", self.color, self.alpha);
        out
    }
}

/// `floor(opacity * 255)`, saturating outside `[0, 1]`.
pub fn alpha_byte(opacity: f32) -> u8 {
    if !(opacity > 0.0) {
        return 0;
    }
    libm::floorf(opacity.min(1.0) * 255.0) as u8
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn byte(hi: u8, lo: u8) -> Option<u8> {
    Some(nibble(hi)? << 4 | nibble(lo)?)
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::HexColor;
    use core::fmt;
    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for HexColor {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(&self.to_hex())
        }
    }

    struct HexVisitor;

    impl<'de> Visitor<'de> for HexVisitor {
        type Value = HexColor;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a color string like \"#3b82f6\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<HexColor, E> {
            HexColor::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    impl<'de> Deserialize<'de> for HexColor {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(HexVisitor)
        }
    }
}
