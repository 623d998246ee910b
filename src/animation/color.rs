use std::fmt;
use std::str::FromStr;

use crate::animation::interpolate::Lerp;
use crate::foundation::error::{ReelError, ReelResult};

/// Straight-alpha RGBA8 color.
///
/// Parses CSS-like strings (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`, a few names)
/// and serializes back to `#rrggbb` / `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from channels including alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a color string, returning a validation error on malformed input.
    pub fn parse(s: &str) -> ReelResult<Self> {
        parse_css(s).map_err(|e| ReelError::validation(format!("color \"{s}\": {e}")))
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: unit_to_u8(alpha),
            ..self
        }
    }

    /// Alpha as a unit value.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl FromStr for Color {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_css(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_css(s: &str) -> Result<Color, String> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "white" => return Ok(Color::WHITE),
        "black" => return Ok(Color::BLACK),
        "transparent" => return Ok(Color::TRANSPARENT),
        _ => {}
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(body);
    }
    Err("expected #hex, rgb(), rgba() or a named color".to_owned())
}

fn parse_hex(hex: &str) -> Result<Color, String> {
    fn nibble(c: u8) -> Result<u8, String> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid hex digit '{}'", c as char))
    }

    let bytes = hex.as_bytes();
    let channels: Vec<u8> = match bytes.len() {
        3 | 4 => bytes
            .iter()
            .map(|&c| nibble(c).map(|n| n * 17))
            .collect::<Result<_, _>>()?,
        6 | 8 => bytes
            .chunks(2)
            .map(|pair| -> Result<u8, String> { Ok(nibble(pair[0])? * 16 + nibble(pair[1])?) })
            .collect::<Result<_, _>>()?,
        _ => return Err("hex color must have 3, 4, 6 or 8 digits".to_owned()),
    };
    Ok(Color::rgba(
        channels[0],
        channels[1],
        channels[2],
        channels.get(3).copied().unwrap_or(255),
    ))
}

fn parse_functional(body: &str) -> Result<Color, String> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err("rgb()/rgba() takes 3 or 4 components".to_owned());
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let v: f64 = part
            .parse()
            .map_err(|_| format!("invalid channel \"{part}\""))?;
        if !(0.0..=255.0).contains(&v) {
            return Err(format!("channel {v} out of 0..=255"));
        }
        *slot = v.round() as u8;
    }
    let a = match parts.get(3) {
        Some(part) => {
            let v: f64 = part.parse().map_err(|_| format!("invalid alpha \"{part}\""))?;
            if !(0.0..=1.0).contains(&v) {
                return Err(format!("alpha {v} out of 0..=1"));
            }
            unit_to_u8(v)
        }
        None => 255,
    };
    Ok(Color::rgba(rgb[0], rgb[1], rgb[2], a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#79be15").unwrap(), Color::rgb(0x79, 0xbe, 0x15));
        assert_eq!(Color::parse("#fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::parse("#0000ff80").unwrap(),
            Color::rgba(0, 0, 255, 128)
        );
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(
            Color::parse("rgba(16, 185, 129, 0.5)").unwrap(),
            Color::rgba(16, 185, 129, 128)
        );
        assert_eq!(
            Color::parse("rgb(0,0,0)").unwrap(),
            Color::BLACK
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("#gggggg").is_err());
        assert!(Color::parse("rgba(300, 0, 0, 1)").is_err());
        assert!(Color::parse("chartreuse-ish").is_err());
    }

    #[test]
    fn serde_uses_css_strings() {
        let c: Color = serde_json::from_value(json!("#1f2937")).unwrap();
        assert_eq!(serde_json::to_value(c).unwrap(), json!("#1f2937"));
        let translucent = Color::WHITE.with_alpha(0.5);
        assert_eq!(serde_json::to_value(translucent).unwrap(), json!("#ffffff80"));
    }

    #[test]
    fn lerp_rounds_per_channel() {
        let mid = Color::lerp(&Color::BLACK, &Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(128, 128, 128));
    }
}
