//! Marker colours.
//!
//! Colours serialise as CSS strings (`rgba(r, g, b, a)`) so the browser can
//! hand them straight to Cesium. Parsing accepts `#RRGGBB`, `#RRGGBBAA`,
//! `rgba(...)`/`rgb(...)` and the CSS colour names used by the palettes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn gray() -> Self {
        Self::rgb(128, 128, 128)
    }

    /// Parse a colour string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| format!("invalid hex colour '{}'", s));
        }
        let lower = s.to_ascii_lowercase();
        if let Some(body) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(body).ok_or_else(|| format!("invalid colour '{}'", s));
        }
        named_color(&lower).ok_or_else(|| format!("unknown colour name '{}'", s))
    }

    /// `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, round_alpha(self.a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}

fn round_alpha(a: f32) -> f32 {
    (a * 100.0).round() / 100.0
}

fn parse_hex(hex: &str) -> Option<Color> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

fn parse_functional(body: &str) -> Option<Color> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    let channel = |s: &str| s.parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok().filter(|a| a.is_finite())?;
            Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?).with_alpha(alpha))
        }
        _ => None,
    }
}

/// CSS named colours referenced by the built-in palettes.
fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "gray" | "grey" => (128, 128, 128),
        "red" => (255, 0, 0),
        "orange" => (255, 165, 0),
        "yellow" => (255, 255, 0),
        "lightyellow" => (255, 255, 224),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "lightgreen" => (144, 238, 144),
        "darkgreen" => (0, 100, 0),
        "yellowgreen" => (154, 205, 50),
        "cyan" => (0, 255, 255),
        "lightcyan" => (224, 255, 255),
        "blue" => (0, 0, 255),
        "darkblue" => (0, 0, 139),
        "skyblue" => (135, 206, 235),
        "lightblue" => (173, 216, 230),
        "mintcream" => (245, 255, 250),
        "darkviolet" => (148, 0, 211),
        "blueviolet" => (138, 43, 226),
        "violet" => (238, 130, 238),
        "plum" => (221, 160, 221),
        "lavender" => (230, 230, 250),
        "sienna" => (160, 82, 45),
        "saddlebrown" => (139, 69, 19),
        "peru" => (205, 133, 63),
        "burlywood" => (222, 184, 135),
        "wheat" => (245, 222, 179),
        "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        _ => return None,
    };
    Some(Color::rgb(r, g, b))
}

/// Convert HSL (hue in degrees, saturation/lightness in `[0, 1]`) to RGB.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}
