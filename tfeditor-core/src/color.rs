//! Straight-alpha RGBA color value with CSS parsing and formatting.

use crate::color_space::{hsl_to_rgb, hsv_to_rgb, rgb_to_hsl, rgb_to_hsv};
use crate::error::TransferFunctionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight (non-premultiplied) alpha.
/// All channels are kept in [0, 1] at full precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Accepted serialized forms: a channel record or any CSS string `Color` parses.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Channels {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "opaque")]
        a: f64,
    },
}

fn opaque() -> f64 {
    1.0
}

impl TryFrom<ColorRepr> for Color {
    type Error = TransferFunctionError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Css(text) => text.parse(),
            ColorRepr::Channels { r, g, b, a } => Ok(Color::rgba(r, g, b, a)),
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Opaque color; channels are clamped to [0, 1].
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Color with alpha; channels are clamped to [0, 1].
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::rgb(
            rgb[0] as f64 / 255.0,
            rgb[1] as f64 / 255.0,
            rgb[2] as f64 / 255.0,
        )
    }

    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::rgba(
            rgba[0] as f64 / 255.0,
            rgba[1] as f64 / 255.0,
            rgba[2] as f64 / 255.0,
            rgba[3] as f64 / 255.0,
        )
    }

    /// Hue in degrees, saturation and lightness in [0, 1].
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(Some(h), unit(s), unit(l));
        Self::rgb(r, g, b)
    }

    /// Hue in degrees, saturation and value in [0, 1].
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = hsv_to_rgb(Some(h), unit(s), unit(v));
        Self::rgb(r, g, b)
    }

    pub fn to_hsl(&self) -> (Option<f64>, f64, f64) {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    pub fn to_hsv(&self) -> (Option<f64>, f64, f64) {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: unit(a), ..self }
    }

    /// RGB scaled by alpha, alpha unchanged.
    pub fn premultiplied(self) -> Self {
        Self {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            to_u8(self.r),
            to_u8(self.g),
            to_u8(self.b),
            to_u8(self.a),
        ]
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    /// Channel-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Color, tolerance: f64) -> bool {
        (self.r - other.r).abs() <= tolerance
            && (self.g - other.g).abs() <= tolerance
            && (self.b - other.b).abs() <= tolerance
            && (self.a - other.a).abs() <= tolerance
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, _] = self.to_rgba8();
        write!(f, "rgba({r}, {g}, {b}, {})", self.a)
    }
}

impl FromStr for Color {
    type Err = TransferFunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let invalid = || TransferFunctionError::InvalidColor(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&text, &["rgba", "rgb"]) {
            return parse_rgb_args(&args).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&text, &["hsla", "hsl"]) {
            return parse_hsl_args(&args).ok_or_else(invalid);
        }
        named_color(&text).ok_or_else(invalid)
    }
}

#[inline]
fn to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex
        .bytes()
        .map(|c| (c as char).to_digit(16).map(|d| d as u8))
        .collect::<Option<Vec<u8>>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Color::from_rgb8([r * 17, g * 17, b * 17])),
        [r, g, b, a] => Some(Color::from_rgba8([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Some(Color::from_rgb8([
            r1 << 4 | r0,
            g1 << 4 | g0,
            b1 << 4 | b0,
        ])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => Some(Color::from_rgba8([
            r1 << 4 | r0,
            g1 << 4 | g0,
            b1 << 4 | b0,
            a1 << 4 | a0,
        ])),
        _ => None,
    }
}

/// Split `name(a, b, c)` / `name(a b c / d)` into its arguments.
fn function_args(text: &str, names: &[&str]) -> Option<Vec<String>> {
    let name = names.iter().find(|n| text.starts_with(**n))?;
    let inner = text[name.len()..]
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let args: Vec<String> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    Some(args)
}

/// Parse a number or percentage; percentages map to `percent_scale`.
fn parse_component(arg: &str, percent_scale: f64) -> Option<f64> {
    match arg.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok().map(|v| v / 100.0 * percent_scale),
        None => arg.parse::<f64>().ok(),
    }
}

fn parse_alpha(args: &[String]) -> Option<f64> {
    match args.get(3) {
        Some(a) => parse_component(a, 1.0),
        None => Some(1.0),
    }
}

fn parse_rgb_args(args: &[String]) -> Option<Color> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let r = parse_component(&args[0], 255.0)?;
    let g = parse_component(&args[1], 255.0)?;
    let b = parse_component(&args[2], 255.0)?;
    let a = parse_alpha(args)?;
    Some(Color::rgba(r / 255.0, g / 255.0, b / 255.0, a))
}

fn parse_hsl_args(args: &[String]) -> Option<Color> {
    if args.len() != 3 && args.len() != 4 {
        return None;
    }
    let h = args[0].trim_end_matches("deg").parse::<f64>().ok()?;
    let s = parse_component(&args[1], 1.0)?;
    let l = parse_component(&args[2], 1.0)?;
    let a = parse_alpha(args)?;
    Some(Color::from_hsl(h, s, l).with_alpha(a))
}

fn named_color(name: &str) -> Option<Color> {
    let rgb = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "navy" => [0, 0, 128],
        "olive" => [128, 128, 0],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "orange" => [255, 165, 0],
        "transparent" => return Some(Color::rgba(0.0, 0.0, 0.0, 0.0)),
        _ => return None,
    };
    Some(Color::from_rgb8(rgb))
}
