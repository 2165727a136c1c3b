//! Color interpolation between two stops in a selectable color space.

use crate::color::Color;
use crate::color_space::{
    cubehelix_to_rgb, hcl_to_lab, hsl_to_rgb, hsv_to_rgb, lab_to_hcl, lab_to_rgb,
    rgb_to_cubehelix, rgb_to_hsl, rgb_to_hsv, rgb_to_lab,
};
use serde::{Deserialize, Serialize};

/// Color space and hue path used to blend two color stops.
///
/// `*Long` variants interpolate hue linearly in degrees without wrapping,
/// so the path never crosses 0°/360°; the short variants always take the
/// arc of at most 180°.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationMethod {
    #[default]
    Rgb,
    Hsl,
    HslLong,
    Hsv,
    HsvLong,
    Hcl,
    HclLong,
    Lab,
    Cubehelix,
    CubehelixLong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Space {
    Rgb,
    Hsl,
    Hsv,
    Hcl,
    Lab,
    Cubehelix,
}

impl InterpolationMethod {
    /// All methods, useful for UI combo boxes.
    pub const ALL: &[InterpolationMethod] = &[
        Self::Rgb,
        Self::Hsl,
        Self::HslLong,
        Self::Hsv,
        Self::HsvLong,
        Self::Hcl,
        Self::HclLong,
        Self::Lab,
        Self::Cubehelix,
        Self::CubehelixLong,
    ];

    /// Identifier used in serialized transfer functions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Hsl => "HSL",
            Self::HslLong => "HSL_LONG",
            Self::Hsv => "HSV",
            Self::HsvLong => "HSV_LONG",
            Self::Hcl => "HCL",
            Self::HclLong => "HCL_LONG",
            Self::Lab => "LAB",
            Self::Cubehelix => "CUBEHELIX",
            Self::CubehelixLong => "CUBEHELIX_LONG",
        }
    }

    pub fn is_long_hue(&self) -> bool {
        matches!(
            self,
            Self::HslLong | Self::HsvLong | Self::HclLong | Self::CubehelixLong
        )
    }

    fn space(&self) -> Space {
        match self {
            Self::Rgb => Space::Rgb,
            Self::Hsl | Self::HslLong => Space::Hsl,
            Self::Hsv | Self::HsvLong => Space::Hsv,
            Self::Hcl | Self::HclLong => Space::Hcl,
            Self::Lab => Space::Lab,
            Self::Cubehelix | Self::CubehelixLong => Space::Cubehelix,
        }
    }
}

impl Space {
    fn is_cylindrical(self) -> bool {
        !matches!(self, Space::Rgb | Space::Lab)
    }

    /// Color to coordinates. Cylindrical spaces put hue first.
    fn decompose(self, c: &Color) -> (Option<f64>, [f64; 3]) {
        match self {
            Space::Rgb => (None, [c.r, c.g, c.b]),
            Space::Lab => {
                let (l, a, b) = rgb_to_lab(c.r, c.g, c.b);
                (None, [l, a, b])
            }
            Space::Hsl => {
                let (h, s, l) = rgb_to_hsl(c.r, c.g, c.b);
                (h, [0.0, s, l])
            }
            Space::Hsv => {
                let (h, s, v) = rgb_to_hsv(c.r, c.g, c.b);
                (h, [0.0, s, v])
            }
            Space::Hcl => {
                let (l, a, b) = rgb_to_lab(c.r, c.g, c.b);
                let (h, chroma, l) = lab_to_hcl(l, a, b);
                (h, [0.0, chroma, l])
            }
            Space::Cubehelix => {
                let (h, s, l) = rgb_to_cubehelix(c.r, c.g, c.b);
                (h, [0.0, s, l])
            }
        }
    }

    /// Coordinates back to unclamped sRGB.
    fn compose(self, hue: Option<f64>, v: [f64; 3]) -> (f64, f64, f64) {
        match self {
            Space::Rgb => (v[0], v[1], v[2]),
            Space::Lab => lab_to_rgb(v[0], v[1], v[2]),
            Space::Hsl => hsl_to_rgb(hue, v[1], v[2]),
            Space::Hsv => hsv_to_rgb(hue, v[1], v[2]),
            Space::Hcl => {
                let (l, a, b) = hcl_to_lab(hue, v[1], v[2]);
                lab_to_rgb(l, a, b)
            }
            Space::Cubehelix => cubehelix_to_rgb(hue, v[1], v[2]),
        }
    }
}

/// Last chromatic color seen by one editor instance.
///
/// Achromatic colors (grays, black, white) have no hue. A color picker
/// bound to such a color borrows the remembered hue so its hue slider stays
/// still while saturation is 0.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HueMemory {
    last_chromatic: Option<Color>,
}

impl HueMemory {
    /// Record `color` if it has a defined hue.
    pub fn observe(&mut self, color: &Color) {
        if color.to_hsl().0.is_some() {
            self.last_chromatic = Some(*color);
        }
    }

    pub fn last_chromatic(&self) -> Option<Color> {
        self.last_chromatic
    }

    fn hue_in(&self, space: Space) -> Option<f64> {
        self.last_chromatic
            .and_then(|color| space.decompose(&color).0)
    }

    /// HSL of `color`, borrowing the remembered hue (or 0) when undefined.
    pub fn hsl(&self, color: &Color) -> (f64, f64, f64) {
        let (h, s, l) = color.to_hsl();
        (h.or_else(|| self.hue_in(Space::Hsl)).unwrap_or(0.0), s, l)
    }

    /// HSV of `color`, borrowing the remembered hue (or 0) when undefined.
    pub fn hsv(&self, color: &Color) -> (f64, f64, f64) {
        let (h, s, v) = color.to_hsv();
        (h.or_else(|| self.hue_in(Space::Hsv)).unwrap_or(0.0), s, v)
    }
}

/// A prepared blend between two colors, evaluated with [`ColorInterpolator::at`].
///
/// Endpoint conversion happens once, so sampling many sub-pixel positions
/// of one segment only pays for the inverse conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorInterpolator {
    space: Space,
    from: Color,
    to: Color,
    start: [f64; 3],
    end: [f64; 3],
    /// Resolved (start, end) hue; `None` when both ends are achromatic.
    hues: Option<(f64, f64)>,
}

impl ColorInterpolator {
    /// An achromatic end takes the other end's hue, so blending toward gray
    /// only desaturates.
    pub fn new(method: InterpolationMethod, from: Color, to: Color) -> Self {
        let space = method.space();
        let (h0, mut start) = space.decompose(&from);
        let (h1, mut end) = space.decompose(&to);

        let hues = if space.is_cylindrical() {
            let resolved = match (h0, h1) {
                (Some(a), Some(b)) => Some((a, b)),
                (Some(a), None) => Some((a, a)),
                (None, Some(b)) => Some((b, b)),
                (None, None) => None,
            };
            resolved.map(|(a, b)| {
                let mut d = b - a;
                if !method.is_long_hue() && (d > 180.0 || d < -180.0) {
                    d -= 360.0 * (d / 360.0).round();
                }
                (a, a + d)
            })
        } else {
            None
        };
        if let Some((a, b)) = hues {
            start[0] = a;
            end[0] = b;
        }

        Self {
            space,
            from,
            to,
            start,
            end,
            hues,
        }
    }

    /// Blend at `t` in [0, 1]; `t` outside is clamped. The ends return the
    /// input colors exactly.
    pub fn at(&self, t: f64) -> Color {
        if t.is_nan() || t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        let lerp = |a: f64, b: f64| a + t * (b - a);
        let v = [
            lerp(self.start[0], self.end[0]),
            lerp(self.start[1], self.end[1]),
            lerp(self.start[2], self.end[2]),
        ];
        let hue = self.hues.map(|_| v[0]);
        let (r, g, b) = self.space.compose(hue, v);
        Color::rgba(r, g, b, lerp(self.from.a, self.to.a))
    }
}

/// Blend `from` and `to` at `t` with the given method.
pub fn interpolate(method: InterpolationMethod, from: Color, to: Color, t: f64) -> Color {
    ColorInterpolator::new(method, from, to).at(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::rgb(1.0, 0.0, 0.0)
    }

    fn blue() -> Color {
        Color::rgb(0.0, 0.0, 1.0)
    }

    #[test]
    fn method_names_match_serialized_form() {
        for method in InterpolationMethod::ALL {
            let json = serde_json::to_string(method).unwrap();
            assert_eq!(json, format!("\"{}\"", method.name()));
        }
    }

    #[test]
    fn rgb_midpoint_is_channel_average() {
        let mid = interpolate(InterpolationMethod::Rgb, red(), blue(), 0.5);
        assert!(mid.approx_eq(&Color::rgb(0.5, 0.0, 0.5), 1e-12));
    }

    #[test]
    fn endpoints_are_exact_for_every_method() {
        let from = Color::rgba(0.2, 0.7, 0.1, 0.4);
        let to = Color::rgb(0.9, 0.3, 0.6);
        for &method in InterpolationMethod::ALL {
            let lerp = ColorInterpolator::new(method, from, to);
            assert_eq!(lerp.at(0.0), from, "{method:?} start");
            assert_eq!(lerp.at(1.0), to, "{method:?} end");
        }
    }

    #[test]
    fn short_and_long_hue_paths_differ() {
        // Red (0°) to blue (240°): short path goes through magenta (300°),
        // long path through green (120°).
        let short = interpolate(InterpolationMethod::Hsl, red(), blue(), 0.5);
        let long = interpolate(InterpolationMethod::HslLong, red(), blue(), 0.5);

        let (h_short, _, _) = short.to_hsl();
        let (h_long, _, _) = long.to_hsl();
        assert!((h_short.unwrap() - 300.0).abs() < 1e-9, "{h_short:?}");
        assert!((h_long.unwrap() - 120.0).abs() < 1e-9, "{h_long:?}");
    }

    #[test]
    fn hsv_short_path_wraps_through_zero() {
        // 350° to 10° should pass through 0°, not 180°
        let a = Color::from_hsv(350.0, 1.0, 1.0);
        let b = Color::from_hsv(10.0, 1.0, 1.0);
        let mid = interpolate(InterpolationMethod::Hsv, a, b, 0.5);
        assert!(mid.approx_eq(&red(), 1e-9), "{mid:?}");

        let long = interpolate(InterpolationMethod::HsvLong, a, b, 0.5);
        let (h, _, _) = long.to_hsv();
        assert!((h.unwrap() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn achromatic_end_borrows_other_hue() {
        // White to blue in HSL must stay on the blue hue, not sweep from red
        for i in 1..10 {
            let c = interpolate(InterpolationMethod::Hsl, Color::WHITE, blue(), i as f64 / 10.0);
            let (h, _, _) = c.to_hsl();
            assert!((h.unwrap() - 240.0).abs() < 1e-6, "t={} h={h:?}", i);
        }
    }

    #[test]
    fn both_achromatic_blend_stays_gray() {
        for &method in InterpolationMethod::ALL {
            let lerp = ColorInterpolator::new(method, Color::BLACK, Color::WHITE);
            assert_eq!(lerp.hues, None, "{method:?}");
            let mid = lerp.at(0.5);
            assert!(
                (mid.r - mid.g).abs() < 1e-4 && (mid.g - mid.b).abs() < 1e-4,
                "{method:?} produced {mid:?}"
            );
        }
    }

    #[test]
    fn memory_ignores_achromatic_colors() {
        let mut memory = HueMemory::default();
        memory.observe(&Color::rgb(0.0, 1.0, 0.0));
        memory.observe(&Color::rgb(0.5, 0.5, 0.5));
        assert_eq!(memory.last_chromatic(), Some(Color::rgb(0.0, 1.0, 0.0)));
    }

    #[test]
    fn memory_fills_hsv_hue_for_gray() {
        let mut memory = HueMemory::default();
        assert_eq!(memory.hsv(&Color::BLACK).0, 0.0);
        memory.observe(&Color::rgb(0.0, 0.0, 1.0));
        let (h, s, v) = memory.hsv(&Color::BLACK);
        assert!((h - 240.0).abs() < 1e-9);
        assert_eq!(s, 0.0);
        assert_eq!(v, 0.0);
    }

    #[test]
    fn lab_gray_ramp_stays_neutral() {
        let c = interpolate(InterpolationMethod::Lab, Color::BLACK, Color::WHITE, 0.5);
        assert!((c.r - c.g).abs() < 1e-4 && (c.g - c.b).abs() < 1e-4, "{c:?}");
        // L=50 maps to sRGB ≈ 0.466
        assert!((c.r - 0.466).abs() < 0.01, "{c:?}");
    }

    #[test]
    fn alpha_is_interpolated_linearly() {
        let from = Color::rgba(1.0, 1.0, 1.0, 0.0);
        let to = Color::rgba(1.0, 1.0, 1.0, 1.0);
        for &method in InterpolationMethod::ALL {
            let c = interpolate(method, from, to, 0.25);
            assert!((c.a - 0.25).abs() < 1e-12, "{method:?}");
        }
    }

    #[test]
    fn output_channels_stay_in_unit_range() {
        let a = Color::rgb(0.0, 1.0, 1.0);
        let b = Color::rgb(1.0, 0.0, 0.2);
        for &method in InterpolationMethod::ALL {
            for i in 0..=20 {
                let c = interpolate(method, a, b, i as f64 / 20.0);
                for v in [c.r, c.g, c.b, c.a] {
                    assert!((0.0..=1.0).contains(&v), "{method:?} produced {c:?}");
                }
            }
        }
    }
}
