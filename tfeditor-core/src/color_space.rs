//! Color space conversions used by the stop interpolators.
//!
//! All RGB components are non-linear sRGB in [0, 1]. Cylindrical spaces
//! (HSL, HSV, HCL, Cubehelix) report hue in degrees [0, 360) and return
//! `None` for the hue of achromatic colors, where it is undefined.
//!
//! LAB/HCL: CIELAB relative to a D50-adapted white point (Bradford), so
//! sRGB white maps to L=100, a=b=0.

// D50 reference white
const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

// Cubehelix basis (Green 2011)
const CH_A: f64 = -0.14861;
const CH_B: f64 = 1.78277;
const CH_C: f64 = -0.29227;
const CH_D: f64 = -0.90649;
const CH_E: f64 = 1.97294;
const CH_ED: f64 = CH_E * CH_D;
const CH_EB: f64 = CH_E * CH_B;
const CH_BC_DA: f64 = CH_B * CH_C - CH_D * CH_A;

/// Below this chroma/saturation a color is treated as achromatic.
const ACHROMATIC: f64 = 1e-12;

/// Convert sRGB component [0,1] to linear RGB (remove gamma).
pub fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear RGB component to sRGB [0,1] (apply gamma).
pub fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Wrap an angle in degrees into [0, 360).
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Hue in degrees shared by HSL and HSV, `None` when max == min.
fn rgb_hue(r: f64, g: f64, b: f64, max: f64, min: f64) -> Option<f64> {
    let d = max - min;
    if d <= ACHROMATIC {
        return None;
    }
    let h = if r == max {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if g == max {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Some(normalize_hue(h * 60.0))
}

/// Convert sRGB to HSL. Returns (H, S, L) with S and L in [0, 1].
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (Option<f64>, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let h = rgb_hue(r, g, b, max, min);
    let s = match h {
        Some(_) if l < 0.5 => (max - min) / (max + min),
        Some(_) => (max - min) / (2.0 - max - min),
        None => 0.0,
    };
    (h, s, l)
}

fn hsl_channel(h: f64, m1: f64, m2: f64) -> f64 {
    if h < 60.0 {
        m1 + (m2 - m1) * h / 60.0
    } else if h < 180.0 {
        m2
    } else if h < 240.0 {
        m1 + (m2 - m1) * (240.0 - h) / 60.0
    } else {
        m1
    }
}

/// Convert HSL to sRGB. An undefined hue renders as gray.
pub fn hsl_to_rgb(h: Option<f64>, s: f64, l: f64) -> (f64, f64, f64) {
    let (h, s) = match h {
        Some(h) => (normalize_hue(h), s),
        None => (0.0, 0.0),
    };
    let m2 = l + if l < 0.5 { l } else { 1.0 - l } * s;
    let m1 = 2.0 * l - m2;
    (
        hsl_channel(if h >= 240.0 { h - 240.0 } else { h + 120.0 }, m1, m2),
        hsl_channel(h, m1, m2),
        hsl_channel(if h < 120.0 { h + 240.0 } else { h - 120.0 }, m1, m2),
    )
}

/// Convert sRGB to HSV. Returns (H, S, V) with S and V in [0, 1].
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (Option<f64>, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let h = rgb_hue(r, g, b, max, min);
    let s = if max <= 0.0 { 0.0 } else { (max - min) / max };
    (h, s, max)
}

/// Convert HSV to sRGB. An undefined hue renders as gray.
pub fn hsv_to_rgb(h: Option<f64>, s: f64, v: f64) -> (f64, f64, f64) {
    let Some(h) = h else {
        return (v, v, v);
    };
    let h = normalize_hue(h) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn xyz_to_lab_f(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz_f(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

/// Convert sRGB to CIELAB (L in [0, 100]).
pub fn rgb_to_lab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);
    let y = xyz_to_lab_f((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
    // Grays map exactly onto the neutral axis
    let (x, z) = if r == g && g == b {
        (y, y)
    } else {
        (
            xyz_to_lab_f((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
            xyz_to_lab_f((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
        )
    };
    (116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
}

/// Convert CIELAB to sRGB. Out-of-gamut results are not clamped.
pub fn lab_to_rgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let y = (l + 16.0) / 116.0;
    let x = XN * lab_to_xyz_f(y + a / 500.0);
    let z = ZN * lab_to_xyz_f(y - b / 200.0);
    let y = YN * lab_to_xyz_f(y);
    (
        linear_to_srgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
        linear_to_srgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
        linear_to_srgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
    )
}

/// Convert CIELAB to HCL (polar LAB). Returns (H, C, L), H in degrees.
pub fn lab_to_hcl(l: f64, a: f64, b: f64) -> (Option<f64>, f64, f64) {
    let c = (a * a + b * b).sqrt();
    if c <= ACHROMATIC {
        return (None, 0.0, l);
    }
    (Some(normalize_hue(b.atan2(a).to_degrees())), c, l)
}

/// Convert HCL to CIELAB. An undefined hue lies on the neutral axis.
pub fn hcl_to_lab(h: Option<f64>, c: f64, l: f64) -> (f64, f64, f64) {
    match h {
        Some(h) => {
            let h = h.to_radians();
            (l, c * h.cos(), c * h.sin())
        }
        None => (l, 0.0, 0.0),
    }
}

/// Convert sRGB to Cubehelix. Returns (H, S, L) with L in [0, 1].
pub fn rgb_to_cubehelix(r: f64, g: f64, b: f64) -> (Option<f64>, f64, f64) {
    let l = (CH_BC_DA * b + CH_ED * r - CH_EB * g) / (CH_BC_DA + CH_ED - CH_EB);
    let bl = b - l;
    let k = (CH_E * (g - l) - CH_C * bl) / CH_D;
    let denom = CH_E * l * (1.0 - l);
    if denom.abs() <= ACHROMATIC {
        return (None, 0.0, l);
    }
    let s = (k * k + bl * bl).sqrt() / denom;
    if s.abs() <= ACHROMATIC {
        return (None, 0.0, l);
    }
    (Some(normalize_hue(k.atan2(bl).to_degrees() - 120.0)), s, l)
}

/// Convert Cubehelix to sRGB. Out-of-gamut results are not clamped.
pub fn cubehelix_to_rgb(h: Option<f64>, s: f64, l: f64) -> (f64, f64, f64) {
    let (h, s) = match h {
        Some(h) => ((h + 120.0).to_radians(), s),
        None => (0.0, 0.0),
    };
    let amp = s * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();
    (
        l + amp * (CH_A * cos_h + CH_B * sin_h),
        l + amp * (CH_C * cos_h + CH_D * sin_h),
        l + amp * (CH_E * cos_h),
    )
}
