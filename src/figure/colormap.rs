//! Sequential "Blues" colormap (ColorBrewer, 9 classes) with linear blending.

use plotters::style::RGBColor;

const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

/// Map `value` in `[lo, hi]` to `[0, 1]`, clamping outside values.
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return 0.0;
    }
    ((value - lo) / span).clamp(0.0, 1.0)
}

/// Color at position `t ∈ [0, 1]` along the Blues ramp.
pub fn blues(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (BLUES.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(BLUES.len() - 1);
    let frac = scaled - lo as f64;

    let mix = |a: u8, b: u8| (f64::from(a) + frac * (f64::from(b) - f64::from(a))).round() as u8;
    let (a, b) = (BLUES[lo], BLUES[hi]);
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
