//! Colormaps for heatmaps and hexbin panels.

/// An RGB color.
pub type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];

/// Piecewise-linear ramp between `(position, value)` anchors.
fn ramp(t: f64, anchors: &[(f64, f64)]) -> f64 {
    let mut prev = anchors[0];
    if t <= prev.0 {
        return prev.1;
    }
    for &next in &anchors[1..] {
        if t <= next.0 {
            let f = (t - prev.0) / (next.0 - prev.0);
            return prev.1 + f * (next.1 - prev.1);
        }
        prev = next;
    }
    prev.1
}

fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// The "hot" colormap: black through red and yellow to white.
///
/// `t` is clamped to `[0, 1]`.
#[must_use]
pub fn hot(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let r = ramp(t, &[(0.0, 0.0416), (0.365_079, 1.0), (1.0, 1.0)]);
    let g = ramp(t, &[(0.0, 0.0), (0.365_079, 0.0), (0.746_032, 1.0), (1.0, 1.0)]);
    let b = ramp(t, &[(0.0, 0.0), (0.746_032, 0.0), (1.0, 1.0)]);
    [channel(r), channel(g), channel(b)]
}

const REDS: [Rgb; 9] = [
    [255, 245, 240],
    [254, 224, 210],
    [252, 187, 161],
    [252, 146, 114],
    [251, 106, 74],
    [239, 59, 44],
    [203, 24, 29],
    [165, 15, 21],
    [103, 0, 13],
];

/// Sequential reds, light to dark, used for click density.
#[must_use]
pub fn reds(t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let pos = t * (REDS.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(REDS.len() - 1);
    let f = pos - lo as f64;
    let mix = |a: u8, b: u8| (f64::from(a) + f * (f64::from(b) - f64::from(a))).round() as u8;
    [
        mix(REDS[lo][0], REDS[hi][0]),
        mix(REDS[lo][1], REDS[hi][1]),
        mix(REDS[lo][2], REDS[hi][2]),
    ]
}

/// Composite `color` at `alpha` over white.
#[must_use]
pub fn over_white(color: Rgb, alpha: f64) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |c: u8, w: u8| (a * f64::from(c) + (1.0 - a) * f64::from(w)).round() as u8;
    [
        mix(color[0], WHITE[0]),
        mix(color[1], WHITE[1]),
        mix(color[2], WHITE[2]),
    ]
}

/// CSS hex notation, e.g. `#ff0000`.
#[must_use]
pub fn to_hex(color: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}
