/// Precision used to absorb binary floating point noise (`0.15 / 0.1` is
/// `1.4999999999999998`, not `1.5`).
const SNAP: f64 = 1e9;

/// Relative distance from a half within which a quotient counts as that half.
const HALF_EPSILON: f64 = 1e-12;

/// What a matched tier does with the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rounding {
    /// Declare as zero.
    ToZero,
    /// Round to the nearest multiple of the given step.
    NearestMultiple(f64),
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::ToZero => 0.0,
            Rounding::NearestMultiple(step) => round_to_multiple(value, step),
        }
    }
}

/// Round `value` to the nearest multiple of `step`.
///
/// Halves round away from zero (`7.5` to the nearest 5 is `10`), which is
/// the convention used in every table. A zero step yields zero.
pub fn round_to_multiple(value: f64, step: f64) -> f64 {
    if step == 0.0 {
        return 0.0;
    }
    let quotient = snap_half(value / step);
    snap(quotient.round() * step)
}

/// Pull a quotient that sits within noise of `n.5` onto `n.5` exactly.
/// Anything further away is left alone.
fn snap_half(quotient: f64) -> f64 {
    let magnitude = quotient.abs();
    let half = magnitude.trunc() + 0.5;
    if (magnitude - half).abs() <= HALF_EPSILON * magnitude.max(1.0) {
        half.copysign(quotient)
    } else {
        quotient
    }
}

/// Trim noise from a multiple of a decimal step (`3.0 * 0.1`). Values too
/// large to scale are already integral and come back unchanged.
fn snap(x: f64) -> f64 {
    let scaled = x * SNAP;
    if scaled.is_finite() { scaled.round() / SNAP } else { x }
}
