//! Module containing miscellaneous utility functions.

/// Clamps `x` to \[0, 1\]
pub fn clamp01(x: f64) -> f64 {
    clamp(x, 0.0, 1.0)
}

/// Clamps `x` to \[`min`, `max`\].  Unlike [`f64::clamp`], this does not panic
/// when `min > max`; `min` wins in that case.
pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.min(max).max(min)
}

/// Linear interpolation from `a` (at `t = 0`) to `b` (at `t = 1`)
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

pub fn kmh_to_mps(speed_kmh: f64) -> f64 {
    speed_kmh / crate::params::KMH_PER_MPS
}

/// Rounds to one decimal place, halves away from zero
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Returns true if `val1` and `val2` are within a relative/absolute `epsilon` of each other
pub fn almost_eq(val1: f64, val2: f64, epsilon: Option<f64>) -> bool {
    let epsilon = epsilon.unwrap_or(1e-8);
    ((val2 - val1) / (val1 + val2)).abs() < epsilon || (val2 - val1).abs() < epsilon
}

/// Function for checking that a slice is sorted in strictly increasing order
pub fn is_strictly_increasing(data: &[f64]) -> bool {
    data.windows(2).all(|w| w[0] < w[1])
}
