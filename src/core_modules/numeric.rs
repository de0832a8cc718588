// THEORY:
// Every projection in this crate runs on the same small set of numeric guards.
// They live here so that the equirectangular and cubemap variants agree on what
// "too close to zero" means. A value below one of these thresholds is treated
// as degenerate and replaced by a well-defined fallback rather than being fed
// into a division or an `atan2` that would return NaN or an unstable angle.

/// Vectors shorter than this are considered to have no orientation at all.
pub const DEGENERATE_LENGTH_EPSILON: f64 = 1e-12;

/// When the horizontal part of a direction is shorter than this, the direction
/// sits on the polar axis and its azimuth is pinned to zero.
pub const POLE_EPSILON: f64 = 1e-12;

/// Clamps an argument for `asin`/`acos` into `[-1, 1]`.
///
/// Normalized vectors can carry components like `1.0000000000000002`, which
/// would otherwise make the inverse trigonometric functions return NaN.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_keeps_asin_finite() {
        let slightly_over: f64 = 1.0 + 1e-15;
        assert!(slightly_over.asin().is_nan());
        assert_eq!(clamp_unit(slightly_over).asin(), std::f64::consts::FRAC_PI_2);
        assert_eq!(clamp_unit(-3.0), -1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
