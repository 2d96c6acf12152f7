//! Floating point comparisons that keep NaN.
//!
//! `f64::max` and `f64::min` return the non-NaN operand, which hides NaN
//! produced upstream. The recurrences here clamp and floor with these
//! helpers instead, so a pathological input stays visible in the output.

/// Larger of `a` and `b`; NaN if either is NaN.
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Smaller of `a` and `b`; NaN if either is NaN.
pub fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.min(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_operands_match_std() {
        assert_eq!(nan_max(1.0, -2.0), 1.0);
        assert_eq!(nan_min(1.0, -2.0), -2.0);
        assert_eq!(nan_max(f64::INFINITY, 3.0), f64::INFINITY);
        assert_eq!(nan_min(f64::NEG_INFINITY, 3.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_is_kept_on_either_side() {
        assert!(nan_max(f64::NAN, 0.0).is_nan());
        assert!(nan_max(0.0, f64::NAN).is_nan());
        assert!(nan_min(f64::NAN, 20.0).is_nan());
        assert!(nan_min(20.0, f64::NAN).is_nan());
        // std keeps the other operand
        assert_eq!(f64::NAN.max(0.0), 0.0);
    }
}
