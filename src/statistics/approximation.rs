//! Asymptotic tail approximations.
//!
//! Discrete statistics are pulled toward their null mean by the continuity
//! correction before standardization, so the normal tail never overstates
//! the evidence of a lattice-valued statistic.

use std::f64::consts::SQRT_2;

use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

/// Continuity-corrected standard score `(|x − μ| − cc) / σ`, floored at zero.
///
/// Returns `None` when `σ` is zero or not finite (e.g. every observation tied).
pub fn corrected_z(statistic: f64, mean: f64, std_dev: f64, correction: f64) -> Option<f64> {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return None;
    }
    let distance = ((statistic - mean).abs() - correction).max(0.0);
    Some(distance / std_dev)
}

/// Two-sided standard normal tail probability `P(|Z| ≥ |z|)`.
pub fn normal_two_sided(z: f64) -> f64 {
    erfc(z.abs() / SQRT_2).min(1.0)
}

/// Upper tail `P(χ²_df ≥ statistic)`.
///
/// Returns `None` for zero degrees of freedom or a non-finite statistic.
pub fn chi_square_upper_tail(statistic: f64, df: usize) -> Option<f64> {
    if df == 0 || !statistic.is_finite() {
        return None;
    }
    let dist = ChiSquared::new(df as f64).ok()?;
    Some(dist.sf(statistic.max(0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_two_sided_known_values() {
        assert!((normal_two_sided(0.0) - 1.0).abs() < 1e-12);
        assert!((normal_two_sided(1.959_964) - 0.05).abs() < 1e-5);
        assert!((normal_two_sided(-1.959_964) - 0.05).abs() < 1e-5);
    }

    #[test]
    fn test_corrected_z_floors_at_zero() {
        assert_eq!(corrected_z(10.2, 10.0, 1.0, 0.5), Some(0.0));
        let z = corrected_z(13.0, 10.0, 2.0, 0.5).unwrap();
        assert!((z - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_corrected_z_rejects_zero_variance() {
        assert!(corrected_z(1.0, 0.0, 0.0, 0.5).is_none());
        assert!(corrected_z(1.0, 0.0, f64::NAN, 0.5).is_none());
    }

    #[test]
    fn test_chi_square_upper_tail() {
        // 3.841 is the 95th percentile of chi-square with 1 df.
        let p = chi_square_upper_tail(3.841_459, 1).unwrap();
        assert!((p - 0.05).abs() < 1e-5);
        assert!(chi_square_upper_tail(1.0, 0).is_none());
    }
}
