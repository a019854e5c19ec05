//! Paired sign test.

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::enumeration::PermutationTail;
use crate::error::Result;
use crate::result::{Evaluation, TestKind, TestOutcome};
use crate::statistics::{corrected_z, normal_two_sided};
use crate::types::Sign;

use super::paired_differences;

/// Sign test on paired samples `x` and `y`.
///
/// The statistic is the number of positive differences `x[i] - y[i]`; zero
/// differences are discarded. With `n` non-zero pairs below
/// `config.sign_exact_limit`, the null distribution is enumerated over unit
/// weights; otherwise a continuity-corrected normal approximation is used.
pub fn sign_test(x: &[f64], y: &[f64], config: &Config) -> Result<TestOutcome> {
    let diffs = paired_differences(x, y)?;
    let n = diffs.len();
    let positives = diffs
        .iter()
        .filter(|&&d| Sign::of(d) == Some(Sign::Positive))
        .count();
    let negatives = n - positives;
    let statistic = positives as f64;
    let correction = config.continuity_correction;

    let dispatched = dispatch(
        n,
        config.sign_exact_limit,
        || {
            let weights = vec![1u64; n];
            let tail = PermutationTail::enumerate(&weights, positives.min(negatives) as u64);
            Ok(Evaluation::new(statistic, tail.two_sided()))
        },
        || {
            let mean = n as f64 / 2.0;
            let std_dev = (n as f64).sqrt() / 2.0;
            Ok(Evaluation {
                statistic,
                p_value: corrected_z(statistic, mean, std_dev, correction).map(normal_two_sided),
                enumeration: None,
            })
        },
    )?;

    Ok(TestOutcome::new(TestKind::Sign, n, dispatched.regime, dispatched.evaluation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Regime;

    #[test]
    fn test_exact_matches_binomial() {
        // 9 of 10 positive: two-sided binomial p = 22/1024.
        let x = [2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 0.0];
        let y = [1.0; 10];
        let outcome = sign_test(&x, &y, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert_eq!(outcome.statistic, 9.0);
        assert!((outcome.p_value.unwrap() - 22.0 / 1024.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_ties_is_trivial() {
        let outcome = sign_test(&[1.0, 2.0], &[1.0, 2.0], &Config::default()).unwrap();
        assert_eq!(outcome.effective_n, 0);
        assert_eq!(outcome.p_value, Some(1.0));
    }

    #[test]
    fn test_large_sample_is_asymptotic() {
        let x: Vec<f64> = (0..40).map(|i| if i < 30 { 1.0 } else { -1.0 }).collect();
        let y = vec![0.0; 40];
        let outcome = sign_test(&x, &y, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Asymptotic);
        // z = (|30 - 20| - 0.5) / sqrt(40)/2 = 3.0042
        let p = outcome.p_value.unwrap();
        assert!((p - 0.002663).abs() < 1e-4, "p = {}", p);
    }
}
