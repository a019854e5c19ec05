//! Wilcoxon signed-rank test.

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::enumeration::PermutationTail;
use crate::error::Result;
use crate::result::{Evaluation, TestKind, TestOutcome};
use crate::statistics::{corrected_z, normal_two_sided, tie_correction, IntegerRanks};

use super::paired_differences;

/// Wilcoxon signed-rank test on paired samples `x` and `y`.
///
/// Zero differences are dropped; the remaining absolute differences are
/// ranked (mid-ranks for ties). The statistic is `W+`, the rank sum of the
/// positive differences.
///
/// Exact regime: every sign assignment over the rank weights is enumerated
/// and the p-value is `2·P(W ≤ min(W+, W−))`. Asymptotic regime: normal
/// approximation with tie-corrected variance
/// `n(n+1)(2n+1)/24 − Σ(t³−t)/48` and continuity correction.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64], config: &Config) -> Result<TestOutcome> {
    let diffs = paired_differences(x, y)?;
    let n = diffs.len();
    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = IntegerRanks::from_values(&magnitudes);

    let w_plus = ranks.scaled_sum_where(diffs.iter().map(|&d| d > 0.0));
    let w_minus = ranks.scaled_total() - w_plus;
    let statistic = w_plus as f64 / ranks.scale as f64;
    let correction = config.continuity_correction;

    let dispatched = dispatch(
        n,
        config.signed_rank_exact_limit,
        || {
            let tail = PermutationTail::enumerate(&ranks.weights, w_plus.min(w_minus));
            Ok(Evaluation::new(statistic, tail.two_sided()))
        },
        || {
            let nf = n as f64;
            let mean = nf * (nf + 1.0) / 4.0;
            let ties = if ranks.has_ties() {
                tie_correction(&ranks.tie_sizes)
            } else {
                0.0
            };
            let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
            Ok(Evaluation {
                statistic,
                p_value: corrected_z(statistic, mean, variance.max(0.0).sqrt(), correction)
                    .map(normal_two_sided),
                enumeration: None,
            })
        },
    )?;

    Ok(TestOutcome::new(
        TestKind::WilcoxonSignedRank,
        n,
        dispatched.regime,
        dispatched.evaluation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Regime;

    #[test]
    fn test_three_pairs_all_positive() {
        // Ranks 1,2,3 all positive: W+ = 6, W- = 0, P(W <= 0) = 1/8.
        let outcome = wilcoxon_signed_rank(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0], &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert_eq!(outcome.statistic, 6.0);
        assert!((outcome.p_value.unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_mixed_signs_exact() {
        // d = [1, -2, 3, 4, 5]: W+ = 13, W- = 2, P(W <= 2) = 3/32.
        let x = [1.0, -2.0, 3.0, 4.0, 5.0];
        let y = [0.0; 5];
        let outcome = wilcoxon_signed_rank(&x, &y, &Config::default()).unwrap();
        assert_eq!(outcome.statistic, 13.0);
        assert!((outcome.p_value.unwrap() - 6.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_use_doubled_weights() {
        // |d| = [1, 1, 2]: mid-ranks 1.5, 1.5, 3; W+ = 4.5.
        let outcome =
            wilcoxon_signed_rank(&[1.0, -1.0, 2.0], &[0.0, 0.0, 0.0], &Config::default()).unwrap();
        assert_eq!(outcome.statistic, 4.5);
        // Doubled weights [3, 3, 6] out of 12: W+ = 9, W- = 3. Sums <= 3 are
        // {}, {3}, {3}: 3 of 8 assignments, two-sided 2 * 3/8.
        assert!((outcome.p_value.unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_tied_exact_tail_counts_doubled_sums() {
        // |d| = [2, 2, 2, 1]: doubled weights [6, 6, 6, 2], total 20.
        // All positive except the smallest: W- = 2 (doubled), W+ = 18.
        // Sums <= 2: {} and {2}, so 2 of 16 and p = 0.25.
        let x = [2.0, 2.0, 2.0, -1.0];
        let outcome = wilcoxon_signed_rank(&x, &[0.0; 4], &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert_eq!(outcome.statistic, 9.0);
        assert!((outcome.p_value.unwrap() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_twenty_pairs_use_normal_approximation() {
        let x: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let y = vec![0.0; 20];
        let outcome = wilcoxon_signed_rank(&x, &y, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Asymptotic);
        assert_eq!(outcome.statistic, 210.0);
        // mean 105, sd sqrt(717.5) = 26.786, z = 104.5 / 26.786 = 3.901
        let p = outcome.p_value.unwrap();
        assert!((p - 9.57e-5).abs() < 5e-6, "p = {}", p);
    }
}
