//! Wilcoxon rank-sum (Mann-Whitney) test.

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::enumeration::PermutationTail;
use crate::error::{ExactError, Result};
use crate::result::{Evaluation, TestKind, TestOutcome};
use crate::statistics::{corrected_z, normal_two_sided, tie_correction, IntegerRanks};

use super::check_finite;

/// Wilcoxon rank-sum test comparing independent groups `a` and `b`.
///
/// The statistic is `U = W − n₁(n₁+1)/2`, where `W` is the rank sum of `a`
/// in the pooled sample.
///
/// Exact regime (combined size below `config.rank_sum_exact_limit`): every
/// way of assigning `n₁` of the pooled ranks to `a` is enumerated, and the
/// p-value doubles the smaller of the two tails `P(W ≤ w)` and `P(W ≥ w)`.
/// Asymptotic regime: normal approximation for `U` with tie-corrected variance.
pub fn wilcoxon_rank_sum(a: &[f64], b: &[f64], config: &Config) -> Result<TestOutcome> {
    if a.is_empty() {
        return Err(ExactError::EmptySample { what: "first group" });
    }
    if b.is_empty() {
        return Err(ExactError::EmptySample { what: "second group" });
    }
    check_finite(a, "first group")?;
    check_finite(b, "second group")?;

    let (n1, n2) = (a.len(), b.len());
    let n = n1 + n2;
    let pooled: Vec<f64> = a.iter().chain(b).copied().collect();
    let ranks = IntegerRanks::from_values(&pooled);

    let w: u64 = ranks.weights[..n1].iter().sum();
    let scale = ranks.scale as f64;
    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, n as f64);
    let statistic = w as f64 / scale - n1f * (n1f + 1.0) / 2.0;
    let correction = config.continuity_correction;

    let dispatched = dispatch(
        n,
        config.rank_sum_exact_limit,
        || {
            let lower = PermutationTail::enumerate_subsets(&ranks.weights, n1, w).ratio();
            let upper = match w.checked_sub(1) {
                Some(below) => 1.0 - PermutationTail::enumerate_subsets(&ranks.weights, n1, below).ratio(),
                None => 1.0,
            };
            let p = (2.0 * lower.min(upper)).min(1.0);
            Ok(Evaluation::new(statistic, p))
        },
        || {
            let mean = n1f * n2f / 2.0;
            let ties = if ranks.has_ties() {
                tie_correction(&ranks.tie_sizes) / (nf * (nf - 1.0))
            } else {
                0.0
            };
            let variance = n1f * n2f / 12.0 * ((nf + 1.0) - ties);
            Ok(Evaluation {
                statistic,
                p_value: corrected_z(statistic, mean, variance.max(0.0).sqrt(), correction)
                    .map(normal_two_sided),
                enumeration: None,
            })
        },
    )?;

    Ok(TestOutcome::new(
        TestKind::WilcoxonRankSum,
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
    fn test_complete_separation() {
        // W = 6 is the minimum of C(6,3) = 20 arrangements: p = 2/20.
        let outcome =
            wilcoxon_rank_sum(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert_eq!(outcome.statistic, 0.0);
        assert!((outcome.p_value.unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_in_group_order() {
        let a = [1.1, 3.4, 2.2, 7.5];
        let b = [4.0, 5.5, 6.1, 0.3, 8.8];
        let ab = wilcoxon_rank_sum(&a, &b, &Config::default()).unwrap();
        let ba = wilcoxon_rank_sum(&b, &a, &Config::default()).unwrap();
        assert!((ab.p_value.unwrap() - ba.p_value.unwrap()).abs() < 1e-12);
        // U_a + U_b = n1 * n2
        assert!((ab.statistic + ba.statistic - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_interleaved_groups_not_significant() {
        let outcome = wilcoxon_rank_sum(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0], &Config::default()).unwrap();
        assert!(outcome.p_value.unwrap() > 0.5);
    }

    #[test]
    fn test_tie_across_groups() {
        // Pooled ranks 1, 2, 3.5, 3.5, 5, 6 -> doubled [2, 4, 7, 7, 10, 12].
        // W(a) = 13 doubled; only {2,4,7} and {2,4,7'} reach 13 of C(6,3) = 20.
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 4.0, 5.0];
        let outcome = wilcoxon_rank_sum(&a, &b, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert!((outcome.statistic - 0.5).abs() < 1e-12);
        assert!((outcome.p_value.unwrap() - 0.2).abs() < 1e-12);

        // From the other side W(b) = 29 doubled and P(W >= 29) = 2/20.
        let swapped = wilcoxon_rank_sum(&b, &a, &Config::default()).unwrap();
        assert!((swapped.statistic - 8.5).abs() < 1e-12);
        assert!((swapped.p_value.unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_large_groups_use_normal_approximation() {
        let a: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let b: Vec<f64> = (10..25).map(|i| i as f64 + 0.5).collect();
        let outcome = wilcoxon_rank_sum(&a, &b, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Asymptotic);
        assert_eq!(outcome.effective_n, 30);
        assert!(outcome.p_value.unwrap() < 0.01);
    }

    #[test]
    fn test_rejects_empty_group() {
        assert_eq!(
            wilcoxon_rank_sum(&[], &[1.0], &Config::default()).unwrap_err(),
            ExactError::EmptySample { what: "first group" }
        );
    }
}
