//! Test result types and related structures.

use serde::{Deserialize, Serialize};

/// Outcome of one exact table enumeration.
///
/// `p_value` is `None` exactly when the enumeration stopped early; a capped
/// enumeration never reports a partial sum as if it were a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExactTestResult {
    /// Exact p-value, or `None` when the enumeration was capped.
    pub p_value: Option<f64>,
    /// Number of complete tables scored.
    pub enumerated_count: u64,
    /// Whether the enumeration aborted before visiting every table.
    pub capped: bool,
    /// Why the enumeration stopped early, if it did.
    pub stop: Option<StopReason>,
}

impl ExactTestResult {
    pub(crate) fn completed(p_value: f64, enumerated_count: u64) -> Self {
        Self {
            p_value: Some(p_value.min(1.0)),
            enumerated_count,
            capped: false,
            stop: None,
        }
    }

    pub(crate) fn stopped(reason: StopReason, enumerated_count: u64) -> Self {
        Self {
            p_value: None,
            enumerated_count,
            capped: true,
            stop: Some(reason),
        }
    }
}

/// Reason an exact enumeration stopped before completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The table count exceeded the configured cap.
    TableCap,
    /// The wall-clock guardrail elapsed.
    Deadline,
}

/// Which computation produced a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Full enumeration of the null distribution.
    Exact,
    /// Normal or chi-square approximation with continuity correction.
    Asymptotic,
}

/// The statistical test that produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestKind {
    /// Generalized (r x c) Fisher exact test.
    FisherExact,
    /// Pearson chi-square test of independence.
    ChiSquare,
    /// Paired sign test.
    Sign,
    /// Wilcoxon signed-rank test on paired differences.
    WilcoxonSignedRank,
    /// Wilcoxon rank-sum (Mann-Whitney) test on two independent groups.
    WilcoxonRankSum,
}

impl TestKind {
    /// Human-readable test name.
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::FisherExact => "Fisher's exact test",
            TestKind::ChiSquare => "Pearson chi-square test",
            TestKind::Sign => "Sign test",
            TestKind::WilcoxonSignedRank => "Wilcoxon signed-rank test",
            TestKind::WilcoxonRankSum => "Wilcoxon rank-sum test",
        }
    }
}

/// Statistic and p-value produced by one dispatched computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Test statistic (test-specific: S, W, U or chi-square).
    pub statistic: f64,
    /// Two-sided p-value, `None` if not computable.
    pub p_value: Option<f64>,
    /// Table enumeration details, for tests that enumerate tables.
    pub enumeration: Option<ExactTestResult>,
}

impl Evaluation {
    /// Evaluation with a p-value and no enumeration details.
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value: Some(p_value),
            enumeration: None,
        }
    }
}

/// Complete result from a test invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Which test ran.
    pub test: TestKind,
    /// Whether the p-value is exact or asymptotic.
    pub regime: Regime,
    /// Effective sample size that drove the regime choice.
    pub effective_n: usize,
    /// Test statistic.
    pub statistic: f64,
    /// Two-sided p-value; `None` when an exact enumeration was capped.
    pub p_value: Option<f64>,
    /// Table enumeration details (Fisher exact only).
    pub enumeration: Option<ExactTestResult>,
}

impl TestOutcome {
    pub(crate) fn new(test: TestKind, effective_n: usize, regime: Regime, eval: Evaluation) -> Self {
        Self {
            test,
            regime,
            effective_n,
            statistic: eval.statistic,
            p_value: eval.p_value,
            enumeration: eval.enumeration,
        }
    }

    /// Whether a p-value was computed.
    pub fn is_available(&self) -> bool {
        self.p_value.is_some()
    }

    /// Whether the null is rejected at `alpha`, or `None` if unavailable.
    pub fn is_significant(&self, alpha: f64) -> Option<bool> {
        self.p_value.map(|p| p < alpha)
    }
}

/// Result of a simulated (Monte Carlo) table p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Estimated p-value, `(1 + hits) / (replicates + 1)`.
    pub p_value: f64,
    /// Replicates at most as probable as the observed table.
    pub hits: usize,
    /// Number of random tables drawn.
    pub replicates: usize,
    /// Seed used for the draw.
    pub seed: u64,
}

impl MonteCarloResult {
    /// Binomial standard error of the estimate.
    pub fn standard_error(&self) -> f64 {
        let n = self.replicates as f64 + 1.0;
        (self.p_value * (1.0 - self.p_value) / n).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_result_has_no_p_value() {
        let r = ExactTestResult::stopped(StopReason::TableCap, 100_001);
        assert!(r.capped);
        assert!(r.p_value.is_none());
        assert_eq!(r.stop, Some(StopReason::TableCap));
    }

    #[test]
    fn test_completed_result_clamps() {
        let r = ExactTestResult::completed(1.000_000_01, 2);
        assert_eq!(r.p_value, Some(1.0));
        assert!(!r.capped);
    }

    #[test]
    fn test_significance_unavailable() {
        let outcome = TestOutcome {
            test: TestKind::FisherExact,
            regime: Regime::Exact,
            effective_n: 500,
            statistic: 0.0,
            p_value: None,
            enumeration: Some(ExactTestResult::stopped(StopReason::TableCap, 10)),
        };
        assert!(!outcome.is_available());
        assert_eq!(outcome.is_significant(0.05), None);
    }
}
