//! Exhaustive enumeration of sign/rank inclusion assignments.
//!
//! Each weight is either included (counted toward the positive class) or
//! excluded. The null distribution of a signed-rank style statistic is the
//! distribution of included-weight sums over all `2^N` assignments; the
//! rank-sum statistic restricts to assignments including exactly `m` weights.

use serde::{Deserialize, Serialize};

/// Counts from one permutation enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermutationTail {
    /// Assignments whose included-weight sum is at most the observed sum.
    pub at_or_below: u64,
    /// Assignments visited.
    pub total: u64,
}

impl PermutationTail {
    /// Enumerate all `2^N` assignments over `weights`.
    ///
    /// An empty weight set is the trivial distribution: one assignment,
    /// counted as at-or-below.
    pub fn enumerate(weights: &[u64], observed_sum: u64) -> Self {
        if weights.is_empty() {
            return Self {
                at_or_below: 1,
                total: 1,
            };
        }
        let mut tail = Self {
            at_or_below: 0,
            total: 0,
        };
        tail.descend(weights, 0, 0, observed_sum);
        tail
    }

    /// Enumerate assignments that include exactly `subset_size` weights.
    ///
    /// Returns an empty tail (`total == 0`) when `subset_size > weights.len()`.
    pub fn enumerate_subsets(weights: &[u64], subset_size: usize, observed_sum: u64) -> Self {
        let mut tail = Self {
            at_or_below: 0,
            total: 0,
        };
        tail.descend_subsets(weights, 0, subset_size, 0, observed_sum);
        tail
    }

    /// One-sided ratio `at_or_below / total`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.at_or_below as f64 / self.total as f64
    }

    /// Two-sided p-value `2 · min(ratio, 1 − ratio)`, capped at 1.
    ///
    /// The trivial (empty) distribution has p-value 1.
    pub fn two_sided(&self) -> f64 {
        if self.total <= 1 {
            return 1.0;
        }
        let ratio = self.ratio();
        (2.0 * ratio.min(1.0 - ratio)).min(1.0)
    }

    fn descend(&mut self, weights: &[u64], index: usize, partial: u64, target: u64) {
        if index == weights.len() {
            self.total += 1;
            if partial <= target {
                self.at_or_below += 1;
            }
            return;
        }
        self.descend(weights, index + 1, partial, target);
        self.descend(weights, index + 1, partial + weights[index], target);
    }

    fn descend_subsets(
        &mut self,
        weights: &[u64],
        index: usize,
        remaining: usize,
        partial: u64,
        target: u64,
    ) {
        if remaining > weights.len() - index {
            return;
        }
        if index == weights.len() {
            self.total += 1;
            if partial <= target {
                self.at_or_below += 1;
            }
            return;
        }
        self.descend_subsets(weights, index + 1, remaining, partial, target);
        if remaining > 0 {
            self.descend_subsets(weights, index + 1, remaining - 1, partial + weights[index], target);
        }
    }
}

/// Exact one-sided ratio: the fraction of the `2^N` assignments over
/// `weights` whose included sum is at most `observed_sum`.
///
/// `N == 0` returns `1.0` without recursing.
pub fn enumerate_permutation_exact(weights: &[u64], observed_sum: u64) -> f64 {
    PermutationTail::enumerate(weights, observed_sum).ratio()
}

/// Number of assignments over `weights` whose included sum is exactly `sum`.
pub fn count_assignments_with_sum(weights: &[u64], sum: u64) -> u64 {
    let at = PermutationTail::enumerate(weights, sum).at_or_below;
    let below = match sum.checked_sub(1) {
        Some(prev) => PermutationTail::enumerate(weights, prev).at_or_below,
        None => 0,
    };
    at - below
}
