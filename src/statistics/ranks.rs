//! Mid-rank assignment.
//!
//! Tied observations share the average of the ranks they span. Mid-ranks are
//! always multiples of one half, so doubling them yields integer weights the
//! permutation enumerator can sum exactly.

/// Assign 1-based mid-ranks to `values`, preserving input order.
///
/// Returns the ranks alongside the sizes of every tie group (groups of size
/// one included).
pub fn mid_ranks(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let doubled = doubled_ranks(values);
    let ranks = doubled.ranks.iter().map(|&r| r as f64 / 2.0).collect();
    (ranks, doubled.tie_sizes)
}

/// Tie correction term `Σ (t³ − t)` over tie groups.
pub fn tie_correction(tie_sizes: &[usize]) -> f64 {
    tie_sizes
        .iter()
        .map(|&t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

/// Integer rank weights suitable for exact enumeration.
///
/// When no ties are present the weights are the plain ranks `1..=N` and
/// `scale == 1`; otherwise every weight is a doubled mid-rank and
/// `scale == 2`. Observed sums must be multiplied by `scale` before they are
/// compared against enumerated sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerRanks {
    /// Rank weight of each observation, in input order.
    pub weights: Vec<u64>,
    /// Multiplier between true ranks and `weights`.
    pub scale: u64,
    /// Size of each tie group.
    pub tie_sizes: Vec<usize>,
}

impl IntegerRanks {
    /// Rank `values` (ascending) into integer weights.
    pub fn from_values(values: &[f64]) -> Self {
        let doubled = doubled_ranks(values);
        let has_ties = doubled.tie_sizes.iter().any(|&t| t > 1);
        if has_ties {
            Self {
                weights: doubled.ranks,
                scale: 2,
                tie_sizes: doubled.tie_sizes,
            }
        } else {
            Self {
                weights: doubled.ranks.iter().map(|&r| r / 2).collect(),
                scale: 1,
                tie_sizes: doubled.tie_sizes,
            }
        }
    }

    /// Whether any tie group has more than one member.
    pub fn has_ties(&self) -> bool {
        self.scale > 1
    }

    /// Sum of the weights selected by `mask`.
    pub fn scaled_sum_where<I>(&self, mask: I) -> u64
    where
        I: IntoIterator<Item = bool>,
    {
        self.weights
            .iter()
            .zip(mask)
            .filter(|(_, keep)| *keep)
            .map(|(&w, _)| w)
            .sum()
    }

    /// Sum of all weights.
    pub fn scaled_total(&self) -> u64 {
        self.weights.iter().sum()
    }
}

struct DoubledRanks {
    ranks: Vec<u64>,
    tie_sizes: Vec<usize>,
}

fn doubled_ranks(values: &[f64]) -> DoubledRanks {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0u64; n];
    let mut tie_sizes = Vec::new();

    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end; doubled mean is start+1+end.
        let doubled = (start + 1 + end) as u64;
        for &idx in &order[start..end] {
            ranks[idx] = doubled;
        }
        tie_sizes.push(end - start);
        start = end;
    }

    DoubledRanks { ranks, tie_sizes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_ranks_without_ties() {
        let (ranks, ties) = mid_ranks(&[3.0, 1.0, 2.0]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
        assert!(ties.iter().all(|&t| t == 1));
    }

    #[test]
    fn test_mid_ranks_with_ties() {
        let (ranks, ties) = mid_ranks(&[1.0, 2.0, 2.0, 5.0]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(ties, vec![1, 2, 1]);
        assert_eq!(tie_correction(&ties), 6.0);
    }

    #[test]
    fn test_integer_ranks_plain() {
        let ranks = IntegerRanks::from_values(&[0.5, 0.1, 0.9]);
        assert_eq!(ranks.weights, vec![2, 1, 3]);
        assert_eq!(ranks.scale, 1);
        assert!(!ranks.has_ties());
        assert_eq!(ranks.scaled_total(), 6);
    }

    #[test]
    fn test_integer_ranks_doubled() {
        let ranks = IntegerRanks::from_values(&[1.0, 1.0, 3.0]);
        // Mid-ranks 1.5, 1.5, 3 doubled.
        assert_eq!(ranks.weights, vec![3, 3, 6]);
        assert_eq!(ranks.scale, 2);
        assert_eq!(ranks.scaled_sum_where([true, false, true]), 9);
    }
}
