//! Statistical tests built on the enumerators and the dispatcher.
//!
//! Each procedure validates its input, computes the observed statistic,
//! derives the effective sample size for its family, and hands one exact and
//! one asymptotic closure to [`dispatch`](crate::dispatch::dispatch).

mod chi_square;
mod fisher;
mod rank_sum;
mod sign;
mod signed_rank;

pub use chi_square::{chi_square_independence, pearson_statistic, PearsonStatistic};
pub use fisher::{fisher_exact, monte_carlo_fisher};
pub use rank_sum::wilcoxon_rank_sum;
pub use sign::sign_test;
pub use signed_rank::wilcoxon_signed_rank;

use crate::error::{ExactError, Result};

/// Reject NaN and infinite values.
fn check_finite(values: &[f64], what: &'static str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ExactError::NonFinite { what })
    }
}

/// Non-zero differences `x[i] - y[i]`; exact ties carry no sign and are dropped.
fn paired_differences(x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(ExactError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    check_finite(x, "first paired sample")?;
    check_finite(y, "second paired sample")?;
    Ok(x.iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect())
}
