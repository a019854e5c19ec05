//! # exact-oracle
//!
//! Exact and asymptotic non-parametric hypothesis tests.
//!
//! Small samples are evaluated by exhaustive combinatorial enumeration:
//! - Contingency tables: every `r x c` table with the observed margins is
//!   visited, and the p-value sums the probabilities of tables no more
//!   probable than the observed one (generalized Fisher exact test)
//! - Paired and two-sample rank tests: every sign assignment or rank subset
//!   is visited to build the exact null distribution
//!
//! Larger samples switch to normal or chi-square approximations. The switch
//! is made up front from the effective sample size; an exact computation
//! that runs out of budget reports "not available" instead of silently
//! falling back.
//!
//! ## Quick Start
//!
//! ```ignore
//! use exact_oracle::{fisher_exact, wilcoxon_signed_rank, ContingencyTable};
//!
//! let table = ContingencyTable::from_rows(&[[3u64, 1], [1, 3]])?;
//! let outcome = fisher_exact(&table)?;
//! println!("p = {:?} ({:?})", outcome.p_value, outcome.regime);
//!
//! let before = [1.2, 3.4, 2.2, 5.0];
//! let after = [1.0, 2.9, 2.5, 4.1];
//! let outcome = wilcoxon_signed_rank(&before, &after)?;
//! ```
//!
//! ## Limits
//!
//! Table enumeration is bounded by a table cap (100 000 by default) and an
//! optional wall-clock deadline. Both are set through [`ExactEngine`] or the
//! `EXACT_*` environment variables (see [`Config::from_env`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod dispatch;
mod engine;
mod error;
mod result;
mod types;

#[cfg(feature = "parallel")]
mod thread_pool;

// Functional modules
pub mod contingency;
pub mod enumeration;
pub mod output;
pub mod procedures;
pub mod statistics;

// Re-exports for public API
pub use config::Config;
pub use constants::{
    CONTINUITY_CORRECTION, DEFAULT_TABLE_CAP, PROBABILITY_EPSILON, RANK_SUM_EXACT_LIMIT,
    SIGNED_RANK_EXACT_LIMIT, SIGN_EXACT_LIMIT, TABLE_EXACT_LIMIT,
};
pub use contingency::{ContingencyTable, Margins};
pub use dispatch::{dispatch, select_regime, Dispatched};
pub use engine::ExactEngine;
pub use enumeration::{
    enumerate_permutation_exact, enumerate_table_distribution, enumerate_table_exact,
    EnumerationLimits, PermutationTail,
};
pub use error::{ExactError, Result};
pub use result::{
    Evaluation, ExactTestResult, MonteCarloResult, Regime, StopReason, TestKind, TestOutcome,
};
pub use types::{CountMatrix, ExpectedMatrix, Sign};

/// Fisher's exact test with default configuration.
///
/// Tables with a grand total below [`TABLE_EXACT_LIMIT`] are enumerated
/// exactly; larger ones use the chi-square approximation.
///
/// # Errors
///
/// Does not fail for a table built through [`ContingencyTable`]: its own
/// margins always match it and log-factorials keep the observed probability
/// finite. An exhausted table cap or deadline is not an error; it is
/// reported as `p_value == None`.
pub fn fisher_exact(table: &ContingencyTable) -> Result<TestOutcome> {
    ExactEngine::new().fisher_exact(table)
}

/// Paired sign test with default configuration.
///
/// # Errors
///
/// Returns an error if the samples differ in length or contain non-finite values.
pub fn sign_test(x: &[f64], y: &[f64]) -> Result<TestOutcome> {
    ExactEngine::new().sign_test(x, y)
}

/// Wilcoxon signed-rank test with default configuration.
///
/// # Errors
///
/// Returns an error if the samples differ in length or contain non-finite values.
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<TestOutcome> {
    ExactEngine::new().wilcoxon_signed_rank(x, y)
}

/// Wilcoxon rank-sum test with default configuration.
///
/// # Errors
///
/// Returns an error if either group is empty or contains non-finite values.
pub fn wilcoxon_rank_sum(a: &[f64], b: &[f64]) -> Result<TestOutcome> {
    ExactEngine::new().wilcoxon_rank_sum(a, b)
}
