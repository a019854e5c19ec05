//! Main `ExactEngine` entry point and builder.

use crate::config::Config;
use crate::contingency::ContingencyTable;
use crate::error::Result;
use crate::procedures;
use crate::result::{MonteCarloResult, TestOutcome};

/// Entry point for exact and asymptotic hypothesis tests.
///
/// Use the builder methods to adjust limits, then call a test method.
///
/// # Example
///
/// ```ignore
/// use exact_oracle::{ContingencyTable, ExactEngine};
///
/// let table = ContingencyTable::from_rows(&[[3u64, 1], [1, 3]])?;
/// let outcome = ExactEngine::new()
///     .table_cap(50_000)
///     .fisher_exact(&table)?;
///
/// match outcome.p_value {
///     Some(p) => println!("p = {:.4}", p),
///     None => println!("exact p-value not computable for this table size"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExactEngine {
    config: Config,
}

impl ExactEngine {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create with defaults overridden by `EXACT_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            config: Config::default().from_env(),
        }
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Create with limits for interactive use: a smaller table cap and a
    /// one-second guardrail per enumeration.
    pub fn quick() -> Self {
        Self {
            config: Config {
                table_cap: 20_000,
                max_duration_ms: Some(1_000),
                monte_carlo_replicates: 2_000,
                ..Config::default()
            },
        }
    }

    /// Set the maximum number of tables scored per enumeration.
    pub fn table_cap(mut self, cap: u64) -> Self {
        self.config.table_cap = cap;
        self
    }

    /// Set the grand total below which tables are enumerated exactly.
    pub fn table_exact_limit(mut self, limit: usize) -> Self {
        self.config.table_exact_limit = limit;
        self
    }

    /// Set the pair count below which the sign test is exact.
    pub fn sign_exact_limit(mut self, limit: usize) -> Self {
        self.config.sign_exact_limit = limit;
        self
    }

    /// Set the pair count below which the signed-rank test is exact.
    pub fn signed_rank_exact_limit(mut self, limit: usize) -> Self {
        self.config.signed_rank_exact_limit = limit;
        self
    }

    /// Set the combined size below which the rank-sum test is exact.
    pub fn rank_sum_exact_limit(mut self, limit: usize) -> Self {
        self.config.rank_sum_exact_limit = limit;
        self
    }

    /// Set the probability round-off tolerance.
    pub fn probability_epsilon(mut self, epsilon: f64) -> Self {
        self.config.probability_epsilon = epsilon;
        self
    }

    /// Set the continuity correction for asymptotic statistics.
    pub fn continuity_correction(mut self, correction: f64) -> Self {
        self.config.continuity_correction = correction;
        self
    }

    /// Set a wall-clock guardrail per table enumeration.
    pub fn max_duration_ms(mut self, ms: u64) -> Self {
        self.config.max_duration_ms = Some(ms);
        self
    }

    /// Set the number of Monte Carlo replicates.
    pub fn monte_carlo_replicates(mut self, replicates: usize) -> Self {
        self.config.monte_carlo_replicates = replicates;
        self
    }

    /// Fix the Monte Carlo seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fisher's exact test of independence (any `r x c`).
    pub fn fisher_exact(&self, table: &ContingencyTable) -> Result<TestOutcome> {
        procedures::fisher_exact(table, &self.config)
    }

    /// Monte Carlo estimate of Fisher's exact p-value.
    pub fn monte_carlo_fisher(&self, table: &ContingencyTable) -> Result<MonteCarloResult> {
        procedures::monte_carlo_fisher(table, &self.config)
    }

    /// Pearson chi-square test of independence.
    pub fn chi_square_independence(&self, table: &ContingencyTable) -> Result<TestOutcome> {
        procedures::chi_square_independence(table, &self.config)
    }

    /// Paired sign test.
    pub fn sign_test(&self, x: &[f64], y: &[f64]) -> Result<TestOutcome> {
        procedures::sign_test(x, y, &self.config)
    }

    /// Wilcoxon signed-rank test on paired samples.
    pub fn wilcoxon_signed_rank(&self, x: &[f64], y: &[f64]) -> Result<TestOutcome> {
        procedures::wilcoxon_signed_rank(x, y, &self.config)
    }

    /// Wilcoxon rank-sum test on independent samples.
    pub fn wilcoxon_rank_sum(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome> {
        procedures::wilcoxon_rank_sum(a, b, &self.config)
    }
}
