//! Generalized (r x c) Fisher exact test.

use tracing::debug;

use crate::config::Config;
use crate::contingency::ContingencyTable;
use crate::dispatch::dispatch;
use crate::enumeration::{enumerate_table_exact, EnumerationLimits};
use crate::error::{ExactError, Result};
use crate::result::{Evaluation, MonteCarloResult, TestKind, TestOutcome};
use crate::statistics::{simulate_table_p_value, LogFactorials};

use super::chi_square::pearson_statistic;

/// Seed used for Monte Carlo estimates when the config does not fix one.
const DEFAULT_SEED: u64 = 42;

/// Fisher's exact test of independence for an `r x c` table.
///
/// With a grand total below `config.table_exact_limit`, every table sharing
/// the observed margins is enumerated and the statistic is the observed
/// table's hypergeometric probability. A capped enumeration yields
/// `p_value == None`. Larger tables use the Pearson chi-square approximation
/// (Yates-corrected for 2x2), and the statistic is the chi-square value.
pub fn fisher_exact(table: &ContingencyTable, config: &Config) -> Result<TestOutcome> {
    let margins = table.margins();
    let total = margins.total() as usize;
    let limits = EnumerationLimits::from(config);

    let dispatched = dispatch(
        total,
        config.table_exact_limit,
        || {
            let enumeration = enumerate_table_exact(&margins, table, &limits)?;
            let lf = LogFactorials::up_to(margins.total());
            let observed = table.log_probability(&margins, &lf).exp();
            Ok(Evaluation {
                statistic: observed,
                p_value: enumeration.p_value,
                enumeration: Some(enumeration),
            })
        },
        || {
            let pearson = pearson_statistic(table, config.continuity_correction);
            Ok(Evaluation {
                statistic: pearson.statistic,
                p_value: pearson.p_value(),
                enumeration: None,
            })
        },
    )?;

    Ok(TestOutcome::new(
        TestKind::FisherExact,
        total,
        dispatched.regime,
        dispatched.evaluation,
    ))
}

/// Monte Carlo estimate of Fisher's exact p-value.
///
/// Draws `config.monte_carlo_replicates` random tables with the observed
/// margins and reports `(1 + hits) / (replicates + 1)`, where a hit is a
/// table at most as probable as the observed one. This is an explicit
/// alternative for tables too large to enumerate; [`fisher_exact`] never
/// falls back to it.
///
/// # Errors
///
/// [`ExactError::NumericOverflow`] if the observed probability is not finite.
pub fn monte_carlo_fisher(table: &ContingencyTable, config: &Config) -> Result<MonteCarloResult> {
    let margins = table.margins();
    let lf = LogFactorials::up_to(margins.total());
    let observed_log_p = table.log_probability(&margins, &lf);
    if !observed_log_p.is_finite() {
        return Err(ExactError::NumericOverflow {
            log_probability: observed_log_p,
        });
    }
    let threshold = observed_log_p.exp() + config.probability_epsilon;
    let seed = config.seed.unwrap_or(DEFAULT_SEED);
    let replicates = config.monte_carlo_replicates;

    let hits = simulate_table_p_value(&margins, &lf, threshold, replicates, seed);
    let p_value = (1 + hits) as f64 / (replicates + 1) as f64;
    debug!(replicates, hits, seed, p_value, "monte carlo table estimate");

    Ok(MonteCarloResult {
        p_value,
        hits,
        replicates,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Regime, StopReason};

    #[test]
    fn test_lady_tasting_tea() {
        // Classic 2x2 with all margins 4: two-sided p = 34/70.
        let table = ContingencyTable::from_rows(&[[3u64, 1], [1, 3]]).unwrap();
        let outcome = fisher_exact(&table, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert!((outcome.p_value.unwrap() - 34.0 / 70.0).abs() < 1e-10);
        assert!((outcome.statistic - 16.0 / 70.0).abs() < 1e-10);
        assert_eq!(outcome.enumeration.unwrap().enumerated_count, 5);
    }

    #[test]
    fn test_capped_result_is_unavailable() {
        let table = ContingencyTable::from_rows(&[[5u64, 5, 5], [5, 5, 5], [5, 5, 5]]).unwrap();
        let config = Config {
            table_cap: 10,
            ..Config::default()
        };
        let outcome = fisher_exact(&table, &config).unwrap();
        assert_eq!(outcome.regime, Regime::Exact);
        assert!(outcome.p_value.is_none());
        let enumeration = outcome.enumeration.unwrap();
        assert!(enumeration.capped);
        assert_eq!(enumeration.stop, Some(StopReason::TableCap));
    }

    #[test]
    fn test_large_total_uses_chi_square() {
        let table = ContingencyTable::from_rows(&[[120u64, 80], [90, 110]]).unwrap();
        let outcome = fisher_exact(&table, &Config::default()).unwrap();
        assert_eq!(outcome.regime, Regime::Asymptotic);
        assert!(outcome.enumeration.is_none());
        assert!(outcome.p_value.unwrap() < 0.01);
    }

    #[test]
    fn test_monte_carlo_close_to_exact() {
        let table = ContingencyTable::from_rows(&[[3u64, 1], [1, 3]]).unwrap();
        let config = Config {
            monte_carlo_replicates: 4_000,
            seed: Some(11),
            ..Config::default()
        };
        let estimate = monte_carlo_fisher(&table, &config).unwrap();
        assert_eq!(estimate.replicates, 4_000);
        assert!((estimate.p_value - 34.0 / 70.0).abs() < 0.05, "p = {}", estimate.p_value);
        assert!(estimate.standard_error() < 0.01);
    }
}
