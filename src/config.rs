//! Configuration for exact and asymptotic test selection.

use std::env;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTINUITY_CORRECTION, DEFAULT_MONTE_CARLO_REPLICATES, DEFAULT_TABLE_CAP,
    PROBABILITY_EPSILON, RANK_SUM_EXACT_LIMIT, SIGNED_RANK_EXACT_LIMIT, SIGN_EXACT_LIMIT,
    TABLE_EXACT_LIMIT,
};

/// Configuration options for [`ExactEngine`](crate::ExactEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum complete tables scored before enumeration aborts (default: 100,000).
    pub table_cap: u64,

    /// Grand totals below this are enumerated exactly (default: 200).
    pub table_exact_limit: usize,

    /// Paired counts below this use the exact sign test (default: 15).
    pub sign_exact_limit: usize,

    /// Paired counts below this use the exact signed-rank test (default: 15).
    pub signed_rank_exact_limit: usize,

    /// Combined group sizes below this use the exact rank-sum test (default: 20).
    pub rank_sum_exact_limit: usize,

    /// Round-off tolerance when comparing table probabilities (default: 1e-8).
    pub probability_epsilon: f64,

    /// Continuity correction for asymptotic statistics (default: 0.5).
    pub continuity_correction: f64,

    /// Optional wall-clock guardrail for a single table enumeration, in milliseconds.
    pub max_duration_ms: Option<u64>,

    /// Replicates drawn by the Monte Carlo table estimate (default: 10,000).
    pub monte_carlo_replicates: usize,

    /// Optional deterministic seed for Monte Carlo estimates.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_cap: DEFAULT_TABLE_CAP,
            table_exact_limit: TABLE_EXACT_LIMIT,
            sign_exact_limit: SIGN_EXACT_LIMIT,
            signed_rank_exact_limit: SIGNED_RANK_EXACT_LIMIT,
            rank_sum_exact_limit: RANK_SUM_EXACT_LIMIT,
            probability_epsilon: PROBABILITY_EPSILON,
            continuity_correction: CONTINUITY_CORRECTION,
            max_duration_ms: None,
            monte_carlo_replicates: DEFAULT_MONTE_CARLO_REPLICATES,
            seed: None,
        }
    }
}

impl Config {
    /// Merge overrides from `EXACT_*` environment variables.
    ///
    /// Recognised variables: `EXACT_TABLE_CAP`, `EXACT_TABLE_LIMIT`,
    /// `EXACT_SIGN_LIMIT`, `EXACT_SIGNED_RANK_LIMIT`, `EXACT_RANK_SUM_LIMIT`,
    /// `EXACT_EPSILON`, `EXACT_CONTINUITY`, `EXACT_MAX_DURATION_MS`,
    /// `EXACT_MC_REPLICATES` and `EXACT_SEED`. Unparseable values are ignored.
    pub fn from_env(self) -> Self {
        self.merge_vars(|key| env::var(key).ok())
    }

    /// Merge overrides from an arbitrary key lookup.
    ///
    /// [`Config::from_env`] delegates here; tests pass a map instead of
    /// mutating the process environment.
    pub fn merge_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cap) = parse_var(&lookup, "EXACT_TABLE_CAP") {
            self.table_cap = cap;
        }
        if let Some(limit) = parse_var(&lookup, "EXACT_TABLE_LIMIT") {
            self.table_exact_limit = limit;
        }
        if let Some(limit) = parse_var(&lookup, "EXACT_SIGN_LIMIT") {
            self.sign_exact_limit = limit;
        }
        if let Some(limit) = parse_var(&lookup, "EXACT_SIGNED_RANK_LIMIT") {
            self.signed_rank_exact_limit = limit;
        }
        if let Some(limit) = parse_var(&lookup, "EXACT_RANK_SUM_LIMIT") {
            self.rank_sum_exact_limit = limit;
        }
        if let Some(eps) = parse_var::<f64, _>(&lookup, "EXACT_EPSILON") {
            if eps.is_finite() && eps >= 0.0 {
                self.probability_epsilon = eps;
            }
        }
        if let Some(cc) = parse_var::<f64, _>(&lookup, "EXACT_CONTINUITY") {
            if cc.is_finite() && cc >= 0.0 {
                self.continuity_correction = cc;
            }
        }
        if let Some(ms) = parse_var(&lookup, "EXACT_MAX_DURATION_MS") {
            self.max_duration_ms = Some(ms);
        }
        if let Some(replicates) = parse_var(&lookup, "EXACT_MC_REPLICATES") {
            self.monte_carlo_replicates = replicates;
        }
        if let Some(seed) = parse_var(&lookup, "EXACT_SEED") {
            self.seed = Some(seed);
        }
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.trim().parse().ok())
}
