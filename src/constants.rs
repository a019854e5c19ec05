//! Named limits and tolerances shared across the engine.
//!
//! Every value here is the default for a [`Config`](crate::Config) field;
//! callers and tests override them through the config rather than editing
//! these constants.

/// Maximum number of complete tables scored before a table enumeration aborts.
pub const DEFAULT_TABLE_CAP: u64 = 100_000;

/// Tolerance added to the observed table probability when deciding whether a
/// generated table is "as extreme or more extreme".
///
/// Guards float round-off so the observed table always counts toward its own
/// p-value.
pub const PROBABILITY_EPSILON: f64 = 1e-8;

/// Paired sample sizes strictly below this use the exact sign test.
pub const SIGN_EXACT_LIMIT: usize = 15;

/// Paired sample sizes strictly below this use the exact signed-rank test.
///
/// The enumeration visits `2^N` leaves, so this bounds the search to `2^14`.
pub const SIGNED_RANK_EXACT_LIMIT: usize = 15;

/// Combined group sizes strictly below this use the exact rank-sum test.
pub const RANK_SUM_EXACT_LIMIT: usize = 20;

/// Grand totals strictly below this use exact table enumeration.
pub const TABLE_EXACT_LIMIT: usize = 200;

/// Continuity correction applied to discrete statistics before standardization.
pub const CONTINUITY_CORRECTION: f64 = 0.5;

/// Default number of Monte Carlo replicates for simulated table p-values.
pub const DEFAULT_MONTE_CARLO_REPLICATES: usize = 10_000;

/// Number of scored tables between wall-clock deadline checks.
pub const DEADLINE_CHECK_INTERVAL: u64 = 1024;

/// Number of contiguous chunks the first free cell's values are split into
/// for parallel table enumeration.
pub const PARALLEL_CHUNKS: usize = 64;

/// Largest argument whose `ln(k!)` is precomputed; larger arguments are
/// evaluated on demand.
pub const LOG_FACTORIAL_CACHE_LIMIT: u64 = 1 << 16;
