//! Numeric building blocks shared by the enumerators and test procedures.
//!
//! - Log-factorial tables for hypergeometric table probabilities
//! - Mid-rank assignment with tie bookkeeping
//! - Normal and chi-square tail approximations with continuity correction
//! - Random table generation for Monte Carlo estimates

mod approximation;
mod factorial;
mod ranks;
mod simulation;

pub use approximation::{chi_square_upper_tail, corrected_z, normal_two_sided};
pub use factorial::LogFactorials;
pub use ranks::{mid_ranks, tie_correction, IntegerRanks};
pub use simulation::{counter_rng_seed, simulate_table_p_value};
