//! Exact enumerators.
//!
//! 1. **Table margins** (`table`): every contingency table with fixed row
//!    and column totals, scored by hypergeometric probability
//! 2. **Sign/rank assignments** (`permutation`): every inclusion/exclusion
//!    assignment over integer rank weights
//!
//! Both own their recursion state for the duration of one call only.

mod permutation;
mod table;

pub use permutation::{count_assignments_with_sum, enumerate_permutation_exact, PermutationTail};
pub use table::{enumerate_table_distribution, enumerate_table_exact, EnumerationLimits};
