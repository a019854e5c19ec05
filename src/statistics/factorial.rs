//! Log-factorial lookup tables.
//!
//! Table probabilities are products and quotients of factorials of margins
//! and cell counts. Direct factorials overflow `f64` past 170!, so every
//! probability is accumulated in log space and exponentiated once.

use statrs::function::factorial::ln_factorial;

use crate::constants::LOG_FACTORIAL_CACHE_LIMIT;

/// Precomputed `ln(k!)` for small `k`.
///
/// Built once per enumeration. Every cell count and margin of a table with
/// grand total `n` is at most `n`, but the cache stops at
/// [`LOG_FACTORIAL_CACHE_LIMIT`] so huge totals cost no memory.
#[derive(Debug, Clone)]
pub struct LogFactorials {
    table: Vec<f64>,
}

impl LogFactorials {
    /// Build the table for arguments up to `n`, or up to the cache limit if
    /// that is smaller.
    pub fn up_to(n: u64) -> Self {
        let table = (0..=n.min(LOG_FACTORIAL_CACHE_LIMIT)).map(ln_factorial).collect();
        Self { table }
    }

    /// `ln(k!)`.
    ///
    /// Falls back to `statrs` for arguments beyond the precomputed range.
    #[inline]
    pub fn get(&self, k: u64) -> f64 {
        match self.table.get(k as usize) {
            Some(&v) => v,
            None => ln_factorial(k),
        }
    }

    /// Sum of `ln(k!)` over a sequence of counts.
    #[inline]
    pub fn sum_of<'a, I>(&self, counts: I) -> f64
    where
        I: IntoIterator<Item = &'a u64>,
    {
        counts.into_iter().map(|&k| self.get(k)).sum()
    }
}
