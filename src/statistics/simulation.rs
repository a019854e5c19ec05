//! Random tables with fixed margins for Monte Carlo p-value estimates.
//!
//! A table with margins `R`, `C` drawn uniformly from the hypergeometric null
//! is obtained by laying out `C[j]` copies of each column label, shuffling
//! them, and dealing the first `R[0]` labels to row 0, the next `R[1]` to
//! row 1, and so on.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::contingency::Margins;

use super::LogFactorials;

/// Counter-based RNG seed generation using SplitMix64.
///
/// Derives a well-distributed seed for replicate `counter` from `base_seed`,
/// so replicate `i` sees the same stream whether it runs on one thread or
/// many.
#[inline]
pub fn counter_rng_seed(base_seed: u64, counter: u64) -> u64 {
    let mut z = base_seed.wrapping_add(counter.wrapping_mul(0x9e3779b97f4a7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Count random tables whose probability is at most `threshold`.
///
/// # Arguments
///
/// * `margins` - Fixed row and column totals
/// * `lf` - Log-factorials covering the grand total
/// * `threshold` - Observed table probability plus round-off tolerance
/// * `replicates` - Number of tables to draw
/// * `seed` - Base seed; replicate `i` uses `counter_rng_seed(seed, i)`
pub fn simulate_table_p_value(
    margins: &Margins,
    lf: &LogFactorials,
    threshold: f64,
    replicates: usize,
    seed: u64,
) -> usize {
    let labels = column_labels(margins);
    let log_numerator = margins.log_numerator(lf);
    let cell_count = margins.rows().len() * margins.cols().len();

    #[cfg(feature = "parallel")]
    let hits = crate::thread_pool::install(|| {
        (0..replicates)
            .into_par_iter()
            .map_init(
                || (labels.clone(), vec![0u64; cell_count]),
                |(shuffled, cells), i| {
                    let mut rng =
                        Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, i as u64));
                    let log_p = draw_log_probability(margins, lf, log_numerator, shuffled, cells, &mut rng);
                    log_p.exp() <= threshold
                },
            )
            .filter(|&hit| hit)
            .count()
    });

    #[cfg(not(feature = "parallel"))]
    let hits = {
        let mut shuffled = labels;
        let mut cells = vec![0u64; cell_count];
        (0..replicates)
            .filter(|&i| {
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, i as u64));
                let log_p =
                    draw_log_probability(margins, lf, log_numerator, &mut shuffled, &mut cells, &mut rng);
                log_p.exp() <= threshold
            })
            .count()
    };

    hits
}

fn column_labels(margins: &Margins) -> Vec<usize> {
    margins
        .cols()
        .iter()
        .enumerate()
        .flat_map(|(j, &count)| std::iter::repeat(j).take(count as usize))
        .collect()
}

/// Shuffle `labels`, deal them into `cells`, and return the table's log-probability.
fn draw_log_probability<R: rand::Rng>(
    margins: &Margins,
    lf: &LogFactorials,
    log_numerator: f64,
    labels: &mut [usize],
    cells: &mut [u64],
    rng: &mut R,
) -> f64 {
    labels.shuffle(rng);
    cells.fill(0);

    let cols = margins.cols().len();
    let mut pos = 0;
    for (i, &row_total) in margins.rows().iter().enumerate() {
        let end = pos + row_total as usize;
        for &label in &labels[pos..end] {
            cells[i * cols + label] += 1;
        }
        pos = end;
    }

    log_numerator - lf.sum_of(cells.iter())
}
