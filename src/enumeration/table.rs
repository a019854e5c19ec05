//! Exhaustive enumeration of contingency tables with fixed margins.
//!
//! Cells are filled in row-major order. Only the `(r-1) x (c-1)` interior
//! cells are chosen freely; the last column of every row and the whole last
//! row follow from the margins by subtraction. Each interior cell is bounded
//! below as well as above, so no branch dead-ends and every leaf is a
//! complete table that is charged against the budget.
//!
//! Every scored table is charged against a [`Budget`] shared by all branches
//! of one call. Once the budget is exhausted the whole enumeration stops and
//! reports [`StopReason::TableCap`] instead of a p-value.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::Config;
use crate::constants::{DEADLINE_CHECK_INTERVAL, DEFAULT_TABLE_CAP, PROBABILITY_EPSILON};
#[cfg(feature = "parallel")]
use crate::constants::PARALLEL_CHUNKS;
use crate::contingency::{ContingencyTable, Margins};
use crate::error::{ExactError, Result};
use crate::result::{ExactTestResult, StopReason};
use crate::statistics::LogFactorials;
use crate::types::CountMatrix;

/// Limits applied to one table enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumerationLimits {
    /// Maximum number of tables scored before aborting.
    pub cap: u64,
    /// Tolerance added to the observed probability.
    pub epsilon: f64,
    /// Optional wall-clock guardrail.
    pub deadline: Option<Duration>,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            cap: DEFAULT_TABLE_CAP,
            epsilon: PROBABILITY_EPSILON,
            deadline: None,
        }
    }
}

impl From<&Config> for EnumerationLimits {
    fn from(config: &Config) -> Self {
        Self {
            cap: config.table_cap,
            epsilon: config.probability_epsilon,
            deadline: config.max_duration_ms.map(Duration::from_millis),
        }
    }
}

/// Sum the probabilities of all tables at most as probable as `observed`.
///
/// Returns an [`ExactTestResult`] whose `p_value` is `None` when the
/// enumeration was capped or ran past its deadline.
///
/// # Errors
///
/// * [`ExactError::TableShape`] / [`ExactError::ObservedMarginMismatch`] if
///   `observed` does not have the given margins.
/// * [`ExactError::NumericOverflow`] if the observed probability is not finite.
pub fn enumerate_table_exact(
    margins: &Margins,
    observed: &ContingencyTable,
    limits: &EnumerationLimits,
) -> Result<ExactTestResult> {
    observed.check_margins(margins)?;

    let lf = LogFactorials::up_to(margins.total());
    let observed_log_p = observed.log_probability(margins, &lf);
    if !observed_log_p.is_finite() {
        return Err(ExactError::NumericOverflow {
            log_probability: observed_log_p,
        });
    }
    let threshold = observed_log_p.exp() + limits.epsilon;

    let budget = Budget::new(limits);

    #[cfg(feature = "parallel")]
    let flow = tail_mass_parallel(margins, &lf, &budget, threshold);
    #[cfg(not(feature = "parallel"))]
    let flow = tail_mass(margins, &lf, &budget, threshold);

    let result = budget.finish(flow);
    match result.stop {
        Some(reason) => warn!(
            rows = margins.rows().len(),
            cols = margins.cols().len(),
            total = margins.total(),
            scored = result.enumerated_count,
            ?reason,
            "table enumeration stopped early; exact p-value unavailable"
        ),
        None => debug!(
            rows = margins.rows().len(),
            cols = margins.cols().len(),
            scored = result.enumerated_count,
            p_value = ?result.p_value,
            "table enumeration complete"
        ),
    }
    Ok(result)
}

/// Visit every table with the given margins, in enumeration order.
///
/// `visit` receives each complete table and its hypergeometric probability.
/// The returned result carries the total probability mass visited as its
/// `p_value` (which is 1 up to round-off for a complete enumeration), or
/// `None` if the limits stopped the walk.
pub fn enumerate_table_distribution<F>(
    margins: &Margins,
    limits: &EnumerationLimits,
    mut visit: F,
) -> ExactTestResult
where
    F: FnMut(&CountMatrix, f64),
{
    let lf = LogFactorials::up_to(margins.total());
    let budget = Budget::new(limits);
    let (rows, cols) = margins.shape();

    let mut mass = 0.0;
    let flow = {
        let mut walker = Walker::new(margins, &lf, &budget, |cells: &[u64], p: f64| {
            mass += p;
            visit(&CountMatrix::from_row_slice(rows, cols, cells), p);
        });
        walker.walk(0)
    };
    budget.finish(with_mass(flow, mass))
}

fn tail_mass(
    margins: &Margins,
    lf: &LogFactorials,
    budget: &Budget,
    threshold: f64,
) -> ControlFlow<StopReason, f64> {
    let mut mass = 0.0;
    let flow = {
        let mut walker = Walker::new(margins, lf, budget, |_: &[u64], p: f64| {
            if p <= threshold {
                mass += p;
            }
        });
        walker.walk(0)
    };
    with_mass(flow, mass)
}

/// Split the values of the first free cell into contiguous chunks and walk
/// each chunk on the shared pool.
///
/// All chunks charge the same atomic budget, so the cap is enforced globally
/// rather than per chunk. The chunk count is fixed, so the order in which
/// masses are added does not depend on the machine.
#[cfg(feature = "parallel")]
fn tail_mass_parallel(
    margins: &Margins,
    lf: &LogFactorials,
    budget: &Budget,
    threshold: f64,
) -> ControlFlow<StopReason, f64> {
    let (rows, cols) = margins.shape();
    if rows < 2 || cols < 2 {
        return tail_mass(margins, lf, budget, threshold);
    }
    let (lower, upper) = first_cell_range(margins);
    if lower == upper {
        return tail_mass(margins, lf, budget, threshold);
    }
    let chunk = (upper - lower).saturating_add(1).div_ceil(PARALLEL_CHUNKS as u64);

    let chunks: Vec<std::result::Result<f64, StopReason>> = crate::thread_pool::install(|| {
        (0..PARALLEL_CHUNKS)
            .into_par_iter()
            .map(|c| {
                let start = lower.saturating_add(c as u64 * chunk);
                if start > upper {
                    return Ok(0.0);
                }
                let end = start.saturating_add(chunk - 1).min(upper);
                let mut mass = 0.0;
                let flow = {
                    let mut walker = Walker::new(margins, lf, budget, |_: &[u64], p: f64| {
                        if p <= threshold {
                            mass += p;
                        }
                    });
                    (start..=end).try_for_each(|k| walker.descend(0, k))
                };
                match flow {
                    ControlFlow::Continue(()) => Ok(mass),
                    ControlFlow::Break(reason) => Err(reason),
                }
            })
            .collect()
    });

    // Chunk order is fixed by the range, so the sum is reproducible.
    let mut mass = 0.0;
    for chunk in chunks {
        match chunk {
            Ok(m) => mass += m,
            Err(reason) => return ControlFlow::Break(reason),
        }
    }
    ControlFlow::Continue(mass)
}

/// Feasible values of cell `(0, 0)` for the given margins.
#[cfg(feature = "parallel")]
fn first_cell_range(margins: &Margins) -> (u64, u64) {
    let row = margins.rows()[0];
    let cols = margins.cols();
    let right: u64 = cols[1..].iter().sum();
    (row.saturating_sub(right), row.min(cols[0]))
}

fn with_mass(flow: ControlFlow<StopReason>, mass: f64) -> ControlFlow<StopReason, f64> {
    match flow {
        ControlFlow::Continue(()) => ControlFlow::Continue(mass),
        ControlFlow::Break(reason) => ControlFlow::Break(reason),
    }
}

const RUNNING: u8 = 0;
const HIT_CAP: u8 = 1;
const HIT_DEADLINE: u8 = 2;

/// Call-scoped table counter shared by every branch of one enumeration.
struct Budget {
    cap: u64,
    scored: AtomicU64,
    halted: AtomicU8,
    started: Instant,
    deadline: Option<Duration>,
}

impl Budget {
    fn new(limits: &EnumerationLimits) -> Self {
        Self {
            cap: limits.cap,
            scored: AtomicU64::new(0),
            halted: AtomicU8::new(RUNNING),
            started: Instant::now(),
            deadline: limits.deadline,
        }
    }

    /// Account for one more complete table.
    fn charge(&self) -> ControlFlow<StopReason> {
        match self.halted.load(Ordering::Relaxed) {
            HIT_CAP => return ControlFlow::Break(StopReason::TableCap),
            HIT_DEADLINE => return ControlFlow::Break(StopReason::Deadline),
            _ => {}
        }
        let scored = self.scored.fetch_add(1, Ordering::Relaxed) + 1;
        if scored > self.cap {
            self.halted.store(HIT_CAP, Ordering::Relaxed);
            return ControlFlow::Break(StopReason::TableCap);
        }
        if let Some(limit) = self.deadline {
            if scored % DEADLINE_CHECK_INTERVAL == 0 && self.started.elapsed() > limit {
                self.halted.store(HIT_DEADLINE, Ordering::Relaxed);
                return ControlFlow::Break(StopReason::Deadline);
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(&self, flow: ControlFlow<StopReason, f64>) -> ExactTestResult {
        let scored = self.scored.load(Ordering::Relaxed);
        match flow {
            ControlFlow::Continue(mass) => ExactTestResult::completed(mass, scored),
            ControlFlow::Break(StopReason::TableCap) => {
                ExactTestResult::stopped(StopReason::TableCap, scored.min(self.cap.saturating_add(1)))
            }
            ControlFlow::Break(reason) => ExactTestResult::stopped(reason, scored),
        }
    }
}

/// Recursive cursor over the free cells of one table.
///
/// `cells` is a single row-major buffer. Interior cells and each row's
/// last-column cell are assigned before recursing and undone on return; the
/// last row is rewritten at every leaf.
struct Walker<'a, S> {
    rows: usize,
    cols: usize,
    lf: &'a LogFactorials,
    log_numerator: f64,
    cells: Vec<u64>,
    row_left: Vec<u64>,
    col_left: Vec<u64>,
    budget: &'a Budget,
    sink: S,
}

impl<'a, S> Walker<'a, S>
where
    S: FnMut(&[u64], f64),
{
    fn new(margins: &Margins, lf: &'a LogFactorials, budget: &'a Budget, sink: S) -> Self {
        let (rows, cols) = margins.shape();
        Self {
            rows,
            cols,
            lf,
            log_numerator: margins.log_numerator(lf),
            cells: vec![0; rows * cols],
            row_left: margins.rows().to_vec(),
            col_left: margins.cols().to_vec(),
            budget,
            sink,
        }
    }

    fn free_cells(&self) -> usize {
        (self.rows - 1) * (self.cols - 1)
    }

    #[inline]
    fn assign(&mut self, i: usize, j: usize, k: u64) {
        self.cells[i * self.cols + j] = k;
        self.row_left[i] -= k;
        self.col_left[j] -= k;
    }

    #[inline]
    fn unassign(&mut self, i: usize, j: usize, k: u64) {
        self.cells[i * self.cols + j] = 0;
        self.row_left[i] += k;
        self.col_left[j] += k;
    }

    /// Feasible values of interior cell `(i, j)`.
    ///
    /// At most what the row and the column have left, and at least enough
    /// that the rest of the row still fits into the columns to the right.
    /// Row and column budgets always balance, so the range is never empty and
    /// every branch ends in a complete table.
    fn cell_range(&self, i: usize, j: usize) -> (u64, u64) {
        let right: u64 = self.col_left[j + 1..].iter().sum();
        let lower = self.row_left[i].saturating_sub(right);
        let upper = self.row_left[i].min(self.col_left[j]);
        (lower, upper)
    }

    fn walk(&mut self, pos: usize) -> ControlFlow<StopReason> {
        if pos == self.free_cells() {
            return self.complete();
        }
        let (i, j) = (pos / (self.cols - 1), pos % (self.cols - 1));
        let (lower, upper) = self.cell_range(i, j);
        for k in lower..=upper {
            self.descend(pos, k)?;
        }
        ControlFlow::Continue(())
    }

    /// Set free cell `pos` to `k`, recurse, and undo.
    ///
    /// The last free cell of a row also back-fills that row's last column,
    /// so the last-column budget seen by later rows is always current.
    fn descend(&mut self, pos: usize, k: u64) -> ControlFlow<StopReason> {
        let last_col = self.cols - 1;
        let (i, j) = (pos / last_col, pos % last_col);
        self.assign(i, j, k);
        let flow = if j + 1 == last_col {
            let fill = self.row_left[i];
            self.assign(i, last_col, fill);
            let flow = self.walk(pos + 1);
            self.unassign(i, last_col, fill);
            flow
        } else {
            self.walk(pos + 1)
        };
        self.unassign(i, j, k);
        flow
    }

    /// Fill the last row from the column budgets, then score the table.
    fn complete(&mut self) -> ControlFlow<StopReason> {
        if self.cols == 1 {
            self.cells.copy_from_slice(&self.row_left);
        } else {
            let last_row = (self.rows - 1) * self.cols;
            self.cells[last_row..].copy_from_slice(&self.col_left);
        }

        self.budget.charge()?;

        let log_p = self.log_numerator - self.lf.sum_of(self.cells.iter());
        if log_p.is_finite() {
            (self.sink)(&self.cells, log_p.exp());
        }
        ControlFlow::Continue(())
    }
}
