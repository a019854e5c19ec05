//! Contingency tables and their fixed margins.

use serde::{Deserialize, Serialize};

use crate::error::{ExactError, Result};
use crate::statistics::LogFactorials;
use crate::types::{CountMatrix, ExpectedMatrix};

/// Fixed row and column totals of a contingency table.
///
/// Validated on construction: both vectors are non-empty and sum to the
/// same grand total. Immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    rows: Vec<u64>,
    cols: Vec<u64>,
    total: u64,
}

impl Margins {
    /// Validate and build margins.
    pub fn new(rows: Vec<u64>, cols: Vec<u64>) -> Result<Self> {
        if rows.is_empty() {
            return Err(ExactError::EmptyMargins { axis: "row" });
        }
        if cols.is_empty() {
            return Err(ExactError::EmptyMargins { axis: "column" });
        }
        let row_total: u64 = rows.iter().sum();
        let col_total: u64 = cols.iter().sum();
        if row_total != col_total {
            return Err(ExactError::MarginMismatch {
                row_total,
                col_total,
            });
        }
        Ok(Self {
            rows,
            cols,
            total: row_total,
        })
    }

    /// Row totals `R`.
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Column totals `C`.
    pub fn cols(&self) -> &[u64] {
        &self.cols
    }

    /// Grand total `N`.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(rows, cols)` of any table with these margins.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// `ln(∏R! · ∏C! / N!)`, the part of every table's log-probability shared
    /// by all tables with these margins.
    pub fn log_numerator(&self, lf: &LogFactorials) -> f64 {
        lf.sum_of(&self.rows) + lf.sum_of(&self.cols) - lf.get(self.total)
    }
}

/// An observed `r x c` table of non-negative counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    cells: CountMatrix,
}

impl ContingencyTable {
    /// Wrap a count matrix. Rejects tables with no rows or columns.
    pub fn new(cells: CountMatrix) -> Result<Self> {
        if cells.nrows() == 0 {
            return Err(ExactError::EmptyMargins { axis: "row" });
        }
        if cells.ncols() == 0 {
            return Err(ExactError::EmptyMargins { axis: "column" });
        }
        Ok(Self { cells })
    }

    /// Build from a slice of rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[u64]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let flat: Vec<u64> = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        if flat.len() != nrows * ncols {
            return Err(ExactError::CellCount {
                len: flat.len(),
                rows: nrows,
                cols: ncols,
            });
        }
        Self::new(CountMatrix::from_row_slice(nrows, ncols, &flat))
    }

    /// Build from raw floating-point counts in row-major order.
    ///
    /// Every value must be a finite, non-negative integer.
    pub fn from_counts(data: &[f64], rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(ExactError::CellCount {
                len: data.len(),
                rows,
                cols,
            });
        }
        let counts = data
            .iter()
            .map(|&value| {
                if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
                    Ok(value as u64)
                } else {
                    Err(ExactError::InvalidCount { value })
                }
            })
            .collect::<Result<Vec<u64>>>()?;
        Self::new(CountMatrix::from_row_slice(rows, cols, &counts))
    }

    /// Underlying count matrix.
    pub fn cells(&self) -> &CountMatrix {
        &self.cells
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    /// Cell count at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[(row, col)]
    }

    /// Row sums.
    pub fn row_totals(&self) -> Vec<u64> {
        (0..self.cells.nrows())
            .map(|i| self.cells.row(i).iter().sum())
            .collect()
    }

    /// Column sums.
    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cells.ncols())
            .map(|j| self.cells.column(j).iter().sum())
            .collect()
    }

    /// Grand total.
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    /// The table's own margins.
    pub fn margins(&self) -> Margins {
        let rows = self.row_totals();
        let cols = self.col_totals();
        let total = rows.iter().sum();
        Margins { rows, cols, total }
    }

    /// Check that this table has exactly the supplied margins.
    pub fn check_margins(&self, margins: &Margins) -> Result<()> {
        let (rows, cols) = self.shape();
        let (expected_rows, expected_cols) = margins.shape();
        if rows != expected_rows || cols != expected_cols {
            return Err(ExactError::TableShape {
                rows,
                cols,
                expected_rows,
                expected_cols,
            });
        }
        for (index, (actual, &expected)) in self.row_totals().into_iter().zip(margins.rows()).enumerate() {
            if actual != expected {
                return Err(ExactError::ObservedMarginMismatch {
                    axis: "row",
                    index,
                    actual,
                    expected,
                });
            }
        }
        for (index, (actual, &expected)) in self.col_totals().into_iter().zip(margins.cols()).enumerate() {
            if actual != expected {
                return Err(ExactError::ObservedMarginMismatch {
                    axis: "column",
                    index,
                    actual,
                    expected,
                });
            }
        }
        Ok(())
    }

    /// Hypergeometric log-probability of this table given `margins`.
    pub fn log_probability(&self, margins: &Margins, lf: &LogFactorials) -> f64 {
        margins.log_numerator(lf) - lf.sum_of(self.cells.iter())
    }

    /// Expected counts under independence, `R[i]·C[j]/N`.
    pub fn expected(&self) -> ExpectedMatrix {
        let rows = self.row_totals();
        let cols = self.col_totals();
        let total = self.total() as f64;
        ExpectedMatrix::from_fn(rows.len(), cols.len(), |i, j| {
            if total > 0.0 {
                rows[i] as f64 * cols[j] as f64 / total
            } else {
                0.0
            }
        })
    }
}
