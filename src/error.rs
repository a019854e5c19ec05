//! Error type for precondition violations and fatal numeric failures.
//!
//! Exceeding the complexity cap is *not* an error: it is reported through
//! [`ExactTestResult::capped`](crate::ExactTestResult::capped).

use thiserror::Error;

/// Errors surfaced before or during an exact computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExactError {
    /// Row and column margins describe different grand totals.
    #[error("row margins sum to {row_total} but column margins sum to {col_total}")]
    MarginMismatch {
        /// Sum of the row margins.
        row_total: u64,
        /// Sum of the column margins.
        col_total: u64,
    },

    /// A margin vector was empty.
    #[error("{axis} margins must contain at least one entry")]
    EmptyMargins {
        /// Which axis was empty ("row" or "column").
        axis: &'static str,
    },

    /// The observed table has a different shape from the margins.
    #[error("observed table is {rows}x{cols} but margins describe {expected_rows}x{expected_cols}")]
    TableShape {
        /// Rows in the observed table.
        rows: usize,
        /// Columns in the observed table.
        cols: usize,
        /// Rows implied by the margins.
        expected_rows: usize,
        /// Columns implied by the margins.
        expected_cols: usize,
    },

    /// The observed table does not sum to the supplied margins.
    #[error("observed table {axis} {index} sums to {actual}, expected {expected}")]
    ObservedMarginMismatch {
        /// "row" or "column".
        axis: &'static str,
        /// Index of the offending row or column.
        index: usize,
        /// Sum found in the observed table.
        actual: u64,
        /// Sum required by the margins.
        expected: u64,
    },

    /// Raw input contained a value that is not a non-negative integer count.
    #[error("invalid count {value}: cells must be finite non-negative integers")]
    InvalidCount {
        /// The rejected value.
        value: f64,
    },

    /// Raw cell data does not fill an `rows x cols` grid.
    #[error("{len} cells cannot form a {rows}x{cols} table")]
    CellCount {
        /// Number of cells supplied.
        len: usize,
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// Paired samples had different lengths.
    #[error("paired samples differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Length of the first sample.
        left: usize,
        /// Length of the second sample.
        right: usize,
    },

    /// A sample contained no usable observations.
    #[error("{what} contains no usable observations")]
    EmptySample {
        /// Description of the empty sample.
        what: &'static str,
    },

    /// A sample contained NaN or an infinite value.
    #[error("{what} contains a non-finite value")]
    NonFinite {
        /// Description of the sample.
        what: &'static str,
    },

    /// The observed table's probability could not be represented.
    #[error("observed table probability is not finite (log-probability {log_probability})")]
    NumericOverflow {
        /// The offending log-probability.
        log_probability: f64,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExactError>;
