//! Type aliases and common types.

use nalgebra::DMatrix;

/// Dense matrix of non-negative cell counts.
pub type CountMatrix = DMatrix<u64>;

/// Dense matrix of expected cell counts under independence.
pub type ExpectedMatrix = DMatrix<f64>;

/// Direction of a paired difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    /// First member of the pair is larger.
    Positive,
    /// Second member of the pair is larger.
    Negative,
}

impl Sign {
    /// Classify a difference, returning `None` for exact ties.
    pub fn of(diff: f64) -> Option<Self> {
        if diff > 0.0 {
            Some(Sign::Positive)
        } else if diff < 0.0 {
            Some(Sign::Negative)
        } else {
            None
        }
    }
}
