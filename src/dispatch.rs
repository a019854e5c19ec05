//! Exact/asymptotic regime selection.
//!
//! The regime is chosen once per invocation from a single size comparison
//! and never changes afterwards. In particular a capped exact enumeration is
//! reported as unavailable; it is not retried asymptotically, since the two
//! paths make different statistical claims.

use tracing::debug;

use crate::error::Result;
use crate::result::{Evaluation, Regime};

/// Regime for an invocation whose enumeration is driven by `effective_n`.
///
/// Exact when `effective_n < threshold`.
pub fn select_regime(effective_n: usize, threshold: usize) -> Regime {
    if effective_n < threshold {
        Regime::Exact
    } else {
        Regime::Asymptotic
    }
}

/// A dispatched evaluation tagged with the regime that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dispatched {
    /// Regime selected for this call.
    pub regime: Regime,
    /// Statistic and p-value from the selected path.
    pub evaluation: Evaluation,
}

/// Run exactly one of `exact` or `asymptotic`, chosen by [`select_regime`].
///
/// # Errors
///
/// Propagates whatever error the selected closure returns.
pub fn dispatch<E, A>(effective_n: usize, threshold: usize, exact: E, asymptotic: A) -> Result<Dispatched>
where
    E: FnOnce() -> Result<Evaluation>,
    A: FnOnce() -> Result<Evaluation>,
{
    let regime = select_regime(effective_n, threshold);
    debug!(effective_n, threshold, ?regime, "dispatching");

    let evaluation = match regime {
        Regime::Exact => exact()?,
        Regime::Asymptotic => asymptotic()?,
    };
    Ok(Dispatched { regime, evaluation })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExactError;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(select_regime(14, 15), Regime::Exact);
        assert_eq!(select_regime(15, 15), Regime::Asymptotic);
        assert_eq!(select_regime(0, 0), Regime::Asymptotic);
    }

    #[test]
    fn test_only_selected_path_runs() {
        let out = dispatch(
            20,
            15,
            || panic!("exact path must not run"),
            || Ok(Evaluation::new(1.5, 0.13)),
        )
        .unwrap();
        assert_eq!(out.regime, Regime::Asymptotic);
        assert_eq!(out.evaluation.p_value, Some(0.13));

        let out = dispatch(
            3,
            15,
            || Ok(Evaluation::new(2.0, 0.75)),
            || panic!("asymptotic path must not run"),
        )
        .unwrap();
        assert_eq!(out.regime, Regime::Exact);
        assert_eq!(out.evaluation.statistic, 2.0);
    }

    #[test]
    fn test_unavailable_exact_is_not_retried() {
        let out = dispatch(
            5,
            15,
            || {
                Ok(Evaluation {
                    statistic: 0.1,
                    p_value: None,
                    enumeration: None,
                })
            },
            || panic!("no fallback after an unavailable exact result"),
        )
        .unwrap();
        assert_eq!(out.regime, Regime::Exact);
        assert!(out.evaluation.p_value.is_none());
    }

    #[test]
    fn test_errors_propagate() {
        let err = dispatch(
            1,
            15,
            || Err(ExactError::EmptySample { what: "x" }),
            || Ok(Evaluation::new(0.0, 1.0)),
        )
        .unwrap_err();
        assert_eq!(err, ExactError::EmptySample { what: "x" });
    }
}
