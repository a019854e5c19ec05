//! Pearson chi-square test of independence.
//!
//! Also serves as the asymptotic branch of Fisher's exact test.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::contingency::ContingencyTable;
use crate::error::Result;
use crate::result::{Evaluation, Regime, TestKind, TestOutcome};
use crate::statistics::chi_square_upper_tail;

/// Pearson statistic with its degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PearsonStatistic {
    /// `Σ (|O − E| − yates)² / E` over non-empty rows and columns.
    pub statistic: f64,
    /// `(r' − 1)(c' − 1)` for the `r' x c'` non-empty sub-table.
    pub df: usize,
    /// Yates correction actually applied (zero unless the table is 2x2).
    pub yates: f64,
}

impl PearsonStatistic {
    /// Upper-tail p-value; a table with no degrees of freedom has p = 1.
    pub fn p_value(&self) -> Option<f64> {
        if self.df == 0 {
            return Some(1.0);
        }
        chi_square_upper_tail(self.statistic, self.df)
    }
}

/// Compute the Pearson statistic for `table`.
///
/// Rows and columns with a zero total carry no information and are skipped
/// (their expected counts are zero). For a 2x2 table the Yates correction
/// `min(continuity, min |O − E|)` is subtracted from every deviation.
pub fn pearson_statistic(table: &ContingencyTable, continuity: f64) -> PearsonStatistic {
    let row_totals = table.row_totals();
    let col_totals = table.col_totals();
    let live_rows: Vec<usize> = (0..row_totals.len()).filter(|&i| row_totals[i] > 0).collect();
    let live_cols: Vec<usize> = (0..col_totals.len()).filter(|&j| col_totals[j] > 0).collect();

    let df = live_rows.len().saturating_sub(1) * live_cols.len().saturating_sub(1);
    if df == 0 {
        return PearsonStatistic {
            statistic: 0.0,
            df,
            yates: 0.0,
        };
    }

    let expected = table.expected();
    let deviations: Vec<(f64, f64)> = live_rows
        .iter()
        .flat_map(|&i| live_cols.iter().map(move |&j| (i, j)))
        .map(|(i, j)| {
            let e = expected[(i, j)];
            ((table.get(i, j) as f64 - e).abs(), e)
        })
        .collect();

    let yates = if live_rows.len() == 2 && live_cols.len() == 2 {
        deviations
            .iter()
            .map(|&(d, _)| d)
            .fold(continuity, f64::min)
    } else {
        0.0
    };

    let statistic = deviations
        .iter()
        .map(|&(d, e)| (d - yates).powi(2) / e)
        .sum();

    PearsonStatistic {
        statistic,
        df,
        yates,
    }
}

/// Pearson chi-square test of independence (always asymptotic).
pub fn chi_square_independence(table: &ContingencyTable, config: &Config) -> Result<TestOutcome> {
    let pearson = pearson_statistic(table, config.continuity_correction);
    let evaluation = Evaluation {
        statistic: pearson.statistic,
        p_value: pearson.p_value(),
        enumeration: None,
    };
    Ok(TestOutcome::new(
        TestKind::ChiSquare,
        table.total() as usize,
        Regime::Asymptotic,
        evaluation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yates_two_by_two() {
        // E = 15 everywhere, |O - E| = 5, Yates stat = 4 * 4.5^2 / 15 = 5.4
        let table = ContingencyTable::from_rows(&[[20u64, 10], [10, 20]]).unwrap();
        let pearson = pearson_statistic(&table, 0.5);
        assert_eq!(pearson.df, 1);
        assert!((pearson.yates - 0.5).abs() < 1e-12);
        assert!((pearson.statistic - 5.4).abs() < 1e-9);
        let p = pearson.p_value().unwrap();
        assert!((p - 0.020_137).abs() < 1e-5, "p = {}", p);
    }

    #[test]
    fn test_uncorrected_larger_table() {
        let table = ContingencyTable::from_rows(&[[10u64, 10, 10], [10, 10, 10]]).unwrap();
        let pearson = pearson_statistic(&table, 0.5);
        assert_eq!(pearson.df, 2);
        assert_eq!(pearson.yates, 0.0);
        assert!(pearson.statistic.abs() < 1e-12);
        assert!((pearson.p_value().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_rows_are_skipped() {
        let table = ContingencyTable::from_rows(&[[5u64, 0], [0, 0], [0, 5]]).unwrap();
        let pearson = pearson_statistic(&table, 0.0);
        assert_eq!(pearson.df, 1);
        assert!((pearson.statistic - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_live_row_has_no_df() {
        let table = ContingencyTable::from_rows(&[[3u64, 4], [0, 0]]).unwrap();
        let outcome = chi_square_independence(&table, &Config::default()).unwrap();
        assert_eq!(outcome.statistic, 0.0);
        assert_eq!(outcome.p_value, Some(1.0));
    }
}
