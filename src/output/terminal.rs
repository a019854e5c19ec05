//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::{Regime, StopReason, TestOutcome};

/// Format a TestOutcome for human-readable terminal output.
///
/// `alpha` only affects coloring of the p-value line.
pub fn format_outcome(outcome: &TestOutcome, alpha: f64) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(50);

    output.push_str(&format!("{}\n", outcome.test.name().bold()));
    output.push_str(&sep);
    output.push('\n');

    output.push_str(&format!(
        "  Regime:      {} (n = {})\n",
        format_regime(outcome.regime),
        outcome.effective_n
    ));
    output.push_str(&format!("  Statistic:   {:.6}\n", outcome.statistic));

    match outcome.p_value {
        Some(p) if p < alpha => {
            output.push_str(&format!("  p-value:     {}\n", format!("{:.6}", p).red().bold()));
        }
        Some(p) => {
            output.push_str(&format!("  p-value:     {}\n", format!("{:.6}", p).green()));
        }
        None => {
            let reason = match outcome.enumeration.and_then(|e| e.stop) {
                Some(StopReason::Deadline) => "deadline exceeded",
                _ => "capped",
            };
            output.push_str(&format!(
                "  p-value:     {}\n",
                format!("not available ({})", reason).yellow()
            ));
        }
    }

    if let Some(enumeration) = outcome.enumeration {
        output.push_str(&format!(
            "  Enumerated:  {} tables{}\n",
            enumeration.enumerated_count,
            if enumeration.capped { " (stopped early)" } else { "" }
        ));
    }

    output.push_str(&sep);
    output.push('\n');
    output
}

fn format_regime(regime: Regime) -> String {
    match regime {
        Regime::Exact => "exact".cyan().to_string(),
        Regime::Asymptotic => "asymptotic".normal().to_string(),
    }
}
