//! JSON serialization for test outcomes.

use crate::result::TestOutcome;

/// Serialize a TestOutcome to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails. A non-finite statistic is
/// written as `null` by serde_json rather than failing.
pub fn to_json(outcome: &TestOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string(outcome)
}

/// Serialize a TestOutcome to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(outcome: &TestOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}
