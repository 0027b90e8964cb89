//! Raw numeric text normalization
//!
//! Rounds results to display precision and strips floating-point
//! noise. Locale formatting (thousands separators, decimal comma) is
//! the frontend's job and never happens here.

/// Maximum number of fractional digits kept in a formatted result
const MAX_FRACTION_DIGITS: usize = 10;

/// Format a number as raw display text
///
/// Rounds to at most 10 fractional digits, then trims trailing zeros
/// and a dangling decimal point, so `0.1 + 0.2` renders as `0.3`
/// rather than `0.30000000000000004`.
pub fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let formatted = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Parse an operand's raw text into a value
///
/// A trailing `%` marker divides the parsed value by 100. Empty or
/// malformed text yields `None`; callers treat that as a no-op.
pub fn parse_operand(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let (digits, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let value: f64 = digits.parse().ok()?;
    Some(if percent { value / 100.0 } else { value })
}
