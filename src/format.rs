//! Number presentation for report lines.
//!
//! Throughput and memory figures are rendered with Indian digit grouping:
//! the first group left of the decimal point has three digits, every group
//! after it has two (`12,34,567.89`). The fractional part is always two
//! rounded digits.

/// Bytes per megabyte (binary).
pub const BYTES_PER_MB: f64 = 1_048_576.0;

/// Format a value with Indian digit grouping and two decimal places.
///
/// Negative values keep their sign in front of the grouped magnitude.
/// Values that round to zero are printed as `0.00`, never `-0.00`.
/// Non-finite values fall back to their plain representation (`NaN`, `inf`).
///
/// # Example
///
/// ```
/// use resource_probe::format::format_grouped;
///
/// assert_eq!(format_grouped(1234567.89), "12,34,567.89");
/// assert_eq!(format_grouped(999.5), "999.50");
/// ```
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    let negative = value.is_sign_negative() && !is_zero;

    let grouped = group_indian(int_part);
    let mut out = String::with_capacity(grouped.len() + frac_part.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    out.push('.');
    out.push_str(frac_part);
    out
}

/// Format a byte count as megabytes with grouping (e.g. `1,024.00`).
pub fn format_mb(bytes: u64) -> String {
    format_grouped(bytes as f64 / BYTES_PER_MB)
}

/// Insert separators into a string of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);

    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}
