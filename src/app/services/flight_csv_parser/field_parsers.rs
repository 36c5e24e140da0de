//! Field lookup and cleaning utilities for flight records
//!
//! Columns absent from the header, and fields beyond the end of a short row,
//! read as blank.

use super::column_mapping::ColumnMapping;

/// Get a trimmed field value, or `""` when the column or field is absent
pub fn get_column_value<'a>(
    fields: &'a [String],
    mapping: &ColumnMapping,
    column_name: &str,
) -> &'a str {
    mapping
        .get_index(column_name)
        .and_then(|index| fields.get(index))
        .map(|value| value.trim())
        .unwrap_or("")
}

/// Get a field value only when it is non-blank
pub fn get_optional_field<'a>(
    fields: &'a [String],
    mapping: &ColumnMapping,
    column_name: &str,
) -> Option<&'a str> {
    Some(get_column_value(fields, mapping, column_name)).filter(|value| !value.is_empty())
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Remove all whitespace and upper-case an IATA-style code
pub fn clean_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Drop embedded quotes, collapse whitespace runs to one space and trim
pub fn clean_text(text: &str) -> String {
    text.replace('"', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A flag is set when it reads `1` or `1.0`, ignoring case and surrounding whitespace
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "1.0")
}

/// Strip punctuation from a date; `Some` only when exactly 8 digits remain
pub fn normalize_date(raw: &str) -> Option<String> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    (digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// Parse a delay in (possibly fractional) minutes
///
/// Returns `Ok(None)` for blank values and values that do not round to a
/// positive minute, and the rounded minutes otherwise. Unparseable text is an
/// `Err` carrying the raw value so the caller can report it.
pub fn parse_delay_minutes(raw: &str) -> Result<Option<i32>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let delay: f64 = trimmed.parse().map_err(|_| trimmed.to_string())?;
    if delay > 0.0 {
        // Under half a minute rounds away to nothing
        let minutes = delay.round() as i32;
        Ok((minutes > 0).then_some(minutes))
    } else {
        Ok(None)
    }
}

/// Deterministic string hash: `h = 31 * h + unit` over UTF-16 code units
///
/// Must stay stable across runs and toolchain versions.
pub fn stable_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}
