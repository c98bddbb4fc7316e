//! Row normalization: raw source rows → `(identifier, amount)`.
//!
//! Every source names its columns differently, so each role carries an ordered
//! list of candidate columns. Nothing here fails: unreadable amounts become `0`
//! and rows without an identifier are reported as `None`.

use crate::config::ColumnProfile;
use crate::model::{CellValue, Entry, RawRow, Role};

/// First candidate column whose cell holds a value.
fn first_present<'a>(row: &'a RawRow, columns: &[String]) -> Option<&'a CellValue> {
    columns
        .iter()
        .filter_map(|c| row.get(c))
        .find(|v| v.is_present())
}

fn is_trim_char(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Resolve the identifier of a row. Empty when no candidate holds a value.
///
/// Trimming happens after a candidate is chosen, so a whitespace-only cell in
/// the first column still shadows the columns after it.
pub fn resolve_identifier(row: &RawRow, profile: &ColumnProfile) -> String {
    match first_present(row, &profile.identifier) {
        Some(value) => value.as_text().trim_matches(is_trim_char).to_string(),
        None => String::new(),
    }
}

/// Resolve the amount of a row. Missing or unreadable amounts are `0`.
pub fn resolve_amount(row: &RawRow, profile: &ColumnProfile) -> f64 {
    match first_present(row, &profile.amount) {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => parse_amount(s),
        None => 0.0,
    }
}

/// Parse a localized amount string.
///
/// The first comma is read as the decimal separator. The longest leading
/// decimal literal is taken, so `"1.234,56"` reads as `1.234` and
/// `"100 ARS"` as `100`. Anything without a leading literal is `0`.
pub fn parse_amount(text: &str) -> f64 {
    let normalized = text.replacen(',', ".", 1);
    leading_float(&normalized).unwrap_or(0.0)
}

fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start_matches(is_trim_char);
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Normalize one row for `role`. `None` when the identifier is empty.
pub fn normalize(row: RawRow, role: Role, profile: &ColumnProfile) -> Option<Entry> {
    let identifier = resolve_identifier(&row, profile);
    if identifier.is_empty() {
        return None;
    }
    let amount = resolve_amount(&row, profile);
    Some(Entry {
        role,
        identifier,
        amount,
        raw: row,
    })
}
