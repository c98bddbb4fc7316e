// Header row + data rows → RawRow records

use std::collections::HashSet;

use conciliacion_recon::model::{CellValue, RawRow};

const EMPTY_HEADER: &str = "__EMPTY";

/// Make header names usable as row keys.
///
/// Blank headers become `__EMPTY`; repeated names get `_1`, `_2`, ...
/// suffixes so no column is silently shadowed.
pub fn unique_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for name in raw {
        let name: String = name.into();
        let base = if name.is_empty() { EMPTY_HEADER.to_string() } else { name };

        let mut candidate = base.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{base}_{n}");
        }

        seen.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

/// Zip one data record with the headers.
///
/// Every header gets a key: cells past the end of a short record are filled
/// with empty text. Returns `None` for records with no content at all.
pub fn build_row<I>(headers: &[String], cells: I) -> Option<RawRow>
where
    I: IntoIterator<Item = CellValue>,
{
    let mut cells = cells.into_iter();
    let mut row = RawRow::with_capacity(headers.len());
    let mut has_content = false;

    for header in headers {
        let value = cells.next().unwrap_or_default();
        has_content |= !matches!(&value, CellValue::Text(s) if s.is_empty());
        row.insert(header.clone(), value);
    }

    has_content.then_some(row)
}
