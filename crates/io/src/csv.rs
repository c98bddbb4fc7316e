// CSV/TSV import/export

use std::path::Path;

use conciliacion_recon::model::{CellValue, MatchResult, RawRow};

use crate::error::{ExportError, ParseError};
use crate::rows::{build_row, unique_headers};
use crate::EXPORT_HEADERS;

/// Parse CSV bytes into rows. The first record is the header row.
pub fn import_bytes(bytes: &[u8]) -> Result<Vec<RawRow>, ParseError> {
    let content = decode(bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let delimiter = sniff_delimiter(content);
    import_from_string(content, delimiter)
}

pub fn import_with_delimiter(bytes: &[u8], delimiter: u8) -> Result<Vec<RawRow>, ParseError> {
    let content = decode(bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    import_from_string(content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Score: lines agreeing with line 1, weighted by field count
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Decode as UTF-8, falling back to Windows-1252 (common for Excel-exported CSVs).
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Vec<RawRow>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let headers = match records.next() {
        Some(record) => {
            let record = record.map_err(|e| ParseError::Csv(e.to_string()))?;
            unique_headers(record.iter())
        }
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| ParseError::Csv(e.to_string()))?;
        let cells = record.iter().map(CellValue::from);
        if let Some(row) = build_row(&headers, cells) {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Write results as CSV, one line per result under `EXPORT_HEADERS`.
pub fn export(results: &[MatchResult], path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| ExportError::Io(e.to_string()))?;

    writer
        .write_record(EXPORT_HEADERS)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for r in results {
        let ledger_amount = r.ledger_amount.to_string();
        let platform_amount = r.platform_amount.to_string();
        let difference = r.difference.to_string();
        let details = crate::details_json(&r.details);
        writer
            .write_record([
                r.identifier.as_str(),
                r.source_label.as_str(),
                ledger_amount.as_str(),
                platform_amount.as_str(),
                difference.as_str(),
                r.status.as_str(),
                details.as_str(),
            ])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ExportError::Io(e.to_string()))?;
    Ok(())
}
