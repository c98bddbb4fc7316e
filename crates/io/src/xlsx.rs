// Excel import (first sheet) and result export

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use conciliacion_recon::model::{CellValue, MatchResult, RawRow};

use crate::error::{ExportError, ParseError};
use crate::rows::{build_row, unique_headers};
use crate::EXPORT_HEADERS;

/// Sheet name used for exported results.
pub const RESULT_SHEET: &str = "Conciliacion";

/// Import the first sheet of a workbook (xlsx, xlsm, xlsb, xls, ods).
///
/// The first row of the used range is the header row.
pub fn import_bytes(bytes: &[u8]) -> Result<Vec<RawRow>, ParseError> {
    let mut workbook: Sheets<_> = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ParseError::Workbook(format!("failed to open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let Some(first) = sheet_names.first() else {
        return Err(ParseError::NoSheets);
    };

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| ParseError::Workbook(format!("failed to read sheet '{first}': {e}")))?;

    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(header_row) => unique_headers(header_row.iter().map(header_text)),
        None => return Ok(Vec::new()),
    };

    let rows: Vec<RawRow> = rows_iter
        .filter_map(|cells| build_row(&headers, cells.iter().map(cell_value)))
        .collect();

    log::debug!("sheet '{first}': {} column(s), {} row(s)", headers.len(), rows.len());
    Ok(rows)
}

fn header_text(cell: &Data) -> String {
    match cell_value(cell) {
        CellValue::Text(s) => s,
        CellValue::Number(n) => n.to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::default(),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        // Stored as TRUE/FALSE text, like a spreadsheet displays them
        Data::Bool(b) => CellValue::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        // Dates stay as serial numbers
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Write results into a single `Conciliacion` sheet under `EXPORT_HEADERS`.
pub fn export(results: &[MatchResult], path: &Path) -> Result<(), ExportError> {
    let mut workbook = XlsxWorkbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook
        .add_worksheet()
        .set_name(RESULT_SHEET)
        .map_err(|e| ExportError::Xlsx(format!("failed to create sheet: {e}")))?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| ExportError::Xlsx(format!("failed to write header: {e}")))?;
    }

    for (idx, r) in results.iter().enumerate() {
        let row = idx as u32 + 1;
        let write_err = |e: rust_xlsxwriter::XlsxError| {
            ExportError::Xlsx(format!("failed to write row {row}: {e}"))
        };

        worksheet.write_string(row, 0, &r.identifier).map_err(write_err)?;
        worksheet.write_string(row, 1, &r.source_label).map_err(write_err)?;
        worksheet.write_number(row, 2, r.ledger_amount).map_err(write_err)?;
        worksheet.write_number(row, 3, r.platform_amount).map_err(write_err)?;
        worksheet.write_number(row, 4, r.difference).map_err(write_err)?;
        worksheet.write_string(row, 5, r.status.as_str()).map_err(write_err)?;
        worksheet
            .write_string(row, 6, crate::details_json(&r.details))
            .map_err(write_err)?;
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::Xlsx(format!("failed to save {}: {e}", path.display())))?;

    Ok(())
}
