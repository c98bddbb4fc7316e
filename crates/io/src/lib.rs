// File I/O: source files → rows, results → sheets

pub mod csv;
pub mod error;
pub mod rows;
pub mod xlsx;

use std::path::Path;

use conciliacion_recon::model::{MatchResult, RawRow};

pub use error::{ExportError, ParseError};

/// Column layout of exported result sheets.
pub const EXPORT_HEADERS: [&str; 7] = [
    "coupon",
    "platformName",
    "deboAmount",
    "platformAmount",
    "diff",
    "status",
    "details",
];

/// Source container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = extension(path);
        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(ParseError::UnsupportedFormat(ext)),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

/// Parse file bytes into rows, preserving source row order.
pub fn parse_bytes(bytes: &[u8], format: SourceFormat) -> Result<Vec<RawRow>, ParseError> {
    match format {
        SourceFormat::Csv => csv::import_bytes(bytes),
        SourceFormat::Workbook => xlsx::import_bytes(bytes),
    }
}

/// Read and parse a source file, choosing the format from its extension.
pub fn parse_path(path: &Path) -> Result<Vec<RawRow>, ParseError> {
    let format = SourceFormat::from_path(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| ParseError::Io(format!("cannot read {}: {e}", path.display())))?;
    let rows = parse_bytes(&bytes, format)?;
    log::info!("parsed {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Write results to `path`; `.csv` writes CSV, `.xlsx` a workbook.
pub fn export_results(results: &[MatchResult], path: &Path) -> Result<(), ExportError> {
    match extension(path).as_str() {
        "xlsx" => xlsx::export(results, path)?,
        "csv" => csv::export(results, path)?,
        other => return Err(ExportError::UnsupportedFormat(other.to_string())),
    }
    log::info!("exported {} result(s) to {}", results.len(), path.display());
    Ok(())
}

/// Default export file name for a platform label.
pub fn default_export_name(source_label: &str) -> String {
    format!("Conciliacion_{source_label}.xlsx")
}

/// Raw row as a compact JSON object, for the `details` column.
pub(crate) fn details_json(row: &RawRow) -> String {
    serde_json::to_string(row).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    use conciliacion_recon::reconcile;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("DEBO.xlsx")).unwrap(), SourceFormat::Workbook);
        assert_eq!(SourceFormat::from_path(Path::new("meli.CSV")).unwrap(), SourceFormat::Csv);
        assert_eq!(SourceFormat::from_path(Path::new("clover.ods")).unwrap(), SourceFormat::Workbook);
        let err = SourceFormat::from_path(Path::new("report.pdf")).unwrap_err();
        assert!(err.to_string().contains("'pdf'"));
        assert!(SourceFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_parse_path_missing_file() {
        let err = parse_path(&PathBuf::from("/nonexistent/DEBO.csv")).unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[test]
    fn test_csv_files_through_engine() {
        let dir = tempdir().unwrap();
        let debo = dir.path().join("DEBO.csv");
        let meli = dir.path().join("MELI.csv");
        std::fs::write(&debo, "Cupón;Importe\nA1;100\nA2;20\n").unwrap();
        std::fs::write(&meli, "Referencia externa;Neto\nA1;100,00\nB9;5\n").unwrap();

        let results = reconcile(parse_path(&debo).unwrap(), parse_path(&meli).unwrap(), "MELI");
        let out = dir.path().join(default_export_name("MELI"));
        export_results(&results, &out).unwrap();

        let exported = xlsx::import_bytes(&std::fs::read(&out).unwrap()).unwrap();
        let statuses: Vec<String> = exported.iter().map(|r| r["status"].to_string()).collect();
        assert_eq!(statuses, ["OK", "EXTRA_IN_PLATFORM", "MISSING_IN_PLATFORM"]);
    }

    #[test]
    fn test_export_rejects_unknown_extension() {
        let dir = tempdir().unwrap();
        let err = export_results(&[], &dir.path().join("out.json")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref e) if e == "json"));
    }

    #[test]
    fn test_default_export_name() {
        assert_eq!(default_export_name("MELI"), "Conciliacion_MELI.xlsx");
    }
}
