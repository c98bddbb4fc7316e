use std::fmt;

/// A source file could not be turned into rows. Reconciliation must not run.
#[derive(Debug)]
pub enum ParseError {
    /// File could not be read.
    Io(String),
    /// Malformed CSV record.
    Csv(String),
    /// Workbook container could not be opened or its first sheet read.
    Workbook(String),
    /// Workbook has no sheets.
    NoSheets,
    /// Extension not recognized as CSV or workbook.
    UnsupportedFormat(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported file format '{ext}' (expected csv, tsv, xlsx, xlsm, xlsb, xls or ods)")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Results could not be written.
#[derive(Debug)]
pub enum ExportError {
    Io(String),
    Csv(String),
    Xlsx(String),
    UnsupportedFormat(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV write error: {msg}"),
            Self::Xlsx(msg) => write!(f, "XLSX write error: {msg}"),
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported export format '{ext}' (expected xlsx or csv)")
            }
        }
    }
}

impl std::error::Error for ExportError {}
