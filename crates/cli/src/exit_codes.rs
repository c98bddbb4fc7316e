//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success: every result is OK                     |
//! | 1    | Discrepancies found (mismatch, extra, missing)  |
//! | 2    | CLI usage error (bad args)                      |
//! | 3    | A source file could not be parsed               |
//! | 4    | Invalid reconciliation config                   |
//! | 5    | Results could not be exported                   |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed, nothing to report.
pub const EXIT_SUCCESS: u8 = 0;

/// Reconciliation ran and found at least one non-OK result.
/// Like `diff(1)`, exit 1 means "sources differ."
pub const EXIT_RECON_MISMATCH: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Ledger or platform file unreadable, corrupt, or of unknown format.
pub const EXIT_PARSE: u8 = 3;

/// Config file unreadable, malformed, or failing validation.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Export file could not be written.
pub const EXIT_EXPORT: u8 = 5;
