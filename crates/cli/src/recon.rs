//! `conciliar run` / `conciliar validate` — DEBO ↔ platform reconciliation.

use std::path::{Path, PathBuf};

use clap::Args;
use conciliacion_recon::{MatchStatus, ReconConfig, ReconInput, ReconResult};

use crate::exit_codes::{EXIT_EXPORT, EXIT_INVALID_CONFIG, EXIT_PARSE, EXIT_RECON_MISMATCH, EXIT_USAGE};
use crate::CliError;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Internal ledger export (DEBO), .xlsx/.xls/.ods or .csv
    #[arg(long, short = 'l')]
    pub ledger: PathBuf,

    /// Platform settlement report (APPYPF, MELI, CLOVER, ...)
    #[arg(long, short = 'p')]
    pub platform: PathBuf,

    /// Label stamped on every result [default: platform file name, upper-cased]
    #[arg(long)]
    pub label: Option<String>,

    /// TOML config with column candidates and tolerance
    #[arg(long, short = 'c', env = "CONCILIAR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write results to this file (.xlsx or .csv)
    #[arg(long, short = 'o', conflicts_with = "export")]
    pub output: Option<PathBuf>,

    /// Write results to Conciliacion_<LABEL>.xlsx in the current directory
    #[arg(long)]
    pub export: bool,

    /// Output JSON to stdout instead of the human report
    #[arg(long)]
    pub json: bool,

    /// Suppress the human report on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// Label derived from a platform file name: everything before the first dot,
/// upper-cased (`meli.2024-03.xlsx` → `MELI`).
pub fn label_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return None;
    }
    Some(stem.to_uppercase())
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| err(EXIT_INVALID_CONFIG, format!("cannot read config {}: {e}", path.display())))?;
    ReconConfig::from_toml(&config_str).map_err(|e| err(EXIT_INVALID_CONFIG, e.to_string()))
}

fn parse_source(role: &str, path: &Path) -> Result<Vec<conciliacion_recon::RawRow>, CliError> {
    conciliacion_io::parse_path(path).map_err(|e| CliError {
        code: EXIT_PARSE,
        message: format!("{role} file {}: {e}", path.display()),
        hint: Some("expected the first sheet of a workbook, or a CSV with a header row".into()),
    })
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;

    let ledger = parse_source("ledger", &args.ledger)?;
    let platform = parse_source("platform", &args.platform)?;

    let source_label = args
        .label
        .clone()
        .or_else(|| config.label.clone())
        .or_else(|| label_from_path(&args.platform))
        .ok_or_else(|| CliError {
            code: EXIT_USAGE,
            message: format!("cannot derive a label from {}", args.platform.display()),
            hint: Some("pass --label".into()),
        })?;

    log::debug!(
        "ledger: {} row(s), platform '{source_label}': {} row(s)",
        ledger.len(),
        platform.len()
    );

    let input = ReconInput { ledger, platform, source_label };
    let result = conciliacion_recon::run(&config, input);

    let export_path = match (&args.output, args.export) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(conciliacion_io::default_export_name(&result.meta.source_label))),
        (None, false) => None,
    };
    if let Some(path) = &export_path {
        conciliacion_io::export_results(&result.results, path)
            .map_err(|e| err(EXIT_EXPORT, format!("cannot write {}: {e}", path.display())))?;
        if !args.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| err(EXIT_EXPORT, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    }

    if !args.quiet {
        print_report(&result);
    }

    if !result.summary.is_reconciled() {
        // Message left empty: the report already says what differs.
        return Err(err(EXIT_RECON_MISMATCH, ""));
    }

    Ok(())
}

/// Human report on stderr: discrepancies, counts, totals.
fn print_report(result: &ReconResult) {
    let label = &result.meta.source_label;
    let s = &result.summary;

    let discrepancies: Vec<_> = result
        .results
        .iter()
        .filter(|r| r.status != MatchStatus::Ok)
        .collect();

    if !discrepancies.is_empty() {
        eprintln!(
            "{:<20} {:<20} {:>14} {:>14} {:>14}",
            "status", "coupon", "DEBO", label, "difference"
        );
        for r in &discrepancies {
            eprintln!(
                "{:<20} {:<20} {:>14.2} {:>14.2} {:>14.2}",
                r.status.as_str(),
                r.identifier,
                r.ledger_amount,
                r.platform_amount,
                r.difference,
            );
        }
        eprintln!();
    }

    eprintln!(
        "{label}: {} results — {} ok, {} mismatch, {} extra in platform, {} missing in platform",
        s.total_results,
        s.counts.ok,
        s.counts.mismatch,
        s.counts.extra_in_platform,
        s.counts.missing_in_platform,
    );
    eprintln!(
        "totals: DEBO {:.2} | {label} {:.2} | difference {:.2}",
        s.ledger_total, s.platform_total, s.difference,
    );
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config))?;
    eprintln!(
        "config ok: tolerance {}, ledger identifier {:?}, platform identifier {:?}",
        config.tolerance, config.ledger.identifier, config.platform.identifier,
    );
    Ok(())
}
