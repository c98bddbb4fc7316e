use indexmap::IndexMap;

use crate::config::{ColumnProfile, ReconConfig};
use crate::model::{Entry, MatchResult, MatchStatus, RawRow, ReconInput, ReconMeta, ReconResult, Role};
use crate::normalize::normalize;
use crate::summary::compute_summary;

/// Run reconciliation per config. Returns results + summary.
pub fn run(config: &ReconConfig, input: ReconInput) -> ReconResult {
    let ReconInput { ledger, platform, source_label } = input;
    let results = reconcile_with(config, ledger, platform, &source_label);
    let summary = compute_summary(&results);

    ReconResult {
        meta: ReconMeta {
            source_label,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        results,
    }
}

/// Reconcile with the default column profiles and tolerance.
pub fn reconcile(ledger_rows: Vec<RawRow>, platform_rows: Vec<RawRow>, source_label: &str) -> Vec<MatchResult> {
    reconcile_with(&ReconConfig::default(), ledger_rows, platform_rows, source_label)
}

/// Reconcile ledger rows against platform rows.
///
/// Output order: one result per platform row (in platform order), then one per
/// ledger identifier never seen on the platform side (in ledger order).
pub fn reconcile_with(
    config: &ReconConfig,
    ledger_rows: Vec<RawRow>,
    platform_rows: Vec<RawRow>,
    source_label: &str,
) -> Vec<MatchResult> {
    let mut index = build_ledger_index(ledger_rows, &config.ledger);
    let mut results = Vec::with_capacity(platform_rows.len() + index.len());
    let mut dropped = 0usize;

    for row in platform_rows {
        let Some(entry) = normalize(row, Role::Platform, &config.platform) else {
            dropped += 1;
            continue;
        };

        let result = match index.get_mut(&entry.identifier) {
            Some(slot) => {
                slot.found = true;
                matched(&slot.entry, entry, source_label, config.tolerance)
            }
            None => extra_in_platform(entry, source_label),
        };
        results.push(result);
    }

    if dropped > 0 {
        log::debug!("platform: dropped {dropped} row(s) without identifier");
    }

    let platform_driven = results.len();
    results.extend(
        index
            .into_values()
            .filter(|slot| !slot.found)
            .map(|slot| missing_in_platform(slot.entry, source_label)),
    );

    log::debug!(
        "reconciled '{source_label}': {platform_driven} platform-driven, {} missing in platform",
        results.len() - platform_driven
    );

    results
}

struct LedgerSlot {
    entry: Entry,
    found: bool,
}

/// Index ledger rows by identifier, in first-seen order.
///
/// A repeated identifier replaces the earlier entry but keeps its position.
fn build_ledger_index(rows: Vec<RawRow>, profile: &ColumnProfile) -> IndexMap<String, LedgerSlot> {
    let mut index = IndexMap::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        let Some(entry) = normalize(row, Role::Ledger, profile) else {
            dropped += 1;
            continue;
        };
        let key = entry.identifier.clone();
        if index.insert(key, LedgerSlot { entry, found: false }).is_some() {
            log::debug!("ledger: duplicate identifier, keeping last occurrence");
        }
    }

    if dropped > 0 {
        log::debug!("ledger: dropped {dropped} row(s) without identifier");
    }

    index
}

/// `OK` when the absolute difference is strictly below `tolerance`.
pub fn classify(difference: f64, tolerance: f64) -> MatchStatus {
    if difference.abs() < tolerance {
        MatchStatus::Ok
    } else {
        MatchStatus::Mismatch
    }
}

fn matched(ledger: &Entry, platform: Entry, source_label: &str, tolerance: f64) -> MatchResult {
    let difference = ledger.amount - platform.amount;
    MatchResult {
        identifier: platform.identifier,
        source_label: source_label.to_string(),
        ledger_amount: ledger.amount,
        platform_amount: platform.amount,
        difference,
        status: classify(difference, tolerance),
        details: platform.raw,
    }
}

fn extra_in_platform(platform: Entry, source_label: &str) -> MatchResult {
    MatchResult {
        identifier: platform.identifier,
        source_label: source_label.to_string(),
        ledger_amount: 0.0,
        platform_amount: platform.amount,
        difference: -platform.amount,
        status: MatchStatus::ExtraInPlatform,
        details: platform.raw,
    }
}

fn missing_in_platform(ledger: Entry, source_label: &str) -> MatchResult {
    MatchResult {
        identifier: ledger.identifier,
        source_label: source_label.to_string(),
        ledger_amount: ledger.amount,
        platform_amount: 0.0,
        difference: ledger.amount,
        status: MatchStatus::MissingInPlatform,
        details: ledger.raw,
    }
}
