use crate::model::{MatchResult, MatchStatus, ReconSummary, StatusCounts};

/// Compute totals and status counts from reconciled results.
///
/// Totals are folded from the results themselves, never tracked separately.
pub fn compute_summary(results: &[MatchResult]) -> ReconSummary {
    let mut ledger_total = 0.0;
    let mut platform_total = 0.0;
    let mut counts = StatusCounts::default();

    for r in results {
        ledger_total += r.ledger_amount;
        platform_total += r.platform_amount;

        match r.status {
            MatchStatus::Ok => counts.ok += 1,
            MatchStatus::Mismatch => counts.mismatch += 1,
            MatchStatus::ExtraInPlatform => counts.extra_in_platform += 1,
            MatchStatus::MissingInPlatform => counts.missing_in_platform += 1,
        }
    }

    ReconSummary {
        ledger_total,
        platform_total,
        difference: ledger_total - platform_total,
        total_results: results.len(),
        counts,
    }
}
