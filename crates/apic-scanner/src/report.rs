//! Reporting of scan results.
//!
//! [`log_summary`] writes the end-of-run summary through `tracing`.
//! [`render_flat`] produces the historical dump format: one JSON array that
//! alternates `"service:shard"` tags and the offending objects.
//! [`ScanReport`] is the structured, serializable alternative.

use apic_core::{FxHashMap, MismatchRecord};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ScanResult;
use crate::stats::StatsSnapshot;

/// Renders findings as a pretty-printed `[tag, object, tag, object, ...]` array.
///
/// # Examples
///
/// ```
/// use apic_scanner::render_flat;
///
/// assert_eq!(render_flat(&[]), "[]");
/// ```
#[must_use]
pub fn render_flat(records: &[MismatchRecord]) -> String {
    let flat: Vec<Value> = records
        .iter()
        .flat_map(|record| {
            [
                Value::String(record.tag()),
                serde_json::to_value(&record.object).unwrap_or(Value::Null),
            ]
        })
        .collect();
    serde_json::to_string_pretty(&flat).unwrap_or_else(|_| format!("{flat:?}"))
}

/// Logs the end-of-run summary.
///
/// Skipped units are reported first: a degraded run can hide mismatches.
pub fn log_summary(result: &ScanResult) {
    if !result.skipped.is_empty() {
        warn!(
            skipped = result.skipped.len(),
            planned = result.stats.planned,
            "Some scan units could not be fetched; results are incomplete"
        );
        for unit in &result.skipped {
            debug!(unit = %unit.item, error = %unit.error, "Skipped unit");
        }
    }

    if result.mismatches.is_empty() {
        info!("There is no actionSubj and pconsRefDn mismatch found");
        return;
    }

    let mut by_service: FxHashMap<&str, usize> = FxHashMap::default();
    for record in &result.mismatches {
        *by_service.entry(record.service.as_str()).or_default() += 1;
    }
    let mut by_service: Vec<(&str, usize)> = by_service.into_iter().collect();
    by_service.sort_unstable();

    warn!(
        mismatches = result.mismatches.len(),
        services = ?by_service,
        "One or more services have actionSubj mismatch with pconsRefDn"
    );
    info!("{}", render_flat(&result.mismatches));
}

/// Serializable report of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport<'a> {
    /// Final counters.
    pub stats: StatsSnapshot,
    /// Whether any unit was skipped, so findings may be incomplete.
    pub degraded: bool,
    /// Every finding.
    pub mismatches: &'a [MismatchRecord],
    /// Units that were not scanned, with the reason.
    pub skipped: Vec<SkippedEntry>,
}

/// A skipped unit in a [`ScanReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    /// `service:shard`
    pub unit: String,
    /// Action class of the unit.
    pub action_class: String,
    /// Why the unit was skipped.
    pub error: String,
    /// Request that failed, when known.
    pub url: Option<String>,
    /// Whether the endpoint answered with an unusable reply rather than
    /// failing to answer.
    pub malformed_reply: bool,
}

impl<'a> ScanReport<'a> {
    /// Builds a report borrowing from `result`.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self {
            stats: result.stats,
            degraded: result.stats.is_degraded(),
            mismatches: &result.mismatches,
            skipped: result
                .skipped
                .iter()
                .map(|s| SkippedEntry {
                    unit: s.item.tag(),
                    action_class: s.item.action_class.clone(),
                    error: s.error.to_string(),
                    url: s.error.url().map(str::to_owned),
                    malformed_reply: s.error.is_malformed_reply(),
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
