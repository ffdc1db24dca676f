//! Action-subject / `pconsRefDn` mismatch scanner.
//!
//! Every controller service owns an action-subject class whose objects point
//! at policy-consumption references (`pconsRefDn`). This crate fetches both
//! classes for every (service, shard) unit, cross-checks them, and reports
//! action subjects whose reference is missing.
//!
//! # Overview
//!
//! The main entry point is [`PconsScanner`], which combines:
//!
//! - [`plan_work`]: the (service, shard) unit list
//! - [`PagedFetcher`]: paginated class fetches per unit
//! - [`cross_reference`]: the join between the two result sets
//! - [`MismatchCollector`]: lock-protected aggregation of findings
//! - [`ScanStats`]: atomic counters for progress and degradation
//!
//! # Example
//!
//! ```no_run
//! use apic_core::Config;
//! use apic_scanner::{PconsScanner, log_summary};
//!
//! let scanner = PconsScanner::from_config(&Config::default())?;
//! let result = scanner.scan()?;
//! log_summary(&result);
//! # Ok::<(), apic_scanner::ScanError>(())
//! ```
//!
//! # Streaming API
//!
//! [`PconsScanner::scan_streaming`] sends a [`ScanUpdate`] per finished unit
//! so callers can show progress while the fan-out runs.
//!
//! # Architecture
//!
//! ```text
//! PconsScanner
//!     │
//!     ├── plan_work ──▶ Vec<WorkItem>           (services x shards)
//!     │
//!     ├── rayon pool (max_in_flight threads)    ── join barrier
//!     │       │
//!     │       └── scan_unit(item)
//!     │               ├── fetch action class     (PagedFetcher)
//!     │               ├── fetch pconsRefDn       (PagedFetcher)
//!     │               └── cross_reference        (JoinRule)
//!     │
//!     ├── MismatchCollector (Mutex<Vec>)
//!     │
//!     └── ScanStats (atomic counters)
//! ```
//!
//! A unit whose fetch fails is skipped and logged; it never aborts the
//! other units and is never counted as a mismatch.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod collector;
mod error;
mod matcher;
mod report;
mod stats;
mod work;

pub use collector::MismatchCollector;
pub use error::ScanError;
pub use matcher::{JoinOutcome, ReferenceMatcher, cross_reference};
pub use report::{ScanReport, SkippedEntry, log_summary, render_flat};
pub use stats::{ScanStats, StatsSnapshot};
pub use work::plan_work;

use std::sync::Arc;
use std::time::Duration;

use apic_client::{ClassQuery, FetchError, HttpTransport, PagedFetcher};
use apic_core::{Config, ConfigError, MismatchRecord, ScanConfig, WorkItem};
use parking_lot::Mutex;
use rayon::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Update sent during a streaming scan.
#[derive(Debug)]
pub enum ScanUpdate {
    /// Number of units about to run (sent once, first).
    WorkPlanned(usize),

    /// A unit was fetched and cross-checked.
    UnitScanned {
        /// The unit.
        item: WorkItem,
        /// Candidates checked.
        checked: usize,
        /// Mismatches found.
        mismatches: usize,
    },

    /// A unit was skipped because a fetch failed.
    UnitSkipped(SkippedUnit),

    /// All units finished (sent once, last).
    Complete(ScanResult),
}

/// A unit that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    /// The unit.
    pub item: WorkItem,
    /// The fetch failure that caused the skip.
    pub error: FetchError,
}

/// Findings of one unit.
#[derive(Debug, Default)]
pub struct UnitFindings {
    /// Candidates checked.
    pub checked: usize,
    /// Unreferenced candidates.
    pub mismatches: Vec<MismatchRecord>,
}

/// Result of a full scan.
#[derive(Debug)]
pub struct ScanResult {
    /// Final counters.
    pub stats: StatsSnapshot,
    /// Every finding. Order across units is not deterministic.
    pub mismatches: Vec<MismatchRecord>,
    /// Units that were not scanned.
    pub skipped: Vec<SkippedUnit>,
}

impl ScanResult {
    /// Returns `true` if every unit was scanned and nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty() && self.skipped.is_empty()
    }
}

/// Cross-checks action subjects against `pconsRefDn` across services and shards.
///
/// `PconsScanner` is cheaply cloneable; clones share the fetcher transport
/// and statistics.
#[derive(Debug, Clone)]
pub struct PconsScanner {
    config: ScanConfig,
    fetcher: PagedFetcher,
    stats: Arc<ScanStats>,
}

impl PconsScanner {
    /// Creates a scanner over an existing fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the service table is empty or the
    /// shard count or fan-out width is zero.
    pub fn new(config: ScanConfig, fetcher: PagedFetcher) -> Result<Self, ScanError> {
        if config.services.is_empty() {
            return Err(ConfigError::invalid_option("scan.services", "must not be empty").into());
        }
        if config.shard_count == 0 {
            return Err(ConfigError::invalid_option("scan.shard_count", "must be at least 1").into());
        }
        if config.max_in_flight == 0 {
            return Err(
                ConfigError::invalid_option("scan.max_in_flight", "must be at least 1").into(),
            );
        }

        info!(
            services = config.services.len(),
            shard_count = config.shard_count,
            max_in_flight = config.max_in_flight,
            join_rule = ?config.join_rule,
            "Creating scanner"
        );

        Ok(Self {
            config,
            fetcher,
            stats: Arc::new(ScanStats::new()),
        })
    }

    /// Creates a scanner against the configured local endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the configuration is invalid, or
    /// [`ScanError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, ScanError> {
        config.validate()?;
        let transport = HttpTransport::new(
            &config.fetch.endpoint,
            Duration::from_secs(config.fetch.request_timeout_secs),
        )?;
        info!(
            endpoint = transport.endpoint(),
            timeout_secs = config.fetch.request_timeout_secs,
            "Using local endpoint"
        );
        let fetcher = PagedFetcher::from_config(Arc::new(transport), &config.fetch);
        Self::new(config.scan.clone(), fetcher)
    }

    /// The units a scan will run.
    #[must_use]
    pub fn work_items(&self) -> Vec<WorkItem> {
        plan_work(&self.config)
    }

    /// Scans a single unit.
    ///
    /// Fetches the action class, then the reference class, and cross-checks
    /// them.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure. No partial findings are produced.
    pub fn scan_unit(&self, item: &WorkItem) -> Result<UnitFindings, FetchError> {
        let actions = self
            .fetcher
            .fetch_class(&ClassQuery::new(&item.service, &item.action_class, item.shard))?;
        let references = self.fetcher.fetch_class(&ClassQuery::new(
            &item.service,
            &self.config.reference_class,
            item.shard,
        ))?;

        let outcome = cross_reference(
            &actions,
            &references,
            &item.action_class,
            &self.config.reference_class,
            &self.config.refcont_prefix,
            self.config.join_rule,
        );

        debug!(
            unit = %item,
            actions = actions.len(),
            references = references.len(),
            checked = outcome.checked,
            mismatches = outcome.unreferenced.len(),
            "Unit scanned"
        );

        Ok(UnitFindings {
            checked: outcome.checked,
            mismatches: outcome
                .unreferenced
                .into_iter()
                .map(|mo| MismatchRecord::new(item, mo.clone()))
                .collect(),
        })
    }

    /// Runs every unit and waits for all of them.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ThreadPool`] if the worker pool cannot be built.
    /// Fetch failures never fail the scan; see [`ScanResult::skipped`].
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        self.run(|_| {})
    }

    /// Runs every unit, streaming progress through `tx`.
    ///
    /// Updates are sent in this order:
    /// 1. [`ScanUpdate::WorkPlanned`], once
    /// 2. [`ScanUpdate::UnitScanned`] or [`ScanUpdate::UnitSkipped`], per unit
    /// 3. [`ScanUpdate::Complete`], once
    ///
    /// Must be called outside an async runtime. A dropped receiver does not
    /// stop the scan; remaining updates are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::ThreadPool`] if the worker pool cannot be built.
    #[allow(clippy::needless_pass_by_value)]
    pub fn scan_streaming(&self, tx: mpsc::Sender<ScanUpdate>) -> Result<(), ScanError> {
        let result = self.run(|update| {
            let _ = tx.blocking_send(update);
        })?;
        let _ = tx.blocking_send(ScanUpdate::Complete(result));
        Ok(())
    }

    /// Returns a snapshot of the current statistics.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// The scanner configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    fn run<F>(&self, on_update: F) -> Result<ScanResult, ScanError>
    where
        F: Fn(ScanUpdate) + Sync,
    {
        let items = self.work_items();
        info!(
            units = items.len(),
            max_in_flight = self.config.max_in_flight,
            "Starting scan"
        );

        self.stats.reset();
        self.stats.add_planned(items.len() as u64);
        on_update(ScanUpdate::WorkPlanned(items.len()));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_in_flight)
            .thread_name(|i| format!("pcons-scan-{i}"))
            .build()?;

        let collector = MismatchCollector::new();
        let skipped: Mutex<Vec<SkippedUnit>> = Mutex::new(Vec::new());

        // One unit per task so a slow shard never holds back queued ones.
        pool.install(|| {
            items.par_iter().with_max_len(1).for_each(|item| {
                match self.scan_unit(item) {
                    Ok(findings) => {
                        let count = findings.mismatches.len();
                        self.stats.increment_scanned();
                        self.stats.add_checked(findings.checked as u64);
                        self.stats.add_mismatches(count as u64);
                        collector.extend(findings.mismatches);
                        on_update(ScanUpdate::UnitScanned {
                            item: item.clone(),
                            checked: findings.checked,
                            mismatches: count,
                        });
                    }
                    Err(error) => {
                        self.stats.increment_skipped();
                        warn!(unit = %item, error = %error, "Skipping unit after fetch failure");
                        let unit = SkippedUnit {
                            item: item.clone(),
                            error,
                        };
                        skipped.lock().push(unit.clone());
                        on_update(ScanUpdate::UnitSkipped(unit));
                    }
                }
            });
        });

        let stats = self.stats.snapshot();
        info!(
            planned = stats.planned,
            scanned = stats.scanned,
            skipped = stats.skipped,
            checked = stats.checked,
            mismatches = stats.mismatches,
            "Scan completed"
        );

        Ok(ScanResult {
            stats,
            mismatches: collector.into_records(),
            skipped: skipped.into_inner(),
        })
    }
}
