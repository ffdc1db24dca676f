//! Error types for the apic-scanner crate.
//!
//! [`ScanError`] covers failures that stop a scan before any unit runs.
//! Failures inside a unit are never errors of the scan: they are reported
//! as [`SkippedUnit`](crate::SkippedUnit)s and the other units continue.

use apic_client::FetchError;
use apic_core::ConfigError;

/// Errors that prevent a scan from starting.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scanner configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The transport could not be constructed.
    #[error("failed to set up transport: {0}")]
    Transport(#[from] FetchError),

    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
