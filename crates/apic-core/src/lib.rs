//! Core types, configuration, and errors for the APIC utility tools.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`ManagedObject`] and [`PageResponse`] for the controller's JSON model
//! - [`WorkItem`] and [`ShardId`] describing one (service, shard) scan unit
//! - [`MismatchRecord`] for scanner findings
//! - [`Config`] and its sections, loadable from JSON
//! - [`ConfigError`] for configuration failures
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{
    Config, CsvLayout, ExportConfig, FetchConfig, JoinRule, LogConfig, ScanConfig, ServiceSpec,
};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_set};
pub use types::{ManagedObject, MismatchRecord, PageResponse, ShardId, WorkItem};
