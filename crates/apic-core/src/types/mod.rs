//! Domain types for the APIC utility tools.
//!
//! # Module Organization
//!
//! - [`mo`] - Managed objects as returned by the controller
//! - [`page`] - One page of a class query response
//! - [`work`] - Scan work items and shard identifiers
//! - [`mismatch`] - Scanner findings
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use apic_core::{ManagedObject, PageResponse, WorkItem};
//! ```

pub mod mismatch;
pub mod mo;
pub mod page;
pub mod work;

pub use mismatch::MismatchRecord;
pub use mo::ManagedObject;
pub use page::PageResponse;
pub use work::{ShardId, WorkItem};
