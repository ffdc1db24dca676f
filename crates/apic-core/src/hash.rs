//! Fast hash map and hash set type aliases.
//!
//! Aliases over the `rustc-hash` collections. Keys in this workspace are
//! short controller strings (distinguished names, service names) that come
//! from a trusted local endpoint, so DoS resistance is not needed.
//!
//! # Examples
//!
//! ```
//! use apic_core::{FxHashSet, fx_hash_set};
//!
//! let mut dns: FxHashSet<&str> = fx_hash_set();
//! dns.insert("pcons/refcont-[uni/tn-a]");
//! assert!(dns.contains("pcons/refcont-[uni/tn-a]"));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
