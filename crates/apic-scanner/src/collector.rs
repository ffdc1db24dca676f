//! Mismatch aggregation across concurrent scan units.

use apic_core::MismatchRecord;
use parking_lot::Mutex;

/// Append-only, lock-protected list of findings.
///
/// Owned by one scan. Units append while running; the scan reads the list
/// once, after every unit has finished. Append order across units is not
/// deterministic.
///
/// # Examples
///
/// ```
/// use apic_core::{ManagedObject, MismatchRecord, ShardId, WorkItem};
/// use apic_scanner::MismatchCollector;
///
/// let collector = MismatchCollector::new();
/// let item = WorkItem::new("idmgr", ShardId::new(2), "actionIdmgrSubj");
/// collector.extend(vec![MismatchRecord::new(&item, ManagedObject::new("actionIdmgrSubj"))]);
/// assert_eq!(collector.into_records().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MismatchCollector {
    records: Mutex<Vec<MismatchRecord>>,
}

impl MismatchCollector {
    /// Creates an empty collector.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one unit's findings as a single batch.
    pub fn extend(&self, records: Vec<MismatchRecord>) {
        if records.is_empty() {
            return;
        }
        self.records.lock().extend(records);
    }

    /// Number of findings so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Consumes the collector, returning every finding.
    #[must_use]
    pub fn into_records(self) -> Vec<MismatchRecord> {
        self.records.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apic_core::{ManagedObject, ShardId, WorkItem};
    use rayon::prelude::*;

    #[test]
    fn test_concurrent_appends_are_all_kept() {
        let collector = MismatchCollector::new();
        (1..=32u16).into_par_iter().for_each(|shard| {
            let item = WorkItem::new("observer", ShardId::new(shard), "actionObserverSubj");
            collector.extend(vec![
                MismatchRecord::new(&item, ManagedObject::new("actionObserverSubj")),
                MismatchRecord::new(&item, ManagedObject::new("actionObserverSubj")),
            ]);
        });
        assert_eq!(collector.len(), 64);

        let records = collector.into_records();
        let mut shards: Vec<u16> = records.iter().map(|r| r.shard.get()).collect();
        shards.sort_unstable();
        shards.dedup();
        assert_eq!(shards.len(), 32);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let collector = MismatchCollector::new();
        collector.extend(Vec::new());
        assert!(collector.is_empty());
    }
}
