//! Scanner findings.

use serde::{Deserialize, Serialize};

use super::mo::ManagedObject;
use super::work::{ShardId, WorkItem};

/// An action-subject object whose policy-consumption reference was not found.
///
/// # Examples
///
/// ```
/// use apic_core::{ManagedObject, MismatchRecord, ShardId, WorkItem};
///
/// let item = WorkItem::new("policymgr", ShardId::new(5), "actionPolicymgrSubj");
/// let record = MismatchRecord::new(&item, ManagedObject::new("actionPolicymgrSubj"));
/// assert_eq!(record.tag(), "policymgr:5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchRecord {
    /// Service the object was found on.
    pub service: String,
    /// Shard the object was found on.
    pub shard: ShardId,
    /// The offending action-subject object, as returned by the controller.
    pub object: ManagedObject,
}

impl MismatchRecord {
    /// Records `object` as a finding of the given work unit.
    #[must_use]
    pub fn new(item: &WorkItem, object: ManagedObject) -> Self {
        Self {
            service: item.service.clone(),
            shard: item.shard,
            object,
        }
    }

    /// The `service:shard` tag of the unit that produced this record.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:{}", self.service, self.shard)
    }
}
