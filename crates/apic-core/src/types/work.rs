//! Scan work items.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A controller data shard.
///
/// Sharded services are queried for every shard in `1..=shard_count`;
/// singleton services are always queried on shard 1.
///
/// # Examples
///
/// ```
/// use apic_core::ShardId;
///
/// assert_eq!(ShardId::SINGLETON.to_string(), "1");
/// assert_eq!(ShardId::new(32).get(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShardId(u16);

impl ShardId {
    /// The shard used for services that are not sharded.
    pub const SINGLETON: Self = Self(1);

    /// Creates a shard identifier.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Returns the numeric shard id.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One independent scan unit: a service, one of its shards, and the
/// action-subject class to cross-check on that shard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkItem {
    /// Controller service name (e.g. `policymgr`).
    pub service: String,
    /// Shard to query.
    pub shard: ShardId,
    /// Action-subject class owned by the service.
    pub action_class: String,
}

impl WorkItem {
    /// Creates a work item.
    #[must_use]
    pub fn new(service: impl Into<String>, shard: ShardId, action_class: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            shard,
            action_class: action_class.into(),
        }
    }

    /// The `service:shard` tag identifying this unit in reports.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("{}:{}", self.service, self.shard)
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.service, self.shard, self.action_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_item_tag() {
        let item = WorkItem::new("topomgr", ShardId::new(5), "actionTopomgrSubj");
        assert_eq!(item.tag(), "topomgr:5");
        assert_eq!(item.to_string(), "topomgr:5 (actionTopomgrSubj)");
    }

    #[test]
    fn test_shard_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ShardId::new(17)).unwrap(), "17");
    }
}
