//! Work planning for the fan-out.

use apic_core::{ScanConfig, ShardId, WorkItem};

/// Builds the list of (service, shard) units for a scan.
///
/// Unsharded services get a single unit on [`ShardId::SINGLETON`]; every
/// other service gets one unit per shard in `1..=shard_count`. Units are
/// ordered by service table order, then shard.
///
/// # Examples
///
/// ```
/// use apic_core::ScanConfig;
/// use apic_scanner::plan_work;
///
/// // 2 singleton services + 12 sharded services x 32 shards
/// assert_eq!(plan_work(&ScanConfig::default()).len(), 386);
/// ```
#[must_use]
pub fn plan_work(config: &ScanConfig) -> Vec<WorkItem> {
    let mut items = Vec::with_capacity(config.services.len() * usize::from(config.shard_count));
    for service in &config.services {
        if service.sharded {
            items.extend((1..=config.shard_count).map(|shard| {
                WorkItem::new(&service.name, ShardId::new(shard), &service.action_class)
            }));
        } else {
            items.push(WorkItem::new(
                &service.name,
                ShardId::SINGLETON,
                &service.action_class,
            ));
        }
    }
    items
}
