use crate::{
    base::{BaseSlot, BlockError, ContextPtr, MetricEvent, StatNode, StatSlot},
    utils::curr_time_millis,
};
use lazy_static::lazy_static;
use std::sync::Arc;

const STAT_SLOT_ORDER: u32 = 3000;

lazy_static! {
    pub static ref DEFAULT_STAT_SLOT: Arc<ResourceNodeStatSlot> = Arc::new(ResourceNodeStatSlot {});
}

pub fn default_stat_slot() -> Arc<ResourceNodeStatSlot> {
    DEFAULT_STAT_SLOT.clone()
}

/// ResourceNodeStatSlot records pass/block/complete counters on three
/// statistic nodes at once: the context-local `DefaultNode`, the
/// resource-global `ClusterNode`, and (when the caller's origin is
/// known) that origin's partition within the `ClusterNode`.
pub struct ResourceNodeStatSlot {}

impl ResourceNodeStatSlot {
    fn record_pass_for(&self, node: &Arc<dyn StatNode>, count: u32) {
        node.increase_concurrency();
        node.add_count(MetricEvent::Pass, count as u64);
    }

    fn record_block_for(&self, node: &Arc<dyn StatNode>, count: u32) {
        node.add_count(MetricEvent::Block, count as u64)
    }

    fn record_complete_for(&self, node: &Arc<dyn StatNode>, count: u32, round_trip: u64) {
        node.add_count(MetricEvent::Rt, round_trip);
        node.add_count(MetricEvent::Complete, count as u64);
        node.decrease_concurrency();
    }
}

impl BaseSlot for ResourceNodeStatSlot {
    fn order(&self) -> u32 {
        STAT_SLOT_ORDER
    }
}

impl StatSlot for ResourceNodeStatSlot {
    fn on_entry_pass(&self, ctx: ContextPtr) {
        let ctx = ctx.read().unwrap();
        let input = ctx.input();
        if let Some(stat_node) = ctx.stat_node() {
            self.record_pass_for(&stat_node, input.batch_count());
        }
        let origin = ctx.origin().to_string();
        if let Some(cluster_node) = ctx.cur_node().and_then(|n| n.cluster_node()) {
            let cn: Arc<dyn StatNode> = cluster_node.clone();
            self.record_pass_for(&cn, input.batch_count());
            if !origin.is_empty() {
                let origin_node: Arc<dyn StatNode> = cluster_node.origin_node(&origin);
                self.record_pass_for(&origin_node, input.batch_count());
            }
        }
    }

    #[allow(unused_variables)]
    fn on_entry_blocked(&self, ctx: ContextPtr, block_error: Option<BlockError>) {
        let ctx = ctx.read().unwrap();
        let input = ctx.input();
        if let Some(stat_node) = ctx.stat_node() {
            self.record_block_for(&stat_node, input.batch_count());
        }
        let origin = ctx.origin().to_string();
        if let Some(cur_node) = ctx.cur_node() {
            if let Some(cluster_node) = cur_node.cluster_node() {
                let cn: Arc<dyn StatNode> = cluster_node.clone();
                self.record_block_for(&cn, input.batch_count());
                if !origin.is_empty() {
                    let origin_node: Arc<dyn StatNode> = cluster_node.origin_node(&origin);
                    self.record_block_for(&origin_node, input.batch_count());
                }
            }
        }
    }

    fn on_completed(&self, ctx_ptr: ContextPtr) {
        let mut ctx = ctx_ptr.write().unwrap();
        let round_trip = curr_time_millis() - ctx.start_time();
        ctx.set_round_trip(round_trip);
        let batch_count = ctx.input().batch_count();
        let origin = ctx.origin().to_string();
        if let Some(stat_node) = ctx.stat_node() {
            self.record_complete_for(&stat_node, batch_count, round_trip);
        }
        if let Some(cur_node) = ctx.cur_node() {
            if let Some(cluster_node) = cur_node.cluster_node() {
                let cn: Arc<dyn StatNode> = cluster_node.clone();
                self.record_complete_for(&cn, batch_count, round_trip);
                if !origin.is_empty() {
                    let origin_node: Arc<dyn StatNode> = cluster_node.origin_node(&origin);
                    self.record_complete_for(&origin_node, batch_count, round_trip);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::{EntryContext, ResourceType, ResourceWrapper, StatSlot as _, TrafficType};
    use crate::core::stat::get_or_create_cluster_node;
    use crate::core::stat::node::{DefaultNode, StatisticNode};
    use std::sync::RwLock;

    #[test]
    fn pass_increments_cluster_and_default_node() {
        let default_node = Arc::new(DefaultNode::new("res-stat-slot".into()));
        default_node.set_cluster_node(get_or_create_cluster_node("res-stat-slot"));

        let mut ctx = EntryContext::new_with_name("ctx".into(), "caller-x".into());
        ctx.set_resource(ResourceWrapper::new(
            "res-stat-slot".into(),
            ResourceType::Common,
            TrafficType::Inbound,
        ));
        ctx.set_stat_node(Arc::new(StatisticNode::new()));
        ctx.set_cur_node(default_node.clone());
        let ctx = Arc::new(RwLock::new(ctx));

        let slot = ResourceNodeStatSlot {};
        slot.on_entry_pass(ctx.clone());

        let cluster = default_node.cluster_node().unwrap();
        assert_eq!(cluster.sum(MetricEvent::Pass), 1);
        let origin = cluster.origin_node("caller-x");
        assert_eq!(origin.sum(MetricEvent::Pass), 1);
    }
}
