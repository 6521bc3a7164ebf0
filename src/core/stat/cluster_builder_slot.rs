use super::get_or_create_cluster_node;
use crate::base::{BaseSlot, ContextPtr, StatPrepareSlot};
use lazy_static::lazy_static;
use std::sync::Arc;

const CLUSTER_BUILDER_SLOT_ORDER: u32 = 2000;

lazy_static! {
    pub static ref DEFAULT_CLUSTER_BUILDER_SLOT: Arc<ClusterBuilderSlot> =
        Arc::new(ClusterBuilderSlot {});
}

pub fn default_cluster_builder_slot() -> Arc<ClusterBuilderSlot> {
    DEFAULT_CLUSTER_BUILDER_SLOT.clone()
}

/// ClusterBuilderSlot attaches the resource-global `ClusterNode` to the
/// context-local `DefaultNode` that `NodeSelectorSlot` just built or
/// reused. Runs right after node selection, before any rule checking,
/// so every later slot can reach the `ClusterNode` through `cur_node`.
pub struct ClusterBuilderSlot {}

impl BaseSlot for ClusterBuilderSlot {
    fn order(&self) -> u32 {
        CLUSTER_BUILDER_SLOT_ORDER
    }
}

impl StatPrepareSlot for ClusterBuilderSlot {
    fn prepare(&self, ctx: ContextPtr) {
        let cur_node = match ctx.read().unwrap().cur_node() {
            Some(node) => node,
            None => return,
        };
        if cur_node.cluster_node().is_some() {
            return;
        }
        let cluster_node = get_or_create_cluster_node(cur_node.resource());
        cur_node.set_cluster_node(cluster_node);
    }
}
