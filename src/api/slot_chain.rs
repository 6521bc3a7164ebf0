use crate::{authority, base::SlotChain, degrade, flow, log, stat, system};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// The chain every `EntryBuilder::build()` call runs through by
    /// default. Composition order is fixed: `NodeSelectorSlot` and
    /// `ClusterBuilderSlot` prepare the calling-tree node before any
    /// rule-check slot runs; `AuthoritySlot`, `SystemSlot`, `FlowSlot`,
    /// and `DegradeSlot` check in that order; the stat slots then record
    /// the outcome against the node graph.
    pub static ref GLOBAL_SLOT_CHAIN: Arc<SlotChain> = {
        let mut sc = SlotChain::new();

        sc.add_stat_prepare_slot(stat::default_node_selector_slot());
        sc.add_stat_prepare_slot(stat::default_cluster_builder_slot());

        sc.add_rule_check_slot(authority::default_slot());
        sc.add_rule_check_slot(system::default_slot());
        sc.add_rule_check_slot(flow::default_slot());
        sc.add_rule_check_slot(degrade::default_slot());

        sc.add_stat_slot(log::default_stat_slot());
        sc.add_stat_slot(stat::default_stat_slot());
        sc.add_stat_slot(flow::default_stand_alone_stat_slot());

        Arc::new(sc)
    };
}

pub fn global_slot_chain() -> Arc<SlotChain> {
    GLOBAL_SLOT_CHAIN.clone()
}
