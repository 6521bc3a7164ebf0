use super::*;
use crate::{
    base::{BaseSlot, ContextPtr, RuleCheckSlot, StatNode, TokenResult},
    logging, utils,
};
use lazy_static::lazy_static;
use std::sync::Arc;

const RULE_CHECK_SLOT_ORDER: u32 = 2000;

/// A RuleSlot for flow related metrics
pub struct Slot {}

lazy_static! {
    pub static ref DEFAULT_SLOT: Arc<Slot> = Arc::new(Slot {});
}

pub fn default_slot() -> Arc<Slot> {
    DEFAULT_SLOT.clone()
}

impl BaseSlot for Slot {
    fn order(&self) -> u32 {
        RULE_CHECK_SLOT_ORDER
    }
}

impl RuleCheckSlot for Slot {
    fn check(&self, ctx_ptr: &ContextPtr) -> TokenResult {
        let (res, batch_count, flag) = {
            let ctx = ctx_ptr.read().unwrap();
            (
                ctx.resource().name().to_owned(),
                ctx.input().batch_count(),
                ctx.input().flag(),
            )
        };
        let tcs = get_traffic_controller_list_for(&res);
        for tc in tcs {
            let actual_node = checker::select_checking_node(ctx_ptr, &tc);
            let r = can_pass_check(&tc, actual_node, batch_count, flag);
            match r {
                TokenResult::Pass => {}
                TokenResult::Blocked(_) => {
                    let mut ctx = ctx_ptr.write().unwrap();
                    ctx.set_result(r);
                    return ctx.result().clone();
                }
                TokenResult::Wait(nanos_to_wait) => {
                    utils::sleep_for_ns(nanos_to_wait);
                }
            }
        }
        ctx_ptr.read().unwrap().result().clone()
    }
}

fn can_pass_check(
    tc: &Arc<Controller>,
    actual_node: Option<Arc<dyn StatNode>>,
    batch_count: u32,
    flag: i32,
) -> TokenResult {
    match actual_node {
        Some(node) => tc.perform_checking(node, batch_count, flag),
        None => {
            logging::FREQUENT_ERROR_ONCE.call_once(|| {
                logging::error!(
                    "None statistics node for flow rule in FlowSlot.can_pass_check() {:?}",
                    tc.rule()
                );
            });
            TokenResult::new_pass()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::{
        EntryContext, MetricEvent, ResourceType, ResourceWrapper, SentinelInput, StatSlot,
        TrafficType,
    };
    use crate::core::stat::{get_or_create_cluster_node, node::DefaultNode};
    use std::sync::RwLock;

    #[test]
    fn rule_check_slot() {
        let slot = Slot {};
        let stat_slot = StandaloneStatSlot {};
        let res_name = String::from("abc-flow-slot");
        let res =
            ResourceWrapper::new(res_name.clone(), ResourceType::Common, TrafficType::Inbound);
        let cluster_node = get_or_create_cluster_node(&res_name);
        let default_node = Arc::new(DefaultNode::new(res_name.clone()));
        default_node.set_cluster_node(cluster_node.clone());

        let mut ctx = EntryContext::new();
        ctx.set_input(SentinelInput::new(1, 0));
        ctx.set_stat_node(cluster_node);
        ctx.set_cur_node(default_node);
        ctx.set_resource(res);
        let ctx = Arc::new(RwLock::new(ctx));

        slot.check(&ctx);

        let r1 = Arc::new(Rule {
            resource: res_name.clone(),
            calculate_strategy: CalculateStrategy::Direct,
            control_strategy: ControlStrategy::Reject,
            // Use standalone statistic, using single-bucket-sliding-windows
            stat_interval_ms: 20000,
            threshold: 100.0,
            relation_strategy: RelationStrategy::Current,
            ..Default::default()
        });
        load_rules(vec![r1]);

        for _ in 0..50 {
            slot.check(&ctx);
            stat_slot.on_entry_pass(ctx.clone());
        }
        assert_eq!(
            get_traffic_controller_list_for(&res_name)[0]
                .stat()
                .read_only_metric()
                .sum(MetricEvent::Pass),
            50
        );
        clear_rules();
    }
}
