use super::{Controller, RelationStrategy, LIMIT_APP_DEFAULT, LIMIT_APP_OTHER};
use crate::base::{ContextPtr, StatNode};
use crate::core::stat::get_or_create_cluster_node;
use std::sync::Arc;

fn as_stat_node<T: StatNode + 'static>(node: Arc<T>) -> Arc<dyn StatNode> {
    node
}

/// Resolves which statistic node a controller's rule actually checks
/// against:
/// - `Associated` always checks the `ref_resource`'s cluster-wide node,
///   so one resource's traffic can be shaped by another's load.
/// - `Chain` only checks (against the context's own node) when the
///   entering context's name equals `ref_resource`; any other caller
///   reaches the resource through a different chain and the rule does
///   not apply, so checking is skipped entirely.
/// - `Current` checks the resource's cluster-wide node, unless
///   `limit_app` names a specific caller, in which case only that
///   caller's partition of it is checked.
pub fn select_checking_node(ctx: &ContextPtr, tc: &Arc<Controller>) -> Option<Arc<dyn StatNode>> {
    let rule = tc.rule();
    let ctx = ctx.read().unwrap();
    match rule.relation_strategy {
        RelationStrategy::Associated => {
            let cluster = get_or_create_cluster_node(&rule.ref_resource);
            Some(as_stat_node(cluster))
        }
        RelationStrategy::Chain => {
            if ctx.name() != rule.ref_resource {
                return None;
            }
            ctx.cur_node().map(as_stat_node)
        }
        RelationStrategy::Current => {
            let cluster = ctx.cur_node().and_then(|n| n.cluster_node())?;
            if rule.limit_app == LIMIT_APP_DEFAULT || rule.limit_app == LIMIT_APP_OTHER {
                Some(as_stat_node(cluster))
            } else {
                Some(as_stat_node(cluster.origin_node(&rule.limit_app)))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::{EntryContext, ReadStat, ResourceType, ResourceWrapper, TrafficType, WriteStat};
    use crate::core::flow::traffic_shaping::StandaloneStat;
    use crate::core::flow::Rule;
    use crate::core::stat::node::DefaultNode;
    use std::sync::RwLock;

    fn ctx_for(resource: &str, context_name: &str) -> ContextPtr {
        let mut ctx = EntryContext::new_with_name(context_name.into(), "".into());
        ctx.set_resource(ResourceWrapper::new(
            resource.into(),
            ResourceType::Common,
            TrafficType::Inbound,
        ));
        let node = Arc::new(DefaultNode::new(resource.into()));
        node.set_cluster_node(get_or_create_cluster_node(resource));
        ctx.set_cur_node(node);
        Arc::new(RwLock::new(ctx))
    }

    fn fake_controller(rule: Rule) -> Arc<Controller> {
        let read_stat: Arc<dyn ReadStat> = get_or_create_cluster_node(&rule.resource.clone());
        let stat = Arc::new(StandaloneStat::new(true, read_stat, None));
        Controller::new(Arc::new(rule), stat)
    }

    #[test]
    fn associated_checks_ref_resource_cluster() {
        let ctx = ctx_for("resX", "ctx");
        let rule = Rule {
            resource: "resX".into(),
            ref_resource: "resY".into(),
            relation_strategy: RelationStrategy::Associated,
            ..Default::default()
        };
        let tc = fake_controller(rule);
        let node = select_checking_node(&ctx, &tc).unwrap();
        let expected = get_or_create_cluster_node("resY");
        node.add_count(crate::base::MetricEvent::Pass, 1);
        assert!(expected.sum(crate::base::MetricEvent::Pass) >= 1);
    }

    #[test]
    fn chain_skips_when_context_name_mismatches() {
        let ctx = ctx_for("resX", "callerA");
        let rule = Rule {
            resource: "resX".into(),
            ref_resource: "callerB".into(),
            relation_strategy: RelationStrategy::Chain,
            ..Default::default()
        };
        let tc = fake_controller(rule);
        assert!(select_checking_node(&ctx, &tc).is_none());
    }

    #[test]
    fn chain_checks_when_context_name_matches() {
        let ctx = ctx_for("resX", "callerA");
        let rule = Rule {
            resource: "resX".into(),
            ref_resource: "callerA".into(),
            relation_strategy: RelationStrategy::Chain,
            ..Default::default()
        };
        let tc = fake_controller(rule);
        assert!(select_checking_node(&ctx, &tc).is_some());
    }
}
