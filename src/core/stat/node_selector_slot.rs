use super::node::DefaultNode;
use crate::base::{BaseSlot, ContextPtr, StatPrepareSlot};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const NODE_SELECTOR_SLOT_ORDER: u32 = 1000;

lazy_static! {
    pub static ref DEFAULT_NODE_SELECTOR_SLOT: Arc<NodeSelectorSlot> =
        Arc::new(NodeSelectorSlot {});
}

pub fn default_node_selector_slot() -> Arc<NodeSelectorSlot> {
    DEFAULT_NODE_SELECTOR_SLOT.clone()
}

/// Per-context (keyed by context name) copy-on-write map from resource
/// name to the `DefaultNode` that resource gets under that context's
/// calling tree. Reused across every entry of the same context so the
/// tree does not regrow on every call.
type ContextNodeMap = HashMap<String, Arc<DefaultNode>>;
lazy_static! {
    static ref CONTEXT_DEFAULT_NODE_MAPS: RwLock<HashMap<String, Arc<RwLock<Arc<ContextNodeMap>>>>> =
        RwLock::new(HashMap::new());
}

fn context_map_slot(context_name: &str) -> Arc<RwLock<Arc<ContextNodeMap>>> {
    if let Some(slot) = CONTEXT_DEFAULT_NODE_MAPS.read().unwrap().get(context_name) {
        return slot.clone();
    }
    let mut maps = CONTEXT_DEFAULT_NODE_MAPS.write().unwrap();
    if let Some(slot) = maps.get(context_name) {
        return slot.clone();
    }
    let slot = Arc::new(RwLock::new(Arc::new(HashMap::new())));
    maps.insert(context_name.to_string(), slot.clone());
    slot
}

/// NodeSelectorSlot builds (or reuses) the `DefaultNode` for the
/// current resource within the current context's calling tree, and
/// wires it as a child of the context's `cur_node` (or the entrance
/// node, for the first resource entered in the context).
pub struct NodeSelectorSlot {}

impl BaseSlot for NodeSelectorSlot {
    fn order(&self) -> u32 {
        NODE_SELECTOR_SLOT_ORDER
    }
}

impl StatPrepareSlot for NodeSelectorSlot {
    fn prepare(&self, ctx: ContextPtr) {
        let (context_name, resource_name, parent) = {
            let ctx = ctx.read().unwrap();
            (
                ctx.name().to_string(),
                ctx.resource().name().clone(),
                ctx.cur_node(),
            )
        };

        let slot = context_map_slot(&context_name);
        let existing = slot.read().unwrap().get(&resource_name).cloned();
        let node = match existing {
            Some(node) => node,
            None => {
                let mut guard = slot.write().unwrap();
                if let Some(node) = guard.get(&resource_name) {
                    node.clone()
                } else {
                    let node = Arc::new(DefaultNode::new(resource_name.clone()));
                    let mut next = HashMap::clone(&guard);
                    next.insert(resource_name.clone(), node.clone());
                    *guard = Arc::new(next);
                    node
                }
            }
        };

        if let Some(parent) = parent {
            parent.add_child(node.clone());
        } else if let Some(entrance) = ctx.read().unwrap().entrance_node() {
            entrance.add_child(node.clone());
        }

        let mut ctx = ctx.write().unwrap();
        ctx.set_cur_node(node);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base::{EntryContext, ResourceType, ResourceWrapper, TrafficType};
    use crate::core::stat::get_or_create_entrance_node;
    use std::sync::RwLock as StdRwLock;

    #[test]
    fn reuses_node_for_same_resource_and_context() {
        let entrance = get_or_create_entrance_node("node-selector-test-ctx");
        let mut ctx = EntryContext::new_with_name("node-selector-test-ctx".into(), "caller".into());
        ctx.set_entrance_node(entrance);
        ctx.set_resource(ResourceWrapper::new(
            "resA".into(),
            ResourceType::Common,
            TrafficType::Inbound,
        ));
        let ctx = Arc::new(StdRwLock::new(ctx));

        let slot = NodeSelectorSlot {};
        slot.prepare(ctx.clone());
        let first = ctx.read().unwrap().cur_node().unwrap();
        slot.prepare(ctx.clone());
        let second = ctx.read().unwrap().cur_node().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
