use super::node::{ClusterNode, EntranceNode};
use crate::{base::DEFAULT_MAX_RESOURCE_AMOUNT, logging};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-global registries backing the calling tree: one `ClusterNode`
/// per resource name, and one `EntranceNode` per context name (the root
/// a context's tree hangs off). Both are created lazily on first entry
/// and never removed, matching the lifetime of the resources/contexts
/// themselves.
lazy_static! {
    static ref CLUSTER_NODE_MAP: RwLock<HashMap<String, Arc<ClusterNode>>> =
        RwLock::new(HashMap::new());
    static ref ENTRANCE_NODE_MAP: RwLock<HashMap<String, Arc<EntranceNode>>> =
        RwLock::new(HashMap::new());
}

pub fn cluster_node_list() -> Vec<Arc<ClusterNode>> {
    CLUSTER_NODE_MAP.read().unwrap().values().cloned().collect()
}

pub fn get_cluster_node(resource: &str) -> Option<Arc<ClusterNode>> {
    CLUSTER_NODE_MAP.read().unwrap().get(resource).cloned()
}

pub fn get_or_create_cluster_node(resource: &str) -> Arc<ClusterNode> {
    if let Some(node) = get_cluster_node(resource) {
        return node;
    }
    let mut map = CLUSTER_NODE_MAP.write().unwrap();
    if let Some(node) = map.get(resource) {
        return node.clone();
    }
    if map.len() >= DEFAULT_MAX_RESOURCE_AMOUNT as usize {
        logging::warn!(
            "[get_or_create_cluster_node] Resource amount exceeds the threshold {}",
            DEFAULT_MAX_RESOURCE_AMOUNT
        );
    }
    let node = Arc::new(ClusterNode::new(resource.to_string()));
    map.insert(resource.to_string(), node.clone());
    node
}

pub fn entrance_node_list() -> Vec<Arc<EntranceNode>> {
    ENTRANCE_NODE_MAP.read().unwrap().values().cloned().collect()
}

pub fn get_entrance_node(context_name: &str) -> Option<Arc<EntranceNode>> {
    ENTRANCE_NODE_MAP.read().unwrap().get(context_name).cloned()
}

pub fn get_or_create_entrance_node(context_name: &str) -> Arc<EntranceNode> {
    if let Some(node) = get_entrance_node(context_name) {
        return node;
    }
    let mut map = ENTRANCE_NODE_MAP.write().unwrap();
    if let Some(node) = map.get(context_name) {
        return node.clone();
    }
    let node = Arc::new(EntranceNode::new(context_name.to_string()));
    map.insert(context_name.to_string(), node.clone());
    node
}

/// Clears every registry. Used only by tests that need a clean global
/// state between cases.
pub fn reset_node_storage() {
    CLUSTER_NODE_MAP.write().unwrap().clear();
    ENTRANCE_NODE_MAP.write().unwrap().clear();
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_cluster_node_per_resource() {
        reset_node_storage();
        let a = get_or_create_cluster_node("foo");
        let b = get_or_create_cluster_node("foo");
        assert!(Arc::ptr_eq(&a, &b));
        let c = get_or_create_cluster_node("bar");
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cluster_node_list().len(), 2);
    }

    #[test]
    fn one_entrance_node_per_context() {
        reset_node_storage();
        let a = get_or_create_entrance_node("ctx-a");
        let b = get_or_create_entrance_node("ctx-a");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(get_entrance_node("ctx-missing").is_none());
    }
}
