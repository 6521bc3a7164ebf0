use super::StatisticNode;
use crate::base::{
    ConcurrencyStat, MetricEvent, MetricItem, MetricItemRetriever, ReadStat, StatNode,
    TimePredicate, WriteStat,
};
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// ClusterNode holds the resource-global statistics shared by every
/// context that enters the same resource, plus a copy-on-write map of
/// per-caller (`origin`) statistics used by the `DIRECT` flow strategy
/// when a rule names a specific caller. There is exactly one
/// `ClusterNode` per resource name (see `node_storage`).
#[derive(Debug)]
pub struct ClusterNode {
    resource: String,
    stat: StatisticNode,
    origin_stats: RwLock<Arc<HashMap<String, Arc<StatisticNode>>>>,
}

impl ClusterNode {
    pub fn new(resource: String) -> Self {
        Self {
            resource,
            stat: StatisticNode::new(),
            origin_stats: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Return the statistic node partitioned by caller `origin`, creating
    /// it on first use. Readers take a cheap `Arc` snapshot; writers
    /// build a whole new map and swap it in, so the hot (read) path never
    /// blocks on a writer.
    pub fn origin_node(&self, origin: &str) -> Arc<StatisticNode> {
        if let Some(node) = self.origin_stats.read().unwrap().get(origin) {
            return node.clone();
        }
        let mut guard = self.origin_stats.write().unwrap();
        if let Some(node) = guard.get(origin) {
            return node.clone();
        }
        let mut next = HashMap::clone(&guard);
        let node = Arc::new(StatisticNode::new());
        next.insert(origin.to_string(), node.clone());
        *guard = Arc::new(next);
        node
    }

    pub fn origins(&self) -> Vec<String> {
        self.origin_stats.read().unwrap().keys().cloned().collect()
    }

    pub fn stat(&self) -> &StatisticNode {
        &self.stat
    }
}

impl MetricItemRetriever for ClusterNode {
    fn metrics_on_condition(&self, predicate: &TimePredicate) -> Vec<MetricItem> {
        self.stat.metrics_on_condition(predicate)
    }
}

impl ReadStat for ClusterNode {
    fn qps(&self, event: MetricEvent) -> f64 {
        self.stat.qps(event)
    }
    fn qps_previous(&self, event: MetricEvent) -> f64 {
        self.stat.qps_previous(event)
    }
    fn sum(&self, event: MetricEvent) -> u64 {
        self.stat.sum(event)
    }
    fn min_rt(&self) -> f64 {
        self.stat.min_rt()
    }
    fn avg_rt(&self) -> f64 {
        self.stat.avg_rt()
    }
}

impl WriteStat for ClusterNode {
    fn add_count(&self, event: MetricEvent, count: u64) {
        self.stat.add_count(event, count);
    }
}

impl ConcurrencyStat for ClusterNode {
    fn current_concurrency(&self) -> u32 {
        self.stat.current_concurrency()
    }
    fn increase_concurrency(&self) {
        self.stat.increase_concurrency();
    }
    fn decrease_concurrency(&self) {
        self.stat.decrease_concurrency();
    }
}

impl StatNode for ClusterNode {
    fn generate_read_stat(&self, sample_count: u32, interval_ms: u32) -> Result<Arc<dyn ReadStat>> {
        self.stat.generate_read_stat(sample_count, interval_ms)
    }

    fn try_occupy_next(&self, current_time: u64, acquire_count: u32, threshold: f64) -> Option<u64> {
        self.stat.try_occupy_next(current_time, acquire_count, threshold)
    }

    fn add_waiting_request(&self, future_time: u64, count: u32) {
        self.stat.add_waiting_request(future_time, count);
    }

    fn add_occupied_pass(&self, count: u32) {
        self.stat.add_occupied_pass(count);
    }

    fn update_occupied_time(&self, target_time: i64) -> bool {
        self.stat.update_occupied_time(target_time)
    }
}
