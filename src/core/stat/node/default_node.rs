use super::{ClusterNode, StatisticNode};
use crate::base::{
    ConcurrencyStat, MetricEvent, MetricItem, MetricItemRetriever, ReadStat, StatNode,
    TimePredicate, WriteStat,
};
use crate::Result;
use std::sync::{Arc, RwLock};

/// DefaultNode holds the statistics for one (context name, resource)
/// pair. It is a leaf or interior node of a context's calling tree.
/// `NodeSelectorSlot` creates it; `ClusterBuilderSlot` attaches the
/// resource's single `ClusterNode` to it on the next pass through the
/// slot chain.
#[derive(Debug)]
pub struct DefaultNode {
    resource: String,
    cluster_node: RwLock<Option<Arc<ClusterNode>>>,
    stat: StatisticNode,
    children: RwLock<Vec<Arc<DefaultNode>>>,
}

impl DefaultNode {
    pub fn new(resource: String) -> Self {
        Self {
            resource,
            cluster_node: RwLock::new(None),
            stat: StatisticNode::new(),
            children: RwLock::new(Vec::new()),
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn set_cluster_node(&self, cluster_node: Arc<ClusterNode>) {
        *self.cluster_node.write().unwrap() = Some(cluster_node);
    }

    pub fn cluster_node(&self) -> Option<Arc<ClusterNode>> {
        self.cluster_node.read().unwrap().clone()
    }

    pub fn stat(&self) -> &StatisticNode {
        &self.stat
    }

    pub fn add_child(&self, child: Arc<DefaultNode>) {
        self.children.write().unwrap().push(child);
    }

    pub fn children(&self) -> Vec<Arc<DefaultNode>> {
        self.children.read().unwrap().clone()
    }
}

impl MetricItemRetriever for DefaultNode {
    fn metrics_on_condition(&self, predicate: &TimePredicate) -> Vec<MetricItem> {
        self.stat.metrics_on_condition(predicate)
    }
}

impl ReadStat for DefaultNode {
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

impl WriteStat for DefaultNode {
    fn add_count(&self, event: MetricEvent, count: u64) {
        self.stat.add_count(event, count);
    }
}

impl ConcurrencyStat for DefaultNode {
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

impl StatNode for DefaultNode {
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
