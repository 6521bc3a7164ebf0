use super::{DefaultNode, StatisticNode};
use crate::base::{
    ConcurrencyStat, MetricEvent, MetricItem, MetricItemRetriever, ReadStat, StatNode,
    TimePredicate, WriteStat,
};
use crate::Result;
use std::sync::{Arc, RwLock};

/// EntranceNode is the root of one named context's calling tree. Its
/// direct children are the `DefaultNode`s of the resources entered
/// directly within that context.
#[derive(Debug)]
pub struct EntranceNode {
    context_name: String,
    stat: StatisticNode,
    children: RwLock<Vec<Arc<DefaultNode>>>,
}

impl EntranceNode {
    pub fn new(context_name: String) -> Self {
        Self {
            context_name,
            stat: StatisticNode::new(),
            children: RwLock::new(Vec::new()),
        }
    }

    pub fn context_name(&self) -> &str {
        &self.context_name
    }

    pub fn add_child(&self, child: Arc<DefaultNode>) {
        self.children.write().unwrap().push(child);
    }

    pub fn children(&self) -> Vec<Arc<DefaultNode>> {
        self.children.read().unwrap().clone()
    }
}

impl MetricItemRetriever for EntranceNode {
    fn metrics_on_condition(&self, predicate: &TimePredicate) -> Vec<MetricItem> {
        self.stat.metrics_on_condition(predicate)
    }
}

impl ReadStat for EntranceNode {
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

impl WriteStat for EntranceNode {
    fn add_count(&self, event: MetricEvent, count: u64) {
        self.stat.add_count(event, count);
    }
}

impl ConcurrencyStat for EntranceNode {
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

impl StatNode for EntranceNode {
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
