use crate::core::stat::base::{BucketLeapArray, SlidingWindowMetric};
use crate::{
    base::{
        ConcurrencyStat, MetricEvent, MetricItem, MetricItemRetriever, ReadStat, StatNode,
        TimePredicate, WriteStat,
    },
    config, Result,
};
use std::sync::{
    atomic::{AtomicI64, AtomicU32, Ordering},
    Arc,
};

/// OCCUPY_NO_WAY is returned by `try_occupy_next` when no bucket within
/// the horizon of the second-resolution window can accommodate the
/// requested count without exceeding the threshold.
pub const OCCUPY_NO_WAY: i64 = -1;

/// StatisticNode is the leaf statistics engine shared by `DefaultNode`,
/// `ClusterNode` and their origin-partitioned counterparts. It keeps a
/// second-resolution and a minute-resolution sliding window plus the
/// thread gauge and the occupy-future bookkeeping described for flow
/// control with priority requests.
#[derive(Debug)]
pub struct StatisticNode {
    concurrency: AtomicU32,
    last_occupied_time: AtomicI64,
    second_arr: Arc<BucketLeapArray>,
    minute_arr: Arc<BucketLeapArray>,
    second_metric: Arc<SlidingWindowMetric>,
    minute_metric: Arc<SlidingWindowMetric>,
}

impl Default for StatisticNode {
    fn default() -> Self {
        let second_arr = Arc::new(
            BucketLeapArray::new(
                config::global_stat_sample_count_total(),
                config::global_stat_interval_ms_total(),
            )
            .unwrap(),
        );
        let minute_arr = Arc::new(
            BucketLeapArray::new(config::minute_stat_sample_count(), config::minute_stat_interval_ms())
                .unwrap(),
        );
        let second_metric = Arc::new(
            SlidingWindowMetric::new(
                config::metric_stat_sample_count(),
                config::metric_stat_interval_ms(),
                second_arr.clone(),
            )
            .unwrap(),
        );
        let minute_metric = Arc::new(
            SlidingWindowMetric::new(
                config::minute_stat_sample_count(),
                config::minute_stat_interval_ms(),
                minute_arr.clone(),
            )
            .unwrap(),
        );
        Self {
            concurrency: AtomicU32::new(0),
            last_occupied_time: AtomicI64::new(-1),
            second_arr,
            minute_arr,
            second_metric,
            minute_metric,
        }
    }
}

impl StatisticNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curr_thread_num(&self) -> u32 {
        self.concurrency.load(Ordering::SeqCst)
    }

    pub fn last_occupied_time(&self) -> i64 {
        self.last_occupied_time.load(Ordering::SeqCst)
    }
}

impl MetricItemRetriever for StatisticNode {
    fn metrics_on_condition(&self, predicate: &TimePredicate) -> Vec<MetricItem> {
        self.second_metric.second_metrics_on_condition(predicate)
    }
}

impl ReadStat for StatisticNode {
    fn qps(&self, event: MetricEvent) -> f64 {
        self.second_metric.qps(event)
    }
    fn qps_previous(&self, event: MetricEvent) -> f64 {
        self.second_metric.qps_previous(event)
    }
    fn sum(&self, event: MetricEvent) -> u64 {
        self.second_metric.sum(event)
    }
    fn min_rt(&self) -> f64 {
        self.second_metric.min_rt()
    }
    fn avg_rt(&self) -> f64 {
        self.second_metric.avg_rt()
    }
}

impl WriteStat for StatisticNode {
    fn add_count(&self, event: MetricEvent, count: u64) {
        self.second_arr.add_count(event, count);
        self.minute_arr.add_count(event, count);
    }
}

impl ConcurrencyStat for StatisticNode {
    fn current_concurrency(&self) -> u32 {
        self.concurrency.load(Ordering::SeqCst)
    }

    fn increase_concurrency(&self) {
        let n = self.concurrency.fetch_add(1, Ordering::SeqCst) + 1;
        self.second_arr.update_concurrency(n);
        self.minute_arr.update_concurrency(n);
    }

    fn decrease_concurrency(&self) {
        self.concurrency.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StatNode for StatisticNode {
    fn generate_read_stat(&self, sample_count: u32, interval_ms: u32) -> Result<Arc<dyn ReadStat>> {
        let stat = SlidingWindowMetric::new(sample_count, interval_ms, self.second_arr.clone())?;
        Ok(Arc::new(stat))
    }

    /// Walk forward from `current_time` over the second-resolution window
    /// and return the smallest wait (ms) that would admit `acquire_count`
    /// without exceeding `threshold`; `None` for OCCUPY_NO_WAY.
    fn try_occupy_next(&self, current_time: u64, acquire_count: u32, threshold: f64) -> Option<u64> {
        self.second_arr
            .try_occupy_next(current_time, acquire_count, threshold)
    }

    /// Pre-pledge `count` admissions against the bucket that will be
    /// current at `future_time`, so later lookups of that bucket's
    /// `Pass + OccupiedPass` already reflect the pledge.
    fn add_waiting_request(&self, future_time: u64, count: u32) {
        let _ = self
            .second_arr
            .add_count_with_time(future_time, MetricEvent::OccupiedPass, count as u64);
    }

    /// Record that an occupied-pass admission happened now (bookkeeping
    /// for the `occupiedPassQps` metric).
    fn add_occupied_pass(&self, count: u32) {
        self.second_arr.add_count(MetricEvent::OccupiedPass, count as u64);
    }

    /// Advance `last_occupied_time` monotonically via CAS; returns true
    /// if this call's pledge is the one that ends up recorded (i.e. its
    /// target time was not already exceeded by a concurrent occupant).
    fn update_occupied_time(&self, target_time: i64) -> bool {
        loop {
            let cur = self.last_occupied_time.load(Ordering::SeqCst);
            if cur >= target_time {
                return false;
            }
            if self
                .last_occupied_time
                .compare_exchange(cur, target_time, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return true;
            }
        }
    }
}

/// `minute_metric` accessor used by controllers that want the 1-minute
/// resolution window instead of the default second-resolution one.
impl StatisticNode {
    pub fn minute_metric(&self) -> Arc<SlidingWindowMetric> {
        self.minute_metric.clone()
    }
}
