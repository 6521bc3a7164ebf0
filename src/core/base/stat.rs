//! Stat
//!
use super::MetricItemRetriever;
use crate::{Error, Result};
use enum_map::Enum;
use lazy_static::lazy_static;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

pub type TimePredicate = dyn Fn(u64) -> bool + Send + Sync;

/// MetricEvent is the kind of counter tracked by a bucket. `OccupiedPass`
/// is the count of requests admitted by pre-occupying a future window
/// (see `tryOccupyNext`); it is tallied separately from `Pass` so the
/// occupancy accounting can be undone independently of ordinary passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum MetricEvent {
    Pass,
    Block,
    Complete,
    Error,
    Rt,
    OccupiedPass,
}

lazy_static! {
    pub static ref NOP_READ_STAT: Arc<Mutex<NopReadStat>> = Arc::new(Mutex::new(NopReadStat {}));
    pub static ref NOP_WRITE_STAT: Arc<Mutex<NopWriteStat>> = Arc::new(Mutex::new(NopWriteStat {}));
}

pub trait ReadStat: Debug + Send + Sync {
    fn qps(&self, _event: MetricEvent) -> f64 {
        0.0
    }
    fn qps_previous(&self, _event: MetricEvent) -> f64 {
        0.0
    }
    fn sum(&self, _event: MetricEvent) -> u64 {
        0
    }
    fn min_rt(&self) -> f64 {
        0.0
    }
    fn avg_rt(&self) -> f64 {
        0.0
    }
}

pub trait WriteStat: Debug + Send + Sync {
    fn add_count(&self, _event: MetricEvent, _count: u64) {}
}

pub trait ConcurrencyStat: Send + Sync {
    fn current_concurrency(&self) -> u32 {
        0
    }
    fn increase_concurrency(&self) {}
    fn decrease_concurrency(&self) {}
}

#[derive(Debug)]
pub struct NopReadStat {}
impl ReadStat for NopReadStat {}

#[derive(Debug)]
pub struct NopWriteStat {}
impl WriteStat for NopWriteStat {}

pub fn nop_read_stat() -> Arc<dyn ReadStat> {
    Arc::new(NopReadStat {})
}

pub fn nop_write_stat() -> Arc<dyn WriteStat> {
    Arc::new(NopWriteStat {})
}

pub trait StatNode:
    ReadStat + WriteStat + ConcurrencyStat + MetricItemRetriever + Debug + Send + Sync
{
    fn generate_read_stat(
        &self,
        _sample_count: u32,
        _interval_ms: u32,
    ) -> Result<Arc<dyn ReadStat>> {
        Err(Error::msg(ILLEGAL_STATISTIC_PARAMS_ERROR))
    }

    /// Walk forward from `current_time` and return the smallest wait (ms)
    /// that would admit `acquire_count` without exceeding `threshold`;
    /// `None` when no such bucket exists within the horizon. Nodes that
    /// don't keep occupy-future state (e.g. test doubles) stay at `None`.
    fn try_occupy_next(&self, _current_time: u64, _acquire_count: u32, _threshold: f64) -> Option<u64> {
        None
    }

    /// Pre-pledge `count` admissions against the bucket that will be
    /// current at `future_time`.
    fn add_waiting_request(&self, _future_time: u64, _count: u32) {}

    /// Record that an occupied-pass admission happened now.
    fn add_occupied_pass(&self, _count: u32) {}

    /// Advance the node's `last_occupied_time` monotonically; returns
    /// true if this call's pledge is the one that ends up recorded.
    fn update_occupied_time(&self, _target_time: i64) -> bool {
        false
    }
}

pub const ILLEGAL_GLOBAL_STATISTIC_PARAMS_ERROR: &str =
    "invalid parameters, sample_count or interval_ms, for the global statistic";
pub const ILLEGAL_STATISTIC_PARAMS_ERROR: &str =
    "invalid parameters, sample_count or interval_ms, for the statistic";
pub const GLOBAL_STATISTIC_NON_REUSABLE_ERROR: &str =
    "the parameters, sample_count and interval_ms, mismatch for reusing the global statistic";

pub fn check_validity_for_statistic(sample_count: u32, interval_ms: u32) -> Result<()> {
    if interval_ms == 0 || sample_count == 0 || interval_ms % sample_count != 0 {
        return Err(Error::msg(ILLEGAL_STATISTIC_PARAMS_ERROR));
    }
    Ok(())
}

pub fn check_validity_for_reuse_statistic(
    sample_count: u32,
    interval_ms: u32,
    global_sample_count: u32,
    global_interval_ms: u32,
) -> Result<()> {
    check_validity_for_statistic(sample_count, interval_ms)?;
    if global_interval_ms == 0
        || global_sample_count == 0
        || global_interval_ms % global_sample_count != 0
    {
        return Err(Error::msg(ILLEGAL_GLOBAL_STATISTIC_PARAMS_ERROR));
    }
    let bucket_length_ms = interval_ms / sample_count;
    let global_bucket_length_ms = global_interval_ms / global_sample_count;
    if bucket_length_ms < global_bucket_length_ms || interval_ms > global_interval_ms {
        return Err(Error::msg(GLOBAL_STATISTIC_NON_REUSABLE_ERROR));
    }
    if bucket_length_ms % global_bucket_length_ms != 0 {
        return Err(Error::msg(GLOBAL_STATISTIC_NON_REUSABLE_ERROR));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_statistic_params() {
        assert!(check_validity_for_statistic(2, 1000).is_ok());
        assert!(check_validity_for_statistic(0, 1000).is_err());
        assert!(check_validity_for_statistic(3, 1000).is_err());
    }

    #[test]
    fn valid_reuse_params() {
        assert!(check_validity_for_reuse_statistic(2, 1000, 20, 10000).is_ok());
        assert!(check_validity_for_reuse_statistic(2, 20000, 20, 10000).is_err());
    }
}
