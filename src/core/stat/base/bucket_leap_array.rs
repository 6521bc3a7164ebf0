use super::{LeapArray, MetricBucket};
use crate::base::{MetricEvent, WriteStat, DEFAULT_STATISTIC_MAX_RT};
use crate::utils::curr_time_millis;
use crate::Result;
use std::cmp;

/// a specialization of `LeapArray<T>` with `MetricBucket`
pub type BucketLeapArray = LeapArray<MetricBucket>;

impl WriteStat for BucketLeapArray {
    fn add_count(&self, event: MetricEvent, count: u64) {
        self.add_count_with_time(curr_time_millis(), event, count)
            .unwrap();
    }

    fn update_concurrency(&self, concurrency: u32) {
        self.update_concurrency_with_time(curr_time_millis(), concurrency)
            .unwrap();
    }
}

impl BucketLeapArray {
    pub fn add_count_with_time(&self, now: u64, event: MetricEvent, count: u64) -> Result<()> {
        let bucket = self.get_bucket_of_time(now)?;
        bucket.value().add(event, count);
        Ok(())
    }

    pub fn update_concurrency_with_time(&self, now: u64, concurrency: u32) -> Result<()> {
        let bucket = self.get_bucket_of_time(now)?;
        bucket.value().update_concurrency(concurrency);
        Ok(())
    }

    pub fn count(&self, event: MetricEvent) -> u64 {
        self.count_with_time(curr_time_millis(), event)
    }

    pub fn count_with_time(&self, now: u64, event: MetricEvent) -> u64 {
        let mut res = 0;
        let buckets = self.get_valid_values(now);
        for b in buckets {
            res += b.value().get(event);
        }
        res
    }

    pub fn min_rt(&self) -> u64 {
        let mut res = DEFAULT_STATISTIC_MAX_RT;
        let buckets = self.get_current_values();
        for b in buckets {
            res = cmp::min(res, b.value().min_rt());
        }
        res
    }

    pub fn max_concurrency(&self) -> u32 {
        let mut res = 0;
        let buckets = self.get_current_values();
        for b in buckets {
            res = cmp::max(res, b.value().max_concurrency());
        }
        res
    }

    /// Sum of admitted traffic (`Pass` plus already-pledged `OccupiedPass`)
    /// counted within the bucket that starts at `bucket_start`.
    fn occupied_count_of_bucket(&self, bucket_start: u64) -> Result<u64> {
        let bucket = self.get_bucket_of_time(bucket_start)?;
        if bucket.start_stamp() != bucket_start {
            // bucket has rolled past; nothing is pledged there yet
            return Ok(0);
        }
        Ok(bucket.value().get(MetricEvent::Pass) + bucket.value().get(MetricEvent::OccupiedPass))
    }

    /// Walk forward bucket-by-bucket from `current_time` and find the
    /// smallest wait (in ms) such that admitting `acquire_count` more
    /// requests at `current_time + wait` would not push the bucket's
    /// admitted total over `threshold`. Returns `None` (OCCUPY_NO_WAY)
    /// if no bucket within one full interval satisfies this.
    pub fn try_occupy_next(
        &self,
        current_time: u64,
        acquire_count: u32,
        threshold: f64,
    ) -> Option<u64> {
        let bucket_len_ms = self.bucket_len_ms as u64;
        let cur_start = self.calculate_start_stamp(current_time);
        for step in 0..self.sample_count as u64 {
            let bucket_start = cur_start + step * bucket_len_ms;
            let occupied = self.occupied_count_of_bucket(bucket_start).unwrap_or(0);
            if (occupied + acquire_count as u64) as f64 <= threshold {
                return Some(bucket_start + bucket_len_ms - current_time);
            }
        }
        None
    }
}
