//! Constant
//!
pub const TOTAL_IN_BOUND_RESOURCE_NAME: &str = "__total_inbound_traffic__";
pub const DEFAULT_MAX_RESOURCE_AMOUNT: u32 = 10000;
pub const DEFAULT_SAMPLE_COUNT: u32 = 2;
pub const DEFAULT_INTERVAL_MS: u32 = 1000;
pub const DEFAULT_SAMPLE_COUNT_TOTAL: u32 = 20;
pub const DEFAULT_INTERVAL_MS_TOTAL: u32 = 10000;
pub const DEFAULT_STATISTIC_MAX_RT: u64 = 60000;
/// minute-resolution window used alongside the default second-resolution window
pub const MINUTE_SAMPLE_COUNT: u32 = 60;
pub const MINUTE_INTERVAL_MS: u32 = 60000;
pub const SLOT_INIT: usize = 8;
/// Set on `SentinelInput::flag` (via `EntryBuilder::with_flag`) to mark a
/// request as prioritized: a `DefaultController` facing a QPS rule may
/// occupy a future statistic window for it rather than rejecting outright.
pub const PRIORITY_FLAG: i32 = 1 << 0;
