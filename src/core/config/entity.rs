use super::constant::*;
use crate::{
    base::{check_validity_for_reuse_statistic, constant::*, ResourceType},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug)]
pub struct AppConfig {
    /// app_name represents the name of the current running service.
    pub app_name: String,
    /// app_type indicates the resource_type of the service (e.g. web service, API gateway).
    pub app_type: ResourceType,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            app_name: DEFAULT_APP_NAME.into(),
            app_type: DEFAULT_APP_TYPE.into(),
        }
    }
}

/// LogConfig represents the logging configuration.
#[derive(Serialize, Deserialize, Debug)]
pub struct LogConfig {
    /// config_file is the log4rs configuration file path, used only when
    /// built with the `logger_log4rs` feature.
    pub config_file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            config_file: LOG_CONFIG_FILE.into(),
        }
    }
}

/// StatConfig represents configuration items related to statistics.
#[derive(Serialize, Deserialize, Debug)]
pub struct StatConfig {
    /// sample_count_total and interval_ms_total describe the per-resource
    /// global default second-resolution sliding window.
    pub sample_count_total: u32,
    pub interval_ms_total: u32,
    /// sample_count and interval_ms describe the per-resource default
    /// read-only metric statistic. This must be reusable based on the
    /// global statistic (see `check_validity_for_reuse_statistic`).
    pub sample_count: u32,
    pub interval_ms: u32,
    /// minute-resolution counterparts of the window above, used by
    /// `StatisticNode` for longer-horizon aggregation.
    pub minute_sample_count: u32,
    pub minute_interval_ms: u32,
}

impl Default for StatConfig {
    fn default() -> Self {
        StatConfig {
            sample_count_total: DEFAULT_SAMPLE_COUNT_TOTAL,
            interval_ms_total: DEFAULT_INTERVAL_MS_TOTAL,
            sample_count: DEFAULT_SAMPLE_COUNT,
            interval_ms: DEFAULT_INTERVAL_MS,
            minute_sample_count: MINUTE_SAMPLE_COUNT,
            minute_interval_ms: MINUTE_INTERVAL_MS,
        }
    }
}

/// SentinelConfig represents the general configuration of the engine.
#[derive(Serialize, Deserialize, Debug)]
pub struct SentinelConfig {
    pub app: AppConfig,
    pub log: LogConfig,
    pub stat: StatConfig,
    /// use_cache_time indicates whether to use the background ticker that
    /// caches the current time instead of calling the clock on every read.
    pub use_cache_time: bool,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        SentinelConfig {
            use_cache_time: true,
            app: AppConfig::default(),
            log: LogConfig::default(),
            stat: StatConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigEntity {
    pub version: String,
    pub config: SentinelConfig,
}

impl Default for ConfigEntity {
    fn default() -> Self {
        ConfigEntity {
            version: SENTINEL_VERSION.into(),
            config: SentinelConfig::default(),
        }
    }
}

impl ConfigEntity {
    pub fn new() -> Self {
        ConfigEntity::default()
    }

    pub fn check(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(Error::msg("empty version"));
        }
        if self.config.app.app_name.is_empty() {
            return Err(Error::msg("empty app name"));
        }
        check_validity_for_reuse_statistic(
            self.config.stat.sample_count,
            self.config.stat.interval_ms,
            self.config.stat.sample_count_total,
            self.config.stat.interval_ms_total,
        )?;
        check_validity_for_reuse_statistic(
            self.config.stat.minute_sample_count,
            self.config.stat.minute_interval_ms,
            self.config.stat.minute_sample_count,
            self.config.stat.minute_interval_ms,
        )?;
        Ok(())
    }
}

impl fmt::Display for ConfigEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmtted = serde_json::to_string_pretty(self).unwrap();
        write!(f, "{}", fmtted)
    }
}
