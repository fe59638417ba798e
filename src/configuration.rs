//! Config for the grader behaviors
//!
//! This module provides the limits and measurement settings used by the
//! [`Evaluator`](crate::evaluator::Evaluator). Each evaluator owns its configuration, so a
//! single process can grade several submissions under different limits.
//!
//! Configuration can be created programmatically using [`Configuration::new()`] or by reading
//! environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Unset or unparsable values keep their default.
//!
//! - `EVAL_TIME_LIMIT`: Hard time limit in seconds, `<= 0` for none (default: `0`)
//! - `EVAL_MEMORY_LIMIT`: Hard memory limit in MB, `<= 0` for none (default: `0`)
//! - `EVAL_SAMPLING_INTERVAL_MS`: Memory sampling interval, at least `1` (default: `100`)
//! - `EVAL_JOIN_TIMEOUT_MS`: How long to wait for the memory monitor to stop (default: `1000`)
//! - `EVAL_TIER_MEMORY_MB`: Memory allowed for the intermediate tier (default: `1`)
//! - `EVAL_LOG`: Set to `"true"` to write logs to a file (default: `false`)

use std::time::Duration;

const MIN_SAMPLING_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for grader behaviors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    pub(crate) time_limit: f64,
    pub(crate) memory_limit: f64,
    pub(crate) sampling_interval: Duration,
    pub(crate) join_timeout: Duration,
    pub(crate) intermediate_memory_mb: f64,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Neither time nor memory is limited.
    /// - Memory is sampled every 100ms.
    /// - The memory monitor gets one second to stop.
    /// - The intermediate tier requires at most 1MB.
    /// - Logging to file is disabled.
    pub fn new() -> Self {
        Self {
            time_limit: 0.0,
            memory_limit: 0.0,
            sampling_interval: Duration::from_millis(100),
            join_timeout: Duration::from_secs(1),
            intermediate_memory_mb: 1.0,
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// See the [module documentation](self) for the recognized variables.
    pub fn from_env() -> Self {
        fn parse<T: std::str::FromStr>(var: &str) -> Option<T> {
            std::env::var(var).ok()?.trim().parse().ok()
        }

        let default = Self::new();
        Self {
            time_limit: parse("EVAL_TIME_LIMIT").unwrap_or(default.time_limit),
            memory_limit: parse("EVAL_MEMORY_LIMIT").unwrap_or(default.memory_limit),
            sampling_interval: parse("EVAL_SAMPLING_INTERVAL_MS")
                .map(Duration::from_millis)
                .map(|interval| interval.max(MIN_SAMPLING_INTERVAL))
                .unwrap_or(default.sampling_interval),
            join_timeout: parse("EVAL_JOIN_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.join_timeout),
            intermediate_memory_mb: parse("EVAL_TIER_MEMORY_MB")
                .unwrap_or(default.intermediate_memory_mb),
            log: std::env::var("EVAL_LOG")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(default.log),
        }
    }

    /// Set the hard time limit, in seconds. Zero or negative disables it.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = seconds;
        self
    }

    /// Set the hard memory limit, in megabytes. Zero or negative disables it.
    pub fn with_memory_limit(mut self, megabytes: f64) -> Self {
        self.memory_limit = megabytes;
        self
    }

    /// Set the interval between two memory samples, raised to 1ms if shorter.
    pub fn with_sampling_interval(mut self, interval: Duration) -> Self {
        self.sampling_interval = interval.max(MIN_SAMPLING_INTERVAL);
        self
    }

    /// Set how long to wait for the memory monitor once the search returned.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Set the memory (in MB) a candidate may use to reach the intermediate tier.
    pub fn with_intermediate_memory(mut self, megabytes: f64) -> Self {
        self.intermediate_memory_mb = megabytes;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// True if `time` seconds goes over the time limit.
    pub(crate) fn exceeds_time(&self, time: f64) -> bool {
        self.time_limit > 0.0 && time > self.time_limit
    }

    /// True if `memory` megabytes goes over the memory limit.
    pub(crate) fn exceeds_memory(&self, memory: f64) -> bool {
        self.memory_limit > 0.0 && memory > self.memory_limit
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
