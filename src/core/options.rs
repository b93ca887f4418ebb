//! Logger configuration

use super::error::{LoggerError, Result};
use super::log_record::Attributes;
use super::retry::RetryPolicy;
use super::severity::Severity;
use super::timestamp::TimestampPrecision;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Socket the daemon listens on unless configured otherwise
pub const DEFAULT_SOCKET_ADDRESS: &str = "/tmp/olympus_socket.sock";

/// Options for [`Logger`](super::Logger)
///
/// Every field has a default except `service_name`, which must be set.
///
/// # Example
///
/// ```
/// use evenscribe::{Options, Severity};
///
/// let options = Options::new()
///     .with_service_name("acme-auth-service")
///     .with_resource_attribute("environment", "production")
///     .with_default_severity(Severity::Debug)
///     .with_number_of_workers(4)
///     .with_print_to_stdout(false);
///
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Retries per record after the first attempt
    pub retry_count: u32,
    /// Per-send deadline in milliseconds
    pub max_execution_time_ms: u64,
    /// Unix socket path, `unix://path` or `tcp://host:port`
    pub socket_address: String,
    /// Name of the emitting service, e.g. `"acme-auth-service"`
    pub service_name: String,
    /// Static metadata attached to every record
    pub resource_attributes: Attributes,
    /// Severity used when a call does not name one
    pub default_severity: Severity,
    /// Mirror every message through the `log` facade
    pub print_to_stdout: bool,
    /// Fixed size of the worker pool
    pub number_of_workers: usize,
    /// Read the daemon's acknowledgement after every frame
    pub wait_for_ack: bool,
    /// Bound on buffered records; `None` keeps the channel unbounded
    pub queue_capacity: Option<usize>,
    /// Granularity of record timestamps
    pub timestamp_precision: TimestampPrecision,
    /// Pause before the first retry, in milliseconds
    pub retry_backoff_ms: u64,
    /// Upper bound of the pause between retries, in milliseconds
    pub retry_backoff_cap_ms: u64,
    /// How long dropping the logger waits for buffered records
    pub drain_timeout_ms: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            retry_count: 5,
            max_execution_time_ms: 1000,
            socket_address: DEFAULT_SOCKET_ADDRESS.to_string(),
            service_name: String::new(),
            resource_attributes: Attributes::new(),
            default_severity: Severity::Info,
            print_to_stdout: true,
            number_of_workers: 1,
            wait_for_ack: false,
            queue_capacity: None,
            timestamp_precision: TimestampPrecision::Nanoseconds,
            retry_backoff_ms: 10,
            retry_backoff_cap_ms: 250,
            drain_timeout_ms: 5000,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    #[must_use]
    pub fn with_max_execution_time_ms(mut self, millis: u64) -> Self {
        self.max_execution_time_ms = millis;
        self
    }

    #[must_use]
    pub fn with_socket_address(mut self, address: impl Into<String>) -> Self {
        self.socket_address = address.into();
        self
    }

    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    #[must_use]
    pub fn with_resource_attributes(mut self, attributes: Attributes) -> Self {
        self.resource_attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_resource_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resource_attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_default_severity(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    #[must_use]
    pub fn with_print_to_stdout(mut self, print_to_stdout: bool) -> Self {
        self.print_to_stdout = print_to_stdout;
        self
    }

    #[must_use]
    pub fn with_number_of_workers(mut self, workers: usize) -> Self {
        self.number_of_workers = workers;
        self
    }

    #[must_use]
    pub fn with_wait_for_ack(mut self, wait_for_ack: bool) -> Self {
        self.wait_for_ack = wait_for_ack;
        self
    }

    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: Option<usize>) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_timestamp_precision(mut self, precision: TimestampPrecision) -> Self {
        self.timestamp_precision = precision;
        self
    }

    #[must_use]
    pub fn with_retry_backoff_ms(mut self, base_ms: u64, cap_ms: u64) -> Self {
        self.retry_backoff_ms = base_ms;
        self.retry_backoff_cap_ms = cap_ms;
        self
    }

    #[must_use]
    pub fn with_drain_timeout_ms(mut self, millis: u64) -> Self {
        self.drain_timeout_ms = millis;
        self
    }

    pub fn max_execution_time(&self) -> Duration {
        Duration::from_millis(self.max_execution_time_ms)
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }

    /// Retry policy the workers run with
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count)
            .with_ack(self.wait_for_ack)
            .with_backoff(
                Duration::from_millis(self.retry_backoff_ms),
                Duration::from_millis(self.retry_backoff_cap_ms),
            )
    }

    /// Check the options before any connection is attempted
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(LoggerError::config("Options", "service_name is required"));
        }
        if self.number_of_workers == 0 {
            return Err(LoggerError::config(
                "Options",
                "number_of_workers must be at least 1",
            ));
        }
        if self.socket_address.trim().is_empty() {
            return Err(LoggerError::config("Options", "socket_address is empty"));
        }
        if self.retry_backoff_ms > self.retry_backoff_cap_ms {
            return Err(LoggerError::config(
                "Options",
                "retry_backoff_ms must not exceed retry_backoff_cap_ms",
            ));
        }
        Ok(())
    }
}
