//! Fluent construction of log records
//!
//! [`RecordBuilder`] assembles a [`LogRecord`] from a message, a severity,
//! service metadata and optional correlation fields. Structured arguments
//! come in two shapes: the typed [`LogArgs`], and the loosely typed
//! [`RecordBuilder::with_args`] that accepts alternating key/value pairs.

use super::log_record::{Attributes, LogRecord};
use super::severity::Severity;
use super::timestamp::TimestampPrecision;
use std::collections::HashMap;

/// Key recognized by [`RecordBuilder::with_args`] for log attributes
pub const ARG_LOG_ATTRIBUTES: &str = "log-attributes";
/// Key recognized by [`RecordBuilder::with_args`] for the trace id
pub const ARG_TRACE_ID: &str = "trace-id";
/// Key recognized by [`RecordBuilder::with_args`] for the span id
pub const ARG_SPAN_ID: &str = "span-id";
/// Key recognized by [`RecordBuilder::with_args`] for trace flags
pub const ARG_TRACE_FLAGS: &str = "trace-flags";

/// One element of an untyped argument list
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Attributes(Attributes),
    Flags(u32),
    Int(i64),
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::Str(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::Str(v)
    }
}

impl From<Attributes> for ArgValue {
    fn from(v: Attributes) -> Self {
        ArgValue::Attributes(v)
    }
}

impl From<HashMap<String, String>> for ArgValue {
    fn from(v: HashMap<String, String>) -> Self {
        ArgValue::Attributes(v.into_iter().collect())
    }
}

impl From<u32> for ArgValue {
    fn from(v: u32) -> Self {
        ArgValue::Flags(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

/// Typed structured arguments for a logging call
///
/// # Example
///
/// ```
/// use evenscribe::core::LogArgs;
///
/// let args = LogArgs::new()
///     .log_attribute("user_id", "12345")
///     .trace_id("4bf92f3577b34da6a3ce929d0e0e4736")
///     .span_id("00f067aa0ba902b7")
///     .trace_flags(1);
/// assert_eq!(args.log_attributes.unwrap()["user_id"], "12345");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogArgs {
    pub log_attributes: Option<Attributes>,
    pub trace_id: Option<String>,
    pub span_id: Option<String>,
    pub trace_flags: Option<u32>,
}

impl LogArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one log attribute
    #[must_use]
    pub fn log_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.log_attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the log attributes
    #[must_use]
    pub fn log_attributes(mut self, attributes: Attributes) -> Self {
        self.log_attributes = Some(attributes);
        self
    }

    #[must_use]
    pub fn trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    #[must_use]
    pub fn span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = Some(span_id.into());
        self
    }

    #[must_use]
    pub fn trace_flags(mut self, trace_flags: u32) -> Self {
        self.trace_flags = Some(trace_flags);
        self
    }
}

/// Builder for [`LogRecord`]s
///
/// # Example
///
/// ```
/// use evenscribe::core::{RecordBuilder, Severity};
///
/// let record = RecordBuilder::new()
///     .with_body("Request processed")
///     .with_severity(Severity::Info2)
///     .with_service_name("acme-auth-service")
///     .with_trace_id("trace-123")
///     .build();
///
/// assert_eq!(record.severity_text(), "INFO");
/// assert_eq!(record.severity_number(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBuilder {
    body: String,
    severity: Severity,
    service_name: String,
    resource_attributes: Attributes,
    log_attributes: Attributes,
    trace_id: String,
    span_id: String,
    trace_flags: u32,
    precision: TimestampPrecision,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            body: String::new(),
            severity: Severity::default(),
            service_name: String::new(),
            resource_attributes: Attributes::new(),
            log_attributes: Attributes::new(),
            trace_id: String::new(),
            span_id: String::new(),
            trace_flags: 0,
            precision: TimestampPrecision::default(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
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
    pub fn with_log_attributes(mut self, attributes: Attributes) -> Self {
        self.log_attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    #[must_use]
    pub fn with_span_id(mut self, span_id: impl Into<String>) -> Self {
        self.span_id = span_id.into();
        self
    }

    #[must_use]
    pub fn with_trace_flags(mut self, trace_flags: u32) -> Self {
        self.trace_flags = trace_flags;
        self
    }

    #[must_use]
    pub fn with_timestamp_precision(mut self, precision: TimestampPrecision) -> Self {
        self.precision = precision;
        self
    }

    /// Apply typed structured arguments; unset fields are left alone
    #[must_use]
    pub fn with_log_args(mut self, args: LogArgs) -> Self {
        if let Some(attributes) = args.log_attributes {
            self.log_attributes = attributes;
        }
        if let Some(trace_id) = args.trace_id {
            self.trace_id = trace_id;
        }
        if let Some(span_id) = args.span_id {
            self.span_id = span_id;
        }
        if let Some(trace_flags) = args.trace_flags {
            self.trace_flags = trace_flags;
        }
        self
    }

    /// Apply alternating key/value arguments
    ///
    /// Recognized keys are `"log-attributes"`, `"trace-id"`, `"span-id"` and
    /// `"trace-flags"`. An odd-length list is ignored as a whole. A pair whose
    /// key is not a string, whose key is unknown, or whose value has the
    /// wrong type is skipped.
    ///
    /// ```
    /// use evenscribe::core::{ArgValue, RecordBuilder};
    ///
    /// let record = RecordBuilder::new()
    ///     .with_args(vec![
    ///         ArgValue::from("trace-id"),
    ///         ArgValue::from("abc"),
    ///         ArgValue::from("span-id"),
    ///         ArgValue::from(11111_i64), // wrong type, skipped
    ///     ])
    ///     .build();
    ///
    /// assert_eq!(record.trace_id(), "abc");
    /// assert_eq!(record.span_id(), "");
    /// ```
    #[must_use]
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = ArgValue>,
    {
        let args: Vec<ArgValue> = args.into_iter().collect();
        if args.len() % 2 != 0 {
            return self;
        }

        for pair in args.chunks_exact(2) {
            let ArgValue::Str(key) = &pair[0] else {
                continue;
            };
            match (key.as_str(), &pair[1]) {
                (ARG_LOG_ATTRIBUTES, ArgValue::Attributes(attributes)) => {
                    self.log_attributes = attributes.clone();
                }
                (ARG_TRACE_ID, ArgValue::Str(trace_id)) => {
                    self.trace_id = trace_id.clone();
                }
                (ARG_SPAN_ID, ArgValue::Str(span_id)) => {
                    self.span_id = span_id.clone();
                }
                (ARG_TRACE_FLAGS, ArgValue::Flags(flags)) => {
                    self.trace_flags = *flags;
                }
                _ => continue,
            }
        }
        self
    }

    /// Stamp the current time and produce a record
    pub fn build(&self) -> LogRecord {
        let (severity_text, severity_number) = self.severity.text_and_number();
        LogRecord {
            resource_attributes: self.resource_attributes.clone(),
            log_attributes: self.log_attributes.clone(),
            trace_id: self.trace_id.clone(),
            span_id: self.span_id.clone(),
            severity_text: severity_text.to_string(),
            service_name: self.service_name.clone(),
            body: self.body.clone(),
            timestamp: self.precision.now(),
            trace_flags: self.trace_flags,
            severity_number,
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
