//! Log record shipped to the daemon

use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute map carried on records, name to value
pub type Attributes = BTreeMap<String, String>;

/// Immutable log record
///
/// Built by [`RecordBuilder`](super::RecordBuilder). Field order matches the
/// JSON payload the daemon expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    #[serde(default)]
    pub(crate) resource_attributes: Attributes,
    #[serde(default)]
    pub(crate) log_attributes: Attributes,
    #[serde(default)]
    pub(crate) trace_id: String,
    #[serde(default)]
    pub(crate) span_id: String,
    pub(crate) severity_text: String,
    pub(crate) service_name: String,
    pub(crate) body: String,
    pub(crate) timestamp: i64,
    #[serde(default)]
    pub(crate) trace_flags: u32,
    pub(crate) severity_number: i32,
}

impl LogRecord {
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn severity_text(&self) -> &str {
        &self.severity_text
    }

    pub fn severity_number(&self) -> i32 {
        self.severity_number
    }

    /// Severity reconstructed from the wire number
    pub fn severity(&self) -> Option<Severity> {
        Severity::from_number(self.severity_number)
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn resource_attributes(&self) -> &Attributes {
        &self.resource_attributes
    }

    pub fn log_attributes(&self) -> &Attributes {
        &self.log_attributes
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn trace_flags(&self) -> u32 {
        self.trace_flags
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Equal in every field except the timestamp
    pub fn same_content(&self, other: &LogRecord) -> bool {
        self.body == other.body
            && self.severity_text == other.severity_text
            && self.severity_number == other.severity_number
            && self.service_name == other.service_name
            && self.resource_attributes == other.resource_attributes
            && self.log_attributes == other.log_attributes
            && self.trace_id == other.trace_id
            && self.span_id == other.span_id
            && self.trace_flags == other.trace_flags
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordBuilder;

    fn sample() -> LogRecord {
        let mut attrs = Attributes::new();
        attrs.insert("user_id".to_string(), "12345".to_string());

        RecordBuilder::new()
            .with_body("Database error")
            .with_severity(Severity::Error)
            .with_service_name("acme-auth-service")
            .with_log_attributes(attrs)
            .with_trace_id("trace-123")
            .with_span_id("span-456")
            .with_trace_flags(1)
            .build()
    }

    #[test]
    fn test_json_field_order() {
        let json = sample().to_json().unwrap();
        let keys = [
            "\"resource_attributes\"",
            "\"log_attributes\"",
            "\"trace_id\"",
            "\"span_id\"",
            "\"severity_text\"",
            "\"service_name\"",
            "\"body\"",
            "\"timestamp\"",
            "\"trace_flags\"",
            "\"severity_number\"",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(k).unwrap_or_else(|| panic!("missing {k}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn test_empty_maps_are_objects() {
        let record = RecordBuilder::new().with_body("x").build();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"resource_attributes\":{}"));
        assert!(json.contains("\"log_attributes\":{}"));
        assert!(json.contains("\"trace_id\":\"\""));
    }

    #[test]
    fn test_json_roundtrip() {
        let record = sample();
        let decoded = LogRecord::from_json(&record.to_json().unwrap()).unwrap();
        assert_eq!(decoded, record);
        assert_eq!(decoded.severity(), Some(Severity::Error));
    }

    #[test]
    fn test_same_content_ignores_timestamp() {
        let a = sample();
        let mut b = a.clone();
        b.timestamp += 10;
        assert!(a.same_content(&b));
        assert_ne!(a, b);

        b.body.push('!');
        assert!(!a.same_content(&b));
    }
}
