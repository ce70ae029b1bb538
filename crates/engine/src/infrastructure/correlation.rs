//! Correlation IDs tie the log lines of one registration together.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header a client may use to pass its own correlation ID.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse the client's ID when it sent a valid one, otherwise mint a new one.
    pub fn from_header(value: Option<&str>) -> Self {
        value
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(Self)
            .unwrap_or_default()
    }

    /// First 8 characters, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(CorrelationId::new(), CorrelationId::new());
    }

    #[test]
    fn short_form_is_8_chars() {
        assert_eq!(CorrelationId::new().short().len(), 8);
    }

    #[test]
    fn header_value_is_reused() {
        let raw = "6f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b";
        let id = CorrelationId::from_header(Some(raw));
        assert_eq!(id.to_string(), raw);
        assert_eq!(id.short(), "6f1c2a3b");
    }

    #[test]
    fn garbage_header_gets_fresh_id() {
        let id = CorrelationId::from_header(Some("not-a-uuid"));
        assert_eq!(id.to_string().len(), 36);
        assert_ne!(id, CorrelationId::from_header(None));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CorrelationId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: CorrelationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
