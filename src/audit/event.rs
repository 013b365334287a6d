use serde::{Deserialize, Serialize};

/// Severity of an [`AuditEvent`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SecurityLevel {
    Info,
    Warning,
    Error,
    Critical,
}

/// A single entry produced by [`super::Auditor::audit_chain`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: u64,
    pub severity: SecurityLevel,
    pub event_type: String,
    pub message: String,
    pub payload: Option<serde_json::Value>,
}

impl AuditEvent {
    /// `counter` disambiguates events recorded within the same second for
    /// the same `event_type`; the id itself is derived from all of the
    /// event's content via [`crate::hash::event_id`], same `AdNe` scheme
    /// used for addresses and transaction ids.
    pub fn new(
        counter: u64,
        timestamp: u64,
        severity: SecurityLevel,
        event_type: impl Into<String>,
        message: impl Into<String>,
        payload: Option<serde_json::Value>,
    ) -> Self {
        let event_type = event_type.into();
        let message = message.into();
        let seed = format!("{counter}{timestamp}{event_type}{message}");
        let id = crate::hash::event_id(seed.as_bytes());
        Self {
            id,
            timestamp,
            severity,
            event_type,
            message,
            payload,
        }
    }
}
