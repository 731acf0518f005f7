//! Canonical alarm-event model
//!
//! Everything that flows through the pipeline is one of these types:
//!
//! ```text
//! RawMessage ──► AlarmEvent ──► Vec<DispatchAction> ──► Vec<DispatchLog>
//!  (source)       (decoder)        (rule set)            (channel router)
//! ```
//!
//! All of them are immutable once built. Timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Manufacturer family a source speaks
///
/// Decoders are looked up by this key, so adding a manufacturer means adding
/// a variant here and registering a decoder for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceKind {
    Dmp,
    Axis,
    Hanwha,
}

impl SourceKind {
    /// Every known manufacturer
    pub const ALL: [SourceKind; 3] = [SourceKind::Dmp, SourceKind::Axis, SourceKind::Hanwha];

    /// Manufacturer identifier as used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Dmp => "DMP",
            SourceKind::Axis => "AXIS",
            SourceKind::Hanwha => "HANWHA",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a manufacturer identifier is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown manufacturer '{0}'")]
pub struct UnknownSourceKind(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    /// Case-insensitive: `"dmp"`, `"Dmp"` and `"DMP"` are the same kind.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSourceKind(s.to_string()))
    }
}

/// Raw telemetry exactly as a source delivered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Device or panel identifier (e.g. "DMP-451")
    pub source_id: String,
    /// Manufacturer family, selects the decoder
    pub source_kind: SourceKind,
    /// Opaque payload, grammar owned by the decoder
    pub payload: String,
    pub received_at: DateTime<Utc>,
}

impl RawMessage {
    /// Create a raw message stamped with the current time
    pub fn new(
        source_id: impl Into<String>,
        source_kind: SourceKind,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_kind,
            payload: payload.into(),
            received_at: Utc::now(),
        }
    }
}

/// What happened at the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Intrusion,
    Fire,
    Tamper,
    LowBattery,
    AcPowerLoss,
    ZoneRestore,
    /// Generic alarm, used for codes a decoder does not recognise
    Alarm,
    Panic,
    Medical,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Intrusion => "Intrusion",
            EventType::Fire => "Fire",
            EventType::Tamper => "Tamper",
            EventType::LowBattery => "LowBattery",
            EventType::AcPowerLoss => "AcPowerLoss",
            EventType::ZoneRestore => "ZoneRestore",
            EventType::Alarm => "Alarm",
            EventType::Panic => "Panic",
            EventType::Medical => "Medical",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event severity, ordered `Info < Warning < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Upper-case label used in notification payloads
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical alarm event produced by a decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEvent {
    /// Unique per decode call (ULID)
    pub event_id: String,
    pub source_id: String,
    pub source_kind: SourceKind,
    pub event_type: EventType,
    pub severity: Severity,
    pub zone: String,
    pub description: String,
    /// Passed through from [`RawMessage::received_at`]
    pub occurred_at: DateTime<Utc>,
}

impl AlarmEvent {
    /// Generate a fresh event identifier
    pub fn next_id() -> String {
        ulid::Ulid::new().to_string()
    }
}

/// Notification channel an action is addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTarget {
    WebClient,
    Vms,
    Email,
    InstantMessage,
}

impl ActionTarget {
    pub const ALL: [ActionTarget; 4] = [
        ActionTarget::WebClient,
        ActionTarget::Vms,
        ActionTarget::Email,
        ActionTarget::InstantMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionTarget::WebClient => "web_client",
            ActionTarget::Vms => "vms",
            ActionTarget::Email => "email",
            ActionTarget::InstantMessage => "instant_message",
        }
    }
}

impl fmt::Display for ActionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something a rule decided should be sent somewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchAction {
    pub event_id: String,
    pub target: ActionTarget,
    pub payload: String,
    pub scheduled_at: DateTime<Utc>,
}

impl DispatchAction {
    /// Create an action scheduled now
    pub fn new(event_id: impl Into<String>, target: ActionTarget, payload: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            target,
            payload: payload.into(),
            scheduled_at: Utc::now(),
        }
    }
}

/// Outcome of one attempted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchLog {
    pub event_id: String,
    pub target: ActionTarget,
    pub summary: String,
    pub success: bool,
    pub executed_at: DateTime<Utc>,
}

impl DispatchLog {
    /// Successful delivery of `action`
    pub fn delivered(action: &DispatchAction, summary: impl Into<String>) -> Self {
        Self {
            event_id: action.event_id.clone(),
            target: action.target,
            summary: summary.into(),
            success: true,
            executed_at: Utc::now(),
        }
    }

    /// Failed delivery of `action`; summary is `ERROR: <cause>`
    pub fn failed(action: &DispatchAction, cause: impl fmt::Display) -> Self {
        Self {
            event_id: action.event_id.clone(),
            target: action.target,
            summary: format!("ERROR: {cause}"),
            success: false,
            executed_at: Utc::now(),
        }
    }
}
