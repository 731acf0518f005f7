//! Hanwha video analytics decoder
//!
//! ```text
//! HNW|EVT:FIRE_SMOKE|CHANNEL:3|CONF:88|TS:AUTO
//! ```

use super::{Decoder, PayloadFields};
use vahti_core::{AlarmEvent, EventType, RawMessage, Severity, SourceKind};

/// Decoder for Hanwha recorders
#[derive(Debug, Default, Clone, Copy)]
pub struct HanwhaDecoder;

impl HanwhaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for HanwhaDecoder {
    fn name(&self) -> &'static str {
        "hanwha"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Hanwha
    }

    fn decode(&self, raw: &RawMessage) -> AlarmEvent {
        let fields = PayloadFields::parse(&raw.payload);
        let evt = fields.get_or("EVT", "UNKNOWN");
        let channel = fields.get_or("CHANNEL", "?");
        let confidence = fields.get_or("CONF", "0");

        let (event_type, severity) = match evt {
            "FIRE_SMOKE" => (EventType::Fire, Severity::Critical),
            "MOTION" | "LOITERING" => (EventType::Intrusion, Severity::Warning),
            _ => (EventType::Alarm, Severity::Warning),
        };

        AlarmEvent {
            event_id: AlarmEvent::next_id(),
            source_id: raw.source_id.clone(),
            source_kind: raw.source_kind,
            event_type,
            severity,
            zone: format!("Channel {channel}"),
            description: format!("Hanwha: {evt} (confidence: {confidence}%)"),
            occurred_at: raw.received_at,
        }
    }
}
