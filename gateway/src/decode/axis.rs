//! Axis camera decoder
//!
//! ```text
//! AXIS|TYP:FIRE|ZONE:A1|SEV:HIGH|CAM:CH01
//! ```

use super::{Decoder, PayloadFields};
use vahti_core::{AlarmEvent, EventType, RawMessage, Severity, SourceKind};

/// Decoder for Axis cameras
#[derive(Debug, Default, Clone, Copy)]
pub struct AxisDecoder;

impl AxisDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for AxisDecoder {
    fn name(&self) -> &'static str {
        "axis"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Axis
    }

    fn decode(&self, raw: &RawMessage) -> AlarmEvent {
        let fields = PayloadFields::parse(&raw.payload);
        let typ = fields.get_or("TYP", "UNKNOWN");
        let zone = fields.get_or("ZONE", "??");
        let sev = fields.get_or("SEV", "LOW");

        let event_type = match typ {
            "FIRE" => Some(EventType::Fire),
            "TAMPER" => Some(EventType::Tamper),
            "INTRUSION" => Some(EventType::Intrusion),
            "MEDICAL" => Some(EventType::Medical),
            _ => None,
        };

        let (event_type, severity) = match event_type {
            Some(event_type) => {
                let severity = match sev {
                    "HIGH" => Severity::Critical,
                    "MEDIUM" => Severity::Warning,
                    _ => Severity::Info,
                };
                (event_type, severity)
            }
            // Unrecognised analytics type: low-confidence classification,
            // whatever severity the camera claimed.
            None => (EventType::Alarm, Severity::Warning),
        };

        AlarmEvent {
            event_id: AlarmEvent::next_id(),
            source_id: raw.source_id.clone(),
            source_kind: raw.source_kind,
            event_type,
            severity,
            zone: format!("Zone {zone}"),
            description: format!("AXIS: {typ} detected in {zone}"),
            occurred_at: raw.received_at,
        }
    }
}
