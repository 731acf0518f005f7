//! DMP panel decoder
//!
//! DMP panels report SIA-style four digit event codes alongside zone, area
//! and account fields:
//!
//! ```text
//! EVENT|ZONE:01|CODE:1130|ACCT:4521|AREA:1
//! ```

use super::{Decoder, PayloadFields};
use vahti_core::{AlarmEvent, EventType, RawMessage, Severity, SourceKind};

/// Known DMP event codes
const CODES: &[(&str, EventType, Severity, &str)] = &[
    ("1110", EventType::Fire, Severity::Critical, "Fire alarm activated"),
    ("1120", EventType::Panic, Severity::Critical, "Panic button pressed"),
    ("1130", EventType::Intrusion, Severity::Critical, "Intrusion detected in zone"),
    ("1137", EventType::LowBattery, Severity::Warning, "Panel battery low"),
    ("1301", EventType::AcPowerLoss, Severity::Warning, "AC power lost"),
    ("3110", EventType::ZoneRestore, Severity::Info, "Fire zone restored"),
    ("3130", EventType::ZoneRestore, Severity::Info, "Intrusion zone restored"),
];

/// Decoder for DMP panels
#[derive(Debug, Default, Clone, Copy)]
pub struct DmpDecoder;

impl DmpDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for DmpDecoder {
    fn name(&self) -> &'static str {
        "dmp"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Dmp
    }

    fn decode(&self, raw: &RawMessage) -> AlarmEvent {
        let fields = PayloadFields::parse(&raw.payload);
        let zone = fields.get_or("ZONE", "??");
        let code = fields.get_or("CODE", "0000");
        let area = fields.get_or("AREA", "1");

        let (event_type, severity, description) = CODES
            .iter()
            .find(|(known, ..)| *known == code)
            .map(|(_, t, s, d)| (*t, *s, (*d).to_string()))
            .unwrap_or_else(|| {
                (
                    EventType::Alarm,
                    Severity::Warning,
                    format!("Unknown DMP code: {code}"),
                )
            });

        AlarmEvent {
            event_id: AlarmEvent::next_id(),
            source_id: raw.source_id.clone(),
            source_kind: raw.source_kind,
            event_type,
            severity,
            zone: format!("Area {area} / Zone {zone}"),
            description,
            occurred_at: raw.received_at,
        }
    }
}
