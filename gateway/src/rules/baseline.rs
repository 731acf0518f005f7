//! Baseline rule table
//!
//! Payload templates are what an operator console and the VMS bridge expect.
//! Times are rendered in UTC.

use super::{Actions, Rule};
use serde_json::json;
use vahti_core::{ActionTarget, AlarmEvent, DispatchAction, EventType, Severity};

pub(super) const RULES: [Rule; 5] = [
    Rule::new("critical", 1, is_critical, critical_actions),
    Rule::new("fire", 2, is_fire, fire_actions),
    Rule::new("panic", 2, is_panic, panic_actions),
    Rule::new("warning", 3, is_warning, warning_actions),
    Rule::new("restore", 4, is_restore, restore_actions),
];

// ============================================================================
// Predicates
// ============================================================================

fn is_critical(event: &AlarmEvent) -> bool {
    event.severity == Severity::Critical
}

fn is_fire(event: &AlarmEvent) -> bool {
    event.event_type == EventType::Fire
}

fn is_panic(event: &AlarmEvent) -> bool {
    event.event_type == EventType::Panic
}

fn is_warning(event: &AlarmEvent) -> bool {
    event.severity == Severity::Warning
}

fn is_restore(event: &AlarmEvent) -> bool {
    event.event_type == EventType::ZoneRestore
}

// ============================================================================
// Generators
// ============================================================================

type Render = fn(&AlarmEvent) -> String;

/// Critical: open the camera, mail the supervisor, push to the console
const CRITICAL: [(ActionTarget, Render); 3] = [
    (ActionTarget::Vms, vms_open_camera),
    (ActionTarget::Email, critical_email),
    (ActionTarget::WebClient, critical_web_client),
];

fn critical_actions(event: &AlarmEvent) -> Actions<'_> {
    Box::new(
        CRITICAL
            .into_iter()
            .map(move |(target, render)| DispatchAction::new(&event.event_id, target, render(event))),
    )
}

fn fire_actions(event: &AlarmEvent) -> Actions<'_> {
    single(event, ActionTarget::InstantMessage, fire_message)
}

fn panic_actions(event: &AlarmEvent) -> Actions<'_> {
    single(event, ActionTarget::InstantMessage, panic_message)
}

fn warning_actions(event: &AlarmEvent) -> Actions<'_> {
    single(event, ActionTarget::WebClient, warning_web_client)
}

fn restore_actions(event: &AlarmEvent) -> Actions<'_> {
    single(event, ActionTarget::WebClient, restore_web_client)
}

fn single(event: &AlarmEvent, target: ActionTarget, render: Render) -> Actions<'_> {
    Box::new(std::iter::once_with(move || {
        DispatchAction::new(&event.event_id, target, render(event))
    }))
}

// ============================================================================
// Payload templates
// ============================================================================

fn clock(event: &AlarmEvent) -> String {
    event.occurred_at.format("%H:%M:%S").to_string()
}

fn vms_open_camera(event: &AlarmEvent) -> String {
    format!(
        "OPEN_CAM|zone={}|event={}|device={}",
        event.zone, event.event_type, event.source_id
    )
}

fn critical_email(event: &AlarmEvent) -> String {
    format!(
        "[CRITICAL ALERT] {} | Zone: {} | Panel: {} | {}",
        event.description,
        event.zone,
        event.source_id,
        clock(event)
    )
}

fn critical_web_client(event: &AlarmEvent) -> String {
    alert_json(event, Severity::Critical)
}

fn warning_web_client(event: &AlarmEvent) -> String {
    alert_json(event, Severity::Warning)
}

fn alert_json(event: &AlarmEvent, severity: Severity) -> String {
    json!({
        "id": event.event_id,
        "type": event.event_type.as_str(),
        "zone": event.zone,
        "severity": severity.label(),
        "ts": event.occurred_at.to_rfc3339(),
    })
    .to_string()
}

fn restore_web_client(event: &AlarmEvent) -> String {
    json!({
        "id": event.event_id,
        "type": "RESTORE",
        "zone": event.zone,
        "ts": event.occurred_at.to_rfc3339(),
    })
    .to_string()
}

fn fire_message(event: &AlarmEvent) -> String {
    format!(
        "FIRE — {} | {} | {} | VMS opened",
        event.zone,
        event.source_id,
        clock(event)
    )
}

fn panic_message(event: &AlarmEvent) -> String {
    format!("PANIC — {} | {} | {}", event.zone, event.source_id, clock(event))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use vahti_core::SourceKind;

    fn event() -> AlarmEvent {
        AlarmEvent {
            event_id: "01J9ZX".to_string(),
            source_id: "DMP-101".to_string(),
            source_kind: SourceKind::Dmp,
            event_type: EventType::Intrusion,
            severity: Severity::Critical,
            zone: "Area 1 / Zone 01".to_string(),
            description: "Burglary alarm".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2026, 3, 1, 22, 15, 9).unwrap(),
        }
    }

    #[test]
    fn vms_command_names_zone_type_and_device() {
        assert_eq!(
            vms_open_camera(&event()),
            "OPEN_CAM|zone=Area 1 / Zone 01|event=Intrusion|device=DMP-101"
        );
    }

    #[test]
    fn critical_email_carries_description_and_clock() {
        assert_eq!(
            critical_email(&event()),
            "[CRITICAL ALERT] Burglary alarm | Zone: Area 1 / Zone 01 | Panel: DMP-101 | 22:15:09"
        );
    }

    #[test]
    fn web_client_json_fields() {
        let value: serde_json::Value = serde_json::from_str(&critical_web_client(&event())).unwrap();

        assert_eq!(value["id"], "01J9ZX");
        assert_eq!(value["type"], "Intrusion");
        assert_eq!(value["zone"], "Area 1 / Zone 01");
        assert_eq!(value["severity"], "CRITICAL");
        assert!(value["ts"].as_str().unwrap().starts_with("2026-03-01T22:15:09"));
    }

    #[test]
    fn restore_json_has_no_severity() {
        let value: serde_json::Value = serde_json::from_str(&restore_web_client(&event())).unwrap();

        assert_eq!(value["type"], "RESTORE");
        assert!(value.get("severity").is_none());
    }

    #[test]
    fn generators_are_lazy_and_repeatable() {
        let ev = event();
        let first: Vec<DispatchAction> = critical_actions(&ev).collect();
        let second: Vec<DispatchAction> = critical_actions(&ev).collect();

        assert_eq!(first.len(), 3);
        assert_eq!(
            first.iter().map(|a| &a.payload).collect::<Vec<_>>(),
            second.iter().map(|a| &a.payload).collect::<Vec<_>>()
        );
    }

    #[test]
    fn instant_messages_differ_for_fire_and_panic() {
        let ev = event();
        assert_eq!(
            fire_message(&ev),
            "FIRE — Area 1 / Zone 01 | DMP-101 | 22:15:09 | VMS opened"
        );
        assert_eq!(panic_message(&ev), "PANIC — Area 1 / Zone 01 | DMP-101 | 22:15:09");
    }
}
