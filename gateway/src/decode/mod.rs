//! Decoder system for VAHTI
//!
//! Decoders turn a manufacturer's raw payload into a canonical [`AlarmEvent`].
//! Each manufacturer family registers exactly one decoder.
//!
//! # Architecture
//!
//! ```text
//! RawMessage ──► Decoder ──► AlarmEvent
//!                (lookup by SourceKind)
//! ```
//!
//! # Payload grammar
//!
//! All built-in families use `|`-separated `KEY:VALUE` segments, e.g.
//! `EVENT|ZONE:01|CODE:1130|ACCT:4521|AREA:1`. Segments without a `:` are
//! ignored and the value is split at the first `:` only.
//!
//! # Built-in Decoders
//!
//! - `DmpDecoder` - numeric SIA-style event codes
//! - `AxisDecoder` - camera analytics with explicit type and severity
//! - `HanwhaDecoder` - video analytics events with confidence

mod axis;
mod dmp;
mod hanwha;
mod registry;

pub use axis::AxisDecoder;
pub use dmp::DmpDecoder;
pub use hanwha::HanwhaDecoder;
pub use registry::DecoderRegistry;

use std::collections::HashMap;
use vahti_core::{AlarmEvent, RawMessage, SourceKind};

/// Decoder trait - maps a raw message to a canonical alarm event
///
/// # Contract
///
/// - Pure: no I/O, no shared state
/// - Total: any payload yields an event. Unknown codes become a generic
///   `Alarm` with `Warning` severity, missing fields take neutral defaults
/// - Deterministic apart from the generated `event_id`
///
/// # Implementing a Decoder
///
/// ```ignore
/// use vahti_gateway::decode::{Decoder, PayloadFields};
/// use vahti_core::{AlarmEvent, RawMessage, SourceKind};
///
/// struct DmpXrDecoder;
///
/// impl Decoder for DmpXrDecoder {
///     fn name(&self) -> &'static str {
///         "dmp-xr"
///     }
///
///     fn kind(&self) -> SourceKind {
///         SourceKind::Dmp
///     }
///
///     fn decode(&self, raw: &RawMessage) -> AlarmEvent {
///         let fields = PayloadFields::parse(&raw.payload);
///         todo!()
///     }
/// }
/// ```
pub trait Decoder: Send + Sync {
    /// Unique name for this decoder (for logging)
    fn name(&self) -> &'static str;

    /// Manufacturer family this decoder handles
    fn kind(&self) -> SourceKind;

    /// Decode one raw message
    fn decode(&self, raw: &RawMessage) -> AlarmEvent;
}

/// `KEY:VALUE` fields of a raw payload
#[derive(Debug, Default)]
pub struct PayloadFields<'a> {
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> PayloadFields<'a> {
    /// Split a payload into fields. Later duplicates win.
    pub fn parse(payload: &'a str) -> Self {
        let fields = payload
            .split('|')
            .filter_map(|segment| segment.split_once(':'))
            .collect();
        Self { fields }
    }

    /// Field value, if present
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.fields.get(key).copied()
    }

    /// Field value, or `default` when missing
    pub fn get_or(&self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_segments_into_fields() {
        let fields = PayloadFields::parse("EVENT|ZONE:01|CODE:1130|ACCT:4521|AREA:1");

        assert_eq!(fields.len(), 4);
        assert_eq!(fields.get("ZONE"), Some("01"));
        assert_eq!(fields.get("CODE"), Some("1130"));
        assert_eq!(fields.get("EVENT"), None);
    }

    #[test]
    fn parse_splits_value_at_first_colon_only() {
        let fields = PayloadFields::parse("AXIS|TS:12:30:05");
        assert_eq!(fields.get("TS"), Some("12:30:05"));
    }

    #[test]
    fn get_or_falls_back_for_missing_fields() {
        let fields = PayloadFields::parse("garbage without separators");

        assert!(fields.is_empty());
        assert_eq!(fields.get_or("ZONE", "??"), "??");
    }

    #[test]
    fn empty_payload_has_no_fields() {
        assert!(PayloadFields::parse("").is_empty());
    }
}
