//! Decoder Registry
//!
//! Maps manufacturer families to decoders for O(1) lookup during ingestion.
//! Populated once at startup, read-only afterwards.
//!
//! # Invariants
//!
//! - Each `SourceKind` maps to at most one decoder
//! - A lookup miss is not an error here: the caller decides (the ingestion
//!   task logs it and stops that source)

use super::{AxisDecoder, Decoder, DmpDecoder, HanwhaDecoder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use vahti_core::SourceKind;

/// Registry for decoders
///
/// # Example
///
/// ```ignore
/// use vahti_gateway::decode::{DecoderRegistry, DmpDecoder};
///
/// let mut registry = DecoderRegistry::new();
/// registry.add(Arc::new(DmpDecoder::new()));
/// ```
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<SourceKind, Arc<dyn Decoder>>,
}

impl DecoderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry with the DMP, Axis and Hanwha decoders
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.add(Arc::new(DmpDecoder::new()));
        registry.add(Arc::new(AxisDecoder::new()));
        registry.add(Arc::new(HanwhaDecoder::new()));
        registry
    }

    /// Add a decoder under the kind it declares
    ///
    /// A later decoder for the same kind replaces the earlier one.
    pub fn add(&mut self, decoder: Arc<dyn Decoder>) {
        info!(
            decoder = decoder.name(),
            kind = %decoder.kind(),
            "Registered decoder"
        );
        self.decoders.insert(decoder.kind(), decoder);
    }

    /// Decoder for `kind`, if one is registered
    pub fn get(&self, kind: SourceKind) -> Option<Arc<dyn Decoder>> {
        self.decoders.get(&kind).cloned()
    }

    /// Check if a decoder is registered for a kind
    pub fn has(&self, kind: SourceKind) -> bool {
        self.decoders.contains_key(&kind)
    }

    /// Number of registered decoders
    pub fn count(&self) -> usize {
        self.decoders.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use vahti_core::{AlarmEvent, EventType, RawMessage, Severity};

    // ==========================================================================
    // Mock Decoder for testing
    // ==========================================================================

    struct MockDecoder {
        name: &'static str,
        kind: SourceKind,
    }

    impl Decoder for MockDecoder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn decode(&self, raw: &RawMessage) -> AlarmEvent {
            AlarmEvent {
                event_id: "fixed".to_string(),
                source_id: raw.source_id.clone(),
                source_kind: raw.source_kind,
                event_type: EventType::Alarm,
                severity: Severity::Info,
                zone: String::new(),
                description: self.name.to_string(),
                occurred_at: raw.received_at,
            }
        }
    }

    #[test]
    fn new_registry_has_no_decoders() {
        let registry = DecoderRegistry::new();
        assert_eq!(registry.count(), 0);
        assert!(registry.get(SourceKind::Dmp).is_none());
    }

    #[test]
    fn builtin_registry_covers_every_kind() {
        let registry = DecoderRegistry::with_builtin();

        assert_eq!(registry.count(), 3);
        for kind in SourceKind::ALL {
            assert!(registry.has(kind), "missing decoder for {kind}");
            assert_eq!(registry.get(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn later_registration_overwrites_earlier_for_same_kind() {
        let mut registry = DecoderRegistry::new();
        registry.add(Arc::new(MockDecoder {
            name: "first",
            kind: SourceKind::Axis,
        }));
        registry.add(Arc::new(MockDecoder {
            name: "second",
            kind: SourceKind::Axis,
        }));

        let decoder = registry.get(SourceKind::Axis).unwrap();
        let event = decoder.decode(&RawMessage::new("AXIS-1", SourceKind::Axis, ""));

        assert_eq!(registry.count(), 1);
        assert_eq!(event.description, "second");
    }

    #[test]
    fn lookup_miss_for_unregistered_kind() {
        let mut registry = DecoderRegistry::new();
        registry.add(Arc::new(DmpDecoder::new()));

        assert!(registry.get(SourceKind::Hanwha).is_none());
        assert!(!registry.has(SourceKind::Hanwha));
    }
}
