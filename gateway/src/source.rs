//! Canned sources
//!
//! Stand-ins for panel and camera transports: each replays a fixed list of
//! payloads, one per `pace`, then ends.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use vahti_core::{RawMessage, RawStream, Source, SourceKind};

const DMP_PAYLOADS: [&str; 7] = [
    "EVENT|ZONE:01|CODE:1130|ACCT:4521|AREA:1",
    "EVENT|ZONE:02|CODE:1110|ACCT:4521|AREA:1",
    "EVENT|ZONE:03|CODE:1137|ACCT:4521|AREA:1",
    "EVENT|ZONE:04|CODE:1120|ACCT:4521|AREA:2",
    "EVENT|ZONE:01|CODE:3130|ACCT:4521|AREA:1",
    "EVENT|ZONE:05|CODE:1301|ACCT:4521|AREA:3",
    "EVENT|ZONE:02|CODE:3110|ACCT:4521|AREA:1",
];

const AXIS_PAYLOADS: [&str; 4] = [
    "AXIS|TYP:FIRE|ZONE:A1|SEV:HIGH|CAM:CH01",
    "AXIS|TYP:TAMPER|ZONE:B2|SEV:MEDIUM|CAM:CH03",
    "AXIS|TYP:INTRUSION|ZONE:C1|SEV:HIGH|CAM:CH02",
    "AXIS|TYP:MEDICAL|ZONE:A3|SEV:HIGH|CAM:CH04",
];

const HANWHA_PAYLOADS: [&str; 3] = [
    "HNW|EVT:MOTION|CHANNEL:1|CONF:95|TS:AUTO",
    "HNW|EVT:FIRE_SMOKE|CHANNEL:3|CONF:88|TS:AUTO",
    "HNW|EVT:LOITERING|CHANNEL:2|CONF:72|TS:AUTO",
];

/// Source replaying a fixed payload list
///
/// Every [`listen`](Source::listen) starts from the first payload again.
#[derive(Debug, Clone)]
pub struct CannedSource {
    id: String,
    kind: SourceKind,
    payloads: Arc<[String]>,
    pace: Duration,
}

impl CannedSource {
    pub fn new<I, S>(id: impl Into<String>, kind: SourceKind, payloads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            kind,
            payloads: payloads.into_iter().map(Into::into).collect(),
            pace: Duration::ZERO,
        }
    }

    /// DMP XR panel feed, one message per 1.8 s
    pub fn dmp() -> Self {
        Self::new("DMP-101", SourceKind::Dmp, DMP_PAYLOADS)
            .with_pace(Duration::from_millis(1800))
    }

    /// Axis camera analytics feed, one message per 2.2 s
    pub fn axis() -> Self {
        Self::new("AXIS-201", SourceKind::Axis, AXIS_PAYLOADS)
            .with_pace(Duration::from_millis(2200))
    }

    /// Hanwha camera feed, one message per 2.5 s
    pub fn hanwha() -> Self {
        Self::new("HNW-301", SourceKind::Hanwha, HANWHA_PAYLOADS)
            .with_pace(Duration::from_millis(2500))
    }

    /// The three built-in feeds
    pub fn builtin() -> Vec<Self> {
        vec![Self::dmp(), Self::axis(), Self::hanwha()]
    }

    /// Delay before each message after the first
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl Source for CannedSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn listen(&self) -> RawStream {
        let id = self.id.clone();
        let kind = self.kind;
        let payloads = Arc::clone(&self.payloads);
        let pace = self.pace;

        futures::stream::unfold(0usize, move |index| {
            let id = id.clone();
            let payloads = Arc::clone(&payloads);
            async move {
                let payload = payloads.get(index)?;
                if index > 0 && !pace.is_zero() {
                    tokio::time::sleep(pace).await;
                }
                Some((RawMessage::new(id, kind, payload.as_str()), index + 1))
            }
        })
        .boxed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decode::DecoderRegistry;
    use vahti_core::EventType;

    #[tokio::test]
    async fn replays_payloads_in_order() {
        let source = CannedSource::new("T-1", SourceKind::Axis, ["one", "two", "three"]);
        let messages: Vec<RawMessage> = source.listen().collect().await;

        let payloads: Vec<&str> = messages.iter().map(|m| m.payload.as_str()).collect();
        assert_eq!(payloads, vec!["one", "two", "three"]);
        assert!(messages.iter().all(|m| m.source_id == "T-1"));
        assert!(messages.iter().all(|m| m.source_kind == SourceKind::Axis));
    }

    #[tokio::test]
    async fn listen_restarts_from_the_beginning() {
        let source = CannedSource::new("T-1", SourceKind::Dmp, ["a", "b"]);
        let mut first = source.listen();
        assert_eq!(first.next().await.unwrap().payload, "a");
        drop(first);

        let again: Vec<RawMessage> = source.listen().collect().await;
        assert_eq!(again.len(), 2);
        assert_eq!(again[0].payload, "a");
    }

    #[tokio::test(start_paused = true)]
    async fn pace_spaces_out_messages() {
        let source = CannedSource::new("T-1", SourceKind::Hanwha, ["a", "b", "c"])
            .with_pace(Duration::from_secs(2));

        let start = tokio::time::Instant::now();
        let messages: Vec<RawMessage> = source.listen().collect().await;

        assert_eq!(messages.len(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "elapsed {elapsed:?}");
    }

    #[test]
    fn builtin_feeds_have_distinct_kinds() {
        let feeds = CannedSource::builtin();
        assert_eq!(feeds.len(), 3);
        assert_eq!(feeds[0].kind(), SourceKind::Dmp);
        assert_eq!(feeds[1].kind(), SourceKind::Axis);
        assert_eq!(feeds[2].kind(), SourceKind::Hanwha);
        assert_eq!(feeds[0].len(), 7);
    }

    #[tokio::test]
    async fn builtin_payloads_decode_without_fallback() {
        let registry = DecoderRegistry::with_builtin();
        for feed in CannedSource::builtin() {
            let decoder = registry.get(feed.kind()).unwrap();
            let messages: Vec<RawMessage> = feed.with_pace(Duration::ZERO).listen().collect().await;
            for raw in &messages {
                let event = decoder.decode(raw);
                assert_ne!(event.event_type, EventType::Alarm, "fallback for {}", raw.payload);
            }
        }
    }
}
