//! Source trait for VAHTI plugins
//!
//! A [`Source`] stands in for the physical transport of one panel or
//! manufacturer feed. It only has to hand out a stream of [`RawMessage`]s.

use crate::event::{RawMessage, SourceKind};
use futures::stream::BoxStream;

/// Lazy stream of raw messages from one source
pub type RawStream = BoxStream<'static, RawMessage>;

/// Source trait - produces raw telemetry for one manufacturer family
///
/// # Contract
///
/// - Each call to [`listen`](Source::listen) starts a fresh sequence, so the
///   same source can be used by consecutive runs
/// - Dropping the stream cancels it mid-sequence
/// - Streams may be infinite; the pipeline never assumes they end
pub trait Source: Send + Sync {
    /// Identifying key, used in logs and metrics
    fn id(&self) -> &str;

    /// Manufacturer family, selects the decoder
    fn kind(&self) -> SourceKind;

    /// Start a new sequence of raw messages
    fn listen(&self) -> RawStream;
}
