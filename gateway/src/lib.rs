//! VAHTI - alarm event pipeline for mixed security installations
//!
//! Ingests raw telemetry from intrusion panels and camera analytics,
//! normalizes it into [`AlarmEvent`](vahti_core::AlarmEvent)s, decides what
//! to do with each one and dispatches the resulting actions to operator
//! channels.
//!
//! # Pipeline
//!
//! ```text
//! Sources ──► Decoders ──► HandoffQueue ──► RuleSet ──► ChannelRouter ──► Sinks
//! ```
//!
//! Sources and sinks are pluggable via the traits in `vahti-core`; decoders
//! and rules are pluggable via [`Decoder`] and [`Rule`].

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod config;
pub mod decode;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod queue;
pub mod rules;
pub mod source;
pub mod state;
pub mod status_server;

pub use config::{ChannelFlags, Config, LogFormat};
pub use decode::{AxisDecoder, Decoder, DecoderRegistry, DmpDecoder, HanwhaDecoder, PayloadFields};
pub use dispatch::{ChannelRouter, LogChannel};
pub use error::{PluginError, Result, VahtiError};
pub use pipeline::{Pipeline, PipelineRunner};
pub use queue::HandoffQueue;
pub use rules::{Actions, Rule, RuleSet};
pub use source::CannedSource;
pub use state::{RunStatus, SimulatorState, StateWatch};
pub use status_server::StatusServer;
