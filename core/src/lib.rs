//! vahti-core - Core types for the VAHTI alarm pipeline
//!
//! This crate provides the foundational types shared between the VAHTI
//! gateway and external plugins (sources, sinks):
//!
//! - [`RawMessage`], [`AlarmEvent`], [`DispatchAction`], [`DispatchLog`] -
//!   the canonical data that flows through the pipeline
//! - [`Source`] trait - lazy stream of raw telemetry for one manufacturer
//! - [`Sink`] trait - async interface for delivering an action to one channel
//! - [`PluginError`] - error type for plugin operations
//!
//! # Why this crate exists
//!
//! Channel integrations (SMTP relays, VMS SDK bridges) and real transports
//! only need these types. Keeping them here lets those plugins build without
//! pulling in the rule engine, the queue or the HTTP status server.
//!
//! ```text
//! vahti-core ◄── vahti-gateway ◄── vahti-runtime
//!     ▲
//!     └────────── external sinks / sources
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]
#![warn(missing_docs)]

mod error;
/// Canonical alarm-event model
#[allow(missing_docs)]
pub mod event;
mod sink;
mod source;

pub use error::PluginError;
pub use event::{
    ActionTarget, AlarmEvent, DispatchAction, DispatchLog, EventType, RawMessage, Severity,
    SourceKind, UnknownSourceKind,
};
pub use sink::Sink;
pub use source::{RawStream, Source};
