//! Convenience re-exports for pipeline authors.
//!
//! ```ignore
//! use vahti_runtime::prelude::*;
//! ```

// Core types
pub use vahti_core::{
    ActionTarget, AlarmEvent, DispatchAction, DispatchLog, EventType, RawMessage, RawStream,
    Severity, Sink, Source, SourceKind,
};

// Pipeline builder
pub use vahti_gateway::{Pipeline, PipelineRunner, StateWatch};

// Decoders
pub use vahti_gateway::{Decoder, DecoderRegistry, PayloadFields};

// Rules
pub use vahti_gateway::{Actions, Rule, RuleSet};

// Channels and sources
pub use vahti_gateway::{CannedSource, ChannelRouter, LogChannel};

// State
pub use vahti_gateway::{RunStatus, SimulatorState};

// Error types
pub use vahti_gateway::{PluginError, VahtiError};

// Runtime
pub use crate::RuntimeBuilder;
