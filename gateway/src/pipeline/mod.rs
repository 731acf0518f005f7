//! Pipeline - wiring sources, decoders, rules and sinks together
//!
//! # Example
//!
//! ```ignore
//! use vahti_gateway::{CannedSource, Config, Pipeline};
//!
//! let config = Config::from_env()?;
//! let (watch, runner) = Pipeline::new()
//!     .config(config)
//!     .source(CannedSource::dmp())
//!     .source(CannedSource::axis())
//!     .log_channels()
//!     .build();
//!
//! let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//! let final_state = runner.run(stop_rx).await?;
//! ```
//!
//! # Architecture
//!
//! ```text
//! Source ──► Decoder ──┐
//! Source ──► Decoder ──┼──► HandoffQueue ──► RuleSet ──► ChannelRouter ──► Sinks
//! Source ──► Decoder ──┘     (drop-oldest)                      │
//!                                                               ▼
//!                                                      SimulatorState ──► StateWatch
//! ```

mod runner;

pub use runner::PipelineRunner;

use crate::config::Config;
use crate::decode::{Decoder, DecoderRegistry};
use crate::dispatch::{ChannelRouter, LogChannel};
use crate::rules::{Rule, RuleSet};
use crate::state::{SimulatorState, StateWatch};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;
use vahti_core::{Sink, Source};

/// Pipeline builder
///
/// Starts with the built-in decoders and the baseline rule set, no sources
/// and no sinks.
pub struct Pipeline {
    config: Config,
    sources: Vec<Arc<dyn Source>>,
    decoders: DecoderRegistry,
    rules: RuleSet,
    router: ChannelRouter,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            sources: Vec::new(),
            decoders: DecoderRegistry::with_builtin(),
            rules: RuleSet::baseline(),
            router: ChannelRouter::new(),
        }
    }

    /// Set the run configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Add a source; one ingestion task is spawned per source
    pub fn source<S: Source + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Add a shared source
    pub fn source_arc(mut self, source: Arc<dyn Source>) -> Self {
        self.sources.push(source);
        self
    }

    /// Replace the decoder registry
    pub fn decoders(mut self, decoders: DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    /// Add or replace one decoder
    pub fn decoder<D: Decoder + 'static>(mut self, decoder: D) -> Self {
        self.decoders.add(Arc::new(decoder));
        self
    }

    /// Replace the rule set
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Add one rule at its priority position
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.add(rule);
        self
    }

    /// Register a sink, replacing any sink for the same target
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.router.register(Arc::new(sink));
        self
    }

    /// Register a shared sink
    pub fn sink_arc(mut self, sink: Arc<dyn Sink>) -> Self {
        self.router.register(sink);
        self
    }

    /// Register the simulated channels, enabled per the current config
    pub fn log_channels(mut self) -> Self {
        for channel in LogChannel::from_flags(&self.config.channels) {
            self.router.register(Arc::new(channel));
        }
        self
    }

    /// Build the pipeline
    ///
    /// Returns the state observer and the runner that drives the run.
    pub fn build(self) -> (StateWatch, PipelineRunner) {
        if self.sources.is_empty() {
            warn!("No sources registered - the run will stop immediately");
        }
        if self.router.is_empty() {
            warn!("No sinks registered - actions will be generated but not delivered");
        }

        let (state_tx, state_rx) = watch::channel(SimulatorState::new(self.config.recent_capacity));

        let runner = PipelineRunner {
            config: self.config,
            sources: self.sources,
            decoders: self.decoders,
            rules: self.rules,
            router: Arc::new(self.router),
            state: state_tx,
        };

        (StateWatch::new(state_rx), runner)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
