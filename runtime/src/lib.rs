//! VAHTI Runtime - process entry point for the alarm pipeline
//!
//! Provides [`run()`] for the default installation (the three canned feeds
//! and the simulated channels), and [`RuntimeBuilder`] for callers that add
//! their own sources, sinks or rules.
//!
//! # Quick start
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     vahti_runtime::run().await?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::panic)]

pub mod prelude;

use std::future::Future;
use std::net::SocketAddr;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use vahti_gateway::config::{Config, LogFormat};
use vahti_gateway::metrics::Metrics;
use vahti_gateway::{CannedSource, Pipeline, SimulatorState, StateWatch, StatusServer};

/// Run the default pipeline until the feeds are exhausted or a shutdown
/// signal arrives.
///
/// Loads configuration from environment variables, initialises tracing and
/// metrics, wires the built-in feeds and simulated channels and returns the
/// final state.
pub async fn run() -> anyhow::Result<SimulatorState> {
    RuntimeBuilder::new()
        .configure(|pipeline| async move { Ok(pipeline) })
        .await
}

/// Builder for controlling runtime behaviour.
///
/// # Example
///
/// ```ignore
/// RuntimeBuilder::new()
///     .status_addr("127.0.0.1:9400".parse()?)
///     .configure(|pipeline| async move {
///         Ok(pipeline.rule(Rule::new("medical", 2, is_medical, page_on_call)))
///     })
///     .await
/// ```
pub struct RuntimeBuilder {
    status_addr: Option<SocketAddr>,
    builtin_sources: bool,
}

impl RuntimeBuilder {
    /// Create a new builder; unset options come from the environment.
    pub fn new() -> Self {
        Self {
            status_addr: None,
            builtin_sources: true,
        }
    }

    /// Serve `/metrics`, `/health` and `/state` on `addr`.
    ///
    /// Default: `VAHTI_STATUS_ADDR`, or no status server when unset.
    pub fn status_addr(mut self, addr: SocketAddr) -> Self {
        self.status_addr = Some(addr);
        self
    }

    /// Do not add the DMP, Axis and Hanwha canned feeds.
    pub fn without_builtin_sources(mut self) -> Self {
        self.builtin_sources = false;
        self
    }

    /// Configure the pipeline and run it to completion.
    ///
    /// The closure receives a pipeline that already carries the config, the
    /// simulated channels and (unless disabled) the built-in feeds.
    pub async fn configure<F, Fut>(self, configure: F) -> anyhow::Result<SimulatorState>
    where
        F: FnOnce(Pipeline) -> Fut,
        Fut: Future<Output = anyhow::Result<Pipeline>>,
    {
        // ── 1. Load config from env ──────────────────────────────
        let config = Config::from_env()?;

        // ── 2. Init tracing ──────────────────────────────────────
        init_tracing(&config);

        let status_addr = self.status_addr.or(config.status_addr);
        info!(
            event_interval_ms = config.event_interval_ms,
            queue_capacity = config.queue_capacity,
            recent_capacity = config.recent_capacity,
            status_addr = ?status_addr,
            "Starting VAHTI"
        );

        // ── 3. Init metrics ──────────────────────────────────────
        Metrics::init()?;

        // ── 4. Pre-configure the pipeline from config ────────────
        let mut pipeline = Pipeline::new().config(config).log_channels();
        if self.builtin_sources {
            for source in CannedSource::builtin() {
                pipeline = pipeline.source(source);
            }
        }

        // ── 5. Caller configures the pipeline ────────────────────
        let pipeline = configure(pipeline).await?;
        let (state_watch, runner) = pipeline.build();

        // ── 6. Status server and observer ────────────────────────
        let status_handle =
            status_addr.map(|addr| StatusServer::start(addr, state_watch.clone()));
        let observer_handle = tokio::spawn(observe(state_watch));

        // ── 7. Run until done or signalled ───────────────────────
        let (stop_tx, stop_rx) = watch::channel(false);
        let signal_handle = tokio::spawn(async move {
            shutdown_signal().await;
            let _ = stop_tx.send(true);
        });

        let result = runner.run(stop_rx).await;

        // ── 8. Shutdown ──────────────────────────────────────────
        signal_handle.abort();
        if let Some(handle) = status_handle {
            handle.abort();
        }
        // Ends on its own once the runner drops the state sender
        let _ = observer_handle.await;

        let final_state = result?;
        info!(
            total_events = final_state.total_events,
            critical = final_state.critical_count,
            warning = final_state.warning_count,
            info = final_state.info_count,
            dispatched = final_state.dispatched_count,
            "VAHTI shutdown complete"
        );

        Ok(final_state)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Log status transitions and progress until the run ends.
async fn observe(mut state: StateWatch) {
    let mut status = state.status();
    while state.changed().await {
        let snapshot = state.snapshot();
        if snapshot.status != status {
            info!(from = %status, to = %snapshot.status, "Pipeline status changed");
            status = snapshot.status;
        }
        debug!(
            total_events = snapshot.total_events,
            critical = snapshot.critical_count,
            warning = snapshot.warning_count,
            dispatched = snapshot.dispatched_count,
            "State updated"
        );
    }
}

/// Initialise the tracing subscriber based on config.
fn init_tracing(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // A second init in the same process keeps the first subscriber
    match config.log_format {
        LogFormat::Json => {
            let _ = registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init();
        }
        LogFormat::Pretty => {
            let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
        }
    }
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
