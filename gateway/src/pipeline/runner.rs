//! Pipeline runner - drives one run from Idle to Stopped
//!
//! Task layout:
//!
//! - one ingestion task per source: listen → decode → push
//! - one consumption task: recv → evaluate → route → fold into state
//!
//! The consumption task owns the state sender while the run is active and
//! hands it back when the queue is closed and drained.

use crate::config::Config;
use crate::decode::DecoderRegistry;
use crate::dispatch::ChannelRouter;
use crate::error::Result;
use crate::metrics::{self, Metrics};
use crate::queue::HandoffQueue;
use crate::rules::RuleSet;
use crate::state::{SimulatorState, StateWatch};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use vahti_core::Source;

/// Pipeline runner
pub struct PipelineRunner {
    pub(crate) config: Config,
    pub(crate) sources: Vec<Arc<dyn Source>>,
    pub(crate) decoders: DecoderRegistry,
    pub(crate) rules: RuleSet,
    pub(crate) router: Arc<ChannelRouter>,
    pub(crate) state: watch::Sender<SimulatorState>,
}

impl PipelineRunner {
    /// Another observer of this run's state
    pub fn subscribe(&self) -> StateWatch {
        StateWatch::new(self.state.subscribe())
    }

    /// Run until every source is exhausted or `shutdown` turns `true`
    ///
    /// This will:
    /// 1. Mark the state Running and spawn the ingestion and consumption tasks
    /// 2. Wait for every ingestion task to finish
    /// 3. Close the queue and let the consumer drain what is left
    /// 4. Shut down the sinks, mark the state Stopped and return it
    ///
    /// Cancellation is not an error. A panic in the consumption task is, and
    /// is returned as [`VahtiError::ConsumerFailed`](crate::VahtiError::ConsumerFailed).
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<SimulatorState> {
        let Self {
            config,
            sources,
            decoders,
            rules,
            router,
            state,
        } = self;

        info!(
            sources = sources.len(),
            decoders = decoders.count(),
            rules = rules.len(),
            sinks = router.count(),
            queue_capacity = config.queue_capacity,
            "Pipeline started"
        );

        // Ignore error if already initialized
        let _ = Metrics::init();

        let queue = Arc::new(HandoffQueue::new(config.queue_capacity));
        state.send_modify(SimulatorState::mark_running);

        let mut consumer = tokio::spawn(consume(
            Arc::clone(&queue),
            rules,
            Arc::clone(&router),
            state,
        ));

        let ingestion: Vec<_> = sources
            .into_iter()
            .map(|source| {
                tokio::spawn(ingest(
                    source,
                    decoders.clone(),
                    Arc::clone(&queue),
                    config.event_interval(),
                    shutdown.clone(),
                ))
            })
            .collect();
        let abort_handles: Vec<_> = ingestion.iter().map(|h| h.abort_handle()).collect();

        let all_ingested = futures::future::join_all(ingestion);
        tokio::pin!(all_ingested);

        // The consumer only returns before the queue is closed if it crashed
        let crashed = tokio::select! {
            results = &mut all_ingested => {
                for result in results {
                    if let Err(e) = result {
                        error!(error = %e, "Ingestion task failed");
                    }
                }
                None
            }
            joined = &mut consumer => Some(joined),
        };

        let joined = match crashed {
            None => {
                debug!(remaining = queue.len(), "Ingestion finished, draining queue");
                queue.close();
                consumer.await
            }
            Some(joined) => {
                for handle in &abort_handles {
                    handle.abort();
                }
                joined
            }
        };

        let state = match joined {
            Ok(state) => state,
            Err(e) => {
                error!(error = %e, "Consumption task failed, run aborted");
                router.shutdown().await;
                return Err(e.into());
            }
        };

        router.shutdown().await;
        state.send_modify(SimulatorState::mark_stopped);
        let final_state = state.borrow().clone();

        info!(
            total_events = final_state.total_events,
            critical = final_state.critical_count,
            warning = final_state.warning_count,
            dispatched = final_state.dispatched_count,
            dropped = queue.total_dropped(),
            "Pipeline stopped"
        );

        Ok(final_state)
    }
}

/// Resolves once `shutdown` reads `true`; pends forever if the sender is gone
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn ingest(
    source: Arc<dyn Source>,
    decoders: DecoderRegistry,
    queue: Arc<HandoffQueue>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let source_id = source.id();
    let Some(decoder) = decoders.get(source.kind()) else {
        warn!(
            source = source_id,
            kind = %source.kind(),
            "No decoder for source, ingestion stopped"
        );
        return;
    };

    info!(source = source_id, decoder = decoder.name(), "Ingestion started");

    let mut stream = source.listen();
    let mut ingested = 0u64;

    loop {
        let raw = tokio::select! {
            biased;
            _ = cancelled(&mut shutdown) => break,
            next = stream.next() => match next {
                Some(raw) => raw,
                None => break,
            },
        };

        let event = decoder.decode(&raw);
        metrics::try_record_received(source_id, event.event_type.as_str());
        debug!(
            source = source_id,
            event_id = %event.event_id,
            event_type = %event.event_type,
            severity = %event.severity,
            "Event decoded"
        );

        if let Some(evicted) = queue.push(event) {
            warn!(
                source = source_id,
                evicted = %evicted.event_id,
                capacity = queue.capacity(),
                "Queue full, oldest event dropped"
            );
            metrics::try_record_dropped("queue_overflow", 1);
        }
        ingested += 1;

        if !interval.is_zero() {
            tokio::select! {
                biased;
                _ = cancelled(&mut shutdown) => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    info!(source = source_id, events = ingested, "Ingestion finished");
}

async fn consume(
    queue: Arc<HandoffQueue>,
    rules: RuleSet,
    router: Arc<ChannelRouter>,
    state: watch::Sender<SimulatorState>,
) -> watch::Sender<SimulatorState> {
    while let Some(event) = queue.recv().await {
        let actions = rules.evaluate(&event);
        let logs = router.route(&actions).await;
        state.send_modify(|s| s.record(&event, &logs));
    }
    state
}
