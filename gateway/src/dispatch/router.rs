//! Channel Router
//!
//! Routes each action to the sink registered for its target.
//!
//! # Invariants
//!
//! - Actions are attempted strictly in input order
//! - Missing or disabled sinks produce no log
//! - A sink error or panic becomes a failed log; later actions are still attempted

use crate::metrics::Metrics;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use vahti_core::{ActionTarget, DispatchAction, DispatchLog, Sink};

/// Routes dispatch actions to per-target sinks
///
/// # Example
///
/// ```ignore
/// use vahti_gateway::dispatch::{ChannelRouter, LogChannel};
///
/// let mut router = ChannelRouter::new();
/// router.register(Arc::new(LogChannel::vms(true)));
/// let logs = router.route(&actions).await;
/// ```
#[derive(Clone, Default)]
pub struct ChannelRouter {
    sinks: HashMap<ActionTarget, Arc<dyn Sink>>,
}

impl ChannelRouter {
    /// Create a router with no sinks
    pub fn new() -> Self {
        Self {
            sinks: HashMap::new(),
        }
    }

    /// Register a sink under the target it declares
    ///
    /// Replaces any sink already registered for that target.
    pub fn register(&mut self, sink: Arc<dyn Sink>) {
        let target = sink.target();
        if self.sinks.insert(target, sink).is_some() {
            info!(%target, "Replaced sink");
        } else {
            info!(%target, "Registered sink");
        }
    }

    /// Sink registered for `target`
    pub fn get(&self, target: ActionTarget) -> Option<&Arc<dyn Sink>> {
        self.sinks.get(&target)
    }

    pub fn count(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Attempt every action, returning one log per attempted action
    pub async fn route(&self, actions: &[DispatchAction]) -> Vec<DispatchLog> {
        let metrics = Metrics::get();
        let mut logs = Vec::with_capacity(actions.len());

        for action in actions {
            let Some(sink) = self.sinks.get(&action.target) else {
                warn!(
                    event_id = %action.event_id,
                    target = %action.target,
                    "No sink registered for target, action skipped"
                );
                continue;
            };

            if !sink.enabled() {
                debug!(
                    event_id = %action.event_id,
                    target = %action.target,
                    "Sink disabled, action skipped"
                );
                continue;
            }

            let log = match AssertUnwindSafe(sink.send(action)).catch_unwind().await {
                Ok(Ok(log)) => log,
                Ok(Err(e)) => {
                    error!(
                        event_id = %action.event_id,
                        target = %action.target,
                        error = %e,
                        "Sink failed to deliver action"
                    );
                    DispatchLog::failed(action, e)
                }
                Err(panic) => {
                    let cause = panic_message(panic.as_ref());
                    error!(
                        event_id = %action.event_id,
                        target = %action.target,
                        panic = %cause,
                        "Sink panicked while delivering action"
                    );
                    DispatchLog::failed(action, format!("sink panicked: {cause}"))
                }
            };

            if let Some(m) = metrics {
                m.record_action(action.target.as_str(), log.success);
            }
            logs.push(log);
        }

        if logs.is_empty() && !actions.is_empty() {
            debug!(
                actions = actions.len(),
                "Actions generated but no enabled sink accepted them"
            );
        }

        logs
    }

    /// Shut down every registered sink
    ///
    /// Errors are logged; every sink gets its shutdown call.
    pub async fn shutdown(&self) {
        for (target, sink) in &self.sinks {
            if let Err(e) = sink.shutdown().await {
                error!(%target, error = %e, "Sink shutdown failed");
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use vahti_core::PluginError;

    // ==========================================================================
    // Mock sinks
    // ==========================================================================

    struct CountingSink {
        target: ActionTarget,
        enabled: bool,
        fail: bool,
        panics: bool,
        calls: AtomicUsize,
        shut_down: AtomicBool,
    }

    impl CountingSink {
        fn new(target: ActionTarget) -> Self {
            Self {
                target,
                enabled: true,
                fail: false,
                panics: false,
                calls: AtomicUsize::new(0),
                shut_down: AtomicBool::new(false),
            }
        }

        fn disabled(target: ActionTarget) -> Self {
            Self {
                enabled: false,
                ..Self::new(target)
            }
        }

        fn failing(target: ActionTarget) -> Self {
            Self {
                fail: true,
                ..Self::new(target)
            }
        }

        fn panicking(target: ActionTarget) -> Self {
            Self {
                panics: true,
                ..Self::new(target)
            }
        }
    }

    #[async_trait]
    impl Sink for CountingSink {
        fn target(&self) -> ActionTarget {
            self.target
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        async fn send(&self, action: &DispatchAction) -> Result<DispatchLog, PluginError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panics {
                panic!("bridge exploded on {}", action.payload);
            }
            if self.fail {
                return Err(PluginError::Connection("relay unreachable".to_string()));
            }
            Ok(DispatchLog::delivered(action, format!("sent {}", action.payload)))
        }

        async fn shutdown(&self) -> Result<(), PluginError> {
            self.shut_down.store(true, Ordering::SeqCst);
            if self.fail {
                return Err(PluginError::Shutdown("stuck".to_string()));
            }
            Ok(())
        }
    }

    fn action(target: ActionTarget, payload: &str) -> DispatchAction {
        DispatchAction::new("evt-1", target, payload)
    }

    #[tokio::test]
    async fn routes_in_input_order() {
        let mut router = ChannelRouter::new();
        for target in ActionTarget::ALL {
            router.register(Arc::new(CountingSink::new(target)));
        }

        let actions = vec![
            action(ActionTarget::Vms, "a"),
            action(ActionTarget::Email, "b"),
            action(ActionTarget::WebClient, "c"),
        ];
        let logs = router.route(&actions).await;

        let summaries: Vec<&str> = logs.iter().map(|l| l.summary.as_str()).collect();
        assert_eq!(summaries, vec!["sent a", "sent b", "sent c"]);
        assert!(logs.iter().all(|l| l.success));
    }

    #[tokio::test]
    async fn missing_sink_produces_no_log() {
        let router = ChannelRouter::new();
        let logs = router.route(&[action(ActionTarget::Email, "x")]).await;
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn disabled_sink_is_not_called() {
        let sink = Arc::new(CountingSink::disabled(ActionTarget::Vms));
        let mut router = ChannelRouter::new();
        router.register(sink.clone());

        let logs = router.route(&[action(ActionTarget::Vms, "x")]).await;

        assert!(logs.is_empty());
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_is_logged_and_later_actions_still_run() {
        let mut router = ChannelRouter::new();
        router.register(Arc::new(CountingSink::failing(ActionTarget::Email)));
        router.register(Arc::new(CountingSink::new(ActionTarget::WebClient)));

        let logs = router
            .route(&[
                action(ActionTarget::Email, "first"),
                action(ActionTarget::WebClient, "second"),
            ])
            .await;

        assert_eq!(logs.len(), 2);
        assert!(!logs[0].success);
        assert!(logs[0].summary.starts_with("ERROR: "));
        assert!(logs[0].summary.contains("relay unreachable"));
        assert!(logs[1].success);
    }

    #[tokio::test]
    async fn register_replaces_sink_for_same_target() {
        let first = Arc::new(CountingSink::new(ActionTarget::Vms));
        let second = Arc::new(CountingSink::new(ActionTarget::Vms));
        let mut router = ChannelRouter::new();
        router.register(first.clone());
        router.register(second.clone());

        router.route(&[action(ActionTarget::Vms, "x")]).await;

        assert_eq!(router.count(), 1);
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_reaches_every_sink_even_after_error() {
        let failing = Arc::new(CountingSink::failing(ActionTarget::Email));
        let healthy = Arc::new(CountingSink::new(ActionTarget::Vms));
        let mut router = ChannelRouter::new();
        router.register(failing.clone());
        router.register(healthy.clone());

        router.shutdown().await;

        assert!(failing.shut_down.load(Ordering::SeqCst));
        assert!(healthy.shut_down.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn unregistered_target_is_skipped_and_order_kept() {
        let mut router = ChannelRouter::new();
        router.register(Arc::new(CountingSink::new(ActionTarget::Email)));
        router.register(Arc::new(CountingSink::new(ActionTarget::WebClient)));

        let logs = router
            .route(&[
                action(ActionTarget::Vms, "camera"),
                action(ActionTarget::Email, "mail"),
                action(ActionTarget::WebClient, "feed"),
            ])
            .await;

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].target, ActionTarget::Email);
        assert_eq!(logs[0].summary, "sent mail");
        assert_eq!(logs[1].target, ActionTarget::WebClient);
        assert_eq!(logs[1].summary, "sent feed");
    }

    #[tokio::test]
    async fn every_action_to_failing_sink_gets_its_own_failed_log() {
        let failing = Arc::new(CountingSink::failing(ActionTarget::Email));
        let healthy = Arc::new(CountingSink::new(ActionTarget::WebClient));
        let mut router = ChannelRouter::new();
        router.register(failing.clone());
        router.register(healthy.clone());

        let logs = router
            .route(&[
                action(ActionTarget::Email, "first"),
                action(ActionTarget::WebClient, "between"),
                action(ActionTarget::Email, "second"),
            ])
            .await;

        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].target, ActionTarget::Email);
        assert!(!logs[0].success);
        assert!(logs[1].success);
        assert_eq!(logs[1].summary, "sent between");
        assert_eq!(logs[2].target, ActionTarget::Email);
        assert!(!logs[2].success);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
        assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_sink_becomes_failed_log() {
        let mut router = ChannelRouter::new();
        router.register(Arc::new(CountingSink::panicking(ActionTarget::Vms)));
        let email = Arc::new(CountingSink::new(ActionTarget::Email));
        router.register(email.clone());

        let logs = router
            .route(&[
                action(ActionTarget::Vms, "OPEN_CAM"),
                action(ActionTarget::Email, "alert"),
            ])
            .await;

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].target, ActionTarget::Vms);
        assert!(!logs[0].success);
        assert!(logs[0].summary.starts_with("ERROR: sink panicked: "));
        assert!(logs[0].summary.contains("bridge exploded on OPEN_CAM"));
        assert!(logs[1].success);
        assert_eq!(email.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn panic_message_reads_static_and_owned_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("static");
        let other: Box<dyn Any + Send> = Box::new(7_u32);

        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
