//! Simulated delivery channels
//!
//! Each [`LogChannel`] stands in for one real integration (console push, VMS
//! bridge, SMTP relay, messaging bot). Delivery is a structured log line and
//! always succeeds.

use crate::config::ChannelFlags;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use vahti_core::{ActionTarget, DispatchAction, DispatchLog, PluginError, Sink};

/// Simulated sink for one action target
pub struct LogChannel {
    target: ActionTarget,
    enabled: bool,
    sent: AtomicU64,
}

impl LogChannel {
    pub fn new(target: ActionTarget, enabled: bool) -> Self {
        Self {
            target,
            enabled,
            sent: AtomicU64::new(0),
        }
    }

    pub fn web_client(enabled: bool) -> Self {
        Self::new(ActionTarget::WebClient, enabled)
    }

    pub fn vms(enabled: bool) -> Self {
        Self::new(ActionTarget::Vms, enabled)
    }

    pub fn email(enabled: bool) -> Self {
        Self::new(ActionTarget::Email, enabled)
    }

    pub fn instant_message(enabled: bool) -> Self {
        Self::new(ActionTarget::InstantMessage, enabled)
    }

    /// One channel per target, enabled per `flags`
    pub fn from_flags(flags: &ChannelFlags) -> Vec<Self> {
        ActionTarget::ALL
            .into_iter()
            .map(|target| Self::new(target, flags.is_enabled(target)))
            .collect()
    }

    /// Actions delivered so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    fn summary(&self, payload: &str) -> String {
        match self.target {
            ActionTarget::WebClient => format!("WebClient POST sent — {}", truncate(payload, 60)),
            ActionTarget::Vms => format!("VMS command sent — {payload}"),
            ActionTarget::Email => format!("Email sent — {}", truncate(payload, 80)),
            ActionTarget::InstantMessage => format!("IM sent — {payload}"),
        }
    }
}

#[async_trait]
impl Sink for LogChannel {
    fn target(&self) -> ActionTarget {
        self.target
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, action: &DispatchAction) -> Result<DispatchLog, PluginError> {
        info!(
            channel = %self.target,
            event_id = %action.event_id,
            payload = %action.payload,
            "Channel delivery"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(DispatchLog::delivered(action, self.summary(&action.payload)))
    }
}

/// First `max` characters of `s`, never splitting a character
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
