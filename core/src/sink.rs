//! Sink trait for VAHTI plugins
//!
//! A [`Sink`] is one notification channel: web client push, VMS command,
//! email, instant message. Sinks fail independently; the router isolates
//! them from each other and from the rest of the pipeline.

use crate::error::PluginError;
use crate::event::{ActionTarget, DispatchAction, DispatchLog};
use async_trait::async_trait;

/// Sink trait - delivers a [`DispatchAction`] to one channel
///
/// # Implementation Requirements
///
/// - Sinks must be `Send + Sync`; one instance is shared by the consumer task
/// - `send` reports failure through `Err`, never by panicking
/// - `enabled` is fixed at construction and must be cheap
///
/// # Example
///
/// ```ignore
/// use vahti_core::{ActionTarget, DispatchAction, DispatchLog, PluginError, Sink};
/// use async_trait::async_trait;
///
/// struct SmtpSink {
///     relay: SmtpRelay,
/// }
///
/// #[async_trait]
/// impl Sink for SmtpSink {
///     fn target(&self) -> ActionTarget {
///         ActionTarget::Email
///     }
///
///     fn enabled(&self) -> bool {
///         true
///     }
///
///     async fn send(&self, action: &DispatchAction) -> Result<DispatchLog, PluginError> {
///         self.relay
///             .send(&action.payload)
///             .await
///             .map_err(|e| PluginError::Send(e.to_string()))?;
///         Ok(DispatchLog::delivered(action, "email sent"))
///     }
/// }
/// ```
#[async_trait]
pub trait Sink: Send + Sync {
    /// Channel this sink delivers to
    ///
    /// The router keeps at most one sink per target.
    fn target(&self) -> ActionTarget;

    /// Whether the channel is switched on for this run
    fn enabled(&self) -> bool;

    /// Deliver one action
    ///
    /// # Returns
    ///
    /// * `Ok(DispatchLog)` - what was delivered (usually `success = true`)
    /// * `Err(PluginError)` - delivery failed; the router records it as a
    ///   failed log and continues with the next action
    async fn send(&self, action: &DispatchAction) -> Result<DispatchLog, PluginError>;

    /// Graceful shutdown, called once when the run stops
    ///
    /// The default implementation returns `Ok(())` for sinks that hold no
    /// resources.
    async fn shutdown(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
