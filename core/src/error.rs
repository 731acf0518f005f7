//! Error types for VAHTI plugins

use thiserror::Error;

/// Error type for plugin operations
///
/// Used at the boundary of every source and sink. The pipeline never lets a
/// `PluginError` escape a single message or action: the router turns a failed
/// send into a failed [`DispatchLog`](crate::DispatchLog) and moves on.
///
/// # Example
///
/// ```
/// use vahti_core::PluginError;
///
/// fn post_to_webhook() -> Result<(), PluginError> {
///     Err(PluginError::Connection("refused".to_string()))
/// }
///
/// match post_to_webhook() {
///     Ok(_) => println!("delivered"),
///     Err(PluginError::Connection(msg)) => println!("connection failed: {}", msg),
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Initialization failed
    ///
    /// Examples: invalid channel configuration, missing credentials.
    #[error("initialization failed: {0}")]
    Init(String),

    /// Send failed
    ///
    /// Returned when a sink fails to deliver an action.
    /// Examples: SMTP rejection, webhook timeout, VMS command refused.
    #[error("send failed: {0}")]
    Send(String),

    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Shutdown error
    #[error("shutdown error: {0}")]
    Shutdown(String),
}
