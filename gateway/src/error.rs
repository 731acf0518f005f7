//! Error types for VAHTI

use thiserror::Error;

// Re-export PluginError from vahti-core
pub use vahti_core::PluginError;

/// Result type alias for VAHTI operations
pub type Result<T> = std::result::Result<T, VahtiError>;

/// Main error type for VAHTI
///
/// Only structural failures end up here. Per-message and per-action problems
/// (unknown codes, failed sends) are recorded and never escalate.
#[derive(Error, Debug)]
pub enum VahtiError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Plugin error
    #[error("plugin '{plugin}' error: {message}")]
    Plugin { plugin: String, message: String },

    /// The consumption task terminated abnormally
    ///
    /// Fatal for the run: the task is the single writer of the aggregate
    /// state, so nothing else may take over.
    #[error("consumption task failed: {0}")]
    ConsumerFailed(String),

    /// Metrics error
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl From<PluginError> for VahtiError {
    fn from(err: PluginError) -> Self {
        VahtiError::Plugin {
            plugin: "unknown".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<envconfig::Error> for VahtiError {
    fn from(err: envconfig::Error) -> Self {
        VahtiError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for VahtiError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            VahtiError::ConsumerFailed(format!("task panicked: {err}"))
        } else {
            VahtiError::ConsumerFailed(format!("task cancelled: {err}"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_error_to_vahti_error() {
        let plugin_err = PluginError::Init("failed to connect".to_string());
        let err: VahtiError = plugin_err.into();
        assert!(matches!(err, VahtiError::Plugin { .. }));
    }

    #[test]
    fn test_config_error_display() {
        let err = VahtiError::Config("queue capacity must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "configuration error: queue capacity must be positive"
        );
    }

    #[test]
    fn test_envconfig_error_becomes_config_error() {
        let err: VahtiError = envconfig::Error::ParseError {
            name: "VAHTI_QUEUE_CAPACITY",
        }
        .into();
        assert!(matches!(err, VahtiError::Config(_)));
        assert!(err.to_string().contains("VAHTI_QUEUE_CAPACITY"));
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_consumer_failure() {
        #[allow(clippy::panic)]
        let handle = tokio::spawn(async { panic!("boom") });
        let join_err = handle.await.unwrap_err();

        let err: VahtiError = join_err.into();
        assert!(matches!(err, VahtiError::ConsumerFailed(_)));
        assert!(err.to_string().contains("panicked"));
    }
}
