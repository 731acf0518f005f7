//! Configuration for VAHTI
//!
//! Loaded once from environment variables and immutable for the lifetime of
//! a run.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `VAHTI_EVENT_INTERVAL_MS` | `2000` |
//! | `VAHTI_RECENT_CAPACITY` | `50` |
//! | `VAHTI_QUEUE_CAPACITY` | `256` |
//! | `VAHTI_CHANNEL_WEB_CLIENT` | `true` |
//! | `VAHTI_CHANNEL_VMS` | `true` |
//! | `VAHTI_CHANNEL_EMAIL` | `true` |
//! | `VAHTI_CHANNEL_IM` | `true` |
//! | `VAHTI_LOG_LEVEL` | `info` |
//! | `VAHTI_LOG_FORMAT` | `pretty` |
//! | `VAHTI_STATUS_ADDR` | unset (status server off) |

use crate::error::{Result, VahtiError};
use envconfig::Envconfig;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use vahti_core::ActionTarget;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for terminals
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = VahtiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(VahtiError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Per-channel enable flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Envconfig)]
pub struct ChannelFlags {
    #[envconfig(from = "VAHTI_CHANNEL_WEB_CLIENT", default = "true")]
    pub web_client: bool,

    #[envconfig(from = "VAHTI_CHANNEL_VMS", default = "true")]
    pub vms: bool,

    #[envconfig(from = "VAHTI_CHANNEL_EMAIL", default = "true")]
    pub email: bool,

    #[envconfig(from = "VAHTI_CHANNEL_IM", default = "true")]
    pub instant_message: bool,
}

impl ChannelFlags {
    /// Whether the channel for `target` is switched on
    pub fn is_enabled(&self, target: ActionTarget) -> bool {
        match target {
            ActionTarget::WebClient => self.web_client,
            ActionTarget::Vms => self.vms,
            ActionTarget::Email => self.email,
            ActionTarget::InstantMessage => self.instant_message,
        }
    }
}

impl Default for ChannelFlags {
    fn default() -> Self {
        Self {
            web_client: true,
            vms: true,
            email: true,
            instant_message: true,
        }
    }
}

/// Pipeline and runtime configuration
#[derive(Debug, Clone, Envconfig)]
pub struct Config {
    /// Pause after each ingested message, per source
    #[envconfig(from = "VAHTI_EVENT_INTERVAL_MS", default = "2000")]
    pub event_interval_ms: u64,

    /// Size of the recent-events and recent-logs windows
    #[envconfig(from = "VAHTI_RECENT_CAPACITY", default = "50")]
    pub recent_capacity: usize,

    /// Hand-off queue capacity (oldest event dropped beyond this)
    #[envconfig(from = "VAHTI_QUEUE_CAPACITY", default = "256")]
    pub queue_capacity: usize,

    #[envconfig(nested)]
    pub channels: ChannelFlags,

    /// Default tracing filter when `RUST_LOG` is unset
    #[envconfig(from = "VAHTI_LOG_LEVEL", default = "info")]
    pub log_level: String,

    #[envconfig(from = "VAHTI_LOG_FORMAT", default = "pretty")]
    pub log_format: LogFormat,

    /// Status server bind address, `None` disables it
    #[envconfig(from = "VAHTI_STATUS_ADDR")]
    pub status_addr: Option<SocketAddr>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_interval_ms: 2000,
            recent_capacity: 50,
            queue_capacity: 256,
            channels: ChannelFlags::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            status_addr: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let config = Config::init_from_env().map_err(VahtiError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit set of variables
    ///
    /// Keys missing from `vars` take their defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let config = Config::init_from_hashmap(vars).map_err(VahtiError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Pause after each ingested message, per source
    pub fn event_interval(&self) -> Duration {
        Duration::from_millis(self.event_interval_ms)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(VahtiError::Config(
                "queue capacity must be greater than zero".to_string(),
            ));
        }
        if self.recent_capacity == 0 {
            return Err(VahtiError::Config(
                "recent-window capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
