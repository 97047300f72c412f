use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds, serialize_duration_to_ms,
    serialize_duration_to_seconds,
};

// Requests to the engine are not retried unless a policy is configured.
fn default_max_retries() -> u32 {
    0
}

fn default_initial_backoff_ms() -> Duration {
    Duration::from_millis(250)
}

fn default_max_backoff_secs() -> Duration {
    Duration::from_secs(10)
}

fn default_base_for_backoff() -> u32 {
    2
}

/// Serializable setting for jitter in retry policies
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JitterSetting {
    /// No jitter applied to the backoff duration
    None,
    /// Full jitter applied, randomizing the backoff duration
    #[default]
    Full,
}

/// Retry policy for requests sent to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HttpRetryConfig {
    /// Maximum number of retries for transient errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base duration for exponential backoff calculations
    #[serde(default = "default_base_for_backoff")]
    pub base_for_backoff: u32,
    /// Initial backoff duration before the first retry
    #[serde(
        default = "default_initial_backoff_ms",
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub initial_backoff_ms: Duration,
    /// Maximum backoff duration for retries
    #[serde(
        default = "default_max_backoff_secs",
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds"
    )]
    pub max_backoff_secs: Duration,
    /// Jitter to apply to the backoff duration
    #[serde(default)]
    pub jitter: JitterSetting,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_for_backoff: default_base_for_backoff(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            jitter: JitterSetting::default(),
        }
    }
}
