use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{deserialize_duration_from_seconds, serialize_duration_to_seconds};

fn default_idle_per_host() -> usize {
    10
}

fn default_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

/// Connection pooling settings for the base HTTP client.
///
/// No request timeout is applied; the only deadline on a query is the
/// engine-side `timeout` sent in the request body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BaseHttpClientConfig {
    /// Maximum idle connections per host
    #[serde(default = "default_idle_per_host")]
    pub max_idle_per_host: usize,

    /// Timeout for idle connections
    #[serde(
        default = "default_idle_timeout",
        deserialize_with = "deserialize_duration_from_seconds",
        serialize_with = "serialize_duration_to_seconds"
    )]
    pub idle_timeout: Duration,
}

impl Default for BaseHttpClientConfig {
    fn default() -> Self {
        Self { max_idle_per_host: default_idle_per_host(), idle_timeout: default_idle_timeout() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_http_client_config_default() {
        let config = BaseHttpClientConfig::default();
        assert_eq!(config.max_idle_per_host, 10);
        assert_eq!(config.idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_base_http_client_config_partial_json_uses_defaults() {
        let config: BaseHttpClientConfig =
            serde_json::from_str(r#"{"max_idle_per_host": 32}"#).unwrap();
        assert_eq!(config.max_idle_per_host, 32);
        assert_eq!(config.idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config =
            BaseHttpClientConfig { max_idle_per_host: 4, idle_timeout: Duration::from_secs(5) };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: BaseHttpClientConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}
