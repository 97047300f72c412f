use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use url::Url;

use super::{BaseHttpClientConfig, HttpRetryConfig, deserialize_url};

/// Default location of the Painless `_execute` API on a local node.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200/_scripts/painless/_execute";

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

/// Application configuration for plsd.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Script `_execute` endpoint of the engine. Profiled searches are sent to
    /// the root of the same host.
    #[serde(default = "default_endpoint", deserialize_with = "deserialize_url")]
    pub endpoint: Url,

    /// Retry policy for engine requests.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,

    /// Configuration for the base HTTP client.
    #[serde(default)]
    pub http_base_config: BaseHttpClientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            http_retry_config: HttpRetryConfig::default(),
            http_base_config: BaseHttpClientConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` from `<config_dir>/plsd.yaml`, if present,
    /// overlaid with `PLSD__*` environment variables.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = Path::new(config_dir.unwrap_or("."));
        let config_file = config_dir.join("plsd.yaml");

        let s = Config::builder()
            .add_source(File::from(config_file).required(false))
            .add_source(Environment::with_prefix("PLSD").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    /// Replaces the configured endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }
}
