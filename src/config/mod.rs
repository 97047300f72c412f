//! Configuration module for plsd.

mod app_config;
mod helpers;
mod http_base;
mod http_retry;
mod loader;

pub use app_config::{AppConfig, DEFAULT_ENDPOINT};
pub use helpers::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds, deserialize_url,
    serialize_duration_to_ms, serialize_duration_to_seconds,
};
pub use http_base::BaseHttpClientConfig;
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use loader::{JsonFileLoader, LoaderError, load_query, load_setup, load_setups};
