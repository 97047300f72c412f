//! This module provides functionality to create an HTTP client with
//! middleware for retrying transient errors, such as network issues or rate
//! limiting, when a retry policy is configured.

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{Jitter, RetryTransientMiddleware, policies::ExponentialBackoff};
use thiserror::Error;

use crate::config::{BaseHttpClientConfig, HttpRetryConfig, JitterSetting};

/// Errors that can occur while building the HTTP client.
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// An error occurred while building the underlying `reqwest::Client`.
    #[error("Failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Creates the HTTP client used for engine requests.
///
/// The retry middleware is only installed when `retry_config` allows at least
/// one retry.
pub fn create_http_client(
    base_config: &BaseHttpClientConfig,
    retry_config: &HttpRetryConfig,
) -> Result<ClientWithMiddleware, HttpClientError> {
    let base_client = reqwest::Client::builder()
        .pool_max_idle_per_host(base_config.max_idle_per_host)
        .pool_idle_timeout(Some(base_config.idle_timeout))
        .build()?;

    let builder = ClientBuilder::new(base_client);
    if retry_config.max_retries == 0 {
        return Ok(builder.build());
    }

    Ok(builder.with(retry_middleware(retry_config)).build())
}

/// Exponential backoff retries of transient failures (connection errors,
/// timeouts, 5xx and 429 responses).
fn retry_middleware(config: &HttpRetryConfig) -> RetryTransientMiddleware<ExponentialBackoff> {
    let jitter = match config.jitter {
        JitterSetting::None => Jitter::None,
        JitterSetting::Full => Jitter::Full,
    };

    let policy = ExponentialBackoff::builder()
        .jitter(jitter)
        .base(config.base_for_backoff)
        .retry_bounds(config.initial_backoff_ms, config.max_backoff_secs)
        .build_with_max_retries(config.max_retries);

    RetryTransientMiddleware::new_with_policy(policy)
}
