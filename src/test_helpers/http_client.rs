use std::sync::Arc;

use reqwest_middleware::ClientWithMiddleware;

use crate::{
    config::{BaseHttpClientConfig, HttpRetryConfig},
    http_client::create_http_client,
};

/// Creates an HTTP client with default settings for testing purposes.
///
/// Requests are not retried, so every mocked response is observed exactly once.
pub fn create_test_http_client() -> Arc<ClientWithMiddleware> {
    let client =
        create_http_client(&BaseHttpClientConfig::default(), &HttpRetryConfig::default())
            .expect("default HTTP client should build");
    Arc::new(client)
}
