//! This module builds the HTTP client used to talk to the engine.

mod client;

pub use client::{HttpClientError, create_http_client};
