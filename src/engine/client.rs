//! Client for the engine's script `_execute` and profiled `_search` APIs.

use std::sync::Arc;

use async_trait::async_trait;
use engine_models::{ProfiledSearchRequest, ScriptResponse};
#[cfg(test)]
use mockall::automock;
use reqwest::{Method, StatusCode};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::models::{ProfileResponse, TestCaseSetup};

/// Errors that can occur when talking to the engine.
#[derive(Debug, Error)]
pub enum EngineClientError {
    /// The request could not be sent or its response could not be read.
    #[error("Request to engine failed: {0}")]
    Request(#[from] reqwest_middleware::Error),

    /// The engine answered with a non-success status. `body` is the
    /// pretty-printed response body.
    #[error("Engine responded with {status}:\n{body}")]
    Remote {
        /// HTTP status returned by the engine.
        status: StatusCode,
        /// Pretty-printed response body.
        body: String,
    },

    /// The response body is not the expected JSON.
    #[error("Failed to decode engine response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured endpoint cannot be used to derive request URLs.
    #[error("Invalid engine endpoint: {0}")]
    InvalidEndpoint(String),
}

/// A profiled search against one index.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfiledQuery {
    /// Target index; empty searches every index.
    pub index: String,
    /// Request body.
    pub body: ProfiledSearchRequest,
    /// Dump the request and response bodies to stderr.
    pub debug: bool,
}

/// Operations the harness needs from the engine.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScriptEngine: Send + Sync {
    /// Evaluates `script` against the setup's document and parameters.
    async fn execute_script(
        &self,
        script: &str,
        setup: &TestCaseSetup,
    ) -> Result<ScriptResponse, EngineClientError>;

    /// Runs a profiled search and returns its profile.
    async fn run_profiled_query(
        &self,
        query: &ProfiledQuery,
    ) -> Result<ProfileResponse, EngineClientError>;
}

/// HTTP implementation of [`ScriptEngine`].
pub struct EngineClient {
    http_client: Arc<ClientWithMiddleware>,
    /// The script `_execute` endpoint.
    endpoint: Url,
    /// `scheme://host[:port]/` of the endpoint, where searches are sent.
    search_root: Url,
}

impl EngineClient {
    /// Creates a client for `endpoint`, which must be a hierarchical URL such
    /// as `http://localhost:9200/_scripts/painless/_execute`.
    pub fn new(
        http_client: Arc<ClientWithMiddleware>,
        endpoint: Url,
    ) -> Result<Self, EngineClientError> {
        if endpoint.cannot_be_a_base() || endpoint.host_str().is_none() {
            return Err(EngineClientError::InvalidEndpoint(endpoint.to_string()));
        }

        let mut search_root = endpoint.clone();
        search_root.set_path("/");
        search_root.set_query(None);
        search_root.set_fragment(None);

        Ok(Self { http_client, endpoint, search_root })
    }

    /// The script `_execute` endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The `_search` URL for `index`.
    pub fn search_url(&self, index: &str) -> Result<Url, EngineClientError> {
        self.search_root
            .join(&format!("{index}/_search"))
            .map_err(|e| EngineClientError::InvalidEndpoint(format!("{}: {e}", self.search_root)))
    }
}

/// Indents a JSON body for display, falling back to the raw text when the
/// body is not JSON.
pub fn pretty_body(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

#[async_trait]
impl ScriptEngine for EngineClient {
    #[tracing::instrument(skip(self, script, setup), fields(index = %setup.index))]
    async fn execute_script(
        &self,
        script: &str,
        setup: &TestCaseSetup,
    ) -> Result<ScriptResponse, EngineClientError> {
        let request = setup.to_request(script);

        let response = self.http_client.post(self.endpoint.clone()).json(&request).send().await?;
        let status = response.status();
        let body = response.bytes().await.map_err(reqwest_middleware::Error::from)?;

        if status != StatusCode::OK {
            tracing::debug!(%status, "Script execution rejected by engine.");
            return Err(EngineClientError::Remote { status, body: pretty_body(&body) });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    #[tracing::instrument(skip(self, query), fields(index = %query.index))]
    async fn run_profiled_query(
        &self,
        query: &ProfiledQuery,
    ) -> Result<ProfileResponse, EngineClientError> {
        let url = self.search_url(&query.index)?;

        if query.debug {
            eprintln!("{}", serde_json::to_string_pretty(&query.body)?);
        }

        let response = self.http_client.request(Method::GET, url).json(&query.body).send().await?;
        let status = response.status();
        let body = response.bytes().await.map_err(reqwest_middleware::Error::from)?;

        if query.debug {
            eprintln!("{}", pretty_body(&body));
        }

        if !status.is_success() {
            return Err(EngineClientError::Remote { status, body: pretty_body(&body) });
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(body = %pretty_body(&body), "Search response has no readable profile.");
            EngineClientError::Decode(e)
        })
    }
}
