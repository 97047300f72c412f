//! Subcommands of the `plsd` binary.

pub mod exec;
pub mod perf;
pub mod watch;

use std::{
    io::{self, Read},
    path::Path,
    sync::Arc,
};

pub use exec::ExecArgs;
pub use perf::PerfArgs;
pub use test::TestArgs;
use thiserror::Error;

use crate::{
    config::{AppConfig, LoaderError},
    engine::{EngineClient, EngineClientError, SamplerError},
    http_client::{HttpClientError, create_http_client},
};

/// Errors surfaced by the subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The script could not be read.
    #[error("Failed to read script from {origin}: {source}")]
    ScriptRead {
        /// The file the script was read from, or `stdin`.
        origin: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration could not be loaded.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    /// A setup, test or query file could not be loaded.
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    HttpClient(#[from] HttpClientError),

    /// The engine call failed.
    #[error(transparent)]
    Engine(#[from] EngineClientError),

    /// The sampling run could not start.
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// A shutdown signal handler could not be installed.
    #[error("Failed to listen for shutdown signals: {0}")]
    Signal(#[source] io::Error),
}

/// Reads the script from `path`, or from stdin when no path is given. The
/// text is returned verbatim.
pub fn read_script(path: Option<&Path>) -> Result<String, CommandError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CommandError::ScriptRead {
            origin: path.display().to_string(),
            source,
        }),
        None => {
            let mut script = String::new();
            io::stdin().read_to_string(&mut script).map_err(|source| {
                CommandError::ScriptRead { origin: "stdin".to_string(), source }
            })?;
            Ok(script)
        }
    }
}

/// Builds the engine client described by `config`.
pub fn create_engine(config: &AppConfig) -> Result<Arc<EngineClient>, CommandError> {
    let http_client = create_http_client(&config.http_base_config, &config.http_retry_config)?;
    tracing::debug!(
        endpoint = %config.endpoint,
        retry_policy = ?config.http_retry_config,
        "Engine client configured."
    );
    Ok(Arc::new(EngineClient::new(Arc::new(http_client), config.endpoint.clone())?))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use url::Url;

    use super::*;

    #[test]
    fn test_read_script_from_file_is_verbatim() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "\nreturn params.x;\n").unwrap();

        let script = read_script(Some(file.path())).unwrap();

        assert_eq!(script, "\nreturn params.x;\n");
    }

    #[test]
    fn test_read_script_missing_file() {
        let err = read_script(Some(Path::new("/nonexistent/script.painless"))).unwrap_err();

        assert!(matches!(err, CommandError::ScriptRead { .. }));
        assert!(err.to_string().contains("/nonexistent/script.painless"));
    }

    #[test]
    fn test_create_engine_rejects_unusable_endpoint() {
        let config =
            AppConfig::default().with_endpoint(Url::parse("mailto:ops@example.com").unwrap());

        let err = create_engine(&config).err().unwrap();

        assert!(matches!(err, CommandError::Engine(EngineClientError::InvalidEndpoint(_))));
    }

    #[test]
    fn test_engine_error_display_keeps_body_lines() {
        let body = "{\n  \"error\": {\n    \"type\": \"script_exception\"\n  }\n}";
        let err = CommandError::from(EngineClientError::Remote {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: body.to_string(),
        });

        let text = err.to_string();

        assert!(text.starts_with("Engine responded with 400 Bad Request:\n"));
        assert!(text.ends_with(body));
        assert!(!text.contains("\\n"));
    }

    #[test]
    fn test_create_engine_default_config() {
        let engine = create_engine(&AppConfig::default()).unwrap();

        assert_eq!(engine.endpoint().as_str(), crate::config::DEFAULT_ENDPOINT);
    }
}
