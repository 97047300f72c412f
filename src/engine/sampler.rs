//! Repeated profiled searches and timing extraction.

use std::{path::PathBuf, sync::Arc};

use engine_models::ProfiledSearchRequest;
use serde_json::Map;
use thiserror::Error;

use super::client::{ProfiledQuery, ScriptEngine};
use crate::config::{LoaderError, load_query, load_setup};

/// Errors that abort a sampling run before any trial is sent.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The query or context file could not be read or parsed.
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// Settings for one sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfConfig {
    /// JSON file holding the search `query` object.
    pub query_file: PathBuf,
    /// Optional setup file supplying the index and script parameters.
    pub context_file: Option<PathBuf>,
    /// Index to search; wins over the context file's index.
    pub index: Option<String>,
    /// Offset of the first hit.
    pub from: u64,
    /// Number of hits returned.
    pub size: u64,
    /// Search timeout, in the engine's duration syntax.
    pub timeout: String,
    /// Per-shard document limit.
    pub terminate_after: u64,
    /// Number of trials.
    pub repeat: u32,
    /// Dump the first trial's request and response.
    pub debug: bool,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            query_file: PathBuf::new(),
            context_file: None,
            index: None,
            from: 0,
            size: 100,
            timeout: "300ms".to_string(),
            terminate_after: 100_000,
            repeat: 10,
            debug: false,
        }
    }
}

/// Timings gathered by a sampling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerfSamples {
    /// Collector timings in nanoseconds, concatenated in trial order.
    pub timings: Vec<u64>,
    /// Trials that returned a profile.
    pub completed_trials: u32,
    /// Trials that failed and contributed no samples.
    pub skipped_trials: u32,
}

/// Drives repeated profiled searches through a [`ScriptEngine`].
pub struct PerformanceSampler {
    engine: Arc<dyn ScriptEngine>,
}

impl PerformanceSampler {
    /// Creates a new `PerformanceSampler`.
    pub fn new(engine: Arc<dyn ScriptEngine>) -> Self {
        Self { engine }
    }

    /// Loads the query and context files, then runs `config.repeat` trials
    /// of `script` sorted over the query's hits.
    #[tracing::instrument(
        skip(self, script, config),
        fields(query_file = %config.query_file.display())
    )]
    pub async fn sample(
        &self,
        script: &str,
        config: &PerfConfig,
    ) -> Result<PerfSamples, SamplerError> {
        let query_body = load_query(&config.query_file)?;

        let (context_index, params) = match &config.context_file {
            Some(path) => {
                let setup = load_setup(path)?;
                (setup.index, setup.params)
            }
            None => (String::new(), Map::new()),
        };
        let index = match &config.index {
            Some(index) if !index.is_empty() => index.clone(),
            _ => context_index,
        };

        let query = ProfiledQuery {
            index,
            body: ProfiledSearchRequest::new(
                query_body,
                script,
                params,
                config.from,
                config.size,
                &config.timeout,
                config.terminate_after,
            ),
            debug: config.debug,
        };

        Ok(self.sample_query(query, config.repeat).await)
    }

    /// Runs `repeat` trials of `query`. Only the first trial keeps the
    /// query's debug flag. Failed trials are skipped.
    pub async fn sample_query(&self, mut query: ProfiledQuery, repeat: u32) -> PerfSamples {
        let debug = query.debug;
        let mut samples = PerfSamples::default();

        for trial in 0..repeat {
            query.debug = debug && trial == 0;
            match self.engine.run_profiled_query(&query).await {
                Ok(profile) => {
                    let timings = profile.collector_timings();
                    tracing::debug!(trial, samples = timings.len(), "Trial completed.");
                    samples.timings.extend(timings);
                    samples.completed_trials += 1;
                }
                Err(e) => {
                    tracing::warn!(trial, error = %e, "Trial failed, skipping its samples.");
                    samples.skipped_trials += 1;
                }
            }
        }

        samples
    }
}
