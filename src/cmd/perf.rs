//! `plsd perf`: profile a script used as a sort over a query's hits.

use std::path::PathBuf;

use clap::Parser;

use super::{CommandError, create_engine, read_script};
use crate::{
    config::AppConfig,
    engine::{LatencySummary, PerfConfig, PerfSamples, PerformanceSampler},
};

/// Arguments of `plsd perf`.
#[derive(Parser, Debug)]
pub struct PerfArgs {
    /// JSON file holding the search `query` object.
    #[arg(long)]
    query_file: PathBuf,
    /// JSON file supplying the index and script `params`.
    #[arg(long)]
    context_file: Option<PathBuf>,
    /// Index to search; overrides the context file's index.
    #[arg(long)]
    index: Option<String>,
    /// Offset of the first hit.
    #[arg(long, default_value_t = 0)]
    from: u64,
    /// Number of hits returned.
    #[arg(long, default_value_t = 100)]
    size: u64,
    /// Search timeout.
    #[arg(long, default_value = "300ms")]
    timeout: String,
    /// Maximum number of documents collected per shard.
    #[arg(long, default_value_t = 100_000)]
    terminate_after: u64,
    /// Number of trials.
    #[arg(long, default_value_t = 10)]
    repeat: u32,
    /// Print the first trial's request and response to stderr.
    #[arg(long)]
    debug: bool,
}

impl From<PerfArgs> for PerfConfig {
    fn from(args: PerfArgs) -> Self {
        Self {
            query_file: args.query_file,
            context_file: args.context_file,
            index: args.index,
            from: args.from,
            size: args.size,
            timeout: args.timeout,
            terminate_after: args.terminate_after,
            repeat: args.repeat,
            debug: args.debug,
        }
    }
}

/// Samples the script read from stdin and prints the latency summary.
pub async fn execute(args: PerfArgs, config: &AppConfig) -> Result<(), CommandError> {
    let script = read_script(None)?;
    let perf_config = PerfConfig::from(args);

    let sampler = PerformanceSampler::new(create_engine(config)?);
    let samples = sampler.sample(&script, &perf_config).await?;

    println!("{}", render_report(&samples));
    Ok(())
}

/// The text printed for a finished sampling run.
pub fn render_report(samples: &PerfSamples) -> String {
    let mut report = match LatencySummary::from_samples(&samples.timings) {
        Some(summary) => summary.to_string(),
        None => "No timing samples collected.".to_string(),
    };
    if samples.skipped_trials > 0 {
        let total = samples.completed_trials + samples.skipped_trials;
        report.push_str(&format!(
            "\n{} of {} trials failed and were skipped.",
            samples.skipped_trials, total
        ));
    }
    report
}
