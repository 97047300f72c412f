use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plsd::{
    cmd::{CommandError, ExecArgs, PerfArgs, TestArgs, exec, perf, test},
    config::AppConfig,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script `_execute` endpoint of the engine; overrides the configuration.
    #[arg(long, global = true)]
    endpoint: Option<Url>,
    /// Directory containing `plsd.yaml`.
    #[arg(long, global = true)]
    config_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Executes a Painless script and prints its result.
    Exec(ExecArgs),
    /// Runs a test file against a script read from stdin.
    Test(TestArgs),
    /// Profiles a script read from stdin as a sort over a query's hits.
    Perf(PerfArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber =
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CommandError> {
    let mut config = AppConfig::new(cli.config_dir.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config = config.with_endpoint(endpoint);
    }
    tracing::debug!(endpoint = %config.endpoint, "Configuration loaded.");

    match cli.command {
        Commands::Exec(args) => exec::execute(args, &config).await?,
        Commands::Test(args) => {
            let failed = test::execute(args, &config).await?;
            return Ok(ExitCode::from(test::exit_status(failed)));
        }
        Commands::Perf(args) => perf::execute(args, &config).await?,
    }

    Ok(ExitCode::SUCCESS)
}
