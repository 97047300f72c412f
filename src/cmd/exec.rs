//! `plsd exec`: run a script once, or on every change of its files.

use std::path::PathBuf;

use clap::Parser;

use super::{
    CommandError, create_engine, read_script,
    watch::{FileWatcher, POLL_INTERVAL, shutdown_signal},
};
use crate::{
    config::{AppConfig, load_setup},
    engine::ScriptEngine,
    models::{ResultValue, TestCaseSetup},
};

/// Arguments of `plsd exec`.
#[derive(Parser, Debug)]
pub struct ExecArgs {
    /// JSON file with `index`, `params`, `document` and `context`. Without
    /// it the script runs in the `score` context against an empty document.
    #[arg(long)]
    context_file: Option<PathBuf>,
    /// Index whose mappings are used when no context file is given.
    #[arg(long, required_unless_present = "context_file")]
    index: Option<String>,
    /// Painless script file to run. Read from stdin when absent.
    #[arg(long)]
    script_file: Option<PathBuf>,
    /// Re-run whenever the script or context file changes.
    #[arg(long, requires = "script_file")]
    watch: bool,
}

impl ExecArgs {
    fn load_setup(&self) -> Result<TestCaseSetup, CommandError> {
        match &self.context_file {
            Some(path) => Ok(load_setup(path)?),
            None => Ok(TestCaseSetup::for_index(self.index.clone().unwrap_or_default())),
        }
    }

    fn watched_files(&self) -> Vec<PathBuf> {
        self.script_file.iter().chain(self.context_file.iter()).cloned().collect()
    }
}

/// Executes the script once and prints its result. With `--watch`, keeps
/// re-executing on file changes until interrupted; errors are then printed
/// instead of returned.
pub async fn execute(args: ExecArgs, config: &AppConfig) -> Result<(), CommandError> {
    let engine = create_engine(config)?;

    if !args.watch {
        let setup = args.load_setup()?;
        let script = read_script(args.script_file.as_deref())?;
        let response = engine.execute_script(&script, &setup).await?;
        println!("{}", ResultValue::from(&response.result));
        return Ok(());
    }

    let mut watcher = FileWatcher::new(args.watched_files(), POLL_INTERVAL);
    print_outcome(run_once(engine.as_ref(), &args).await);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = &mut shutdown => return result.map_err(CommandError::Signal),
            changed = watcher.changed() => {
                for path in changed {
                    println!("{} changed", path.display());
                }
                print_outcome(run_once(engine.as_ref(), &args).await);
            }
        }
    }
}

/// Reloads the setup and script, then executes.
async fn run_once(engine: &dyn ScriptEngine, args: &ExecArgs) -> Result<ResultValue, CommandError> {
    let setup = args.load_setup()?;
    let script = read_script(args.script_file.as_deref())?;
    let response = engine.execute_script(&script, &setup).await?;
    Ok(ResultValue::from(&response.result))
}

fn print_outcome(outcome: Result<ResultValue, CommandError>) {
    match outcome {
        Ok(result) => println!("{result}"),
        Err(e) => eprintln!("{e}"),
    }
}
