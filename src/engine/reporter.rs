//! Reporting of per-setup test outcomes.

use std::io::IsTerminal;

#[cfg(test)]
use mockall::automock;

use super::runner::CaseError;
use crate::models::{ResultValue, TestCase, TestCaseSetup};

const PASS_COLOR: &str = "\x1b[1;32m";
const FAIL_COLOR: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// Receives the outcome of every setup as soon as it is known.
///
/// Implementations are called from concurrently running tasks.
#[cfg_attr(test, automock)]
pub trait TestReporter: Send + Sync {
    /// Reports the outcome of `setup`, which belongs to `test_case`.
    fn report(
        &self,
        test_case: &TestCase,
        setup: &TestCaseSetup,
        outcome: &Result<ResultValue, CaseError>,
    );
}

/// Prints outcomes to stdout, green for passes and red for failures.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    colored: bool,
}

impl ConsoleReporter {
    /// Colors output only when stdout is a terminal.
    pub fn new() -> Self {
        Self { colored: std::io::stdout().is_terminal() }
    }

    /// Creates a reporter with explicit coloring.
    pub fn with_color(colored: bool) -> Self {
        Self { colored }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.colored { format!("{color}{text}{RESET}") } else { text.to_string() }
    }

    /// Renders the lines printed for one outcome.
    pub fn render(
        &self,
        test_case: &TestCase,
        setup: &TestCaseSetup,
        outcome: &Result<ResultValue, CaseError>,
    ) -> String {
        match outcome {
            Ok(_) => self.paint(PASS_COLOR, &format!("Test Passed: {}", setup.description)),
            Err(e) => {
                let header = format!(
                    "{} \n TestCase Failed at {}",
                    setup.description,
                    test_case.path.display()
                );
                format!(
                    "{}\n{}",
                    self.paint(FAIL_COLOR, &header),
                    self.paint(FAIL_COLOR, &format!(" {e}"))
                )
            }
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TestReporter for ConsoleReporter {
    fn report(
        &self,
        test_case: &TestCase,
        setup: &TestCaseSetup,
        outcome: &Result<ResultValue, CaseError>,
    ) {
        // One call per outcome so lines from concurrent setups never interleave.
        println!("{}", self.render(test_case, setup, outcome));
    }
}
