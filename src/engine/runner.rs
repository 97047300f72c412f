//! Runs every setup of a test case against its script and counts failures.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use thiserror::Error;
use tokio::task::JoinSet;

use super::{
    client::{EngineClientError, ScriptEngine},
    reporter::TestReporter,
    verifier::{VerificationError, verify},
};
use crate::models::{ResultValue, TestCase, TestCaseSetup};

/// How the setups of a test case are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One setup at a time, in file order.
    #[default]
    Sequential,
    /// One task per setup, all in flight at once.
    Concurrent,
}

/// Why a setup failed.
#[derive(Debug, Error)]
pub enum CaseError {
    /// The script could not be executed.
    #[error(transparent)]
    Engine(#[from] EngineClientError),

    /// The script ran but its result did not verify.
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Executes test cases and reports each setup's outcome.
pub struct TestCaseRunner {
    engine: Arc<dyn ScriptEngine>,
    reporter: Arc<dyn TestReporter>,
}

impl TestCaseRunner {
    /// Creates a new `TestCaseRunner`.
    pub fn new(engine: Arc<dyn ScriptEngine>, reporter: Arc<dyn TestReporter>) -> Self {
        Self { engine, reporter }
    }

    /// Runs every setup of `test_case` and returns how many failed.
    ///
    /// A failing setup never stops the others. In concurrent mode this
    /// returns only after every setup has finished.
    #[tracing::instrument(
        skip(self, test_case),
        fields(path = %test_case.path.display(), setups = test_case.setups.len())
    )]
    pub async fn run(&self, test_case: Arc<TestCase>, mode: ExecutionMode) -> u32 {
        let failed = match mode {
            ExecutionMode::Sequential => self.run_sequential(&test_case).await,
            ExecutionMode::Concurrent => self.run_concurrent(test_case).await,
        };
        tracing::debug!(failed, "Test case finished.");
        failed
    }

    async fn run_sequential(&self, test_case: &TestCase) -> u32 {
        let mut failed = 0;
        for setup in &test_case.setups {
            let outcome = run_setup(self.engine.as_ref(), &test_case.script, setup).await;
            self.reporter.report(test_case, setup, &outcome);
            if outcome.is_err() {
                failed += 1;
            }
        }
        failed
    }

    async fn run_concurrent(&self, test_case: Arc<TestCase>) -> u32 {
        let failed = Arc::new(AtomicU32::new(0));
        let mut tasks = JoinSet::new();

        for index in 0..test_case.setups.len() {
            let engine = Arc::clone(&self.engine);
            let reporter = Arc::clone(&self.reporter);
            let test_case = Arc::clone(&test_case);
            let failed = Arc::clone(&failed);

            tasks.spawn(async move {
                let setup = &test_case.setups[index];
                let outcome = run_setup(engine.as_ref(), &test_case.script, setup).await;
                reporter.report(&test_case, setup, &outcome);
                if outcome.is_err() {
                    failed.fetch_add(1, Ordering::SeqCst);
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "Setup task did not complete, counting it as failed.");
                failed.fetch_add(1, Ordering::SeqCst);
            }
        }

        failed.load(Ordering::SeqCst)
    }
}

/// Executes `script` under `setup` and verifies the result against the
/// setup's expected value.
pub async fn run_setup(
    engine: &dyn ScriptEngine,
    script: &str,
    setup: &TestCaseSetup,
) -> Result<ResultValue, CaseError> {
    let response = engine.execute_script(script, setup).await?;
    let actual = ResultValue::from(&response.result);
    verify(&actual, &setup.expected_result)?;
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use engine_models::ScriptResponse;
    use reqwest::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        engine::{client::MockScriptEngine, reporter::MockTestReporter},
        test_helpers::TestCaseSetupBuilder,
    };

    /// Engine that echoes the `answer` parameter back as the result, or fails
    /// with a remote error when the parameter is missing.
    fn create_echo_engine() -> MockScriptEngine {
        let mut engine = MockScriptEngine::new();
        engine.expect_execute_script().returning(|_, setup| match setup.params.get("answer") {
            Some(answer) => Ok(ScriptResponse { result: answer.clone() }),
            None => Err(EngineClientError::Remote {
                status: StatusCode::BAD_REQUEST,
                body: "{\n  \"error\": \"missing answer\"\n}".to_string(),
            }),
        });
        engine
    }

    fn setup(description: &str, answer: Option<Value>, expected: Value) -> TestCaseSetup {
        let builder = TestCaseSetupBuilder::new().description(description).expected(expected);
        match answer {
            Some(answer) => builder.param("answer", answer).build(),
            None => builder.build(),
        }
    }

    /// Six setups, three of which fail: a mismatch, a type error and an
    /// engine error.
    fn create_mixed_test_case() -> Arc<TestCase> {
        Arc::new(TestCase::new(
            "tests/mixed.json",
            "params.answer",
            vec![
                setup("float passes", Some(json!(1.000001)), json!(1.0)),
                setup("float mismatch", Some(json!(1.5)), json!(1.0)),
                setup("text passes", Some(json!("ok")), json!("ok")),
                setup("type error", Some(json!(true)), json!("true")),
                setup("engine error", None, json!(1)),
                setup("integer passes", Some(json!(3)), json!(3)),
            ],
        ))
    }

    fn create_counting_reporter(expected_calls: usize) -> MockTestReporter {
        let mut reporter = MockTestReporter::new();
        reporter.expect_report().times(expected_calls).return_const(());
        reporter
    }

    #[tokio::test]
    async fn test_run_sequential_counts_failures() {
        let runner = TestCaseRunner::new(
            Arc::new(create_echo_engine()),
            Arc::new(create_counting_reporter(6)),
        );

        let failed = runner.run(create_mixed_test_case(), ExecutionMode::Sequential).await;

        assert_eq!(failed, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_run_concurrent_counts_failures_repeatedly() {
        for _ in 0..20 {
            let runner = TestCaseRunner::new(
                Arc::new(create_echo_engine()),
                Arc::new(create_counting_reporter(6)),
            );

            let failed = runner.run(create_mixed_test_case(), ExecutionMode::Concurrent).await;

            assert_eq!(failed, 3);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_and_sequential_agree_on_many_setups() {
        let setups = (0..200)
            .map(|i| {
                let expected = if i % 7 == 0 { json!(i + 1) } else { json!(i) };
                setup(&format!("case {i}"), Some(json!(i)), expected)
            })
            .collect();
        let test_case = Arc::new(TestCase::new("tests/many.json", "params.answer", setups));

        let sequential = TestCaseRunner::new(
            Arc::new(create_echo_engine()),
            Arc::new(create_counting_reporter(200)),
        )
        .run(Arc::clone(&test_case), ExecutionMode::Sequential)
        .await;
        let concurrent = TestCaseRunner::new(
            Arc::new(create_echo_engine()),
            Arc::new(create_counting_reporter(200)),
        )
        .run(test_case, ExecutionMode::Concurrent)
        .await;

        assert_eq!(sequential, 29);
        assert_eq!(concurrent, sequential);
    }

    #[tokio::test]
    async fn test_run_sequential_reports_in_file_order() {
        let mut reporter = MockTestReporter::new();
        let mut sequence = mockall::Sequence::new();
        for description in ["float passes", "float mismatch", "text passes"] {
            reporter
                .expect_report()
                .withf(move |_, setup, _| setup.description == description)
                .times(1)
                .in_sequence(&mut sequence)
                .return_const(());
        }
        let test_case = Arc::new(TestCase::new(
            "tests/ordered.json",
            "params.answer",
            create_mixed_test_case().setups[..3].to_vec(),
        ));

        let runner = TestCaseRunner::new(Arc::new(create_echo_engine()), Arc::new(reporter));
        let failed = runner.run(test_case, ExecutionMode::Sequential).await;

        assert_eq!(failed, 1);
    }

    #[tokio::test]
    async fn test_run_reports_failure_details() {
        let mut reporter = MockTestReporter::new();
        reporter
            .expect_report()
            .withf(|test_case, setup, outcome| {
                test_case.path.ends_with("mixed.json")
                    && setup.description == "engine error"
                    && matches!(outcome, Err(CaseError::Engine(_)))
                    && outcome.as_ref().unwrap_err().to_string().contains("missing answer")
            })
            .times(1)
            .return_const(());
        reporter.expect_report().times(5).return_const(());

        let runner = TestCaseRunner::new(Arc::new(create_echo_engine()), Arc::new(reporter));
        let failed = runner.run(create_mixed_test_case(), ExecutionMode::Concurrent).await;

        assert_eq!(failed, 3);
    }

    #[tokio::test]
    async fn test_run_empty_test_case() {
        let mut engine = MockScriptEngine::new();
        engine.expect_execute_script().times(0);
        let runner = TestCaseRunner::new(Arc::new(engine), Arc::new(create_counting_reporter(0)));
        let test_case = Arc::new(TestCase::new("tests/empty.json", "1", vec![]));

        assert_eq!(runner.run(Arc::clone(&test_case), ExecutionMode::Sequential).await, 0);
        assert_eq!(runner.run(test_case, ExecutionMode::Concurrent).await, 0);
    }

    #[tokio::test]
    async fn test_run_setup_returns_actual_value() {
        let engine = create_echo_engine();
        let setup = setup("ok", Some(json!(2.5)), json!(2.5));

        let actual = run_setup(&engine, "params.answer", &setup).await.unwrap();

        assert_eq!(actual, ResultValue::Number(2.5));
    }
}
