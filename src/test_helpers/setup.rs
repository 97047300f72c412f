//! A builder for creating `TestCaseSetup` instances in tests.

use serde_json::{Map, Value};

use crate::models::{ExecutionContext, TestCaseSetup};

/// A builder for creating `TestCaseSetup` instances in tests.
pub struct TestCaseSetupBuilder {
    index: String,
    params: Map<String, Value>,
    document: Map<String, Value>,
    expected_result: Value,
    description: String,
    context: Option<ExecutionContext>,
}

impl Default for TestCaseSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCaseSetupBuilder {
    /// Creates a new `TestCaseSetupBuilder` instance.
    pub fn new() -> Self {
        TestCaseSetupBuilder {
            index: "test-index".to_string(),
            params: Map::new(),
            document: Map::new(),
            expected_result: Value::Null,
            description: "test setup".to_string(),
            context: None,
        }
    }

    /// Sets the index for the setup.
    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    /// Adds a script parameter.
    pub fn param(mut self, name: &str, value: Value) -> Self {
        self.params.insert(name.to_string(), value);
        self
    }

    /// Adds a field to the sample document.
    pub fn document_field(mut self, name: &str, value: Value) -> Self {
        self.document.insert(name.to_string(), value);
        self
    }

    /// Sets the expected result.
    pub fn expected(mut self, expected: Value) -> Self {
        self.expected_result = expected;
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the execution context.
    pub fn context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Builds the `TestCaseSetup` instance.
    pub fn build(self) -> TestCaseSetup {
        TestCaseSetup {
            index: self.index,
            params: self.params,
            document: self.document,
            expected_result: self.expected_result,
            description: self.description,
            context: self.context,
        }
    }
}
