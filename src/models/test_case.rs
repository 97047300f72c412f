use std::path::PathBuf;

use engine_models::{ContextSetup, ExecutionContext, Script, ScriptRequest};
use serde::{
    Deserialize, Deserializer, Serialize,
    de::{IntoDeserializer, value::StrDeserializer},
};
use serde_json::{Map, Value};

/// One scenario a script is evaluated in: where it runs, with what input, and
/// what it should return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCaseSetup {
    /// Index whose mappings are used to interpret the document.
    #[serde(default)]
    pub index: String,
    /// Named parameters passed to the script.
    #[serde(default)]
    pub params: Map<String, Value>,
    /// The sample document.
    #[serde(default)]
    pub document: Map<String, Value>,
    /// The value the script is expected to return.
    #[serde(default)]
    pub expected_result: Value,
    /// Human readable description printed with the outcome.
    #[serde(default)]
    pub description: String,
    /// Execution context; `score` when unset.
    #[serde(default, deserialize_with = "deserialize_optional_context")]
    pub context: Option<ExecutionContext>,
}

/// An empty string is treated the same as a missing context.
fn deserialize_optional_context<'de, D>(
    deserializer: D,
) -> Result<Option<ExecutionContext>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(name) => {
            let name: StrDeserializer<'_, D::Error> = name.into_deserializer();
            ExecutionContext::deserialize(name).map(Some)
        }
    }
}

impl TestCaseSetup {
    /// Creates a setup that runs a script against an empty document of
    /// `index` in the `score` context.
    pub fn for_index(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            context: Some(ExecutionContext::Score),
            ..Default::default()
        }
    }

    /// The execution context, defaulting to `score`.
    pub fn execution_context(&self) -> ExecutionContext {
        self.context.unwrap_or_default()
    }

    /// Builds the `_execute` request for `script` under this setup.
    pub fn to_request(&self, script: &str) -> ScriptRequest {
        ScriptRequest {
            script: Script { source: script.to_string(), params: self.params.clone() },
            context_setup: ContextSetup {
                index: self.index.clone(),
                document: self.document.clone(),
            },
            context: self.execution_context(),
        }
    }
}

/// A script together with the setups it is tested against.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// The file the setups were loaded from, for diagnostics.
    pub path: PathBuf,
    /// Script source under test.
    pub script: String,
    /// Setups in file order.
    pub setups: Vec<TestCaseSetup>,
}

impl TestCase {
    /// Creates a test case for `script` loaded from `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        script: impl Into<String>,
        setups: Vec<TestCaseSetup>,
    ) -> Self {
        Self { path: path.into(), script: script.into(), setups }
    }
}
