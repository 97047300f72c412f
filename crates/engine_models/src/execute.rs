use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The semantic mode a script is evaluated in by the `_execute` endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    /// The script contributes to a relevance score.
    #[default]
    Score,
    /// The script acts as a boolean filter.
    Filter,
}

impl ExecutionContext {
    /// The name the engine uses for this context.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::Score => "score",
            ExecutionContext::Filter => "filter",
        }
    }
}

/// Request payload for the script `_execute` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRequest {
    /// The script source and its parameters.
    pub script: Script,
    /// The index and sample document the script runs against.
    pub context_setup: ContextSetup,
    /// The execution context.
    pub context: ExecutionContext,
}

/// Script body of a [`ScriptRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Painless source text.
    pub source: String,
    /// Named parameters visible to the script as `params`.
    pub params: Map<String, Value>,
}

/// Index and document setup of a [`ScriptRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSetup {
    /// Index whose mappings are used to interpret the document.
    pub index: String,
    /// The sample document.
    pub document: Map<String, Value>,
}

/// Response payload of a successful script execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptResponse {
    /// The value the script returned.
    pub result: Value,
}
