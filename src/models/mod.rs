//! Data models used by the harness.

mod result_value;
mod test_case;

pub use engine_models::{ExecutionContext, ProfileResponse, ScriptRequest, ScriptResponse};
pub use result_value::ResultValue;
pub use test_case::{TestCase, TestCaseSetup};
