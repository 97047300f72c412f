//! Wire models exchanged between the harness and the Elasticsearch Painless
//! endpoints.

mod execute;
mod search;

pub use execute::{ContextSetup, ExecutionContext, Script, ScriptRequest, ScriptResponse};
pub use search::{
    Collector, ProfileResponse, ProfileSection, ProfiledSearchRequest, ScriptSort, Search, Shard,
    SortScript, SortScriptSource, SourceFilter,
};
