use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SCRIPT_LANG: &str = "painless";
const SORT_TYPE_NUMBER: &str = "number";
const SORT_ORDER_DESC: &str = "desc";

/// Body of a profiled `_search` request whose hits are sorted by a script.
///
/// Sorting by the script forces the engine to run it once for every matched
/// document, and `_source` is excluded entirely since only the timings matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfiledSearchRequest {
    pub from: u64,
    pub size: u64,
    pub timeout: String,
    pub terminate_after: u64,
    pub profile: bool,
    pub query: Map<String, Value>,
    pub sort: ScriptSort,
    #[serde(rename = "_source")]
    pub source: SourceFilter,
}

impl ProfiledSearchRequest {
    /// Builds a profiled request sorting descending on the numeric output of
    /// `script_source`.
    pub fn new(
        query: Map<String, Value>,
        script_source: &str,
        params: Map<String, Value>,
        from: u64,
        size: u64,
        timeout: &str,
        terminate_after: u64,
    ) -> Self {
        Self {
            from,
            size,
            timeout: timeout.to_string(),
            terminate_after,
            profile: true,
            query,
            sort: ScriptSort {
                script: SortScript {
                    sort_type: SORT_TYPE_NUMBER.to_string(),
                    script: SortScriptSource {
                        lang: SCRIPT_LANG.to_string(),
                        source: script_source.to_string(),
                        params,
                    },
                    order: SORT_ORDER_DESC.to_string(),
                },
            },
            source: SourceFilter { excludes: vec!["*".to_string()] },
        }
    }
}

/// `sort` clause wrapping a `_script` sort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptSort {
    #[serde(rename = "_script")]
    pub script: SortScript,
}

/// A script-based sort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortScript {
    #[serde(rename = "type")]
    pub sort_type: String,
    pub script: SortScriptSource,
    pub order: String,
}

/// The script run by a [`SortScript`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortScriptSource {
    pub lang: String,
    pub source: String,
    pub params: Map<String, Value>,
}

/// `_source` filtering clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFilter {
    pub excludes: Vec<String>,
}

/// The part of a `_search` response this harness reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub hits: Option<Value>,
    pub profile: ProfileSection,
}

/// Profiling results, one entry per shard.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileSection {
    #[serde(default)]
    pub shards: Vec<Shard>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Shard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub searches: Vec<Search>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Search {
    #[serde(default, rename = "collector")]
    pub collectors: Vec<Collector>,
}

/// A top-level collector and the time it spent, in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Collector {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reason: String,
    pub time_in_nanos: u64,
}

impl ProfileResponse {
    /// Flattens every collector timing, in shard, search and collector order.
    pub fn collector_timings(&self) -> Vec<u64> {
        self.profile
            .shards
            .iter()
            .flat_map(|shard| shard.searches.iter())
            .flat_map(|search| search.collectors.iter())
            .map(|collector| collector.time_in_nanos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_profiled_search_request_wire_shape() {
        let query = json!({"match_all": {}}).as_object().cloned().unwrap();
        let params = json!({"factor": 1.5}).as_object().cloned().unwrap();
        let request =
            ProfiledSearchRequest::new(query, "doc['price'].value", params, 0, 100, "300ms", 1000);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "from": 0,
                "size": 100,
                "timeout": "300ms",
                "terminate_after": 1000,
                "profile": true,
                "query": {"match_all": {}},
                "sort": {
                    "_script": {
                        "type": "number",
                        "script": {
                            "lang": "painless",
                            "source": "doc['price'].value",
                            "params": {"factor": 1.5}
                        },
                        "order": "desc"
                    }
                },
                "_source": {"excludes": ["*"]}
            })
        );
    }

    #[test]
    fn test_collector_timings_preserve_nesting_order() {
        let body = json!({
            "hits": {"total": {"value": 2}},
            "profile": {
                "shards": [
                    {
                        "id": "[node][idx][0]",
                        "searches": [
                            {"collector": [
                                {"name": "a", "reason": "search_top_hits", "time_in_nanos": 10},
                                {"name": "b", "reason": "search_cancelled", "time_in_nanos": 20}
                            ]},
                            {"collector": [{"name": "c", "reason": "r", "time_in_nanos": 30}]}
                        ]
                    },
                    {"id": "[node][idx][1]", "searches": [{"collector": [{"time_in_nanos": 40}]}]}
                ]
            }
        });

        let response: ProfileResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.collector_timings(), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_collector_timings_empty_profile() {
        let response: ProfileResponse =
            serde_json::from_value(json!({"profile": {"shards": []}})).unwrap();
        assert!(response.collector_timings().is_empty());
    }

    #[test]
    fn test_profile_response_requires_profile_section() {
        let result = serde_json::from_value::<ProfileResponse>(json!({"hits": {}}));
        assert!(result.is_err());
    }
}
