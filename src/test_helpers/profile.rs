//! A builder for profiled search response bodies.

use serde_json::{Value, json};

/// Builds the JSON body a search engine returns for a profiled search.
#[derive(Default)]
pub struct ProfileBodyBuilder {
    shards: Vec<Value>,
}

impl ProfileBodyBuilder {
    /// Creates a builder with no shards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shard. Each inner slice is one search, holding the
    /// `time_in_nanos` of its top-level collectors.
    pub fn shard(mut self, searches: &[&[u64]]) -> Self {
        let id = format!("[node-{}][test-index][0]", self.shards.len());
        let searches: Vec<Value> = searches
            .iter()
            .map(|collectors| {
                let collectors: Vec<Value> = collectors
                    .iter()
                    .map(|nanos| {
                        json!({
                            "name": "SimpleTopDocsCollector",
                            "reason": "search_top_hits",
                            "time_in_nanos": nanos,
                            "children": [
                                {
                                    "name": "TotalHitCountCollector",
                                    "reason": "search_count",
                                    "time_in_nanos": 1
                                }
                            ]
                        })
                    })
                    .collect();
                json!({"query": [], "rewrite_time": 0, "collector": collectors})
            })
            .collect();
        self.shards.push(json!({"id": id, "searches": searches}));
        self
    }

    /// Builds the response body.
    pub fn build(self) -> Value {
        json!({
            "took": 3,
            "timed_out": false,
            "hits": {"total": {"value": 0, "relation": "eq"}, "hits": []},
            "profile": {"shards": self.shards}
        })
    }
}
