//! Integration tests for performance sampling over HTTP.

use std::{io::Write, sync::Arc};

use mockito::{Matcher, Server};
use plsd::{
    engine::{EngineClient, LatencySummary, PerfConfig, PerformanceSampler},
    test_helpers::{ProfileBodyBuilder, create_test_http_client},
};
use serde_json::json;
use tempfile::NamedTempFile;
use url::Url;

fn create_sampler(server: &Server) -> PerformanceSampler {
    let endpoint = Url::parse(&format!("{}/_scripts/painless/_execute", server.url())).unwrap();
    let client = EngineClient::new(create_test_http_client(), endpoint).unwrap();
    PerformanceSampler::new(Arc::new(client))
}

fn create_json_file(content: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();
    file
}

#[tokio::test]
async fn test_sample_collects_all_trials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/products/_search")
        .match_body(Matcher::Json(json!({
            "from": 0,
            "size": 100,
            "timeout": "300ms",
            "terminate_after": 100000,
            "profile": true,
            "query": {"term": {"brand": "acme"}},
            "sort": {
                "_script": {
                    "type": "number",
                    "script": {
                        "lang": "painless",
                        "source": "doc['price'].value * params.factor",
                        "params": {"factor": 1.5}
                    },
                    "order": "desc"
                }
            },
            "_source": {"excludes": ["*"]}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            ProfileBodyBuilder::new().shard(&[&[100, 200]]).shard(&[&[300]]).build().to_string(),
        )
        .expect(3)
        .create_async()
        .await;

    let query_file = create_json_file(json!({"term": {"brand": "acme"}}));
    let context_file = create_json_file(json!({"index": "products", "params": {"factor": 1.5}}));
    let config = PerfConfig {
        query_file: query_file.path().to_path_buf(),
        context_file: Some(context_file.path().to_path_buf()),
        repeat: 3,
        ..PerfConfig::default()
    };

    let samples = create_sampler(&server)
        .sample("doc['price'].value * params.factor", &config)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(samples.timings, vec![100, 200, 300, 100, 200, 300, 100, 200, 300]);
    assert_eq!(samples.completed_trials, 3);
    assert_eq!(samples.skipped_trials, 0);

    let summary = LatencySummary::from_samples(&samples.timings).unwrap();
    assert_eq!(summary.count, 9);
    assert_eq!(summary.p50.as_nanos(), 200);
}

#[tokio::test]
async fn test_sample_skips_failing_trials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/products/_search")
        .with_status(500)
        .with_body(json!({"error": "shard failure"}).to_string())
        .expect(4)
        .create_async()
        .await;

    let query_file = create_json_file(json!({"match_all": {}}));
    let config = PerfConfig {
        query_file: query_file.path().to_path_buf(),
        index: Some("products".to_string()),
        repeat: 4,
        ..PerfConfig::default()
    };

    let samples = create_sampler(&server).sample("1", &config).await.unwrap();

    mock.assert_async().await;
    assert!(samples.timings.is_empty());
    assert_eq!(samples.completed_trials, 0);
    assert_eq!(samples.skipped_trials, 4);
}

#[tokio::test]
async fn test_sample_without_profile_skips_trial() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/_search")
        .with_status(200)
        .with_body(json!({"hits": {"hits": []}}).to_string())
        .expect(2)
        .create_async()
        .await;

    let query_file = create_json_file(json!({"match_all": {}}));
    let config = PerfConfig {
        query_file: query_file.path().to_path_buf(),
        repeat: 2,
        ..PerfConfig::default()
    };

    let samples = create_sampler(&server).sample("1", &config).await.unwrap();

    mock.assert_async().await;
    assert_eq!(samples.skipped_trials, 2);
}

#[tokio::test]
async fn test_sample_invalid_query_file_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server.mock("GET", Matcher::Any).expect(0).create_async().await;

    let query_file = create_json_file(json!(["not", "an", "object"]));
    let config =
        PerfConfig { query_file: query_file.path().to_path_buf(), ..PerfConfig::default() };

    assert!(create_sampler(&server).sample("1", &config).await.is_err());
    mock.assert_async().await;
}
