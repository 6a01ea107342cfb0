//! Backend client tests against a scripted in-process mock.

mod common;

use common::{start_backend, MockBackend, NO_HITS_RS};
use launch_analyzer::config::SearchConfig;
use launch_analyzer::models::{AnalyzerConf, CleanIndex, Launch, LogEntry, SearchLogs, TestItem};
use launch_analyzer::search::document::index_mapping;
use launch_analyzer::search::EsClient;
use serde_json::json;
use std::sync::Arc;

fn client(base_url: &str) -> EsClient {
    EsClient::new(vec![base_url.to_string()], SearchConfig::default()).unwrap()
}

fn assert_calls(backend: &Arc<MockBackend>, expected: &[(&str, &str)]) {
    let recorded = backend.recorded();
    let calls: Vec<(String, String)> = recorded
        .iter()
        .map(|c| (c.method.clone(), c.uri.clone()))
        .collect();
    let expected: Vec<(String, String)> = expected
        .iter()
        .map(|(m, u)| (m.to_string(), u.to_string()))
        .collect();
    assert_eq!(calls, expected);
}

fn launch_with_logs(project: i64, logs: Vec<LogEntry>) -> Launch {
    Launch {
        launch_id: 1,
        project,
        launch_name: "Nightly".to_string(),
        analyzer_config: AnalyzerConf {
            number_of_log_lines: 2,
            ..Default::default()
        },
        test_items: vec![TestItem {
            test_item_id: 7,
            unique_id: "auto:d41d8".to_string(),
            is_auto_analyzed: false,
            issue_type: "AB001".to_string(),
            original_issue_type: String::new(),
            logs,
        }],
    }
}

fn error_log(log_id: i64, message: &str) -> LogEntry {
    LogEntry {
        log_id,
        log_level: 40000,
        message: message.to_string(),
    }
}

#[tokio::test]
async fn list_indices_decodes_catalog_rows() {
    let (url, backend) = start_backend(vec![(
        200,
        r#"[{"health": "yellow", "index": "idx0", "docs.count": "3"},
            {"health": "green", "index": "idx1", "docs.count": "0"}]"#,
    )])
    .await;

    let indices = client(&url).list_indices().await.unwrap();
    assert_eq!(indices.len(), 2);
    assert_eq!(indices[0].index, "idx0");
    assert_eq!(indices[0].docs_count, "3");

    assert_calls(&backend, &[("GET", "/_cat/indices?format=json")]);
}

#[tokio::test]
async fn list_indices_surfaces_garbage_responses() {
    let (url, _backend) = start_backend(vec![(500, "")]).await;
    assert!(client(&url).list_indices().await.is_err());
}

#[tokio::test]
async fn index_exists_maps_statuses() {
    let (url, backend) = start_backend(vec![(200, ""), (404, ""), (500, "")]).await;
    let client = client(&url);

    assert!(client.index_exists("idx0").await.unwrap());
    assert!(!client.index_exists("idx1").await.unwrap());
    assert!(client.index_exists("idx2").await.is_err());

    assert_calls(
        &backend,
        &[("HEAD", "/idx0"), ("HEAD", "/idx1"), ("HEAD", "/idx2")],
    );
}

#[tokio::test]
async fn create_index_puts_the_fixed_mapping() {
    let (url, backend) = start_backend(vec![(200, r#"{"acknowledged": true}"#)]).await;

    let rs = client(&url).create_index("idx0").await.unwrap();
    assert!(rs.acknowledged);

    assert_calls(&backend, &[("PUT", "/idx0")]);
    let lines = backend.body_lines(0);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0], index_mapping());
    assert!(backend.recorded()[0].body.ends_with('\n'));
}

#[tokio::test]
async fn create_index_error_statuses_surface() {
    let (url, _backend) = start_backend(vec![(
        400,
        r#"{"error": {"reason": "already exists"}, "status": 400}"#,
    )])
    .await;
    assert!(client(&url).create_index("idx1").await.is_err());
}

#[tokio::test]
async fn delete_index_passes_not_found_through() {
    let (url, backend) = start_backend(vec![
        (200, r#"{"acknowledged": true}"#),
        (404, r#"{"error": {"type": "index_not_found_exception", "reason": "no such index", "root_cause": []}, "status": 404}"#),
    ])
    .await;
    let client = client(&url);

    let rs = client.delete_index(1).await.unwrap();
    assert!(rs.acknowledged);

    let rs = client.delete_index(2).await.unwrap();
    assert_eq!(rs.status, 404);
    assert!(rs.error.is_some());

    assert_calls(&backend, &[("DELETE", "/1"), ("DELETE", "/2")]);
}

#[tokio::test]
async fn index_logs_without_documents_skips_the_bulk_call() {
    let (url, backend) = start_backend(vec![(200, "")]).await;

    let launch = Launch {
        launch_id: 1,
        project: 1,
        ..Default::default()
    };
    let rs = client(&url).index_logs(&[launch]).await.unwrap();
    assert!(rs.items.is_empty());

    // The index is still ensured, but no bulk request goes out.
    assert_calls(&backend, &[("HEAD", "/1")]);
}

#[tokio::test]
async fn index_logs_creates_the_index_and_bulk_loads() {
    let (url, backend) = start_backend(vec![
        (404, ""),
        (200, r#"{"acknowledged": true}"#),
        (
            200,
            r#"{"took": 3, "errors": false, "items": [{"index": {"_index": "2", "_id": "11", "status": 201}}]}"#,
        ),
    ])
    .await;

    let launch = launch_with_logs(
        2,
        vec![error_log(11, "error 123 occurred\nat line 45\nthird line")],
    );
    let rs = client(&url).index_logs(&[launch]).await.unwrap();
    assert!(!rs.errors);
    assert_eq!(rs.items[0].index.id, "11");

    assert_calls(
        &backend,
        &[("HEAD", "/2"), ("PUT", "/2"), ("PUT", "/_bulk?refresh")],
    );

    // Mapping body on index creation.
    assert_eq!(backend.body_lines(1)[0], index_mapping());

    // Alternating action and source lines, trailing newline included;
    // the stored message is truncated to two lines and digit-stripped.
    let lines = backend.body_lines(2);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"index": {"_id": 11, "_index": "2"}}));
    assert_eq!(
        lines[1],
        json!({
            "launch_id": 1,
            "launch_name": "Nightly",
            "test_item": 7,
            "unique_id": "auto:d41d8",
            "is_auto_analyzed": false,
            "issue_type": "AB001",
            "log_level": 40000,
            "message": "error  occurred\nat line "
        })
    );
    assert!(backend.recorded()[2].body.ends_with('\n'));
}

#[tokio::test]
async fn index_logs_skips_logs_below_error_level() {
    let (url, backend) = start_backend(vec![
        (200, ""),
        (200, r#"{"took": 1, "errors": false, "items": []}"#),
    ])
    .await;

    let launch = launch_with_logs(
        2,
        vec![
            LogEntry {
                log_id: 11,
                log_level: 30000,
                message: "warn only".to_string(),
            },
            error_log(12, "real error"),
        ],
    );
    client(&url).index_logs(&[launch]).await.unwrap();

    let lines = backend.body_lines(1);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"index": {"_id": 12, "_index": "2"}}));
}

fn expected_analyze_query(message: &str) -> serde_json::Value {
    json!({
        "size": 10,
        "query": {
            "bool": {
                "must_not": {"wildcard": {"issue_type": "ti*"}},
                "must": [
                    {"range": {"log_level": {"gte": 40000}}},
                    {"exists": {"field": "issue_type"}},
                    {"more_like_this": {
                        "fields": ["message"],
                        "like": message,
                        "min_doc_freq": 7.0,
                        "min_term_freq": 1.0,
                        "minimum_should_match": "80%"
                    }}
                ],
                "should": [
                    {"term": {"unique_id": {"value": "auto:d41d8", "boost": 2.0}}},
                    {"term": {"is_auto_analyzed": {"value": "false", "boost": 2.0}}},
                    {"term": {"launch_name": {"value": "Nightly", "boost": 2.0}}}
                ]
            }
        }
    })
}

#[tokio::test]
async fn analyze_without_hits_yields_no_results() {
    let (url, backend) = start_backend(vec![(200, NO_HITS_RS), (200, NO_HITS_RS)]).await;

    let launch = launch_with_logs(2, vec![error_log(11, "error one"), error_log(12, "error two")]);
    let results = client(&url).analyze_logs(&[launch]).await.unwrap();
    assert!(results.is_empty());

    assert_calls(&backend, &[("GET", "/2/_search"), ("GET", "/2/_search")]);
    assert_eq!(backend.body_lines(0)[0], expected_analyze_query("error one"));
    assert_eq!(backend.body_lines(1)[0], expected_analyze_query("error two"));
}

#[tokio::test]
async fn analyze_single_hit_predicts_its_issue_type() {
    let one_hit = r#"{"hits": {"total": {"value": 1, "relation": "eq"}, "hits": [
        {"_id": "101", "_score": 10.0, "_source": {"test_item": 123, "issue_type": "AB001"}}
    ]}}"#;
    let (url, _backend) = start_backend(vec![(200, NO_HITS_RS), (200, one_hit)]).await;

    let launch = launch_with_logs(2, vec![error_log(11, "error one"), error_log(12, "error two")]);
    let results = client(&url).analyze_logs(&[launch]).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].test_item, 7);
    assert_eq!(results[0].issue_type, "AB001");
    assert_eq!(results[0].relevant_item, 123);
}

#[tokio::test]
async fn analyze_aggregates_normalized_scores_across_logs() {
    // Log 1: AB001 alone takes 1.0. Log 2: AB001 10/15, PB001 5/15.
    let one_hit = r#"{"hits": {"total": {"value": 1, "relation": "eq"}, "hits": [
        {"_id": "101", "_score": 10.0, "_source": {"test_item": 1, "issue_type": "AB001"}}
    ]}}"#;
    let two_hits = r#"{"hits": {"total": {"value": 2, "relation": "eq"}, "hits": [
        {"_id": "102", "_score": 10.0, "_source": {"test_item": 2, "issue_type": "AB001"}},
        {"_id": "103", "_score": 5.0, "_source": {"test_item": 3, "issue_type": "PB001"}}
    ]}}"#;
    let (url, _backend) = start_backend(vec![(200, one_hit), (200, two_hits)]).await;

    let launch = launch_with_logs(2, vec![error_log(11, "error one"), error_log(12, "error two")]);
    let results = client(&url).analyze_logs(&[launch]).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].issue_type, "AB001");
}

#[tokio::test]
async fn analyze_majority_vote_beats_a_single_stronger_hit() {
    // AB001 = 15/35, PB001 = 20/35; the most relevant PB hit is the
    // first one with score 10.
    let three_hits = r#"{"hits": {"total": 3, "hits": [
        {"_id": "101", "_score": 15.0, "_source": {"test_item": 1, "issue_type": "AB001"}},
        {"_id": "102", "_score": 10.0, "_source": {"test_item": 2, "issue_type": "PB001"}},
        {"_id": "103", "_score": 10.0, "_source": {"test_item": 3, "issue_type": "PB001"}}
    ]}}"#;
    let (url, _backend) = start_backend(vec![(200, NO_HITS_RS), (200, three_hits)]).await;

    let launch = launch_with_logs(2, vec![error_log(11, "error one"), error_log(12, "error two")]);
    let results = client(&url).analyze_logs(&[launch]).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].issue_type, "PB001");
    assert_eq!(results[0].relevant_item, 2);
}

#[tokio::test]
async fn analyze_without_test_items_makes_no_calls() {
    let (url, backend) = start_backend(vec![]).await;

    let launch = Launch {
        launch_id: 1,
        project: 2,
        ..Default::default()
    };
    let results = client(&url).analyze_logs(&[launch]).await.unwrap();
    assert!(results.is_empty());
    assert!(backend.recorded().is_empty());
}

#[tokio::test]
async fn delete_logs_bulk_deletes_by_id() {
    let (url, backend) = start_backend(vec![(200, r#"{"acknowledged": true}"#)]).await;

    let ci = CleanIndex {
        ids: vec![3, 5],
        project: 1,
    };
    client(&url).delete_logs(&ci).await.unwrap();

    assert_calls(&backend, &[("POST", "/_bulk?refresh")]);
    let lines = backend.body_lines(0);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], json!({"delete": {"_id": 3, "_index": "1"}}));
    assert_eq!(lines[1], json!({"delete": {"_id": 5, "_index": "1"}}));
}

#[tokio::test]
async fn delete_logs_with_no_ids_makes_no_calls() {
    let (url, backend) = start_backend(vec![]).await;

    let ci = CleanIndex {
        ids: vec![],
        project: 1,
    };
    client(&url).delete_logs(&ci).await.unwrap();
    assert!(backend.recorded().is_empty());
}

#[tokio::test]
async fn search_logs_collects_distinct_hit_ids() {
    let first = r#"{"hits": {"total": {"value": 2, "relation": "eq"}, "hits": [
        {"_id": "11", "_score": 3.0, "_source": {"test_item": 1, "issue_type": "ti001"}},
        {"_id": "12", "_score": 2.0, "_source": {"test_item": 2, "issue_type": "ti001"}}
    ]}}"#;
    let second = r#"{"hits": {"total": 1, "hits": [
        {"_id": "12", "_score": 2.5, "_source": {"test_item": 2, "issue_type": "ti001"}}
    ]}}"#;
    let (url, backend) = start_backend(vec![(200, first), (200, second)]).await;

    let request = SearchLogs {
        launch_id: 4,
        launch_name: "Smoke".to_string(),
        item_id: 33,
        project_id: 2,
        filtered_launch_ids: vec![4],
        log_messages: vec!["error 1".to_string(), "error 2".to_string()],
        log_lines: 1,
    };
    let ids = client(&url).search_logs(&request).await.unwrap();
    assert_eq!(ids, vec![11, 12]);

    assert_calls(&backend, &[("GET", "/2/_search"), ("GET", "/2/_search")]);

    // Query targets items awaiting investigation and excludes the one
    // under analysis; the message is sanitized before similarity.
    let query = &backend.body_lines(0)[0];
    assert_eq!(query["size"], 500);
    assert_eq!(
        query["query"]["bool"]["must_not"],
        json!({"term": {"test_item": {"value": 33, "boost": 1.0}}})
    );
    assert_eq!(
        query["query"]["bool"]["must"][2],
        json!({"wildcard": {"issue_type": "ti*"}})
    );
    assert_eq!(
        query["query"]["bool"]["must"][4]["more_like_this"]["like"],
        "error "
    );
}

#[tokio::test]
async fn healthy_requires_yellow_or_green() {
    let (url, _backend) = start_backend(vec![
        (200, r#"{"status": "green"}"#),
        (200, r#"{"status": "yellow"}"#),
        (200, r#"{"status": "red"}"#),
    ])
    .await;
    let client = client(&url);

    assert!(client.healthy().await);
    assert!(client.healthy().await);
    assert!(!client.healthy().await);
}

#[tokio::test]
async fn healthy_is_false_when_the_backend_is_unreachable() {
    let client = client("http://127.0.0.1:1");
    assert!(!client.healthy().await);
}
