//! Typed HTTP client for the search backend.

use std::collections::BTreeSet;
use std::collections::HashMap;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::SearchConfig;
use crate::models::{AnalysisResult, CleanIndex, Launch, SearchLogs};
use crate::sanitize::clean_message;
use crate::search::document::{index_mapping, LogDocument};
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::{build_analyze_query, build_log_search_query};
use crate::search::response::{BulkResponse, IndexStat, Response, SearchResponse};
use crate::search::scoring::{fold_hits, pick_winner, TypeScore, TOP_K};
use crate::search::ERROR_LOG_LEVEL;

/// Client for the inverted-index backend. Cheap to clone a reference
/// to; the underlying HTTP connection pool is shared and any number of
/// calls may run concurrently.
pub struct EsClient {
    hosts: Vec<String>,
    http: reqwest::Client,
    search_cfg: SearchConfig,
}

impl EsClient {
    pub fn new(hosts: Vec<String>, search_cfg: SearchConfig) -> SearchResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SearchError::Transport(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            hosts,
            http,
            search_cfg,
        })
    }

    /// True when the backend cluster is in an operational state.
    pub async fn healthy(&self) -> bool {
        let url = self.build_url(&["_cluster/health"]);
        let health: serde_json::Value = match self.send_op_request(Method::GET, &url, &[]).await {
            Ok(health) => health,
            Err(_) => return false,
        };
        matches!(
            health.get("status").and_then(|s| s.as_str()),
            Some("yellow") | Some("green")
        )
    }

    /// List all indices known to the backend.
    pub async fn list_indices(&self) -> SearchResult<Vec<IndexStat>> {
        let url = self.build_url(&["_cat", "indices?format=json"]);
        self.send_op_request(Method::GET, &url, &[]).await
    }

    pub async fn index_exists(&self, name: &str) -> SearchResult<bool> {
        debug!(index = name, "checking index");
        let url = self.build_url(&[name]);
        let rs = self
            .http
            .head(&url)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        match rs.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchError::Status {
                status,
                body: String::new(),
            }),
        }
    }

    /// Create an index with the fixed log-document mapping.
    pub async fn create_index(&self, name: &str) -> SearchResult<Response> {
        debug!(index = name, "creating index");
        let url = self.build_url(&[name]);
        let body = serde_json::to_string(&index_mapping())?;
        self.send_op_request(Method::PUT, &url, &[body]).await
    }

    pub async fn delete_index(&self, id: i64) -> SearchResult<Response> {
        debug!(index = id, "deleting index");
        let url = self.build_url(&[&id.to_string()]);
        self.send_op_request(Method::DELETE, &url, &[]).await
    }

    /// Delete individual log documents from a project index.
    pub async fn delete_logs(&self, ci: &CleanIndex) -> SearchResult<Response> {
        debug!(project = ci.project, count = ci.ids.len(), "deleting logs");
        if ci.ids.is_empty() {
            return Ok(Response::default());
        }
        let index = ci.project.to_string();
        let lines = ci
            .ids
            .iter()
            .map(|id| {
                serde_json::to_string(&json!({"delete": {"_id": id, "_index": index.as_str()}}))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let url = self.build_url(&["_bulk?refresh"]);
        self.send_op_request(Method::POST, &url, &lines).await
    }

    /// Bulk-index the error logs of the given launches, creating each
    /// project index on first write.
    pub async fn index_logs(&self, launches: &[Launch]) -> SearchResult<BulkResponse> {
        debug!(launches = launches.len(), "indexing logs");

        let mut lines: Vec<String> = Vec::new();
        for launch in launches {
            let index = launch.project.to_string();
            self.ensure_index(&index).await?;
            for item in &launch.test_items {
                for log in &item.logs {
                    if log.log_level < ERROR_LOG_LEVEL {
                        continue;
                    }
                    lines.push(serde_json::to_string(
                        &json!({"index": {"_id": log.log_id, "_index": index.as_str()}}),
                    )?);
                    let document = LogDocument {
                        launch_id: launch.launch_id,
                        launch_name: launch.launch_name.clone(),
                        test_item: item.test_item_id,
                        unique_id: item.unique_id.clone(),
                        is_auto_analyzed: item.is_auto_analyzed,
                        issue_type: item.issue_type.clone(),
                        log_level: log.log_level,
                        message: clean_message(
                            &log.message,
                            launch.analyzer_config.number_of_log_lines,
                        ),
                    };
                    lines.push(serde_json::to_string(&document)?);
                }
            }
        }

        if lines.is_empty() {
            return Ok(BulkResponse::default());
        }
        let url = self.build_url(&["_bulk?refresh"]);
        self.send_op_request(Method::PUT, &url, &lines).await
    }

    /// Predict an issue type for every unclassified test item by
    /// retrieving similar classified logs and aggregating their
    /// scores.
    pub async fn analyze_logs(&self, launches: &[Launch]) -> SearchResult<Vec<AnalysisResult>> {
        debug!(launches = launches.len(), "starting analysis");

        let mut results = Vec::new();
        for launch in launches {
            let url = self.build_url(&[&launch.project.to_string(), "_search"]);
            for item in &launch.test_items {
                let mut scores: HashMap<String, TypeScore> = HashMap::new();
                for log in &item.logs {
                    let message =
                        clean_message(&log.message, launch.analyzer_config.number_of_log_lines);
                    let query =
                        build_analyze_query(&self.search_cfg, launch, &item.unique_id, &message);
                    let response: SearchResponse = self
                        .send_op_request(Method::GET, &url, &[serde_json::to_string(&query)?])
                        .await?;
                    fold_hits(&response, TOP_K, &mut scores);
                }

                if let Some((issue_type, entry)) = pick_winner(&scores) {
                    if !issue_type.is_empty() {
                        results.push(AnalysisResult {
                            test_item: item.test_item_id,
                            issue_type: issue_type.to_string(),
                            relevant_item: entry.most_relevant.source.test_item,
                        });
                    }
                }
            }
        }

        debug!(matches = results.len(), "analysis finished");
        Ok(results)
    }

    /// Find ids of logs similar to the request's messages among items
    /// awaiting investigation.
    pub async fn search_logs(&self, request: &SearchLogs) -> SearchResult<Vec<i64>> {
        let url = self.build_url(&[&request.project_id.to_string(), "_search"]);
        let mut ids = BTreeSet::new();
        for message in &request.log_messages {
            let sanitized = clean_message(message, request.log_lines);
            let query = build_log_search_query(&self.search_cfg, request, &sanitized);
            let response: SearchResponse = self
                .send_op_request(Method::GET, &url, &[serde_json::to_string(&query)?])
                .await?;
            for hit in &response.hits.hits {
                let id = hit
                    .id
                    .parse::<i64>()
                    .map_err(|_| SearchError::InvalidHitId(hit.id.clone()))?;
                ids.insert(id);
            }
        }
        Ok(ids.into_iter().collect())
    }

    async fn ensure_index(&self, name: &str) -> SearchResult<()> {
        let wrap = |source: SearchError| SearchError::CreateIndex {
            index: name.to_string(),
            source: Box::new(source),
        };
        if !self.index_exists(name).await.map_err(wrap)? {
            self.create_index(name).await.map_err(wrap)?;
        }
        Ok(())
    }

    fn build_url(&self, path: &[&str]) -> String {
        format!("{}/{}", self.hosts[0], path.join("/"))
    }

    async fn send_op_request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        bodies: &[String],
    ) -> SearchResult<T> {
        let body = self.send_request(method, url, bodies).await?;
        serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))
    }

    /// Send a request with a newline-delimited JSON body (one line per
    /// entry, trailing newline included). Statuses in `[200, 201]` and
    /// `>= 404` pass through; anything between is a backend error and
    /// the body is the message.
    async fn send_request(
        &self,
        method: Method,
        url: &str,
        bodies: &[String],
    ) -> SearchResult<String> {
        let mut request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if !bodies.is_empty() {
            let mut payload = String::new();
            for body in bodies {
                payload.push_str(body);
                payload.push('\n');
            }
            request = request.body(payload);
        }

        let rs = request
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        let status = rs.status().as_u16();
        let body = rs
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if status > 201 && status < 404 {
            return Err(SearchError::Status { status, body });
        }
        Ok(body)
    }
}
