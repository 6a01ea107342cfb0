//! Wire data model for the analyzer RPC surface.
//!
//! All payloads travel as JSON with camelCase field names. Identifiers
//! are numeric; a zero id means the field was absent and fails
//! validation.

pub mod search_mode;

pub use search_mode::SearchMode;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A set of test runs grouped together; the top-level input unit.
///
/// The `project` id doubles as the backend index name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Launch {
    #[validate(range(min = 1, message = "launchId is required"))]
    pub launch_id: i64,
    #[validate(range(min = 1, message = "project is required"))]
    pub project: i64,
    pub launch_name: String,
    pub analyzer_config: AnalyzerConf,
    #[validate(nested)]
    pub test_items: Vec<TestItem>,
}

/// Per-launch overrides for the retrieval tunables. Zero values fall
/// back to the global [`SearchConfig`](crate::config::SearchConfig).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerConf {
    pub min_doc_freq: f64,
    pub min_term_freq: f64,
    /// Percent; formatted as `"<n>%"` when non-zero.
    pub min_should_match: i32,
    pub number_of_log_lines: i32,
    pub is_auto_analyzer_enabled: bool,
    pub analyzer_mode: SearchMode,
    pub indexing_running: bool,
}

/// A single test run within a launch; the classification target.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TestItem {
    #[validate(range(min = 1, message = "testItemId is required"))]
    pub test_item_id: i64,
    /// Stable fingerprint of the test across runs.
    #[validate(length(min = 1, message = "uniqueId is required"))]
    pub unique_id: String,
    pub is_auto_analyzed: bool,
    /// Empty for items still to classify; a `ti*` prefix denotes
    /// "to be investigated".
    pub issue_type: String,
    pub original_issue_type: String,
    #[validate(nested)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEntry {
    #[validate(range(min = 1, message = "logId is required"))]
    pub log_id: i64,
    pub log_level: i32,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// Request to prune individual log documents from a project index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CleanIndex {
    pub ids: Vec<i64>,
    #[validate(range(min = 1, message = "project is required"))]
    pub project: i64,
}

/// Request to find logs similar to the given messages among items
/// awaiting investigation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchLogs {
    pub launch_id: i64,
    pub launch_name: String,
    pub item_id: i64,
    pub project_id: i64,
    pub filtered_launch_ids: Vec<i64>,
    pub log_messages: Vec<String>,
    pub log_lines: i32,
}

/// One predicted classification: the analyzed item, the winning issue
/// type, and the item behind the most relevant retrieved log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub test_item: i64,
    pub issue_type: String,
    pub relevant_item: i64,
}
