//! Wire shapes of the search backend responses.

use serde::{Deserialize, Serialize};

/// Acknowledge-style response to index create/delete and bulk delete.
/// Backend error bodies pass through for the caller to inspect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
    #[serde(default)]
    pub status: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub root_cause: Vec<RootCause>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RootCause {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
}

/// Response to a bulk indexing request. `errors: true` means at least
/// one item failed; per-item statuses tell which.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub took: i64,
    #[serde(default)]
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BulkItem>,
    #[serde(default)]
    pub status: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkItem {
    #[serde(default)]
    pub index: BulkOpResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkOpResult {
    #[serde(default, rename = "_index")]
    pub index: String,
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_version")]
    pub version: i64,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub status: i32,
}

/// Response to a search request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: i64,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub total: TotalHits,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Total hit count. Older backends report a bare integer, newer ones
/// an object `{value, relation}`; both decode here.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(from = "TotalHitsRepr")]
pub struct TotalHits {
    pub value: i64,
    pub relation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHitsRepr {
    Object {
        value: i64,
        #[serde(default)]
        relation: String,
    },
    Count(i64),
}

impl From<TotalHitsRepr> for TotalHits {
    fn from(repr: TotalHitsRepr) -> Self {
        match repr {
            TotalHitsRepr::Object { value, relation } => TotalHits { value, relation },
            TotalHitsRepr::Count(value) => TotalHits {
                value,
                relation: String::new(),
            },
        }
    }
}

/// A single scored result from the search index.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(default, rename = "_index")]
    pub index: String,
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_score")]
    pub score: f64,
    #[serde(default, rename = "_source")]
    pub source: HitSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub test_item: i64,
    #[serde(default)]
    pub issue_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub log_level: i32,
    #[serde(default)]
    pub launch_name: String,
}

/// One row of the index catalog listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStat {
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub pri: String,
    #[serde(default)]
    pub rep: String,
    #[serde(default, rename = "docs.count")]
    pub docs_count: String,
    #[serde(default, rename = "docs.deleted")]
    pub docs_deleted: String,
    #[serde(default, rename = "store.size")]
    pub store_size: String,
    #[serde(default, rename = "pri.store.size")]
    pub pri_store_size: String,
}
