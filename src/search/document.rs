//! Indexed document schema and the fixed index mapping.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One log message as stored in the backend. The document id is the
/// log id, so re-indexing the same `(project, log_id)` overwrites in
/// place.
///
/// `message` is the only analyzed text field; everything else is
/// keyword or numeric.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogDocument {
    pub launch_id: i64,
    pub launch_name: String,
    pub test_item: i64,
    pub unique_id: String,
    pub is_auto_analyzed: bool,
    pub issue_type: String,
    pub log_level: i32,
    pub message: String,
}

/// Settings and mappings applied when a project index is created
/// lazily on first write.
pub fn index_mapping() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
        },
        "mappings": {
            "properties": {
                "test_item": {
                    "type": "keyword",
                },
                "issue_type": {
                    "type": "keyword",
                },
                "message": {
                    "type": "text",
                    "analyzer": "standard",
                },
                "log_level": {
                    "type": "integer",
                },
                "launch_name": {
                    "type": "keyword",
                },
                "unique_id": {
                    "type": "keyword",
                },
                "is_auto_analyzed": {
                    "type": "keyword",
                },
            },
        },
    })
}
