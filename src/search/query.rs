//! Typed retrieval query model and builders.
//!
//! One builder renders every query the service emits: the per-log
//! analyze query (shaped by the launch's [`SearchMode`]) and the
//! log-search query over items awaiting investigation. The structs
//! serialize to exactly the boolean-query JSON the backend expects.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::config::SearchConfig;
use crate::models::{Launch, SearchLogs, SearchMode};
use crate::search::ERROR_LOG_LEVEL;

const ANALYZE_SIZE: i64 = 10;
const SEARCH_LOGS_SIZE: i64 = 500;

/// Top-level query request document: `{size, query: {bool: ...}}`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QueryRequest {
    pub size: i64,
    pub query: Query,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Query {
    #[serde(rename = "bool")]
    pub boolean: BoolQuery,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct BoolQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_not: Option<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Condition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Condition>,
}

/// A single clause. Exactly one of the fields is set; the rest are
/// omitted from the rendered JSON.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Condition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<BTreeMap<String, TermValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<BTreeMap<String, Vec<i64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exists: Option<Exists>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub more_like_this: Option<MoreLikeThis>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TermValue {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Exists {
    pub field: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoreLikeThis {
    pub fields: Vec<String>,
    pub like: String,
    pub min_doc_freq: f64,
    pub min_term_freq: f64,
    #[serde(rename = "minimum_should_match")]
    pub min_should_match: String,
}

impl Condition {
    pub fn wildcard(field: &str, pattern: &str) -> Self {
        Condition {
            wildcard: Some(BTreeMap::from([(field.to_string(), pattern.to_string())])),
            ..Default::default()
        }
    }

    /// Hard-filter term clause, no boost.
    pub fn term(field: &str, value: impl Into<Value>) -> Self {
        Condition {
            term: Some(BTreeMap::from([(
                field.to_string(),
                TermValue {
                    value: value.into(),
                    boost: None,
                },
            )])),
            ..Default::default()
        }
    }

    /// Scoring term clause with an explicit boost.
    pub fn term_boosted(field: &str, value: impl Into<Value>, boost: f64) -> Self {
        Condition {
            term: Some(BTreeMap::from([(
                field.to_string(),
                TermValue {
                    value: value.into(),
                    boost: Some(boost),
                },
            )])),
            ..Default::default()
        }
    }

    pub fn terms(field: &str, values: Vec<i64>) -> Self {
        Condition {
            terms: Some(BTreeMap::from([(field.to_string(), values)])),
            ..Default::default()
        }
    }

    pub fn range_gte(field: &str, value: i32) -> Self {
        Condition {
            range: Some(json!({ field: { "gte": value } })),
            ..Default::default()
        }
    }

    pub fn exists(field: &str) -> Self {
        Condition {
            exists: Some(Exists {
                field: field.to_string(),
            }),
            ..Default::default()
        }
    }

    pub fn more_like_this(
        message: &str,
        min_doc_freq: f64,
        min_term_freq: f64,
        min_should_match: String,
    ) -> Self {
        Condition {
            more_like_this: Some(MoreLikeThis {
                fields: vec!["message".to_string()],
                like: message.to_string(),
                min_doc_freq,
                min_term_freq,
                min_should_match,
            }),
            ..Default::default()
        }
    }
}

/// Build the per-log analyze query.
///
/// The candidate set is always classified error logs (`issue_type`
/// exists, not `ti*`, `log_level >= ERROR`). Similarity and the
/// launch scoping vary with the configured [`SearchMode`]; per-launch
/// tunables override the globals when non-zero.
pub fn build_analyze_query(
    cfg: &SearchConfig,
    launch: &Launch,
    unique_id: &str,
    message: &str,
) -> QueryRequest {
    let conf = &launch.analyzer_config;
    let min_doc_freq = if conf.min_doc_freq == 0.0 {
        cfg.min_doc_freq
    } else {
        conf.min_doc_freq
    };
    let min_term_freq = if conf.min_term_freq == 0.0 {
        cfg.min_term_freq
    } else {
        conf.min_term_freq
    };
    let min_should_match = if conf.min_should_match == 0 {
        cfg.min_should_match.clone()
    } else {
        format!("{}%", conf.min_should_match)
    };

    let mut boolean = BoolQuery {
        must_not: Some(Condition::wildcard("issue_type", "ti*")),
        must: vec![
            Condition::range_gte("log_level", ERROR_LOG_LEVEL),
            Condition::exists("issue_type"),
        ],
        should: vec![
            Condition::term_boosted("unique_id", unique_id, cfg.boost_unique_id.abs()),
            Condition::term_boosted(
                "is_auto_analyzed",
                (cfg.boost_aa < 0.0).to_string(),
                cfg.boost_aa.abs(),
            ),
        ],
    };

    match conf.analyzer_mode {
        SearchMode::All | SearchMode::NotFound => {
            boolean.should.push(Condition::term_boosted(
                "launch_name",
                launch.launch_name.as_str(),
                cfg.boost_launch.abs(),
            ));
            boolean.must.push(Condition::more_like_this(
                message,
                min_doc_freq,
                min_term_freq,
                min_should_match,
            ));
        }
        SearchMode::LaunchName => {
            boolean
                .must
                .push(Condition::term("launch_name", launch.launch_name.as_str()));
            boolean.must.push(Condition::more_like_this(
                message,
                min_doc_freq,
                min_term_freq,
                min_should_match,
            ));
        }
        SearchMode::CurrentLaunch => {
            boolean
                .must
                .push(Condition::term("launch_id", launch.launch_id));
            boolean.must.push(Condition::more_like_this(
                message,
                1.0,
                min_term_freq,
                min_should_match,
            ));
        }
    }

    QueryRequest {
        size: ANALYZE_SIZE,
        query: Query { boolean },
    }
}

/// Build the log-search query: logs similar to `message` among items
/// awaiting investigation in the given launches, excluding the item
/// under investigation itself.
pub fn build_log_search_query(
    cfg: &SearchConfig,
    request: &SearchLogs,
    message: &str,
) -> QueryRequest {
    let boolean = BoolQuery {
        must_not: Some(Condition::term_boosted("test_item", request.item_id, 1.0)),
        must: vec![
            Condition::range_gte("log_level", ERROR_LOG_LEVEL),
            Condition::exists("issue_type"),
            Condition::wildcard("issue_type", "ti*"),
            Condition::terms("launch_id", request.filtered_launch_ids.clone()),
            Condition::more_like_this(
                message,
                1.0,
                1.0,
                cfg.search_logs_min_should_match.clone(),
            ),
        ],
        should: vec![Condition::term_boosted("is_auto_analyzed", "false", 1.0)],
    };

    QueryRequest {
        size: SEARCH_LOGS_SIZE,
        query: Query { boolean },
    }
}
