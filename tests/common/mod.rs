//! In-process scripted mock of the search backend.
//!
//! Each test scripts the responses it expects the backend to give, in
//! order, and asserts afterwards on the calls the client actually
//! made.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;

/// One request observed by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub uri: String,
    pub body: String,
}

pub struct MockBackend {
    script: Mutex<VecDeque<(u16, String)>>,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.recorded.lock().unwrap().clone()
    }

    /// Newline-separated body of the `n`-th recorded call, split into
    /// parsed JSON lines.
    pub fn body_lines(&self, n: usize) -> Vec<serde_json::Value> {
        let body = self.recorded()[n].body.clone();
        body.lines()
            .map(|line| serde_json::from_str(line).expect("body line is not valid JSON"))
            .collect()
    }
}

async fn mock_handler(
    State(state): State<Arc<MockBackend>>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    state.recorded.lock().unwrap().push(RecordedCall {
        method: method.to_string(),
        uri: uri.to_string(),
        body,
    });
    let (status, body) = state
        .script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((200, String::new()));
    (StatusCode::from_u16(status).unwrap(), body)
}

/// Start a scripted backend on a random local port. Returns its base
/// URL and a handle for assertions.
pub async fn start_backend(script: Vec<(u16, &str)>) -> (String, Arc<MockBackend>) {
    let state = Arc::new(MockBackend {
        script: Mutex::new(
            script
                .into_iter()
                .map(|(status, body)| (status, body.to_string()))
                .collect(),
        ),
        recorded: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .fallback(mock_handler)
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// Search response with no hits, in the newer `{value, relation}`
/// total shape.
pub const NO_HITS_RS: &str =
    r#"{"took": 1, "hits": {"total": {"value": 0, "relation": "eq"}, "max_score": null, "hits": []}}"#;
