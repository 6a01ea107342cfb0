//! Request handlers for the five RPC operations.
//!
//! One method per operation; each validates its input fail-fast and
//! orchestrates the backend client. Both transports (AMQP and HTTP)
//! dispatch into the same handler.

use std::sync::Arc;

use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{AnalysisResult, CleanIndex, Launch, SearchLogs};
use crate::search::response::{BulkResponse, Response};
use crate::search::EsClient;

pub struct RequestHandler {
    client: Arc<EsClient>,
}

impl RequestHandler {
    pub fn new(client: Arc<EsClient>) -> Self {
        Self { client }
    }

    /// Index the error logs of the given launches.
    pub async fn index_launches(&self, launches: Vec<Launch>) -> Result<BulkResponse> {
        validate_launches(&launches)?;
        Ok(self.client.index_logs(&launches).await?)
    }

    /// Predict issue types for the unclassified items of the given
    /// launches.
    pub async fn analyze_logs(&self, launches: Vec<Launch>) -> Result<Vec<AnalysisResult>> {
        validate_launches(&launches)?;
        Ok(self.client.analyze_logs(&launches).await?)
    }

    /// Drop a whole project index.
    pub async fn delete_index(&self, id: i64) -> Result<Response> {
        Ok(self.client.delete_index(id).await?)
    }

    /// Prune individual log documents from a project index.
    pub async fn clean_index(&self, ci: CleanIndex) -> Result<Response> {
        ci.validate()
            .map_err(|e| AppError::Validation(format!("Validation failed on CleanIndex: {e}")))?;
        Ok(self.client.delete_logs(&ci).await?)
    }

    /// Find similar logs among items awaiting investigation.
    pub async fn search_logs(&self, request: SearchLogs) -> Result<Vec<i64>> {
        Ok(self.client.search_logs(&request).await?)
    }
}

fn validate_launches(launches: &[Launch]) -> Result<()> {
    for (i, launch) in launches.iter().enumerate() {
        launch
            .validate()
            .map_err(|e| AppError::Validation(format!("Validation failed on Launch[{i}]: {e}")))?;
    }
    Ok(())
}
