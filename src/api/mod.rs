pub mod handlers;
pub mod routes;

pub use routes::build_router;

use crate::handlers::RequestHandler;
use crate::search::EsClient;
use std::sync::Arc;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub client: Arc<EsClient>,
}

impl AppState {
    pub fn new(handler: Arc<RequestHandler>, client: Arc<EsClient>) -> Self {
        Self { handler, client }
    }
}
