use std::sync::Arc;

use crate::application::QueryService;
use crate::domain::ports::VectorStore;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub vector_store: Arc<dyn VectorStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        query_service: Arc<QueryService>,
        vector_store: Arc<dyn VectorStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            query_service,
            vector_store,
            config,
        }
    }
}
