use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    // Missing fields become empty strings so validation owns the 400 response.
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub resume: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub answer: String,
}

pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let answer = state
        .query_service
        .answer(&request.question, &request.resume)
        .await?;

    Ok(Json(QueryResponse { answer }))
}
