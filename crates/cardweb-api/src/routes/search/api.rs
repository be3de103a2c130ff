//! Search API endpoints - JSON API

use crate::{ApiError, AppState};
use std::collections::HashMap;

/// Search Plex for shows matching the query string (JSON API).
/// Accepts `q` or `query`.
pub async fn api_search(
    state: axum::extract::State<AppState>,
    params: axum::extract::Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let query = params
        .get("q")
        .or_else(|| params.get("query"))
        .map(|q| q.trim())
        .unwrap_or("");
    if query.is_empty() {
        return Err(ApiError::BadRequest {
            message: "Missing search query".to_string(),
        });
    }

    let results = state
        .search
        .search(query, state.config.plex.search_limit)
        .await?;

    serde_json::to_string(&serde_json::json!({ "results": results }))
        .map_err(|_| ApiError::InternalError)
}
