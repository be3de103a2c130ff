//! Series API endpoints - JSON API
//!
//! Endpoints:
//! - api_config: Current libraries and series entries (JSON)
//! - api_config_save: Replace and persist the whole configuration

use crate::{ApiError, AppState};
use cardweb_core::TvPayload;

/// Get the current configuration payload (JSON API)
pub async fn api_config(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    serde_json::to_string(&session.to_payload()).unwrap_or_default()
}

/// Replace the configuration: persist to tv.yml, then re-seed the
/// session so the UI matches what was accepted.
pub async fn api_config_save(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<String, ApiError> {
    let payload: TvPayload = serde_json::from_str(&body).map_err(|_| ApiError::BadRequest {
        message: "Invalid JSON payload".to_string(),
    })?;

    state.store.write(&payload)?;

    let mut session = state.session.write().await;
    session.replace(payload);

    Ok(r#"{"status":"ok"}"#.to_string())
}
