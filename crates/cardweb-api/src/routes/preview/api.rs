//! Preview API endpoints - JSON API

use crate::{ApiError, AppState};
use cardweb_services::{merge_series_config, PreviewRenderer};
use serde_json::Value;

/// Generate a title card preview for a posted name + config (JSON API).
/// The config is merged with the libraries and font templates from disk
/// before rendering.
pub async fn api_preview(
    state: axum::extract::State<AppState>,
    body: String,
) -> Result<String, ApiError> {
    let payload: Value = serde_json::from_str(&body).map_err(|_| ApiError::BadRequest {
        message: "Invalid JSON payload".to_string(),
    })?;

    let name = payload.get("name").and_then(Value::as_str).unwrap_or("");
    let config = payload.get("config").and_then(Value::as_object);
    let (name, config) = match (name, config) {
        (name, Some(config)) if !name.is_empty() => (name, config),
        _ => {
            return Err(ApiError::BadRequest {
                message: "Preview requires a series name and configuration".to_string(),
            })
        }
    };

    let tv = state.store.load()?;
    let fonts = state.store.fonts()?;
    let merged = merge_series_config(config, &tv.libraries, &fonts)?;

    let renderer = PreviewRenderer::new(state.config.preview.clone());
    let preview = renderer.render(name, &merged).await?;

    serde_json::to_string(&preview).map_err(|_| ApiError::InternalError)
}
