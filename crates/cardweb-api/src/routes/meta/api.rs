//! Metadata API endpoints - JSON API

use crate::AppState;

/// Field catalog plus editor settings consumed once per client session
pub async fn api_meta(state: axum::extract::State<AppState>) -> String {
    let session = state.session.read().await;
    let fields = session.fields();

    let card_types = fields
        .iter()
        .find(|field| field.id == "card_type")
        .map(|field| field.choices.clone())
        .unwrap_or_default();

    serde_json::to_string(&serde_json::json!({
        "fields": fields,
        "cardTypes": card_types,
        "fontDirectory": state.config.data.font_directory,
    }))
    .unwrap_or_default()
}
