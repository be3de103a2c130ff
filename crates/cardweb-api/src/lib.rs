//! HTTP server for the series configuration editor
//!
//! Routes are organized into modules:
//! - routes::meta: field catalog metadata (JSON)
//! - routes::series: config load/save and the entry editor UI
//! - routes::fonts: font directory listing and browser modal
//! - routes::preview: title card preview generation
//! - routes::search: Plex series search
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page/fragment rendering

pub mod error;
pub mod routes;

use axum::{
    routing::{delete, get, post},
    Router,
};
use cardweb_config::Config;
use cardweb_core::{EditorSession, TvStore};
use cardweb_services::SearchRef;
use cardweb_utils::escape_html;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<EditorSession>>,
    pub store: Arc<TvStore>,
    pub search: SearchRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    // Import route handlers
    use routes::fonts::{api_fonts, htmx_font_browser};
    use routes::meta::api_meta;
    use routes::preview::{api_preview, htmx_preview_modal, htmx_preview_render};
    use routes::search::{api_search, htmx_search_results};
    use routes::series::{
        api_config, api_config_save, htmx_add_entry_modal, htmx_entries_list, htmx_entry_create,
        htmx_entry_delete, htmx_entry_rename, htmx_field_add, htmx_field_remove,
        htmx_field_selector, htmx_field_update, htmx_map_row, htmx_save, htmx_translation_row,
        page_index,
    };

    Router::new()
        // JSON API endpoints
        .route("/api/health", get(health_check))
        .route("/api/meta", get(api_meta))
        .route("/api/config", get(api_config).post(api_config_save))
        .route("/api/fonts", get(api_fonts))
        .route("/api/preview", post(api_preview))
        .route("/api/plex/search", get(api_search))
        .route("/api/reload", post(api_reload))
        // Editor page
        .route("/", get(page_index))
        .route("/save", post(htmx_save))
        // Entry fragments
        .route("/entries", get(htmx_entries_list).post(htmx_entry_create))
        .route("/entries/new", get(htmx_add_entry_modal))
        .route("/entries/:id", delete(htmx_entry_delete))
        .route("/entries/:id/name", post(htmx_entry_rename))
        .route("/entries/:id/fields", get(htmx_field_selector))
        .route(
            "/entries/:id/fields/:field_id",
            post(htmx_field_update).delete(htmx_field_remove),
        )
        .route("/entries/:id/fields/:field_id/add", post(htmx_field_add))
        .route(
            "/entries/:id/preview",
            get(htmx_preview_modal).post(htmx_preview_render),
        )
        // Font browser modal
        .route("/fonts/browse", get(htmx_font_browser))
        // Search results fragment (add-entry modal)
        .route("/search/results", get(htmx_search_results))
        // Empty editor row templates
        .route("/fragments/rows/translation", get(htmx_translation_row))
        .route("/fragments/rows/map", get(htmx_map_row))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Re-read tv.yml into the editing session
async fn api_reload(state: axum::extract::State<AppState>) -> Result<String, ApiError> {
    let payload = state.store.load()?;
    let mut session = state.session.write().await;
    session.replace(payload);
    log::info!("Reloaded series file from {}", state.store.path().display());
    Ok(r#"{"status":"ok"}"#.to_string())
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Cardweb</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .preview-image {{ max-width: 100%; border-radius: 0.5rem; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <div id="modals"></div>
    <div id="toasts" class="fixed bottom-4 right-4 space-y-2 z-50"></div>
    <script>
        // Remove a repeated editor row, then push the remaining rows
        function removeRow(button) {{
            const form = button.closest('form');
            button.closest('.editor-row').remove();
            if (form) {{ htmx.trigger(form, 'submit'); }}
        }}
        // Toasts dismiss themselves after 4.5s
        new MutationObserver((mutations) => {{
            for (const mutation of mutations) {{
                for (const node of mutation.addedNodes) {{
                    if (node.nodeType === 1) {{ setTimeout(() => node.remove(), 4500); }}
                }}
            }}
        }}).observe(document.getElementById('toasts'), {{ childList: true }});
    </script>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Build a stacked modal overlay with header/content/footer regions.
/// Closing a modal removes its backdrop node.
pub fn modal(title: &str, content: &str, footer: &str) -> String {
    format!(
        r#"<div class="modal-backdrop fixed inset-0 bg-black/40 flex items-center justify-center z-40 p-4">
    <div class="modal bg-white rounded-xl shadow-lg w-full max-w-2xl max-h-[85vh] overflow-auto">
        <header class="px-6 py-4 border-b"><h2 class="text-lg font-semibold">{}</h2></header>
        <div class="modal-content px-6 py-4">{}</div>
        <footer class="px-6 py-4 border-t flex justify-end gap-2">{}</footer>
    </div>
</div>"#,
        escape_html(title),
        content,
        footer
    )
}

/// Footer button that closes the enclosing modal
pub fn close_button() -> &'static str {
    r#"<button class="px-3 py-1.5 border rounded-lg hover:bg-gray-50" onclick="this.closest('.modal-backdrop').remove()">Close</button>"#
}

/// A single toast node
pub fn toast(kind: &str, message: &str) -> String {
    let color = match kind {
        "success" => "bg-green-600",
        "error" => "bg-red-600",
        _ => "bg-gray-800",
    };
    format!(
        r#"<div class="toast {} text-white px-4 py-2 rounded-lg shadow">{}</div>"#,
        color,
        escape_html(message)
    )
}

/// Out-of-band toast, attachable to any fragment response
pub fn toast_oob(kind: &str, message: &str) -> String {
    format!(
        r#"<div id="toasts" hx-swap-oob="beforeend">{}</div>"#,
        toast(kind, message)
    )
}

/// Out-of-band swap that closes every open modal
pub fn clear_modals_oob() -> &'static str {
    r#"<div id="modals" hx-swap-oob="innerHTML"></div>"#
}

// ==================== Form decoding ====================

/// Decode an urlencoded form body into ordered name/value pairs.
/// Repeated names are kept in document order, which is how the row
/// editors submit their rows.
pub fn parse_form_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(name), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let unplussed = raw.replace('+', " ");
    match urlencoding::decode(&unplussed) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unplussed,
    }
}

/// First value for a form field name
pub fn form_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// All values for a repeated form field name, in order
pub fn form_values<'a>(pairs: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect()
}

// ==================== Server ====================

/// Start the HTTP server
///
/// This is the main entry point for the cardweb server. It creates the
/// router, binds to the configured address, and serves requests until
/// shutdown.
pub async fn start_server(
    config: Config,
    session: Arc<RwLock<EditorSession>>,
    store: Arc<TvStore>,
    search: SearchRef,
) {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        session,
        store,
        search,
        config,
    };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await.unwrap();
    log::info!("Starting cardweb server on http://{addr}");
    log::info!("Available routes:");
    log::info!("  - / (Series editor)");
    log::info!("  - /api/* (JSON API endpoints)");

    match axum::serve(listener, router).await {
        Ok(_) => log::info!("Server stopped gracefully"),
        Err(e) => log::error!("Server error: {e}"),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_form_pairs_keeps_order_and_decodes() {
        let pairs = parse_form_pairs("language=es&key=spanish+title&language=fr&key=");
        assert_eq!(
            pairs,
            vec![
                ("language".to_string(), "es".to_string()),
                ("key".to_string(), "spanish title".to_string()),
                ("language".to_string(), "fr".to_string()),
                ("key".to_string(), String::new()),
            ]
        );
        assert_eq!(form_value(&pairs, "language"), Some("es"));
        assert_eq!(form_values(&pairs, "key"), vec!["spanish title", ""]);
    }

    #[test]
    fn test_parse_form_pairs_percent_decoding() {
        let pairs = parse_form_pairs("value=100%25&name=The%20Show");
        assert_eq!(form_value(&pairs, "value"), Some("100%"));
        assert_eq!(form_value(&pairs, "name"), Some("The Show"));
    }

    #[test]
    fn test_toast_escapes_message() {
        let html = toast("error", "<script>alert(1)</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
