//! Preview modal - HTMX fragments

use crate::{close_button, modal, ApiError, AppState};
use axum::extract::{Path, State};
use cardweb_services::{merge_series_config, PreviewRenderer};
use cardweb_utils::escape_html;

/// Open the preview modal; the card renders once the modal loads
pub async fn htmx_preview_modal(Path(id): Path<String>) -> String {
    let content = format!(
        r#"<div hx-post="/entries/{}/preview" hx-trigger="load" hx-swap="innerHTML">
    <p class="text-gray-500">Creating preview, please wait...</p>
</div>"#,
        urlencoding::encode(&id),
    );
    modal("Generating preview", &content, close_button())
}

/// Render the preview for a session entry; the image or the error text
/// replaces the waiting message inline.
pub async fn htmx_preview_render(
    state: State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let (name, config) = {
        let session = state.session.read().await;
        let entry = session.entry(&id).ok_or_else(|| ApiError::NotFound {
            resource: format!("Series entry not found: {id}"),
        })?;
        (entry.name().to_string(), entry.config().clone())
    };

    let rendered = async {
        let tv = state.store.load()?;
        let fonts = state.store.fonts()?;
        let merged = merge_series_config(&config, &tv.libraries, &fonts)?;
        let renderer = PreviewRenderer::new(state.config.preview.clone());
        Ok::<_, ApiError>(renderer.render(&name, &merged).await?)
    }
    .await;

    Ok(match rendered {
        Ok(preview) => format!(
            r#"<img class="preview-image" src="data:{};base64,{}">"#,
            escape_html(&preview.mime),
            preview.data,
        ),
        Err(e) => format!(r#"<p class="text-red-600">{}</p>"#, escape_html(&e.to_string())),
    })
}
