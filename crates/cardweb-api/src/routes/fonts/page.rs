//! Font browser modal - HTMX fragment

use super::api::list_font_dir;
use crate::{close_button, modal, AppState};
use cardweb_utils::{escape_html, format_file_size};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn browse_url(entry_id: &str, field_id: &str, path: &Path) -> String {
    format!(
        "/fonts/browse?entry={}&field={}&path={}",
        urlencoding::encode(entry_id),
        urlencoding::encode(field_id),
        urlencoding::encode(&path.to_string_lossy())
    )
}

/// Font browser modal: folders on the left, font files on the right.
/// Folder clicks swap the modal in place; file clicks assign the field
/// and close the modal.
pub async fn htmx_font_browser(
    state: axum::extract::State<AppState>,
    params: axum::extract::Query<HashMap<String, String>>,
) -> String {
    let entry_id = params.get("entry").cloned().unwrap_or_default();
    let field_id = params.get("field").cloned().unwrap_or_default();
    let current = params
        .get("path")
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.data.font_directory.clone());

    let mut folders = String::new();
    if let Some(parent) = current.parent().filter(|p| !p.as_os_str().is_empty()) {
        folders.push_str(&format!(
            r#"<li class="px-2 py-1 rounded cursor-pointer hover:bg-gray-50" hx-get="{}"
        hx-target="closest .modal-backdrop" hx-swap="outerHTML">⬆︎ Parent directory</li>"#,
            escape_html(&browse_url(&entry_id, &field_id, parent)),
        ));
    }

    let mut files = String::new();
    for item in list_font_dir(&current) {
        if item.is_dir {
            folders.push_str(&format!(
                r#"<li class="px-2 py-1 rounded cursor-pointer hover:bg-gray-50" hx-get="{}"
        hx-target="closest .modal-backdrop" hx-swap="outerHTML">{}</li>"#,
                escape_html(&browse_url(&entry_id, &field_id, Path::new(&item.path))),
                escape_html(&item.name),
            ));
        } else {
            let detail = match (item.size, &item.modified) {
                (Some(size), Some(modified)) => {
                    format!("{} · {}", format_file_size(size), modified)
                }
                (Some(size), None) => format_file_size(size),
                _ => String::new(),
            };
            let assign_url = format!(
                "/entries/{}/fields/{}?rerender=entries&close=1",
                urlencoding::encode(&entry_id),
                urlencoding::encode(&field_id)
            );
            let vals = serde_json::json!({ "value": item.path }).to_string();
            files.push_str(&format!(
                r##"<li class="px-2 py-1 rounded cursor-pointer hover:bg-indigo-50"
        hx-post="{}" hx-vals="{}" hx-target="#entries" hx-swap="innerHTML">{}
        <span class="text-xs text-gray-400">{}</span></li>"##,
                escape_html(&assign_url),
                escape_html(&vals),
                escape_html(&item.name),
                escape_html(&detail),
            ));
        }
    }

    let content = format!(
        r#"<p class="helper-text text-sm text-gray-500 mb-3">{}</p>
<div class="font-browser grid grid-cols-2 gap-4">
    <div class="panel border rounded-lg p-3"><strong>Folders</strong><ul class="mt-2 space-y-1 text-sm">{}</ul></div>
    <div class="panel border rounded-lg p-3"><strong>Fonts</strong><ul class="mt-2 space-y-1 text-sm">{}</ul></div>
</div>"#,
        escape_html(&current.to_string_lossy()),
        folders,
        files,
    );

    modal("Select font", &content, close_button())
}
