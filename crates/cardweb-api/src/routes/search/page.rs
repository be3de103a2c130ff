//! Search results fragment for the add-entry modal - HTMX

use crate::AppState;
use cardweb_utils::escape_html;
use std::collections::HashMap;

/// Candidate list for the add-entry modal. Selecting a result fills the
/// name field and rides along with the create form as JSON.
pub async fn htmx_search_results(
    state: axum::extract::State<AppState>,
    params: axum::extract::Query<HashMap<String, String>>,
) -> String {
    let query = params.get("q").map(|q| q.trim()).unwrap_or("");
    if query.is_empty() {
        return r#"<p class="helper-text text-sm text-gray-500">Enter a search query.</p>"#
            .to_string();
    }

    let results = match state
        .search
        .search(query, state.config.plex.search_limit)
        .await
    {
        Ok(results) => results,
        Err(e) => {
            return format!(
                r#"<p class="text-sm text-red-600">{}</p>"#,
                escape_html(&e.to_string())
            )
        }
    };

    if results.is_empty() {
        return r#"<p class="helper-text text-sm text-gray-500">No results.</p>"#.to_string();
    }

    results
        .iter()
        .map(|result| {
            let title = result.display_title();
            let library = result.library.as_deref().unwrap_or("Unknown library");
            let encoded = serde_json::to_string(result).unwrap_or_default();
            format!(
                r#"<label class="search-result flex items-start justify-between gap-3 p-3 border rounded-lg cursor-pointer has-[:checked]:border-indigo-500">
    <div>
        <h3 class="font-medium">{}</h3>
        <p class="helper-text text-sm text-gray-500">{}</p>
    </div>
    <span class="flex items-center gap-1 text-sm text-indigo-600">
        <input type="radio" name="selected" value="{}" data-title="{}"
               onchange="const n = this.closest('form').querySelector('[name=name]'); if (n) n.value = this.dataset.title;">
        Select
    </span>
</label>"#,
                escape_html(&title),
                escape_html(library),
                escape_html(&encoded),
                escape_html(&title),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
