//! Series editor pages - Full page and HTMX fragments
//!
//! Endpoints:
//! - page_index: The editor page
//! - htmx_entries_list: Entry list fragment (with name filter)
//! - htmx_entry_create / htmx_entry_delete / htmx_entry_rename
//! - htmx_field_update / htmx_field_add / htmx_field_remove
//! - htmx_field_selector / htmx_add_entry_modal: modal fragments
//! - htmx_save: Persist the session to tv.yml
//! - htmx_translation_row / htmx_map_row: empty editor row templates

use super::render::{map_row, render_entries, translation_row};
use crate::{
    base_html, clear_modals_oob, close_button, form_value, form_values, is_htmx_request, modal,
    parse_form_pairs, toast_oob, ApiError, AppState,
};
use axum::extract::{Path, Query, State};
use cardweb_core::{FieldKind, SearchSeed};
use cardweb_services::SearchResult;
use cardweb_utils::escape_html;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

// ==================== Page ====================

/// The editor page: header controls plus the entry list
pub async fn page_index(
    state: State<AppState>,
    headers: axum::http::HeaderMap,
) -> axum::response::Html<String> {
    let session = state.session.read().await;
    let entries = render_entries(&session);

    let inner_content = format!(
        r##"<div class="max-w-5xl mx-auto p-6">
    <div class="flex items-center gap-3 mb-6">
        <h1 class="text-2xl font-bold text-indigo-600">Cardweb</h1>
        <input type="search" id="series-search" name="filter" placeholder="Filter series..."
               class="flex-1 px-3 py-2 border rounded-lg"
               hx-get="/entries" hx-trigger="input changed delay:300ms" hx-target="#entries" hx-swap="innerHTML">
        <button id="add-entry" class="px-4 py-2 border rounded-lg hover:bg-gray-50"
                hx-get="/entries/new" hx-target="#modals" hx-swap="beforeend">Add entry</button>
        <button id="save-config" class="px-4 py-2 rounded-lg bg-indigo-600 text-white hover:bg-indigo-700"
                hx-post="/save" hx-swap="none">Save</button>
    </div>
    <div id="entries">{entries}</div>
</div>"##
    );

    if is_htmx_request(&headers) {
        axum::response::Html(inner_content)
    } else {
        axum::response::Html(base_html("Series editor", &inner_content))
    }
}

/// Entry list fragment; also applies the name filter
pub async fn htmx_entries_list(
    state: State<AppState>,
    params: Query<HashMap<String, String>>,
) -> String {
    let mut session = state.session.write().await;
    if let Some(filter) = params.get("filter") {
        session.set_filter(filter);
    }
    render_entries(&session)
}

/// Persist the current session to tv.yml
pub async fn htmx_save(state: State<AppState>) -> String {
    let session = state.session.read().await;
    match state.store.write(&session.to_payload()) {
        Ok(_) => toast_oob("success", "Configuration saved"),
        Err(e) => toast_oob("error", &e.to_string()),
    }
}

// ==================== Entry mutations ====================

/// Create an entry from the add-entry modal form
pub async fn htmx_entry_create(state: State<AppState>, body: String) -> String {
    let pairs = parse_form_pairs(&body);
    let selected: Option<SearchResult> = form_value(&pairs, "selected")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| serde_json::from_str(raw).ok());

    let mut session = state.session.write().await;

    // A selected search result supplies the name when the field was left empty
    let name = match form_value(&pairs, "name").map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => selected
            .as_ref()
            .map(|result| result.display_title())
            .unwrap_or_default(),
    };

    let seed = selected.as_ref().map(|result| SearchSeed {
        library: result.library.clone(),
        tmdb_id: result.ids.tmdb_id.clone(),
        tvdb_id: result.ids.tvdb_id.clone(),
        imdb_id: result.ids.imdb_id.clone(),
    });
    let config = session.seeded_config(seed.as_ref());

    match session.add_entry(&name, config) {
        Ok(_) => format!("{}{}", render_entries(&session), clear_modals_oob()),
        // The modal stays open; the list is re-rendered unchanged
        Err(e) => format!(
            "{}{}",
            render_entries(&session),
            toast_oob("error", &e.to_string())
        ),
    }
}

/// Remove an entry and re-render the list
pub async fn htmx_entry_delete(state: State<AppState>, Path(id): Path<String>) -> String {
    let mut session = state.session.write().await;
    match session.remove_entry(&id) {
        Ok(_) => render_entries(&session),
        Err(e) => format!(
            "{}{}",
            render_entries(&session),
            toast_oob("error", &e.to_string())
        ),
    }
}

/// Rename an entry in place (debounced from the card's title input)
pub async fn htmx_entry_rename(
    state: State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> String {
    let pairs = parse_form_pairs(&body);
    let name = form_value(&pairs, "name").unwrap_or_default();

    let mut session = state.session.write().await;
    match session.rename_entry(&id, name) {
        Ok(_) => String::new(),
        Err(e) => toast_oob("error", &e.to_string()),
    }
}

// ==================== Field mutations ====================

/// Assemble the raw edit value a control submitted. Row editors submit
/// repeated names in document order; scalar controls submit `value`.
fn raw_value_from_form(kind: FieldKind, pairs: &[(String, String)]) -> Value {
    match kind {
        FieldKind::TranslationList => {
            let languages = form_values(pairs, "language");
            let keys = form_values(pairs, "key");
            Value::Array(
                languages
                    .iter()
                    .zip(keys.iter())
                    .map(|(language, key)| json!({"language": language, "key": key}))
                    .collect(),
            )
        }
        FieldKind::ReplacementMap => {
            let mut map = form_map(pairs);
            let delete_missing = pairs
                .iter()
                .rev()
                .find(|(name, _)| name == "delete_missing")
                .map(|(_, value)| value == "true")
                .unwrap_or(true);
            map.insert("delete_missing".to_string(), Value::Bool(delete_missing));
            Value::Object(map)
        }
        FieldKind::SeasonMap => {
            let mut map = form_map(pairs);
            if let Some(hide) = form_value(pairs, "hide") {
                map.insert("hide".to_string(), parse_hide(hide));
            }
            Value::Object(map)
        }
        FieldKind::Extras | FieldKind::RangeMap => Value::Object(form_map(pairs)),
        _ => Value::String(form_value(pairs, "value").unwrap_or_default().to_string()),
    }
}

fn form_map(pairs: &[(String, String)]) -> Map<String, Value> {
    let keys = form_values(pairs, "map_key");
    let values = form_values(pairs, "map_value");
    let mut map = Map::new();
    for (key, value) in keys.iter().zip(values.iter()) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
    map
}

/// The round-tripped season `hide` value keeps its original type
fn parse_hide(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

/// Apply a field edit. `?rerender=entries` returns the list fragment
/// (used by the font browser); `?close=1` also closes open modals.
pub async fn htmx_field_update(
    state: State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
    params: Query<HashMap<String, String>>,
    body: String,
) -> Result<String, ApiError> {
    let pairs = parse_form_pairs(&body);

    let mut session = state.session.write().await;
    let field = session.field(&field_id)?;
    let raw = raw_value_from_form(field.kind, &pairs);
    session.update_field(&id, &field, raw)?;

    let mut response = String::new();
    if params.get("rerender").map(String::as_str) == Some("entries") {
        response.push_str(&render_entries(&session));
    }
    if params.contains_key("close") {
        response.push_str(clear_modals_oob());
    }
    Ok(response)
}

/// Add a field with its default value, then re-render the list
pub async fn htmx_field_add(
    state: State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let mut session = state.session.write().await;
    let field = session.field(&field_id)?;
    session.add_field(&id, &field)?;
    Ok(format!("{}{}", render_entries(&session), clear_modals_oob()))
}

/// Delete a field's path and re-render the list
pub async fn htmx_field_remove(
    state: State<AppState>,
    Path((id, field_id)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let mut session = state.session.write().await;
    let field = session.field(&field_id)?;
    session.remove_field(&id, &field)?;
    Ok(render_entries(&session))
}

// ==================== Modals ====================

/// Field selector modal: the catalog fields not yet present on the entry
pub async fn htmx_field_selector(
    state: State<AppState>,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let session = state.session.read().await;
    let entry = session.entry(&id).ok_or_else(|| ApiError::NotFound {
        resource: format!("Series entry not found: {id}"),
    })?;

    let available: Vec<_> = session
        .fields()
        .into_iter()
        .filter(|field| entry.field_value(field).is_none())
        .collect();

    let content = if available.is_empty() {
        "<p>All available options are already configured.</p>".to_string()
    } else {
        let items: String = available
            .iter()
            .map(|field| {
                format!(
                    r##"<div class="search-result flex items-center justify-between p-3 border rounded-lg">
    <h3 class="font-medium">{}</h3>
    <button class="px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50"
            hx-post="/entries/{}/fields/{}/add" hx-target="#entries" hx-swap="innerHTML">Add</button>
</div>"##,
                    escape_html(&field.label),
                    urlencoding::encode(&id),
                    urlencoding::encode(&field.id),
                )
            })
            .collect();
        format!(r#"<div class="search-results space-y-2">{items}</div>"#)
    };

    Ok(modal("Add field", &content, close_button()))
}

/// Add-entry modal: name input plus Plex search
pub async fn htmx_add_entry_modal() -> String {
    let content = r##"<form id="add-entry-form" class="modal-form space-y-3" onsubmit="event.preventDefault()">
    <input type="text" name="name" placeholder="Series name (e.g. The Example Show (2024))"
           class="w-full px-3 py-2 border rounded-lg">
    <hr>
    <div class="flex gap-2">
        <input type="search" name="q" placeholder="Search Plex..." class="flex-1 px-3 py-2 border rounded-lg"
               hx-get="/search/results" hx-trigger="keyup[key=='Enter']" hx-target="#search-results">
        <button type="button" class="px-4 py-2 border rounded-lg hover:bg-gray-50"
                hx-get="/search/results" hx-include="[name='q']" hx-target="#search-results">Search</button>
    </div>
    <div id="search-results" class="search-results space-y-2"></div>
</form>"##;

    let footer = format!(
        r##"{}<button class="px-4 py-2 rounded-lg bg-indigo-600 text-white hover:bg-indigo-700"
        hx-post="/entries" hx-include="#add-entry-form" hx-target="#entries" hx-swap="innerHTML">Create entry</button>"##,
        close_button()
    );

    modal("Add series entry", content, &footer)
}

// ==================== Row templates ====================

/// Empty translation row for the "+ Add translation" action
pub async fn htmx_translation_row() -> String {
    translation_row("", "")
}

/// Empty key/value row for the map editors' "+ Add" actions
pub async fn htmx_map_row(params: Query<HashMap<String, String>>) -> String {
    let key_label = params.get("key").map(String::as_str).unwrap_or("Key");
    let value_label = params.get("value").map(String::as_str).unwrap_or("Value");
    map_row(key_label, value_label, "", "")
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_translation_rows_zip_in_order() {
        let pairs = parse_form_pairs("language=es&key=spanish&language=fr&key=french");
        let raw = raw_value_from_form(FieldKind::TranslationList, &pairs);
        assert_eq!(
            raw,
            json!([
                {"language": "es", "key": "spanish"},
                {"language": "fr", "key": "french"},
            ])
        );
    }

    #[test]
    fn test_raw_value_replacement_checkbox_overrides_hidden() {
        // Hidden false plus checked true: the later value wins
        let pairs =
            parse_form_pairs("delete_missing=false&delete_missing=true&map_key=%C3%A9&map_value=e");
        let raw = raw_value_from_form(FieldKind::ReplacementMap, &pairs);
        assert_eq!(raw, json!({"é": "e", "delete_missing": true}));

        let pairs = parse_form_pairs("delete_missing=false&map_key=a&map_value=b");
        let raw = raw_value_from_form(FieldKind::ReplacementMap, &pairs);
        assert_eq!(raw, json!({"a": "b", "delete_missing": false}));
    }

    #[test]
    fn test_raw_value_season_map_restores_hide_type() {
        let pairs = parse_form_pairs("hide=false&map_key=1&map_value=One");
        let raw = raw_value_from_form(FieldKind::SeasonMap, &pairs);
        assert_eq!(raw, json!({"1": "One", "hide": false}));

        let pairs = parse_form_pairs("hide=auto&map_key=1&map_value=One");
        let raw = raw_value_from_form(FieldKind::SeasonMap, &pairs);
        assert_eq!(raw, json!({"1": "One", "hide": "auto"}));
    }

    #[test]
    fn test_raw_value_scalar_uses_value_field() {
        let pairs = parse_form_pairs("value=standard");
        assert_eq!(
            raw_value_from_form(FieldKind::CardType, &pairs),
            json!("standard")
        );
        let pairs = parse_form_pairs("other=x");
        assert_eq!(raw_value_from_form(FieldKind::Text, &pairs), json!(""));
    }
}
