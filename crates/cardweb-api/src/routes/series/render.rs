//! Entry and field rendering
//!
//! Server-side rendering of the editor: entry cards, and exactly one
//! editable control per field kind. Controls are wired with HTMX
//! attributes that post edits back to the mutation endpoints.

use cardweb_core::{EditorSession, FieldDescriptor, FieldKind, SeriesEntry};
use cardweb_utils::escape_html;
use serde_json::Value;

const INPUT_CLASS: &str = "w-full px-2 py-1.5 text-sm border rounded-lg";
const SELECT_CLASS: &str = "px-2 py-1.5 text-sm border rounded-lg bg-white";
const SMALL_BUTTON_CLASS: &str = "px-2 py-1 text-xs border rounded-lg hover:bg-gray-50";

fn field_url(entry_id: &str, field_id: &str) -> String {
    format!(
        "/entries/{}/fields/{}",
        urlencoding::encode(entry_id),
        urlencoding::encode(field_id)
    )
}

/// Scalar display text for a config value
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// ==================== Entry list ====================

/// The filtered entry list, or the empty-state message
pub fn render_entries(session: &EditorSession) -> String {
    let entries = session.filtered_entries();
    if entries.is_empty() {
        return r#"<div class="empty-entries text-center py-12 text-gray-500"><p>No series match the search. Use "Add entry" to create one.</p></div>"#.to_string();
    }

    let fields = session.fields();
    entries
        .iter()
        .map(|entry| render_entry_card(entry, &fields))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One entry card: editable name, actions, and a row per present field
pub fn render_entry_card(entry: &SeriesEntry, fields: &[FieldDescriptor]) -> String {
    let id = urlencoding::encode(entry.id()).into_owned();
    let name = escape_html(entry.name());

    let rows: String = fields
        .iter()
        .filter_map(|field| {
            entry
                .field_value(field)
                .map(|value| render_field_row(entry.id(), field, value))
        })
        .collect();

    format!(
        r##"<article id="entry-{entry_dom}" class="entry bg-white rounded-xl shadow-sm p-4 mb-4">
    <div class="entry-header flex items-center gap-3 mb-3">
        <input type="text" name="name" value="{name}" class="flex-1 px-2 py-1.5 font-medium border rounded-lg"
               hx-post="/entries/{id}/name" hx-trigger="input changed delay:500ms" hx-swap="none">
        <div class="entry-actions flex gap-2">
            <button class="px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50"
                    hx-get="/entries/{id}/preview" hx-target="#modals" hx-swap="beforeend">Preview</button>
            <button class="px-3 py-1.5 text-sm rounded-lg bg-red-50 text-red-700 hover:bg-red-100"
                    hx-delete="/entries/{id}" hx-confirm="Remove &quot;{name}&quot;?"
                    hx-target="#entries" hx-swap="innerHTML">Remove</button>
        </div>
    </div>
    <div class="entry-body">
        {rows}
        <button class="add-line mt-2 px-3 py-1.5 text-sm text-indigo-600 border border-dashed rounded-lg hover:bg-indigo-50"
                hx-get="/entries/{id}/fields" hx-target="#modals" hx-swap="beforeend">+ Add line</button>
    </div>
</article>"##,
        entry_dom = escape_html(entry.id()),
    )
}

/// One labeled field row with its control and remove action
pub fn render_field_row(entry_id: &str, field: &FieldDescriptor, value: &Value) -> String {
    let control = render_control(entry_id, field, value);
    format!(
        r##"<div class="field-row grid grid-cols-[200px_1fr_auto] gap-3 items-start py-2 border-b last:border-0">
    <label class="text-sm text-gray-600 pt-1.5">{}</label>
    <div class="field-controls">{}</div>
    <button class="{SMALL_BUTTON_CLASS} text-red-600" hx-delete="{}"
            hx-target="#entries" hx-swap="innerHTML">Remove</button>
</div>"##,
        escape_html(&field.label),
        control,
        field_url(entry_id, &field.id),
    )
}

// ==================== Field controls ====================

/// Dispatch a field descriptor plus current value to its control.
/// Unknown kinds fall back to the plain text control.
pub fn render_control(entry_id: &str, field: &FieldDescriptor, value: &Value) -> String {
    let url = field_url(entry_id, &field.id);
    match field.kind {
        FieldKind::Text | FieldKind::Unknown => text_input(&url, value),
        FieldKind::Number => number_input(&url, value),
        FieldKind::Boolean => boolean_select(&url, value),
        FieldKind::Choice
        | FieldKind::Library
        | FieldKind::CardType
        | FieldKind::Style
        | FieldKind::FontCase => option_select(&url, field, value),
        FieldKind::Csv => csv_input(&url, value),
        FieldKind::TranslationList => translation_editor(&url, value),
        FieldKind::Font => font_picker(entry_id, field, value),
        FieldKind::ReplacementMap => replacement_editor(&url, value),
        FieldKind::Extras => map_editor(&url, value, "Key", "Value", None),
        FieldKind::SeasonMap => season_editor(&url, value),
        FieldKind::RangeMap => map_editor(&url, value, "Name", "Range", None),
        FieldKind::HideSeasons => hide_seasons_select(&url, value),
    }
}

fn text_input(url: &str, value: &Value) -> String {
    format!(
        r#"<input type="text" name="value" value="{}" class="{INPUT_CLASS}"
       hx-post="{url}" hx-trigger="input changed delay:400ms" hx-swap="none">"#,
        escape_html(&value_text(value)),
    )
}

fn number_input(url: &str, value: &Value) -> String {
    format!(
        r#"<input type="number" name="value" value="{}" class="{INPUT_CLASS}"
       hx-post="{url}" hx-trigger="input changed delay:400ms" hx-swap="none">"#,
        escape_html(&value_text(value)),
    )
}

fn select_options(options: &[(&str, String)], current: &str) -> String {
    options
        .iter()
        .map(|(value, label)| {
            let selected = if *value == current { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(value),
                selected,
                escape_html(label)
            )
        })
        .collect()
}

fn boolean_select(url: &str, value: &Value) -> String {
    let current = value_text(value);
    let options = [
        ("true", "true".to_string()),
        ("false", "false".to_string()),
    ];
    format!(
        r#"<select name="value" class="{SELECT_CLASS}" hx-post="{url}" hx-trigger="change" hx-swap="none">{}</select>"#,
        select_options(&options, &current),
    )
}

fn hide_seasons_select(url: &str, value: &Value) -> String {
    let current = value_text(value).to_lowercase();
    let options = [
        ("true", "true".to_string()),
        ("false", "false".to_string()),
        ("auto", "auto".to_string()),
    ];
    format!(
        r#"<select name="value" class="{SELECT_CLASS}" hx-post="{url}" hx-trigger="change" hx-swap="none">{}</select>"#,
        select_options(&options, &current),
    )
}

fn option_select(url: &str, field: &FieldDescriptor, value: &Value) -> String {
    let current = value_text(value);
    let known = field.choices.iter().any(|choice| choice.value == current);

    let mut options = String::new();
    // A value outside the catalog is preserved as an extra selected option
    if !known && !current.is_empty() {
        options.push_str(&format!(
            r#"<option value="{0}" selected>{0}</option>"#,
            escape_html(&current)
        ));
    }
    for choice in &field.choices {
        let selected = if choice.value == current { " selected" } else { "" };
        let label = if choice.label.is_empty() {
            &choice.value
        } else {
            &choice.label
        };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape_html(&choice.value),
            selected,
            escape_html(label)
        ));
    }

    format!(
        r#"<select name="value" class="{SELECT_CLASS}" hx-post="{url}" hx-trigger="change" hx-swap="none">{options}</select>"#
    )
}

fn csv_input(url: &str, value: &Value) -> String {
    // A sequence is joined for display; the value is stored as one string
    let display = match value {
        Value::Array(items) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => value_text(other),
    };
    format!(
        r#"<input type="text" name="value" value="{}" placeholder="comma separated" class="{INPUT_CLASS}"
       hx-post="{url}" hx-trigger="input changed delay:400ms" hx-swap="none">"#,
        escape_html(&display),
    )
}

fn font_picker(entry_id: &str, field: &FieldDescriptor, value: &Value) -> String {
    let url = field_url(entry_id, &field.id);
    let current = value_text(value);
    let browse_url = format!(
        "/fonts/browse?entry={}&field={}&path={}",
        urlencoding::encode(entry_id),
        urlencoding::encode(&field.id),
        urlencoding::encode(&current)
    );
    format!(
        r##"<div class="inline-actions flex gap-2">
    <input type="text" name="value" value="{}" class="{INPUT_CLASS}"
           hx-post="{url}" hx-trigger="input changed delay:400ms" hx-swap="none">
    <button class="px-3 py-1.5 text-sm border rounded-lg hover:bg-gray-50"
            hx-get="{}" hx-target="#modals" hx-swap="beforeend">Browse</button>
</div>"##,
        escape_html(&current),
        escape_html(&browse_url),
    )
}

// ==================== Row editors ====================

fn editor_form(url: &str, inner: &str) -> String {
    format!(
        r#"<form class="table-list space-y-2" hx-post="{url}"
      hx-trigger="submit, input changed delay:400ms, change" hx-swap="none">{inner}</form>"#
    )
}

fn remove_row_button() -> &'static str {
    r#"<button type="button" class="px-2 text-gray-400 hover:text-red-600" onclick="removeRow(this)">×</button>"#
}

/// Template for one translation row; also served as an empty fragment
/// for the "+ Add translation" action
pub fn translation_row(language: &str, key: &str) -> String {
    format!(
        r#"<div class="editor-row flex gap-2">
    <input type="text" name="language" placeholder="Language code" value="{}" class="{INPUT_CLASS}">
    <input type="text" name="key" placeholder="Key" value="{}" class="{INPUT_CLASS}">
    {}
</div>"#,
        escape_html(language),
        escape_html(key),
        remove_row_button(),
    )
}

fn translation_editor(url: &str, value: &Value) -> String {
    let rows: String = match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let language = item
                    .get("language")
                    .map(value_text)
                    .unwrap_or_default();
                let key = item.get("key").map(value_text).unwrap_or_default();
                translation_row(&language, &key)
            })
            .collect(),
        _ => String::new(),
    };

    let inner = format!(
        r#"<div class="rows space-y-2">{rows}</div>
<button type="button" class="{SMALL_BUTTON_CLASS}" hx-get="/fragments/rows/translation"
        hx-target="previous .rows" hx-swap="beforeend">+ Add translation</button>"#
    );
    editor_form(url, &inner)
}

/// Template for one key/value row of the map editors
pub fn map_row(key_label: &str, value_label: &str, key: &str, value: &str) -> String {
    format!(
        r#"<div class="editor-row flex gap-2">
    <input type="text" name="map_key" placeholder="{}" value="{}" class="{INPUT_CLASS}">
    <input type="text" name="map_value" placeholder="{}" value="{}" class="{INPUT_CLASS}">
    {}
</div>"#,
        escape_html(key_label),
        escape_html(key),
        escape_html(value_label),
        escape_html(value),
        remove_row_button(),
    )
}

fn add_map_row_button(key_label: &str, value_label: &str) -> String {
    format!(
        r#"<button type="button" class="{SMALL_BUTTON_CLASS}" hx-get="/fragments/rows/map?key={}&value={}"
        hx-target="previous .rows" hx-swap="beforeend">+ Add {}</button>"#,
        urlencoding::encode(key_label),
        urlencoding::encode(value_label),
        escape_html(&key_label.to_lowercase()),
    )
}

/// Generic key/value map editor. An optional out-of-band entry (the
/// season map's `hide`) is carried in a hidden input instead of a row.
fn map_editor(
    url: &str,
    value: &Value,
    key_label: &str,
    value_label: &str,
    hidden: Option<(&str, &Value)>,
) -> String {
    let hidden_name = hidden.map(|(name, _)| name);
    let rows: String = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| Some(key.as_str()) != hidden_name)
            .map(|(key, value)| map_row(key_label, value_label, key, &value_text(value)))
            .collect(),
        _ => String::new(),
    };

    let hidden_input = match hidden {
        Some((name, value)) => format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            escape_html(name),
            escape_html(&value_text(value))
        ),
        None => String::new(),
    };

    let inner = format!(
        r#"{hidden_input}<div class="rows space-y-2">{rows}</div>
{}"#,
        add_map_row_button(key_label, value_label),
    );
    editor_form(url, &inner)
}

fn season_editor(url: &str, value: &Value) -> String {
    let hide = value.get("hide");
    map_editor(
        url,
        value,
        "Season",
        "Title",
        hide.map(|hide| ("hide", hide)),
    )
}

fn replacement_editor(url: &str, value: &Value) -> String {
    let delete_missing = value
        .get("delete_missing")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let rows: String = match value {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| key.as_str() != "delete_missing")
            .map(|(find, replace)| map_row("Find", "Replace", find, &value_text(replace)))
            .collect(),
        _ => String::new(),
    };

    let checked = if delete_missing { " checked" } else { "" };
    let inner = format!(
        r#"<label class="inline-actions flex items-center gap-2 text-sm">
    <input type="hidden" name="delete_missing" value="false">
    <input type="checkbox" name="delete_missing" value="true"{checked}>
    Delete missing keys
</label>
<div class="rows space-y-2">{rows}</div>
{}"#,
        add_map_row_button("Find", "Replace"),
    );
    editor_form(url, &inner)
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use cardweb_core::{SeriesRecord, TvPayload};
    use serde_json::json;

    fn session() -> EditorSession {
        let mut session = EditorSession::default();
        let libraries = match json!({"TV Shows": {}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let config = match json!({
            "library": "TV Shows",
            "tmdb_id": 1399,
            "seasons": {"1": "One", "hide": false},
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        session.replace(TvPayload {
            libraries,
            series: vec![SeriesRecord {
                name: "Show A".to_string(),
                config,
            }],
        });
        session
    }

    #[test]
    fn test_entry_card_renders_present_fields_only() {
        let session = session();
        let html = render_entries(&session);

        assert!(html.contains(r#"value="Show A""#));
        assert!(html.contains("Library"));
        assert!(html.contains("TMDb ID"));
        // Absent fields render no row
        assert!(!html.contains("Font color"));
    }

    #[test]
    fn test_library_select_marks_current_value() {
        let session = session();
        let field = session.field("library").unwrap();
        let html = render_control("show-a-0", &field, &json!("TV Shows"));
        assert!(html.contains(r#"<option value="TV Shows" selected>TV Shows</option>"#));
    }

    #[test]
    fn test_option_select_preserves_unknown_value() {
        let session = session();
        let field = session.field("card_type").unwrap();
        let html = render_control("show-a-0", &field, &json!("my custom card"));
        assert!(html.contains(r#"<option value="my custom card" selected>my custom card</option>"#));
    }

    #[test]
    fn test_csv_joins_sequences_for_display() {
        let session = session();
        let field = session.field("image_source_priority").unwrap();
        let html = render_control("show-a-0", &field, &json!(["tmdb", "plex"]));
        assert!(html.contains(r#"value="tmdb, plex""#));
    }

    #[test]
    fn test_season_editor_hides_hide_key() {
        let session = session();
        let field = session.field("seasons.titles").unwrap();
        let html = render_control("show-a-0", &field, &json!({"1": "One", "hide": false}));
        assert!(html.contains(r#"name="map_key" placeholder="Season" value="1""#));
        assert!(html.contains(r#"<input type="hidden" name="hide" value="false">"#));
        assert!(!html.contains(r#"name="map_key" placeholder="Season" value="hide""#));
    }

    #[test]
    fn test_replacement_editor_separates_flag_from_rows() {
        let session = session();
        let field = session.field("font.replacements").unwrap();
        let html = render_control(
            "show-a-0",
            &field,
            &json!({"é": "e", "delete_missing": false}),
        );
        assert!(html.contains(r#"name="map_key" placeholder="Find" value="é""#));
        assert!(!html.contains(r#"placeholder="Find" value="delete_missing""#));
        // Unchecked flag: only the hidden false input carries the name
        assert!(!html.contains("checked"));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_text() {
        let field = FieldDescriptor {
            id: "future".to_string(),
            label: "Future".to_string(),
            path: vec!["future".to_string()],
            kind: FieldKind::Unknown,
            choices: vec![],
            default: None,
        };
        let html = render_control("show-a-0", &field, &json!("x"));
        assert!(html.contains(r#"type="text""#));
    }

    #[test]
    fn test_hide_seasons_select_is_tri_state() {
        let field = FieldDescriptor {
            id: "seasons.hide".to_string(),
            label: "Hide seasons".to_string(),
            path: vec!["seasons".to_string(), "hide".to_string()],
            kind: FieldKind::HideSeasons,
            choices: vec![],
            default: None,
        };
        let html = render_control("show-a-0", &field, &json!("auto"));
        assert!(html.contains(r#"<option value="auto" selected>auto</option>"#));
        assert!(html.contains(r#"<option value="true">true</option>"#));
        assert!(html.contains(r#"<option value="false">false</option>"#));
    }
}
