//! Per-kind value normalization applied on every field edit
//!
//! Raw values arrive either from form controls (strings) or from the JSON
//! API. `normalize` returns the value to store, or None when the edit
//! means "remove this field".

use crate::fields::FieldKind;
use serde_json::{Map, Number, Value};

/// Reserved key mixed into replacement maps alongside find/replace rows
pub const DELETE_MISSING_KEY: &str = "delete_missing";

/// Reserved key mixed into season maps, round-tripped but never shown as a row
pub const HIDE_KEY: &str = "hide";

/// Normalize a raw edit value for the given field kind.
pub fn normalize(kind: FieldKind, raw: Value) -> Option<Value> {
    match kind {
        FieldKind::Text | FieldKind::Font => normalize_text(raw),
        FieldKind::Csv => Some(Value::String(string_of(&raw))),
        FieldKind::Choice
        | FieldKind::Library
        | FieldKind::CardType
        | FieldKind::Style
        | FieldKind::FontCase
        | FieldKind::Unknown => Some(Value::String(string_of(&raw))),
        FieldKind::Number => normalize_number(raw),
        FieldKind::Boolean => Some(Value::Bool(truthy(&raw))),
        FieldKind::HideSeasons => Some(normalize_hide_seasons(&raw)),
        FieldKind::TranslationList => Some(normalize_translations(raw)),
        FieldKind::ReplacementMap => Some(normalize_replacements(raw)),
        FieldKind::SeasonMap => Some(normalize_map(raw, true)),
        FieldKind::Extras | FieldKind::RangeMap => Some(normalize_map(raw, false)),
    }
}

fn string_of(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn normalize_text(raw: Value) -> Option<Value> {
    let text = string_of(&raw);
    if text.is_empty() {
        None
    } else {
        Some(Value::String(text))
    }
}

fn normalize_number(raw: Value) -> Option<Value> {
    match raw {
        Value::Number(n) => Some(Value::Number(n)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Ok(int) = trimmed.parse::<i64>() {
                return Some(Value::Number(int.into()));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        _ => None,
    }
}

fn truthy(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true",
        _ => false,
    }
}

fn normalize_hide_seasons(raw: &Value) -> Value {
    match raw {
        Value::Bool(b) => Value::Bool(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String("auto".to_string()),
        },
        _ => Value::String("auto".to_string()),
    }
}

/// Keep only rows with both a language and a key; an empty result still
/// persists as an explicit empty list.
fn normalize_translations(raw: Value) -> Value {
    let rows = match raw {
        Value::Array(rows) => rows,
        _ => vec![],
    };

    let sanitized: Vec<Value> = rows
        .into_iter()
        .filter_map(|row| {
            let row = row.as_object()?;
            let language = row.get("language").map(string_of).unwrap_or_default();
            let key = row.get("key").map(string_of).unwrap_or_default();
            let language = language.trim().to_string();
            let key = key.trim().to_string();
            if language.is_empty() || key.is_empty() {
                return None;
            }
            let mut sanitized = Map::new();
            sanitized.insert("language".to_string(), Value::String(language));
            sanitized.insert("key".to_string(), Value::String(key));
            Some(Value::Object(sanitized))
        })
        .collect();

    Value::Array(sanitized)
}

/// Rebuild a replacement map: find/replace rows with non-empty find keys,
/// plus the reserved `delete_missing` flag (defaulting to true).
fn normalize_replacements(raw: Value) -> Value {
    let source = match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let delete_missing = source
        .get(DELETE_MISSING_KEY)
        .map(truthy)
        .unwrap_or(true);

    let mut map = Map::new();
    for (find, replace) in &source {
        if find == DELETE_MISSING_KEY || find.is_empty() {
            continue;
        }
        map.insert(find.clone(), Value::String(string_of(replace)));
    }
    map.insert(DELETE_MISSING_KEY.to_string(), Value::Bool(delete_missing));

    Value::Object(map)
}

/// Rebuild a generic key/value map, dropping rows with empty keys. When
/// `keep_hide` is set the out-of-band `hide` key is carried over unchanged
/// and placed after the rows.
fn normalize_map(raw: Value, keep_hide: bool) -> Value {
    let source = match raw {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let hide = if keep_hide {
        source.get(HIDE_KEY).cloned()
    } else {
        None
    };

    let mut map = Map::new();
    for (key, value) in &source {
        if key.is_empty() || (keep_hide && key == HIDE_KEY) {
            continue;
        }
        map.insert(key.clone(), value.clone());
    }
    if let Some(hide) = hide {
        map.insert(HIDE_KEY.to_string(), hide);
    }

    Value::Object(map)
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_empty_deletes() {
        assert_eq!(normalize(FieldKind::Text, json!("")), None);
        assert_eq!(
            normalize(FieldKind::Text, json!("S{season}E{episode}")),
            Some(json!("S{season}E{episode}"))
        );
    }

    #[test]
    fn test_csv_keeps_empty_string() {
        assert_eq!(normalize(FieldKind::Csv, json!("")), Some(json!("")));
        assert_eq!(
            normalize(FieldKind::Csv, json!("tmdb, plex")),
            Some(json!("tmdb, plex"))
        );
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(normalize(FieldKind::Number, json!("42")), Some(json!(42)));
        assert_eq!(
            normalize(FieldKind::Number, json!("-1.5")),
            Some(json!(-1.5))
        );
        assert_eq!(normalize(FieldKind::Number, json!("  ")), None);
        assert_eq!(normalize(FieldKind::Number, json!("abc")), None);
        assert_eq!(normalize(FieldKind::Number, json!(7)), Some(json!(7)));
    }

    #[test]
    fn test_boolean_from_strings() {
        assert_eq!(
            normalize(FieldKind::Boolean, json!("true")),
            Some(json!(true))
        );
        assert_eq!(
            normalize(FieldKind::Boolean, json!("false")),
            Some(json!(false))
        );
    }

    #[test]
    fn test_hide_seasons_tri_state() {
        assert_eq!(
            normalize(FieldKind::HideSeasons, json!("true")),
            Some(json!(true))
        );
        assert_eq!(
            normalize(FieldKind::HideSeasons, json!("false")),
            Some(json!(false))
        );
        assert_eq!(
            normalize(FieldKind::HideSeasons, json!("auto")),
            Some(json!("auto"))
        );
        assert_eq!(
            normalize(FieldKind::HideSeasons, json!("anything")),
            Some(json!("auto"))
        );
    }

    #[test]
    fn test_translations_filter_incomplete_rows() {
        let raw = json!([
            {"language": "es", "key": "spanish"},
            {"language": " ", "key": "blank"},
            {"language": "fr", "key": ""},
            {"language": " de ", "key": " german "},
        ]);
        assert_eq!(
            normalize(FieldKind::TranslationList, raw),
            Some(json!([
                {"language": "es", "key": "spanish"},
                {"language": "de", "key": "german"},
            ]))
        );
    }

    #[test]
    fn test_translations_persist_empty_list() {
        assert_eq!(
            normalize(FieldKind::TranslationList, json!([{"language": "", "key": ""}])),
            Some(json!([]))
        );
    }

    #[test]
    fn test_replacements_carry_delete_missing() {
        let raw = json!({"é": "e", "": "dropped"});
        assert_eq!(
            normalize(FieldKind::ReplacementMap, raw),
            Some(json!({"é": "e", "delete_missing": true}))
        );

        let raw = json!({"delete_missing": false, "à": "a"});
        assert_eq!(
            normalize(FieldKind::ReplacementMap, raw),
            Some(json!({"à": "a", "delete_missing": false}))
        );
    }

    #[test]
    fn test_season_map_round_trips_hide() {
        let raw = json!({"1": "Season One", "": "dropped", "hide": "auto"});
        assert_eq!(
            normalize(FieldKind::SeasonMap, raw),
            Some(json!({"1": "Season One", "hide": "auto"}))
        );
    }

    #[test]
    fn test_range_map_drops_empty_keys_only() {
        let raw = json!({"Special": "1-4", "": "x", "hide": "kept as plain row"});
        assert_eq!(
            normalize(FieldKind::RangeMap, raw),
            Some(json!({"Special": "1-4", "hide": "kept as plain row"}))
        );
    }
}
