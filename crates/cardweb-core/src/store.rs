//! tv.yml persistence
//!
//! The store owns the series YAML file: it loads `libraries` and `series`
//! into the JSON payload shape the editor works with, and writes edits
//! back while preserving unrelated top-level sections (such as `fonts`).

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One named series entry as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub name: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// The editable content of tv.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TvPayload {
    #[serde(default)]
    pub libraries: Map<String, Value>,
    #[serde(default)]
    pub series: Vec<SeriesRecord>,
}

/// Reader/writer for the series YAML file
#[derive(Debug, Clone)]
pub struct TvStore {
    path: PathBuf,
}

impl TvStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the editable payload. A missing file yields an empty payload.
    pub fn load(&self) -> CoreResult<TvPayload> {
        let root = self.read_root()?;

        let libraries = root
            .get("libraries")
            .map(yaml_to_json_map)
            .unwrap_or_default();

        let mut series = Vec::new();
        if let Some(serde_yaml::Value::Mapping(mapping)) = root.get("series") {
            for (key, value) in mapping {
                let Some(name) = yaml_key_string(key) else {
                    continue;
                };
                series.push(SeriesRecord {
                    name,
                    config: yaml_to_json_map(value),
                });
            }
        }

        Ok(TvPayload { libraries, series })
    }

    /// Named font templates from the `fonts` section, used by previews.
    pub fn fonts(&self) -> CoreResult<Map<String, Value>> {
        let root = self.read_root()?;
        Ok(root.get("fonts").map(yaml_to_json_map).unwrap_or_default())
    }

    /// Persist the payload, keeping unrelated top-level sections intact.
    /// Entries with empty names are skipped.
    pub fn write(&self, payload: &TvPayload) -> CoreResult<()> {
        let mut root = self.read_root()?;

        root.insert(
            serde_yaml::Value::String("libraries".to_string()),
            json_to_yaml(&Value::Object(payload.libraries.clone())),
        );

        let mut series = serde_yaml::Mapping::new();
        for record in &payload.series {
            if record.name.is_empty() {
                continue;
            }
            series.insert(
                serde_yaml::Value::String(record.name.clone()),
                json_to_yaml(&Value::Object(record.config.clone())),
            );
        }
        root.insert(
            serde_yaml::Value::String("series".to_string()),
            serde_yaml::Value::Mapping(series),
        );

        let content = serde_yaml::to_string(&serde_yaml::Value::Mapping(root)).map_err(|e| {
            CoreError::InternalError {
                message: format!("Unable to serialise series file: {e}"),
            }
        })?;
        std::fs::write(&self.path, content)?;

        log::info!(
            "Wrote {} series entries to {}",
            payload.series.len(),
            self.path.display()
        );
        Ok(())
    }

    fn read_root(&self) -> CoreResult<serde_yaml::Mapping> {
        if !self.path.exists() {
            return Ok(serde_yaml::Mapping::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| CoreError::InvalidFormat {
                message: format!("{}: {e}", self.path.display()),
            })?;

        match value {
            serde_yaml::Value::Mapping(mapping) => Ok(mapping),
            serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
            _ => Err(CoreError::InvalidFormat {
                message: format!("{}: expected a mapping at the top level", self.path.display()),
            }),
        }
    }
}

// ==================== YAML <-> JSON conversion ====================

fn yaml_key_string(key: &serde_yaml::Value) -> Option<String> {
    match key {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Convert a YAML value into a JSON mapping; null and non-mappings become
/// an empty mapping (absent sections default to empty).
fn yaml_to_json_map(value: &serde_yaml::Value) -> Map<String, Value> {
    match yaml_to_json(value) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn yaml_to_json(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                if let Some(key) = yaml_key_string(key) {
                    map.insert(key, yaml_to_json(value));
                }
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn json_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Value::Number(u.into())
            } else {
                n.as_f64()
                    .map(|f| serde_yaml::Value::Number(f.into()))
                    .unwrap_or(serde_yaml::Value::Null)
            }
        }
        Value::String(s) => serde_yaml::Value::String(s.clone()),
        Value::Array(items) => {
            serde_yaml::Value::Sequence(items.iter().map(json_to_yaml).collect())
        }
        Value::Object(map) => {
            let mut mapping = serde_yaml::Mapping::new();
            for (key, value) in map {
                mapping.insert(
                    serde_yaml::Value::String(key.clone()),
                    json_to_yaml(value),
                );
            }
            serde_yaml::Value::Mapping(mapping)
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store(name: &str) -> TvStore {
        let path = std::env::temp_dir().join(format!(
            "cardweb-store-{}-{}.yml",
            name,
            cardweb_utils::generate_id()
        ));
        TvStore::new(path)
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let store = temp_store("missing");
        let payload = store.load().unwrap();
        assert!(payload.libraries.is_empty());
        assert!(payload.series.is_empty());
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let store = temp_store("roundtrip");
        let payload = TvPayload {
            libraries: object(json!({"TV Shows": {"path": "/media/tv"}})),
            series: vec![
                SeriesRecord {
                    name: "Show B".to_string(),
                    config: object(json!({"library": "TV Shows", "tmdb_id": 42})),
                },
                SeriesRecord {
                    name: "Show A".to_string(),
                    config: object(json!({"seasons": {"1": "One", "hide": false}})),
                },
                SeriesRecord {
                    name: String::new(),
                    config: Map::new(),
                },
            ],
        };

        store.write(&payload).unwrap();
        let loaded = store.load().unwrap();

        // Nameless entry skipped, order preserved
        let names: Vec<&str> = loaded.series.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Show B", "Show A"]);
        assert_eq!(loaded.series[0].config.get("tmdb_id"), Some(&json!(42)));
        assert_eq!(
            loaded.series[1].config.get("seasons"),
            Some(&json!({"1": "One", "hide": false}))
        );

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_numeric_season_keys_become_strings() {
        let store = temp_store("keys");
        std::fs::write(
            store.path(),
            "series:\n  Show A:\n    seasons:\n      1: Season One\n",
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(
            loaded.series[0].config.get("seasons"),
            Some(&json!({"1": "Season One"}))
        );

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_write_preserves_fonts_section() {
        let store = temp_store("fonts");
        std::fs::write(
            store.path(),
            "fonts:\n  Fancy:\n    file: /config/fonts/fancy.ttf\nseries: {}\n",
        )
        .unwrap();

        store.write(&TvPayload::default()).unwrap();

        let fonts = store.fonts().unwrap();
        assert_eq!(
            fonts.get("Fancy"),
            Some(&json!({"file": "/config/fonts/fancy.ttf"}))
        );

        std::fs::remove_file(store.path()).ok();
    }

    #[test]
    fn test_null_series_config_defaults_to_empty() {
        let store = temp_store("null-config");
        std::fs::write(store.path(), "series:\n  Show A:\n").unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.series[0].name, "Show A");
        assert!(loaded.series[0].config.is_empty());

        std::fs::remove_file(store.path()).ok();
    }
}
