//! Series configuration model and editing session

pub mod error;
pub mod fields;
pub mod paths;
pub mod store;
pub mod values;

use serde_json::{Map, Value};

pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use fields::{
    build_series_fields, default_value_for, Choice, FieldDescriptor, FieldKind, CARD_TYPES,
};
pub use store::{SeriesRecord, TvPayload, TvStore};
pub use values::normalize;

/// Library name assumed when nothing better is known
pub const FALLBACK_LIBRARY: &str = "TV Shows";

// ==================== Entries ====================

/// One named configuration record being edited
#[derive(Debug, Clone)]
pub struct SeriesEntry {
    id: String,
    name: String,
    config: Map<String, Value>,
}

impl SeriesEntry {
    /// Derived identifier, stable for the lifetime of the session entry.
    /// Not persisted.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Current value of a field, if present in the config
    pub fn field_value(&self, field: &FieldDescriptor) -> Option<&Value> {
        paths::get(&self.config, &field.path)
    }
}

fn entry_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "entry".to_string()
    } else {
        slug
    }
}

// ==================== Search seeding ====================

/// The parts of an external search result used to seed a new entry
#[derive(Debug, Clone, Default)]
pub struct SearchSeed {
    pub library: Option<String>,
    pub tmdb_id: Option<String>,
    pub tvdb_id: Option<String>,
    pub imdb_id: Option<String>,
}

// ==================== Editor session ====================

/// The in-memory editing state: libraries, ordered entries, and the
/// current name filter. All mutation goes through these methods.
#[derive(Debug, Default)]
pub struct EditorSession {
    libraries: Map<String, Value>,
    entries: Vec<SeriesEntry>,
    filter: String,
}

impl EditorSession {
    /// Replace the whole session content from a loaded payload
    pub fn replace(&mut self, payload: TvPayload) {
        self.libraries = payload.libraries;
        self.entries = payload
            .series
            .into_iter()
            .enumerate()
            .map(|(index, record)| SeriesEntry {
                id: format!("{}-{}", entry_slug(&record.name), index),
                name: record.name,
                config: record.config,
            })
            .collect();
    }

    /// Current content in the persistable payload shape
    pub fn to_payload(&self) -> TvPayload {
        TvPayload {
            libraries: self.libraries.clone(),
            series: self
                .entries
                .iter()
                .map(|entry| SeriesRecord {
                    name: entry.name.clone(),
                    config: entry.config.clone(),
                })
                .collect(),
        }
    }

    pub fn libraries(&self) -> &Map<String, Value> {
        &self.libraries
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&SeriesEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_lowercase();
    }

    /// Entries whose name matches the current filter, in order
    pub fn filtered_entries(&self) -> Vec<&SeriesEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.name.to_lowercase().contains(&self.filter))
            .collect()
    }

    /// The field catalog with choices for the current libraries
    pub fn fields(&self) -> Vec<FieldDescriptor> {
        build_series_fields(&self.libraries)
    }

    /// Look up a catalog field by id
    pub fn field(&self, field_id: &str) -> CoreResult<FieldDescriptor> {
        self.fields()
            .into_iter()
            .find(|field| field.id == field_id)
            .ok_or_else(|| CoreError::FieldNotFound {
                field: field_id.to_string(),
            })
    }

    /// Create a new entry. Names must be non-empty and unique.
    pub fn add_entry(&mut self, name: &str, config: Map<String, Value>) -> CoreResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError {
                message: "Series name is required".to_string(),
            });
        }
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(CoreError::DuplicateEntry {
                entry: name.to_string(),
            });
        }

        self.entries.push(SeriesEntry {
            id: format!("{}-{}", entry_slug(name), cardweb_utils::generate_id()),
            name: name.to_string(),
            config,
        });
        log::debug!("Added series entry '{name}'");
        Ok(())
    }

    pub fn remove_entry(&mut self, id: &str) -> CoreResult<()> {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            return Err(CoreError::EntryNotFound {
                name: id.to_string(),
            });
        }
        Ok(())
    }

    /// Rename an entry in place. Duplicates are tolerated here (they are
    /// only rejected at creation time); nameless entries are dropped when
    /// the file is written.
    pub fn rename_entry(&mut self, id: &str, name: &str) -> CoreResult<()> {
        let entry = self.entry_mut(id)?;
        entry.name = name.to_string();
        Ok(())
    }

    /// Apply an edit: normalize the raw value for the field's kind, then
    /// set it, or delete the path when normalization yields nothing.
    pub fn update_field(
        &mut self,
        entry_id: &str,
        field: &FieldDescriptor,
        raw: Value,
    ) -> CoreResult<()> {
        let entry = self.entry_mut(entry_id)?;
        match normalize(field.kind, raw) {
            Some(value) => paths::set(&mut entry.config, &field.path, value),
            None => paths::delete(&mut entry.config, &field.path),
        }
        Ok(())
    }

    /// Remove a field, garbage-collecting emptied parents
    pub fn remove_field(&mut self, entry_id: &str, field: &FieldDescriptor) -> CoreResult<()> {
        let entry = self.entry_mut(entry_id)?;
        paths::delete(&mut entry.config, &field.path);
        Ok(())
    }

    /// Set a field to its default value (the "add line" action)
    pub fn add_field(&mut self, entry_id: &str, field: &FieldDescriptor) -> CoreResult<()> {
        let default = default_value_for(field);
        let entry = self.entry_mut(entry_id)?;
        paths::set(&mut entry.config, &field.path, default);
        Ok(())
    }

    /// Pick the library for a new entry: a known library named by the
    /// search result wins, then a library literally named "TV Shows",
    /// then the first configured library, then the literal fallback.
    pub fn default_library(&self, candidate: Option<&str>) -> String {
        if self.libraries.is_empty() {
            return FALLBACK_LIBRARY.to_string();
        }
        if let Some(candidate) = candidate {
            if self.libraries.contains_key(candidate) {
                return candidate.to_string();
            }
        }
        if self.libraries.contains_key(FALLBACK_LIBRARY) {
            return FALLBACK_LIBRARY.to_string();
        }
        self.libraries
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| FALLBACK_LIBRARY.to_string())
    }

    /// Initial config for a new entry, seeded from an optional search
    /// result: best-guess library, the standard card type, and whatever
    /// identifiers are parseable.
    pub fn seeded_config(&self, seed: Option<&SearchSeed>) -> Map<String, Value> {
        let mut config = Map::new();

        let library = self.default_library(seed.and_then(|s| s.library.as_deref()));
        config.insert("library".to_string(), Value::String(library));
        config.insert("card_type".to_string(), Value::String("standard".to_string()));

        if let Some(seed) = seed {
            if let Some(tmdb) = seed.tmdb_id.as_deref().and_then(|v| v.parse::<i64>().ok()) {
                config.insert("tmdb_id".to_string(), Value::Number(tmdb.into()));
            }
            if let Some(tvdb) = seed.tvdb_id.as_deref().and_then(|v| v.parse::<i64>().ok()) {
                config.insert("tvdb_id".to_string(), Value::Number(tvdb.into()));
            }
            if let Some(imdb) = seed.imdb_id.as_deref().filter(|v| !v.is_empty()) {
                config.insert("imdb_id".to_string(), Value::String(imdb.to_string()));
            }
        }

        config
    }

    fn entry_mut(&mut self, id: &str) -> CoreResult<&mut SeriesEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| CoreError::EntryNotFound {
                name: id.to_string(),
            })
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn session_with(libraries: Value, series: Vec<(&str, Value)>) -> EditorSession {
        let mut session = EditorSession::default();
        session.replace(TvPayload {
            libraries: object(libraries),
            series: series
                .into_iter()
                .map(|(name, config)| SeriesRecord {
                    name: name.to_string(),
                    config: object(config),
                })
                .collect(),
        });
        session
    }

    #[test]
    fn test_loaded_entry_has_library_field_populated() {
        let session = session_with(
            json!({"TV Shows": {}}),
            vec![("Show A", json!({"library": "TV Shows"}))],
        );

        assert_eq!(session.entries().len(), 1);
        let entry = &session.entries()[0];
        assert_eq!(entry.name(), "Show A");

        let library = session.field("library").unwrap();
        assert_eq!(entry.field_value(&library), Some(&json!("TV Shows")));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut session = session_with(json!({}), vec![("Show A", json!({}))]);
        let result = session.add_entry("Show A", Map::new());
        assert!(matches!(result, Err(CoreError::DuplicateEntry { .. })));

        let result = session.add_entry("  ", Map::new());
        assert!(matches!(result, Err(CoreError::ValidationError { .. })));
    }

    #[test]
    fn test_removing_only_field_leaves_empty_config() {
        let mut session = session_with(
            json!({}),
            vec![("Show A", json!({"font": {"size": "120%"}}))],
        );
        let id = session.entries()[0].id().to_string();
        let field = session.field("font.size").unwrap();

        session.remove_field(&id, &field).unwrap();
        assert!(session.entry(&id).unwrap().config().is_empty());
    }

    #[test]
    fn test_update_field_empty_text_deletes() {
        let mut session = session_with(
            json!({}),
            vec![("Show A", json!({"archive_name": "Old"}))],
        );
        let id = session.entries()[0].id().to_string();
        let field = session.field("archive_name").unwrap();

        session.update_field(&id, &field, json!("")).unwrap();
        assert!(session.entry(&id).unwrap().config().is_empty());
    }

    #[test]
    fn test_update_field_normalizes_translations() {
        let mut session = session_with(json!({}), vec![("Show A", json!({}))]);
        let id = session.entries()[0].id().to_string();
        let field = session.field("translation").unwrap();

        session
            .update_field(
                &id,
                &field,
                json!([
                    {"language": "es", "key": "spanish"},
                    {"language": "", "key": "dropped"},
                ]),
            )
            .unwrap();

        let entry = session.entry(&id).unwrap();
        assert_eq!(
            entry.field_value(&field),
            Some(&json!([{"language": "es", "key": "spanish"}]))
        );
    }

    #[test]
    fn test_add_field_applies_defaults() {
        let mut session = session_with(json!({}), vec![("Show A", json!({}))]);
        let id = session.entries()[0].id().to_string();

        let archive = session.field("archive").unwrap();
        session.add_field(&id, &archive).unwrap();

        let card_type = session.field("card_type").unwrap();
        session.add_field(&id, &card_type).unwrap();

        let entry = session.entry(&id).unwrap();
        assert_eq!(entry.field_value(&archive), Some(&json!(false)));
        assert_eq!(entry.field_value(&card_type), Some(&json!("standard")));
    }

    #[test]
    fn test_default_library_policy() {
        let empty = session_with(json!({}), vec![]);
        assert_eq!(empty.default_library(None), "TV Shows");

        let with_tv = session_with(json!({"Anime": {}, "TV Shows": {}}), vec![]);
        assert_eq!(with_tv.default_library(None), "TV Shows");
        assert_eq!(with_tv.default_library(Some("Anime")), "Anime");
        assert_eq!(with_tv.default_library(Some("Movies")), "TV Shows");

        let without_tv = session_with(json!({"Anime": {}, "Kids": {}}), vec![]);
        assert_eq!(without_tv.default_library(None), "Anime");
    }

    #[test]
    fn test_seeded_config_parses_ids() {
        let session = session_with(json!({"TV Shows": {}}), vec![]);
        let seed = SearchSeed {
            library: Some("TV Shows".to_string()),
            tmdb_id: Some("1399".to_string()),
            tvdb_id: Some("not-a-number".to_string()),
            imdb_id: Some("tt0944947".to_string()),
        };

        let config = session.seeded_config(Some(&seed));
        assert_eq!(config.get("library"), Some(&json!("TV Shows")));
        assert_eq!(config.get("card_type"), Some(&json!("standard")));
        assert_eq!(config.get("tmdb_id"), Some(&json!(1399)));
        assert_eq!(config.get("tvdb_id"), None);
        assert_eq!(config.get("imdb_id"), Some(&json!("tt0944947")));
    }

    #[test]
    fn test_filtered_entries() {
        let mut session = session_with(
            json!({}),
            vec![("Breaking Slow", json!({})), ("The Example Show", json!({}))],
        );
        session.set_filter("example");
        let filtered = session.filtered_entries();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name(), "The Example Show");
    }

    #[test]
    fn test_rename_and_remove_entry() {
        let mut session = session_with(json!({}), vec![("Show A", json!({}))]);
        let id = session.entries()[0].id().to_string();

        session.rename_entry(&id, "Show A (2024)").unwrap();
        assert_eq!(session.entry(&id).unwrap().name(), "Show A (2024)");

        session.remove_entry(&id).unwrap();
        assert!(session.entries().is_empty());
        assert!(matches!(
            session.remove_entry(&id),
            Err(CoreError::EntryNotFound { .. })
        ));
    }
}
