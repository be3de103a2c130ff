//! Nested-path access into series config mappings
//!
//! A path is an ordered sequence of string keys locating a value inside a
//! nested JSON mapping. Intermediate segments are always mappings: `set`
//! creates missing intermediates, `delete` garbage-collects parents that
//! became empty.

use serde_json::{Map, Value};

/// Get the value at `path`, or None if any segment is absent.
pub fn get<'a>(map: &'a Map<String, Value>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut current = map.get(first)?;
    for key in rest {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

/// Set the value at `path`, creating intermediate mappings as needed.
///
/// A non-mapping value found at an intermediate segment is overwritten
/// with an empty mapping.
pub fn set(map: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.insert(first.clone(), value);
        return;
    }
    let child = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child_map) = child {
        set(child_map, rest, value);
    }
}

/// Remove the leaf at `path`, then remove any parent mapping left empty.
pub fn delete(map: &mut Map<String, Value>, path: &[String]) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.remove(first);
        return;
    }
    if let Some(Value::Object(child)) = map.get_mut(first) {
        delete(child, rest);
        if child.is_empty() {
            map.remove(first);
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_get_after_set() {
        let mut map = Map::new();
        set(&mut map, &path(&["font", "size"]), json!("120%"));
        assert_eq!(get(&map, &path(&["font", "size"])), Some(&json!("120%")));

        set(&mut map, &path(&["library"]), json!("TV Shows"));
        assert_eq!(get(&map, &path(&["library"])), Some(&json!("TV Shows")));
    }

    #[test]
    fn test_get_missing_path() {
        let map = Map::new();
        assert_eq!(get(&map, &path(&["font", "size"])), None);
        assert_eq!(get(&map, &[]), None);
    }

    #[test]
    fn test_set_overwrites_non_mapping_intermediate() {
        let mut map = Map::new();
        set(&mut map, &path(&["font"]), json!("Arial.ttf"));
        set(&mut map, &path(&["font", "size"]), json!(90));
        assert_eq!(get(&map, &path(&["font", "size"])), Some(&json!(90)));
        assert_eq!(get(&map, &path(&["font"])), Some(&json!({"size": 90})));
    }

    #[test]
    fn test_delete_leaf_and_cleans_empty_parents() {
        let mut map = Map::new();
        set(&mut map, &path(&["seasons", "titles", "1"]), json!("One"));
        delete(&mut map, &path(&["seasons", "titles", "1"]));

        assert_eq!(get(&map, &path(&["seasons", "titles", "1"])), None);
        // No empty intermediate mapping may remain
        assert!(map.is_empty());
    }

    #[test]
    fn test_delete_keeps_populated_parents() {
        let mut map = Map::new();
        set(&mut map, &path(&["font", "size"]), json!("120%"));
        set(&mut map, &path(&["font", "color"]), json!("#ffffff"));
        delete(&mut map, &path(&["font", "size"]));

        assert_eq!(get(&map, &path(&["font", "size"])), None);
        assert_eq!(
            get(&map, &path(&["font", "color"])),
            Some(&json!("#ffffff"))
        );
    }

    #[test]
    fn test_delete_missing_path_is_noop() {
        let mut map = Map::new();
        set(&mut map, &path(&["library"]), json!("TV Shows"));
        delete(&mut map, &path(&["font", "size"]));
        assert_eq!(get(&map, &path(&["library"])), Some(&json!("TV Shows")));
    }
}
