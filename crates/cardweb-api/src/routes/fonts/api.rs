//! Fonts API endpoints - JSON API
//!
//! Lists a directory under the configured font root: directories first,
//! then files, each group in case-insensitive name order.

use crate::AppState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One entry of a font directory listing
#[derive(Debug, Clone)]
pub struct FontEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: Option<u64>,
    pub modified: Option<String>,
}

fn file_modified(path: &Path) -> Option<String> {
    let modified = path.metadata().ok()?.modified().ok()?;
    Some(
        chrono::DateTime::<chrono::Local>::from(modified)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
    )
}

/// List a directory, directories first, case-insensitive name order.
/// A missing or unreadable directory lists as empty.
pub fn list_font_dir(path: &Path) -> Vec<FontEntry> {
    let mut entries: Vec<FontEntry> = Vec::new();

    if let Ok(dir) = std::fs::read_dir(path) {
        for entry in dir.filter_map(|e| e.ok()) {
            let entry_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry_path.is_dir();
            entries.push(FontEntry {
                name,
                path: entry_path.to_string_lossy().into_owned(),
                is_dir,
                size: if is_dir {
                    None
                } else {
                    entry_path.metadata().ok().map(|m| m.len())
                },
                modified: file_modified(&entry_path),
            });
        }
    }

    entries.sort_by(|a, b| {
        (!a.is_dir, a.name.to_lowercase()).cmp(&(!b.is_dir, b.name.to_lowercase()))
    });
    entries
}

/// Path-scoped font directory listing (JSON API)
pub async fn api_fonts(
    state: axum::extract::State<AppState>,
    params: axum::extract::Query<HashMap<String, String>>,
) -> String {
    let requested = params
        .get("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.data.font_directory.clone());

    let entries: Vec<serde_json::Value> = list_font_dir(&requested)
        .into_iter()
        .map(|entry| {
            serde_json::json!({
                "name": entry.name,
                "path": entry.path,
                "type": if entry.is_dir { "directory" } else { "file" },
            })
        })
        .collect();

    serde_json::to_string(&serde_json::json!({
        "path": requested.to_string_lossy(),
        "entries": entries,
    }))
    .unwrap_or_default()
}
