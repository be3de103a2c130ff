//! Field catalog for the series editor
//!
//! The catalog is the static field template with per-request dynamic
//! choices (libraries, card types, styles, episode data sources, font
//! cases) filled in. Field kinds are a closed enum so rendering and
//! normalization dispatch exhaustively.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Known card type names, sorted
pub const CARD_TYPES: &[&str] = &[
    "anime",
    "cutout",
    "fade",
    "frame",
    "generic",
    "gundam",
    "landscape",
    "logo",
    "olivier",
    "polymath",
    "poster",
    "roman",
    "standard",
    "star wars",
    "textless",
];

/// Watched/unwatched style names, sorted
pub const STYLES: &[&str] = &[
    "art",
    "art blur",
    "art unique",
    "blur",
    "blur unique",
    "unique",
];

/// Valid episode data sources
pub const EPISODE_DATA_SOURCES: &[&str] = &["emby", "jellyfin", "plex", "sonarr", "tmdb"];

/// Font casing function names, sorted
pub const FONT_CASES: &[&str] = &["blank", "lower", "source", "title", "upper"];

/// Kind of control a field renders as, and how its value is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Choice,
    Library,
    CardType,
    Style,
    FontCase,
    Csv,
    TranslationList,
    Font,
    ReplacementMap,
    Extras,
    SeasonMap,
    RangeMap,
    HideSeasons,
    /// Forward-compat fallback; rendered as a plain text control
    #[serde(other)]
    Unknown,
}

/// One selectable option of a choice-like field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// Schema entry describing one editable config attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: String,
    pub label: String,
    pub path: Vec<String>,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn field(id: &str, label: &str, path: &[&str], kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        id: id.to_string(),
        label: label.to_string(),
        path: path.iter().map(|s| s.to_string()).collect(),
        kind,
        choices: vec![],
        default: None,
    }
}

fn field_with_default(
    id: &str,
    label: &str,
    path: &[&str],
    kind: FieldKind,
    default: Value,
) -> FieldDescriptor {
    FieldDescriptor {
        default: Some(default),
        ..field(id, label, path, kind)
    }
}

/// The static series field template, in display order
static SERIES_FIELD_TEMPLATE: Lazy<Vec<FieldDescriptor>> = Lazy::new(|| {
    vec![
        field_with_default(
            "library",
            "Library",
            &["library"],
            FieldKind::Library,
            json!("TV Shows"),
        ),
        field_with_default(
            "card_type",
            "Card Type",
            &["card_type"],
            FieldKind::CardType,
            json!("standard"),
        ),
        field(
            "episode_text_format",
            "Episode text format",
            &["episode_text_format"],
            FieldKind::Text,
        ),
        field(
            "episode_data_source",
            "Episode data source",
            &["episode_data_source"],
            FieldKind::Choice,
        ),
        field(
            "watched_style",
            "Watched style",
            &["watched_style"],
            FieldKind::Style,
        ),
        field(
            "unwatched_style",
            "Unwatched style",
            &["unwatched_style"],
            FieldKind::Style,
        ),
        field("tmdb_id", "TMDb ID", &["tmdb_id"], FieldKind::Number),
        field("tvdb_id", "TVDb ID", &["tvdb_id"], FieldKind::Number),
        field("imdb_id", "IMDb ID", &["imdb_id"], FieldKind::Text),
        field("tvrage_id", "TVRage ID", &["tvrage_id"], FieldKind::Number),
        field("emby_id", "Emby ID", &["emby_id"], FieldKind::Text),
        field("jellyfin_id", "Jellyfin ID", &["jellyfin_id"], FieldKind::Text),
        field("sonarr_id", "Sonarr ID", &["sonarr_id"], FieldKind::Number),
        field(
            "refresh_titles",
            "Refresh titles",
            &["refresh_titles"],
            FieldKind::Boolean,
        ),
        field(
            "sync_specials",
            "Sync specials",
            &["sync_specials"],
            FieldKind::Boolean,
        ),
        field(
            "sonarr_sync",
            "Sync from Sonarr",
            &["sonarr_sync"],
            FieldKind::Boolean,
        ),
        field(
            "tmdb_sync",
            "Sync from TMDb",
            &["tmdb_sync"],
            FieldKind::Boolean,
        ),
        field(
            "tmdb_skip_localized_images",
            "Skip localized TMDb images",
            &["tmdb_skip_localized_images"],
            FieldKind::Boolean,
        ),
        field("archive", "Create archive", &["archive"], FieldKind::Boolean),
        field(
            "archive_all_variations",
            "Archive all variations",
            &["archive_all_variations"],
            FieldKind::Boolean,
        ),
        field(
            "archive_name",
            "Archive name",
            &["archive_name"],
            FieldKind::Text,
        ),
        field(
            "library_override",
            "Override media directory",
            &["media_directory"],
            FieldKind::Text,
        ),
        field(
            "filename_format",
            "Filename format",
            &["filename_format"],
            FieldKind::Text,
        ),
        field(
            "image_source_priority",
            "Image source priority",
            &["image_source_priority"],
            FieldKind::Csv,
        ),
        field(
            "translation",
            "Translations",
            &["translation"],
            FieldKind::TranslationList,
        ),
        field("font.file", "Font file", &["font", "file"], FieldKind::Font),
        field("font.size", "Font size (%)", &["font", "size"], FieldKind::Text),
        field("font.color", "Font color", &["font", "color"], FieldKind::Text),
        field(
            "font.case",
            "Font casing",
            &["font", "case"],
            FieldKind::FontCase,
        ),
        field(
            "font.vertical_shift",
            "Font vertical shift",
            &["font", "vertical_shift"],
            FieldKind::Number,
        ),
        field(
            "font.interline_spacing",
            "Font interline spacing",
            &["font", "interline_spacing"],
            FieldKind::Number,
        ),
        field(
            "font.interword_spacing",
            "Font interword spacing",
            &["font", "interword_spacing"],
            FieldKind::Number,
        ),
        field(
            "font.kerning",
            "Font kerning",
            &["font", "kerning"],
            FieldKind::Text,
        ),
        field(
            "font.stroke_width",
            "Font stroke width",
            &["font", "stroke_width"],
            FieldKind::Text,
        ),
        field(
            "font.validate",
            "Validate font",
            &["font", "validate"],
            FieldKind::Boolean,
        ),
        field(
            "font.replacements",
            "Font replacements",
            &["font", "replacements"],
            FieldKind::ReplacementMap,
        ),
        field(
            "extras",
            "Extra card options",
            &["extras"],
            FieldKind::Extras,
        ),
        field(
            "seasons.hide",
            "Hide seasons",
            &["seasons", "hide"],
            FieldKind::HideSeasons,
        ),
        field(
            "seasons.titles",
            "Season titles",
            &["seasons"],
            FieldKind::SeasonMap,
        ),
        field(
            "episode_ranges",
            "Episode ranges",
            &["episode_ranges"],
            FieldKind::RangeMap,
        ),
    ]
});

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Return the field catalog with dynamic choices populated
pub fn build_series_fields(libraries: &Map<String, Value>) -> Vec<FieldDescriptor> {
    let library_choices: Vec<Choice> = libraries.keys().map(|name| Choice::plain(name)).collect();

    SERIES_FIELD_TEMPLATE
        .iter()
        .map(|template| {
            let mut filled = template.clone();
            match filled.id.as_str() {
                "library" => filled.choices = library_choices.clone(),
                "card_type" => {
                    filled.choices = CARD_TYPES
                        .iter()
                        .map(|value| Choice {
                            value: value.to_string(),
                            label: title_case(value),
                        })
                        .collect();
                }
                "watched_style" | "unwatched_style" => {
                    filled.choices = STYLES.iter().map(|v| Choice::plain(v)).collect();
                }
                "episode_data_source" => {
                    filled.choices = EPISODE_DATA_SOURCES
                        .iter()
                        .map(|v| Choice::plain(v))
                        .collect();
                }
                "font.case" => {
                    filled.choices = FONT_CASES.iter().map(|v| Choice::plain(v)).collect();
                }
                _ => {}
            }
            filled
        })
        .collect()
}

/// Default value applied when a field is added without an explicit default
pub fn default_value_for(descriptor: &FieldDescriptor) -> Value {
    if let Some(default) = &descriptor.default {
        return default.clone();
    }
    match descriptor.kind {
        FieldKind::Boolean => json!(false),
        FieldKind::TranslationList => json!([]),
        FieldKind::ReplacementMap
        | FieldKind::Extras
        | FieldKind::SeasonMap
        | FieldKind::RangeMap => json!({}),
        _ => json!(""),
    }
}

// ==================== Tests ====================
