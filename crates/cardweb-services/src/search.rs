//! Plex series search
//!
//! Queries the Plex HTTP search API and extracts the parts the editor
//! cares about: title, year, owning library, and external identifiers
//! (parsed out of Plex guid strings like `tmdb://1399`).

use crate::error::{ServiceError, ServiceResult};
use async_trait::async_trait;
use cardweb_config::PlexConfig;
use serde::{Deserialize, Serialize};

/// External identifiers attached to a search result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
}

/// One candidate series returned by search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub ids: SearchIds,
}

impl SearchResult {
    /// "Title (Year)" when the year is known, the bare title otherwise
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// Trait seam for series search backends
#[async_trait]
pub trait SeriesSearch: Send + Sync {
    /// Search for shows matching the query string
    async fn search(&self, query: &str, limit: usize) -> ServiceResult<Vec<SearchResult>>;
}

// ==================== Plex wire format ====================

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "MediaContainer", default)]
    container: MediaContainer,
}

#[derive(Debug, Default, Deserialize)]
struct MediaContainer {
    #[serde(rename = "Metadata", default)]
    metadata: Vec<Metadata>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    title: String,
    year: Option<i64>,
    #[serde(rename = "librarySectionTitle")]
    library: Option<String>,
    summary: Option<String>,
    #[serde(rename = "Guid", default)]
    guids: Vec<GuidRef>,
}

#[derive(Debug, Deserialize)]
struct GuidRef {
    #[serde(default)]
    id: String,
}

impl Metadata {
    fn into_result(self) -> SearchResult {
        let mut ids = SearchIds::default();
        for guid in &self.guids {
            if let Some((scheme, value)) = guid.id.split_once("://") {
                match scheme {
                    "tmdb" => ids.tmdb_id = Some(value.to_string()),
                    "tvdb" => ids.tvdb_id = Some(value.to_string()),
                    "imdb" => ids.imdb_id = Some(value.to_string()),
                    _ => {}
                }
            }
        }
        SearchResult {
            title: self.title,
            year: self.year,
            library: self.library,
            summary: self.summary,
            ids,
        }
    }
}

// ==================== Plex client ====================

/// Search client backed by a Plex server
pub struct PlexSearchClient {
    config: PlexConfig,
    client: reqwest::Client,
}

impl PlexSearchClient {
    pub fn new(config: PlexConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SeriesSearch for PlexSearchClient {
    async fn search(&self, query: &str, limit: usize) -> ServiceResult<Vec<SearchResult>> {
        if !self.config.enabled {
            return Err(ServiceError::PlexDisabled);
        }

        let url = format!("{}/search", self.config.url.trim_end_matches('/'));
        log::debug!("Searching Plex for '{query}'");

        let response = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .header("X-Plex-Token", &self.config.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ServiceError::Http {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::Http {
                message: format!("Plex returned HTTP {}", response.status()),
            });
        }

        let envelope: SearchEnvelope =
            response.json().await.map_err(|e| ServiceError::UnexpectedPayload {
                message: e.to_string(),
            })?;

        Ok(envelope
            .container
            .metadata
            .into_iter()
            .filter(|item| item.kind == "show")
            .take(limit)
            .map(Metadata::into_result)
            .collect())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guid_parsing() {
        let payload = r#"{
            "MediaContainer": {
                "Metadata": [
                    {
                        "type": "show",
                        "title": "The Example Show",
                        "year": 2024,
                        "librarySectionTitle": "TV Shows",
                        "Guid": [
                            {"id": "tmdb://1399"},
                            {"id": "tvdb://121361"},
                            {"id": "imdb://tt0944947"},
                            {"id": "plex://show/abc"}
                        ]
                    },
                    {"type": "movie", "title": "Some Movie"}
                ]
            }
        }"#;

        let envelope: SearchEnvelope = serde_json::from_str(payload).unwrap();
        let results: Vec<SearchResult> = envelope
            .container
            .metadata
            .into_iter()
            .filter(|item| item.kind == "show")
            .map(Metadata::into_result)
            .collect();

        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert_eq!(result.display_title(), "The Example Show (2024)");
        assert_eq!(result.library.as_deref(), Some("TV Shows"));
        assert_eq!(result.ids.tmdb_id.as_deref(), Some("1399"));
        assert_eq!(result.ids.tvdb_id.as_deref(), Some("121361"));
        assert_eq!(result.ids.imdb_id.as_deref(), Some("tt0944947"));
    }

    #[test]
    fn test_display_title_without_year() {
        let result = SearchResult {
            title: "Untitled".to_string(),
            year: None,
            library: None,
            summary: None,
            ids: SearchIds::default(),
        };
        assert_eq!(result.display_title(), "Untitled");
    }

    #[test]
    fn test_empty_container_deserializes() {
        let envelope: SearchEnvelope = serde_json::from_str("{}").unwrap();
        assert!(envelope.container.metadata.is_empty());
    }
}
