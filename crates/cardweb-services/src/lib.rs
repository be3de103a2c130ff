//! External integrations for cardweb
//!
//! Two concerns live here, both behind simple seams:
//! - series search against a Plex server
//! - preview rendering through an external renderer command

use std::sync::Arc;

pub mod error;
pub mod preview;
pub mod search;

pub use error::{ServiceError, ServiceResult};
pub use preview::{merge_series_config, Preview, PreviewRenderer};
pub use search::{PlexSearchClient, SearchIds, SearchResult, SeriesSearch};

/// Shared search backend reference
pub type SearchRef = Arc<dyn SeriesSearch>;
