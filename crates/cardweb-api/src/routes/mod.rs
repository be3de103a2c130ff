//! Route modules for the API server
//!
//! All routes are organized into modules:
//! - meta: field catalog metadata
//! - series: config load/save and the entry editor
//! - fonts: font directory listing and browser
//! - preview: title card preview generation
//! - search: Plex series search
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page/fragment rendering

pub mod fonts;
pub mod meta;
pub mod preview;
pub mod search;
pub mod series;
