//! Metadata routes - field catalog and editor settings

pub mod api;

pub use api::api_meta;
