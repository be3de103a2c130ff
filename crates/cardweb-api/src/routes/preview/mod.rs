//! Preview routes - title card preview generation

pub mod api;
pub mod page;

pub use api::api_preview;
pub use page::{htmx_preview_modal, htmx_preview_render};
