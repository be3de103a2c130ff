//! Series routes - config load/save and the entry editor

pub mod api;
pub mod page;
pub mod render;

pub use api::{api_config, api_config_save};
pub use page::{
    htmx_add_entry_modal, htmx_entries_list, htmx_entry_create, htmx_entry_delete,
    htmx_entry_rename, htmx_field_add, htmx_field_remove, htmx_field_selector, htmx_field_update,
    htmx_map_row, htmx_save, htmx_translation_row, page_index,
};
