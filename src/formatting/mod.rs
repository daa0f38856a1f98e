// src/formatting/mod.rs
//! Renders Notion pages and blocks into markdown documents.

pub mod block_renderer;
mod properties;
mod rich_text;
mod table;

pub use block_renderer::{compose_page_document, render_block, render_blocks};
pub use properties::{format_number, format_property_value, render_properties};
pub use rich_text::{apply_annotations, render_span, rich_text_to_markdown};
pub use table::{escape_cell, render_table_rows};
