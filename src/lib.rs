//! notion2markdown library — exports a Notion page tree into markdown files.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`
//! - **Configuration** — `CommandLineInput`, `ExportConfig`
//! - **Domain model** — `Page`, `Block`, `PropertyValue`, block payloads
//! - **Domain types** — `NotionId`, `ApiKey`, rich text
//! - **Capabilities** — `PageSource`, `Fetcher`, `Store` and their live implementations
//! - **Formatting** — `render_blocks`, `rich_text_to_markdown`, `render_table_rows`
//! - **Export** — `Exporter`, `TraversalContext`, `PageScope`

pub mod api;
pub mod assets;
mod config;
pub mod constants;
mod error;
pub mod export;
pub mod formatting;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::AppError;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, ExportConfig, API_KEY_ENV};

// --- Domain Model ---
pub use crate::model::{Block, BlockCommon, DateRange, FileObject, NamedFile, Page, PropertyValue};

// --- Domain Types ---
pub use crate::types::{Annotations, ApiKey, Link, NotionId, RichTextItem, RichTextType};

// --- Capabilities ---
pub use crate::api::{NotionHttpClient, Paginated, PageSource};
pub use crate::assets::{AssetStore, Fetcher, HttpFetcher};
pub use crate::output::{LocalStore, Store};

// --- Formatting ---
pub use crate::formatting::{compose_page_document, render_blocks, rich_text_to_markdown};

// --- Export ---
pub use crate::export::{ExportReport, Exporter, PageScope, TraversalContext};
