// src/constants.rs
//! Domain constants that define the operational boundaries of the exporter.
//!
//! Each constant is named for the concept it constrains. Reading them should
//! tell you how the walk behaves: how much it asks for per request, how far it
//! follows redirects, how deep it recurses, and how it lays out files.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while paginating block children and database rows.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Notion API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Traversal boundaries
// ---------------------------------------------------------------------------

/// Maximum number of redirect hops followed for a single asset download.
pub const MAX_REDIRECTS: usize = 5;

/// Maximum page nesting depth of an export.
///
/// The visited registry already breaks cycles; this bounds pathological but
/// acyclic trees so the recursive walk cannot grow without limit.
pub const MAX_EXPORT_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// Output layout
// ---------------------------------------------------------------------------

/// File name of the markdown document written into every page directory.
pub const DOCUMENT_FILE_NAME: &str = "index.md";

/// Name of the per-page directory holding materialized assets.
pub const ASSETS_DIR_NAME: &str = "assets";

/// Extension used for assets whose source URL carries none.
pub const FALLBACK_ASSET_EXTENSION: &str = ".bin";

/// Longest extension (without the dot) accepted from a source URL.
pub const MAX_ASSET_EXTENSION_LEN: usize = 8;

/// Number of identifier hex characters appended to page directory names.
pub const SHORT_ID_LEN: usize = 8;

/// Output directory used when none is given on the command line.
pub const DEFAULT_OUTPUT_DIR: &str = "./export";

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Indentation applied per nesting level of list children.
pub const LIST_CHILD_INDENT: &str = "  ";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;
