// src/api/types.rs
//! Type definitions for the Notion API module.

use serde::Deserialize;
use serde_json::Value;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> Paginated<T> {
    /// A listing with no further pages.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }
}

/// Raw list envelope shared by block children and database queries.
#[derive(Debug, Deserialize)]
pub(super) struct ListResponse {
    #[serde(default)]
    pub results: Vec<Value>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}
