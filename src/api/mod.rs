// src/api/mod.rs
//! Notion API interaction: the ability to read pages, block children and
//! database rows from a workspace.
//!
//! Business logic depends on the `PageSource` trait, never on HTTP details.

pub mod client;
pub mod notion_client_adapter;
pub mod parser;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;

pub use client::NotionHttpClient;
pub use simple_pagination::fetch_all_pages;
pub use types::Paginated;

/// The ability to retrieve content from a Notion workspace.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieves page metadata and properties.
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;

    /// Lists one page of a block's direct children.
    async fn list_block_children(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Block>, AppError>;

    /// Lists one page of a database's rows.
    async fn query_database(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Page>, AppError>;
}

/// Lists every direct child of a block, in order, across all pages.
pub async fn all_block_children(
    source: &dyn PageSource,
    id: &NotionId,
) -> Result<Vec<Block>, AppError> {
    log::debug!("Listing children of {}", id);
    fetch_all_pages(|cursor| async move { source.list_block_children(id, cursor.as_deref()).await })
        .await
}

/// Lists every row of a database, in order, across all pages.
pub async fn all_database_rows(
    source: &dyn PageSource,
    id: &NotionId,
) -> Result<Vec<Page>, AppError> {
    log::debug!("Querying rows of database {}", id);
    fetch_all_pages(|cursor| async move { source.query_database(id, cursor.as_deref()).await })
        .await
}
