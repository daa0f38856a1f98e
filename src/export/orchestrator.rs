// src/export/orchestrator.rs
//! Depth-first export of a page tree.
//!
//! Each page goes through the same steps: skip if already visited, fetch its
//! metadata, take its directory, mark it visited, render and write its
//! document, then walk its block children a second time. That pass places
//! every linked child page and database row that has no directory yet below
//! this page, and recurses into exactly those. A page reached again through
//! a sibling's subtree is therefore exported where its first link points.
//! The walk is strictly sequential, and any error aborts the whole export.

use super::context::TraversalContext;
use crate::api::PageSource;
use crate::assets::Fetcher;
use crate::constants::MAX_EXPORT_DEPTH;
use crate::error::AppError;
use crate::formatting::{compose_page_document, render_blocks, render_properties};
use crate::model::Block;
use crate::output::{document_path, page_dir_name, Store};
use crate::types::{ApiKey, NotionId};
use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Summary of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Document written for the root page.
    pub root_document: PathBuf,
    pub pages_exported: usize,
    pub assets_written: usize,
    pub assets_reused: usize,
}

/// Walks a page tree and writes it to disk.
pub struct Exporter {
    ctx: TraversalContext,
}

impl Exporter {
    pub fn new(
        source: Arc<dyn PageSource>,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn Store>,
        credential: Option<ApiKey>,
    ) -> Self {
        Self {
            ctx: TraversalContext::new(source, fetcher, store, credential),
        }
    }

    /// Exports `root` and everything reachable from it under `out_dir`.
    pub async fn export(&mut self, root: &NotionId, out_dir: &Path) -> Result<ExportReport, AppError> {
        log::info!("Exporting {} into {}", root, out_dir.display());
        self.ctx.store().create_dir_all(out_dir)?;

        let root_dir = self
            .export_page(root, out_dir.to_path_buf(), 0)
            .await?
            .ok_or_else(|| AppError::MalformedResponse(format!("root page {} was not exported", root)))?;

        let stats = self.ctx.stats();
        let report = ExportReport {
            root_document: document_path(&root_dir),
            pages_exported: self.ctx.visited_count(),
            assets_written: stats.assets_written(),
            assets_reused: stats.assets_reused(),
        };
        log::info!(
            "Export finished: {} pages, {} assets written, {} assets reused",
            report.pages_exported,
            report.assets_written,
            report.assets_reused
        );
        Ok(report)
    }

    /// Exports one page into its placed directory, or below `parent_dir`
    /// when nothing placed it.
    ///
    /// Returns the page directory, or `None` when the page was already
    /// exported earlier in the run.
    fn export_page<'a>(
        &'a mut self,
        id: &'a NotionId,
        parent_dir: PathBuf,
        depth: usize,
    ) -> BoxFuture<'a, Result<Option<PathBuf>, AppError>> {
        async move {
            if self.ctx.is_visited(id) {
                log::debug!("Page {} already exported, skipping", id);
                return Ok(None);
            }
            if depth > MAX_EXPORT_DEPTH {
                return Err(AppError::RecursionLimitExceeded(MAX_EXPORT_DEPTH));
            }

            let page = self.ctx.source().retrieve_page(id).await?;
            let title = page.display_title();
            let page_dir = match self.ctx.placed_dir(id) {
                Some(dir) => dir.to_path_buf(),
                None => parent_dir.join(page_dir_name(page.title.as_deref().unwrap_or(""), id)),
            };
            self.ctx.mark_visited(id.clone(), page_dir.clone());
            log::info!("Exporting page '{}' ({}) at depth {}", title, id, depth);

            let scope = self.ctx.enter_page_scope(page_dir.clone(), depth)?;
            let preamble = render_properties(&page, &self.ctx, &scope).await?;
            let blocks = self.ctx.block_children(id).await?;
            let body = render_blocks(&blocks, &self.ctx, &scope).await?;
            let document = compose_page_document(&title, &preamble, &body);
            self.ctx
                .store()
                .write(&document_path(&page_dir), document.as_bytes())?;

            // Second pass: discover pages to recurse into.
            let mut owned = Vec::new();
            for block in self.ctx.block_children(id).await? {
                match block {
                    Block::ChildPage(child) => {
                        let dir = page_dir.join(page_dir_name(&child.title, &child.common.id));
                        if self.ctx.place(&child.common.id, dir) {
                            owned.push(child.common.id);
                        }
                    }
                    Block::ChildDatabase(database) => {
                        let rows = self.ctx.database_rows(&database.common.id).await?;
                        log::debug!(
                            "Database {} has {} rows to export",
                            database.common.id,
                            rows.len()
                        );
                        for row in rows {
                            let dir = page_dir.join(page_dir_name(
                                row.title.as_deref().unwrap_or(""),
                                &row.id,
                            ));
                            if self.ctx.place(&row.id, dir) {
                                owned.push(row.id);
                            }
                        }
                    }
                    _ => {}
                }
            }

            for child in &owned {
                self.export_page(child, page_dir.clone(), depth + 1).await?;
            }

            Ok(Some(page_dir))
        }
        .boxed()
    }
}
