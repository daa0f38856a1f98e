// src/export/context.rs
//! Traversal context: everything one export run shares across pages.
//!
//! The context owns the capabilities and the page registry. It holds no
//! notion of a "current" page; every rendering call receives the `PageScope`
//! it renders into, so nested rendering cannot disturb the enclosing page's
//! relative paths.

use crate::api::{all_block_children, all_database_rows, PageSource};
use crate::assets::{AssetStore, Fetcher};
use crate::constants::ASSETS_DIR_NAME;
use crate::error::AppError;
use crate::formatting::render_blocks;
use crate::model::{Block, Page};
use crate::output::{relativize, Store};
use crate::types::{ApiKey, NotionId};
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Output location of the page being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScope {
    /// Directory holding the page's document.
    pub page_dir: PathBuf,
    /// Directory the page's assets are written to.
    pub assets_dir: PathBuf,
    /// Nesting depth of the page, the root being 0.
    pub depth: usize,
}

impl PageScope {
    pub fn new(page_dir: PathBuf, depth: usize) -> Self {
        let assets_dir = page_dir.join(ASSETS_DIR_NAME);
        Self {
            page_dir,
            assets_dir,
            depth,
        }
    }
}

/// Asset counters for a run.
#[derive(Debug, Default)]
pub struct ExportStats {
    assets_written: AtomicUsize,
    assets_reused: AtomicUsize,
}

impl ExportStats {
    pub fn assets_written(&self) -> usize {
        self.assets_written.load(Ordering::Relaxed)
    }

    pub fn assets_reused(&self) -> usize {
        self.assets_reused.load(Ordering::Relaxed)
    }
}

/// Per-export state shared by the orchestrator and the block renderer.
pub struct TraversalContext {
    source: Arc<dyn PageSource>,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn Store>,
    assets: AssetStore,
    credential: Option<ApiKey>,
    placements: HashMap<NotionId, PathBuf>,
    exported: HashSet<NotionId>,
    stats: ExportStats,
}

impl TraversalContext {
    pub fn new(
        source: Arc<dyn PageSource>,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn Store>,
        credential: Option<ApiKey>,
    ) -> Self {
        Self {
            source,
            fetcher,
            assets: AssetStore::new(store.clone()),
            store,
            credential,
            placements: HashMap::new(),
            exported: HashSet::new(),
            stats: ExportStats::default(),
        }
    }

    pub fn source(&self) -> &dyn PageSource {
        self.source.as_ref()
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    /// Whether `id` has already been exported in this run.
    pub fn is_visited(&self, id: &NotionId) -> bool {
        self.exported.contains(id)
    }

    /// Directory `id` is, or will be, exported to.
    pub fn placed_dir(&self, id: &NotionId) -> Option<&Path> {
        self.placements.get(id).map(PathBuf::as_path)
    }

    /// Reserves `page_dir` for `id` unless it already has a place. Returns
    /// whether the reservation was made.
    ///
    /// A page is placed by the first page that links to it, so every later
    /// link resolves to the same directory.
    pub fn place(&mut self, id: &NotionId, page_dir: PathBuf) -> bool {
        if self.placements.contains_key(id) {
            return false;
        }
        self.placements.insert(id.clone(), page_dir);
        true
    }

    /// Records `id` as exported to `page_dir`. Must happen before the page's
    /// children are walked.
    pub fn mark_visited(&mut self, id: NotionId, page_dir: PathBuf) {
        self.placements.entry(id.clone()).or_insert(page_dir);
        self.exported.insert(id);
    }

    pub fn visited_count(&self) -> usize {
        self.exported.len()
    }

    /// Creates the page directory and returns the scope to render it in.
    pub fn enter_page_scope(&self, page_dir: PathBuf, depth: usize) -> Result<PageScope, AppError> {
        self.store.create_dir_all(&page_dir)?;
        Ok(PageScope::new(page_dir, depth))
    }

    /// Every direct child of a block, across all listing pages.
    pub async fn block_children(&self, id: &NotionId) -> Result<Vec<Block>, AppError> {
        all_block_children(self.source.as_ref(), id).await
    }

    /// Every row of a database, across all listing pages.
    pub async fn database_rows(&self, id: &NotionId) -> Result<Vec<Page>, AppError> {
        all_database_rows(self.source.as_ref(), id).await
    }

    /// Fetches and renders all children of `id` into `scope`.
    pub fn render_children<'a>(
        &'a self,
        id: &'a NotionId,
        scope: &'a PageScope,
    ) -> BoxFuture<'a, Result<String, AppError>> {
        async move {
            let children = self.block_children(id).await?;
            render_blocks(&children, self, scope).await
        }
        .boxed()
    }

    /// Downloads `url` into the scope's assets directory and returns its path
    /// relative to the scope's page directory.
    ///
    /// The first attempt goes out without a credential because pre-signed
    /// URLs reject one; a failure is retried once with it.
    pub async fn download_asset(&self, url: &str, scope: &PageScope) -> Result<String, AppError> {
        let bytes = match self.fetcher.fetch(url, None).await {
            Ok(bytes) => bytes,
            Err(first) => match &self.credential {
                Some(key) => {
                    log::warn!("Asset fetch failed ({}), retrying with credential: {}", first, url);
                    self.fetcher.fetch(url, Some(key)).await?
                }
                None => return Err(first),
            },
        };

        let materialized = self.assets.materialize(&bytes, url, &scope.assets_dir)?;
        if materialized.created {
            self.stats.assets_written.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.assets_reused.fetch_add(1, Ordering::Relaxed);
        }

        relativize(&materialized.path, &scope.page_dir)
    }
}
