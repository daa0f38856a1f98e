//! In-memory capabilities and block builders shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use notion2markdown::model::*;
use notion2markdown::{
    ApiKey, AppError, Fetcher, LocalStore, NotionId, Page, PageSource, Paginated, RichTextItem,
    Store, TraversalContext,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Deterministic identifier whose first eight hex digits encode `n`.
pub fn id(n: u32) -> NotionId {
    NotionId::parse(&format!("{:08x}{}", n, "a".repeat(24))).unwrap()
}

pub fn text(content: &str) -> Vec<RichTextItem> {
    vec![RichTextItem::plain_text(content)]
}

pub fn page(n: u32, title: &str) -> Page {
    let mut page = Page::new(id(n));
    page.title = Some(title.to_string());
    page.properties.insert(
        "Name".to_string(),
        PropertyValue::Title(text(title)),
    );
    page
}

pub fn paragraph(n: u32, content: &str) -> Block {
    Block::Paragraph(ParagraphBlock {
        common: BlockCommon::new(id(n)),
        content: TextBlockContent::new(text(content)),
    })
}

pub fn bulleted(n: u32, content: &str) -> Block {
    Block::BulletedListItem(ListItemBlock {
        common: BlockCommon::new(id(n)),
        content: TextBlockContent::new(text(content)),
    })
}

pub fn numbered(n: u32, content: &str) -> Block {
    Block::NumberedListItem(ListItemBlock {
        common: BlockCommon::new(id(n)),
        content: TextBlockContent::new(text(content)),
    })
}

pub fn toggle(n: u32, summary: &str) -> Block {
    Block::Toggle(ToggleBlock {
        common: BlockCommon::new(id(n)).with_children(),
        content: TextBlockContent::new(text(summary)),
    })
}

pub fn image(n: u32, url: &str, caption: &str) -> Block {
    Block::Image(MediaBlock {
        common: BlockCommon::new(id(n)),
        source: FileObject::Hosted {
            url: url.to_string(),
            expiry_time: None,
        },
        caption: text(caption),
        name: None,
    })
}

pub fn child_page(n: u32, title: &str) -> Block {
    Block::ChildPage(ChildPageBlock {
        common: BlockCommon::new(id(n)),
        title: title.to_string(),
    })
}

pub fn child_database(n: u32, title: &str) -> Block {
    Block::ChildDatabase(ChildDatabaseBlock {
        common: BlockCommon::new(id(n)),
        title: title.to_string(),
    })
}

pub fn unsupported(n: u32, tag: &str) -> Block {
    Block::Unsupported(UnsupportedBlock {
        common: BlockCommon::new(id(n)),
        block_type: tag.to_string(),
    })
}

pub fn table(n: u32, width: usize) -> Block {
    Block::Table(TableBlock {
        common: BlockCommon::new(id(n)).with_children(),
        table_width: width,
    })
}

pub fn table_row(n: u32, cells: &[&str]) -> Block {
    Block::TableRow(TableRowBlock {
        common: BlockCommon::new(id(n)),
        cells: cells
            .iter()
            .map(|cell| if cell.is_empty() { vec![] } else { text(cell) })
            .collect(),
    })
}

/// Workspace held in memory. Listings split into pages are served with
/// cursors `c1`, `c2`, ...
#[derive(Default)]
pub struct MemorySource {
    pages: HashMap<NotionId, Page>,
    children: HashMap<NotionId, Vec<Vec<Block>>>,
    rows: HashMap<NotionId, Vec<Vec<Page>>>,
    retrievals: Mutex<Vec<NotionId>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: Page, children: Vec<Block>) -> Self {
        self.children.insert(page.id.clone(), vec![children]);
        self.pages.insert(page.id.clone(), page);
        self
    }

    pub fn with_children(mut self, parent: u32, children: Vec<Block>) -> Self {
        self.children.insert(id(parent), vec![children]);
        self
    }

    pub fn with_paged_children(mut self, parent: u32, pages: Vec<Vec<Block>>) -> Self {
        self.children.insert(id(parent), pages);
        self
    }

    pub fn with_rows(mut self, database: u32, pages: Vec<Vec<Page>>) -> Self {
        self.rows.insert(id(database), pages);
        self
    }

    /// Every page id `retrieve_page` was called with, in order.
    pub fn retrievals(&self) -> Vec<NotionId> {
        self.retrievals.lock().unwrap().clone()
    }

    fn serve<T: Clone>(pages: Option<&Vec<Vec<T>>>, cursor: Option<&str>) -> Paginated<T> {
        let Some(pages) = pages else {
            return Paginated::last(Vec::new());
        };
        let index = cursor
            .and_then(|c| c.strip_prefix('c'))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let results = pages.get(index).cloned().unwrap_or_default();
        if index + 1 < pages.len() {
            Paginated {
                results,
                next_cursor: Some(format!("c{}", index + 1)),
                has_more: true,
            }
        } else {
            Paginated::last(results)
        }
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        self.retrievals.lock().unwrap().push(id.clone());
        self.pages.get(id).cloned().ok_or_else(|| AppError::NotionApi {
            status: 404,
            code: "object_not_found".to_string(),
            message: format!("Could not find page with ID: {}", id),
        })
    }

    async fn list_block_children(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Block>, AppError> {
        Ok(Self::serve(self.children.get(id), cursor))
    }

    async fn query_database(
        &self,
        id: &NotionId,
        cursor: Option<&str>,
    ) -> Result<Paginated<Page>, AppError> {
        Ok(Self::serve(self.rows.get(id), cursor))
    }
}

/// Serves fixed bytes per URL and records every request.
#[derive(Default)]
pub struct MemoryFetcher {
    bodies: HashMap<String, Vec<u8>>,
    authenticated: HashSet<String>,
    requests: Mutex<Vec<(String, bool)>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    /// Body that is only served when a credential is sent.
    pub fn with_authenticated_body(mut self, url: &str, body: &[u8]) -> Self {
        self.authenticated.insert(url.to_string());
        self.with_body(url, body)
    }

    /// `(url, credential_sent)` for every request, in order.
    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str, credential: Option<&ApiKey>) -> Result<Vec<u8>, AppError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), credential.is_some()));

        if self.authenticated.contains(url) && credential.is_none() {
            return Err(AppError::fetch_failed(401, "Unauthorized"));
        }
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::fetch_failed(404, "Not Found"))
    }
}

pub fn api_key() -> ApiKey {
    ApiKey::new("secret_test_key").unwrap()
}

pub fn context(source: Arc<MemorySource>, fetcher: Arc<MemoryFetcher>) -> TraversalContext {
    let store: Arc<dyn Store> = Arc::new(LocalStore);
    TraversalContext::new(source, fetcher, store, Some(api_key()))
}
