mod block;
pub mod blocks;
pub mod common;
mod property_value;

pub use block::Block;
pub use blocks::*;
pub use common::*;
pub use property_value::{DateRange, NamedFile, PropertyValue};

use crate::types::NotionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Notion page as retrieved from the API. Content blocks are listed
/// separately and never stored on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: NotionId,
    pub url: Option<String>,
    /// Plain text of the title property, when the page has one.
    pub title: Option<String>,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Page {
    pub fn new(id: NotionId) -> Self {
        Self {
            id,
            url: None,
            title: None,
            properties: BTreeMap::new(),
        }
    }

    /// Title used for the document heading and the directory name.
    ///
    /// Falls back to the page URL, then to "Untitled".
    pub fn display_title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .or_else(|| self.url.as_deref().filter(|url| !url.is_empty()))
            .unwrap_or("Untitled")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Page {
        Page::new(NotionId::parse("550e8400e29b41d4a716446655440000").unwrap())
    }

    #[test]
    fn test_display_title_prefers_title() {
        let mut page = page();
        page.title = Some("Roadmap".to_string());
        page.url = Some("https://www.notion.so/Roadmap-550e8400".to_string());
        assert_eq!(page.display_title(), "Roadmap");
    }

    #[test]
    fn test_display_title_fallbacks() {
        let mut page = page();
        assert_eq!(page.display_title(), "Untitled");

        page.url = Some("https://www.notion.so/x".to_string());
        assert_eq!(page.display_title(), "https://www.notion.so/x");

        page.title = Some("   ".to_string());
        assert_eq!(page.display_title(), "https://www.notion.so/x");
    }
}
