use super::common::BlockCommon;
use crate::types::RichTextItem;
use serde::{Deserialize, Serialize};

/// Text content shared by every text-bearing block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlockContent {
    pub rich_text: Vec<RichTextItem>,
}

impl TextBlockContent {
    pub fn new(rich_text: Vec<RichTextItem>) -> Self {
        Self { rich_text }
    }
}

/// Paragraph block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Heading block; `level` is 1, 2 or 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingBlock {
    pub common: BlockCommon,
    pub level: u8,
    pub content: TextBlockContent,
}

/// Bulleted or numbered list item block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// To-do block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDoBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
    pub checked: bool,
}

/// Toggle block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Quote block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteBlock {
    pub common: BlockCommon,
    pub content: TextBlockContent,
}

/// Callout block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutBlock {
    pub common: BlockCommon,
    pub emoji: Option<String>,
    pub content: TextBlockContent,
}

/// Code block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub common: BlockCommon,
    pub language: String,
    pub caption: Vec<RichTextItem>,
    pub content: TextBlockContent,
}

/// Equation block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationBlock {
    pub common: BlockCommon,
    pub expression: String,
}

/// Divider block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerBlock {
    pub common: BlockCommon,
}

/// Image, video, file or PDF block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaBlock {
    pub common: BlockCommon,
    pub source: FileObject,
    pub caption: Vec<RichTextItem>,
    pub name: Option<String>,
}

/// Bookmark block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkBlock {
    pub common: BlockCommon,
    pub url: String,
    pub caption: Vec<RichTextItem>,
}

/// Embed or link preview block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedBlock {
    pub common: BlockCommon,
    pub url: String,
}

/// Child page block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPageBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Child database block; its id is the database id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDatabaseBlock {
    pub common: BlockCommon,
    pub title: String,
}

/// Table block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub common: BlockCommon,
    pub table_width: usize,
}

/// Table row block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRowBlock {
    pub common: BlockCommon,
    pub cells: Vec<Vec<RichTextItem>>,
}

/// Column list, column or synced block: pure containers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerBlock {
    pub common: BlockCommon,
}

/// Block whose type tag this exporter does not know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsupportedBlock {
    pub common: BlockCommon,
    pub block_type: String,
}

/// File object types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FileObject {
    #[serde(rename = "external")]
    External { url: String },
    #[serde(rename = "file")]
    Hosted {
        url: String,
        expiry_time: Option<chrono::DateTime<chrono::Utc>>,
    },
}

impl FileObject {
    /// The URL the bytes are fetched from.
    pub fn url(&self) -> &str {
        match self {
            FileObject::External { url } => url,
            FileObject::Hosted { url, .. } => url,
        }
    }
}
