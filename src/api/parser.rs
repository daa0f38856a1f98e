// src/api/parser.rs
//! Response parsing for the three endpoints the exporter calls.
//!
//! Pages and rich text go through notion-client's serde types. Block payloads
//! are decoded per type tag from the raw JSON so that a tag notion-client does
//! not know, or a payload that does not match its schema, degrades to
//! `Block::Unsupported` instead of failing the whole listing.

use super::notion_client_adapter::{convert_page, convert_rich_text_array};
use super::types::{ListResponse, Paginated};
use crate::error::AppError;
use crate::model::blocks::*;
use crate::model::{Block, BlockCommon, Page};
use crate::types::NotionId;
use notion_client::objects::error::Error as NotionError;
use notion_client::objects::page::Page as NotionPage;
use notion_client::objects::rich_text::RichText as NcRichText;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Turns a non-success response into `AppError::NotionApi`, reading the
/// error envelope when the body carries one.
pub fn parse_error_response(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<NotionError>(body) {
        Ok(error) => AppError::NotionApi {
            status,
            code: error.code,
            message: error.message,
        },
        Err(_) => AppError::NotionApi {
            status,
            code: "unknown".to_string(),
            message: format!("HTTP {} with an unreadable error body", status),
        },
    }
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, AppError> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(500).collect();
        log::error!("Failed to parse response: {} (body: {})", e, preview);
        AppError::MalformedResponse(e.to_string())
    })
}

/// Parse a `pages/{id}` response body.
pub fn parse_page_response(body: &str) -> Result<Page, AppError> {
    let notion_page: NotionPage = parse_json(body)?;
    convert_page(notion_page)
}

/// Parse a `blocks/{id}/children` response body.
pub fn parse_block_children(body: &str) -> Result<Paginated<Block>, AppError> {
    let list: ListResponse = parse_json(body)?;
    let blocks = list
        .results
        .into_iter()
        .map(decode_block)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated {
        results: blocks,
        next_cursor: list.next_cursor,
        has_more: list.has_more,
    })
}

/// Parse a `databases/{id}/query` response body.
pub fn parse_database_rows(body: &str) -> Result<Paginated<Page>, AppError> {
    let list: ListResponse = parse_json(body)?;
    let pages = list
        .results
        .into_iter()
        .map(|value| {
            let notion_page: NotionPage = serde_json::from_value(value)?;
            convert_page(notion_page)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated {
        results: pages,
        next_cursor: list.next_cursor,
        has_more: list.has_more,
    })
}

/// Envelope fields present on every block object.
#[derive(Debug, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextPayload {
    rich_text: Vec<NcRichText>,
    checked: bool,
    icon: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<NcRichText>,
    #[serde(default)]
    caption: Vec<NcRichText>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrlRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct HostedRef {
    url: String,
    #[serde(default)]
    expiry_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct MediaPayload {
    #[serde(default)]
    external: Option<UrlRef>,
    #[serde(default)]
    file: Option<HostedRef>,
    #[serde(default)]
    caption: Vec<NcRichText>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LinkPayload {
    url: String,
    #[serde(default)]
    caption: Vec<NcRichText>,
}

#[derive(Debug, Deserialize)]
struct TitlePayload {
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct EquationPayload {
    expression: String,
}

#[derive(Debug, Deserialize)]
struct TablePayload {
    #[serde(default)]
    table_width: usize,
}

#[derive(Debug, Deserialize)]
struct TableRowPayload {
    #[serde(default)]
    cells: Vec<Vec<NcRichText>>,
}

/// Decodes one block object.
///
/// Fails only when the envelope itself (`id`, `type`) is unusable.
pub fn decode_block(value: Value) -> Result<Block, AppError> {
    let raw: RawBlock = serde_json::from_value(value)?;
    let id = NotionId::parse(&raw.id)?;
    let mut common = BlockCommon::new(id);
    common.has_children = raw.has_children;

    let payload = raw
        .payload
        .get(&raw.block_type)
        .cloned()
        .unwrap_or(Value::Null);

    match decode_payload(&raw.block_type, common.clone(), payload) {
        Ok(Some(block)) => Ok(block),
        Ok(None) => {
            log::debug!("Unknown block type '{}' on {}", raw.block_type, common.id);
            Ok(unsupported(common, raw.block_type))
        }
        Err(e) => {
            log::warn!(
                "Could not decode '{}' block {}: {}. Rendering as unsupported.",
                raw.block_type,
                common.id,
                e
            );
            Ok(unsupported(common, raw.block_type))
        }
    }
}

fn unsupported(common: BlockCommon, block_type: String) -> Block {
    Block::Unsupported(UnsupportedBlock { common, block_type })
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, AppError> {
    Ok(serde_json::from_value(payload)?)
}

fn text(payload: Value) -> Result<TextPayload, AppError> {
    decode(payload)
}

fn media(common: BlockCommon, payload: Value) -> Result<MediaBlock, AppError> {
    let payload: MediaPayload = decode(payload)?;
    let source = match (payload.file, payload.external) {
        (Some(hosted), _) => FileObject::Hosted {
            url: hosted.url,
            expiry_time: hosted.expiry_time,
        },
        (None, Some(external)) => FileObject::External { url: external.url },
        (None, None) => {
            return Err(AppError::MalformedResponse(
                "media block without a file source".to_string(),
            ))
        }
    };

    Ok(MediaBlock {
        common,
        source,
        caption: convert_rich_text_array(payload.caption),
        name: payload.name.filter(|name| !name.is_empty()),
    })
}

fn heading(common: BlockCommon, level: u8, payload: Value) -> Result<Block, AppError> {
    Ok(Block::Heading(HeadingBlock {
        common,
        level,
        content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
    }))
}

fn decode_payload(
    block_type: &str,
    common: BlockCommon,
    payload: Value,
) -> Result<Option<Block>, AppError> {
    let block = match block_type {
        "paragraph" => Block::Paragraph(ParagraphBlock {
            common,
            content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
        }),
        "heading_1" => heading(common, 1, payload)?,
        "heading_2" => heading(common, 2, payload)?,
        "heading_3" => heading(common, 3, payload)?,
        "bulleted_list_item" => Block::BulletedListItem(ListItemBlock {
            common,
            content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
        }),
        "numbered_list_item" => Block::NumberedListItem(ListItemBlock {
            common,
            content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
        }),
        "to_do" => {
            let payload = text(payload)?;
            Block::ToDo(ToDoBlock {
                common,
                content: TextBlockContent::new(convert_rich_text_array(payload.rich_text)),
                checked: payload.checked,
            })
        }
        "toggle" => Block::Toggle(ToggleBlock {
            common,
            content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
        }),
        "quote" => Block::Quote(QuoteBlock {
            common,
            content: TextBlockContent::new(convert_rich_text_array(text(payload)?.rich_text)),
        }),
        "callout" => {
            let payload = text(payload)?;
            let emoji = payload
                .icon
                .as_ref()
                .and_then(|icon| icon.get("emoji"))
                .and_then(Value::as_str)
                .map(str::to_string);
            Block::Callout(CalloutBlock {
                common,
                emoji,
                content: TextBlockContent::new(convert_rich_text_array(payload.rich_text)),
            })
        }
        "code" => {
            let payload: CodePayload = decode(payload)?;
            Block::Code(CodeBlock {
                common,
                language: payload.language.unwrap_or_default(),
                caption: convert_rich_text_array(payload.caption),
                content: TextBlockContent::new(convert_rich_text_array(payload.rich_text)),
            })
        }
        "equation" => {
            let payload: EquationPayload = decode(payload)?;
            Block::Equation(EquationBlock {
                common,
                expression: payload.expression,
            })
        }
        "divider" => Block::Divider(DividerBlock { common }),
        "image" => Block::Image(media(common, payload)?),
        "video" => Block::Video(media(common, payload)?),
        "file" => Block::File(media(common, payload)?),
        "pdf" => Block::Pdf(media(common, payload)?),
        "bookmark" => {
            let payload: LinkPayload = decode(payload)?;
            Block::Bookmark(BookmarkBlock {
                common,
                url: payload.url,
                caption: convert_rich_text_array(payload.caption),
            })
        }
        "embed" => {
            let payload: LinkPayload = decode(payload)?;
            Block::Embed(EmbedBlock {
                common,
                url: payload.url,
            })
        }
        "link_preview" => {
            let payload: LinkPayload = decode(payload)?;
            Block::LinkPreview(EmbedBlock {
                common,
                url: payload.url,
            })
        }
        "child_page" => {
            let payload: TitlePayload = decode(payload)?;
            Block::ChildPage(ChildPageBlock {
                common,
                title: payload.title,
            })
        }
        "child_database" => {
            let payload: TitlePayload = decode(payload)?;
            Block::ChildDatabase(ChildDatabaseBlock {
                common,
                title: payload.title,
            })
        }
        "table" => {
            let payload: TablePayload = decode(payload)?;
            Block::Table(TableBlock {
                common,
                table_width: payload.table_width,
            })
        }
        "table_row" => {
            let payload: TableRowPayload = decode(payload)?;
            Block::TableRow(TableRowBlock {
                common,
                cells: payload
                    .cells
                    .into_iter()
                    .map(convert_rich_text_array)
                    .collect(),
            })
        }
        "column_list" => Block::ColumnList(ContainerBlock { common }),
        "column" => Block::Column(ContainerBlock { common }),
        "synced_block" => Block::Synced(ContainerBlock { common }),
        _ => return Ok(None),
    };

    Ok(Some(block))
}
