// src/formatting/block_renderer.rs
//! Block rendering engine: converts Notion blocks to markdown.
//!
//! Most blocks are a fixed template over their rich text. Containers
//! (toggles, list items with children, columns, synced blocks, tables,
//! child databases) call back into the `TraversalContext` to list what they
//! contain, and media blocks ask it to download their asset. Every call
//! carries the `PageScope` of the page being written, so asset paths stay
//! relative to that page however deep the nesting goes.

use super::rich_text::rich_text_to_markdown;
use super::table::render_table;
use crate::constants::{CHARS_PER_BLOCK_ESTIMATE, DOCUMENT_FILE_NAME, LIST_CHILD_INDENT};
use crate::error::AppError;
use crate::export::{PageScope, TraversalContext};
use crate::model::*;
use crate::output::{document_path, page_dir_name, relativize};
use crate::types::{plain_text_of, NotionId};
use futures::future::{BoxFuture, FutureExt};
use url::Url;

// --- Public API ---

/// Renders sibling blocks into markdown.
///
/// Siblings are separated by a blank line, except consecutive list items
/// which stay on adjacent lines. Numbered items count up across a run of
/// consecutive numbered siblings. Blocks that render to nothing (such as
/// empty paragraphs) are dropped.
pub fn render_blocks<'a>(
    blocks: &'a [Block],
    ctx: &'a TraversalContext,
    scope: &'a PageScope,
) -> BoxFuture<'a, Result<String, AppError>> {
    async move {
        let mut output = String::with_capacity(blocks.len() * CHARS_PER_BLOCK_ESTIMATE);
        let mut list_number = 0usize;
        let mut previous_was_list = false;

        for block in blocks {
            list_number = match block {
                Block::NumberedListItem(_) => list_number + 1,
                _ => 0,
            };

            let rendered = render_block(block, list_number, ctx, scope).await?;
            if rendered.is_empty() {
                continue;
            }

            if !output.is_empty() {
                if previous_was_list && block.is_list_item() {
                    output.push('\n');
                } else {
                    output.push_str("\n\n");
                }
            }
            output.push_str(&rendered);
            previous_was_list = block.is_list_item();
        }

        Ok(output)
    }
    .boxed()
}

/// Renders one block, fetching its children when it has any.
///
/// `list_number` is the ordinal used when the block is a numbered list item.
pub fn render_block<'a>(
    block: &'a Block,
    list_number: usize,
    ctx: &'a TraversalContext,
    scope: &'a PageScope,
) -> BoxFuture<'a, Result<String, AppError>> {
    async move {
        let content = match block {
            Block::Paragraph(b) => {
                let text = rich_text_to_markdown(&b.content.rich_text);
                let children = children_of(block, ctx, scope).await?;
                join_nonempty(&text, &indent_block_content(&children, LIST_CHILD_INDENT), "\n\n")
            }
            Block::Heading(b) => {
                let prefix = "#".repeat(b.level.clamp(1, 3) as usize);
                let text = format!("{} {}", prefix, rich_text_to_markdown(&b.content.rich_text));
                let children = children_of(block, ctx, scope).await?;
                join_nonempty(&text, &children, "\n\n")
            }
            Block::BulletedListItem(b) => {
                list_item(block, "- ", &b.content, ctx, scope).await?
            }
            Block::NumberedListItem(b) => {
                let marker = format!("{}. ", list_number.max(1));
                list_item(block, &marker, &b.content, ctx, scope).await?
            }
            Block::ToDo(b) => {
                let marker = if b.checked { "- [x] " } else { "- [ ] " };
                list_item(block, marker, &b.content, ctx, scope).await?
            }
            Block::Toggle(b) => format_toggle(block, b, ctx, scope).await?,
            Block::Quote(b) => {
                let text = rich_text_to_markdown(&b.content.rich_text);
                let children = children_of(block, ctx, scope).await?;
                quote_lines(&join_nonempty(&text, &children, "\n\n"))
            }
            Block::Callout(b) => {
                let mut text = rich_text_to_markdown(&b.content.rich_text);
                if let Some(emoji) = &b.emoji {
                    text = format!("{} {}", emoji, text);
                }
                let children = children_of(block, ctx, scope).await?;
                quote_lines(&join_nonempty(&text, &children, "\n\n"))
            }
            Block::Code(b) => format_code_block(b),
            Block::Equation(b) => format!("$$\n{}\n$$", b.expression),
            Block::Divider(_) => "---".to_string(),
            Block::Image(b) => {
                let path = ctx.download_asset(b.source.url(), scope).await?;
                format!("![{}]({})", plain_text_of(&b.caption).trim(), path)
            }
            Block::Video(b) => match &b.source {
                // Externally hosted videos are pages, not files.
                FileObject::External { url } => {
                    format!("[{}]({})", media_label(b).unwrap_or_else(|| url.clone()), url)
                }
                FileObject::Hosted { .. } => format_media_link(b, ctx, scope).await?,
            },
            Block::File(b) | Block::Pdf(b) => format_media_link(b, ctx, scope).await?,
            Block::Bookmark(b) => {
                let caption = plain_text_of(&b.caption);
                let label = if caption.trim().is_empty() {
                    b.url.as_str()
                } else {
                    caption.trim()
                };
                format!("[{}]({})", label, b.url)
            }
            Block::Embed(b) | Block::LinkPreview(b) => format!("[{}]({})", b.url, b.url),
            Block::ChildPage(b) => {
                let title = if b.title.trim().is_empty() {
                    "Untitled"
                } else {
                    b.title.as_str()
                };
                let link = page_link(&b.common.id, &b.title, ctx, scope)?;
                format!("[{}]({})", title, link)
            }
            Block::ChildDatabase(b) => format_child_database(b, ctx, scope).await?,
            Block::Table(b) => render_table(b, ctx).await?,
            Block::TableRow(b) => {
                let cells: Vec<String> = b
                    .cells
                    .iter()
                    .map(|cell| super::table::escape_cell(&rich_text_to_markdown(cell)))
                    .collect();
                format!("| {} |", cells.join(" | "))
            }
            Block::ColumnList(_) | Block::Column(_) | Block::Synced(_) => {
                children_of(block, ctx, scope).await?
            }
            Block::Unsupported(b) => {
                log::debug!("Unsupported block type '{}' ({})", b.block_type, b.common.id);
                format!("<!-- unsupported block: {} -->", b.block_type)
            }
        };

        Ok(content)
    }
    .boxed()
}

/// Assembles a page document from its title, properties preamble and body.
pub fn compose_page_document(title: &str, properties: &str, body: &str) -> String {
    let mut document = format!("# {}\n", title);
    for section in [properties, body] {
        if !section.trim().is_empty() {
            document.push('\n');
            document.push_str(section.trim_end());
            document.push('\n');
        }
    }
    document
}

// --- Block-type formatters ---

async fn children_of(
    block: &Block,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    if !block.has_children() {
        return Ok(String::new());
    }
    ctx.render_children(block.id(), scope).await
}

/// List item line followed by its children, indented under it.
async fn list_item(
    block: &Block,
    marker: &str,
    content: &TextBlockContent,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    let text = format!("{}{}", marker, rich_text_to_markdown(&content.rich_text));
    let children = children_of(block, ctx, scope).await?;
    Ok(join_nonempty(
        &text,
        &indent_block_content(&children, LIST_CHILD_INDENT),
        "\n",
    ))
}

async fn format_toggle(
    block: &Block,
    toggle: &ToggleBlock,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    let summary = rich_text_to_markdown(&toggle.content.rich_text);
    let children = children_of(block, ctx, scope).await?;
    if children.is_empty() {
        return Ok(format!("<details>\n<summary>{}</summary>\n</details>", summary));
    }
    Ok(format!(
        "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
        summary, children
    ))
}

fn format_code_block(code: &CodeBlock) -> String {
    let language = match code.language.as_str() {
        "plain text" => "",
        other => other,
    };
    let content = plain_text_of(&code.content.rich_text);
    let fence = "`".repeat(longest_backtick_run(&content).max(2) + 1);
    let mut result = format!("{fence}{}\n{}\n{fence}", language, content);

    let caption = rich_text_to_markdown(&code.caption);
    if !caption.trim().is_empty() {
        result.push_str(&format!("\n*{}*", caption.trim()));
    }
    result
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}

/// Caption, then uploaded file name.
fn media_label(media: &MediaBlock) -> Option<String> {
    let caption = plain_text_of(&media.caption);
    if !caption.trim().is_empty() {
        return Some(caption.trim().to_string());
    }
    media.name.clone()
}

/// Last path segment of a URL, for links without a caption or name.
fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

async fn format_media_link(
    media: &MediaBlock,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    let url = media.source.url();
    let path = ctx.download_asset(url, scope).await?;
    let label = media_label(media)
        .or_else(|| file_name_from_url(url))
        .unwrap_or_else(|| "file".to_string());
    Ok(format!("[{}]({})", label, path))
}

async fn format_child_database(
    database: &ChildDatabaseBlock,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    let title = if database.title.trim().is_empty() {
        "Untitled Database"
    } else {
        database.title.as_str()
    };

    let rows = ctx.database_rows(&database.common.id).await?;
    log::debug!("Child database '{}' lists {} rows", title, rows.len());

    let mut out = format!("### {}", title);
    if !rows.is_empty() {
        out.push('\n');
        for row in &rows {
            let row_title = row.display_title();
            let link = page_link(&row.id, row.title.as_deref().unwrap_or(""), ctx, scope)?;
            out.push_str(&format!("\n- [{}]({})", row_title, link));
        }
    }
    Ok(out)
}

/// Link from the scope's document to the document of page `id`, whose raw
/// title is `title`.
///
/// Pages already exported are linked where they were written. Others are
/// linked where the walk will put them: a subdirectory of the current page.
fn page_link(
    id: &NotionId,
    title: &str,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    match ctx.placed_dir(id) {
        Some(dir) => {
            let relative = relativize(&document_path(dir), &scope.page_dir)?;
            Ok(if relative.starts_with("../") {
                relative
            } else {
                format!("./{}", relative)
            })
        }
        None => Ok(format!(
            "./{}/{}",
            page_dir_name(title, id),
            DOCUMENT_FILE_NAME
        )),
    }
}

// --- Text helpers ---

/// Joins two rendered pieces, skipping the separator when either is empty.
fn join_nonempty(first: &str, second: &str, separator: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (_, true) => first.to_string(),
        (true, false) => second.to_string(),
        (false, false) => format!("{}{}{}", first, separator, second),
    }
}

/// Indents each non-empty line of `text` by `indent`, preserving blank lines.
fn indent_block_content(text: &str, indent: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prefixes every line with a blockquote marker.
fn quote_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {}", line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
