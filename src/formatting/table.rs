// src/formatting/table.rs
//! Table rendering.
//!
//! Rows are collected from every page of the table's `table_row` children.
//! The first row is always the header: markdown tables cannot start without one.

use super::rich_text::rich_text_to_markdown;
use crate::error::AppError;
use crate::export::TraversalContext;
use crate::model::{Block, TableBlock};

/// Renders a table block by listing its rows.
pub async fn render_table(table: &TableBlock, ctx: &TraversalContext) -> Result<String, AppError> {
    let children = ctx.block_children(&table.common.id).await?;
    let rows: Vec<Vec<String>> = children
        .iter()
        .filter_map(|block| match block {
            Block::TableRow(row) => Some(
                row.cells
                    .iter()
                    .map(|cell| rich_text_to_markdown(cell))
                    .collect(),
            ),
            other => {
                log::debug!("Ignoring non-row child '{}' of table", other.block_type());
                None
            }
        })
        .collect();

    log::debug!("Table {} has {} rows", table.common.id, rows.len());
    Ok(render_table_rows(&rows, table.table_width))
}

/// Lays out rendered cells as a markdown table.
///
/// Short rows are padded to `width` (or the widest row, if larger); empty
/// cells become a single space so the grid stays well-formed.
pub fn render_table_rows(rows: &[Vec<String>], width: usize) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(width).max(1);
    let line = |cells: &[String]| {
        let padded: Vec<String> = (0..width)
            .map(|i| {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                if cell.trim().is_empty() {
                    " ".to_string()
                } else {
                    escape_cell(cell)
                }
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(line(header));
    lines.push(format!("|{}", " --- |".repeat(width)));
    lines.extend(body.iter().map(|row| line(row)));
    lines.join("\n")
}

/// Makes cell text safe inside a table row.
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}
