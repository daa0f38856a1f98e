// src/formatting/properties.rs
//! Page properties preamble.
//!
//! Each non-title property with a value becomes one bullet. File properties
//! are downloaded like any other asset and linked from their bullet.

use super::rich_text::rich_text_to_markdown;
use crate::error::AppError;
use crate::export::{PageScope, TraversalContext};
use crate::model::{DateRange, Page, PropertyValue};
use std::fmt::Write;

/// Renders the `- **Name**: value` preamble of a page, or an empty string
/// when no property has a value.
pub async fn render_properties(
    page: &Page,
    ctx: &TraversalContext,
    scope: &PageScope,
) -> Result<String, AppError> {
    let mut out = String::new();

    for (name, value) in &page.properties {
        let formatted = match value {
            PropertyValue::Title(_) => continue,
            PropertyValue::Files(files) => {
                let mut links = Vec::with_capacity(files.len());
                for file in files {
                    let path = ctx.download_asset(file.source.url(), scope).await?;
                    links.push(format!("[{}]({})", file.name, path));
                }
                Some(links.join(", ")).filter(|s| !s.is_empty())
            }
            other => format_property_value(other),
        };

        match formatted {
            Some(text) => writeln!(out, "- **{}**: {}", name, text)?,
            None => log::trace!("Skipping empty property '{}' ({})", name, value.type_name()),
        }
    }

    Ok(out.trim_end().to_string())
}

/// Formats a property value as inline markdown; `None` when there is nothing
/// to show. Files are not handled here since they need a download.
pub fn format_property_value(value: &PropertyValue) -> Option<String> {
    let text = match value {
        PropertyValue::Title(items) | PropertyValue::RichText(items) => rich_text_to_markdown(items),
        PropertyValue::Number(number) => number.map(format_number)?,
        PropertyValue::Select(name) | PropertyValue::Status(name) => name.clone()?,
        PropertyValue::MultiSelect(names) | PropertyValue::People(names) => names.join(", "),
        PropertyValue::Date(date) => format_date(date.as_ref()?),
        PropertyValue::Checkbox(checked) => if *checked { "Yes" } else { "No" }.to_string(),
        PropertyValue::Url(value)
        | PropertyValue::Email(value)
        | PropertyValue::PhoneNumber(value)
        | PropertyValue::Formula(value)
        | PropertyValue::LastEditedTime(value)
        | PropertyValue::UniqueId(value) => value.clone()?,
        PropertyValue::Relation(ids) => ids.join(", "),
        PropertyValue::Rollup(values) => values
            .iter()
            .filter_map(format_property_value)
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::CreatedTime(value)
        | PropertyValue::CreatedBy(value)
        | PropertyValue::LastEditedBy(value) => value.clone(),
        PropertyValue::Files(files) => files
            .iter()
            .map(|file| file.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Unsupported(_) => return None,
    };

    Some(text).filter(|text| !text.trim().is_empty())
}

fn format_date(date: &DateRange) -> String {
    match &date.end {
        Some(end) => format!("{} → {}", date.start, end),
        None => date.start.clone(),
    }
}

/// Formats a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
