// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to our domain model.
//!
//! Pages, their properties and every rich text array go through here. Block
//! payloads do not: they are decoded by tag in `parser` so that unknown block
//! types survive.

use crate::error::AppError;
use crate::formatting::format_number;
use crate::model::{DateRange, FileObject, NamedFile, Page, PropertyValue};
use crate::types::{Annotations, Link, NotionId, RichTextItem, RichTextType};
use notion_client::objects::page::{DatePropertyValue, PageProperty};
use notion_client::objects::property::DateOrDateTime;
use std::collections::{BTreeMap, HashMap};

/// Convert notion-client Page to our domain Page
pub fn convert_page(notion_page: notion_client::objects::page::Page) -> Result<Page, AppError> {
    let id = NotionId::parse(&notion_page.id)?;
    let title = extract_page_title(&notion_page.properties);
    let url = Some(notion_page.url).filter(|url| !url.is_empty());

    Ok(Page {
        id,
        url,
        title,
        properties: convert_page_properties(notion_page.properties),
    })
}

/// Convert array of rich text items
pub fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Vec<RichTextItem> {
    rich_texts.into_iter().filter_map(convert_rich_text).collect()
}

/// Convert single rich text item; span kinds this exporter cannot express are dropped.
fn convert_rich_text(
    rich_text: notion_client::objects::rich_text::RichText,
) -> Option<RichTextItem> {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => {
            let plain_text = plain_text.unwrap_or_else(|| text.content.clone());
            Some(RichTextItem {
                text_type: RichTextType::Text {
                    content: text.content,
                    link: text.link.map(|link| Link { url: link.url }),
                },
                annotations: convert_annotations(annotations.unwrap_or_default()),
                plain_text,
                href,
            })
        }

        NcRichText::Mention {
            annotations,
            plain_text,
            href,
            ..
        } => Some(RichTextItem {
            text_type: RichTextType::Mention,
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => Some(RichTextItem {
            text_type: RichTextType::Equation {
                expression: equation.expression,
            },
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        _ => {
            log::debug!("Dropping unsupported rich text span");
            None
        }
    }
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
    }
}

fn convert_file_object(file: notion_client::objects::file::File) -> FileObject {
    use notion_client::objects::file::File as NcFile;

    match file {
        NcFile::External { external } => FileObject::External { url: external.url },
        NcFile::File { file } => FileObject::Hosted {
            url: file.url,
            expiry_time: Some(file.expiry_time),
        },
    }
}

/// Extract the plain text of the page's title property
fn extract_page_title(properties: &HashMap<String, PageProperty>) -> Option<String> {
    properties.values().find_map(|property| match property {
        PageProperty::Title { title, .. } => Some(
            convert_rich_text_array(title.clone())
                .iter()
                .map(|item| item.plain_text.as_str())
                .collect::<String>(),
        ),
        _ => None,
    })
}

fn convert_page_properties(
    properties: HashMap<String, PageProperty>,
) -> BTreeMap<String, PropertyValue> {
    properties
        .into_iter()
        .map(|(name, property)| (name, convert_page_property(property)))
        .collect()
}

fn format_date(value: DateOrDateTime) -> String {
    match value {
        DateOrDateTime::Date(date) => date.format("%Y-%m-%d").to_string(),
        DateOrDateTime::DateTime(date_time) => date_time.format("%Y-%m-%d %H:%M").to_string(),
    }
}

fn convert_date(date: DatePropertyValue) -> Option<DateRange> {
    let start = date.start.map(format_date)?;
    Some(DateRange {
        start,
        end: date.end.map(format_date),
    })
}

fn convert_formula_value(
    formula: Option<notion_client::objects::page::FormulaPropertyValue>,
) -> Option<String> {
    use notion_client::objects::page::FormulaPropertyValue;

    match formula? {
        FormulaPropertyValue::String { string } => string,
        FormulaPropertyValue::Number { number } => number.and_then(|n| n.as_f64()).map(format_number),
        FormulaPropertyValue::Boolean { boolean } => Some(boolean.to_string()),
        FormulaPropertyValue::Date { date } => date.and_then(convert_date).map(|d| d.start),
    }
}

fn convert_rollup_value(
    rollup: Option<notion_client::objects::page::RollupPropertyValue>,
) -> Vec<PropertyValue> {
    use notion_client::objects::page::RollupPropertyValue;

    match rollup {
        Some(RollupPropertyValue::Number { number, .. }) => {
            vec![PropertyValue::Number(number.and_then(|n| n.as_f64()))]
        }
        Some(RollupPropertyValue::Date { date, .. }) => vec![PropertyValue::Date(date.map(|d| {
            DateRange {
                start: d.format("%Y-%m-%d %H:%M").to_string(),
                end: None,
            }
        }))],
        Some(RollupPropertyValue::Array { array, .. }) => {
            array.into_iter().map(convert_page_property).collect()
        }
        _ => Vec::new(),
    }
}

/// Convert individual page property
fn convert_page_property(property: PageProperty) -> PropertyValue {
    match property {
        PageProperty::Title { title, .. } => PropertyValue::Title(convert_rich_text_array(title)),
        PageProperty::RichText { rich_text, .. } => {
            PropertyValue::RichText(convert_rich_text_array(rich_text))
        }
        PageProperty::Number { number, .. } => PropertyValue::Number(number.and_then(|n| n.as_f64())),
        PageProperty::Checkbox { checkbox, .. } => PropertyValue::Checkbox(checkbox),
        PageProperty::Url { url, .. } => PropertyValue::Url(url),
        PageProperty::Email { email, .. } => PropertyValue::Email(email),
        PageProperty::PhoneNumber { phone_number, .. } => PropertyValue::PhoneNumber(phone_number),
        PageProperty::Select { select, .. } => PropertyValue::Select(select.and_then(|s| s.name)),
        PageProperty::MultiSelect { multi_select, .. } => PropertyValue::MultiSelect(
            multi_select.into_iter().filter_map(|s| s.name).collect(),
        ),
        PageProperty::Status { status, .. } => PropertyValue::Status(status.and_then(|s| s.name)),
        PageProperty::Date { date, .. } => PropertyValue::Date(date.and_then(convert_date)),
        PageProperty::People { people, .. } => {
            PropertyValue::People(people.into_iter().filter_map(|u| u.name).collect())
        }
        PageProperty::Files { files, .. } => PropertyValue::Files(
            files
                .into_iter()
                .map(|f| NamedFile {
                    name: f.name,
                    source: convert_file_object(f.file),
                })
                .collect(),
        ),
        PageProperty::CreatedTime { created_time, .. } => {
            PropertyValue::CreatedTime(created_time.format("%Y-%m-%d %H:%M").to_string())
        }
        PageProperty::CreatedBy { created_by, .. } => {
            PropertyValue::CreatedBy(created_by.name.unwrap_or_default())
        }
        PageProperty::LastEditedTime {
            last_edited_time, ..
        } => PropertyValue::LastEditedTime(
            last_edited_time.map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
        ),
        PageProperty::LastEditedBy { last_edited_by, .. } => {
            PropertyValue::LastEditedBy(last_edited_by.name.unwrap_or_default())
        }
        PageProperty::Relation { relation, .. } => {
            PropertyValue::Relation(relation.into_iter().map(|r| r.id).collect())
        }
        PageProperty::Formula { formula, .. } => {
            PropertyValue::Formula(convert_formula_value(formula))
        }
        PageProperty::Rollup { rollup, .. } => PropertyValue::Rollup(convert_rollup_value(rollup)),
        PageProperty::UniqueID { unique_id, .. } => {
            PropertyValue::UniqueId(unique_id.and_then(|uid| {
                let number = uid.number.and_then(|n| n.as_i64())?;
                Some(match uid.prefix {
                    Some(prefix) => format!("{}-{}", prefix, number),
                    None => number.to_string(),
                })
            }))
        }
        PageProperty::Verification { .. } => PropertyValue::Unsupported("verification".to_string()),
        PageProperty::Button { .. } => PropertyValue::Unsupported("button".to_string()),
    }
}
