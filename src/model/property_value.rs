use super::blocks::FileObject;
use crate::types::RichTextItem;
use serde::{Deserialize, Serialize};

/// A page property value, reduced to what the properties preamble renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Title(Vec<RichTextItem>),
    RichText(Vec<RichTextItem>),
    Number(Option<f64>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Status(Option<String>),
    Date(Option<DateRange>),
    People(Vec<String>),
    Files(Vec<NamedFile>),
    Checkbox(bool),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    /// Formula results are flattened to their display text.
    Formula(Option<String>),
    Relation(Vec<String>),
    /// Rollup results, one value per aggregated entry.
    Rollup(Vec<PropertyValue>),
    CreatedTime(String),
    CreatedBy(String),
    LastEditedTime(Option<String>),
    LastEditedBy(String),
    UniqueId(Option<String>),
    Unsupported(String),
}

impl PropertyValue {
    /// Returns the Notion API type name for this property value.
    pub fn type_name(&self) -> &str {
        match self {
            PropertyValue::Title(_) => "title",
            PropertyValue::RichText(_) => "rich_text",
            PropertyValue::Number(_) => "number",
            PropertyValue::Select(_) => "select",
            PropertyValue::MultiSelect(_) => "multi_select",
            PropertyValue::Status(_) => "status",
            PropertyValue::Date(_) => "date",
            PropertyValue::People(_) => "people",
            PropertyValue::Files(_) => "files",
            PropertyValue::Checkbox(_) => "checkbox",
            PropertyValue::Url(_) => "url",
            PropertyValue::Email(_) => "email",
            PropertyValue::PhoneNumber(_) => "phone_number",
            PropertyValue::Formula(_) => "formula",
            PropertyValue::Relation(_) => "relation",
            PropertyValue::Rollup(_) => "rollup",
            PropertyValue::CreatedTime(_) => "created_time",
            PropertyValue::CreatedBy(_) => "created_by",
            PropertyValue::LastEditedTime(_) => "last_edited_time",
            PropertyValue::LastEditedBy(_) => "last_edited_by",
            PropertyValue::UniqueId(_) => "unique_id",
            PropertyValue::Unsupported(tag) => tag,
        }
    }
}

/// Date property value; `end` is set for ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

/// An entry of a files property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedFile {
    pub name: String,
    pub source: FileObject,
}
