use serde::{Deserialize, Serialize};

/// The kind of rich text content — a typed vocabulary replacing stringly-typed dispatch.
///
/// Each variant carries its specific data: you can't have an "equation" span
/// with no expression. Mentions keep only their rendered text; the exporter
/// links them through the span's `href`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RichTextType {
    Text { content: String, link: Option<Link> },
    Mention,
    Equation { expression: String },
}

/// Rich text item with formatting annotations.
///
/// The `text_type` field carries the content variant and `plain_text`
/// provides the fallback rendering for any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    pub text_type: RichTextType,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a plain text item — the most common rich text variant.
    ///
    /// ```ignore
    /// RichTextItem::plain_text("hello")
    /// ```
    pub fn plain_text(text: &str) -> Self {
        Self {
            text_type: RichTextType::Text {
                content: text.to_string(),
                link: None,
            },
            annotations: Annotations::default(),
            plain_text: text.to_string(),
            href: None,
        }
    }

    /// Returns the same span with the given annotations.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Returns the same span linked to `url`.
    pub fn with_link(mut self, url: &str) -> Self {
        if let RichTextType::Text { link, .. } = &mut self.text_type {
            *link = Some(Link {
                url: url.to_string(),
            });
        }
        self.href = Some(url.to_string());
        self
    }
}

/// Concatenates the unstyled text of a span sequence.
pub fn plain_text_of(items: &[RichTextItem]) -> String {
    items.iter().map(|item| item.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}
