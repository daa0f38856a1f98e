// src/formatting/rich_text.rs
//! Rich text to markdown.
//!
//! Annotations wrap the span text in a fixed order (bold, italic,
//! strikethrough, code, underline), then the result is wrapped in a link.
//! The order never depends on how annotations were stored, so the same
//! span always renders to the same string.

use crate::types::{Annotations, RichTextItem, RichTextType};

/// Renders a sequence of spans into one markdown string.
pub fn rich_text_to_markdown(items: &[RichTextItem]) -> String {
    items.iter().map(render_span).collect()
}

/// Renders a single span.
pub fn render_span(item: &RichTextItem) -> String {
    let text = match &item.text_type {
        RichTextType::Equation { expression } => return format!("${}$", expression),
        RichTextType::Text { content, .. } => content.as_str(),
        RichTextType::Mention => item.plain_text.as_str(),
    };

    // Markers around whitespace do not render; leave such spans alone.
    if text.trim().is_empty() {
        return text.to_string();
    }

    // Keep surrounding whitespace outside the markers.
    let core = text.trim();
    let leading = &text[..text.len() - text.trim_start().len()];
    let trailing = &text[text.trim_end().len()..];

    let styled = apply_annotations(core, &item.annotations);
    let linked = match link_target(item) {
        Some(url) => format!("[{}]({})", styled, url),
        None => styled,
    };

    format!("{}{}{}", leading, linked, trailing)
}

/// Wraps `text` with the markers of every set annotation.
pub fn apply_annotations(text: &str, annotations: &Annotations) -> String {
    let mut result = text.to_string();

    if annotations.bold {
        result = format!("**{}**", result);
    }
    if annotations.italic {
        result = format!("*{}*", result);
    }
    if annotations.strikethrough {
        result = format!("~~{}~~", result);
    }
    if annotations.code {
        result = format!("`{}`", result);
    }
    // Underline requires HTML
    if annotations.underline {
        result = format!("<u>{}</u>", result);
    }

    result
}

fn link_target(item: &RichTextItem) -> Option<&str> {
    match &item.text_type {
        RichTextType::Text {
            link: Some(link), ..
        } => Some(link.url.as_str()),
        _ => item.href.as_deref(),
    }
}
