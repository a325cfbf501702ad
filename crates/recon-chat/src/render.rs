//! Markdown subset rendering for chat bubbles.
//!
//! Supports `**bold**`, `*italic*` and line breaks only. Markup-significant
//! characters are escaped before any transform is applied so message content
//! can never inject its own tags.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::types::{ChatMessage, Role};

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Escape `& < > " '` for safe inclusion in HTML text or attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Render message content to HTML: escape, then bold, then italic, then
/// newlines to `<br />`.
pub fn render_markdown(content: &str) -> String {
    render_with(content, true)
}

/// Render without escaping first. Only for content known to be trusted.
pub fn render_markdown_unescaped(content: &str) -> String {
    render_with(content, false)
}

fn render_with(content: &str, escape: bool) -> String {
    let escaped = if escape {
        escape_html(content)
    } else {
        Cow::Borrowed(content)
    };
    let bold = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    let italic = ITALIC_RE.replace_all(&bold, "<em>$1</em>");
    italic.replace('\n', "<br />")
}

/// Strip emphasis markers for plain-text display, keeping line breaks.
pub fn render_plain(content: &str) -> String {
    let bold = BOLD_RE.replace_all(content, "$1");
    ITALIC_RE.replace_all(&bold, "$1").into_owned()
}

/// A transcript entry ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMessage {
    pub id: String,
    pub role: Role,
    pub html: String,
    pub timestamp: DateTime<Utc>,
}

impl RenderedMessage {
    pub fn from_message(message: &ChatMessage, escape: bool) -> Self {
        Self {
            id: message.id.clone(),
            role: message.role,
            html: render_with(&message.content, escape),
            timestamp: message.timestamp,
        }
    }
}
