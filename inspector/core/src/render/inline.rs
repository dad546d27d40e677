//! Markdown-lite prose
//!
//! Heading lines become bold, `**bold**` spans become bold, newlines become
//! line breaks. The output is a flat inline AST; nothing is emitted as markup.

use serde::{Deserialize, Serialize};

/// Inline element of rendered prose
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    /// Plain text
    Text(String),
    /// Bold text
    Bold(String),
    /// Line break
    LineBreak,
}

/// Parse markdown-lite prose into inline elements
#[must_use]
pub fn parse_prose(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push(Inline::LineBreak);
        }

        match heading_text(line) {
            Some(heading) => {
                let heading = heading.replace("**", "");
                if !heading.is_empty() {
                    out.push(Inline::Bold(heading));
                }
            }
            None => out.extend(parse_inline(line)),
        }
    }

    out
}

/// Text of a `#`-prefixed heading line, without the markers
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with('#') {
        Some(trimmed.trim_start_matches('#').trim())
    } else {
        None
    }
}

/// Split one line into text and `**bold**` spans
///
/// An unmatched `**` is kept as literal text.
#[must_use]
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(open) = rest.find("**") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("**") else {
            break;
        };

        if open > 0 {
            spans.push(Inline::Text(rest[..open].to_string()));
        }
        let bold = &after_open[..close];
        if !bold.is_empty() {
            spans.push(Inline::Bold(bold.to_string()));
        }
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        spans.push(Inline::Text(rest.to_string()));
    }

    spans
}
