//! Response Rendering
//!
//! Turns completion text into a structured, style-specific presentation.
//! Rendering is a pure function of `(style, text)` and never fails: anything
//! that does not parse for its style degrades to text shown verbatim.
//!
//! | Style                            | Output                                |
//! |----------------------------------|---------------------------------------|
//! | `table`                          | [`TableView`], or raw text if malformed |
//! | `bullet`                         | list items, markers stripped          |
//! | `json`                           | pretty JSON, or preformatted raw text |
//! | `concise` / `detailed` / `human` | [`Inline`] prose                      |
//!
//! Surfaces consume the structure directly, or go through
//! [`RenderedResponse::to_html`] / [`RenderedResponse::to_plain_text`].

mod bullets;
pub mod html;
mod inline;
mod json;
mod table;

use serde::{Deserialize, Serialize};

pub use html::RenderTheme;
pub use inline::{parse_inline, parse_prose, Inline};
pub use table::TableView;

use crate::style::ResponseStyle;

/// A rendered completion reply
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body", rename_all = "snake_case")]
pub enum RenderedResponse {
    /// Parsed pipe table
    Table(TableView),
    /// List items
    Bullets(Vec<String>),
    /// Pretty-printed JSON
    Json(String),
    /// Text shown preformatted (JSON that did not parse)
    Preformatted(String),
    /// Markdown-lite prose
    Prose(Vec<Inline>),
    /// Text shown as-is
    Raw(String),
}

impl RenderedResponse {
    /// HTML for web surfaces
    #[must_use]
    pub fn to_html(&self, theme: &RenderTheme) -> String {
        html::response_to_html(self, theme)
    }

    /// Plain text for terminal surfaces
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        match self {
            Self::Table(table) => {
                let mut lines = vec![table.header.join(" | ")];
                lines.extend(table.rows.iter().map(|row| row.join(" | ")));
                lines.join("\n")
            }
            Self::Bullets(items) => items
                .iter()
                .map(|item| format!("• {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Prose(inlines) => inlines
                .iter()
                .map(|inline| match inline {
                    Inline::Text(text) | Inline::Bold(text) => text.as_str(),
                    Inline::LineBreak => "\n",
                })
                .collect(),
            Self::Json(text) | Self::Preformatted(text) | Self::Raw(text) => text.clone(),
        }
    }
}

/// Style-dispatching reply renderer
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    /// Create a renderer
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render `text` for `style`
    #[must_use]
    pub fn render(&self, style: ResponseStyle, text: &str) -> RenderedResponse {
        match style {
            ResponseStyle::Table if text.contains('|') => table::parse_table(text)
                .map_or_else(|| RenderedResponse::Raw(text.to_string()), RenderedResponse::Table),
            ResponseStyle::Bullet => {
                let items = bullets::parse_bullets(text);
                if items.is_empty() {
                    RenderedResponse::Raw(text.to_string())
                } else {
                    RenderedResponse::Bullets(items)
                }
            }
            ResponseStyle::Json => json::pretty_json(text).map_or_else(
                || RenderedResponse::Preformatted(text.to_string()),
                RenderedResponse::Json,
            ),
            ResponseStyle::Table
            | ResponseStyle::Concise
            | ResponseStyle::Detailed
            | ResponseStyle::Human => RenderedResponse::Prose(parse_prose(text)),
        }
    }

    /// Render `text` for a style given by name
    ///
    /// An unrecognised name yields the text unmodified.
    #[must_use]
    pub fn render_named(&self, style: &str, text: &str) -> RenderedResponse {
        match style.parse::<ResponseStyle>() {
            Ok(style) => self.render(style, text),
            Err(_) => RenderedResponse::Raw(text.to_string()),
        }
    }
}
