//! Safe HTML output
//!
//! Emits only `b`, `br`, `ul`, `li`, `table`, `thead`, `tbody`, `tr`, `th`,
//! `td`, `pre`, `span` and `mark`. All text and attribute values are escaped.
//! Class names come from the [`RenderTheme`] passed in.

use serde::{Deserialize, Serialize};

use super::inline::Inline;
use super::table::TableView;
use super::RenderedResponse;
use crate::search::Segment;

/// Class names used by the HTML renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderTheme {
    /// `<table>` class
    pub table: String,
    /// `<ul>` class
    pub bullet_list: String,
    /// `<pre>` class for pretty JSON
    pub json: String,
    /// `<pre>` class for unparseable JSON replies
    pub preformatted: String,
    /// `<span>` class wrapping prose
    pub prose: String,
    /// `<span>` class wrapping unformatted text
    pub raw: String,
    /// `<mark>` class for a search match
    pub search_match: String,
    /// Extra `<mark>` class for the current search match
    pub current_match: String,
}

impl Default for RenderTheme {
    fn default() -> Self {
        Self {
            table: "inspector-table".to_string(),
            bullet_list: "inspector-bullets".to_string(),
            json: "inspector-json".to_string(),
            preformatted: "inspector-pre".to_string(),
            prose: "inspector-prose".to_string(),
            raw: "inspector-raw".to_string(),
            search_match: "search-match".to_string(),
            current_match: "search-match-current".to_string(),
        }
    }
}

/// Escape text for use in element content or a quoted attribute
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn open(tag: &str, class: &str) -> String {
    format!("<{tag} class=\"{}\">", escape_html(class))
}

/// Render a response as HTML
#[must_use]
pub fn response_to_html(response: &RenderedResponse, theme: &RenderTheme) -> String {
    match response {
        RenderedResponse::Table(table) => table_to_html(table, theme),
        RenderedResponse::Bullets(items) => {
            let mut out = open("ul", &theme.bullet_list);
            for item in items {
                out.push_str("<li>");
                out.push_str(&escape_html(item));
                out.push_str("</li>");
            }
            out.push_str("</ul>");
            out
        }
        RenderedResponse::Json(json) => {
            format!("{}{}</pre>", open("pre", &theme.json), escape_html(json))
        }
        RenderedResponse::Preformatted(text) => {
            format!("{}{}</pre>", open("pre", &theme.preformatted), escape_html(text))
        }
        RenderedResponse::Prose(inlines) => {
            format!("{}{}</span>", open("span", &theme.prose), inlines_to_html(inlines))
        }
        RenderedResponse::Raw(text) => {
            format!("{}{}</span>", open("span", &theme.raw), escape_html(text))
        }
    }
}

fn table_to_html(table: &TableView, theme: &RenderTheme) -> String {
    let mut out = open("table", &theme.table);

    out.push_str("<thead><tr>");
    for cell in &table.header {
        out.push_str("<th>");
        out.push_str(&escape_html(cell));
        out.push_str("</th>");
    }
    out.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str("<td>");
            out.push_str(&escape_html(cell));
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table>");
    out
}

/// Render inline elements as HTML
#[must_use]
pub fn inlines_to_html(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Bold(text) => {
                out.push_str("<b>");
                out.push_str(&escape_html(text));
                out.push_str("</b>");
            }
            Inline::LineBreak => out.push_str("<br>"),
        }
    }
    out
}

/// Render search-highlight segments as HTML
///
/// Each match becomes a `<mark>` whose `id` is its anchor's element id.
#[must_use]
pub fn segments_to_html(segments: &[Segment], theme: &RenderTheme) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Plain(text) => out.push_str(&escape_html(text)),
            Segment::Match {
                text,
                anchor,
                current,
            } => {
                let class = if *current {
                    format!("{} {}", theme.search_match, theme.current_match)
                } else {
                    theme.search_match.clone()
                };
                out.push_str(&format!(
                    "<mark id=\"{}\" class=\"{}\">{}</mark>",
                    escape_html(&anchor.element_id()),
                    escape_html(&class),
                    escape_html(text)
                ));
            }
        }
    }
    out
}
