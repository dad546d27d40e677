//! Response Styles
//!
//! The closed set of output formats a user can pick. A style controls both
//! the directive sent to the completion service and how the reply is
//! rendered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a style or profile name is not recognized
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind}: {value}")]
pub struct StyleParseError {
    /// What was being parsed (e.g. "response style")
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

/// User-selected response style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    /// Short, direct answers
    #[default]
    Concise,
    /// Thorough explanations
    Detailed,
    /// Markdown table output
    Table,
    /// Bulleted list output
    Bullet,
    /// Plain, non-technical language
    Human,
    /// A single JSON document
    Json,
}

impl ResponseStyle {
    /// All styles, in menu order
    pub const ALL: [ResponseStyle; 6] = [
        Self::Concise,
        Self::Detailed,
        Self::Table,
        Self::Bullet,
        Self::Human,
        Self::Json,
    ];

    /// Wire/config name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Concise => "concise",
            Self::Detailed => "detailed",
            Self::Table => "table",
            Self::Bullet => "bullet",
            Self::Human => "human",
            Self::Json => "json",
        }
    }

    /// Menu label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Concise => "Concise",
            Self::Detailed => "Detailed",
            Self::Table => "Table",
            Self::Bullet => "Bullet points",
            Self::Human => "Human-friendly",
            Self::Json => "JSON",
        }
    }

    /// Instruction appended to the system prompt for this style
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Concise => {
                "Answer concisely in at most a few sentences. Skip preamble and restating the question."
            }
            Self::Detailed => {
                "Give a detailed, technical explanation. Use short headings (lines starting with #) \
                 and **bold** for key terms."
            }
            Self::Table => {
                "Format the answer as a single markdown table with a header row, a separator row, \
                 and one row per item. Do not add text outside the table."
            }
            Self::Bullet => {
                "Format the answer as a list of bullet points, one per line, each starting with \"- \". \
                 Do not add text outside the list."
            }
            Self::Human => {
                "Explain in plain, friendly language for someone without networking background. \
                 Avoid jargon, or explain it when unavoidable."
            }
            Self::Json => {
                "Respond only with a valid JSON document inside a ```json fenced block. \
                 Do not add any text outside the block."
            }
        }
    }
}

impl fmt::Display for ResponseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| StyleParseError {
                kind: "response style",
                value: s.to_string(),
            })
    }
}
