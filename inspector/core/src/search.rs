//! Search Navigation
//!
//! Case-insensitive regex search over a rule's raw serialized text, with
//! wrap-around match navigation.
//!
//! Highlighting is re-derived from the current term on every
//! [`SearchNavigator::segments`] call. Each call also rebuilds the anchor
//! arena: one [`AnchorId`] per match, stamped with a fresh generation, so an
//! anchor from an earlier render never aliases a match of the current one.
//! [`SearchNavigator::navigate`] rebuilds the arena itself when it is out of
//! date.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// Byte range of one match in the searched text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

/// Scroll anchor of one match in one render pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorId {
    /// Render pass the anchor belongs to
    pub generation: u64,
    /// Match index
    pub index: usize,
}

impl AnchorId {
    /// Element id a surface can attach to the highlighted match
    #[must_use]
    pub fn element_id(&self) -> String {
        format!("search-match-{}-{}", self.generation, self.index)
    }
}

/// Piece of the searched text, for highlighting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Text outside any match
    Plain(String),
    /// Matched text
    Match {
        /// The matched text
        text: String,
        /// Anchor to scroll to
        anchor: AnchorId,
        /// Whether this is the current match
        current: bool,
    },
}

/// Navigation direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavDirection {
    /// Next match, wrapping to the first
    Next,
    /// Previous match, wrapping to the last
    Prev,
}

/// Request to bring a match into view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollIntoView {
    /// Anchor of the match
    pub anchor: AnchorId,
    /// Match index
    pub index: usize,
    /// 1-based line the match starts on
    pub line: usize,
    /// Location in the text
    pub span: MatchSpan,
    /// Animate the scroll
    pub smooth: bool,
    /// Center the match vertically
    pub center: bool,
}

/// Regex match navigator over a static text
#[derive(Clone, Debug, Default)]
pub struct SearchNavigator {
    text: String,
    term: String,
    matches: Vec<MatchSpan>,
    current: usize,
    anchors: Vec<AnchorId>,
    generation: u64,
}

impl SearchNavigator {
    /// Create a navigator over `text` with an empty term
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Create a navigator over a rule's raw serialized form
    #[must_use]
    pub fn for_rule(rule: &Rule) -> Self {
        Self::new(rule.raw_text())
    }

    /// Searched text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current term
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Replace the term and restart at the first match
    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.matches = find_matches(&self.text, &self.term);
        self.current = 0;
        self.anchors.clear();
    }

    /// Matches of the current term
    #[must_use]
    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    /// Index of the current match, if there are any
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.current)
    }

    /// Counter shown next to the search box: `"0 / 0"` or `"<n> / <count>"`
    #[must_use]
    pub fn counter_label(&self) -> String {
        match self.current_index() {
            Some(index) => format!("{} / {}", index + 1, self.matches.len()),
            None => "0 / 0".to_string(),
        }
    }

    /// Move to the next or previous match, wrapping at both ends
    ///
    /// Returns `None` without changing anything when there are no matches.
    pub fn navigate(&mut self, direction: NavDirection) -> Option<ScrollIntoView> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }

        self.current = match direction {
            NavDirection::Next => (self.current + 1) % count,
            NavDirection::Prev => (self.current + count - 1) % count,
        };

        if self.anchors.len() != count {
            self.rebuild_anchors();
        }

        let span = self.matches[self.current];
        Some(ScrollIntoView {
            anchor: self.anchors[self.current],
            index: self.current,
            line: line_of(&self.text, span.start),
            span,
            smooth: true,
            center: true,
        })
    }

    /// Highlight segments for one render pass
    pub fn segments(&mut self) -> Vec<Segment> {
        self.matches = find_matches(&self.text, &self.term);
        if self.current >= self.matches.len() {
            self.current = 0;
        }
        self.rebuild_anchors();

        let mut segments = Vec::with_capacity(self.matches.len() * 2 + 1);
        let mut cursor = 0;

        for (index, span) in self.matches.iter().enumerate() {
            if span.start > cursor {
                segments.push(Segment::Plain(self.text[cursor..span.start].to_string()));
            }
            segments.push(Segment::Match {
                text: self.text[span.start..span.end].to_string(),
                anchor: self.anchors[index],
                current: index == self.current,
            });
            cursor = span.end;
        }

        if cursor < self.text.len() || segments.is_empty() {
            segments.push(Segment::Plain(self.text[cursor..].to_string()));
        }

        segments
    }

    fn rebuild_anchors(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.anchors = (0..self.matches.len())
            .map(|index| AnchorId { generation, index })
            .collect();
    }
}

/// Case-insensitive regex matches of `term` in `text`
///
/// An empty or invalid term has no matches. Empty matches are skipped.
#[must_use]
pub fn find_matches(text: &str, term: &str) -> Vec<MatchSpan> {
    if term.is_empty() {
        return Vec::new();
    }

    let regex = match RegexBuilder::new(term).case_insensitive(true).build() {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!(term, error = %e, "Search term is not a valid regex");
            return Vec::new();
        }
    };

    regex
        .find_iter(text)
        .filter(|m| !m.is_empty())
        .map(|m| MatchSpan {
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
