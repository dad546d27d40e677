//! Rule and Edge Data Model
//!
//! Rules and edges are supplied by the surrounding visualization tool and are
//! treated as immutable snapshots for the lifetime of an inspection.
//!
//! Edges reference rules by their *position* in the current rule list, encoded
//! as decimal strings. They are only meaningful while the list ordering is
//! stable; reordering the list silently changes what every edge points at.

use serde::{Deserialize, Serialize};

/// A single firewall rule
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier
    pub id: String,
    /// Human-readable rule name
    pub name: String,
    /// Arbitrary rule payload (ports, addresses, actions, ...)
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Rule {
    /// Create a new rule
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payload,
        }
    }

    /// Raw serialized form shown in the search view (2-space pretty JSON)
    #[must_use]
    pub fn raw_text(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// A directed edge between two rules, by list position
///
/// `source` depends on / points to `target`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Stringified list index of the pointing rule
    pub source: String,
    /// Stringified list index of the rule pointed at
    pub target: String,
}

impl Edge {
    /// Create an edge from two list positions
    #[must_use]
    pub fn between(source: usize, target: usize) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    /// Source position, if the encoded index parses
    #[must_use]
    pub fn source_index(&self) -> Option<usize> {
        self.source.trim().parse().ok()
    }

    /// Target position, if the encoded index parses
    #[must_use]
    pub fn target_index(&self) -> Option<usize> {
        self.target.trim().parse().ok()
    }
}

/// Position of the first rule with the given identifier
#[must_use]
pub fn position_of(rules: &[Rule], rule_id: &str) -> Option<usize> {
    rules.iter().position(|r| r.id == rule_id)
}
