//! Relationship Resolution
//!
//! Derives a rule's parents and children from the positional edge list.
//! An edge `e` means "the rule at `e.source` points to the rule at
//! `e.target`", so:
//!
//! - parents of R: rules at `e.source` for every edge with `e.target == R`
//! - children of R: rules at `e.target` for every edge with `e.source == R`
//!
//! Results follow edge-list order and are not deduplicated.

use crate::rules::{position_of, Edge, Rule};

/// Label used when a relationship list is empty
pub const NONE_LABEL: &str = "None";

/// Parent and child names of one rule
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relationships {
    /// Names of rules pointing at this rule
    pub parents: Vec<String>,
    /// Names of rules this rule points at
    pub children: Vec<String>,
}

impl Relationships {
    /// Comma-joined parent names, or `"None"`
    #[must_use]
    pub fn parents_label(&self) -> String {
        join_or_none(&self.parents)
    }

    /// Comma-joined child names, or `"None"`
    #[must_use]
    pub fn children_label(&self) -> String {
        join_or_none(&self.children)
    }
}

/// Resolve relationships for the rule with `rule_id`
///
/// Unknown identifiers, empty inputs, and edges with unparseable or
/// out-of-range indices all degrade to empty lists.
#[must_use]
pub fn resolve_relationships(rule_id: &str, rules: &[Rule], edges: &[Edge]) -> Relationships {
    match position_of(rules, rule_id) {
        Some(index) => resolve_at(index, rules, edges),
        None => Relationships::default(),
    }
}

/// Resolve relationships for the rule at list position `index`
#[must_use]
pub fn resolve_at(index: usize, rules: &[Rule], edges: &[Edge]) -> Relationships {
    let name_at = |i: Option<usize>| i.and_then(|i| rules.get(i)).map(|r| r.name.clone());

    let parents = edges
        .iter()
        .filter(|e| e.target_index() == Some(index))
        .filter_map(|e| name_at(e.source_index()))
        .collect();

    let children = edges
        .iter()
        .filter(|e| e.source_index() == Some(index))
        .filter_map(|e| name_at(e.target_index()))
        .collect();

    Relationships { parents, children }
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        NONE_LABEL.to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules(names: &[&str]) -> Vec<Rule> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Rule::new(format!("id-{i}"), *n, serde_json::Value::Null))
            .collect()
    }

    #[test]
    fn test_single_edge_both_directions() {
        let rules = rules(&["A", "B"]);
        let edges = vec![Edge::between(0, 1)];

        let of_b = resolve_relationships("id-1", &rules, &edges);
        assert_eq!(of_b.parents_label(), "A");
        assert_eq!(of_b.children_label(), "None");

        let of_a = resolve_relationships("id-0", &rules, &edges);
        assert_eq!(of_a.parents_label(), "None");
        assert_eq!(of_a.children_label(), "B");
    }

    #[test]
    fn test_edge_order_and_duplicates_preserved() {
        let rules = rules(&["A", "B", "C"]);
        let edges = vec![Edge::between(2, 0), Edge::between(1, 0), Edge::between(2, 0)];

        let of_a = resolve_at(0, &rules, &edges);
        assert_eq!(of_a.parents, vec!["C", "B", "C"]);
        assert_eq!(of_a.parents_label(), "C, B, C");
    }

    #[test]
    fn test_missing_inputs_yield_none() {
        let empty = resolve_relationships("x", &[], &[]);
        assert_eq!(empty.parents_label(), NONE_LABEL);
        assert_eq!(empty.children_label(), NONE_LABEL);

        let rules = rules(&["A"]);
        let unknown = resolve_relationships("nope", &rules, &[Edge::between(0, 0)]);
        assert_eq!(unknown, Relationships::default());
    }

    #[test]
    fn test_invalid_edges_are_skipped() {
        let rules = rules(&["A", "B"]);
        let edges = vec![
            Edge::between(0, 9),
            Edge {
                source: "A".to_string(),
                target: "1".to_string(),
            },
            Edge::between(0, 1),
        ];

        let of_a = resolve_at(0, &rules, &edges);
        assert_eq!(of_a.children, vec!["B"]);
        let of_b = resolve_at(1, &rules, &edges);
        assert_eq!(of_b.parents, vec!["A"]);
    }
}
