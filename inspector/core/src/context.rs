//! Conversation Context Assembly
//!
//! Builds the ordered role/content history handed to the completion service.
//! The order is fixed:
//!
//! 1. System instruction (preamble, style directive, focus line, dependency
//!    summary, relationship-answering rule)
//! 2. Rule payload (focused rule, or the whole list when `see_all_rules`)
//! 3. Prior transcript messages
//! 4. The new user message

use crate::conversation::Conversation;
use crate::messages::{HistoryEntry, Role};
use crate::relationships::{resolve_at, Relationships, NONE_LABEL};
use crate::rules::{position_of, Edge, Rule};
use crate::style::ResponseStyle;

const PREAMBLE: &str = "You are a firewall rule analyst embedded in a rule visualization tool. \
You help users understand what firewall rules do, which traffic they match, and how rules \
depend on each other. Base every answer on the rule data provided; do not invent rules, \
addresses, or ports.";

/// What the conversation is about
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// A single rule, by list position
    Rule(usize),
    /// The entire ruleset
    Ruleset,
}

impl Focus {
    /// Focus on the first rule with `rule_id`, or the whole ruleset if none has it
    #[must_use]
    pub fn on_rule_id(rules: &[Rule], rule_id: &str) -> Self {
        position_of(rules, rule_id).map_or(Self::Ruleset, Self::Rule)
    }

    /// This focus against `rules`; a position past the end becomes the
    /// whole ruleset
    #[must_use]
    pub fn within(self, rules: &[Rule]) -> Self {
        match self {
            Self::Rule(index) if index < rules.len() => self,
            _ => Self::Ruleset,
        }
    }
}

/// Assembles completion history for one inspection
#[derive(Clone, Debug)]
pub struct ConversationContextBuilder<'a> {
    rules: &'a [Rule],
    edges: &'a [Edge],
    focus: Focus,
    forward_greeting: bool,
}

impl<'a> ConversationContextBuilder<'a> {
    /// Create a builder over the current rule and edge lists
    ///
    /// A rule focus outside `rules` is treated as whole-ruleset focus.
    #[must_use]
    pub fn new(rules: &'a [Rule], edges: &'a [Edge], focus: Focus) -> Self {
        Self {
            rules,
            edges,
            focus: focus.within(rules),
            forward_greeting: true,
        }
    }

    /// Whether the synthetic greeting is forwarded as history
    #[must_use]
    pub fn with_greeting(mut self, forward: bool) -> Self {
        self.forward_greeting = forward;
        self
    }

    /// Relationships of the focused rule (empty for whole-ruleset focus)
    #[must_use]
    pub fn relationships(&self) -> Relationships {
        match self.focus {
            Focus::Rule(index) => resolve_at(index, self.rules, self.edges),
            Focus::Ruleset => Relationships::default(),
        }
    }

    /// The system instruction for the given style
    #[must_use]
    pub fn system_instruction(&self, style: ResponseStyle) -> String {
        let mut parts = vec![
            PREAMBLE.to_string(),
            format!("Response style: {}", style.directive()),
        ];

        match self.focused_rule() {
            Some((index, rule)) => {
                let number = index + 1;
                let rel = self.relationships();
                parts.push(format!(
                    "The user is asking about rule {number} (\"{}\", id {}).",
                    rule.name, rule.id
                ));
                parts.push(format!(
                    "Parent rules of rule {number} (rules that point to it): {}. \
                     Child rules of rule {number} (rules it points to): {}.",
                    rel.parents_label(),
                    rel.children_label()
                ));
                parts.push(format!(
                    "If the user asks about another rule by name, answer strictly from these lists: \
                     if it is listed as a child, say \"<name> is a child of rule {number}\"; \
                     if it is listed as a parent, say \"<name> is a parent of rule {number}\"; \
                     otherwise state that no direct relationship exists."
                ));
            }
            None => {
                parts.push(format!(
                    "The user is asking about the entire ruleset ({} rules).",
                    self.rules.len()
                ));
                parts.push(format!("Rule dependencies (parent -> child): {}", self.edge_summary()));
                parts.push(
                    "If the user asks how two rules are related, answer strictly from this list: \
                     the rule on the left of an arrow is a parent of the rule on the right, which is \
                     its child; if no arrow connects them, state that no direct relationship exists."
                        .to_string(),
                );
            }
        }

        parts.join("\n\n")
    }

    /// The rule payload message text
    #[must_use]
    pub fn rule_payload(&self, see_all_rules: bool) -> String {
        match self.focused_rule().filter(|_| !see_all_rules) {
            Some((_, rule)) => format!(
                "Rule data (JSON):\n{}",
                serde_json::to_string(rule).unwrap_or_default()
            ),
            None => format!(
                "All rules (JSON, in list order):\n{}",
                serde_json::to_string(self.rules).unwrap_or_default()
            ),
        }
    }

    /// Full history for a new user message
    #[must_use]
    pub fn build(&self, conversation: &Conversation, new_message: &str) -> Vec<HistoryEntry> {
        let prior = conversation.history(self.forward_greeting);

        let mut history = Vec::with_capacity(prior.len() + 3);
        history.push(HistoryEntry::new(
            Role::System,
            self.system_instruction(conversation.style()),
        ));
        history.push(HistoryEntry::new(
            Role::User,
            self.rule_payload(conversation.see_all_rules()),
        ));
        history.extend(prior);
        history.push(HistoryEntry::new(Role::User, new_message));

        tracing::debug!(
            entries = history.len(),
            style = %conversation.style(),
            see_all = conversation.see_all_rules(),
            "Assembled completion history"
        );

        history
    }

    fn focused_rule(&self) -> Option<(usize, &'a Rule)> {
        match self.focus {
            Focus::Rule(index) => self.rules.get(index).map(|rule| (index, rule)),
            Focus::Ruleset => None,
        }
    }

    fn edge_summary(&self) -> String {
        let lines: Vec<String> = self
            .edges
            .iter()
            .filter_map(|e| {
                let source = self.rules.get(e.source_index()?)?;
                let target = self.rules.get(e.target_index()?)?;
                Some(format!("{} -> {}", source.name, target.name))
            })
            .collect();

        if lines.is_empty() {
            NONE_LABEL.to_string()
        } else {
            lines.join("; ")
        }
    }
}
