//! Conversation State
//!
//! The transcript of one inspection conversation. A conversation always
//! starts with a synthetic assistant greeting; switching the response style
//! starts over with a fresh greeting.
//!
//! Conversations are session-scoped and never persisted.

use crate::messages::{HistoryEntry, Message, MessageId};
use crate::style::ResponseStyle;

/// Assistant message appended when a completion attempt fails
pub const APOLOGY: &str =
    "Sorry, I couldn't get a response right now. Please try again in a moment.";

/// Greeting shown at the top of every conversation
#[must_use]
pub fn greeting(style: ResponseStyle) -> String {
    format!(
        "Hi! Ask me anything about this rule or how it relates to the rest of the ruleset. \
         I'll answer in {} style.",
        style.label()
    )
}

/// Ordered transcript plus the conversation settings
#[derive(Clone, Debug)]
pub struct Conversation {
    messages: Vec<Message>,
    style: ResponseStyle,
    see_all_rules: bool,
    epoch: u64,
}

impl Conversation {
    /// Create a conversation containing only the greeting
    #[must_use]
    pub fn new(style: ResponseStyle) -> Self {
        Self {
            messages: vec![Message::assistant(greeting(style))],
            style,
            see_all_rules: false,
            epoch: 0,
        }
    }

    /// Active response style
    #[must_use]
    pub fn style(&self) -> ResponseStyle {
        self.style
    }

    /// Whether requests include every rule instead of only the focused one
    #[must_use]
    pub fn see_all_rules(&self) -> bool {
        self.see_all_rules
    }

    /// Toggle whole-ruleset context
    pub fn set_see_all_rules(&mut self, see_all: bool) {
        self.see_all_rules = see_all;
    }

    /// Reset counter, bumped each time the conversation starts over
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Switch style and start over with a new greeting
    ///
    /// The `see_all_rules` toggle survives the reset.
    pub fn reset_with_style(&mut self, style: ResponseStyle) {
        self.style = style;
        self.messages = vec![Message::assistant(greeting(style))];
        self.epoch += 1;
    }

    /// All messages, greeting first
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent message (the greeting if nothing else was said)
    #[must_use]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Character length of the most recent message's text
    #[must_use]
    pub fn last_message_len(&self) -> usize {
        self.last_message().map_or(0, Message::char_len)
    }

    /// Append a message and return its ID
    pub fn push(&mut self, message: Message) -> MessageId {
        let id = message.id.clone();
        self.messages.push(message);
        id
    }

    /// Prior messages as history entries
    ///
    /// With `include_greeting` the synthetic greeting is forwarded like any
    /// other assistant turn.
    #[must_use]
    pub fn history(&self, include_greeting: bool) -> Vec<HistoryEntry> {
        let skip = usize::from(!include_greeting);
        self.messages.iter().skip(skip).map(HistoryEntry::from).collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(ResponseStyle::default())
    }
}
