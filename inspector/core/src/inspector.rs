//! Rule Inspector
//!
//! Orchestrates one inspection conversation: assembles context, admits at
//! most one completion at a time, absorbs completion failures into the
//! apology message, and renders the transcript in the active style.
//!
//! # Sending
//!
//! A send happens in two phases so the completion can run without holding a
//! borrow of the inspector:
//!
//! ```text
//! begin_send(text) ──▶ PendingCompletion ──run().await──▶ CompletionOutcome
//!   (gate raised)                                               │
//!                                   apply(outcome) ◀────────────┘
//!                                   (gate lowered)
//! ```
//!
//! [`RuleInspector::send`] does all three in sequence and lowers the gate
//! even when its future is dropped early. Two-phase hosts that give up on a
//! [`PendingCompletion`] call [`RuleInspector::abandon`] with its ticket.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::animation::{EasingFunction, ScrollAnimator, ScrollSpeed};
use crate::backend::{CompletionGateway, CompletionRequest, GatewayError};
use crate::config::InspectorConfig;
use crate::context::{ConversationContextBuilder, Focus};
use crate::conversation::{Conversation, APOLOGY};
use crate::messages::{Message, MessageId, Sender};
use crate::relationships::Relationships;
use crate::render::{RenderedResponse, ResponseRenderer};
use crate::rules::{Edge, Rule};
use crate::search::SearchNavigator;
use crate::style::ResponseStyle;

/// Rejected send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// A completion is already outstanding
    #[error("A completion request is already in flight")]
    Busy,

    /// Nothing to send after trimming
    #[error("Message is empty")]
    EmptyMessage,
}

/// Result of applying a completion outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    /// The reply was appended
    Replied(MessageId),
    /// The completion failed; the apology was appended
    Apologized(MessageId),
    /// The conversation was reset while the completion ran; nothing appended
    Discarded,
    /// The outcome does not belong to the outstanding completion
    Ignored,
}

/// Finished completion, ready for [`RuleInspector::apply`]
#[derive(Debug)]
pub struct CompletionOutcome {
    ticket: u64,
    result: Result<String, GatewayError>,
}

impl CompletionOutcome {
    /// Ticket of the send this outcome answers
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Completion text or failure
    #[must_use]
    pub fn result(&self) -> &Result<String, GatewayError> {
        &self.result
    }
}

/// An admitted send whose completion has not run yet
pub struct PendingCompletion<G: CompletionGateway + ?Sized> {
    gateway: Arc<G>,
    request: CompletionRequest,
    ticket: u64,
}

impl<G: CompletionGateway + ?Sized> PendingCompletion<G> {
    /// Request that will be sent
    #[must_use]
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    /// Ticket identifying this send
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Run the completion
    pub async fn run(self) -> CompletionOutcome {
        let result = self.gateway.complete(&self.request).await;
        CompletionOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// One transcript message, rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Message ID
    pub id: MessageId,
    /// Author
    pub sender: Sender,
    /// Rendered body
    pub body: RenderedResponse,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: u64,
    epoch: u64,
}

/// Inspection conversation over one rule or the whole ruleset
pub struct RuleInspector<G: CompletionGateway + ?Sized> {
    gateway: Arc<G>,
    model: String,
    forward_greeting: bool,
    scroll_speed: ScrollSpeed,
    scroll_easing: EasingFunction,
    rules: Vec<Rule>,
    edges: Vec<Edge>,
    focus: Focus,
    conversation: Conversation,
    renderer: ResponseRenderer,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl<G: CompletionGateway + ?Sized> RuleInspector<G> {
    /// Create an inspector with default settings
    ///
    /// A rule focus outside `rules` becomes whole-ruleset focus.
    pub fn new(
        gateway: Arc<G>,
        model: impl Into<String>,
        rules: Vec<Rule>,
        edges: Vec<Edge>,
        focus: Focus,
    ) -> Self {
        let focus = focus.within(&rules);
        Self {
            gateway,
            model: model.into(),
            forward_greeting: true,
            scroll_speed: ScrollSpeed::default(),
            scroll_easing: EasingFunction::default(),
            rules,
            edges,
            focus,
            conversation: Conversation::new(ResponseStyle::default()),
            renderer: ResponseRenderer::new(),
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Create an inspector using the model, default style, greeting policy
    /// and scroll settings from `config`
    pub fn from_config(
        gateway: Arc<G>,
        config: &InspectorConfig,
        rules: Vec<Rule>,
        edges: Vec<Edge>,
        focus: Focus,
    ) -> Self {
        let mut inspector = Self::new(gateway, config.model.clone(), rules, edges, focus)
            .with_forward_greeting(config.forward_greeting);
        inspector.conversation = Conversation::new(config.default_style);
        inspector.scroll_speed = config.scroll_speed;
        inspector.scroll_easing = config.scroll_easing;
        inspector
    }

    /// Set whether the greeting is forwarded as history
    #[must_use]
    pub fn with_forward_greeting(mut self, forward: bool) -> Self {
        self.forward_greeting = forward;
        self
    }

    /// Rule list
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Edge list
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Current focus
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Scroll profile the view should start with
    pub fn scroll_speed(&self) -> ScrollSpeed {
        self.scroll_speed
    }

    /// Idle auto-scroll animator for the conversation view
    pub fn scroll_animator(&self) -> ScrollAnimator {
        ScrollAnimator::new(self.scroll_speed).with_easing(self.scroll_easing)
    }

    /// Parents and children of the focused rule
    pub fn relationships(&self) -> Relationships {
        self.context().relationships()
    }

    /// The conversation
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Active response style
    pub fn style(&self) -> ResponseStyle {
        self.conversation.style()
    }

    /// Whether a completion is outstanding
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch response style, starting the conversation over
    ///
    /// Selecting the active style again changes nothing. An outstanding
    /// completion keeps the loading gate raised; its reply is dropped when it
    /// lands. Returns whether a reset happened.
    pub fn set_style(&mut self, style: ResponseStyle) -> bool {
        let previous = self.conversation.style();
        if previous == style {
            return false;
        }

        self.conversation.reset_with_style(style);
        tracing::info!(
            from = %previous,
            to = %style,
            loading = self.is_loading(),
            "Response style changed, conversation reset"
        );
        true
    }

    /// Include every rule in requests instead of only the focused one
    pub fn set_see_all_rules(&mut self, see_all: bool) {
        self.conversation.set_see_all_rules(see_all);
    }

    /// Admit a send
    ///
    /// Appends the user message, raises the loading gate, and returns the
    /// completion to run. Nothing changes on error.
    ///
    /// # Errors
    ///
    /// [`SendError::Busy`] while a completion is outstanding,
    /// [`SendError::EmptyMessage`] for blank input.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingCompletion<G>, SendError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }
        if self.in_flight.is_some() {
            tracing::debug!("Send rejected while a completion is in flight");
            return Err(SendError::Busy);
        }

        let history = self.context().build(&self.conversation, text);
        self.conversation.push(Message::user(text));

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight {
            ticket,
            epoch: self.conversation.epoch(),
        });

        Ok(PendingCompletion {
            gateway: Arc::clone(&self.gateway),
            request: CompletionRequest::new(self.model.clone(), history),
            ticket,
        })
    }

    /// Apply a finished completion and lower the loading gate
    pub fn apply(&mut self, outcome: CompletionOutcome) -> ApplyResult {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.ticket == outcome.ticket => in_flight,
            _ => return ApplyResult::Ignored,
        };
        self.in_flight = None;

        if in_flight.epoch != self.conversation.epoch() {
            tracing::warn!(
                ticket = outcome.ticket,
                "Discarding completion for a conversation that was reset"
            );
            return ApplyResult::Discarded;
        }

        match outcome.result {
            Ok(text) => ApplyResult::Replied(self.conversation.push(Message::assistant(text))),
            Err(e) => {
                tracing::warn!(
                    gateway = self.gateway.name(),
                    error = %e,
                    "Completion failed"
                );
                ApplyResult::Apologized(self.conversation.push(Message::assistant(APOLOGY)))
            }
        }
    }

    /// Give up on an admitted send and lower the loading gate
    ///
    /// Nothing is appended. Returns `false` if `ticket` is not the
    /// outstanding send; a later outcome for it is ignored.
    pub fn abandon(&mut self, ticket: u64) -> bool {
        match self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket => {
                self.in_flight = None;
                tracing::debug!(ticket, "Completion abandoned");
                true
            }
            _ => false,
        }
    }

    /// Send a message and wait for the reply
    ///
    /// Dropping the returned future before it resolves abandons the send.
    ///
    /// # Errors
    ///
    /// Same as [`RuleInspector::begin_send`]. Completion failures are not
    /// errors; they show up as the apology message.
    pub async fn send(&mut self, text: &str) -> Result<ApplyResult, SendError> {
        let pending = self.begin_send(text)?;
        let guard = SendGuard {
            ticket: pending.ticket(),
            inspector: self,
            armed: true,
        };
        let outcome = pending.run().await;
        Ok(guard.finish(outcome))
    }

    /// Transcript with assistant messages rendered in the active style
    pub fn rendered_transcript(&self) -> Vec<RenderedMessage> {
        let style = self.conversation.style();
        self.conversation
            .messages()
            .iter()
            .map(|message| RenderedMessage {
                id: message.id.clone(),
                sender: message.sender,
                body: match message.sender {
                    Sender::Assistant => self.renderer.render(style, &message.text),
                    Sender::User => RenderedResponse::Raw(message.text.clone()),
                },
            })
            .collect()
    }

    /// Search navigator over the raw text of the focus
    ///
    /// The focused rule's serialized form, or the whole list for ruleset focus.
    pub fn search_navigator(&self) -> SearchNavigator {
        match self.focus {
            Focus::Rule(index) => self
                .rules
                .get(index)
                .map_or_else(|| SearchNavigator::new(""), SearchNavigator::for_rule),
            Focus::Ruleset => {
                let list = Value::Array(
                    self.rules
                        .iter()
                        .filter_map(|rule| serde_json::to_value(rule).ok())
                        .collect(),
                );
                SearchNavigator::new(serde_json::to_string_pretty(&list).unwrap_or_default())
            }
        }
    }

    fn context(&self) -> ConversationContextBuilder<'_> {
        ConversationContextBuilder::new(&self.rules, &self.edges, self.focus)
            .with_greeting(self.forward_greeting)
    }
}

/// Abandons its send on drop unless the outcome was applied
struct SendGuard<'a, G: CompletionGateway + ?Sized> {
    inspector: &'a mut RuleInspector<G>,
    ticket: u64,
    armed: bool,
}

impl<G: CompletionGateway + ?Sized> SendGuard<'_, G> {
    fn finish(mut self, outcome: CompletionOutcome) -> ApplyResult {
        self.armed = false;
        self.inspector.apply(outcome)
    }
}

impl<G: CompletionGateway + ?Sized> Drop for SendGuard<'_, G> {
    fn drop(&mut self) {
        if self.armed {
            self.inspector.abandon(self.ticket);
        }
    }
}
