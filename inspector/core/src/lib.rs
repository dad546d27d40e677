//! Rule Inspector Core - Headless Rule Inspection for Firewall Visualizations
//!
//! This crate provides the logic behind the "rule inspector" panel of a
//! firewall-rule visualization tool, completely independent of any UI
//! framework. A surface (web view, TUI, desktop shell) supplies the rule list
//! and edge list, forwards user input, and displays whatever this crate
//! produces.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          UI Surface                               │
//! │   rule list + edge list        rendered output      scroll/search │
//! └───────────────┬──────────────────────▲──────────────────▲─────────┘
//!                 │                      │                  │
//! ┌───────────────┼──────────────────────┼──────────────────┼─────────┐
//! │               ▼        INSPECTOR CORE│                  │         │
//! │  ┌──────────────────┐  ┌─────────────┴───┐  ┌───────────┴───────┐ │
//! │  │ RelationshipRes. │─▶│  RuleInspector  │  │ ScrollAnimator    │ │
//! │  └──────────────────┘  │  (conversation) │  │ SearchNavigator   │ │
//! │  ┌──────────────────┐  └──┬───────────▲──┘  └───────────────────┘ │
//! │  │ ContextBuilder   │◀────┘           │                           │
//! │  └────────┬─────────┘       ┌─────────┴────────┐                  │
//! │           ▼                 │ ResponseRenderer │                  │
//! │  ┌──────────────────┐       └──────────────────┘                  │
//! │  │ CompletionGateway│                                             │
//! │  └──────────────────┘                                             │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`RuleInspector`]: Orchestrates one inspection conversation
//! - [`CompletionGateway`]: Trait seam for the external completion service
//! - [`ResponseRenderer`]: Turns completion text into structured output
//! - [`ScrollAnimator`]: Frame-driven auto-scroll with user override
//! - [`SearchNavigator`]: Regex match navigation over a rule's raw text
//!
//! # Module Overview
//!
//! - [`rules`]: Rule and edge data model
//! - [`relationships`]: Parent/child derivation from positional edges
//! - [`style`]: Response style table
//! - [`messages`]: Message identifiers, senders, and wire roles
//! - [`conversation`]: Conversation state with greeting semantics
//! - [`context`]: History assembly for the completion service
//! - [`backend`]: Completion gateway trait and HTTP implementation
//! - [`inspector`]: The orchestrator
//! - [`render`]: Response rendering, inline AST, and safe HTML output
//! - [`animation`]: Easing and the scroll animator
//! - [`search`]: Search navigation and highlight segments
//! - [`config`]: Layered configuration loading

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod backend;
pub mod config;
pub mod context;
pub mod conversation;
pub mod inspector;
pub mod messages;
pub mod relationships;
pub mod render;
pub mod rules;
pub mod search;
pub mod style;

// Re-exports for convenience
pub use animation::{
    drive_scroll, scroll_duration, AnimatorPhase, CancelHandle, EasingFunction, ScrollAnimator,
    ScrollMetrics, ScrollSpeed, ScrollStart, ScrollState, ScrollViewport,
};
pub use backend::{
    ChatCompletionsGateway, CompletionGateway, CompletionRequest, GatewayError,
    COMPLETION_TEMPERATURE,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigSource,
    InspectorConfig, InspectorToml,
};
pub use context::{ConversationContextBuilder, Focus};
pub use conversation::{Conversation, APOLOGY};
pub use inspector::{
    ApplyResult, CompletionOutcome, PendingCompletion, RenderedMessage, RuleInspector, SendError,
};
pub use messages::{HistoryEntry, Message, MessageId, Role, Sender};
pub use relationships::{resolve_relationships, Relationships, NONE_LABEL};
pub use render::{Inline, RenderTheme, RenderedResponse, ResponseRenderer, TableView};
pub use rules::{Edge, Rule};
pub use search::{AnchorId, MatchSpan, NavDirection, ScrollIntoView, SearchNavigator, Segment};
pub use style::{ResponseStyle, StyleParseError};
