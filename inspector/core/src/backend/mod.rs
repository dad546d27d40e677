//! Completion Service Integration
//!
//! This module provides abstracted access to the external text-completion
//! service through a common trait interface.
//!
//! # Available Gateways
//!
//! - **Chat completions**: any HTTP service speaking the
//!   `{model, temperature, messages}` chat-completions format
//!
//! # Usage
//!
//! ```ignore
//! use inspector_core::backend::{ChatCompletionsGateway, CompletionGateway, CompletionRequest};
//!
//! let gateway = ChatCompletionsGateway::from_config(&config)?;
//! let request = CompletionRequest::new("gpt-4o-mini", history);
//! let text = gateway.complete(&request).await?;
//! ```

mod chat_completions;
mod traits;

pub use chat_completions::ChatCompletionsGateway;
pub use traits::{CompletionGateway, CompletionRequest, GatewayError, COMPLETION_TEMPERATURE};
