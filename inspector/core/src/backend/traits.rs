//! Completion Gateway Traits
//!
//! Trait definitions for the completion service. The inspector depends only on
//! this seam, so tests and alternative providers can be swapped in without
//! touching conversation logic.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::messages::HistoryEntry;

/// Sampling temperature for every inspector request (deterministic-leaning)
pub const COMPLETION_TEMPERATURE: f32 = 0.3;

/// Errors from a completion attempt
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network or client failure
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Completion service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// Response did not contain a usable first candidate
    #[error("Malformed completion response: {0}")]
    Malformed(String),

    /// The request did not finish in time
    #[error("Completion request timed out")]
    Timeout,
}

/// Request body sent to the completion service
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Ordered role/content history
    pub messages: Vec<HistoryEntry>,
}

impl CompletionRequest {
    /// Create a request with the fixed inspector temperature
    pub fn new(model: impl Into<String>, messages: Vec<HistoryEntry>) -> Self {
        Self {
            model: model.into(),
            temperature: COMPLETION_TEMPERATURE,
            messages,
        }
    }
}

/// Completion gateway trait
///
/// Implementations return the text of the first candidate or fail.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Gateway name for logging
    fn name(&self) -> &str;

    /// Run one completion
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Role;

    #[test]
    fn test_request_uses_fixed_temperature() {
        let request = CompletionRequest::new("m", vec![HistoryEntry::new(Role::User, "hi")]);
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(request.model, "m");
    }

    #[test]
    fn test_request_wire_shape() {
        let request = CompletionRequest::new("m", vec![HistoryEntry::new(Role::System, "be brief")]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be brief");
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_error_display() {
        let err = GatewayError::Status {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Completion service returned 503: overloaded");
    }
}
