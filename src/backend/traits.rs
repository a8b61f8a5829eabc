//! Backend trait definitions
//!
//! Defines the `CompletionBackend` trait: the one I/O boundary of the
//! simulation. Every implementation returns plain text; response-shape
//! handling stays inside the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────

/// Who is speaking: sent to the model as system context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemContext {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl SystemContext {
    /// Render as a system prompt
    pub fn to_system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }
}

/// One completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Rendered task prompt
    pub prompt: String,

    /// Description of the answer the persona should give
    pub expected_output: String,

    /// Persona system context
    pub system: SystemContext,
}

impl CompletionRequest {
    /// User message: the prompt followed by the expected-output line
    pub fn to_user_message(&self) -> String {
        format!(
            "{}\n\nThis is the expected criteria for your final answer: {}",
            self.prompt, self.expected_output
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Backend Health
// ─────────────────────────────────────────────────────────────────

/// Health status of a backend
#[derive(Debug, Clone)]
pub struct BackendHealth {
    /// Whether the backend answered
    pub operational: bool,

    /// Model identifier the backend will use
    pub model: String,

    /// Any error message
    pub error: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// CompletionBackend Trait
// ─────────────────────────────────────────────────────────────────

/// Core trait for language-model clients.
///
/// The trait is object-safe so one client can be shared by every persona.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Backend name (e.g., "openai", "mock")
    fn name(&self) -> &'static str;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Check that the backend can be reached
    async fn health_check(&self) -> Result<BackendHealth>;

    /// Run one completion and return the reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Type alias for a shared backend reference
pub type SharedBackend = Arc<dyn CompletionBackend>;

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn finance_context() -> SystemContext {
        SystemContext {
            role: "Finance Officer".into(),
            goal: "Assess budget fit.".into(),
            backstory: "Strict but fair budget manager.".into(),
        }
    }

    #[test]
    fn test_system_prompt() {
        let prompt = finance_context().to_system_prompt();
        assert!(prompt.starts_with("You are Finance Officer."));
        assert!(prompt.contains("Strict but fair budget manager."));
        assert!(prompt.ends_with("Your personal goal is: Assess budget fit."));
    }

    #[test]
    fn test_user_message_appends_expected_output() {
        let request = CompletionRequest {
            prompt: "Check the order.".into(),
            expected_output: "Approval status.".into(),
            system: finance_context(),
        };
        let message = request.to_user_message();
        assert!(message.starts_with("Check the order.\n\n"));
        assert!(message.ends_with("Approval status."));
    }
}
