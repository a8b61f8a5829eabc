//! Mock backend for testing
//!
//! Provides a deterministic `CompletionBackend` that never touches the
//! network. It is also selectable as `provider = "mock"` so the whole
//! simulation can be exercised offline.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};

use super::{BackendHealth, CompletionBackend, CompletionRequest};

/// Custom reply function for scripted tests
pub type Responder = Arc<dyn Fn(&CompletionRequest) -> Result<String> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────
// Mock Backend Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for mock backend behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Simulated latency per call (ms)
    pub latency_ms: u64,

    /// Roles whose requests fail with a service error
    pub fail_roles: Vec<String>,

    /// Fixed response text (for deterministic testing)
    pub fixed_response: Option<String>,
}

// ─────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────

/// Mock implementation of CompletionBackend for testing
pub struct MockBackend {
    config: MockConfig,
    responder: Option<Responder>,
    requests: RwLock<Vec<CompletionRequest>>,
}

impl MockBackend {
    /// Create a new mock backend with default configuration
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create a new mock backend with custom configuration
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            responder: None,
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Reply through a custom function instead of the canned text
    #[cfg(test)]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String> + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Make every request from `role` fail
    #[cfg(test)]
    pub fn fail_for(mut self, role: impl Into<String>) -> Self {
        self.config.fail_roles.push(role.into());
        self
    }

    /// Number of completion calls received
    pub fn call_count(&self) -> u32 {
        self.requests.read().len() as u32
    }

    /// Every request received so far, in call order
    #[cfg(test)]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.read().clone()
    }

    /// Generate mock response text
    fn generate_response(&self, request: &CompletionRequest) -> Result<String> {
        if let Some(ref responder) = self.responder {
            return responder(request);
        }

        if let Some(ref fixed) = self.config.fixed_response {
            return Ok(fixed.clone());
        }

        // Predictable reply naming the role and the start of the task
        let task = request.prompt.lines().next().unwrap_or_default();
        Ok(format!("[{}] Reviewed: {}", request.system.role, task.trim()))
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockBackend")
            .field("config", &self.config)
            .field("scripted", &self.responder.is_some())
            .field("calls", &self.call_count())
            .finish()
    }
}

#[async_trait]
impl CompletionBackend for MockBackend {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<BackendHealth> {
        Ok(BackendHealth {
            operational: true,
            model: self.model().to_string(),
            error: None,
        })
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.write().push(request.clone());

        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }

        if self.config.fail_roles.iter().any(|r| r == &request.system.role) {
            return Err(Error::service_unavailable(
                "mock://completion",
                format!("Mock failure for {}", request.system.role),
            ));
        }

        self.generate_response(request)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::SystemContext;

    fn request(role: &str) -> CompletionRequest {
        CompletionRequest {
            prompt: "Review the budget.\nMore detail.".into(),
            expected_output: "Approval status.".into(),
            system: SystemContext {
                role: role.into(),
                goal: "g".into(),
                backstory: "b".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_default_response_is_deterministic() {
        let backend = MockBackend::new();
        let a = backend.complete(&request("Finance Officer")).await.unwrap();
        let b = backend.complete(&request("Finance Officer")).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "[Finance Officer] Reviewed: Review the budget.");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let backend = MockBackend::with_config(MockConfig {
            fixed_response: Some("Approved.".into()),
            ..Default::default()
        });
        assert_eq!(backend.complete(&request("x")).await.unwrap(), "Approved.");
    }

    #[tokio::test]
    async fn test_fail_for_role() {
        let backend = MockBackend::new().fail_for("Supplier Representative");
        let err = backend
            .complete(&request("Supplier Representative"))
            .await
            .unwrap_err();
        assert!(err.is_service_error());
        assert!(backend.complete(&request("Finance Officer")).await.is_ok());
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_responder_sees_request() {
        let backend = MockBackend::new()
            .with_responder(|req| Ok(format!("{} chars", req.prompt.len())));
        let reply = backend.complete(&request("x")).await.unwrap();
        assert_eq!(reply, "31 chars");
        assert_eq!(backend.requests()[0].system.role, "x");
    }
}
