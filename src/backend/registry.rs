//! Backend Registry
//!
//! Maps the configured provider onto a concrete client.

use std::sync::Arc;

use tracing::info;

use crate::config::ModelSettings;
use crate::error::Result;

use super::{MockBackend, OpenAiBackend, SharedBackend};

// ─────────────────────────────────────────────────────────────────
// Backend Type
// ─────────────────────────────────────────────────────────────────

/// Supported backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// OpenAI-compatible API backend
    OpenAi,
    /// Mock backend (offline, deterministic)
    Mock,
}

impl BackendType {
    /// Get the backend name
    pub fn name(&self) -> &'static str {
        match self {
            BackendType::OpenAi => "openai",
            BackendType::Mock => "mock",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Some(BackendType::OpenAi),
            "mock" => Some(BackendType::Mock),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────
// Backend Factory
// ─────────────────────────────────────────────────────────────────

/// Create the shared client for a run. No request is sent here.
pub fn create_backend(settings: &ModelSettings) -> Result<SharedBackend> {
    let backend_type = settings.backend_type()?;

    let backend: SharedBackend = match backend_type {
        BackendType::OpenAi => Arc::new(OpenAiBackend::new(settings.openai_config())?),
        BackendType::Mock => Arc::new(MockBackend::new()),
    };

    info!(backend = %backend_type, model = %backend.model(), "Model client ready");
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_type_from_str() {
        assert_eq!(BackendType::from_str("openai"), Some(BackendType::OpenAi));
        assert_eq!(BackendType::from_str(" Mock "), Some(BackendType::Mock));
        assert_eq!(BackendType::from_str("cuda"), None);
    }

    #[test]
    fn test_create_mock_backend() {
        let settings = ModelSettings {
            provider: "mock".into(),
            ..Default::default()
        };
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_create_openai_backend_uses_model() {
        let settings = ModelSettings {
            model: "qwen2.5:7b".into(),
            ..Default::default()
        };
        let backend = create_backend(&settings).unwrap();
        assert_eq!(backend.name(), "openai");
        assert_eq!(backend.model(), "qwen2.5:7b");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let settings = ModelSettings {
            provider: "vulkan".into(),
            ..Default::default()
        };
        assert!(create_backend(&settings).is_err());
    }
}
