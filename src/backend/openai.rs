//! OpenAI-compatible API backend
//!
//! Implements `CompletionBackend` by calling `/chat/completions` on any
//! OpenAI-compatible endpoint (Ollama, OpenAI, vLLM, LM Studio, ...).
//!
//! The reply text is always `choices[0].message.content`. A response without
//! choices, or with empty content, is treated as malformed.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::{BackendHealth, CompletionBackend, CompletionRequest};

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL (e.g., "http://localhost:11434/v1")
    pub base_url: String,

    /// API key (empty string for local servers like Ollama)
    pub api_key: String,

    /// Model identifier (e.g., "llama3.2:latest")
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Extra attempts on transient errors (0 = single attempt)
    pub max_retries: u32,

    /// Sampling temperature, server default when unset
    pub temperature: Option<f32>,

    /// Completion length cap, server default when unset
    pub max_tokens: Option<u32>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: String::new(),
            model: "llama3.2:latest".to_string(),
            timeout_secs: 120,
            max_retries: 0,
            temperature: None,
            max_tokens: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// OpenAI API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

// ─────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────

/// OpenAI-compatible API backend
pub struct OpenAiBackend {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiBackend {
    /// Create a new backend. Fails only if the HTTP client cannot be built.
    pub fn new(mut config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config_validation(format!("Failed to create HTTP client: {}", e)))?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "OpenAI-compatible backend created"
        );

        Ok(Self { config, client })
    }

    /// Build the authorization header value (if API key is set)
    fn auth_header(&self) -> Option<String> {
        if self.config.api_key.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.config.api_key))
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    /// Map a transport error onto the service taxonomy
    fn transport_error(&self, url: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::ServiceTimeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout_secs,
            }
        } else {
            Error::service_unavailable(url, e.to_string())
        }
    }

    /// One request/response exchange, no retries
    async fn send_once(&self, url: &str, body: &ChatCompletionRequest) -> Result<String> {
        let mut req = self.client.post(url).json(body);
        if let Some(ref auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }

        let response = req.send().await.map_err(|e| self.transport_error(url, e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ServiceRejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::service_malformed(format!("Failed to parse API response: {}", e)))?;

        if let Some(usage) = parsed.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }

        let text = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::service_malformed("No choices in API response"))?
            .message
            .content
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(Error::service_malformed("Empty message content in API response"));
        }

        Ok(text)
    }

    /// Make a chat completion request, resending on transient errors
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            stream: false,
        };

        let url = self.endpoint("chat/completions");
        let mut attempt = 0;

        loop {
            match self.send_once(&url, &body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(500 * 2u64.pow(attempt - 1));
                    warn!(attempt, ?backoff, error = %e, "Retryable API error");
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<BackendHealth> {
        let url = self.endpoint("models");
        let mut req = self.client.get(&url);
        if let Some(ref auth) = self.auth_header() {
            req = req.header("Authorization", auth);
        }

        let health = match req.send().await {
            Ok(resp) if resp.status().is_success() => BackendHealth {
                operational: true,
                model: self.config.model.clone(),
                error: None,
            },
            Ok(resp) => BackendHealth {
                operational: false,
                model: self.config.model.clone(),
                error: Some(format!("API returned status {}", resp.status())),
            },
            Err(e) => BackendHealth {
                operational: false,
                model: self.config.model.clone(),
                error: Some(format!("Connection failed: {}", e)),
            },
        };

        Ok(health)
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let start = Instant::now();

        let messages = vec![
            ChatMessage {
                role: "system",
                content: request.system.to_system_prompt(),
            },
            ChatMessage {
                role: "user",
                content: request.to_user_message(),
            },
        ];

        let text = self.chat_completion(messages).await?;

        debug!(
            role = %request.system.role,
            elapsed_ms = start.elapsed().as_millis() as u64,
            chars = text.len(),
            "Completion received"
        );

        Ok(text)
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
