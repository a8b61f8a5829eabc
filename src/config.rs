//! Configuration system for the procurement simulator
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (PROCSIM_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::{BackendType, OpenAiConfig};
use crate::error::{Error, Result};
use crate::evaluator::ContextSharing;

/// Main simulator configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Model endpoint settings
    pub model: ModelSettings,

    /// Simulation behaviour
    pub simulation: SimulationSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Model endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Provider: "openai" (any OpenAI-compatible server) or "mock"
    pub provider: String,

    /// API base URL (e.g., "http://localhost:11434/v1")
    pub base_url: String,

    /// API key (empty string for local servers like Ollama)
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Extra attempts on transient failures
    pub max_retries: u32,

    /// Sampling temperature (server default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Completion length cap (server default when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Which personas see earlier feedback: none, mentor, all
    pub context_sharing: String,

    /// External scenario catalog (bundled catalog when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_file: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

// Default implementations

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
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

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            context_sharing: "none".to_string(),
            scenario_file: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_files: 5,
            json_format: false,
        }
    }
}

impl ModelSettings {
    /// Parsed provider
    pub fn backend_type(&self) -> Result<BackendType> {
        BackendType::from_str(&self.provider).ok_or_else(|| {
            Error::config_field_invalid(
                "model.provider",
                format!("Unknown provider '{}'. Must be one of: openai, mock", self.provider),
            )
        })
    }

    /// Settings for the OpenAI-compatible client
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
            max_retries: self.max_retries,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Values given on the command line; they win over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub scenario_file: Option<String>,
    pub context_sharing: Option<String>,
}

impl SimConfig {
    /// Load configuration from file with environment and CLI overrides
    pub fn load(config_path: Option<&str>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = Self::from_toml_str(&content)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides()?;

        // 3. Apply CLI overrides
        config.apply_overrides(overrides);

        // 4. Expand paths
        config.expand_paths();

        // 5. Validate
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            message: e.message().to_string(),
            source: Some(e),
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            Some(PathBuf::from("procurement-sim.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("procurement-sim").join("config.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".procurement-sim").join("config.toml")),
        ];

        for path in search_paths.into_iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    ///
    /// A numeric variable that does not parse is a configuration error.
    fn apply_env_overrides(&mut self) -> Result<()> {
        // Model settings
        if let Ok(val) = std::env::var("PROCSIM_PROVIDER") {
            self.model.provider = val;
        }
        if let Ok(val) = std::env::var("PROCSIM_BASE_URL") {
            self.model.base_url = val;
        }
        if let Ok(val) = std::env::var("PROCSIM_API_KEY") {
            self.model.api_key = val;
        }
        if let Ok(val) = std::env::var("PROCSIM_MODEL") {
            self.model.model = val;
        }
        if let Some(n) = env_number("PROCSIM_TIMEOUT_SECS", "model.timeout_secs")? {
            self.model.timeout_secs = n;
        }
        if let Some(n) = env_number("PROCSIM_MAX_RETRIES", "model.max_retries")? {
            self.model.max_retries = n;
        }
        if let Some(t) = env_number("PROCSIM_TEMPERATURE", "model.temperature")? {
            self.model.temperature = Some(t);
        }

        // Simulation settings
        if let Ok(val) = std::env::var("PROCSIM_CONTEXT_SHARING") {
            self.simulation.context_sharing = val;
        }
        if let Ok(val) = std::env::var("PROCSIM_SCENARIO_FILE") {
            self.simulation.scenario_file = Some(val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("PROCSIM_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PROCSIM_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("PROCSIM_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref val) = overrides.provider {
            self.model.provider = val.clone();
        }
        if let Some(ref val) = overrides.model {
            self.model.model = val.clone();
        }
        if let Some(ref val) = overrides.scenario_file {
            self.simulation.scenario_file = Some(val.clone());
        }
        if let Some(ref val) = overrides.context_sharing {
            self.simulation.context_sharing = val.clone();
        }
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.model.api_key.is_empty() {
            copy.model.api_key = "********".to_string();
        }
        copy
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        if let Some(ref file) = self.simulation.scenario_file {
            self.simulation.scenario_file = Some(expand_path(file));
        }
        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.model.backend_type()?;

        // The endpoint only matters for the HTTP provider
        if self.model.provider.eq_ignore_ascii_case("openai") {
            let url = self.model.base_url.trim();
            if url.is_empty() {
                return Err(Error::config_field_invalid("model.base_url", "Base URL cannot be empty"));
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config_field_invalid(
                    "model.base_url",
                    "Base URL must start with http:// or https://",
                ));
            }
        }

        if self.model.model.trim().is_empty() {
            return Err(Error::config_field_invalid("model.model", "Model identifier cannot be empty"));
        }

        if self.model.timeout_secs == 0 {
            return Err(Error::config_field_invalid(
                "model.timeout_secs",
                "timeout_secs must be greater than 0",
            ));
        }

        if let Some(t) = self.model.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(Error::config_field_invalid(
                    "model.temperature",
                    "temperature must be between 0.0 and 2.0",
                ));
            }
        }

        self.context_sharing()?;

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Parsed context-sharing mode
    pub fn context_sharing(&self) -> Result<ContextSharing> {
        self.simulation
            .context_sharing
            .parse()
            .map_err(|e: String| Error::config_field_invalid("simulation.context_sharing", e))
    }
}

/// Read a numeric override; unset means no override
fn env_number<T>(var: &str, field: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(var) {
        Ok(val) => val.trim().parse().map(Some).map_err(|e| {
            Error::config_field_invalid(field, format!("{}='{}' is not valid: {}", var, val, e))
        }),
        Err(_) => Ok(None),
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("procurement-sim"))
        .or_else(|| dirs::home_dir().map(|p| p.join(".procurement-sim")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::config_validation(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# Procurement Simulator Configuration

[model]
# Provider: "openai" (any OpenAI-compatible server) or "mock" (offline)
provider = "openai"

# API base URL (Ollama, OpenAI, vLLM, LM Studio, etc.)
base_url = "http://localhost:11434/v1"

# API key (leave empty for local servers like Ollama)
api_key = ""

# Model identifier
model = "llama3.2:latest"

# Request timeout in seconds
timeout_secs = 120

# Extra attempts on transient failures (0 = single attempt)
max_retries = 0

# Sampling temperature (server default when unset)
# temperature = 0.7

# Completion length cap (server default when unset)
# max_tokens = 512

[simulation]
# Which personas see earlier feedback: "none", "mentor" or "all"
context_sharing = "none"

# External scenario catalog (bundled catalog when unset)
# scenario_file = "~/.procurement-sim/scenarios.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.procurement-sim/logs/procurement-sim.log"

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
