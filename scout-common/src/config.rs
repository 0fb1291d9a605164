//! Configuration management for Scout services.
//!
//! All Scout services share a unified configuration file at `~/.scout/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Explicit config file values
//! 2. Environment variables (SCOUT_* prefix)
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `SCOUT_CHAT_PORT` → services.chat.port
//! - `SCOUT_BIND_ADDRESS` → network.bind
//! - `SCOUT_LOG_LEVEL` → observability.log_level
//! - `OPENAI_API_KEY` → model.api_key

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".scout"),
        |dirs| dirs.home_dir().join(".scout"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration (Global bind address)
// ============================================================================

/// Global network configuration.
///
/// Controls the bind address for all services. Default is `127.0.0.1` (local only).
/// Set to `0.0.0.0` to allow remote access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address for all services.
    /// Default: "127.0.0.1" (conservative, local only)
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

// ============================================================================
// Services Port Configuration
// ============================================================================

/// Service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicesConfig {
    /// Chat session service
    #[serde(default)]
    pub chat: ServicePortConfig,
}

/// Individual service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServicePortConfig {
    /// Port number for the service
    #[serde(default)]
    pub port: Option<u16>,
}

// ============================================================================
// Model API Configuration
// ============================================================================

/// Model API configuration.
///
/// Settings for the outbound Responses API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the model API
    #[serde(default = "default_model_base_url")]
    pub base_url: String,

    /// Model name to request
    #[serde(default = "default_model_name")]
    pub model: String,

    /// API key (usually supplied via `OPENAI_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_model_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_model_base_url(),
            model: default_model_name(),
            api_key: None,
            timeout_secs: default_model_timeout_secs(),
        }
    }
}

fn default_model_base_url() -> String {
    "https://api.openai.com".into()
}

fn default_model_name() -> String {
    "gpt-4o-mini".into()
}

fn default_model_timeout_secs() -> u64 {
    120
}

// ============================================================================
// Chat Service Configuration
// ============================================================================

/// Chat service configuration (business settings only).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum number of prior turns sent to the model per request.
    ///
    /// Older turns beyond this window are silently dropped from the
    /// outbound context (the model's own server-side continuity is
    /// carried separately via response-id linkage).
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

fn default_history_window() -> usize {
    10
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for all Scout services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Global network configuration (bind address for all services)
    #[serde(default)]
    pub network: NetworkConfig,

    /// Service port configuration
    #[serde(default)]
    pub services: ServicesConfig,

    /// Model API configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Chat service configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable fallbacks.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("SCOUT_CHAT_PORT") {
            if let Ok(p) = port.parse() {
                self.services.chat.port = Some(p);
            }
        }

        if let Ok(bind) = std::env::var("SCOUT_BIND_ADDRESS") {
            self.network.bind = bind;
        }

        if let Ok(level) = std::env::var("SCOUT_LOG_LEVEL") {
            self.observability.log_level = level;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.model.api_key = Some(key);
        }
    }

    // =========================================================================
    // Endpoint convenience methods
    // =========================================================================

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the effective port for the chat service.
    pub fn chat_port(&self) -> u16 {
        self.services.chat.port.unwrap_or(4460)
    }

    /// Get the chat service endpoint URL.
    ///
    /// Example: "http://127.0.0.1:4460"
    pub fn chat_endpoint(&self) -> String {
        format!("http://{}:{}", self.bind_address(), self.chat_port())
    }
}
