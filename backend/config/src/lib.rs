//! scanlens runtime configuration.
//!
//! Everything is environment-driven: one credential for the hosted model
//! API plus server/model knobs with defaults. `from_env_map` exists so
//! tests can inject an environment without touching process state.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// scanlens runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// API key for the hosted completion API
    pub api_key: Option<String>,
    /// Base URL of the chat-completions endpoint
    pub api_base_url: String,
    /// Model used for the vision call
    pub vision_model: String,
    /// Model used for the JSON-mode report call
    pub report_model: String,
    /// Token cap for the vision call
    pub vision_max_tokens: u32,
    /// Log level
    pub log_level: String,
    /// Directory for rolling NDJSON log files; console-only when unset
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            api_key: None,
            api_base_url: "https://api.openai.com/v1".to_string(),
            vision_model: "gpt-4o".to_string(),
            report_model: "gpt-4o".to_string(),
            vision_max_tokens: 1000,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_env_map(&std::env::vars().collect())
    }

    /// Load configuration from an explicit variable map.
    pub fn from_env_map(env: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            bind_address: get("SCANLENS_BIND").unwrap_or(defaults.bind_address),
            port: get("SCANLENS_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            api_key: get("OPENAI_API_KEY"),
            api_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.api_base_url),
            vision_model: get("SCANLENS_VISION_MODEL").unwrap_or(defaults.vision_model),
            report_model: get("SCANLENS_REPORT_MODEL").unwrap_or(defaults.report_model),
            vision_max_tokens: get("SCANLENS_VISION_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.vision_max_tokens),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: get("SCANLENS_LOG_DIR"),
        }
    }

    /// Validate the loaded configuration for serving.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            report.error(
                "api_key",
                "OPENAI_API_KEY is not set; relay calls will fail",
            );
        }
        if self.port == 0 {
            report.error("port", "Port 0 is not a usable bind port");
        }
        if self.bind_address.trim().is_empty() {
            report.error("bind_address", "Bind address cannot be empty");
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            report.error("api_base_url", "Base URL must be an http(s) URL");
        }
        if self.vision_max_tokens == 0 {
            report.warn(
                "vision_max_tokens",
                "Token cap of 0 will truncate the vision analysis to nothing",
            );
        }

        report
    }
}

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}
