//! Configuration system for LeaseBot
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/leasebot/config.{LEASEBOT_ENV}.json
//! 3. Default values
//!
//! Where LEASEBOT_ENV can be: production (default), development, test
//!
//! # Examples
//!
//! ```no_run
//! use leasebot::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load(None)?;
//! println!("Summarizer: {} via {}", config.summarizer.model, config.summarizer.provider);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! Environment variables override config file values:
//! - LEASEBOT_SUMMARIZER_PROVIDER
//! - LEASEBOT_SUMMARIZER_URL
//! - LEASEBOT_SUMMARIZER_MODEL
//! - LEASEBOT_OCR_COMMAND

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::summarize::SummaryBounds;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Supported summarization backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    /// Hugging Face Inference API (summarization pipeline models)
    #[default]
    HuggingFace,
    Ollama,
    OpenAI,
}

impl std::fmt::Display for SummarizerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HuggingFace => write!(f, "huggingface"),
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for SummarizerProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            _ => Err(ConfigError::ValidationError(format!(
                "Unknown summarizer provider: {}",
                s
            ))),
        }
    }
}

impl SummarizerProvider {
    pub fn default_url(&self) -> &'static str {
        match self {
            Self::HuggingFace => "https://api-inference.huggingface.co",
            Self::Ollama => "http://localhost:11434",
            Self::OpenAI => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::HuggingFace => "sshleifer/distilbart-cnn-12-6",
            Self::Ollama => "qwen3:8b",
            Self::OpenAI => "gpt-4o-mini",
        }
    }
}

/// Configuration for the external summarization model
///
/// Missing `url`, `model` and `api_key` fall back to the defaults of the
/// configured provider, so `{"provider": "ollama"}` targets a local Ollama.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SummarizerConfigFile")]
pub struct SummarizerConfig {
    /// Provider type
    pub provider: SummarizerProvider,

    /// Base URL of the provider API
    pub url: String,

    /// Model name
    pub model: String,

    /// API key (can be environment variable name like "HF_API_TOKEN")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Temperature for chat-style providers (0.0 - 2.0)
    pub temperature: f32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// On-disk shape of [`SummarizerConfig`]; every field optional
#[derive(Deserialize)]
struct SummarizerConfigFile {
    #[serde(default)]
    provider: SummarizerProvider,
    url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

impl From<SummarizerConfigFile> for SummarizerConfig {
    fn from(file: SummarizerConfigFile) -> Self {
        let defaults = SummarizerConfig::for_provider(file.provider);
        Self {
            provider: file.provider,
            url: file.url.unwrap_or(defaults.url),
            model: file.model.unwrap_or(defaults.model),
            api_key: file.api_key.or(defaults.api_key),
            temperature: file.temperature,
            timeout_secs: file.timeout_secs,
        }
    }
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    120
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        let provider = SummarizerProvider::HuggingFace;
        Self {
            provider,
            url: provider.default_url().to_string(),
            model: provider.default_model().to_string(),
            api_key: Some("HF_API_TOKEN".to_string()),
            temperature: default_temperature(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SummarizerConfig {
    /// Defaults for a given provider
    pub fn for_provider(provider: SummarizerProvider) -> Self {
        let api_key = match provider {
            SummarizerProvider::HuggingFace => Some("HF_API_TOKEN".to_string()),
            SummarizerProvider::Ollama => None,
            SummarizerProvider::OpenAI => Some("OPENAI_API_KEY".to_string()),
        };
        Self {
            provider,
            url: provider.default_url().to_string(),
            model: provider.default_model().to_string(),
            api_key,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.url.is_empty() {
            return Err(ConfigError::ValidationError("URL cannot be empty".to_string()));
        }

        if self.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "Model name cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.provider == SummarizerProvider::OpenAI && self.api_key.is_none() {
            return Err(ConfigError::ValidationError(format!(
                "API key required for {} provider",
                self.provider
            )));
        }

        Ok(())
    }

    /// Resolve API key from environment variable if needed
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key.as_ref().and_then(|key| {
            // If the key looks like an env var name, try to resolve it
            if key.chars().all(|c| c.is_uppercase() || c == '_') {
                std::env::var(key).ok()
            } else {
                Some(key.clone())
            }
        })
    }
}

/// OCR settings for scanned agreements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Executable to run; receives `<image> stdout -l <language>`
    #[serde(default = "default_ocr_command")]
    pub command: String,

    /// Tesseract language code
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

fn default_ocr_command() -> String {
    "tesseract".to_string()
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: default_ocr_command(),
            language: default_ocr_language(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// External summarization model
    #[serde(default)]
    pub summarizer: SummarizerConfig,

    /// Whether uploads are summarized at all
    #[serde(default = "default_summarize")]
    pub summarize: bool,

    /// Words per summarization chunk
    #[serde(default = "default_chunk_words")]
    pub chunk_words: usize,

    /// Upper bound on each chunk summary
    #[serde(default = "default_summary_max")]
    pub summary_max_length: usize,

    /// Lower bound on each chunk summary
    #[serde(default = "default_summary_min")]
    pub summary_min_length: usize,

    /// OCR backend
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

fn default_summarize() -> bool {
    true
}

fn default_chunk_words() -> usize {
    400
}

fn default_summary_max() -> usize {
    130
}

fn default_summary_min() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            summarizer: SummarizerConfig::default(),
            summarize: default_summarize(),
            chunk_words: default_chunk_words(),
            summary_max_length: default_summary_max(),
            summary_min_length: default_summary_min(),
            ocr: OcrConfig::default(),
            debug: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration with standard priority:
    /// 1. Explicit path
    /// 2. ~/.config/leasebot/config.{LEASEBOT_ENV}.json
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit_path {
            if path.exists() {
                tracing::info!("Loading config from: {:?}", path);
                return Self::from_file(path);
            } else {
                return Err(ConfigError::ValidationError(format!(
                    "Config file not found: {:?}",
                    path
                )));
            }
        }

        let env = std::env::var("LEASEBOT_ENV").unwrap_or_else(|_| "production".to_string());

        if let Some(config_dir) = Self::config_dir() {
            let config_path = config_dir.join(format!("config.{}.json", env));

            if config_path.exists() {
                tracing::info!("Loading config from: {:?}", config_path);
                return Self::from_file(&config_path);
            }
        }

        tracing::info!("Using default configuration with environment overrides");
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("LEASEBOT_SUMMARIZER_PROVIDER") {
            match provider.parse::<SummarizerProvider>() {
                Ok(p) if p != self.summarizer.provider => {
                    self.summarizer = SummarizerConfig::for_provider(p);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Ignoring LEASEBOT_SUMMARIZER_PROVIDER: {}", e),
            }
        }

        if let Ok(url) = std::env::var("LEASEBOT_SUMMARIZER_URL") {
            self.summarizer.url = url;
        }

        if let Ok(model) = std::env::var("LEASEBOT_SUMMARIZER_MODEL") {
            self.summarizer.model = model;
        }

        if let Ok(command) = std::env::var("LEASEBOT_OCR_COMMAND") {
            self.ocr.command = command;
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.summarizer.validate()?;

        if self.chunk_words == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_words must be greater than 0".to_string(),
            ));
        }

        if self.summary_max_length == 0 || self.summary_min_length > self.summary_max_length {
            return Err(ConfigError::ValidationError(format!(
                "summary bounds invalid: min {} / max {}",
                self.summary_min_length, self.summary_max_length
            )));
        }

        if self.ocr.command.is_empty() {
            return Err(ConfigError::ValidationError(
                "OCR command cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Summary length bounds passed to the summarizer per chunk
    pub fn summary_bounds(&self) -> SummaryBounds {
        SummaryBounds {
            max_length: self.summary_max_length,
            min_length: self.summary_min_length,
        }
    }

    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("leasebot"))
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.summarizer.provider, SummarizerProvider::HuggingFace);
        assert_eq!(config.chunk_words, 400);
        assert_eq!(config.summary_bounds(), SummaryBounds { max_length: 130, min_length: 50 });
    }

    #[test]
    fn test_bounds_validation() {
        let mut config = AppConfig::default();
        config.summary_min_length = 200;
        assert!(config.validate().is_err());

        config.summary_min_length = 10;
        config.chunk_words = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summarizer_validation() {
        let mut config = SummarizerConfig::default();
        assert!(config.validate().is_ok());

        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut openai = SummarizerConfig::for_provider(SummarizerProvider::OpenAI);
        assert!(openai.validate().is_ok());
        openai.api_key = None;
        assert!(openai.validate().is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("hf".parse::<SummarizerProvider>().unwrap(), SummarizerProvider::HuggingFace);
        assert_eq!("Ollama".parse::<SummarizerProvider>().unwrap(), SummarizerProvider::Ollama);
        assert_eq!("OPENAI".parse::<SummarizerProvider>().unwrap(), SummarizerProvider::OpenAI);
        assert!("invalid".parse::<SummarizerProvider>().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"chunk_words": 250}"#).unwrap();
        assert_eq!(config.chunk_words, 250);
        assert!(config.summarize);
        assert_eq!(config.ocr.command, "tesseract");
    }

    #[test]
    fn test_provider_only_summarizer_uses_provider_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"summarizer": {"provider": "ollama"}}"#).unwrap();
        assert_eq!(config.summarizer.provider, SummarizerProvider::Ollama);
        assert_eq!(config.summarizer.url, "http://localhost:11434");
        assert_eq!(config.summarizer.model, "qwen3:8b");
        assert!(config.summarizer.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_summarizer_without_provider_is_huggingface() {
        let config: AppConfig =
            serde_json::from_str(r#"{"summarizer": {"model": "facebook/bart-large-cnn"}}"#).unwrap();
        assert_eq!(config.summarizer.provider, SummarizerProvider::HuggingFace);
        assert_eq!(config.summarizer.url, "https://api-inference.huggingface.co");
        assert_eq!(config.summarizer.model, "facebook/bart-large-cnn");
        assert_eq!(config.summarizer.api_key.as_deref(), Some("HF_API_TOKEN"));
        assert_eq!(config.summarizer.timeout_secs, 120);
    }

    #[test]
    fn test_explicit_summarizer_fields_win() {
        let config: SummarizerConfig = serde_json::from_str(
            r#"{"provider": "openai", "url": "http://proxy:8080/v1", "api_key": "sk-test"}"#,
        )
        .unwrap();
        assert_eq!(config.url, "http://proxy:8080/v1");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.test.json");

        let mut config = AppConfig::default();
        config.summarizer = SummarizerConfig::for_provider(SummarizerProvider::Ollama);
        config.save_to_file(&path).unwrap();

        let loaded: AppConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.summarizer.provider, SummarizerProvider::Ollama);
        assert_eq!(loaded.summarizer.url, "http://localhost:11434");
    }
}
