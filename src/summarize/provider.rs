//! Summarization providers for different model APIs
//!
//! Supports:
//! - Hugging Face Inference API (summarization pipeline, e.g. distilbart-cnn)
//! - Ollama (local models)
//! - OpenAI-compatible chat completions
//!
//! # Examples
//!
//! ```no_run
//! use leasebot::config::SummarizerConfig;
//! use leasebot::summarize::{create_summarizer, SummaryBounds};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let summarizer = create_summarizer(&SummarizerConfig::default())?;
//! let summary = summarizer
//!     .summarize("The tenant shall pay rent on the first of each month...", SummaryBounds::default())
//!     .await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{SummarizerConfig, SummarizerProvider as ProviderType};

/// Summarizer errors
#[derive(Error, Debug)]
pub enum SummarizationError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed summarizer response: {0}")]
    MalformedResponse(String),
}

/// Output length bounds for one chunk summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 130,
            min_length: 50,
        }
    }
}

/// External summarization capability: `chunk -> summary_text`
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize one chunk of agreement text
    async fn summarize(&self, chunk: &str, bounds: SummaryBounds)
        -> Result<String, SummarizationError>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the provider type
    fn provider_type(&self) -> ProviderType;
}

/// Create a summarizer from configuration
pub fn create_summarizer(
    config: &SummarizerConfig,
) -> Result<Arc<dyn Summarizer>, SummarizationError> {
    match config.provider {
        ProviderType::HuggingFace => Ok(Arc::new(HuggingFaceSummarizer::new(config.clone())?)),
        ProviderType::Ollama => Ok(Arc::new(OllamaSummarizer::new(config.clone()))),
        ProviderType::OpenAI => Ok(Arc::new(OpenAISummarizer::new(config.clone())?)),
    }
}

fn build_client(config: &SummarizerConfig) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Prompt used by chat-style providers that have no native summarization task
fn summary_prompt(chunk: &str, bounds: SummaryBounds) -> String {
    format!(
        "Summarize the following part of a rental agreement in {} to {} words. \
         Reply with the summary only.\n\n{}",
        bounds.min_length, bounds.max_length, chunk
    )
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SummarizationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(SummarizationError::AuthError(body));
    }
    Err(SummarizationError::Status {
        status: status.as_u16(),
        body,
    })
}

fn non_empty(text: String, provider: ProviderType) -> Result<String, SummarizationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SummarizationError::MalformedResponse(format!(
            "{} returned an empty summary",
            provider
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// Hugging Face Inference API
// ============================================================================

pub struct HuggingFaceSummarizer {
    config: SummarizerConfig,
    client: Client,
}

impl HuggingFaceSummarizer {
    /// Fails when `api_key` names an environment variable that is not set.
    /// Without `api_key` requests go out unauthenticated (self-hosted endpoints).
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizationError> {
        if let Some(key) = &config.api_key {
            if config.resolve_api_key().is_none() {
                return Err(SummarizationError::AuthError(format!(
                    "{} is not set; export it or run with --no-summary",
                    key
                )));
            }
        }

        let client = build_client(&config);
        Ok(Self { config, client })
    }
}

#[derive(Serialize)]
struct HfRequest<'a> {
    inputs: &'a str,
    parameters: HfParameters,
    options: HfOptions,
}

#[derive(Serialize)]
struct HfParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Serialize)]
struct HfOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct HfSummary {
    summary_text: String,
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(
        &self,
        chunk: &str,
        bounds: SummaryBounds,
    ) -> Result<String, SummarizationError> {
        let url = format!("{}/models/{}", self.config.url.trim_end_matches('/'), self.config.model);

        let request = HfRequest {
            inputs: chunk,
            parameters: HfParameters {
                max_length: bounds.max_length,
                min_length: bounds.min_length,
                do_sample: false,
            },
            options: HfOptions {
                wait_for_model: true,
            },
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = self.config.resolve_api_key() {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SummarizationError::ConnectionError(e.to_string()))?;
        let response = check_status(response).await?;

        let summaries: Vec<HfSummary> = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        let first = summaries.into_iter().next().ok_or_else(|| {
            SummarizationError::MalformedResponse("no summary in response".to_string())
        })?;

        non_empty(first.summary_text, ProviderType::HuggingFace)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::HuggingFace
    }
}

// ============================================================================
// Ollama
// ============================================================================

pub struct OllamaSummarizer {
    config: SummarizerConfig,
    client: Client,
}

impl OllamaSummarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: usize,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(
        &self,
        chunk: &str,
        bounds: SummaryBounds,
    ) -> Result<String, SummarizationError> {
        let url = format!("{}/api/generate", self.config.url.trim_end_matches('/'));

        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: summary_prompt(chunk, bounds),
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                // word bounds -> rough token budget
                num_predict: bounds.max_length * 2,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizationError::ConnectionError(e.to_string()))?;
        let response = check_status(response).await?;

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        non_empty(body.response, ProviderType::Ollama)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Ollama
    }
}

// ============================================================================
// OpenAI-compatible chat completions
// ============================================================================

pub struct OpenAISummarizer {
    config: SummarizerConfig,
    client: Client,
    api_key: String,
}

impl OpenAISummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizationError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            SummarizationError::AuthError("OpenAI API key not found".to_string())
        })?;
        let client = build_client(&config);

        Ok(Self {
            config,
            client,
            api_key,
        })
    }
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[async_trait]
impl Summarizer for OpenAISummarizer {
    async fn summarize(
        &self,
        chunk: &str,
        bounds: SummaryBounds,
    ) -> Result<String, SummarizationError> {
        let url = format!("{}/chat/completions", self.config.url.trim_end_matches('/'));

        let request = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": "You summarize legal documents for tenants."},
                {"role": "user", "content": summary_prompt(chunk, bounds)}
            ],
            "temperature": self.config.temperature,
            "max_tokens": bounds.max_length * 2,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizationError::ConnectionError(e.to_string()))?;
        let response = check_status(response).await?;

        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SummarizationError::MalformedResponse("no choices".to_string()))?;

        non_empty(content, ProviderType::OpenAI)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::OpenAI
    }
}
