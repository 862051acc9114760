//! Analysis of one uploaded agreement
//!
//! Ingestion produces raw text; everything else here is derived from the
//! normalized text: key terms, risk flags and (optionally) a summary.

pub mod normalizer;
pub mod numbers;
pub mod risks;
pub mod terms;

pub use normalizer::{matching_view, normalize};
pub use risks::{evaluate_risks, RiskCheck, Risks};
pub use terms::{extract_key_terms, KeyTerms, TermField, NOT_FOUND};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::ingest::{DocumentFormat, DocumentIngestor, IngestionError};
use crate::summarize::{self, SummarizationError, Summarizer, SummaryBounds};

/// Failures that abort an analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error("Summarization failed: {0}")]
    Summarization(#[from] SummarizationError),

    #[error("Analysis task aborted: {0}")]
    Aborted(String),
}

/// Everything derived from one document
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub source: PathBuf,
    pub format: DocumentFormat,
    pub page_count: Option<u32>,
    /// Normalized document text
    #[serde(skip)]
    pub text: String,
    pub key_terms: KeyTerms,
    pub risks: Risks,
    /// `None` when summarization is disabled
    pub summary: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl Analysis {
    /// Display-oriented JSON report: labelled key terms, risk descriptions
    pub fn report_json(&self) -> serde_json::Value {
        let key_terms: serde_json::Map<String, serde_json::Value> = self
            .key_terms
            .entries()
            .into_iter()
            .map(|(label, value)| (label.to_string(), json!(value)))
            .collect();

        json!({
            "source": self.source,
            "format": self.format,
            "page_count": self.page_count,
            "key_terms": key_terms,
            "risks": self.risks.descriptions(),
            "summary": self.summary,
            "analyzed_at": self.analyzed_at.to_rfc3339(),
        })
    }
}

/// Key terms and risks for already-normalized text. Pure and deterministic.
pub fn evaluate(normalized: &str) -> (KeyTerms, Risks) {
    (extract_key_terms(normalized), evaluate_risks(normalized))
}

/// Ingestion, extraction and summarization wired together
pub struct AnalysisPipeline {
    ingestor: DocumentIngestor,
    summarizer: Option<Arc<dyn Summarizer>>,
    chunk_words: usize,
    bounds: SummaryBounds,
}

impl AnalysisPipeline {
    pub fn new(ingestor: DocumentIngestor, summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        Self {
            ingestor,
            summarizer,
            chunk_words: 400,
            bounds: SummaryBounds::default(),
        }
    }

    /// Build from configuration. The summarizer is only created when
    /// summarization is enabled.
    pub fn from_config(config: &AppConfig) -> Result<Self, SummarizationError> {
        let summarizer = if config.summarize {
            Some(summarize::create_summarizer(&config.summarizer)?)
        } else {
            None
        };

        Ok(Self::new(DocumentIngestor::with_defaults(&config.ocr), summarizer)
            .with_chunk_words(config.chunk_words)
            .with_bounds(config.summary_bounds()))
    }

    #[must_use]
    pub fn with_chunk_words(mut self, chunk_words: usize) -> Self {
        self.chunk_words = chunk_words;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: SummaryBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn summarization_enabled(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Ingest `path` and analyze its text.
    ///
    /// `progress` receives short human-readable status lines.
    pub async fn analyze_file<F>(&self, path: &Path, mut progress: F) -> Result<Analysis, AnalysisError>
    where
        F: FnMut(String) + Send,
    {
        progress(format!("Extracting text from {}", path.display()));
        let raw = self.ingestor.ingest(path).await?;

        let mut analysis = self.analyze_text(&raw.text, &mut progress).await?;
        analysis.source = raw.path;
        analysis.format = raw.format;
        analysis.page_count = raw.page_count;
        Ok(analysis)
    }

    /// Analyze text that is already in memory.
    pub async fn analyze_text<F>(&self, raw_text: &str, mut progress: F) -> Result<Analysis, AnalysisError>
    where
        F: FnMut(String) + Send,
    {
        let text = normalize(raw_text);
        let (key_terms, risks) = evaluate(&text);
        tracing::info!(
            "Extracted {}/3 key terms, {} risk flags",
            key_terms.found_count(),
            risks.len()
        );

        let summary = match &self.summarizer {
            Some(summarizer) => {
                let summary = summarize::summarize_document(
                    summarizer.as_ref(),
                    &text,
                    self.chunk_words,
                    self.bounds,
                    |index, total| progress(format!("Summarizing part {index} of {total}")),
                )
                .await?;
                Some(summary)
            }
            None => None,
        };

        Ok(Analysis {
            source: PathBuf::new(),
            format: DocumentFormat::PlainText,
            page_count: None,
            text,
            key_terms,
            risks,
            summary,
            analyzed_at: Utc::now(),
        })
    }
}
