//! Document ingestion - turning an uploaded file into raw text
//!
//! The file extension decides the backend: PDFs go through page-by-page text
//! extraction, raster images through OCR, and `.txt` files are read as-is.

mod ocr;
mod pdf;

pub use ocr::OcrExtractor;
pub use pdf::PdfExtractor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::OcrConfig;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Cannot open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("No text could be extracted from {0:?}")]
    EmptyDocument(PathBuf),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type IngestionResult<T> = Result<T, IngestionError>;

/// Source formats the ingestor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Image,
    PlainText,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "webp" => Some(Self::Image),
            "txt" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> IngestionResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| IngestionError::UnsupportedFormat("no extension".into()))?;

        Self::from_extension(ext).ok_or_else(|| IngestionError::UnsupportedFormat(ext.into()))
    }
}

/// Raw text pulled out of one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    pub path: PathBuf,
    pub format: DocumentFormat,
    pub text: String,
    pub page_count: Option<u32>,
}

impl RawDocument {
    #[must_use]
    pub fn new(path: PathBuf, format: DocumentFormat, text: String) -> Self {
        Self {
            path,
            format,
            text,
            page_count: None,
        }
    }

    #[must_use]
    pub fn with_page_count(mut self, count: u32) -> Self {
        self.page_count = Some(count);
        self
    }
}

/// A text extraction backend for one or more formats
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn supported_formats(&self) -> &[DocumentFormat];

    fn can_extract(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    async fn extract(&self, path: &Path) -> IngestionResult<RawDocument>;
}

/// Reads `.txt` agreements directly
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::PlainText]
    }

    async fn extract(&self, path: &Path) -> IngestionResult<RawDocument> {
        let data = tokio::fs::read(path).await.map_err(|source| IngestionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(data).map_err(|e| IngestionError::Encoding(e.to_string()))?;
        Ok(RawDocument::new(path.to_path_buf(), DocumentFormat::PlainText, text))
    }
}

/// Dispatches a file to the extractor registered for its format
pub struct DocumentIngestor {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl DocumentIngestor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// PDF, OCR and plain-text backends
    #[must_use]
    pub fn with_defaults(ocr: &OcrConfig) -> Self {
        Self::new()
            .with_extractor(Box::new(PdfExtractor))
            .with_extractor(Box::new(OcrExtractor::new(&ocr.command, &ocr.language)))
            .with_extractor(Box::new(PlainTextExtractor))
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    fn find_extractor(&self, format: DocumentFormat) -> Option<&dyn TextExtractor> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(format))
            .map(|e| e.as_ref())
    }

    /// Extract raw text from the file at `path`.
    pub async fn ingest(&self, path: &Path) -> IngestionResult<RawDocument> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|source| IngestionError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if !metadata.is_file() {
            return Err(IngestionError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            });
        }

        let format = DocumentFormat::from_path(path)?;
        let extractor = self
            .find_extractor(format)
            .ok_or_else(|| IngestionError::UnsupportedFormat(format!("{:?}", format)))?;

        tracing::info!("Ingesting {:?} as {:?}", path, format);
        let document = extractor.extract(path).await?;

        if document.text.trim().is_empty() {
            return Err(IngestionError::EmptyDocument(path.to_path_buf()));
        }

        tracing::debug!(
            "Extracted {} chars from {:?} ({:?} pages)",
            document.text.len(),
            path,
            document.page_count
        );
        Ok(document)
    }
}

impl Default for DocumentIngestor {
    fn default() -> Self {
        Self::with_defaults(&OcrConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("jpeg"), Some(DocumentFormat::Image));
        assert_eq!(DocumentFormat::from_extension("png"), Some(DocumentFormat::Image));
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_extension("docx"), None);
    }

    #[test]
    fn test_format_from_path_without_extension() {
        let err = DocumentFormat::from_path(Path::new("agreement")).unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let ingestor = DocumentIngestor::default();
        let err = ingestor
            .ingest(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::Io { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        writeln!(file, "Rent: 1,200").unwrap();

        let err = DocumentIngestor::default()
            .ingest(file.path())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[tokio::test]
    async fn test_plain_text_ingestion() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Rent: 1,200\nNotice period: 30 days").unwrap();

        let doc = DocumentIngestor::default().ingest(file.path()).await.unwrap();
        assert_eq!(doc.format, DocumentFormat::PlainText);
        assert!(doc.text.contains("Notice period"));
    }

    #[tokio::test]
    async fn test_blank_text_is_empty_document() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "   \n\n").unwrap();

        let err = DocumentIngestor::default()
            .ingest(file.path())
            .await
            .unwrap_err();
        assert!(matches!(err, IngestionError::EmptyDocument(_)));
    }
}
