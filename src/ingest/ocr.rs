//! OCR for scanned agreements via the tesseract command line

use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::{DocumentFormat, IngestionError, IngestionResult, RawDocument, TextExtractor};

pub struct OcrExtractor {
    command: String,
    language: String,
}

impl OcrExtractor {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for OcrExtractor {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Image]
    }

    async fn extract(&self, path: &Path) -> IngestionResult<RawDocument> {
        tracing::debug!("Running {} on {:?}", self.command, path);

        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .args(["-l", self.language.as_str()])
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    IngestionError::OcrUnavailable(format!("'{}' not found in PATH", self.command))
                }
                _ => IngestionError::OcrFailed(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngestionError::OcrFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok(RawDocument::new(path.to_path_buf(), DocumentFormat::Image, text))
    }
}
