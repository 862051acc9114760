//! Chunked summarization of agreement text
//!
//! The normalized text is split into fixed-size word chunks, each chunk is
//! summarized independently by the configured [`Summarizer`], and the
//! partial summaries are joined in chunk order with single spaces.

mod chunker;
mod provider;

pub use chunker::chunk_words;
pub use provider::{
    create_summarizer, HuggingFaceSummarizer, OllamaSummarizer, OpenAISummarizer,
    SummarizationError, Summarizer, SummaryBounds,
};

/// Summarize `text` chunk by chunk.
///
/// `on_chunk` is called before each request with `(index, total)` so callers
/// can report progress. The first failing chunk aborts the whole summary.
pub async fn summarize_document<F>(
    summarizer: &dyn Summarizer,
    text: &str,
    chunk_size: usize,
    bounds: SummaryBounds,
    mut on_chunk: F,
) -> Result<String, SummarizationError>
where
    F: FnMut(usize, usize) + Send,
{
    let chunks = chunk_words(text, chunk_size);
    let total = chunks.len();
    let mut parts = Vec::with_capacity(total);

    for (index, chunk) in chunks.iter().enumerate() {
        on_chunk(index + 1, total);
        tracing::debug!(
            "Summarizing chunk {}/{} ({} words) with {}",
            index + 1,
            total,
            chunk.split(' ').count(),
            summarizer.model_name()
        );

        let part = summarizer.summarize(chunk, bounds).await?;
        parts.push(part);
    }

    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SummarizerProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the chunk's first word, fails on the chunk number given
    struct FirstWordSummarizer {
        calls: AtomicUsize,
        fail_on: Option<usize>,
    }

    impl FirstWordSummarizer {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl Summarizer for FirstWordSummarizer {
        async fn summarize(
            &self,
            chunk: &str,
            _bounds: SummaryBounds,
        ) -> Result<String, SummarizationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(call) {
                return Err(SummarizationError::ConnectionError("down".to_string()));
            }
            Ok(chunk.split(' ').next().unwrap_or_default().to_string())
        }

        fn model_name(&self) -> &str {
            "first-word"
        }

        fn provider_type(&self) -> SummarizerProvider {
            SummarizerProvider::Ollama
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[tokio::test]
    async fn test_summaries_joined_in_chunk_order() {
        let summarizer = FirstWordSummarizer::new(None);
        let mut progress = Vec::new();

        let summary = summarize_document(
            &summarizer,
            &words(900),
            400,
            SummaryBounds::default(),
            |i, total| progress.push((i, total)),
        )
        .await
        .unwrap();

        assert_eq!(summary, "w0 w400 w800");
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_failing_chunk_aborts() {
        let summarizer = FirstWordSummarizer::new(Some(2));
        let result =
            summarize_document(&summarizer, &words(900), 400, SummaryBounds::default(), |_, _| {})
                .await;

        assert!(result.is_err());
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_text_gives_empty_summary() {
        let summarizer = FirstWordSummarizer::new(None);
        let summary =
            summarize_document(&summarizer, "", 400, SummaryBounds::default(), |_, _| {})
                .await
                .unwrap();
        assert!(summary.is_empty());
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }
}
