//! Chat session - the current document and the single in-flight upload
//!
//! The session is owned by the interaction loop. Background tasks never touch
//! it directly; their results arrive as [`AnalysisEvent`]s and are applied
//! with [`Session::apply_event`].

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::agent::events::AnalysisEvent;
use crate::agent::router::QueryRouter;
use crate::agent::worker::{spawn_analysis, AnalysisTask};
use crate::analysis::{Analysis, AnalysisPipeline};

const EVENT_BUFFER: usize = 64;

/// What the session currently knows about
#[derive(Debug, Clone, Default)]
pub enum DocumentState {
    /// No document has been analyzed successfully yet
    #[default]
    Empty,
    Loaded(Box<Analysis>),
}

impl DocumentState {
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            DocumentState::Empty => None,
            DocumentState::Loaded(analysis) => Some(analysis),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DocumentState::Loaded(_))
    }
}

/// A new upload was refused because another one is still running
#[derive(Debug, Error)]
#[error("Still analyzing {}. Wait for it to finish before uploading another document.", .in_flight.display())]
pub struct UploadRejected {
    pub in_flight: PathBuf,
}

pub struct Session {
    pipeline: Arc<AnalysisPipeline>,
    router: QueryRouter,
    state: DocumentState,
    in_flight: Option<AnalysisTask>,
    events_tx: mpsc::Sender<AnalysisEvent>,
}

impl Session {
    /// Create a session and the receiver its background tasks report to.
    pub fn new(pipeline: Arc<AnalysisPipeline>) -> (Self, mpsc::Receiver<AnalysisEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let session = Self {
            pipeline,
            router: QueryRouter::new(),
            state: DocumentState::Empty,
            in_flight: None,
            events_tx,
        };
        (session, events_rx)
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&AnalysisTask> {
        self.in_flight.as_ref()
    }

    pub fn summarization_enabled(&self) -> bool {
        self.pipeline.summarization_enabled()
    }

    /// Start analyzing `path` in the background.
    pub fn request_upload(&mut self, path: impl Into<PathBuf>) -> Result<Uuid, UploadRejected> {
        if let Some(task) = &self.in_flight {
            return Err(UploadRejected {
                in_flight: task.path.clone(),
            });
        }

        let task = AnalysisTask::new(path.into());
        let id = task.id;
        tracing::info!("Starting analysis {} of {:?}", id, task.path);

        spawn_analysis(self.pipeline.clone(), task.clone(), self.events_tx.clone());
        self.in_flight = Some(task);
        Ok(id)
    }

    /// Apply an event from a background task; returns the text to show, if any.
    pub fn apply_event(&mut self, event: AnalysisEvent) -> Option<String> {
        let current = self.in_flight.as_ref().map(|task| task.id);
        if current != Some(event.task_id()) {
            tracing::warn!("Ignoring event from unknown task {}", event.task_id());
            return None;
        }

        match event {
            AnalysisEvent::Status { message, .. } => Some(message),
            AnalysisEvent::Completed { result, .. } => {
                let task = self.in_flight.take()?;
                match result {
                    Ok(analysis) => {
                        self.state = DocumentState::Loaded(analysis);
                        Some(format!(
                            "{} uploaded and analyzed successfully. You can now ask questions like:\n\
                             - show rent\n- show deposit\n- show risks\n- summarize agreement",
                            task.path.display()
                        ))
                    }
                    Err(e) => Some(format!("Could not analyze {}: {}", task.path.display(), e)),
                }
            }
        }
    }

    /// Answer a free-text question about the current document.
    pub fn answer(&self, query: &str) -> String {
        self.router.respond(query, &self.state, self.is_analyzing())
    }
}
