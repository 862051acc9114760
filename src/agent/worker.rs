//! Background analysis task

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::agent::events::AnalysisEvent;
use crate::analysis::{AnalysisError, AnalysisPipeline};

/// An upload being analyzed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTask {
    pub id: Uuid,
    pub path: PathBuf,
}

impl AnalysisTask {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
        }
    }
}

/// Run the pipeline for `task` on the tokio runtime.
///
/// Status messages are best-effort. Exactly one `Completed` event is sent
/// (unless the receiver is gone), including when the analysis panics.
pub fn spawn_analysis(
    pipeline: Arc<AnalysisPipeline>,
    task: AnalysisTask,
    tx: mpsc::Sender<AnalysisEvent>,
) -> JoinHandle<()> {
    let task_id = task.id;
    let analysis = tokio::spawn(run_analysis(pipeline, task, tx.clone()));

    tokio::spawn(async move {
        if let Err(e) = analysis.await {
            tracing::error!("Analysis {} did not finish: {}", task_id, e);
            let event = AnalysisEvent::Completed {
                task_id,
                result: Err(AnalysisError::Aborted(e.to_string())),
            };
            if tx.send(event).await.is_err() {
                tracing::warn!("Session closed before analysis {} completed", task_id);
            }
        }
    })
}

async fn run_analysis(
    pipeline: Arc<AnalysisPipeline>,
    task: AnalysisTask,
    tx: mpsc::Sender<AnalysisEvent>,
) {
    let task_id = task.id;
    let status_tx = tx.clone();

    let result = pipeline
        .analyze_file(&task.path, move |message| {
            // A full channel only drops a progress line
            let _ = status_tx.try_send(AnalysisEvent::Status { task_id, message });
        })
        .await;

    match &result {
        Ok(_) => tracing::info!("Analysis {} of {:?} finished", task_id, task.path),
        Err(e) => tracing::warn!("Analysis {} of {:?} failed: {}", task_id, task.path, e),
    }

    let event = AnalysisEvent::Completed {
        task_id,
        result: result.map(Box::new),
    };
    if tx.send(event).await.is_err() {
        tracing::warn!("Session closed before analysis {} completed", task_id);
    }
}
