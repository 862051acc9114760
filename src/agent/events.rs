//! Events sent from background analysis tasks to the interaction loop.

use uuid::Uuid;

use crate::analysis::{Analysis, AnalysisError};

#[derive(Debug)]
pub enum AnalysisEvent {
    /// A short progress message for the user.
    Status { task_id: Uuid, message: String },

    /// The task finished. Sent exactly once per task.
    Completed {
        task_id: Uuid,
        result: Result<Box<Analysis>, AnalysisError>,
    },
}

impl AnalysisEvent {
    pub fn task_id(&self) -> Uuid {
        match self {
            AnalysisEvent::Status { task_id, .. } | AnalysisEvent::Completed { task_id, .. } => {
                *task_id
            }
        }
    }
}
