//! Chat agent - query routing, session state and background analysis
//!
//! # Components
//!
//! - [`router::QueryRouter`] - keyword dispatch from questions to answers
//! - [`session::Session`] - current document plus the single in-flight upload
//! - [`worker`] - runs the analysis pipeline on the tokio runtime
//! - [`commands`] - slash commands for the chat loop

pub mod commands;
pub mod events;
pub mod router;
pub mod session;
pub mod worker;

pub use commands::Command;
pub use events::AnalysisEvent;
pub use router::{QueryRouter, Route};
pub use session::{DocumentState, Session, UploadRejected};
pub use worker::{spawn_analysis, AnalysisTask};
