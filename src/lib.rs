//! LeaseBot - rental agreement assistant
//!
//! Upload a rental agreement (PDF, scanned image or plain text) and LeaseBot
//! extracts its text, pulls out the key terms (rent, deposit, notice period),
//! flags missing clauses as risks, summarizes it with a pretrained model and
//! answers simple keyword questions in a chat loop.
//!
//! # Modules
//!
//! - [`ingest`] - PDF, OCR and plain-text extraction
//! - [`analysis`] - normalization, key terms and the risk checklist
//! - [`summarize`] - chunking and summarization providers
//! - [`agent`] - query router, session and background analysis
//! - [`config`] - JSON configuration with environment overrides
//!
//! # Example
//!
//! ```rust,no_run
//! use leasebot::analysis::{evaluate, normalize, TermField};
//!
//! let text = normalize("Rent: ₹15,000 per month.\nPage 1 of 2\nNotice period of two weeks.");
//! let (terms, risks) = evaluate(&text);
//! assert_eq!(terms.get(TermField::Rent), "₹15000 per month");
//! assert_eq!(terms.get(TermField::NoticePeriod), "2 week");
//! println!("{} risks", risks.len());
//! ```

pub mod agent;
pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod summarize;

pub use agent::{QueryRouter, Session};
pub use analysis::{Analysis, AnalysisPipeline, KeyTerms, Risks};
pub use config::AppConfig;
pub use ingest::DocumentIngestor;
