//! Query router - keyword dispatch from free-text questions to answers

use crate::agent::session::DocumentState;
use crate::analysis::{Analysis, TermField};

pub const UPLOAD_FIRST: &str = "Please upload a rental agreement first.";
pub const STILL_ANALYZING: &str = "Your document is still being analyzed. Please wait.";
pub const SUMMARY_DISABLED: &str = "Summarization is disabled for this session.";
pub const HELP: &str =
    "I can answer questions about Rent, Deposit, Notice Period, Risks, and provide a Summary.";

/// What a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Rent,
    Deposit,
    Notice,
    Risks,
    Summary,
    Help,
}

impl Route {
    /// Keyword that routes to this answer; shortcut actions send it as a query
    pub fn keyword(&self) -> &'static str {
        match self {
            Route::Rent => "rent",
            Route::Deposit => "deposit",
            Route::Notice => "notice",
            Route::Risks => "risk",
            Route::Summary => "summary",
            Route::Help => "help",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryRouter;

impl QueryRouter {
    pub fn new() -> Self {
        Self
    }

    /// First keyword match wins, in this order
    pub fn route(&self, query: &str) -> Route {
        let lower = query.to_lowercase();

        if self.matches_keywords(&lower, &["rent"]) {
            return Route::Rent;
        }

        if self.matches_keywords(&lower, &["deposit"]) {
            return Route::Deposit;
        }

        if self.matches_keywords(&lower, &["notice"]) {
            return Route::Notice;
        }

        if self.matches_keywords(&lower, &["risk"]) {
            return Route::Risks;
        }

        if self.matches_keywords(&lower, &["summary", "summarize"]) {
            return Route::Summary;
        }

        Route::Help
    }

    /// Answer `query` against the current document state.
    ///
    /// `analyzing` is true while an upload is in flight.
    pub fn respond(&self, query: &str, state: &DocumentState, analyzing: bool) -> String {
        let route = self.route(query);
        tracing::debug!("Routed {:?} to {:?}", query, route);

        if route == Route::Help {
            return HELP.to_string();
        }

        match state {
            DocumentState::Empty if analyzing => STILL_ANALYZING.to_string(),
            DocumentState::Empty => UPLOAD_FIRST.to_string(),
            DocumentState::Loaded(analysis) => answer(route, analysis),
        }
    }

    fn matches_keywords(&self, text: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|kw| text.contains(kw))
    }
}

fn answer(route: Route, analysis: &Analysis) -> String {
    match route {
        Route::Rent => term_line(analysis, TermField::Rent),
        Route::Deposit => term_line(analysis, TermField::Deposit),
        Route::Notice => term_line(analysis, TermField::NoticePeriod),
        Route::Risks => format_risks(analysis),
        Route::Summary => analysis
            .summary
            .clone()
            .unwrap_or_else(|| SUMMARY_DISABLED.to_string()),
        Route::Help => HELP.to_string(),
    }
}

fn term_line(analysis: &Analysis, field: TermField) -> String {
    format!("{}: {}", field.label(), analysis.key_terms.get(field))
}

/// Risk list as shown in chat
pub fn format_risks(analysis: &Analysis) -> String {
    if analysis.risks.is_empty() {
        return "✅ No major risks detected.".to_string();
    }

    let mut out = String::from("⚠ Risks Detected:");
    for description in analysis.risks.descriptions() {
        out.push_str("\n- ");
        out.push_str(description);
    }
    out
}
