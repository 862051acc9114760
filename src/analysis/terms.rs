//! Key term extraction (rent, deposit, notice period)
//!
//! Each field has an ordered list of patterns; the first one that matches
//! wins. Fields are independent: a miss on one never affects the others and
//! surfaces as [`NOT_FOUND`].

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use super::numbers::word_to_number;

/// Sentinel shown for a field whose patterns did not match
pub const NOT_FOUND: &str = "Not found";

/// Amount after a keyword: at most three linking words ("is", "at", "of",
/// "amount", ...) and short punctuation runs, an optional currency symbol,
/// then digits with optional thousands separators and decimal part. Any
/// other word between keyword and number breaks the match.
const AMOUNT_TAIL: &str = concat!(
    r"(?:[^\w₹$€£]{1,5}(?:is|at|of|amount|amounting|to|be|shall|will|equal|sum)\b){0,3}",
    r"[^\w₹$€£]{0,5}([₹$€£])?\s*(\d[\d,]*\d|\d)(\.\d+)?"
);

static RENT_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(&[&format!(r"(?i)\brent\b{AMOUNT_TAIL}")]));

static DEPOSIT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        &format!(r"(?i)\bsecurity\s+deposit\b{AMOUNT_TAIL}"),
        &format!(r"(?i)\bdeposit\b{AMOUNT_TAIL}"),
    ])
});

/// "notice period", up to four filler words, then count + unit. A word
/// count must end on a word boundary so "Monday" never splits into "Mon day".
static NOTICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"(?i)\bnotice\s+period\b(?:\W+[a-z]+){0,4}?\W+(\d+|[a-z]+\b)[\s-]*(day|week|month)s?\b"])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Invalid term pattern {}: {}", p, e);
                None
            }
        })
        .collect()
}

/// The three extracted fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermField {
    Rent,
    Deposit,
    NoticePeriod,
}

impl TermField {
    pub const ALL: [TermField; 3] = [TermField::Rent, TermField::Deposit, TermField::NoticePeriod];

    pub fn label(&self) -> &'static str {
        match self {
            TermField::Rent => "Rent",
            TermField::Deposit => "Deposit",
            TermField::NoticePeriod => "Notice Period",
        }
    }
}

impl fmt::Display for TermField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key terms of one document. `None` means the field's patterns missed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerms {
    pub rent: Option<String>,
    pub deposit: Option<String>,
    pub notice_period: Option<String>,
}

impl KeyTerms {
    /// Display value for a field, `"Not found"` on a miss
    pub fn get(&self, field: TermField) -> &str {
        let value = match field {
            TermField::Rent => &self.rent,
            TermField::Deposit => &self.deposit,
            TermField::NoticePeriod => &self.notice_period,
        };
        value.as_deref().unwrap_or(NOT_FOUND)
    }

    /// Ordered `(label, value)` pairs for display and reports
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        TermField::ALL
            .iter()
            .map(|field| (field.label(), self.get(*field)))
            .collect()
    }

    pub fn found_count(&self) -> usize {
        [&self.rent, &self.deposit, &self.notice_period]
            .iter()
            .filter(|v| v.is_some())
            .count()
    }
}

/// Extract all key terms from normalized document text.
pub fn extract_key_terms(text: &str) -> KeyTerms {
    let terms = KeyTerms {
        rent: first_match(&RENT_PATTERNS, text, |caps| {
            format_amount(caps).map(|amount| format!("{amount} per month"))
        }),
        deposit: first_match(&DEPOSIT_PATTERNS, text, format_amount),
        notice_period: first_match(&NOTICE_PATTERNS, text, format_notice),
    };

    for field in TermField::ALL {
        if terms.get(field) == NOT_FOUND {
            tracing::debug!("No match for {}", field);
        }
    }

    terms
}

fn first_match<F>(patterns: &[Regex], text: &str, format: F) -> Option<String>
where
    F: Fn(&Captures<'_>) -> Option<String>,
{
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|caps| format(&caps)))
}

/// `<currency><amount>` with thousands separators stripped
fn format_amount(caps: &Captures<'_>) -> Option<String> {
    let currency = caps.get(1).map_or("", |m| m.as_str());
    let digits = caps.get(2)?.as_str().replace(',', "");
    let decimals = caps.get(3).map_or("", |m| m.as_str());
    Some(format!("{currency}{digits}{decimals}"))
}

/// `<count> <unit>`; number words are converted, unknown words echoed as-is
fn format_notice(caps: &Captures<'_>) -> Option<String> {
    let count = caps.get(1)?.as_str();
    let unit = caps.get(2)?.as_str().to_lowercase();

    let count = if count.chars().all(|c| c.is_ascii_digit()) {
        count.to_string()
    } else {
        match word_to_number(count) {
            Some(n) => n.to_string(),
            None => count.to_string(),
        }
    };

    Some(format!("{count} {unit}"))
}
