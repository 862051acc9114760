//! Clause checklist producing human-readable risk flags

use serde::{Deserialize, Serialize};

use super::normalizer::matching_view;

/// One checklist entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCheck {
    MissingMaintenance,
    MissingTermination,
    MissingRenewal,
    RentIncreaseWithoutNotice,
    NonRefundableDeposit,
}

impl RiskCheck {
    /// Checklist order; evaluation and reporting follow it
    pub const CHECKLIST: [RiskCheck; 5] = [
        RiskCheck::MissingMaintenance,
        RiskCheck::MissingTermination,
        RiskCheck::MissingRenewal,
        RiskCheck::RentIncreaseWithoutNotice,
        RiskCheck::NonRefundableDeposit,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            RiskCheck::MissingMaintenance => "No maintenance clause found",
            RiskCheck::MissingTermination => "No termination clause found",
            RiskCheck::MissingRenewal => "No renewal clause found",
            RiskCheck::RentIncreaseWithoutNotice => "Rent can increase without notice",
            RiskCheck::NonRefundableDeposit => "Deposit is non-refundable",
        }
    }

    /// Whether this check fires on an already lower-cased text
    fn triggers(&self, lower: &str) -> bool {
        match self {
            RiskCheck::MissingMaintenance => !lower.contains("maintenance"),
            RiskCheck::MissingTermination => !lower.contains("termination"),
            RiskCheck::MissingRenewal => !lower.contains("renewal"),
            RiskCheck::RentIncreaseWithoutNotice => {
                lower.contains("rent increase") && !lower.contains("notice")
            }
            RiskCheck::NonRefundableDeposit => {
                lower.contains("deposit refund") && lower.contains("non-refundable")
            }
        }
    }
}

/// Flags raised for a document, in checklist order.
///
/// An empty list means "no risks detected"; "not yet analyzed" is modelled
/// by the session, never by an empty `Risks`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Risks(Vec<RiskCheck>);

impl Risks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, check: RiskCheck) -> bool {
        self.0.contains(&check)
    }

    pub fn checks(&self) -> &[RiskCheck] {
        &self.0
    }

    pub fn descriptions(&self) -> Vec<&'static str> {
        self.0.iter().map(RiskCheck::description).collect()
    }
}

/// Run the full checklist over normalized text (case-insensitive).
pub fn evaluate_risks(text: &str) -> Risks {
    let lower = matching_view(text);
    let flagged: Vec<RiskCheck> = RiskCheck::CHECKLIST
        .iter()
        .copied()
        .filter(|check| check.triggers(&lower))
        .collect();

    tracing::debug!("Risk checklist flagged {} of {}", flagged.len(), RiskCheck::CHECKLIST.len());
    Risks(flagged)
}
