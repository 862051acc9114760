//! Key-term extraction and risk checklist over whole documents

use leasebot::analysis::{evaluate, normalize, RiskCheck, TermField, NOT_FOUND};

const AGREEMENT: &str = "This agreement sets rent at ₹15,000 per month. \
    Security deposit is ₹30,000. Notice period is 1 month. \
    The landlord may evict without prior notice.";

#[test]
fn test_end_to_end_agreement() {
    let (terms, risks) = evaluate(&normalize(AGREEMENT));

    assert_eq!(terms.get(TermField::Rent), "₹15000 per month");
    assert_eq!(terms.get(TermField::Deposit), "₹30000");
    assert_eq!(terms.get(TermField::NoticePeriod), "1 month");

    assert!(risks.contains(RiskCheck::MissingMaintenance));
    assert!(risks.contains(RiskCheck::MissingTermination));
    assert!(risks.contains(RiskCheck::MissingRenewal));
    assert!(!risks.contains(RiskCheck::RentIncreaseWithoutNotice));
    assert!(!risks.contains(RiskCheck::NonRefundableDeposit));
}

#[test]
fn test_extraction_is_idempotent() {
    let text = normalize(AGREEMENT);
    assert_eq!(evaluate(&text), evaluate(&text));
}

#[test]
fn test_missing_maintenance_flagged_once_in_any_casing() {
    for text in [
        "Rent: 500. Termination and renewal apply.",
        "MAINTENANCE is not mentioned here? no: MAINT-ENANCE",
        "",
    ] {
        let (_, risks) = evaluate(&normalize(text));
        let count = risks
            .descriptions()
            .iter()
            .filter(|d| **d == "No maintenance clause found")
            .count();
        let expected = usize::from(!text.to_lowercase().contains("maintenance"));
        assert_eq!(count, expected, "text: {text:?}");
    }

    let (_, risks) = evaluate(&normalize("The Tenant bears MainTenance costs."));
    assert!(!risks.contains(RiskCheck::MissingMaintenance));
}

#[test]
fn test_rent_variants() {
    for (text, expected) in [
        ("Monthly rent ₹15,000 payable", "₹15000 per month"),
        ("The rent $1500 is due", "$1500 per month"),
        ("Rent: 1,200", "1200 per month"),
    ] {
        let (terms, _) = evaluate(&normalize(text));
        assert_eq!(terms.get(TermField::Rent), expected, "text: {text:?}");
    }
}

#[test]
fn test_notice_number_words() {
    let cases = [
        ("The notice period of two weeks applies.", "2 week"),
        ("A notice period of seven months.", "7 month"),
        ("Notice period: 30 days", "30 day"),
    ];
    for (text, expected) in cases {
        let (terms, _) = evaluate(&normalize(text));
        assert_eq!(terms.get(TermField::NoticePeriod), expected);
    }

    let (terms, _) = evaluate(&normalize("Notice period of a few months."));
    assert_ne!(terms.get(TermField::NoticePeriod), NOT_FOUND);
    assert!(terms.get(TermField::NoticePeriod).ends_with("month"));
}

#[test]
fn test_fields_are_independent() {
    let (terms, _) = evaluate(&normalize("Security Deposit: €2,000 and nothing else."));
    assert_eq!(terms.get(TermField::Rent), NOT_FOUND);
    assert_eq!(terms.get(TermField::Deposit), "€2000");
    assert_eq!(terms.get(TermField::NoticePeriod), NOT_FOUND);
}

#[test]
fn test_pagination_markers_do_not_leak() {
    let raw = "Rent:\n\n  ₹9,000\tper month\nPage 1 of 3\nTermination on breach.\nPAGE 2 OF 3";
    let text = normalize(raw);
    assert!(!text.to_lowercase().contains("page"));

    let (terms, risks) = evaluate(&text);
    assert_eq!(terms.get(TermField::Rent), "₹9000 per month");
    assert!(!risks.contains(RiskCheck::MissingTermination));
}

#[test]
fn test_rent_increase_and_deposit_refund_risks() {
    let text = normalize(
        "Rent increase of 5% yearly. Deposit refund terms: the deposit is non-refundable.",
    );
    let (_, risks) = evaluate(&text);
    assert_eq!(
        risks.descriptions(),
        vec![
            "No maintenance clause found",
            "No termination clause found",
            "No renewal clause found",
            "Rent can increase without notice",
            "Deposit is non-refundable",
        ]
    );
}
