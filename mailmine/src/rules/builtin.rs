//! The curated built-in rule table.
//!
//! Within a category, rules run from most to least specific. Generic numeric
//! rules (bare ten-digit numbers and the like) are kept at low confidence so
//! that a context keyword is needed to lift them into the high-confidence set.

use super::library::RuleDefinitions;
use super::types::{EntityCategory, RuleDefinition};

type Row = (
    EntityCategory,
    &'static str,
    &'static str,
    f32,
    &'static [&'static str],
    &'static [&'static str],
);

const QUOTE_KEYWORDS: &[&str] = &["quote", "quotation", "pricing", "proposal"];
const PO_KEYWORDS: &[&str] = &["po", "purchase", "purchase order", "order"];
const SPA_KEYWORDS: &[&str] = &["spa", "agreement", "special pricing"];
const TICKET_KEYWORDS: &[&str] = &["ticket", "case", "support", "incident"];
const SALES_ORDER_KEYWORDS: &[&str] = &["sales order", "so", "shipment", "order"];
const BID_KEYWORDS: &[&str] = &["bid", "tender", "rfp", "rfq"];
const DEAL_KEYWORDS: &[&str] = &["deal", "registration", "opportunity"];

#[rustfmt::skip]
const BUILTIN: &[Row] = &[
    // (category, label, regex, base confidence, keywords, examples)
    (EntityCategory::Quote, "WQ", r"\bWQ-?\d{6,10}\b", 0.9, QUOTE_KEYWORDS, &["WQ-1234567", "WQ98765432"]),
    (EntityCategory::Quote, "QUO", r"\bQUO-?\d{4,10}\b", 0.85, QUOTE_KEYWORDS, &["QUO-2024118"]),
    (EntityCategory::Quote, "Q", r"\bQ-\d{5,10}\b", 0.8, QUOTE_KEYWORDS, &["Q-123456"]),
    (EntityCategory::Quote, "QT", r"\bQT\d{6,10}\b", 0.75, QUOTE_KEYWORDS, &["QT00123456"]),

    (EntityCategory::PurchaseOrder, "PO", r"\bPO[\s#:-]*\d{6,12}\b", 0.9, PO_KEYWORDS, &["PO 0505915850", "PO#4500123456"]),
    (EntityCategory::PurchaseOrder, "0505", r"\b0505\d{6}\b", 0.9, PO_KEYWORDS, &["0505915850"]),
    (EntityCategory::PurchaseOrder, "PO-release", r"\bPO[\s#:-]*\d{6,10}-\d{1,3}\b", 0.85, PO_KEYWORDS, &["PO 4500123-01"]),
    (EntityCategory::PurchaseOrder, "PUR", r"\bPUR-\d{5,10}\b", 0.85, PO_KEYWORDS, &["PUR-123456"]),
    (EntityCategory::PurchaseOrder, "05", r"\b05\d{8}\b", 0.8, PO_KEYWORDS, &["0512345678"]),
    (EntityCategory::PurchaseOrder, "45", r"\b45\d{8}\b", 0.8, PO_KEYWORDS, &["4500123456"]),
    (EntityCategory::PurchaseOrder, "P", r"\bP\d{6,9}\b", 0.75, PO_KEYWORDS, &["P1234567"]),
    (EntityCategory::PurchaseOrder, "00", r"\b00\d{8}\b", 0.7, PO_KEYWORDS, &["0012345678"]),
    (EntityCategory::PurchaseOrder, "7-2", r"\b\d{7}-\d{2}\b", 0.6, PO_KEYWORDS, &["1234567-01"]),
    (EntityCategory::PurchaseOrder, "10-digit", r"\b[1-9]\d{9}\b", 0.55, PO_KEYWORDS, &["7712345678"]),

    (EntityCategory::Spa, "CAS", r"\bCAS-\d{5,7}-[A-Z0-9]{6}\b", 0.95, SPA_KEYWORDS, &["CAS-107073-B4P8K8"]),
    (EntityCategory::Spa, "SPA", r"\bSPA[-#:\s]?\d{5,10}\b", 0.85, SPA_KEYWORDS, &["SPA-2024001", "SPA 1234567"]),
    (EntityCategory::Spa, "SPA-code", r"\bSPA-[A-Z0-9]{4,}-[A-Z0-9]{2,}\b", 0.8, SPA_KEYWORDS, &["SPA-ACME-01"]),

    (EntityCategory::Ticket, "TS", r"\bTS-\d{6,8}\b", 0.9, TICKET_KEYWORDS, &["TS-1818562"]),
    (EntityCategory::Ticket, "INC", r"\bINC\d{6,10}\b", 0.85, TICKET_KEYWORDS, &["INC0012345"]),
    (EntityCategory::Ticket, "CS", r"\bCS\d{7,9}\b", 0.8, TICKET_KEYWORDS, &["CS12345678"]),
    (EntityCategory::Ticket, "Case", r"(?i)\bcase\s*#?\s*\d{5,10}\b", 0.7, TICKET_KEYWORDS, &["Case #00123456"]),

    (EntityCategory::SalesOrder, "SO", r"\bSO[\s#:-]*\d{6,10}\b", 0.85, SALES_ORDER_KEYWORDS, &["SO 1234567"]),
    (EntityCategory::SalesOrder, "SO-region", r"\bSO-[A-Z]{2}\d{5,8}\b", 0.8, SALES_ORDER_KEYWORDS, &["SO-US123456"]),

    (EntityCategory::Bid, "BID", r"\bBID[-#:\s]?\d{4,10}\b", 0.85, BID_KEYWORDS, &["BID-20241"]),
    (EntityCategory::Bid, "BD", r"\bBD-\d{6,8}\b", 0.75, BID_KEYWORDS, &["BD-123456"]),

    (EntityCategory::Deal, "DR", r"\bDR-?\d{6,10}\b", 0.85, DEAL_KEYWORDS, &["DR-1234567"]),
    (EntityCategory::Deal, "DEAL", r"\bDEAL[-#:\s]?\d{4,10}\b", 0.85, DEAL_KEYWORDS, &["DEAL-88421"]),
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in rule definitions, keyed by category in curated order.
pub fn builtin_definitions() -> RuleDefinitions {
    let mut definitions = RuleDefinitions::new();
    for (category, label, regex, confidence, keywords, examples) in BUILTIN {
        definitions
            .entry(*category)
            .or_default()
            .push(RuleDefinition {
                regex: regex.to_string(),
                label: label.to_string(),
                base_confidence: *confidence,
                context_keywords: owned(keywords),
                examples: owned(examples),
            });
    }
    definitions
}
