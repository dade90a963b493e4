//! Integration tests for per-message extraction

use mailmine::prelude::*;
use std::sync::Arc;

const SCENARIO: &str = "Customer PO 0505915850 received for CAS-107073-B4P8K8 (SPA agreement). Ticket TS-1818562 opened.";

const HTML_MAIL: &str = r##"<html><body>
<p class=MsoNormal style="margin-top:0in;margin-bottom:.0001pt;mso-line-height-rule:exactly">
<span style="font-size:11.0pt;color:#1F497D">Hi team,</span></p>
<p style="margin-top:12px">Please find attached quote WQ-1234567 for the renewal.</p>
<a href="mailto:buyer@example.com" style="color:#0563C1">buyer@example.com</a>
<table><tr><td style="background-color:#C0C0C0;border-color:#A1B2C3;scrollbar-gutter: auto" bgcolor="#D9E2F3">Total</td></tr></table>
</body></html>"##;

#[test]
fn test_scenario_returns_po_spa_and_ticket() {
    let rules = RuleLibrary::builtin();
    let result = mailmine::extract(SCENARIO, &rules, None);

    assert!(result.high_confidence.len() >= 3);
    assert!(
        result
            .high_confidence
            .iter()
            .any(|c| c.category == Some(EntityCategory::PurchaseOrder) && c.value.contains("0505915850"))
    );
    assert!(
        result
            .high_confidence
            .iter()
            .any(|c| c.value == "CAS-107073-B4P8K8" && c.confidence >= 0.95)
    );
    assert!(
        result
            .high_confidence
            .iter()
            .any(|c| c.value == "TS-1818562" && c.confidence >= 0.9)
    );
}

#[test]
fn test_matches_are_sorted_and_grouped() {
    let result = mailmine::extract(SCENARIO, &RuleLibrary::builtin(), None);

    assert!(result.matches.windows(2).all(|w| w[0].position <= w[1].position));

    let grouped: usize = result.by_structure.values().map(Vec::len).sum();
    assert_eq!(grouped, result.matches.len());
    for (structure, members) in &result.by_structure {
        assert!(members.iter().all(|c| &c.structure == structure));
    }

    assert!(result.high_confidence.iter().all(|c| c.confidence >= 0.8));
    assert!(result.matches.iter().all(|c| (0.0..=1.0).contains(&c.confidence)));
}

#[test]
fn test_same_value_and_position_is_reported_once() {
    let result = mailmine::extract(SCENARIO, &RuleLibrary::builtin(), None);

    let mut keys: Vec<_> = result.matches.iter().map(|c| (c.position, c.value.clone())).collect();
    let before = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), before);

    // The bare PO number is claimed by several rules and templates
    let po = result
        .matches
        .iter()
        .find(|c| c.value == "0505915850")
        .expect("bare purchase order number");
    assert!(!po.alternates.is_empty());
}

fn byte_span(text: &str, candidate: &CandidateMatch) -> (usize, usize) {
    let offset = |chars: usize| text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i);
    (offset(candidate.position), offset(candidate.end))
}

#[test]
fn test_html_noise_never_reaches_the_output() {
    let classifier = NoiseClassifier::default();
    assert!(classifier.is_noise("margin-top"));
    assert_eq!(structure_of("margin-top"), "@-@");

    let result = mailmine::extract(HTML_MAIL, &RuleLibrary::builtin(), None);
    for candidate in &result.matches {
        let (start, end) = byte_span(HTML_MAIL, candidate);
        assert_eq!(&HTML_MAIL[start..end], candidate.value);
        assert!(
            !classifier.is_noise_at(HTML_MAIL, start, end, 1),
            "noise leaked into output: {}",
            candidate.value
        );
    }

    let values: Vec<&str> = result.matches.iter().map(|c| c.value.as_str()).collect();
    for noise in [
        "margin-top",
        "#1F497D",
        "C0C0C0",
        "A1B2C3",
        "D9E2F3",
        "border-color",
        "scrollbar-gutter",
    ] {
        assert!(!values.contains(&noise), "{} leaked into output", noise);
    }
    assert!(values.contains(&"WQ-1234567"));
}

#[test]
fn test_extraction_is_deterministic() {
    let mut record = DiscoveryRecord::new();
    record.record_match("upper_dash_number", "TS-1000000");
    record.record_hint("TS-1000000", "ticket");

    let extractor = UniversalExtractor::builder()
        .rules(RuleLibrary::builtin())
        .discovery(&record)
        .build();

    let first = extractor.extract(SCENARIO).to_json().unwrap();
    let second = extractor.extract(SCENARIO).to_json().unwrap();
    assert_eq!(first, second);

    let fresh = UniversalExtractor::builder()
        .rules(RuleLibrary::builtin())
        .discovery(&record)
        .build();
    assert_eq!(fresh.extract(SCENARIO).to_json().unwrap(), first);
}

#[test]
fn test_json_output_shape() {
    let result = mailmine::extract(SCENARIO, &RuleLibrary::builtin(), None);
    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    let first = &value["matches"][0];
    for field in ["value", "structure", "position", "confidence"] {
        assert!(!first[field].is_null(), "missing {}", field);
    }
    assert!(value["by_structure"].is_object());
    assert!(value["high_confidence"].is_array());
}

#[test]
fn test_broken_rule_does_not_affect_other_rules() {
    let rules = RuleLibrary::from_json_str(
        r#"{
            "ticket": [
                {"regex": "(?P<unterminated", "label": "broken", "base_confidence": 0.9},
                {"regex": "\\bTS-\\d{6,8}\\b", "label": "TS", "base_confidence": 0.9, "context_keywords": ["ticket"]}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(rules.rejected().len(), 1);

    let result = mailmine::extract("Ticket TS-1818562 opened.", &rules, None);
    assert!(result.high_confidence.iter().any(|c| c.value == "TS-1818562"));
}

#[test]
fn test_empty_input_returns_empty_result() {
    let rules = RuleLibrary::builtin();
    for text in ["", " ", "\n\t", "a", "#"] {
        let result = mailmine::extract(text, &rules, None);
        assert!(result.is_empty(), "expected nothing for {:?}", text);
        assert!(result.by_structure.is_empty());
        assert!(result.high_confidence.is_empty());
    }
}

#[test]
fn test_shared_extractor_across_threads() {
    let extractor = Arc::new(UniversalExtractor::with_defaults());
    let expected = extractor.extract(SCENARIO);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            std::thread::spawn(move || extractor.extract(SCENARIO))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_facade_uses_configured_thresholds() {
    let config = ConfigBuilder::new()
        .with_high_confidence_threshold(0.95)
        .build()
        .unwrap();
    let mailmine = Mailmine::from_config(config).await.unwrap();

    let result = mailmine.extract(SCENARIO);
    assert!(result.high_confidence.iter().all(|c| c.confidence >= 0.95));
    assert!(!result.high_confidence.is_empty());
}
