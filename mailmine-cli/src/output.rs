use colored::*;
use mailmine::discovery::{DiscoveryOutcome, DiscoveryReport, DiscoveryStatus};
use mailmine::extraction::{CandidateMatch, MatchSource};
use mailmine::noise::NoiseReason;
use mailmine::rules::{RuleCompileError, VerifiedRule};
use serde_json::json;

pub struct CliColors;

impl CliColors {
    pub fn success() -> Color {
        Color::TrueColor {
            r: 34,
            g: 197,
            b: 94,
        }
    }

    pub fn error() -> Color {
        Color::TrueColor {
            r: 239,
            g: 68,
            b: 68,
        }
    }

    pub fn warning() -> Color {
        Color::TrueColor {
            r: 245,
            g: 158,
            b: 11,
        }
    }

    pub fn info() -> Color {
        Color::TrueColor {
            r: 59,
            g: 130,
            b: 246,
        }
    }

    pub fn rule() -> Color {
        Color::TrueColor {
            r: 168,
            g: 85,
            b: 247,
        }
    }

    pub fn muted() -> Color {
        Color::TrueColor {
            r: 148,
            g: 163,
            b: 184,
        }
    }

    pub fn primary() -> Color {
        Color::White
    }
}

pub fn output_error(error_msg: &str, output_format: &str) {
    if output_format == "json" {
        let error_response = json!({
            "error": true,
            "message": error_msg,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&error_response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        eprintln!("{}", format_error(error_msg));
    }
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> mailmine::Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| mailmine::MailmineError::Other(format!("Failed to serialize output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

pub fn format_success(msg: &str) -> String {
    format!(
        "{} {}",
        "✓".color(CliColors::success()).bold(),
        msg.color(CliColors::success())
    )
}

pub fn format_error(msg: &str) -> String {
    format!(
        "{} {}",
        "✗".color(CliColors::error()).bold(),
        msg.color(CliColors::error())
    )
}

pub fn format_warning(msg: &str) -> String {
    format!(
        "{} {}",
        "⚠".color(CliColors::warning()).bold(),
        msg.color(CliColors::warning())
    )
}

pub fn format_info(msg: &str) -> String {
    format!(
        "{} {}",
        "ℹ".color(CliColors::info()).bold(),
        msg.color(CliColors::info())
    )
}

pub fn format_confidence(confidence: f32) -> ColoredString {
    let text = format!("{:.2}", confidence);
    if confidence >= 0.9 {
        text.color(CliColors::success()).bold()
    } else if confidence >= 0.7 {
        text.color(CliColors::warning())
    } else {
        text.color(CliColors::muted())
    }
}

fn format_source(candidate: &CandidateMatch) -> ColoredString {
    match candidate.source {
        MatchSource::Rule => candidate.source_regex_id.color(CliColors::rule()),
        MatchSource::Template => candidate.source_regex_id.color(CliColors::muted()),
    }
}

pub fn print_candidates(candidates: &[CandidateMatch]) {
    if candidates.is_empty() {
        println!("{}", format_info("No identifiers found"));
        return;
    }

    println!(
        "{:<28} {:<12} {:>6} {:>6}  {:<28} {}",
        "VALUE".bold(),
        "STRUCTURE".bold(),
        "CONF".bold(),
        "POS".bold(),
        "SOURCE".bold(),
        "CATEGORY".bold()
    );
    for candidate in candidates {
        let label = match (&candidate.category, &candidate.hint) {
            (Some(category), _) => category.as_str().to_string(),
            (None, Some(hint)) => format!("{}?", hint),
            (None, None) => String::new(),
        };
        println!(
            "{:<28} {:<12} {:>6} {:>6}  {:<28} {}",
            candidate.value.color(CliColors::primary()).bold(),
            candidate.structure,
            format_confidence(candidate.confidence),
            candidate.position,
            format_source(candidate),
            label
        );
        if !candidate.alternates.is_empty() {
            println!(
                "{:<28} {}",
                "",
                format!("also: {}", candidate.alternates.join(", ")).color(CliColors::muted())
            );
        }
    }
}

pub fn print_outcome(outcome: &DiscoveryOutcome) {
    let summary = format!(
        "{} batches, {} rows scanned, {} skipped",
        outcome.batches, outcome.rows_scanned, outcome.rows_skipped
    );
    match outcome.status {
        DiscoveryStatus::Completed => println!("{}", format_success(&format!("Discovery complete: {}", summary))),
        DiscoveryStatus::Cancelled => println!("{}", format_warning(&format!("Discovery cancelled: {}", summary))),
        DiscoveryStatus::BatchLimitReached => {
            println!("{}", format_info(&format!("Batch limit reached: {}", summary)))
        }
    }
    if outcome.resumed {
        println!("{}", "Resumed from checkpoint".color(CliColors::muted()));
    }
    if let Some(path) = &outcome.checkpoint {
        println!("{} {}", "Checkpoint:".color(CliColors::muted()), path.display());
    }
}

pub fn print_report(report: &DiscoveryReport, limit: usize) {
    println!(
        "{} {} rows processed, {} skipped, {} unique values, threshold {}",
        "Discovery:".bold(),
        report.processed_count,
        report.skipped_rows,
        report.unique_patterns,
        report.frequency_threshold
    );

    for pattern_type in report.pattern_types.iter().filter(|p| !p.frequent.is_empty()) {
        println!();
        println!(
            "{} {}",
            pattern_type.pattern_type.color(CliColors::info()).bold(),
            format!(
                "({} occurrences, {} distinct, {} frequent)",
                pattern_type.total_occurrences,
                pattern_type.distinct_values,
                pattern_type.frequent.len()
            )
            .color(CliColors::muted())
        );
        for pattern in pattern_type.frequent.iter().take(limit) {
            let hint = pattern.hint.as_deref().unwrap_or("");
            println!(
                "  {:<28} {:>8}  {:<12} {}",
                pattern.value, pattern.count, pattern.structure, hint
            );
        }
        if pattern_type.frequent.len() > limit {
            println!(
                "  {}",
                format!("... {} more", pattern_type.frequent.len() - limit).color(CliColors::muted())
            );
        }
    }

    if report.structural_patterns.is_empty() {
        return;
    }
    println!();
    println!("{}", "Structural patterns".bold());
    for group in &report.structural_patterns {
        println!(
            "  {:<14} {:>5} values {:>9} occurrences  {}  {}",
            group.structure.color(CliColors::info()).bold(),
            group.distinct_values,
            group.total_count,
            group.samples.join(", "),
            group.dominant_hint.as_deref().unwrap_or("").color(CliColors::muted())
        );
    }
}

pub fn print_rules(rules: &[&VerifiedRule]) {
    if rules.is_empty() {
        println!("{}", format_info("No rules loaded"));
        return;
    }
    for rule in rules {
        println!(
            "{:<32} {}  /{}/",
            rule.id.color(CliColors::rule()).bold(),
            format_confidence(rule.base_confidence),
            rule.pattern()
        );
        if !rule.examples.is_empty() {
            println!(
                "{:<32} {}",
                "",
                format!("e.g. {}", rule.examples.join(", ")).color(CliColors::muted())
            );
        }
    }
}

pub fn print_rejected(rejected: &[RuleCompileError]) {
    for error in rejected {
        eprintln!("{}", format_warning(&format!("Rejected rule: {}", error)));
    }
}

pub fn print_noise_verdict(token: &str, reason: Option<NoiseReason>) {
    match reason {
        Some(reason) => println!(
            "{:<32} {} {}",
            token,
            "noise".color(CliColors::warning()).bold(),
            format!("({})", reason.as_str()).color(CliColors::muted())
        ),
        None => println!("{:<32} {}", token, "candidate".color(CliColors::success())),
    }
}
