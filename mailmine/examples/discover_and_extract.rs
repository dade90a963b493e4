//! # Discover and Extract
//!
//! Runs discovery over a small in-memory corpus, prints the report, then
//! extracts from a new message using the discovered counts.
//!
//! Run with: cargo run --example discover_and_extract

use mailmine::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let mut mailmine = Mailmine::builder()
        .with_min_frequency(3)
        .with_log_level(LogLevel::Warn)
        .build()
        .await?;

    let corpus = MemoryCorpus::from_texts((0..60).map(|i| match i % 3 {
        0 => format!("Please process PO 0505{:06} by Friday", 900_000 + i % 5),
        1 => format!("Support ticket TS-{} has been updated", 1_818_560 + i % 4),
        _ => format!("Attached quote XHU-{:05} for the renewal", 10_000 + i % 6),
    }));

    let outcome = mailmine.discover(&corpus).await?;
    println!("Scanned {} rows in {} batches", outcome.rows_scanned, outcome.batches);

    if let Some(report) = mailmine.report() {
        for group in &report.structural_patterns {
            println!(
                "  {:<10} {:>3} values  e.g. {}",
                group.structure,
                group.distinct_values,
                group.samples.join(", ")
            );
        }
    }

    let result = mailmine.extract("Hi, quote XHU-10002 covers ticket TS-1818561 and PO 0505900001.");
    println!("\nCandidates:");
    for candidate in &result.matches {
        println!(
            "  {:<22} {:<8} {:.2}  {}",
            candidate.value,
            candidate.structure,
            candidate.confidence,
            candidate.source_regex_id
        );
    }

    println!("\n{}", mailmine.prompt_summary(2));
    Ok(())
}
