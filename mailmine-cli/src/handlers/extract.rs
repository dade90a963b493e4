//! Extraction command handler

use crate::args::ExtractArgs;
use crate::context::MailmineCliContext;
use crate::output::*;
use mailmine::MailmineError;
use mailmine::discovery::CheckpointStore;
use mailmine::extraction::{CandidateMatch, ExtractionResult, PatternExtractor, UniversalExtractor};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// The message text from the argument, a file, or stdin.
pub async fn read_message(text: Option<String>, file: Option<&Path>) -> mailmine::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(path).await.map_err(|e| {
            MailmineError::Other(format!("Failed to read {}: {}", path.display(), e))
        });
    }

    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .map_err(|e| MailmineError::Other(format!("Failed to read stdin: {}", e)))?;
    Ok(buffer)
}

pub async fn handle_extract_command(
    args: ExtractArgs,
    ctx: &MailmineCliContext,
    output_format: &str,
) -> mailmine::Result<ExtractionResult> {
    let text = read_message(args.text, args.file.as_deref()).await?;

    let mut config = ctx.config().extraction.clone();
    if args.rules_only {
        config.include_structural = false;
    }

    let mut builder = UniversalExtractor::builder()
        .rules(ctx.mailmine.rules().clone())
        .config(config)
        .noise(ctx.mailmine.noise().clone());
    match &args.checkpoint {
        Some(path) => {
            let record = CheckpointStore::new(path).load().await?.ok_or_else(|| {
                MailmineError::Other(format!("No discovery checkpoint at {}", path.display()))
            })?;
            builder = builder.discovery(&record);
        }
        None => {
            if let Some(record) = ctx.mailmine.discovery() {
                builder = builder.discovery(record);
            }
        }
    }

    let result = builder.build().extract(&text);

    if output_format == "json" {
        print_json(&result)?;
    } else {
        if result.truncated {
            eprintln!("{}", format_warning("Input was truncated to the configured size limit"));
        }
        let shown: &[CandidateMatch] = if args.all {
            &result.matches
        } else {
            &result.high_confidence
        };
        print_candidates(shown);
        if !args.all && result.len() > shown.len() {
            println!(
                "{}",
                format_info(&format!(
                    "{} lower-confidence candidates hidden (use --all)",
                    result.len() - shown.len()
                ))
            );
        }
    }

    Ok(result)
}
