//! Discovery and report command handlers

use crate::args::{DiscoverArgs, ReportArgs};
use crate::context::MailmineCliContext;
use crate::output::*;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use mailmine::MailmineError;
use mailmine::config::DiscoveryConfig;
use mailmine::discovery::{
    CancelFlag, CheckpointStore, Discoverer, Discovery, DiscoveryReport, JsonLinesCorpus,
    RetryPolicy,
};
use std::time::Duration;
use tracing::{info, warn};

fn discovery_config(
    ctx: &MailmineCliContext,
    checkpoint: Option<&std::path::Path>,
    min_frequency: Option<u64>,
) -> DiscoveryConfig {
    let mut config = ctx.config().discovery.clone();
    if let Some(path) = checkpoint {
        config.checkpoint_path = Some(path.to_path_buf());
    }
    if let Some(min_frequency) = min_frequency {
        config.min_frequency = min_frequency;
    }
    config
}

fn progress_bar(output_format: &str) -> Option<ProgressBar> {
    if output_format == "json" || !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(120));
    Some(pb)
}

pub async fn handle_discover_command(
    args: DiscoverArgs,
    ctx: &MailmineCliContext,
    output_format: &str,
) -> mailmine::Result<Discovery> {
    let mut config = discovery_config(ctx, args.checkpoint.as_deref(), args.min_frequency);
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if args.fresh
        && let Some(path) = &config.checkpoint_path
    {
        CheckpointStore::new(path)
            .with_retry_policy(RetryPolicy::from(&config.retry))
            .clear()
            .await?;
        info!(path = %path.display(), "Discarded existing checkpoint");
    }

    let corpus = JsonLinesCorpus::open(&args.corpus).await?;

    let cancel = CancelFlag::new();
    let signal_flag = cancel.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping at the next batch boundary");
            signal_flag.cancel();
        }
    });

    let mut discoverer = Discoverer::new(config.clone()).with_cancel_flag(cancel);
    if let Some(limit) = args.max_batches {
        discoverer = discoverer.with_batch_limit(limit);
    }

    let pb = progress_bar(output_format);
    if let Some(pb) = &pb {
        let pb = pb.clone();
        discoverer = discoverer.on_progress(move |progress| {
            pb.set_message(format!(
                "batch {} | {} rows | {} skipped | {} unique values",
                progress.batch,
                progress.processed_count,
                progress.skipped_rows,
                progress.unique_patterns
            ));
        });
    }

    let result = discoverer.run(&corpus).await;
    signal_task.abort();
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    let outcome = result?;

    let record = discoverer.into_record();
    let report = DiscoveryReport::build(&record, &config, ctx.mailmine.noise());

    if output_format == "json" {
        print_json(&serde_json::json!({
            "outcome": outcome,
            "report": report,
        }))?;
    } else {
        print_outcome(&outcome);
        println!();
        print_report(&report, args.limit);
    }

    Ok(Discovery {
        outcome,
        record,
        report,
    })
}

pub async fn handle_report_command(
    args: ReportArgs,
    ctx: &MailmineCliContext,
    output_format: &str,
) -> mailmine::Result<DiscoveryReport> {
    let config = discovery_config(ctx, args.checkpoint.as_deref(), args.min_frequency);

    let record = match (&args.checkpoint, ctx.mailmine.discovery()) {
        (None, Some(record)) => record.clone(),
        _ => {
            let path = config.checkpoint_path.as_ref().ok_or_else(|| {
                MailmineError::Configuration(
                    "No checkpoint given; pass --checkpoint or set discovery.checkpoint_path"
                        .to_string(),
                )
            })?;
            CheckpointStore::new(path)
                .with_retry_policy(RetryPolicy::from(&config.retry))
                .load()
                .await?
                .ok_or_else(|| {
                    MailmineError::Other(format!("No discovery checkpoint at {}", path.display()))
                })?
        }
    };

    let report = DiscoveryReport::build(&record, &config, ctx.mailmine.noise());
    if output_format == "json" {
        print_json(&report)?;
    } else {
        print_report(&report, args.limit);
    }
    Ok(report)
}
