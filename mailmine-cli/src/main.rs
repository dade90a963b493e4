use clap::{CommandFactory, Parser};
use mailmine_cli::commands::{Cli, Commands};
use mailmine_cli::context::MailmineCliContext;
use mailmine_cli::handlers::*;
use mailmine_cli::output::output_error;
use tracing::Level;

async fn run(cli: Cli, output_format: &str) -> mailmine::Result<()> {
    match cli.command {
        Commands::Version => {
            println!("Mailmine CLI v{}", mailmine::VERSION);
            return Ok(());
        }
        Commands::Completions(args) => {
            let shell: clap_complete::Shell = args.shell.into();
            clap_complete::generate(shell, &mut Cli::command(), "mailmine", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Structure(args) => return handle_structure_command(args, output_format),
        _ => {}
    }

    let ctx = MailmineCliContext::new(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Discover(args) => {
            handle_discover_command(args, &ctx, output_format).await?;
        }
        Commands::Report(args) => {
            handle_report_command(args, &ctx, output_format).await?;
        }
        Commands::Extract(args) => {
            handle_extract_command(args, &ctx, output_format).await?;
        }
        Commands::Rules(cmd) => handle_rules_command(cmd, &ctx, output_format).await?,
        Commands::Noise(args) => handle_noise_command(args, &ctx, output_format)?,
        Commands::Version | Commands::Completions(_) | Commands::Structure(_) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let output_format = std::env::var("MAILMINE_OUTPUT").unwrap_or_else(|_| cli.output.clone());
    let is_quiet = cli.quiet
        || std::env::var("MAILMINE_QUIET")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

    // JSON output keeps stdout clean, so logging drops to errors only
    let log_level = if is_quiet || output_format == "json" {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, &output_format).await {
        output_error(&e.to_string(), &output_format);
        std::process::exit(1);
    }
}
