//! Rule library command handlers

use crate::commands::RulesCommands;
use crate::context::MailmineCliContext;
use crate::output::*;
use mailmine::MailmineError;
use mailmine::rules::{EntityCategory, VerifiedRule};

pub async fn handle_rules_command(
    cmd: RulesCommands,
    ctx: &MailmineCliContext,
    output_format: &str,
) -> mailmine::Result<()> {
    let rules = ctx.mailmine.rules();

    match cmd {
        RulesCommands::List(args) => {
            let categories = match &args.category {
                Some(name) => vec![
                    name.parse::<EntityCategory>()
                        .map_err(MailmineError::Other)?,
                ],
                None => rules.categories(),
            };
            let listed: Vec<&VerifiedRule> = categories
                .into_iter()
                .flat_map(|category| rules.lookup(category))
                .collect();

            if output_format == "json" {
                let definitions: Vec<_> = listed
                    .iter()
                    .map(|rule| {
                        serde_json::json!({
                            "id": rule.id,
                            "category": rule.category,
                            "definition": rule.to_definition(),
                        })
                    })
                    .collect();
                print_json(&serde_json::json!({
                    "rules": definitions,
                    "rejected": rules.rejected().iter().map(ToString::to_string).collect::<Vec<_>>(),
                }))?;
            } else {
                print_rules(&listed);
                print_rejected(rules.rejected());
            }
        }

        RulesCommands::Prompt(args) => {
            let summary = rules.prompt_summary(args.top);
            if output_format == "json" {
                print_json(&serde_json::json!({ "prompt": summary }))?;
            } else {
                print!("{}", summary);
            }
        }

        RulesCommands::Export(args) => {
            let json = rules.to_json()?;
            match &args.file {
                Some(path) => {
                    tokio::fs::write(path, json.as_bytes()).await.map_err(|e| {
                        MailmineError::Other(format!("Failed to write {}: {}", path.display(), e))
                    })?;
                    if output_format != "json" {
                        println!(
                            "{}",
                            format_success(&format!(
                                "Exported {} rules to {}",
                                rules.len(),
                                path.display()
                            ))
                        );
                    }
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
