//! Token inspection handlers for structure and noise

use crate::args::{NoiseArgs, StructureArgs};
use crate::context::MailmineCliContext;
use crate::output::*;
use colored::Colorize;
use mailmine::structure::structure_of;

pub fn handle_structure_command(args: StructureArgs, output_format: &str) -> mailmine::Result<()> {
    let signatures: Vec<(String, String)> = args
        .tokens
        .into_iter()
        .map(|token| {
            let signature = structure_of(&token);
            (token, signature)
        })
        .collect();

    if output_format == "json" {
        let rows: Vec<_> = signatures
            .iter()
            .map(|(token, structure)| serde_json::json!({ "token": token, "structure": structure }))
            .collect();
        print_json(&rows)?;
    } else {
        for (token, structure) in &signatures {
            println!("{:<32} {}", token, structure.color(CliColors::info()).bold());
        }
    }
    Ok(())
}

pub fn handle_noise_command(
    args: NoiseArgs,
    ctx: &MailmineCliContext,
    output_format: &str,
) -> mailmine::Result<()> {
    let noise = ctx.mailmine.noise();

    if output_format == "json" {
        let rows: Vec<_> = args
            .tokens
            .iter()
            .map(|token| {
                let reason = noise.noise_reason(token);
                serde_json::json!({
                    "token": token,
                    "noise": reason.is_some(),
                    "reason": reason,
                })
            })
            .collect();
        print_json(&rows)?;
    } else {
        for token in &args.tokens {
            print_noise_verdict(token, noise.noise_reason(token));
        }
    }
    Ok(())
}
