pub mod args;
pub mod commands;
pub mod context;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands, RulesCommands};
pub use context::{MailmineCliContext, load_config};
pub use output::{
    CliColors, format_confidence, format_error, format_info, format_success, format_warning,
    output_error, print_candidates, print_json, print_outcome, print_report, print_rules,
};
