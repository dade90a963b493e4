//! Command handlers for the Mailmine CLI

pub mod discover;
pub mod extract;
pub mod inspect;
pub mod rules;

pub use discover::{handle_discover_command, handle_report_command};
pub use extract::{handle_extract_command, read_message};
pub use inspect::{handle_noise_command, handle_structure_command};
pub use rules::handle_rules_command;
