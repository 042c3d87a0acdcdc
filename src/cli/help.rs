//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log records (e.g. "menu", "spawn").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Menu { .. } => "menu",
        Commands::Spawn { .. } => "spawn",
        Commands::Courses { .. } => "courses",
        Commands::Users { .. } => "users",
        Commands::Validate { .. } => "validate",
    }
}

/// Requested output format of a command
pub fn command_format(command: &Commands) -> &str {
    match command {
        Commands::Menu { format, .. }
        | Commands::Spawn { format, .. }
        | Commands::Courses { format }
        | Commands::Users { format, .. }
        | Commands::Validate { format } => format,
    }
}
