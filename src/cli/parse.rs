//! CLI parse: clap types for coursehub. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// coursehub CLI - profile and mount resolution for a multi-course notebook hub
#[derive(Parser)]
#[command(name = "coursehub")]
#[command(about = "Resolve course profiles, volume mounts, and identities for a notebook hub")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Hub configuration file (overrides the global hub document)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server section to use (`server.<name>` in the hub document)
    #[arg(long)]
    pub server: Option<String>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the profile menu offered to a user
    Menu {
        /// Hub username
        #[arg(long)]
        user: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Plan mounts, environment, and hooks for a profile selection
    Spawn {
        /// Hub username
        #[arg(long)]
        user: String,
        /// Selected profile: "Default", an offering key, or extra+<name>
        #[arg(long, default_value = "Default")]
        profile: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List courses, roles, and offerings in the course tree
    Courses {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show hub user lists and the users added to the allow list at start
    Users {
        /// Show the hub-wide status of one user only
        #[arg(long)]
        user: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate the hub configuration and course tree
    Validate {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
