//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the engine.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_courses_text, format_menu_text, format_spawn_plan_text, format_validation_report_text,
};
pub use route::RunContext;
