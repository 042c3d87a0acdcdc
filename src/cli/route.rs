//! CLI route: single route table and run context. Dispatches to the engine and presentation.

use crate::cli::help::{command_format, command_name};
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_courses_json, format_courses_text, format_identity_text, format_menu_json,
    format_menu_text, format_spawn_plan_json, format_spawn_plan_text, format_users_json,
    format_users_text, format_validation_report_text, CourseRow, UsersOutput,
};
use crate::cli::output::to_json;
use crate::config::{ConfigLoader, HubConfig};
use crate::engine::HubEngine;
use crate::error::HubError;
use crate::types::Selection;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution. Built from an optional config path and
/// server name using ConfigLoader only.
pub struct RunContext {
    engine: HubEngine,
}

impl RunContext {
    pub fn new(config_path: Option<&Path>, server: Option<&str>) -> Result<Self, HubError> {
        let config = ConfigLoader::load(config_path, server)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: HubConfig) -> Self {
        Self {
            engine: HubEngine::new(config),
        }
    }

    pub fn engine(&self) -> &HubEngine {
        &self.engine
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, HubError> {
        let started = Instant::now();
        debug!(command = command_name(command), "Executing command");
        let result = self.execute_inner(command, command_format(command) == "json");
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands, json: bool) -> Result<String, HubError> {
        match command {
            Commands::Menu { user, .. } => {
                let menu = self.engine.render_menu(user)?;
                if json {
                    format_menu_json(&menu)
                } else {
                    Ok(format_menu_text(&menu))
                }
            }
            Commands::Spawn { user, profile, .. } => {
                let selection: Selection = profile.parse()?;
                let plan = self.engine.plan_spawn(user, &selection)?;
                if json {
                    format_spawn_plan_json(&plan)
                } else {
                    Ok(format_spawn_plan_text(&plan))
                }
            }
            Commands::Courses { .. } => {
                let registry = self.engine.load_registry()?;
                let rows = CourseRow::collect(&registry);
                if json {
                    format_courses_json(&rows)
                } else {
                    Ok(format_courses_text(&rows))
                }
            }
            Commands::Users { user: Some(user), .. } => {
                let identity = self.engine.user_identity(user);
                if json {
                    to_json(&identity)
                } else {
                    Ok(format_identity_text(&identity))
                }
            }
            Commands::Users { user: None, .. } => {
                let lists = self.engine.user_lists();
                let output = UsersOutput {
                    auto_allowed_users: self.engine.auto_allowed_users()?,
                    admin_users: lists.admin_users,
                    allowed_users: lists.allowed_users,
                    blocked_users: lists.blocked_users,
                };
                if json {
                    format_users_json(&output)
                } else {
                    Ok(format_users_text(&output))
                }
            }
            Commands::Validate { .. } => {
                let report = self.engine.validate()?;
                let rendered = if json {
                    to_json(&report)?
                } else {
                    format_validation_report_text(&report)
                };
                if report.is_valid() {
                    Ok(rendered)
                } else {
                    Err(HubError::ConfigError(rendered))
                }
            }
        }
    }
}
