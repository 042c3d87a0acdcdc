//! Engine facade: one entry point per hub request.
//!
//! Holds only configuration. Every call re-reads the course tree and the user
//! lists, so the filesystem stays the single source of truth.

use crate::config::{HubConfig, ValidationError};
use crate::error::HubError;
use crate::membership::{auto_allowed_users, HubUserLists, UserIdentity};
use crate::mounts::{resolve_mounts, MountContext};
use crate::profile::{validate_default_choices, DefaultChoiceConflict, ProfileMenu, ProfileSynthesizer};
use crate::registry::{CourseRegistry, RegistryLoader};
use crate::spawn::SpawnPlan;
use crate::types::Selection;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Result of [`HubEngine::validate`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Configuration problems; any entry makes the configuration invalid
    pub errors: Vec<String>,
    /// Soft problems such as several default offerings in one course
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct HubEngine {
    config: HubConfig,
}

impl HubEngine {
    pub fn new(config: HubConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Walk the course root. No `nbgrader.course_dir` means an empty registry;
    /// a configured root that is missing is an error.
    pub fn load_registry(&self) -> Result<CourseRegistry, HubError> {
        match self.config.server.course_dir() {
            Some(root) => Ok(RegistryLoader::load(root)?),
            None => {
                debug!("No nbgrader.course_dir configured, registry is empty");
                Ok(CourseRegistry::new())
            }
        }
    }

    pub fn user_lists(&self) -> HubUserLists {
        HubUserLists::for_server(&self.config.server)
    }

    pub fn user_identity(&self, username: &str) -> UserIdentity {
        UserIdentity::resolve(&self.user_lists(), username)
    }

    #[instrument(skip(self))]
    pub fn render_menu(&self, username: &str) -> Result<ProfileMenu, HubError> {
        let identity = self.user_identity(username);
        if !identity.may_spawn() {
            return Ok(ProfileMenu::suppressed(&identity.username));
        }
        let registry = self.load_registry()?;
        let menu = ProfileSynthesizer::new(&self.config.spawn, &self.config.server, &registry)
            .synthesize(&identity);
        info!(
            user = %menu.username,
            entries = menu.entry_count(),
            "Rendered profile menu"
        );
        Ok(menu)
    }

    /// Mounts, environment, and hooks for `selection`. Blocked users are refused.
    #[instrument(skip(self, selection), fields(selection = %selection))]
    pub fn plan_spawn(&self, username: &str, selection: &Selection) -> Result<SpawnPlan, HubError> {
        let identity = self.user_identity(username);
        if !identity.may_spawn() {
            warn!(user = %identity.username, "Blocked user attempted to spawn");
            return Err(HubError::UserBlocked(identity.username));
        }

        let registry = self.load_registry()?;
        let resolution = resolve_mounts(
            &MountContext {
                settings: &self.config.spawn,
                server: &self.config.server,
                registry: &registry,
                user: &identity,
            },
            selection,
        );

        let granted = resolution
            .granted
            .as_ref()
            .and_then(|key| registry.get(key).map(|record| (key, record)));
        let hooks = ProfileSynthesizer::new(&self.config.spawn, &self.config.server, &registry)
            .lifecycle_hooks(granted);

        let plan = SpawnPlan::new(selection, resolution, hooks);
        info!(
            user = %identity.username,
            role = %plan.effective_role,
            mounts = plan.mounts.len(),
            "Planned spawn"
        );
        Ok(plan)
    }

    pub fn auto_allowed_users(&self) -> Result<BTreeSet<String>, HubError> {
        let registry = self.load_registry()?;
        Ok(auto_allowed_users(
            &self.config.server,
            &registry,
            &self.user_lists(),
        ))
    }

    /// Configuration errors plus default-choice warnings from the current tree
    pub fn validate(&self) -> Result<ValidationReport, HubError> {
        let mut report = ValidationReport::default();
        if let Err(errors) = self.config.validate() {
            report
                .errors
                .extend(errors.iter().map(ValidationError::to_string));
        }

        let registry = self.load_registry()?;
        report.warnings.extend(
            validate_default_choices(&registry)
                .iter()
                .map(DefaultChoiceConflict::to_string),
        );
        Ok(report)
    }
}
