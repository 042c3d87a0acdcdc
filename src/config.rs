//! Configuration System
//!
//! One hub document carries the deployment settings (`spawn`), logging, and the
//! server configuration. Several servers can share a document under
//! `server.<name>`. Every optional server key is an `Option` resolved through
//! exactly one accessor, so presence checks never leak into the engine.

use crate::logging::LoggingConfig;
use crate::registry::CourseConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod settings;
mod sources;

pub use facade::ConfigLoader;
pub use settings::{ResourceDefaults, SpawnSettings};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    /// Deployment settings for volumes, identities, and spawner defaults
    #[serde(default)]
    pub spawn: SpawnSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Server configuration (root document or the selected `server.<name>` section)
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server mode; separates home directories of teaching and exam servers on one volume
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    #[default]
    Teaching,
    Exam,
}

impl ServerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerMode::Teaching => "teaching",
            ServerMode::Exam => "exam",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub mode: Option<ServerMode>,

    /// Commands run in every container at start
    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default)]
    pub exam_kernel: Option<ExamKernelConfig>,

    #[serde(default)]
    pub nbgrader: Option<NbgraderConfig>,

    #[serde(default)]
    pub extra_mounts: Option<ExtraMountsConfig>,

    #[serde(default)]
    pub extra_profile_list: Option<ExtraProfileList>,

    /// Directory holding hub-wide admin/allowed/blocked user CSVs
    #[serde(default)]
    pub user_list_path: Option<PathBuf>,

    #[serde(default)]
    pub auto_add_hub_users: Option<bool>,

    #[serde(default)]
    pub mount_server_config: Option<bool>,
}

/// Exam kernel restrictions written into the ipython config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamKernelConfig {
    #[serde(default)]
    pub allowed_imports: Option<Vec<String>>,
    #[serde(default)]
    pub init_code: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_magics: Option<Vec<String>>,
}

/// Global nbgrader settings; course configs override them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NbgraderConfig {
    #[serde(default)]
    pub course_dir: Option<PathBuf>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub grader_cmds: Vec<String>,
    #[serde(default)]
    pub default_exchange: Option<ExchangeConfig>,
    #[serde(default)]
    pub mount_course_config: Option<bool>,
    #[serde(default)]
    pub auto_add_graders: Option<bool>,
    #[serde(default)]
    pub auto_add_students: Option<bool>,
}

/// Exchange declaration for a course or the nbgrader default
///
/// Accepts either a mapping with the personalized flags and setup commands, or a
/// bare list of setup commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExchangeRepr")]
pub struct ExchangeConfig {
    pub personalized_outbound: Option<bool>,
    pub personalized_inbound: Option<bool>,
    pub personalized_feedback: Option<bool>,
    pub commands: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExchangeRepr {
    Commands(Vec<String>),
    Settings {
        #[serde(default)]
        personalized_outbound: Option<bool>,
        #[serde(default)]
        personalized_inbound: Option<bool>,
        #[serde(default)]
        personalized_feedback: Option<bool>,
        #[serde(default)]
        commands: Vec<String>,
    },
}

impl From<ExchangeRepr> for ExchangeConfig {
    fn from(repr: ExchangeRepr) -> Self {
        match repr {
            ExchangeRepr::Commands(commands) => ExchangeConfig {
                commands,
                ..Default::default()
            },
            ExchangeRepr::Settings {
                personalized_outbound,
                personalized_inbound,
                personalized_feedback,
                commands,
            } => ExchangeConfig {
                personalized_outbound,
                personalized_inbound,
                personalized_feedback,
                commands,
            },
        }
    }
}

/// Extra volume mounts copied verbatim into every course session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraMountsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub volume_mounts: BTreeMap<String, ExtraMountSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraMountSpec {
    pub name: String,
    #[serde(rename = "mountPath", alias = "mountpath", alias = "mount_path")]
    pub mount_path: String,
    #[serde(rename = "subPath", alias = "subpath", alias = "sub_path", default)]
    pub sub_path: String,
}

/// Membership-free profiles offered to every hub user
///
/// Map keys are profile ids; the hub document loader lowercases them, so the
/// name shown to users comes from each profile's `course_display_name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtraProfileList {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub profiles: BTreeMap<String, CourseConfig>,
}

impl ServerConfig {
    pub fn mode(&self) -> ServerMode {
        self.mode.unwrap_or_default()
    }

    pub fn course_dir(&self) -> Option<&Path> {
        self.nbgrader.as_ref()?.course_dir.as_deref()
    }

    /// nbgrader integration is on when the block exists and is not disabled
    pub fn nbgrader_enabled(&self) -> bool {
        self.nbgrader
            .as_ref()
            .map(|n| n.enabled.unwrap_or(true))
            .unwrap_or(false)
    }

    pub fn default_exchange(&self) -> Option<&ExchangeConfig> {
        self.nbgrader.as_ref()?.default_exchange.as_ref()
    }

    pub fn grader_cmds(&self) -> &[String] {
        self.nbgrader
            .as_ref()
            .map(|n| n.grader_cmds.as_slice())
            .unwrap_or(&[])
    }

    pub fn mount_course_config(&self) -> bool {
        self.nbgrader
            .as_ref()
            .and_then(|n| n.mount_course_config)
            .unwrap_or(false)
    }

    pub fn mount_server_config(&self) -> bool {
        self.mount_server_config.unwrap_or(false)
    }

    pub fn auto_add_hub_users(&self) -> bool {
        self.auto_add_hub_users.unwrap_or(false)
    }

    pub fn auto_add_graders(&self) -> bool {
        self.nbgrader
            .as_ref()
            .and_then(|n| n.auto_add_graders)
            .unwrap_or(false)
    }

    pub fn auto_add_students(&self) -> bool {
        self.nbgrader
            .as_ref()
            .and_then(|n| n.auto_add_students)
            .unwrap_or(false)
    }

    /// Extra mounts, empty unless the block is enabled
    pub fn extra_mounts(&self) -> Vec<&ExtraMountSpec> {
        match &self.extra_mounts {
            Some(block) if block.enabled => block.volume_mounts.values().collect(),
            _ => Vec::new(),
        }
    }

    /// Extra profiles, empty unless the block is enabled
    pub fn extra_profiles(&self) -> Vec<(&str, &CourseConfig)> {
        match &self.extra_profile_list {
            Some(block) if block.enabled => block
                .profiles
                .iter()
                .map(|(name, cfg)| (name.as_str(), cfg))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Spawn(String),
    Server(String),
    ExtraMount(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Spawn(msg) => write!(f, "Spawn: {}", msg),
            ValidationError::Server(msg) => write!(f, "Server: {}", msg),
            ValidationError::ExtraMount(name, msg) => {
                write!(f, "Extra mount '{}': {}", name, msg)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl HubConfig {
    /// Validate the entire configuration, collecting every problem
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors: Vec<ValidationError> = self
            .spawn
            .validate()
            .into_iter()
            .map(ValidationError::Spawn)
            .collect();

        if let Some(nbgrader) = &self.server.nbgrader {
            if nbgrader.enabled.unwrap_or(true) && nbgrader.course_dir.is_none() {
                errors.push(ValidationError::Server(
                    "nbgrader is enabled but nbgrader.course_dir is not set".to_string(),
                ));
            }
        }

        if let Some(block) = &self.server.extra_mounts {
            for (key, spec) in &block.volume_mounts {
                if spec.name.trim().is_empty() {
                    errors.push(ValidationError::ExtraMount(
                        key.clone(),
                        "volume name cannot be empty".to_string(),
                    ));
                }
                if spec.mount_path.trim().is_empty() {
                    errors.push(ValidationError::ExtraMount(
                        key.clone(),
                        "mountPath cannot be empty".to_string(),
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
