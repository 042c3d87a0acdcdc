//! Per-offering course configuration parsed from a YAML file.
//!
//! Every key is optional. An absent key means "use the default", never an error.

use crate::config::ExchangeConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseConfig {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "pullPolicy", alias = "pullpolicy", alias = "pull_policy")]
    pub pull_policy: Option<String>,
    #[serde(default)]
    pub resources: Option<ResourceOverrides>,
    #[serde(default, alias = "course_exchange")]
    pub exchange: Option<ExchangeConfig>,
    #[serde(default)]
    pub course_cmds: Vec<String>,
    #[serde(default)]
    pub mount_prev_courses: Option<bool>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub choice_display_name: Option<String>,
    #[serde(default)]
    pub course_display_name: Option<String>,
    #[serde(default)]
    pub verbose_profile_list: Option<bool>,
    #[serde(default)]
    pub default: Option<bool>,
    #[serde(default)]
    pub assignment_id: Option<String>,
    #[serde(default)]
    pub extra_profile_description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceOverrides {
    #[serde(default)]
    pub cpu_limit: Option<f64>,
    #[serde(default)]
    pub cpu_guarantee: Option<f64>,
    #[serde(default)]
    pub mem_limit: Option<MemorySize>,
    #[serde(default)]
    pub mem_guarantee: Option<MemorySize>,
    #[serde(default)]
    pub node_affinity: Option<NodeAffinity>,
}

/// Memory given either as bytes or as a literal quantity such as `"4G"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemorySize {
    Bytes(f64),
    Literal(String),
}

impl MemorySize {
    /// Render as a Kubernetes quantity; bytes become decimal gigabytes with one
    /// fractional digit.
    pub fn render(&self) -> String {
        match self {
            MemorySize::Bytes(bytes) => format_gigabytes(*bytes),
            MemorySize::Literal(literal) => literal.clone(),
        }
    }
}

pub fn format_gigabytes(bytes: f64) -> String {
    format!("{:.1}G", bytes / 1e9)
}

/// Required node affinity term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAffinity {
    #[serde(rename = "matchExpressions", alias = "matchexpressions", alias = "match_expressions")]
    pub match_expressions: Vec<MatchExpression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchExpression {
    pub key: String,
    pub operator: String,
    pub values: Vec<String>,
}

pub const NODE_PURPOSE_LABEL: &str = "hub.jupyter.org/node-purpose";

impl NodeAffinity {
    /// Single `In` expression on the node-purpose label
    pub fn node_purpose(value: &str) -> Self {
        Self {
            match_expressions: vec![MatchExpression {
                key: NODE_PURPOSE_LABEL.to_string(),
                operator: "In".to_string(),
                values: vec![value.to_string()],
            }],
        }
    }

    /// Node flavor label for descriptions, e.g. `gpu/highmem`
    pub fn flavor(&self) -> String {
        self.match_expressions
            .iter()
            .flat_map(|expr| expr.values.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Entries of `mapping` that deserialize into `T` when taken alone
fn retain_valid<T: DeserializeOwned>(mapping: Mapping, origin: &Path) -> Mapping {
    mapping
        .into_iter()
        .filter(|(key, value)| {
            let mut single = Mapping::new();
            single.insert(key.clone(), value.clone());
            match serde_yaml::from_value::<T>(Value::Mapping(single)) {
                Ok(_) => true,
                Err(e) => {
                    warn!(
                        path = %origin.display(),
                        key = ?key.as_str(),
                        error = %e,
                        "Dropping invalid course config field"
                    );
                    false
                }
            }
        })
        .collect()
}

impl CourseConfig {
    /// Parse YAML text. Empty or malformed input yields an empty config.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Self {
        let value: Value = match serde_yaml::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %origin.display(), error = %e, "Malformed course config, using defaults");
                return Self::default();
            }
        };
        if value.is_null() {
            debug!(path = %origin.display(), "Empty course config, using defaults");
            return Self::default();
        }
        if !value.is_mapping() {
            warn!(path = %origin.display(), "Course config is not a mapping, using defaults");
            return Self::default();
        }
        match serde_yaml::from_value(value.clone()) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %origin.display(), error = %e, "Invalid course config fields, keeping the valid ones");
                Self::from_valid_fields(value, origin)
            }
        }
    }

    /// Keep only the top-level fields (and `resources` entries) that parse on
    /// their own.
    fn from_valid_fields(value: Value, origin: &Path) -> Self {
        let Value::Mapping(mut mapping) = value else {
            return Self::default();
        };
        if let Some(Value::Mapping(resources)) = mapping.get("resources").cloned() {
            let resources = retain_valid::<ResourceOverrides>(resources, origin);
            mapping.insert(Value::from("resources"), Value::Mapping(resources));
        }
        let mapping = retain_valid::<CourseConfig>(mapping, origin);
        serde_yaml::from_value(Value::Mapping(mapping)).unwrap_or_else(|e| {
            warn!(path = %origin.display(), error = %e, "Conflicting course config fields, using defaults");
            Self::default()
        })
    }

    /// Read and parse a course config file. Unreadable files yield an empty config.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_yaml_str(&text, path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read course config, using defaults");
                Self::default()
            }
        }
    }

    pub fn resources(&self) -> Option<&ResourceOverrides> {
        self.resources.as_ref()
    }

    pub fn node_affinity(&self) -> Option<&NodeAffinity> {
        self.resources.as_ref()?.node_affinity.as_ref()
    }

    /// Whether graders see every offering of the course. Defaults to true.
    pub fn mount_prev_courses(&self) -> bool {
        self.mount_prev_courses.unwrap_or(true)
    }

    pub fn is_default(&self) -> bool {
        self.default.unwrap_or(false)
    }

    pub fn verbose_profile_list(&self) -> bool {
        self.verbose_profile_list.unwrap_or(false)
    }
}
