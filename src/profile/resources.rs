//! Spawner overrides for one profile: course values over spawner defaults.

use crate::commands::LifecycleHooks;
use crate::config::ResourceDefaults;
use crate::registry::{format_gigabytes, CourseConfig, NodeAffinity};
use crate::types::Role;
use serde::Serialize;

/// Override bag applied by the spawner when a profile is chosen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileOverrides {
    pub cpu_limit: f64,
    pub cpu_guarantee: f64,
    pub mem_limit: String,
    pub mem_guarantee: String,
    pub image: String,
    pub image_pull_policy: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub node_affinity_required: Vec<NodeAffinity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_hooks: Option<LifecycleHooks>,
}

/// Node-purpose label value scheduled to when a course sets no affinity
pub fn default_node_purpose(role: Role) -> &'static str {
    match role {
        Role::Grader => "core",
        Role::Student => "user",
    }
}

/// Merge a course config over the spawner defaults. Lifecycle hooks are left
/// unset; the synthesizer attaches them per offering.
pub fn resolve_overrides(
    defaults: &ResourceDefaults,
    config: &CourseConfig,
    role: Role,
) -> ProfileOverrides {
    let resources = config.resources();

    let cpu_limit = resources
        .and_then(|r| r.cpu_limit)
        .unwrap_or(defaults.cpu_limit);
    let cpu_guarantee = resources
        .and_then(|r| r.cpu_guarantee)
        .unwrap_or(defaults.cpu_guarantee);
    let mem_limit = resources
        .and_then(|r| r.mem_limit.as_ref())
        .map(|m| m.render())
        .unwrap_or_else(|| format_gigabytes(defaults.mem_limit as f64));
    let mem_guarantee = resources
        .and_then(|r| r.mem_guarantee.as_ref())
        .map(|m| m.render())
        .unwrap_or_else(|| format_gigabytes(defaults.mem_guarantee as f64));

    let node_affinity = config
        .node_affinity()
        .cloned()
        .unwrap_or_else(|| NodeAffinity::node_purpose(default_node_purpose(role)));

    ProfileOverrides {
        cpu_limit,
        cpu_guarantee,
        mem_limit,
        mem_guarantee,
        image: config.image.clone().unwrap_or_else(|| defaults.image.clone()),
        image_pull_policy: config
            .pull_policy
            .clone()
            .unwrap_or_else(|| defaults.image_pull_policy.clone()),
        node_affinity_required: vec![node_affinity],
        lifecycle_hooks: None,
    }
}

impl ProfileOverrides {
    pub fn with_lifecycle_hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.lifecycle_hooks = Some(hooks);
        self
    }

    /// Flavor of the first required affinity term, e.g. `gpu` or `user`
    pub fn node_flavor(&self) -> String {
        self.node_affinity_required
            .iter()
            .map(NodeAffinity::flavor)
            .collect::<Vec<_>>()
            .join("/")
    }
}
