//! Spawn plans and the spawner state they replace.
//!
//! A hub reuses one spawner object across a user's restarts. Applying a plan
//! clears that object's mounts, environment, and hooks first, so nothing from
//! an earlier spawn survives.

use crate::commands::LifecycleHooks;
use crate::mounts::{MountResolution, VolumeMount};
use crate::types::{OfferingKey, Role, Selection};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the hub applies for one spawn, as whole replacement values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnPlan {
    /// Selection as sent by the hub
    pub selection: String,
    /// Offering granted after the membership check
    pub granted: Option<OfferingKey>,
    pub effective_role: Role,
    pub mounts: Vec<VolumeMount>,
    pub environment: BTreeMap<String, String>,
    pub lifecycle_hooks: LifecycleHooks,
}

impl SpawnPlan {
    pub fn new(selection: &Selection, resolution: MountResolution, lifecycle_hooks: LifecycleHooks) -> Self {
        let effective_role = resolution.effective_role();
        Self {
            selection: selection.to_string(),
            granted: resolution.granted,
            effective_role,
            environment: resolution.identity.environment(),
            mounts: resolution.plan.into_vec(),
            lifecycle_hooks,
        }
    }
}

/// Mutable spawner fields this engine owns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnerState {
    pub volume_mounts: Vec<VolumeMount>,
    pub environment: BTreeMap<String, String>,
    pub lifecycle_hooks: Option<LifecycleHooks>,
}

impl SpawnerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear, then install the plan's values
    pub fn apply(&mut self, plan: &SpawnPlan) {
        debug!(
            stale_mounts = self.volume_mounts.len(),
            mounts = plan.mounts.len(),
            "Resetting spawner state"
        );
        self.volume_mounts.clear();
        self.environment.clear();
        self.lifecycle_hooks = None;

        self.volume_mounts.extend(plan.mounts.iter().cloned());
        self.environment.extend(
            plan.environment
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        self.lifecycle_hooks = Some(plan.lifecycle_hooks.clone());
    }
}
