//! Mount & Identity Resolution
//!
//! Turns a profile selection into the ordered volume mounts and the POSIX
//! identity for one container. Plans are rebuilt from scratch for every spawn.

mod exchange;
mod resolver;

pub use resolver::{resolve_mounts, MountContext, MountResolution};

use crate::config::SpawnSettings;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One entry of a container volume-mount list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
    pub sub_path: String,
    pub read_only: bool,
}

impl VolumeMount {
    pub fn new(
        name: impl Into<String>,
        mount_path: impl Into<String>,
        sub_path: impl Into<String>,
        read_only: bool,
    ) -> Self {
        Self {
            name: name.into(),
            mount_path: mount_path.into(),
            sub_path: sub_path.into(),
            read_only,
        }
    }
}

/// Ordered mount list; entries are only ever appended
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MountPlan {
    mounts: Vec<VolumeMount>,
}

impl MountPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mount. Mounts on an unnamed volume are skipped.
    pub fn push(&mut self, mount: VolumeMount) {
        if mount.name.trim().is_empty() {
            debug!(mount_path = %mount.mount_path, "Volume name is empty, skipping mount");
            return;
        }
        self.mounts.push(mount);
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VolumeMount> {
        self.mounts.iter()
    }

    pub fn as_slice(&self) -> &[VolumeMount] {
        &self.mounts
    }

    pub fn into_vec(self) -> Vec<VolumeMount> {
        self.mounts
    }

    /// First mount at `mount_path`
    pub fn find(&self, mount_path: &str) -> Option<&VolumeMount> {
        self.mounts.iter().find(|m| m.mount_path == mount_path)
    }
}

/// Container user and its POSIX ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    pub uid: u32,
    pub gid: u32,
}

impl Identity {
    /// Role-fixed uid/gid; identical across courses
    pub fn for_role(settings: &SpawnSettings, role: Role, username: &str) -> Self {
        let (uid, gid) = match role {
            Role::Grader => (settings.grader_uid, settings.grader_gid),
            Role::Student => (settings.student_uid, settings.student_gid),
        };
        Self {
            username: username.to_string(),
            uid,
            gid,
        }
    }

    /// `NB_USER`, `NB_UID` and `NB_GID`
    pub fn environment(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("NB_USER".to_string(), self.username.clone()),
            ("NB_UID".to_string(), self.uid.to_string()),
            ("NB_GID".to_string(), self.gid.to_string()),
        ])
    }
}
