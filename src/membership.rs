//! Membership resolution: which offerings a user belongs to, and the user's
//! hub-wide admin/allowed/blocked status.
//!
//! Pure local lookups over the registry and the user-list directory.

use crate::config::ServerConfig;
use crate::registry::members::read_usernames;
use crate::registry::walker::Walker;
use crate::registry::CourseRegistry;
use crate::types::{OfferingKey, Role};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

/// Offerings a user is a member of
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    pub username: String,
    entries: BTreeSet<OfferingKey>,
}

impl Membership {
    /// Exact (trimmed) match against every offering's member list
    pub fn resolve(registry: &CourseRegistry, username: &str) -> Self {
        let username = username.trim();
        let entries = registry
            .offerings()
            .filter(|(_, record)| record.has_member(username))
            .map(|(key, _)| key)
            .collect();
        Self {
            username: username.to_string(),
            entries,
        }
    }

    pub fn contains(&self, key: &OfferingKey) -> bool {
        self.entries.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OfferingKey> {
        self.entries.iter()
    }

    /// Offerings held in `role`
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &OfferingKey> {
        self.entries.iter().filter(move |k| k.role == role)
    }
}

/// Hub-wide user classes from the user-list directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubUserLists {
    pub admin_users: BTreeSet<String>,
    pub allowed_users: BTreeSet<String>,
    pub blocked_users: BTreeSet<String>,
}

/// Which list a CSV file feeds, by filename substring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserListKind {
    Admin,
    Allowed,
    Blocked,
}

fn classify(file_name: &str) -> Option<UserListKind> {
    let lower = file_name.to_lowercase();
    if lower.contains("admin") {
        Some(UserListKind::Admin)
    } else if lower.contains("allowed_users") {
        Some(UserListKind::Allowed)
    } else if lower.contains("blocked_users") {
        Some(UserListKind::Blocked)
    } else {
        None
    }
}

impl HubUserLists {
    /// Load every classified CSV under `user_list_path`. A missing directory
    /// yields empty lists; unclassified CSVs are ignored.
    pub fn load(user_list_path: &Path) -> Self {
        let mut lists = Self::default();
        let files = match Walker::new(user_list_path).files() {
            Ok(files) => files,
            Err(e) => {
                warn!(path = %user_list_path.display(), error = %e, "User list directory unavailable");
                return lists;
            }
        };

        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.to_lowercase().ends_with(".csv") {
                continue;
            }
            let Some(kind) = classify(name) else {
                debug!(file = name, "Ignoring unclassified user list");
                continue;
            };
            let target = match kind {
                UserListKind::Admin => &mut lists.admin_users,
                UserListKind::Allowed => &mut lists.allowed_users,
                UserListKind::Blocked => &mut lists.blocked_users,
            };
            target.extend(read_usernames(&path));
        }
        lists
    }

    /// Lists for a server config; no `user_list_path` means empty lists
    pub fn for_server(server: &ServerConfig) -> Self {
        match &server.user_list_path {
            Some(path) => Self::load(path),
            None => Self::default(),
        }
    }
}

/// Hub-wide status of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub username: String,
    pub is_admin: bool,
    pub is_allowed: bool,
    pub is_blocked: bool,
}

impl UserIdentity {
    pub fn resolve(lists: &HubUserLists, username: &str) -> Self {
        let username = username.trim();
        Self {
            username: username.to_string(),
            is_admin: lists.admin_users.contains(username),
            is_allowed: lists.allowed_users.contains(username),
            is_blocked: lists.blocked_users.contains(username),
        }
    }

    /// Blocked users get no menu, even when also allowed or admin
    pub fn may_spawn(&self) -> bool {
        !self.is_blocked
    }
}

/// Users the hub should add to its allow list at start
///
/// Blocked users are always removed, whichever source added them.
pub fn auto_allowed_users(
    server: &ServerConfig,
    registry: &CourseRegistry,
    lists: &HubUserLists,
) -> BTreeSet<String> {
    let mut users = BTreeSet::new();

    if server.auto_add_hub_users() {
        users.extend(lists.admin_users.iter().cloned());
        users.extend(lists.allowed_users.iter().cloned());
    }

    for (key, record) in registry.offerings() {
        let wanted = match key.role {
            Role::Grader => server.auto_add_graders(),
            Role::Student => server.auto_add_students(),
        };
        if wanted {
            users.extend(record.members.iter().cloned());
        }
    }

    users.retain(|u| !lists.blocked_users.contains(u));
    users
}
