//! Registry loader: walks `course_root/{course}/{role_dir}/{offering}.yaml`
//! and pairs each config with `{offering}.csv` when present.

use super::members::read_usernames;
use super::walker::Walker;
use super::{CourseConfig, CourseRegistry, OfferingRecord};
use crate::error::RegistryError;
use crate::types::{OfferingKey, Role};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct RegistryLoader;

impl RegistryLoader {
    /// Build the registry from a course root.
    ///
    /// Only a missing or unreadable root is an error. Course directories without
    /// a role directory are skipped; per-offering problems degrade to empty
    /// config or empty member lists.
    pub fn load(course_root: &Path) -> Result<CourseRegistry, RegistryError> {
        if !course_root.exists() {
            return Err(RegistryError::CourseRootMissing(course_root.to_path_buf()));
        }
        if !course_root.is_dir() {
            return Err(RegistryError::CourseRootNotDirectory(
                course_root.to_path_buf(),
            ));
        }

        let mut registry = CourseRegistry::new();
        for course_path in Walker::new(course_root).directories()? {
            let Some(course_name) = dir_name(&course_path) else {
                continue;
            };
            load_course(&mut registry, &course_name, &course_path);
        }

        info!(
            course_root = %course_root.display(),
            courses = registry.len(),
            offerings = registry.offering_count(),
            "Loaded course registry"
        );
        Ok(registry)
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

fn load_course(registry: &mut CourseRegistry, course_name: &str, course_path: &Path) {
    let role_dirs = match Walker::new(course_path).directories() {
        Ok(dirs) => dirs,
        Err(e) => {
            debug!(course = course_name, error = %e, "Skipping unreadable course directory");
            return;
        }
    };

    let role_dirs: Vec<(Role, PathBuf)> = role_dirs
        .into_iter()
        .filter_map(|path| {
            let role = Role::from_dir_name(&dir_name(&path)?)?;
            Some((role, path))
        })
        .collect();

    if role_dirs.is_empty() {
        debug!(course = course_name, "No role directory, course not registered");
        return;
    }

    for (role, role_path) in role_dirs {
        load_role_dir(registry, course_name, role, &role_path);
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

fn load_role_dir(registry: &mut CourseRegistry, course_name: &str, role: Role, role_path: &Path) {
    let files = match Walker::new(role_path).files() {
        Ok(files) => files,
        Err(e) => {
            debug!(path = %role_path.display(), error = %e, "Skipping unreadable role directory");
            return;
        }
    };

    let member_files: BTreeMap<String, PathBuf> = files
        .iter()
        .filter(|p| has_extension(p, &["csv"]))
        .filter_map(|p| Some((file_stem(p)?, p.clone())))
        .collect();

    for config_path in files.iter().filter(|p| has_extension(p, &["yaml", "yml"])) {
        let Some(offering_id) = file_stem(config_path) else {
            continue;
        };
        let config = CourseConfig::load(config_path);
        let members_source = member_files.get(&offering_id).cloned();
        let members = match &members_source {
            Some(path) => read_usernames(path),
            None => {
                debug!(
                    course = course_name,
                    role = %role,
                    offering = %offering_id,
                    "No member list, offering has no members"
                );
                Vec::new()
            }
        };

        let replaced = registry.insert(
            OfferingKey::new(course_name, role, offering_id.clone()),
            OfferingRecord {
                config,
                members,
                config_path: config_path.clone(),
                members_source,
            },
        );
        if let Some(previous) = replaced {
            warn!(
                course = course_name,
                role = %role,
                offering = %offering_id,
                kept = %config_path.display(),
                dropped = %previous.config_path.display(),
                "Offering config found twice, keeping the later file"
            );
        }
    }
}
