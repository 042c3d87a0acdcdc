//! Shared test utilities for integration tests
//!
//! `CourseTree` lays out a course root and a user-list directory inside a
//! temporary directory; `with_env` serializes access to process environment
//! variables so config tests can run in parallel with everything else.

use coursehub::config::{HubConfig, NbgraderConfig};
use coursehub::engine::HubEngine;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set, restoring the previous values afterwards.
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, previous) in saved {
        match previous {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }
    result
}

/// Course root plus user-list directory in a temporary directory
pub struct CourseTree {
    dir: TempDir,
}

impl CourseTree {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("courses")).unwrap();
        fs::create_dir_all(dir.path().join("users")).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("courses")
    }

    pub fn user_list_dir(&self) -> PathBuf {
        self.dir.path().join("users")
    }

    /// Write `{course}/{role_dir}/{offering}.yaml` and, when `members` is
    /// given, the matching CSV.
    pub fn offering(
        &self,
        course: &str,
        role_dir: &str,
        offering: &str,
        yaml: &str,
        members: Option<&[&str]>,
    ) -> &Self {
        let dir = self.root().join(course).join(role_dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.yaml", offering)), yaml).unwrap();
        if let Some(members) = members {
            fs::write(dir.join(format!("{}.csv", offering)), members_csv(members)).unwrap();
        }
        self
    }

    /// Write a hub-wide user list such as `blocked_users.csv`.
    pub fn user_list(&self, file_name: &str, users: &[&str]) -> &Self {
        fs::write(self.user_list_dir().join(file_name), members_csv(users)).unwrap();
        self
    }

    /// Configuration pointing at this tree with nbgrader enabled
    pub fn config(&self) -> HubConfig {
        let mut config = HubConfig::default();
        config.server.nbgrader = Some(NbgraderConfig {
            course_dir: Some(self.root()),
            ..Default::default()
        });
        config.server.user_list_path = Some(self.user_list_dir());
        config
    }

    pub fn engine(&self) -> HubEngine {
        HubEngine::new(self.config())
    }
}

pub fn members_csv(users: &[&str]) -> String {
    let mut csv = String::from("Username,Email\n");
    for user in users {
        csv.push_str(user);
        csv.push_str(",\n");
    }
    csv
}
