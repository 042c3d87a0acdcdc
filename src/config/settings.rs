//! Deployment settings: volume layout, config file paths, POSIX identities,
//! and spawner resource defaults.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Spawner-side settings shared by every server in a deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnSettings {
    #[serde(default = "default_ipython_config_path")]
    pub ipython_config_path: String,
    #[serde(default = "default_nbgrader_config_path")]
    pub nbgrader_config_path: String,

    #[serde(default = "default_home_volume_name")]
    pub home_volume_name: String,
    #[serde(default = "default_home_volume_subpath")]
    pub home_volume_subpath: String,
    #[serde(default = "default_home_volume_mountpath")]
    pub home_volume_mountpath: String,

    #[serde(default = "default_home_volume_name")]
    pub course_volume_name: String,
    #[serde(default = "default_course_volume_subpath")]
    pub course_volume_subpath: String,
    #[serde(default = "default_course_volume_mountpath")]
    pub course_volume_mountpath: String,

    #[serde(default = "default_shared_volume_name")]
    pub exchange_volume_name: String,
    #[serde(default = "default_exchange_volume_subpath")]
    pub exchange_volume_subpath: String,
    #[serde(default = "default_exchange_root")]
    pub nbgrader_exchange_root: String,

    #[serde(default = "default_shared_volume_name")]
    pub share_volume_name: String,
    #[serde(default = "default_share_volume_subpath")]
    pub share_volume_subpath: String,
    #[serde(default = "default_extra_volume_mountpath")]
    pub extra_volume_mountpath: String,

    /// Volume holding the hub's own configuration tree
    #[serde(default = "default_home_volume_name")]
    pub config_volume_name: String,
    #[serde(default = "default_config_volume_subpath")]
    pub config_volume_subpath: String,
    #[serde(default = "default_config_volume_mountpath")]
    pub config_volume_mountpath: String,

    #[serde(default = "default_student_id")]
    pub student_uid: u32,
    #[serde(default = "default_student_id")]
    pub student_gid: u32,
    #[serde(default = "default_grader_id")]
    pub grader_uid: u32,
    #[serde(default = "default_grader_id")]
    pub grader_gid: u32,

    /// Usernames matching this pattern belong to student graders
    #[serde(default = "default_batch_username_pattern")]
    pub batch_username_pattern: String,

    #[serde(default)]
    pub defaults: ResourceDefaults,
}

/// Spawner resource defaults used when a course does not override them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDefaults {
    #[serde(default = "default_image")]
    pub image: String,
    #[serde(default = "default_pull_policy")]
    pub image_pull_policy: String,
    #[serde(default = "default_cpu_limit")]
    pub cpu_limit: f64,
    #[serde(default = "default_cpu_guarantee")]
    pub cpu_guarantee: f64,
    /// Bytes
    #[serde(default = "default_mem_limit")]
    pub mem_limit: u64,
    /// Bytes
    #[serde(default = "default_mem_guarantee")]
    pub mem_guarantee: u64,
}

fn default_ipython_config_path() -> String {
    "/etc/ipython/ipython_config.py".to_string()
}

fn default_nbgrader_config_path() -> String {
    "/etc/jupyter/nbgrader_config.py".to_string()
}

fn default_home_volume_name() -> String {
    "disk2".to_string()
}

fn default_home_volume_subpath() -> String {
    "homes".to_string()
}

fn default_home_volume_mountpath() -> String {
    "/home/jovyan".to_string()
}

fn default_course_volume_subpath() -> String {
    "courses".to_string()
}

fn default_course_volume_mountpath() -> String {
    "/home/jovyan/courses".to_string()
}

fn default_shared_volume_name() -> String {
    "disk3".to_string()
}

fn default_exchange_volume_subpath() -> String {
    "nbgrader/exchanges".to_string()
}

fn default_exchange_root() -> String {
    "/srv/nbgrader/exchange".to_string()
}

fn default_share_volume_subpath() -> String {
    "shares/teaching".to_string()
}

fn default_extra_volume_mountpath() -> String {
    "/srv/shares".to_string()
}

fn default_config_volume_subpath() -> String {
    "hub-config".to_string()
}

fn default_config_volume_mountpath() -> String {
    "/srv/hub-config".to_string()
}

fn default_student_id() -> u32 {
    1000
}

fn default_grader_id() -> u32 {
    2000
}

fn default_batch_username_pattern() -> String {
    "2s".to_string()
}

fn default_image() -> String {
    "ghcr.io/digiklausur/docker-stacks/notebook:latest".to_string()
}

fn default_pull_policy() -> String {
    "IfNotPresent".to_string()
}

fn default_cpu_limit() -> f64 {
    2.0
}

fn default_cpu_guarantee() -> f64 {
    0.5
}

fn default_mem_limit() -> u64 {
    2_000_000_000
}

fn default_mem_guarantee() -> u64 {
    1_000_000_000
}

impl Default for ResourceDefaults {
    fn default() -> Self {
        Self {
            image: default_image(),
            image_pull_policy: default_pull_policy(),
            cpu_limit: default_cpu_limit(),
            cpu_guarantee: default_cpu_guarantee(),
            mem_limit: default_mem_limit(),
            mem_guarantee: default_mem_guarantee(),
        }
    }
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            ipython_config_path: default_ipython_config_path(),
            nbgrader_config_path: default_nbgrader_config_path(),
            home_volume_name: default_home_volume_name(),
            home_volume_subpath: default_home_volume_subpath(),
            home_volume_mountpath: default_home_volume_mountpath(),
            course_volume_name: default_home_volume_name(),
            course_volume_subpath: default_course_volume_subpath(),
            course_volume_mountpath: default_course_volume_mountpath(),
            exchange_volume_name: default_shared_volume_name(),
            exchange_volume_subpath: default_exchange_volume_subpath(),
            nbgrader_exchange_root: default_exchange_root(),
            share_volume_name: default_shared_volume_name(),
            share_volume_subpath: default_share_volume_subpath(),
            extra_volume_mountpath: default_extra_volume_mountpath(),
            config_volume_name: default_home_volume_name(),
            config_volume_subpath: default_config_volume_subpath(),
            config_volume_mountpath: default_config_volume_mountpath(),
            student_uid: default_student_id(),
            student_gid: default_student_id(),
            grader_uid: default_grader_id(),
            grader_gid: default_grader_id(),
            batch_username_pattern: default_batch_username_pattern(),
            defaults: ResourceDefaults::default(),
        }
    }
}

impl SpawnSettings {
    /// Compiled batch pattern; an invalid pattern matches nobody
    pub fn batch_username_regex(&self) -> Option<Regex> {
        Regex::new(&self.batch_username_pattern).ok()
    }

    /// Validate settings, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mount_paths = [
            ("home_volume_mountpath", &self.home_volume_mountpath),
            ("course_volume_mountpath", &self.course_volume_mountpath),
            ("nbgrader_exchange_root", &self.nbgrader_exchange_root),
            ("extra_volume_mountpath", &self.extra_volume_mountpath),
            ("config_volume_mountpath", &self.config_volume_mountpath),
        ];
        for (key, value) in mount_paths {
            if value.trim().is_empty() {
                errors.push(format!("{} cannot be empty", key));
            }
        }

        if let Err(e) = Regex::new(&self.batch_username_pattern) {
            errors.push(format!("Invalid batch_username_pattern: {}", e));
        }

        if self.defaults.cpu_guarantee > self.defaults.cpu_limit {
            errors.push("defaults.cpu_guarantee exceeds defaults.cpu_limit".to_string());
        }
        if self.defaults.mem_guarantee > self.defaults.mem_limit {
            errors.push("defaults.mem_guarantee exceeds defaults.mem_limit".to_string());
        }

        errors
    }
}
