//! Course registry: in-memory index of courses, roles, offerings, their
//! configuration, and member lists.
//!
//! Built fresh from the course tree on every resolution pass and never mutated
//! afterwards.

mod course_config;
mod loader;
pub mod members;
pub mod walker;

pub use course_config::{
    format_gigabytes, CourseConfig, MatchExpression, MemorySize, NodeAffinity, ResourceOverrides,
    NODE_PURPOSE_LABEL,
};
pub use loader::RegistryLoader;

use crate::types::{OfferingKey, Role};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One semester offering of a course for one role
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferingRecord {
    pub config: CourseConfig,
    /// Trimmed, deduplicated usernames
    pub members: Vec<String>,
    pub config_path: PathBuf,
    pub members_source: Option<PathBuf>,
}

impl OfferingRecord {
    /// Exact match after trimming
    pub fn has_member(&self, username: &str) -> bool {
        let username = username.trim();
        self.members.iter().any(|m| m == username)
    }
}

/// Offerings of one course, by role then offering id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseEntry {
    pub roles: BTreeMap<Role, BTreeMap<String, OfferingRecord>>,
}

impl CourseEntry {
    pub fn offerings(&self, role: Role) -> Option<&BTreeMap<String, OfferingRecord>> {
        self.roles.get(&role)
    }
}

/// Registry of all courses found under the course root
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseRegistry {
    courses: BTreeMap<String, CourseEntry>,
}

impl CourseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Number of courses
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Number of offerings across all courses and roles
    pub fn offering_count(&self) -> usize {
        self.courses
            .values()
            .flat_map(|entry| entry.roles.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// Insert an offering; a repeated id within (course, role) replaces the
    /// earlier one, which is returned
    pub fn insert(&mut self, key: OfferingKey, record: OfferingRecord) -> Option<OfferingRecord> {
        self.courses
            .entry(key.course)
            .or_default()
            .roles
            .entry(key.role)
            .or_default()
            .insert(key.offering, record)
    }

    pub fn course(&self, name: &str) -> Option<&CourseEntry> {
        self.courses.get(name)
    }

    pub fn courses(&self) -> impl Iterator<Item = (&str, &CourseEntry)> {
        self.courses.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn get(&self, key: &OfferingKey) -> Option<&OfferingRecord> {
        self.courses
            .get(&key.course)?
            .roles
            .get(&key.role)?
            .get(&key.offering)
    }

    /// Every offering with its key, in course/role/offering order
    pub fn offerings(&self) -> impl Iterator<Item = (OfferingKey, &OfferingRecord)> {
        self.courses.iter().flat_map(|(course, entry)| {
            entry.roles.iter().flat_map(move |(role, offerings)| {
                offerings.iter().map(move |(offering, record)| {
                    (OfferingKey::new(course.clone(), *role, offering.clone()), record)
                })
            })
        })
    }
}
