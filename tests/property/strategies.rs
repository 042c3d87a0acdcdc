//! Registry generators shared by the property tests

use coursehub::registry::{CourseConfig, CourseRegistry, OfferingRecord};
use coursehub::types::{OfferingKey, Role};
use proptest::prelude::*;

pub const USERS: [&str; 4] = ["alice", "bob", "carol", "2s12345"];
const COURSES: [&str; 3] = ["CS101", "MA200", "C++"];
const OFFERINGS: [&str; 3] = ["WS24", "SS25", "WS25"];

/// One generated offering: course, role, offering, member bitmask, commands
#[derive(Debug, Clone)]
pub struct OfferingSpec {
    pub course: usize,
    pub grader: bool,
    pub offering: usize,
    pub members: u8,
    pub course_cmds: Vec<String>,
    pub mount_prev_courses: Option<bool>,
}

impl OfferingSpec {
    pub fn key(&self) -> OfferingKey {
        let role = if self.grader { Role::Grader } else { Role::Student };
        let course = COURSES[self.course];
        OfferingKey::new(course, role, format!("{}-{}", course, OFFERINGS[self.offering]))
    }

    pub fn member_names(&self) -> Vec<String> {
        USERS
            .iter()
            .enumerate()
            .filter(|(i, _)| self.members & (1 << i) != 0)
            .map(|(_, u)| u.to_string())
            .collect()
    }
}

pub fn offering_spec() -> impl Strategy<Value = OfferingSpec> {
    (
        0..COURSES.len(),
        any::<bool>(),
        0..OFFERINGS.len(),
        0u8..16,
        prop::collection::vec("[a-z]{1,8}", 0..4),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(course, grader, offering, members, words, mount_prev_courses)| OfferingSpec {
                course,
                grader,
                offering,
                members,
                course_cmds: words.into_iter().map(|w| format!("echo {}", w)).collect(),
                mount_prev_courses,
            },
        )
}

pub fn registry_specs() -> impl Strategy<Value = Vec<OfferingSpec>> {
    prop::collection::vec(offering_spec(), 0..12)
}

pub fn build_registry(specs: &[OfferingSpec]) -> CourseRegistry {
    let mut registry = CourseRegistry::new();
    for spec in specs {
        registry.insert(
            spec.key(),
            OfferingRecord {
                config: CourseConfig {
                    course_cmds: spec.course_cmds.clone(),
                    mount_prev_courses: spec.mount_prev_courses,
                    exchange: Some(Default::default()),
                    ..Default::default()
                },
                members: spec.member_names(),
                ..Default::default()
            },
        );
    }
    registry
}

pub fn user() -> impl Strategy<Value = &'static str> {
    prop::sample::select(USERS.to_vec())
}
