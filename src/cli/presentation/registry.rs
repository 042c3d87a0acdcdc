//! Course tree and user list presentation.

use super::shared::{format_section_heading, table, yes_no};
use crate::cli::output::to_json;
use crate::error::HubError;
use crate::membership::UserIdentity;
use crate::registry::CourseRegistry;
use crate::types::{OfferingKey, Role};
use serde::Serialize;
use std::collections::BTreeSet;

/// One offering of the course tree
#[derive(Debug, Clone, Serialize)]
pub struct CourseRow {
    pub key: OfferingKey,
    pub course: String,
    pub role: Role,
    pub offering: String,
    pub members: usize,
    pub has_member_list: bool,
    pub default: bool,
    pub image: Option<String>,
}

impl CourseRow {
    pub fn collect(registry: &CourseRegistry) -> Vec<CourseRow> {
        registry
            .offerings()
            .map(|(key, record)| CourseRow {
                course: key.course.clone(),
                role: key.role,
                offering: key.offering.clone(),
                members: record.members.len(),
                has_member_list: record.members_source.is_some(),
                default: record.config.is_default(),
                image: record.config.image.clone(),
                key,
            })
            .collect()
    }
}

pub fn format_courses_text(rows: &[CourseRow]) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Courses"));
    if rows.is_empty() {
        out.push_str("No courses found.\n");
        return out;
    }
    let mut t = table(vec!["Course", "Role", "Offering", "Members", "Default", "Image"]);
    for row in rows {
        let members = if row.has_member_list {
            row.members.to_string()
        } else {
            "no list".to_string()
        };
        t.add_row(vec![
            row.course.clone(),
            row.role.to_string(),
            row.offering.clone(),
            members,
            yes_no(row.default).to_string(),
            row.image.clone().unwrap_or_else(|| "(default)".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n", t));
    let courses: BTreeSet<&str> = rows.iter().map(|r| r.course.as_str()).collect();
    out.push_str(&format!(
        "\nTotal: {} course(s), {} offering(s)\n",
        courses.len(),
        rows.len()
    ));
    out
}

pub fn format_courses_json(rows: &[CourseRow]) -> Result<String, HubError> {
    to_json(&serde_json::json!({ "offerings": rows, "total": rows.len() }))
}

/// Hub user lists plus the start-up allow list
#[derive(Debug, Clone, Serialize)]
pub struct UsersOutput {
    pub admin_users: BTreeSet<String>,
    pub allowed_users: BTreeSet<String>,
    pub blocked_users: BTreeSet<String>,
    pub auto_allowed_users: BTreeSet<String>,
}

fn join_or_dash(users: &BTreeSet<String>) -> String {
    if users.is_empty() {
        "-".to_string()
    } else {
        users.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

pub fn format_users_text(output: &UsersOutput) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Hub users"));
    let mut t = table(vec!["List", "Count", "Users"]);
    let lists = [
        ("admin", &output.admin_users),
        ("allowed", &output.allowed_users),
        ("blocked", &output.blocked_users),
        ("auto-allowed", &output.auto_allowed_users),
    ];
    for (name, users) in lists {
        t.add_row(vec![
            name.to_string(),
            users.len().to_string(),
            join_or_dash(users),
        ]);
    }
    out.push_str(&format!("{}\n", t));
    out
}

pub fn format_users_json(output: &UsersOutput) -> Result<String, HubError> {
    to_json(output)
}

pub fn format_identity_text(identity: &UserIdentity) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("User {}", identity.username))
    );
    out.push_str(&format!("  Admin: {}\n", yes_no(identity.is_admin)));
    out.push_str(&format!("  Allowed: {}\n", yes_no(identity.is_allowed)));
    out.push_str(&format!("  Blocked: {}\n", yes_no(identity.is_blocked)));
    out.push_str(&format!("  May spawn: {}\n", yes_no(identity.may_spawn())));
    out
}
