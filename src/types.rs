//! Core identifiers: roles, profile slugs, offering keys, and profile selections.
//!
//! Every composite key has exactly one canonical serialization. Components are
//! joined with `+`; a literal `+` or `%` inside a component is percent-escaped,
//! so a course called `C++` still round-trips.

use crate::error::HubError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '+';

/// Selection value the hub sends when no course profile was chosen.
pub const DEFAULT_SELECTION: &str = "Default";

/// Leading component of an extra-profile selection: `extra+{name}`
pub const EXTRA_PREFIX: &str = "extra";

/// Course role determining mount scope and POSIX identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Grader,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Grader => "grader",
        }
    }

    /// Directory segment used under the home volume.
    pub fn plural(self) -> &'static str {
        match self {
            Role::Student => "students",
            Role::Grader => "graders",
        }
    }

    /// Classify a role directory name by case-insensitive substring.
    ///
    /// `grader` is checked first, so `student_graders` is a grader directory.
    pub fn from_dir_name(name: &str) -> Option<Role> {
        let lower = name.to_lowercase();
        if lower.contains("grader") {
            Some(Role::Grader)
        } else if lower.contains("student") {
            Some(Role::Student)
        } else {
            None
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "grader" => Ok(Role::Grader),
            other => Err(HubError::InvalidSelection(format!(
                "unknown role '{}'",
                other
            ))),
        }
    }
}

fn escape_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for ch in component.chars() {
        match ch {
            '%' => out.push_str("%25"),
            '+' => out.push_str("%2B"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_component(component: &str) -> Result<String, HubError> {
    let mut out = String::with_capacity(component.len());
    let mut rest = component;
    while let Some(idx) = rest.find('%') {
        out.push_str(&rest[..idx]);
        let code = rest.get(idx + 1..idx + 3).ok_or_else(|| {
            HubError::InvalidSelection(format!("truncated escape in '{}'", component))
        })?;
        match code {
            "25" => out.push('%'),
            "2B" | "2b" => out.push('+'),
            other => {
                return Err(HubError::InvalidSelection(format!(
                    "unknown escape '%{}' in '{}'",
                    other, component
                )))
            }
        }
        rest = &rest[idx + 3..];
    }
    out.push_str(rest);
    Ok(out)
}

fn split_key(raw: &str, expected: usize) -> Result<Vec<String>, HubError> {
    let parts: Vec<&str> = raw.split(SEPARATOR).collect();
    if parts.len() != expected || parts.iter().any(|p| p.is_empty()) {
        return Err(HubError::InvalidSelection(format!(
            "expected {} '+'-separated components in '{}'",
            expected, raw
        )));
    }
    parts.into_iter().map(unescape_component).collect()
}

/// Identifies one course profile: `{course}+{role}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileSlug {
    pub course: String,
    pub role: Role,
}

impl ProfileSlug {
    pub fn new(course: impl Into<String>, role: Role) -> Self {
        Self {
            course: course.into(),
            role,
        }
    }

    pub fn offering(&self, offering: impl Into<String>) -> OfferingKey {
        OfferingKey::new(self.course.clone(), self.role, offering)
    }
}

impl fmt::Display for ProfileSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            escape_component(&self.course),
            SEPARATOR,
            self.role
        )
    }
}

impl FromStr for ProfileSlug {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_key(s, 2)?;
        Ok(Self {
            course: parts[0].clone(),
            role: parts[1].parse()?,
        })
    }
}

/// Identifies one offering choice: `{course}+{role}+{offering_id}`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OfferingKey {
    pub course: String,
    pub role: Role,
    pub offering: String,
}

impl OfferingKey {
    pub fn new(course: impl Into<String>, role: Role, offering: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            role,
            offering: offering.into(),
        }
    }

    pub fn slug(&self) -> ProfileSlug {
        ProfileSlug::new(self.course.clone(), self.role)
    }
}

impl fmt::Display for OfferingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            escape_component(&self.course),
            self.role,
            escape_component(&self.offering),
            sep = SEPARATOR
        )
    }
}

impl FromStr for OfferingKey {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_key(s, 3)?;
        Ok(Self {
            course: parts[0].clone(),
            role: parts[1].parse()?,
            offering: parts[2].clone(),
        })
    }
}

impl Serialize for OfferingKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OfferingKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ProfileSlug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Profile selection handed back by the hub at spawn time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Default,
    /// Membership-free profile from the server's extra profile list
    Extra(String),
    Offering(OfferingKey),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Default => f.write_str(DEFAULT_SELECTION),
            Selection::Extra(name) => {
                write!(f, "{}{}{}", EXTRA_PREFIX, SEPARATOR, escape_component(name))
            }
            Selection::Offering(key) => key.fmt(f),
        }
    }
}

impl FromStr for Selection {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == DEFAULT_SELECTION {
            return Ok(Selection::Default);
        }
        if trimmed.split(SEPARATOR).count() == 2 {
            let parts = split_key(trimmed, 2)?;
            if parts[0] != EXTRA_PREFIX {
                return Err(HubError::InvalidSelection(format!(
                    "'{}' is neither an offering key nor an extra profile",
                    trimmed
                )));
            }
            return Ok(Selection::Extra(parts[1].clone()));
        }
        Ok(Selection::Offering(trimmed.parse()?))
    }
}
