//! Profile Menu
//!
//! The spawn profiles offered to one user: a synthetic `Default` entry, the
//! server's extra profiles, and one course profile per (course, role) in which
//! the user holds at least one offering. Menus are computed on demand and
//! never persisted.

mod description;
mod resources;
mod synthesizer;
mod validate;

pub use description::describe;
pub use resources::{default_node_purpose, resolve_overrides, ProfileOverrides};
pub use synthesizer::ProfileSynthesizer;
pub use validate::{validate_default_choices, DefaultChoiceConflict};

use crate::commands::LifecycleHooks;
use crate::config::ResourceDefaults;
use crate::types::{OfferingKey, ProfileSlug, Selection, DEFAULT_SELECTION};
use serde::Serialize;

pub const DEFAULT_DESCRIPTION: &str = "Default notebook server (home directory is not persistent)";

/// The `Default` entry: minimal resources, non-persistent home
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultProfile {
    pub slug: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub is_default: bool,
    pub overrides: ProfileOverrides,
}

impl DefaultProfile {
    pub fn new(defaults: &ResourceDefaults, lifecycle_hooks: LifecycleHooks) -> Self {
        Self {
            slug: DEFAULT_SELECTION,
            display_name: DEFAULT_SELECTION,
            description: DEFAULT_DESCRIPTION,
            is_default: true,
            overrides: ProfileOverrides {
                cpu_limit: 2.0,
                cpu_guarantee: 0.001,
                mem_limit: "0.5G".to_string(),
                mem_guarantee: "0.25G".to_string(),
                image: defaults.image.clone(),
                image_pull_policy: defaults.image_pull_policy.clone(),
                node_affinity_required: Vec::new(),
                lifecycle_hooks: Some(lifecycle_hooks),
            },
        }
    }
}

/// Membership-free profile from `extra_profile_list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraProfile {
    pub name: String,
    /// Selection value for this profile (`extra+{name}`)
    pub slug: String,
    pub display_name: String,
    pub description: String,
    pub overrides: ProfileOverrides,
}

/// One selectable semester offering inside a course profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferingChoice {
    pub key: OfferingKey,
    pub display_name: String,
    pub description: String,
    pub is_default: bool,
    pub overrides: ProfileOverrides,
}

/// Course profile for one (course, role); never empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseProfile {
    pub slug: ProfileSlug,
    /// Plain label used for ordering, e.g. `CS101 (grader)`
    pub label: String,
    /// Label as shown in the selection UI; grader profiles are tinted blue
    pub display_name: String,
    pub choices: Vec<OfferingChoice>,
}

impl CourseProfile {
    pub fn choice(&self, key: &OfferingKey) -> Option<&OfferingChoice> {
        self.choices.iter().find(|c| &c.key == key)
    }
}

/// Menu for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileMenu {
    pub username: String,
    /// Blocked users get a suppressed menu with no entries at all
    pub suppressed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultProfile>,
    pub extra_profiles: Vec<ExtraProfile>,
    pub courses: Vec<CourseProfile>,
}

impl ProfileMenu {
    pub fn suppressed(username: &str) -> Self {
        Self {
            username: username.to_string(),
            suppressed: true,
            default: None,
            extra_profiles: Vec::new(),
            courses: Vec::new(),
        }
    }

    pub fn course(&self, slug: &ProfileSlug) -> Option<&CourseProfile> {
        self.courses.iter().find(|c| &c.slug == slug)
    }

    pub fn choice(&self, key: &OfferingKey) -> Option<&OfferingChoice> {
        self.course(&key.slug())?.choice(key)
    }

    /// Extra profile by id, ignoring ASCII case
    pub fn extra_profile(&self, name: &str) -> Option<&ExtraProfile> {
        self.extra_profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Whether `selection` is offered by this menu
    pub fn offers(&self, selection: &Selection) -> bool {
        match selection {
            Selection::Default => self.default.is_some(),
            Selection::Extra(name) => self.extra_profile(name).is_some(),
            Selection::Offering(key) => self.choice(key).is_some(),
        }
    }

    /// Offering choices across all course profiles, in menu order
    pub fn choices(&self) -> impl Iterator<Item = &OfferingChoice> {
        self.courses.iter().flat_map(|c| c.choices.iter())
    }

    /// Number of selectable entries including `Default`
    pub fn entry_count(&self) -> usize {
        usize::from(self.default.is_some()) + self.extra_profiles.len() + self.choices().count()
    }
}
