//! Profile synthesis: registry + membership → menu.
//!
//! One command log is built per synthesis call. Each offering's nbgrader
//! commands are pushed inside a checkpoint and rewound before the next
//! offering, so a choice's post-start hook carries only the base commands and
//! its own.

use super::{
    describe, resolve_overrides, CourseProfile, DefaultProfile, ExtraProfile, OfferingChoice,
    ProfileMenu,
};
use crate::commands::nbgrader::{base_commands, push_offering_commands, OfferingContext};
use crate::commands::{CommandLog, LifecycleHooks};
use crate::config::{ServerConfig, SpawnSettings};
use crate::membership::{Membership, UserIdentity};
use crate::registry::{CourseRegistry, OfferingRecord};
use crate::types::{OfferingKey, ProfileSlug, Role, Selection};
use tracing::{debug, info};

/// Grader profiles are tinted so they stand out from student profiles
fn grader_label(label: &str) -> String {
    format!("<span style=\"color:blue;\">{}</span>", label)
}

pub struct ProfileSynthesizer<'a> {
    settings: &'a SpawnSettings,
    server: &'a ServerConfig,
    registry: &'a CourseRegistry,
}

impl<'a> ProfileSynthesizer<'a> {
    pub fn new(
        settings: &'a SpawnSettings,
        server: &'a ServerConfig,
        registry: &'a CourseRegistry,
    ) -> Self {
        Self {
            settings,
            server,
            registry,
        }
    }

    /// Full menu for `identity`. Blocked users get a suppressed menu.
    pub fn synthesize(&self, identity: &UserIdentity) -> ProfileMenu {
        if !identity.may_spawn() {
            info!(user = %identity.username, "User is blocked, suppressing profile menu");
            return ProfileMenu::suppressed(&identity.username);
        }

        let membership = Membership::resolve(self.registry, &identity.username);
        let mut log = base_commands(self.settings, self.server);

        let default = DefaultProfile::new(&self.settings.defaults, log.lifecycle_hooks());
        let extra_profiles = self.extra_profiles(&log);

        let mut courses = self.course_profiles(&membership, Role::Grader, &mut log);
        courses.extend(self.course_profiles(&membership, Role::Student, &mut log));
        courses.sort_by(|a, b| a.label.cmp(&b.label));

        debug!(
            user = %identity.username,
            courses = courses.len(),
            extra_profiles = extra_profiles.len(),
            "Synthesized profile menu"
        );

        ProfileMenu {
            username: identity.username.clone(),
            suppressed: false,
            default: Some(default),
            extra_profiles,
            courses,
        }
    }

    fn extra_profiles(&self, log: &CommandLog) -> Vec<ExtraProfile> {
        self.server
            .extra_profiles()
            .into_iter()
            .map(|(name, config)| {
                let overrides = resolve_overrides(&self.settings.defaults, config, Role::Student);
                let label = config.course_display_name.as_deref().unwrap_or(name);
                ExtraProfile {
                    name: name.to_string(),
                    slug: Selection::Extra(name.to_string()).to_string(),
                    display_name: format!("{} ({})", label, Role::Student),
                    description: describe(&overrides, config),
                    overrides: overrides.with_lifecycle_hooks(log.lifecycle_hooks()),
                }
            })
            .collect()
    }

    /// Course profiles for `role` in which the user holds at least one offering.
    ///
    /// `log` is left exactly as it was passed in.
    pub fn course_profiles(
        &self,
        membership: &Membership,
        role: Role,
        log: &mut CommandLog,
    ) -> Vec<CourseProfile> {
        let mut profiles = Vec::new();

        for (course_name, entry) in self.registry.courses() {
            let Some(offerings) = entry.offerings(role) else {
                continue;
            };
            let slug = ProfileSlug::new(course_name, role);

            let mut course_display_name = None;
            let mut choices = Vec::new();
            for (offering_id, record) in offerings {
                let key = slug.offering(offering_id.as_str());
                if !membership.contains(&key) {
                    continue;
                }
                if course_display_name.is_none() {
                    course_display_name = record.config.course_display_name.clone();
                }
                choices.push(log.scoped(|log| self.offering_choice(key, record, log)));
            }

            if choices.is_empty() {
                debug!(profile = %slug, "No member offerings, dropping course profile");
                continue;
            }
            choices.sort_by(|a, b| a.display_name.cmp(&b.display_name));

            let label = format!(
                "{} ({})",
                course_display_name.as_deref().unwrap_or(course_name),
                role
            );
            let display_name = match role {
                Role::Grader => grader_label(&label),
                Role::Student => label.clone(),
            };
            profiles.push(CourseProfile {
                slug,
                label,
                display_name,
                choices,
            });
        }
        profiles
    }

    fn offering_choice(
        &self,
        key: OfferingKey,
        record: &OfferingRecord,
        log: &mut CommandLog,
    ) -> OfferingChoice {
        let hooks = self.push_offering(&key, record, log);
        let overrides = resolve_overrides(&self.settings.defaults, &record.config, key.role);
        let description = describe(&overrides, &record.config);
        OfferingChoice {
            display_name: record
                .config
                .choice_display_name
                .clone()
                .unwrap_or_else(|| key.offering.clone()),
            description,
            is_default: record.config.is_default(),
            overrides: overrides.with_lifecycle_hooks(hooks),
            key,
        }
    }

    fn push_offering(
        &self,
        key: &OfferingKey,
        record: &OfferingRecord,
        log: &mut CommandLog,
    ) -> LifecycleHooks {
        let added = push_offering_commands(
            log,
            self.settings,
            self.server,
            &OfferingContext {
                course_name: &key.course,
                offering_id: &key.offering,
                role: key.role,
                config: &record.config,
            },
        );
        debug!(offering = %key, commands = added, "Accumulated offering commands");
        log.lifecycle_hooks()
    }

    /// Lifecycle hooks for a spawn: base commands, plus the offering's own
    /// commands when one was granted.
    pub fn lifecycle_hooks(&self, granted: Option<(&OfferingKey, &OfferingRecord)>) -> LifecycleHooks {
        let mut log = base_commands(self.settings, self.server);
        match granted {
            Some((key, record)) => log.scoped(|log| self.push_offering(key, record, log)),
            None => log.lifecycle_hooks(),
        }
    }
}
