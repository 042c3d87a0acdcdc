//! Mount resolution in fixed order: home, course tree, exchange,
//! admin/course config, shared mounts, extra mounts.

use super::exchange::{push_grader_exchange, push_student_exchange};
use super::{Identity, MountPlan, VolumeMount};
use crate::commands::nbgrader::{effective_exchange, PersonalizedChannels};
use crate::config::{ServerConfig, SpawnSettings};
use crate::membership::UserIdentity;
use crate::registry::{CourseRegistry, OfferingRecord};
use crate::types::{OfferingKey, Role, Selection};
use serde::Serialize;
use tracing::{debug, info};

/// Inputs shared by every resolution for one user
pub struct MountContext<'a> {
    pub settings: &'a SpawnSettings,
    pub server: &'a ServerConfig,
    pub registry: &'a CourseRegistry,
    pub user: &'a UserIdentity,
}

/// Mounts and identity for one selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MountResolution {
    /// Offering actually granted; `None` for Default, extra profiles, and non-members
    pub granted: Option<OfferingKey>,
    pub plan: MountPlan,
    pub identity: Identity,
}

impl MountResolution {
    pub fn effective_role(&self) -> Role {
        self.granted.as_ref().map(|k| k.role).unwrap_or(Role::Student)
    }
}

/// Resolve mounts and identity for `selection`.
///
/// An offering the user is not a member of resolves like `Default`: no course
/// mounts and the student identity.
pub fn resolve_mounts(ctx: &MountContext<'_>, selection: &Selection) -> MountResolution {
    let username = ctx.user.username.as_str();
    let mut plan = MountPlan::new();

    let granted = match selection {
        Selection::Offering(key) => match ctx.registry.get(key) {
            Some(record) if record.has_member(username) => Some((key, record)),
            Some(_) => {
                info!(user = username, offering = %key, "User is not a member of the selected offering, using default session");
                None
            }
            None => {
                info!(user = username, offering = %key, "Selected offering not found, using default session");
                None
            }
        },
        Selection::Default | Selection::Extra(_) => None,
    };

    match granted {
        Some((key, record)) => push_offering_mounts(ctx, &mut plan, key, record),
        None => {
            push_config_mounts(ctx, &mut plan, None);
            if let Selection::Extra(name) = selection {
                debug!(profile = %name, "Extra profile, public share only");
                push_public_share(ctx.settings, &mut plan, true);
                push_extra_mounts(ctx.server, &mut plan, true);
            }
        }
    }

    let role = granted.map(|(k, _)| k.role).unwrap_or(Role::Student);
    MountResolution {
        granted: granted.map(|(k, _)| k.clone()),
        plan,
        identity: Identity::for_role(ctx.settings, role, username),
    }
}

fn push_offering_mounts(
    ctx: &MountContext<'_>,
    plan: &mut MountPlan,
    key: &OfferingKey,
    record: &OfferingRecord,
) {
    let settings = ctx.settings;
    let username = ctx.user.username.as_str();

    push_home(ctx, plan, key);

    if key.role == Role::Grader {
        push_course_tree(settings, plan, key, record, username);
    }

    if ctx.server.nbgrader_enabled() {
        if effective_exchange(&record.config, ctx.server).is_some() {
            match key.role {
                Role::Grader => push_grader_exchange(plan, settings, key),
                Role::Student => push_student_exchange(
                    plan,
                    settings,
                    key,
                    username,
                    PersonalizedChannels::resolve(&record.config, ctx.server),
                    record.config.assignment_id.as_deref(),
                ),
            }
        } else {
            debug!(offering = %key, "No exchange declared, skipping exchange mounts");
        }
    }

    push_config_mounts(ctx, plan, Some(key));

    let read_only = key.role == Role::Student;
    push_public_share(settings, plan, read_only);
    plan.push(VolumeMount::new(
        settings.share_volume_name.clone(),
        format!("{}/{}", settings.extra_volume_mountpath, key.course),
        format!("{}/courses/{}", settings.share_volume_subpath, key.course),
        read_only,
    ));
    push_extra_mounts(ctx.server, plan, read_only);
}

fn push_home(ctx: &MountContext<'_>, plan: &mut MountPlan, key: &OfferingKey) {
    let settings = ctx.settings;
    let mut sub_path = format!(
        "{}/{}/{}",
        settings.home_volume_subpath,
        ctx.server.mode().as_str(),
        key.role.plural()
    );
    if key.role == Role::Student {
        sub_path.push('/');
        sub_path.push_str(&key.offering);
    }
    sub_path.push('/');
    sub_path.push_str(&ctx.user.username);

    plan.push(VolumeMount::new(
        settings.home_volume_name.clone(),
        settings.home_volume_mountpath.clone(),
        sub_path,
        false,
    ));
}

/// Whole course for graders; a batch-named grader of a course with
/// `mount_prev_courses: false` sees only the selected offering.
fn push_course_tree(
    settings: &SpawnSettings,
    plan: &mut MountPlan,
    key: &OfferingKey,
    record: &OfferingRecord,
    username: &str,
) {
    let mut mount_path = format!("{}/{}", settings.course_volume_mountpath, key.course);
    let mut sub_path = format!("{}/{}", settings.course_volume_subpath, key.course);

    let is_batch_user = settings
        .batch_username_regex()
        .map(|re| re.is_match(username))
        .unwrap_or(false);
    if !record.config.mount_prev_courses() && is_batch_user {
        debug!(user = username, offering = %key, "Narrowing course mount to the selected offering");
        mount_path = format!("{}/{}", mount_path, key.offering);
        sub_path = format!("{}/{}", sub_path, key.offering);
    }

    plan.push(VolumeMount::new(
        settings.course_volume_name.clone(),
        mount_path,
        sub_path,
        false,
    ));
}

/// Server config for admins, else the course config directory for graders
fn push_config_mounts(ctx: &MountContext<'_>, plan: &mut MountPlan, key: Option<&OfferingKey>) {
    let settings = ctx.settings;
    if ctx.user.is_admin && ctx.server.mount_server_config() {
        debug!(user = %ctx.user.username, "Mounting server config for admin");
        plan.push(VolumeMount::new(
            settings.config_volume_name.clone(),
            settings.config_volume_mountpath.clone(),
            settings.config_volume_subpath.clone(),
            false,
        ));
        return;
    }

    if let Some(key) = key.filter(|k| k.role == Role::Grader) {
        if ctx.server.mount_course_config() {
            plan.push(VolumeMount::new(
                settings.config_volume_name.clone(),
                format!("{}/courses/{}", settings.config_volume_mountpath, key.course),
                format!("{}/courses/{}", settings.config_volume_subpath, key.course),
                false,
            ));
        }
    }
}

fn push_public_share(settings: &SpawnSettings, plan: &mut MountPlan, read_only: bool) {
    plan.push(VolumeMount::new(
        settings.share_volume_name.clone(),
        format!("{}/public", settings.extra_volume_mountpath),
        format!("{}/public", settings.share_volume_subpath),
        read_only,
    ));
}

fn push_extra_mounts(server: &ServerConfig, plan: &mut MountPlan, read_only: bool) {
    for spec in server.extra_mounts() {
        debug!(mount_path = %spec.mount_path, "Adding extra mount");
        plan.push(VolumeMount::new(
            spec.name.clone(),
            spec.mount_path.clone(),
            spec.sub_path.clone(),
            read_only,
        ));
    }
}
