//! Exchange mounts: outbound, inbound and feedback channels of one offering.

use super::{MountPlan, VolumeMount};
use crate::commands::nbgrader::PersonalizedChannels;
use crate::config::SpawnSettings;
use crate::types::OfferingKey;
use tracing::{debug, info};

/// Used when personalized outbound is on but the course sets no `assignment_id`
pub const UNKNOWN_ASSIGNMENT: &str = "unknown-assignment";

struct ExchangeRoot<'a> {
    settings: &'a SpawnSettings,
    key: &'a OfferingKey,
}

impl ExchangeRoot<'_> {
    fn mount_path(&self, tail: &[&str]) -> String {
        join(&self.settings.nbgrader_exchange_root, &self.key.offering, tail)
    }

    fn sub_path(&self, tail: &[&str]) -> String {
        let base = format!("{}/{}", self.settings.exchange_volume_subpath, self.key.course);
        join(&base, &self.key.offering, tail)
    }

    fn mount(&self, tail: &[&str], read_only: bool) -> VolumeMount {
        VolumeMount::new(
            self.settings.exchange_volume_name.clone(),
            self.mount_path(tail),
            self.sub_path(tail),
            read_only,
        )
    }
}

fn join(base: &str, offering: &str, tail: &[&str]) -> String {
    let mut path = format!("{}/{}", base, offering);
    for segment in tail {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Student channels; outbound and feedback are read-only, inbound is writable
pub fn push_student_exchange(
    plan: &mut MountPlan,
    settings: &SpawnSettings,
    key: &OfferingKey,
    username: &str,
    channels: PersonalizedChannels,
    assignment_id: Option<&str>,
) {
    let root = ExchangeRoot { settings, key };

    let outbound = if channels.outbound {
        let assignment = assignment_id.unwrap_or_else(|| {
            info!(offering = %key, "Personalized outbound without assignment_id, using placeholder");
            UNKNOWN_ASSIGNMENT
        });
        root.mount(&["personalized-outbound", assignment, username], true)
    } else {
        root.mount(&["outbound"], true)
    };

    let inbound = if channels.inbound {
        root.mount(&["personalized-inbound", username], false)
    } else {
        root.mount(&["inbound"], false)
    };

    let feedback = if channels.feedback {
        root.mount(&["personalized-feedback", username], true)
    } else {
        root.mount(&["feedback"], true)
    };

    debug!(offering = %key, ?channels, "Adding student exchange mounts");
    plan.push(outbound);
    plan.push(inbound);
    plan.push(feedback);
}

/// Graders see the whole offering exchange, writable
pub fn push_grader_exchange(plan: &mut MountPlan, settings: &SpawnSettings, key: &OfferingKey) {
    let root = ExchangeRoot { settings, key };
    debug!(offering = %key, "Adding grader exchange mount");
    plan.push(root.mount(&[], false));
}
