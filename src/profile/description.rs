//! Human-readable profile descriptions shown under each choice.

use super::ProfileOverrides;
use crate::registry::CourseConfig;

const LINE_BREAK: &str = "<br>";

/// Describe resources and node flavor; `verbose_profile_list` adds image and
/// pull policy. Extra description lines are always appended.
pub fn describe(overrides: &ProfileOverrides, config: &CourseConfig) -> String {
    let mut description = format!(
        "resource: {}vCPUs {} RAM, nodes: {}",
        overrides.cpu_limit,
        overrides.mem_limit,
        overrides.node_flavor()
    );

    if config.verbose_profile_list() {
        description.push_str(LINE_BREAK);
        description.push_str(&format!(
            "image: {}, pullPolicy: {}",
            overrides.image, overrides.image_pull_policy
        ));
    }

    for line in &config.extra_profile_description {
        description.push_str(LINE_BREAK);
        description.push_str(line);
    }
    description
}
