//! Spawn plan presentation: mounts table, environment, and hooks.

use super::shared::{format_section_heading, table};
use crate::cli::output::to_json;
use crate::error::HubError;
use crate::spawn::SpawnPlan;

pub fn format_spawn_plan_text(plan: &SpawnPlan) -> String {
    let mut out = format!("{}\n\n", format_section_heading("Spawn plan"));
    out.push_str(&format!("  Selection: {}\n", plan.selection));
    match &plan.granted {
        Some(key) => out.push_str(&format!("  Granted offering: {}\n", key)),
        None => out.push_str("  Granted offering: none (default session)\n"),
    }
    out.push_str(&format!("  Effective role: {}\n\n", plan.effective_role));

    out.push_str(&format!("{}\n\n", format_section_heading("Volume mounts")));
    if plan.mounts.is_empty() {
        out.push_str("  No volume mounts.\n\n");
    } else {
        let mut rows = table(vec!["Volume", "Mount path", "Sub path", "Mode"]);
        for mount in &plan.mounts {
            rows.add_row(vec![
                mount.name.clone(),
                mount.mount_path.clone(),
                mount.sub_path.clone(),
                if mount.read_only { "ro" } else { "rw" }.to_string(),
            ]);
        }
        out.push_str(&format!("{}\n\n", rows));
    }

    out.push_str(&format!("{}\n\n", format_section_heading("Environment")));
    for (key, value) in &plan.environment {
        out.push_str(&format!("  {}={}\n", key, value));
    }

    out.push_str(&format!("\n{}\n\n", format_section_heading("Lifecycle hooks")));
    out.push_str(&format!(
        "  postStart: {}\n",
        plan.lifecycle_hooks.post_start_script()
    ));
    out.push_str(&format!("  preStop: {}\n", plan.lifecycle_hooks.pre_stop.join(" ")));
    out
}

pub fn format_spawn_plan_json(plan: &SpawnPlan) -> Result<String, HubError> {
    to_json(plan)
}
