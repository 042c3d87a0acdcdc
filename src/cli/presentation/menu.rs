//! Menu presentation: one row per selectable entry.

use super::shared::{format_section_heading, table, yes_no};
use crate::cli::output::to_json;
use crate::error::HubError;
use crate::profile::{ProfileMenu, ProfileOverrides};

fn resources(overrides: &ProfileOverrides) -> String {
    format!(
        "{} / {} vCPU, {} / {}",
        overrides.cpu_guarantee, overrides.cpu_limit, overrides.mem_guarantee, overrides.mem_limit
    )
}

pub fn format_menu_text(menu: &ProfileMenu) -> String {
    let mut out = format!(
        "{}\n\n",
        format_section_heading(&format!("Profiles for {}", menu.username))
    );
    if menu.suppressed {
        out.push_str("User is blocked; no profiles are offered.\n");
        return out;
    }

    let mut rows = table(vec!["Profile", "Choice", "Selection", "Resources", "Image", "Default"]);
    if let Some(default) = &menu.default {
        rows.add_row(vec![
            default.display_name.to_string(),
            "-".to_string(),
            default.slug.to_string(),
            resources(&default.overrides),
            default.overrides.image.clone(),
            yes_no(default.is_default).to_string(),
        ]);
    }
    for extra in &menu.extra_profiles {
        rows.add_row(vec![
            extra.display_name.clone(),
            "-".to_string(),
            extra.slug.clone(),
            resources(&extra.overrides),
            extra.overrides.image.clone(),
            yes_no(false).to_string(),
        ]);
    }
    for course in &menu.courses {
        for choice in &course.choices {
            rows.add_row(vec![
                course.label.clone(),
                choice.display_name.clone(),
                choice.key.to_string(),
                resources(&choice.overrides),
                choice.overrides.image.clone(),
                yes_no(choice.is_default).to_string(),
            ]);
        }
    }
    out.push_str(&format!("{}\n", rows));
    out.push_str(&format!("\nTotal: {} selectable profile(s)\n", menu.entry_count()));
    out
}

pub fn format_menu_json(menu: &ProfileMenu) -> Result<String, HubError> {
    to_json(menu)
}
