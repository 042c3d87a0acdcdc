//! Soft check that at most one offering per course profile is marked default.

use crate::registry::CourseRegistry;
use crate::types::ProfileSlug;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A course profile with more than one offering marked `default: true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefaultChoiceConflict {
    pub slug: ProfileSlug,
    pub offerings: Vec<String>,
}

impl std::fmt::Display for DefaultChoiceConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} marks {} offerings as default: {}",
            self.slug,
            self.offerings.len(),
            self.offerings.join(", ")
        )
    }
}

/// Report every conflict. Conflicts are warnings; menus still render.
pub fn validate_default_choices(registry: &CourseRegistry) -> Vec<DefaultChoiceConflict> {
    let mut defaults: BTreeMap<ProfileSlug, Vec<String>> = BTreeMap::new();
    for (key, record) in registry.offerings() {
        if record.config.is_default() {
            defaults
                .entry(key.slug())
                .or_default()
                .push(key.offering.clone());
        }
    }

    defaults
        .into_iter()
        .filter(|(_, offerings)| offerings.len() > 1)
        .map(|(slug, offerings)| {
            let conflict = DefaultChoiceConflict { slug, offerings };
            warn!(conflict = %conflict, "Multiple default offerings");
            conflict
        })
        .collect()
}
