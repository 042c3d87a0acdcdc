//! Environment source: `COURSEHUB__SECTION__KEY=value` overrides.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "COURSEHUB";

/// Add environment overrides to the builder.
/// `COURSEHUB__SPAWN__GRADER_UID=3000` overrides `spawn.grader_uid`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
