//! Merge rules: defaults, override order, conflict handling.
//!
//! Precedence (lowest to highest): these defaults, the hub document, then
//! `COURSEHUB__*` environment overrides.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("spawn.batch_username_pattern", "2s")
}
