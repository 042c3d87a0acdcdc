//! Hub document source: an explicit YAML/TOML/JSON file.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Add the hub document to the builder. The file must exist; its format is
/// detected from the extension.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    config_path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !config_path.is_file() {
        return Err(ConfigError::Message(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }
    Ok(builder.add_source(File::from(config_path).required(true)))
}
