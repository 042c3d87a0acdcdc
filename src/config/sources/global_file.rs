//! Global hub document: `$XDG_CONFIG_HOME/coursehub/hub.yaml` (or the platform
//! equivalent), used when no `--config` path is given.

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

const CONFIG_FILE_NAMES: [&str; 3] = ["hub.yaml", "hub.yml", "hub.toml"];

/// Path to the first existing global hub document.
pub fn global_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "coursehub")?;
    let found = CONFIG_FILE_NAMES
        .iter()
        .map(|name| dirs.config_dir().join(name))
        .find(|path| path.is_file());
    if found.is_none() {
        debug!(
            config_dir = %dirs.config_dir().display(),
            "No global hub document found"
        );
    }
    found
}
