//! ConfigLoader: builds a [`HubConfig`] from merge-policy defaults, the hub
//! document, and environment overrides.

use super::merge::merge_policy;
use super::sources::{environment, global_file, server_file};
use super::{HubConfig, ServerConfig};
use crate::error::HubError;
use config::{Config, ConfigError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the hub document at `config_path`.
    ///
    /// With `server` set, the server configuration is read from
    /// `server.<name>`; otherwise the document root is the server configuration.
    pub fn load_from_file(config_path: &Path, server: Option<&str>) -> Result<HubConfig, HubError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = server_file::add_to_builder(builder, config_path)?;
        let builder = environment::add_to_builder(builder);
        let config = builder.build()?;

        let hub = Self::from_config(&config, server)?;
        info!(
            config_path = %config_path.display(),
            server = server.unwrap_or("<root>"),
            "Loaded hub configuration"
        );
        Ok(hub)
    }

    /// Load from an explicit path, falling back to the global hub document,
    /// then to defaults plus environment overrides.
    pub fn load(config_path: Option<&Path>, server: Option<&str>) -> Result<HubConfig, HubError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path, server);
        }
        if let Some(path) = Self::global_config_path() {
            return Self::load_from_file(&path, server);
        }
        debug!("No hub document given, using defaults and environment");
        let builder = environment::add_to_builder(merge_policy::builder_with_defaults()?);
        let config = builder.build()?;
        Self::from_config(&config, server)
    }

    /// Global hub document path, if one exists.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn from_config(config: &Config, server: Option<&str>) -> Result<HubConfig, HubError> {
        let spawn = get_or_default(config, "spawn")?;
        let logging = get_or_default(config, "logging")?;
        let server = match server {
            Some(name) => {
                let key = format!("server.{}", name);
                config.get::<ServerConfig>(&key).map_err(|e| match e {
                    ConfigError::NotFound(_) => HubError::ConfigError(format!(
                        "Server section '{}' not found in hub document",
                        name
                    )),
                    other => HubError::from(other),
                })?
            }
            None => config.clone().try_deserialize::<ServerConfig>()?,
        };
        Ok(HubConfig {
            spawn,
            logging,
            server,
        })
    }
}

fn get_or_default<T: DeserializeOwned + Default>(config: &Config, key: &str) -> Result<T, HubError> {
    match config.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}
