// Copyright © SixtyFPS GmbH <info@slint.dev>
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::StationError;

/// Connection settings for the telemetry endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CloudConfig {
    /// Publishing is skipped entirely when this is off.
    #[serde(default)]
    pub enabled: bool,

    /// URL messages are POSTed to.
    #[serde(default)]
    pub endpoint: String,

    /// Identifies this station in every message.
    #[serde(default = "default_device_id")]
    pub device_id: String,

    /// Sent as a bearer token when set.
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_device_id() -> String {
    "enviro".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            device_id: default_device_id(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CloudConfig {
    pub const FILE_NAME: &'static str = "cloud_config.toml";

    /// Loads the config from `path`.
    ///
    /// A missing file gives the default, disabled, configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StationError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No cloud config at {}, publishing disabled", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StationError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        toml::from_str(&contents).map_err(|source| StationError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `cloud_config.toml` next to the running executable.
    pub fn default_location() -> std::path::PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(Self::FILE_NAME)))
            .unwrap_or_else(|| Self::FILE_NAME.into())
    }
}
