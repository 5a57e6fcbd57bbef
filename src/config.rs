// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration document.
//!
//! The configuration is a JSON file holding the cloud account and the device
//! registry:
//!
//! ```json
//! {
//!   "cloud": { "username": "me@example.com", "password": "secret" },
//!   "devices": [
//!     { "name": "lounge", "unit_id": "120001",
//!       "endpoint": { "endpointId": "lounge", "friendlyName": "Lounge" } }
//!   ]
//! }
//! ```
//!
//! The file path comes from `MELVIEW_BRIDGE_CONFIG`; `MELVIEW_USERNAME` and
//! `MELVIEW_PASSWORD` override the credentials in the file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::protocol::CloudConfig;
use crate::registry::StaticRegistry;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "MELVIEW_BRIDGE_CONFIG";
/// Environment variable overriding the account name.
pub const USERNAME_VAR: &str = "MELVIEW_USERNAME";
/// Environment variable overriding the account password.
pub const PASSWORD_VAR: &str = "MELVIEW_PASSWORD";

/// Complete bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Vendor account settings.
    #[serde(default)]
    pub cloud: CloudSection,
    /// Registered devices.
    #[serde(default)]
    pub devices: StaticRegistry,
}

/// Vendor account settings as written in the configuration file.
#[derive(Clone, Default, Deserialize)]
pub struct CloudSection {
    /// API root; the public service when absent.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Account name.
    #[serde(default)]
    pub username: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
    /// Client version string sent at login.
    #[serde(default)]
    pub app_version: Option<String>,
    /// Request timeout in seconds; the transport default when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for CloudSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudSection")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("app_version", &self.app_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl BridgeConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the document is invalid.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&document)
    }

    /// Loads the file named by `MELVIEW_BRIDGE_CONFIG` and applies the
    /// credential overrides from the environment.
    ///
    /// # Errors
    ///
    /// Returns error if the variable is unset or the file cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).map_err(|_| ConfigError::MissingVariable(CONFIG_PATH_VAR))?;
        tracing::debug!(path = %path, "Loading bridge configuration");

        Ok(Self::from_file(path)?.with_credentials(
            std::env::var(USERNAME_VAR).ok(),
            std::env::var(PASSWORD_VAR).ok(),
        ))
    }

    /// Replaces the credentials that are `Some`.
    #[must_use]
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        if let Some(username) = username {
            self.cloud.username = username;
        }
        if let Some(password) = password {
            self.cloud.password = password;
        }
        self
    }

    /// Builds the client configuration.
    #[must_use]
    pub fn cloud_config(&self) -> CloudConfig {
        let cloud = &self.cloud;
        let mut config = CloudConfig::new(&cloud.username, &cloud.password);
        if let Some(base_url) = &cloud.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(app_version) = &cloud.app_version {
            config = config.with_app_version(app_version);
        }
        if let Some(secs) = cloud.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}
