// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry: device name to unit identifier, plus the discovery
//! catalog advertised to the voice platform.
//!
//! The registry is owned by the deployment, not by the bridge. The
//! [`DeviceRegistry`] trait is the seam; [`StaticRegistry`] is the
//! configuration-file backed implementation.
//!
//! # Examples
//!
//! ```
//! use melview_bridge::registry::{DeviceEntry, DeviceRegistry, StaticRegistry};
//!
//! let registry = StaticRegistry::new(vec![
//!     DeviceEntry::new("lounge", "120001"),
//!     DeviceEntry::new("bedroom", "120002"),
//! ]);
//!
//! assert_eq!(registry.unit_id("Lounge").as_deref(), Some("120001"));
//! assert!(registry.unit_id("kitchen").is_none());
//! ```

use serde::Deserialize;

/// Lookup of devices known to the deployment.
pub trait DeviceRegistry {
    /// Returns the unit identifier registered for `name`, if any.
    fn unit_id(&self, name: &str) -> Option<String>;

    /// Returns the endpoint catalog advertised on discovery, verbatim.
    fn endpoints(&self) -> Vec<serde_json::Value>;
}

/// A single registered device.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceEntry {
    /// Device name, also used as the voice-platform endpoint id.
    pub name: String,
    /// Vendor unit identifier.
    pub unit_id: String,
    /// Discovery catalog entry for this device.
    #[serde(default)]
    pub endpoint: Option<serde_json::Value>,
}

impl DeviceEntry {
    /// Creates an entry without a discovery catalog entry.
    #[must_use]
    pub fn new(name: impl Into<String>, unit_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_id: unit_id.into(),
            endpoint: None,
        }
    }

    /// Sets the discovery catalog entry.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: serde_json::Value) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}

/// Registry backed by a fixed list of devices.
///
/// Name lookups ignore ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StaticRegistry {
    devices: Vec<DeviceEntry>,
}

impl StaticRegistry {
    /// Creates a registry from a list of devices.
    #[must_use]
    pub fn new(devices: Vec<DeviceEntry>) -> Self {
        Self { devices }
    }

    /// Returns the registered devices.
    #[must_use]
    pub fn devices(&self) -> &[DeviceEntry] {
        &self.devices
    }
}

impl DeviceRegistry for StaticRegistry {
    fn unit_id(&self, name: &str) -> Option<String> {
        self.devices
            .iter()
            .find(|device| device.name.eq_ignore_ascii_case(name))
            .map(|device| device.unit_id.clone())
    }

    fn endpoints(&self) -> Vec<serde_json::Value> {
        self.devices
            .iter()
            .filter_map(|device| device.endpoint.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let registry = StaticRegistry::new(vec![DeviceEntry::new("Lounge", "1")]);
        assert_eq!(registry.unit_id("lounge").as_deref(), Some("1"));
        assert_eq!(registry.unit_id("LOUNGE").as_deref(), Some("1"));
    }

    #[test]
    fn lookup_missing() {
        let registry = StaticRegistry::default();
        assert!(registry.unit_id("lounge").is_none());
    }

    #[test]
    fn endpoints_are_returned_verbatim() {
        let endpoint = serde_json::json!({
            "endpointId": "lounge",
            "friendlyName": "Lounge Heatpump",
            "displayCategories": ["THERMOSTAT"]
        });
        let registry = StaticRegistry::new(vec![
            DeviceEntry::new("lounge", "1").with_endpoint(endpoint.clone()),
            DeviceEntry::new("hidden", "2"),
        ]);
        assert_eq!(registry.endpoints(), vec![endpoint]);
    }

    #[test]
    fn deserialize_from_list() {
        let json = serde_json::json!([
            {"name": "lounge", "unit_id": "1", "endpoint": {"endpointId": "lounge"}},
            {"name": "bedroom", "unit_id": "2"}
        ]);
        let registry: StaticRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(registry.devices().len(), 2);
        assert_eq!(registry.unit_id("bedroom").as_deref(), Some("2"));
        assert_eq!(registry.endpoints().len(), 1);
    }
}
