// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit status response parsing.

use serde::Deserialize;

use crate::error::{ParseError, ValueError};
use crate::response::string_or_number;
use crate::types::{OperatingMode, PowerState};

/// Snapshot of a unit as returned by `/api/unitcommand.aspx` with `v: 2`.
///
/// All thirteen fields are required. A body missing any of them is rejected
/// as a whole; there are no partially populated statuses.
///
/// # Examples
///
/// ```
/// use melview_bridge::response::UnitStatus;
/// use melview_bridge::types::{OperatingMode, PowerState};
///
/// let json = serde_json::json!({
///     "id": "120001", "power": 1, "standby": 0, "setmode": 3, "automode": 0,
///     "setfan": 1, "settemp": "19", "roomtemp": "24", "airdir": 2, "airdirh": 3,
///     "sendcount": 0, "fault": "", "error": "ok"
/// });
/// let status = UnitStatus::from_json(&json).unwrap();
/// assert_eq!(status.power_state(), PowerState::On);
/// assert_eq!(status.mode().unwrap(), OperatingMode::Cool);
/// assert_eq!(status.roomtemp, "24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitStatus {
    /// Unit identifier echoed by the API.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Power flag (`0` off, `1` on).
    pub power: u8,
    /// Standby flag.
    pub standby: u8,
    /// Operating mode code, see [`OperatingMode`].
    pub setmode: u8,
    /// Automatic mode flag.
    pub automode: u8,
    /// Fan speed.
    pub setfan: u8,
    /// Target temperature as reported by the unit.
    #[serde(deserialize_with = "string_or_number")]
    pub settemp: String,
    /// Ambient temperature as reported by the unit.
    #[serde(deserialize_with = "string_or_number")]
    pub roomtemp: String,
    /// Vertical air direction.
    pub airdir: u8,
    /// Horizontal air direction.
    pub airdirh: u8,
    /// Number of commands still queued for the unit.
    pub sendcount: u32,
    /// Fault code, empty when healthy.
    #[serde(deserialize_with = "string_or_number")]
    pub fault: String,
    /// Error string, `"ok"` when healthy.
    #[serde(deserialize_with = "string_or_number")]
    pub error: String,
}

impl UnitStatus {
    /// Names of the fields every status body must carry.
    pub const FIELDS: [&'static str; 13] = [
        "id",
        "power",
        "standby",
        "setmode",
        "automode",
        "setfan",
        "settemp",
        "roomtemp",
        "airdir",
        "airdirh",
        "sendcount",
        "fault",
        "error",
    ];

    /// Decodes a status body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if the body is not a JSON object,
    /// `ParseError::MissingField` naming the first absent field, or
    /// `ParseError::Json` if a field has the wrong type.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| ParseError::UnexpectedFormat("status is not an object".to_string()))?;

        if let Some(missing) = Self::FIELDS
            .iter()
            .find(|field| !object.contains_key(**field))
        {
            return Err(ParseError::MissingField((*missing).to_string()));
        }

        Ok(Self::deserialize(value)?)
    }

    /// Returns the decoded power state.
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        PowerState::from_num(self.power)
    }

    /// Returns the decoded operating mode.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownModeCode` if `setmode` is outside the table.
    pub const fn mode(&self) -> Result<OperatingMode, ValueError> {
        OperatingMode::from_code(self.setmode)
    }

    /// Returns whether the unit is in standby.
    #[must_use]
    pub const fn is_standby(&self) -> bool {
        self.standby != 0
    }

    /// Returns whether the unit reports a fault.
    #[must_use]
    pub fn has_fault(&self) -> bool {
        !self.fault.is_empty()
    }
}
