// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating mode of a heat-pump unit.
//!
//! The vendor API uses a fixed numeric table for the `MD` opcode and the
//! `setmode` status field:
//!
//! | Mode | Code |
//! |------|------|
//! | heat | 1 |
//! | dry  | 2 |
//! | cool | 3 |
//! | fan  | 7 |
//! | auto | 8 |

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating mode of a unit.
///
/// # Examples
///
/// ```
/// use melview_bridge::types::OperatingMode;
///
/// let mode: OperatingMode = "cool".parse().unwrap();
/// assert_eq!(mode.code(), 3);
/// assert_eq!(mode.thermostat_mode(), "COOL");
///
/// assert!("turbo".parse::<OperatingMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// Heating.
    Heat,
    /// Dehumidify.
    Dry,
    /// Cooling.
    Cool,
    /// Fan only.
    Fan,
    /// Automatic heat/cool.
    Auto,
}

impl OperatingMode {
    /// All supported modes, in table order.
    pub const ALL: [Self; 5] = [Self::Heat, Self::Dry, Self::Cool, Self::Fan, Self::Auto];

    /// Returns the numeric code used by the vendor API.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Heat => 1,
            Self::Dry => 2,
            Self::Cool => 3,
            Self::Fan => 7,
            Self::Auto => 8,
        }
    }

    /// Decodes a vendor mode code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownModeCode` for codes outside the table.
    pub const fn from_code(code: u8) -> Result<Self, ValueError> {
        match code {
            1 => Ok(Self::Heat),
            2 => Ok(Self::Dry),
            3 => Ok(Self::Cool),
            7 => Ok(Self::Fan),
            8 => Ok(Self::Auto),
            other => Err(ValueError::UnknownModeCode(other)),
        }
    }

    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heat => "heat",
            Self::Dry => "dry",
            Self::Cool => "cool",
            Self::Fan => "fan",
            Self::Auto => "auto",
        }
    }

    /// Returns the value reported as the `thermostatMode` property.
    #[must_use]
    pub const fn thermostat_mode(&self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Dry => "DRY",
            Self::Cool => "COOL",
            Self::Fan => "FAN",
            Self::Auto => "AUTO",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperatingMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heat" => Ok(Self::Heat),
            "dry" => Ok(Self::Dry),
            "cool" => Ok(Self::Cool),
            "fan" => Ok(Self::Fan),
            "auto" => Ok(Self::Auto),
            _ => Err(ValueError::UnknownMode(s.to_string())),
        }
    }
}
