// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of a heat-pump indoor unit.

use std::fmt;

/// Represents the power state of a unit.
///
/// The vendor API encodes power as `0`/`1`; the voice platform reports it as
/// `"OFF"`/`"ON"`.
///
/// # Examples
///
/// ```
/// use melview_bridge::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!(PowerState::Off.as_num(), 0);
/// assert_eq!(PowerState::from_num(1), PowerState::On);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Power is off.
    Off,
    /// Power is on.
    On,
}

impl PowerState {
    /// Returns the voice-platform string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns the numeric value used by the vendor API.
    #[must_use]
    pub const fn as_num(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
        }
    }

    /// Decodes the vendor flag. Any non-zero value counts as on.
    #[must_use]
    pub const fn from_num(value: u8) -> Self {
        if value == 0 { Self::Off } else { Self::On }
    }

    /// Returns the lowercase verb used in outcome messages (`on`/`off`).
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
