// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit command definitions.
//!
//! A unit command is a single string made of a two-letter opcode followed by
//! the encoded value, posted as the `commands` field of
//! `/api/unitcommand.aspx`.
//!
//! | Opcode | Purpose | Example |
//! |--------|---------|---------|
//! | `PW` | Power | `PW1` |
//! | `TS` | Target temperature | `TS21.5` |
//! | `FS` | Fan speed | `FS3` |
//! | `MD` | Operating mode | `MD3` |
//!
//! # Examples
//!
//! ```
//! use melview_bridge::command::UnitCommand;
//! use melview_bridge::types::{OperatingMode, PowerState};
//!
//! assert_eq!(UnitCommand::Power(PowerState::On).encode(), "PW1");
//! assert_eq!(UnitCommand::Mode(OperatingMode::Cool).encode(), "MD3");
//! ```

use std::fmt;

use crate::types::{FanSpeed, OperatingMode, PowerState, Setpoint};

/// A command that can be sent to a single indoor unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitCommand {
    /// Switch the unit on or off.
    Power(PowerState),
    /// Change the target temperature.
    Temperature(Setpoint),
    /// Change the indoor fan speed.
    Fan(FanSpeed),
    /// Change the operating mode.
    Mode(OperatingMode),
}

impl UnitCommand {
    /// Returns the two-letter opcode.
    #[must_use]
    pub const fn opcode(&self) -> &'static str {
        match self {
            Self::Power(_) => "PW",
            Self::Temperature(_) => "TS",
            Self::Fan(_) => "FS",
            Self::Mode(_) => "MD",
        }
    }

    /// Returns the encoded value that follows the opcode.
    #[must_use]
    pub fn value(&self) -> String {
        match self {
            Self::Power(state) => state.as_num().to_string(),
            Self::Temperature(setpoint) => setpoint.to_string(),
            Self::Fan(speed) => speed.value().to_string(),
            Self::Mode(mode) => mode.code().to_string(),
        }
    }

    /// Returns the full wire string, e.g. `"PW1"`.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}{}", self.opcode(), self.value())
    }
}

impl fmt::Display for UnitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}
