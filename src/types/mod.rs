// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for heat-pump control.
//!
//! Each type ensures values are valid at construction time, so a command is
//! never sent with a value the vendor API would reject.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off
//! - [`OperatingMode`] - heat, dry, cool, fan, auto
//! - [`Setpoint`] - Target temperature (10-31 °C)
//! - [`FanSpeed`] - Fan speed (0-5, 0 = auto)

mod mode;
mod power;
mod setpoint;

pub use mode::OperatingMode;
pub use power::PowerState;
pub use setpoint::{FanSpeed, Setpoint};
