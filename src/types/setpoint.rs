// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Target temperature and fan speed values.

use std::fmt;

use crate::error::ValueError;

/// Target temperature in degrees Celsius.
///
/// Sent with the `TS` opcode. Only whole and half degrees are accepted, so the
/// encoded value is always exact: `21` or `21.5`.
///
/// # Examples
///
/// ```
/// use melview_bridge::types::Setpoint;
///
/// assert_eq!(Setpoint::new(21.0).unwrap().to_string(), "21");
/// assert_eq!(Setpoint::new(21.5).unwrap().to_string(), "21.5");
/// assert!(Setpoint::new(21.25).is_err());
/// assert!(Setpoint::new(45.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Setpoint(f32);

impl Setpoint {
    /// Lowest accepted target temperature.
    pub const MIN: f32 = 10.0;

    /// Highest accepted target temperature.
    pub const MAX: f32 = 31.0;

    /// Creates a new setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidSetpoint` if the value is not finite, lies
    /// outside [10, 31], or is not a multiple of half a degree.
    pub fn new(celsius: f32) -> Result<Self, ValueError> {
        if !celsius.is_finite()
            || !(Self::MIN..=Self::MAX).contains(&celsius)
            || (celsius * 2.0).fract() != 0.0
        {
            return Err(ValueError::InvalidSetpoint(celsius.to_string()));
        }
        Ok(Self(celsius))
    }

    /// Returns the temperature in degrees Celsius.
    #[must_use]
    pub const fn celsius(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{:.1}", self.0)
        }
    }
}

/// Indoor fan speed (0-5).
///
/// `0` selects automatic fan control.
///
/// # Examples
///
/// ```
/// use melview_bridge::types::FanSpeed;
///
/// let speed = FanSpeed::new(3).unwrap();
/// assert_eq!(speed.value(), 3);
/// assert_eq!(FanSpeed::AUTO.value(), 0);
/// assert!(FanSpeed::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Maximum speed value.
    pub const MAX: u8 = 5;

    /// Automatic fan speed.
    pub const AUTO: Self = Self(0);

    /// Creates a new fan speed value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is greater than 5.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > Self::MAX {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(Self::MAX),
                actual: u16::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Returns the speed value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns whether the fan is under automatic control.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        self.0 == 0
    }
}

impl Default for FanSpeed {
    fn default() -> Self {
        Self::AUTO
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
