// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device convenience operations.
//!
//! Each operation runs in its own session: login, look the device up in the
//! registry, issue the call(s), logout. The logout happens on every exit
//! path, including lookup and decoding failures.
//!
//! # Examples
//!
//! ```no_run
//! use melview_bridge::controller::HeatpumpController;
//! use melview_bridge::protocol::CloudConfig;
//! use melview_bridge::registry::{DeviceEntry, StaticRegistry};
//!
//! # async fn example() -> melview_bridge::Result<()> {
//! let client = CloudConfig::new("me@example.com", "secret").into_client()?;
//! let registry = StaticRegistry::new(vec![DeviceEntry::new("lounge", "120001")]);
//! let controller = HeatpumpController::new(client, registry);
//!
//! let outcome = controller.turn_on("lounge").await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::command::UnitCommand;
use crate::error::Error;
use crate::protocol::{MelviewClient, Session};
use crate::registry::DeviceRegistry;
use crate::response::UnitStatus;
use crate::types::{FanSpeed, OperatingMode, PowerState, Setpoint};

/// How a convenience operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The unit already was in the requested state; nothing was sent.
    Unchanged,
    /// The command was accepted by the remote API.
    Changed,
    /// The command was rejected by the remote API.
    Failed,
}

/// Result of a convenience operation on a named device.
///
/// Displays as a human-readable sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    device: String,
    command: UnitCommand,
    kind: OutcomeKind,
}

impl Outcome {
    fn new(device: &str, command: UnitCommand, kind: OutcomeKind) -> Self {
        Self {
            device: device.to_string(),
            command,
            kind,
        }
    }

    fn sent(device: &str, command: UnitCommand, accepted: bool) -> Self {
        let kind = if accepted {
            OutcomeKind::Changed
        } else {
            OutcomeKind::Failed
        };
        Self::new(device, command, kind)
    }

    /// Returns the device name the operation targeted.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the command the operation was about.
    #[must_use]
    pub const fn command(&self) -> &UnitCommand {
        &self.command
    }

    /// Returns how the operation ended.
    #[must_use]
    pub const fn kind(&self) -> OutcomeKind {
        self.kind
    }

    /// Returns whether the unit is now in the requested state, as far as the
    /// remote API reported.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.kind, OutcomeKind::Failed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = &self.device;
        match (self.kind, &self.command) {
            (OutcomeKind::Unchanged, UnitCommand::Power(state)) => {
                write!(f, "Heatpump is already {}", state.verb())
            }
            (OutcomeKind::Changed, UnitCommand::Power(state)) => {
                write!(f, "Successfully turned {} {device}", state.verb())
            }
            (OutcomeKind::Failed, UnitCommand::Power(state)) => {
                write!(f, "Failed to turn {} {device}", state.verb())
            }
            (OutcomeKind::Unchanged | OutcomeKind::Changed, command) => write!(
                f,
                "Successfully set {device} {} to {}",
                setting(command),
                target(command)
            ),
            (OutcomeKind::Failed, command) => write!(
                f,
                "Failed to set {device} {} to {}",
                setting(command),
                target(command)
            ),
        }
    }
}

fn setting(command: &UnitCommand) -> &'static str {
    match command {
        UnitCommand::Power(_) => "power",
        UnitCommand::Temperature(_) => "temperature",
        UnitCommand::Fan(_) => "fan speed",
        UnitCommand::Mode(_) => "mode",
    }
}

fn target(command: &UnitCommand) -> String {
    match command {
        UnitCommand::Mode(mode) => mode.to_string(),
        other => other.value(),
    }
}

/// Renders the result of a convenience operation as a single message.
///
/// Successful outcomes and errors alike become descriptive strings, e.g.
/// `"Successfully turned on lounge"` or `"Failed to find kitchen"`.
#[must_use]
pub fn describe(result: &Result<Outcome, Error>) -> String {
    match result {
        Ok(outcome) => outcome.to_string(),
        Err(e) => e.to_string(),
    }
}

/// A unit found in the account topology, with its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatpump {
    /// Room the unit is installed in.
    pub room: String,
    /// Vendor unit identifier.
    pub unit_id: String,
    /// Status snapshot taken while listing.
    pub status: UnitStatus,
}

/// Device-level operations on top of [`MelviewClient`].
#[derive(Debug, Clone)]
pub struct HeatpumpController<R> {
    client: MelviewClient,
    registry: R,
}

impl<R: DeviceRegistry> HeatpumpController<R> {
    /// Creates a controller from a client and a device registry.
    #[must_use]
    pub fn new(client: MelviewClient, registry: R) -> Self {
        Self { client, registry }
    }

    /// Returns the underlying client.
    #[must_use]
    pub fn client(&self) -> &MelviewClient {
        &self.client
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn resolve(&self, name: &str) -> Result<String, Error> {
        self.registry
            .unit_id(name)
            .ok_or_else(|| Error::DeviceNotFound(name.to_string()))
    }

    // ========== Power Control ==========

    /// Switches a device on or off.
    ///
    /// The current status is fetched first; if the unit already has the
    /// requested power state no command is sent. If the status cannot be
    /// fetched the command is sent anyway.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails, the device is unknown, or a request
    /// fails at the transport level.
    pub async fn set_power(&self, name: &str, power: PowerState) -> Result<Outcome, Error> {
        let command = UnitCommand::Power(power);
        self.client
            .with_session(async |session: &Session| -> Result<Outcome, Error> {
                let unit_id = self.resolve(name)?;

                match self.client.get_unit_status(session, &unit_id).await? {
                    Some(status) if status.power_state() == power => {
                        tracing::debug!(device = name, power = %power, "Already in target state");
                        return Ok(Outcome::new(name, command, OutcomeKind::Unchanged));
                    }
                    Some(_) => {}
                    None => {
                        tracing::warn!(device = name, "Status unavailable, sending power command");
                    }
                }

                let accepted = self.client.send_command(session, &unit_id, &command).await?;
                Ok(Outcome::sent(name, command, accepted))
            })
            .await
    }

    /// Switches a device on.
    ///
    /// # Errors
    ///
    /// See [`set_power`](Self::set_power).
    pub async fn turn_on(&self, name: &str) -> Result<Outcome, Error> {
        self.set_power(name, PowerState::On).await
    }

    /// Switches a device off.
    ///
    /// # Errors
    ///
    /// See [`set_power`](Self::set_power).
    pub async fn turn_off(&self, name: &str) -> Result<Outcome, Error> {
        self.set_power(name, PowerState::Off).await
    }

    // ========== Climate Control ==========

    /// Changes the target temperature of a device.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails, the device is unknown, or the request
    /// fails at the transport level.
    pub async fn set_temp(&self, name: &str, setpoint: Setpoint) -> Result<Outcome, Error> {
        self.apply(name, UnitCommand::Temperature(setpoint)).await
    }

    /// Changes the fan speed of a device.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails, the device is unknown, or the request
    /// fails at the transport level.
    pub async fn set_fan(&self, name: &str, speed: FanSpeed) -> Result<Outcome, Error> {
        self.apply(name, UnitCommand::Fan(speed)).await
    }

    /// Changes the operating mode of a device.
    ///
    /// The mode string is validated before anything goes over the network.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownMode` for a mode outside heat, dry, cool,
    /// fan and auto; otherwise as [`set_temp`](Self::set_temp).
    pub async fn set_mode(&self, name: &str, mode: &str) -> Result<Outcome, Error> {
        let mode: OperatingMode = mode.parse()?;
        self.apply(name, UnitCommand::Mode(mode)).await
    }

    async fn apply(&self, name: &str, command: UnitCommand) -> Result<Outcome, Error> {
        self.client
            .with_session(async |session: &Session| -> Result<Outcome, Error> {
                let unit_id = self.resolve(name)?;
                let accepted = self.client.send_command(session, &unit_id, &command).await?;
                Ok(Outcome::sent(name, command, accepted))
            })
            .await
    }

    // ========== Status ==========

    /// Fetches the current status of a device.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteCallFailure` if the status request is rejected,
    /// and the usual login, lookup and transport errors.
    pub async fn report_status(&self, name: &str) -> Result<UnitStatus, Error> {
        self.client
            .with_session(async |session: &Session| -> Result<UnitStatus, Error> {
                let unit_id = self.resolve(name)?;
                self.client
                    .get_unit_status(session, &unit_id)
                    .await?
                    .ok_or(Error::RemoteCallFailure {
                        operation: "get_unit_status",
                    })
            })
            .await
    }

    /// Lists every unit of the account with its current status.
    ///
    /// Capabilities are fetched for each unit as the vendor app does, but not
    /// kept; a failed capabilities call never fails the listing. Units whose
    /// status cannot be fetched are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the login fails or a request fails at the transport
    /// level.
    pub async fn list_heatpumps(&self) -> Result<Vec<Heatpump>, Error> {
        self.client
            .with_session(async |session: &Session| -> Result<Vec<Heatpump>, Error> {
                let mut heatpumps = Vec::new();
                for unit in self.client.list_rooms(session).await? {
                    let status = self.client.get_unit_status(session, &unit.unit_id).await?;

                    match self
                        .client
                        .get_unit_capabilities(session, &unit.unit_id)
                        .await
                    {
                        Ok(Some(_)) => {}
                        Ok(None) => {
                            tracing::debug!(unit_id = %unit.unit_id, "Capabilities unavailable");
                        }
                        Err(e) => {
                            tracing::warn!(
                                unit_id = %unit.unit_id,
                                error = %e,
                                "Ignoring capabilities failure"
                            );
                        }
                    }

                    match status {
                        Some(status) => heatpumps.push(Heatpump {
                            room: unit.room,
                            unit_id: unit.unit_id,
                            status,
                        }),
                        None => {
                            tracing::warn!(room = %unit.room, "Skipping unit without status");
                        }
                    }
                }
                Ok(heatpumps)
            })
            .await
    }
}
