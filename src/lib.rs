// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Melview Bridge - voice-assistant smart-home directives for Melview heat pumps.
//!
//! This library translates inbound "discover / turn on / turn off / report
//! state" directives into authenticated calls against the Melview cloud API,
//! and translates the API's answers back into response envelopes.
//!
//! # Components
//!
//! - **Remote device client** ([`protocol`]): session lifecycle, command
//!   encoding, status decoding.
//! - **Convenience wrappers** ([`controller`]): one session per operation on a
//!   named device, with human-readable outcomes.
//! - **Directive dispatcher** ([`directive`]): routes a directive to an
//!   operation and builds the response or error envelope.
//!
//! Each invocation is a strictly sequential chain: login, lookup, command or
//! status call(s), logout.
//!
//! # Quick Start
//!
//! ```no_run
//! use melview_bridge::config::BridgeConfig;
//! use melview_bridge::controller::HeatpumpController;
//! use melview_bridge::directive::Dispatcher;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BridgeConfig::from_env()?;
//!     let client = config.cloud_config().into_client()?;
//!     let dispatcher = Dispatcher::new(HeatpumpController::new(client, config.devices));
//!
//!     let request = serde_json::json!({
//!         "directive": {
//!             "header": {"namespace": "Alexa.Discovery", "name": "Discover", "messageId": "1"},
//!             "payload": {"scope": {"type": "BearerToken", "token": "token"}}
//!         }
//!     });
//!     let envelope = dispatcher.handle_value(request).await;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Direct device control
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
//! println!("{}", controller.set_mode("lounge", "heat").await?);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod directive;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod response;
pub mod types;

pub use command::UnitCommand;
pub use config::BridgeConfig;
pub use controller::{Heatpump, HeatpumpController, Outcome, OutcomeKind};
pub use directive::{Dispatcher, Envelope};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{CloudConfig, MelviewClient, Session};
pub use registry::{DeviceEntry, DeviceRegistry, StaticRegistry};
pub use response::{Unit, UnitStatus};
pub use types::{FanSpeed, OperatingMode, PowerState, Setpoint};
