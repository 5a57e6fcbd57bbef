// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Voice-platform directive handling.
//!
//! A directive is the inbound request envelope sent by the voice platform.
//! The [`Dispatcher`] routes it by namespace and name, runs the matching
//! operation against the heat pump, and builds the response [`Envelope`].
//!
//! # Supported directives
//!
//! | Namespace | Name | Result |
//! |-----------|------|--------|
//! | `Alexa.Discovery` | any | `Discover.Response` with the registry catalog |
//! | `Alexa`, `Alexa.PowerController`, `Alexa.ThermostatController` | `TurnOn` / `TurnOff` | `Response` with `powerState` |
//! | same | `ReportState` | `StateReport` with four properties |
//! | same | `SetTargetTemperature` | `Response` with an empty context |
//!
//! Everything else yields an `ErrorResponse`.
//!
//! # Examples
//!
//! ```
//! use melview_bridge::directive::{DirectiveRequest, Namespace};
//!
//! let json = serde_json::json!({
//!     "directive": {
//!         "header": {
//!             "namespace": "Alexa.PowerController",
//!             "name": "TurnOn",
//!             "messageId": "m-1",
//!             "correlationToken": "c-1",
//!             "payloadVersion": "3"
//!         },
//!         "endpoint": {"endpointId": "lounge", "scope": {"type": "BearerToken", "token": "t"}},
//!         "payload": {}
//!     }
//! });
//! let request: DirectiveRequest = serde_json::from_value(json).unwrap();
//! let directive = request.directive;
//!
//! assert_eq!(directive.namespace(), Some(Namespace::PowerController));
//! assert_eq!(directive.endpoint_id(), "lounge");
//! assert_eq!(directive.endpoint_token(), "t");
//! ```

mod dispatcher;
mod envelope;
mod validation;

pub use dispatcher::{DirectiveError, Dispatcher, ErrorKind};
pub use envelope::{Context, Envelope, Event, EventEndpoint, EventHeader, PAYLOAD_VERSION, Property};
pub use validation::{AcceptAnyToken, AlwaysOnline, LivenessCheck, TokenValidator};

use serde::Deserialize;

/// Top-level inbound document.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectiveRequest {
    /// The directive itself.
    pub directive: Directive,
}

/// An inbound directive.
#[derive(Debug, Clone, Deserialize)]
pub struct Directive {
    /// Routing and correlation data.
    pub header: Header,
    /// Target endpoint (control directives only).
    #[serde(default)]
    pub endpoint: Option<Endpoint>,
    /// Directive-specific payload.
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Directive header.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Interface namespace, e.g. `Alexa.PowerController`.
    pub namespace: String,
    /// Directive name, e.g. `TurnOn`.
    pub name: String,
    /// Unique id of this directive.
    #[serde(default)]
    pub message_id: String,
    /// Token to echo in the response.
    #[serde(default)]
    pub correlation_token: Option<String>,
    /// Payload version announced by the platform.
    #[serde(default)]
    pub payload_version: Option<String>,
}

/// Directive target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint id, the registered device name.
    #[serde(default)]
    pub endpoint_id: String,
    /// Authorization scope.
    #[serde(default)]
    pub scope: Option<Scope>,
}

/// Authorization scope attached to a directive.
#[derive(Debug, Clone, Deserialize)]
pub struct Scope {
    /// Scope type, normally `BearerToken`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Access token.
    #[serde(default)]
    pub token: String,
}

impl Directive {
    /// Returns the routed namespace, if supported.
    #[must_use]
    pub fn namespace(&self) -> Option<Namespace> {
        Namespace::parse(&self.header.namespace)
    }

    /// Returns the access token of a discovery directive, or `""`.
    #[must_use]
    pub fn discovery_token(&self) -> &str {
        self.payload
            .get("scope")
            .and_then(|scope| scope.get("token"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }

    /// Returns the access token of a control directive, or `""`.
    #[must_use]
    pub fn endpoint_token(&self) -> &str {
        self.endpoint
            .as_ref()
            .and_then(|endpoint| endpoint.scope.as_ref())
            .map_or("", |scope| scope.token.as_str())
    }

    /// Returns the endpoint id of a control directive, or `""`.
    #[must_use]
    pub fn endpoint_id(&self) -> &str {
        self.endpoint
            .as_ref()
            .map_or("", |endpoint| endpoint.endpoint_id.as_str())
    }

    /// Returns the correlation token, if any.
    #[must_use]
    pub fn correlation_token(&self) -> Option<&str> {
        self.header.correlation_token.as_deref()
    }
}

/// Namespaces the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `Alexa.Discovery`
    Discovery,
    /// `Alexa`
    Alexa,
    /// `Alexa.PowerController`
    PowerController,
    /// `Alexa.ThermostatController`
    ThermostatController,
}

impl Namespace {
    /// Parses a namespace string. Returns `None` for unsupported namespaces.
    #[must_use]
    pub fn parse(namespace: &str) -> Option<Self> {
        match namespace {
            "Alexa.Discovery" => Some(Self::Discovery),
            "Alexa" => Some(Self::Alexa),
            "Alexa.PowerController" => Some(Self::PowerController),
            "Alexa.ThermostatController" => Some(Self::ThermostatController),
            _ => None,
        }
    }

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "Alexa.Discovery",
            Self::Alexa => "Alexa",
            Self::PowerController => "Alexa.PowerController",
            Self::ThermostatController => "Alexa.ThermostatController",
        }
    }
}

/// Control operations the bridge can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Switch the unit on.
    TurnOn,
    /// Switch the unit off.
    TurnOff,
    /// Report the current state.
    ReportState,
    /// Change the target temperature.
    SetTargetTemperature,
}

impl Operation {
    /// Parses a directive name. Returns `None` for unsupported names.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "TurnOn" => Some(Self::TurnOn),
            "TurnOff" => Some(Self::TurnOff),
            "ReportState" => Some(Self::ReportState),
            "SetTargetTemperature" => Some(Self::SetTargetTemperature),
            _ => None,
        }
    }
}
