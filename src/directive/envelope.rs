// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound response envelopes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::response::UnitStatus;
use crate::types::PowerState;

/// Payload version stamped on every response.
pub const PAYLOAD_VERSION: &str = "3";

const TIME_OF_SAMPLE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.00Z";
const POWER_UNCERTAINTY_MS: u32 = 1000;
const THERMOSTAT_UNCERTAINTY_MS: u32 = 6000;

/// A response envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Property observations, present on state-carrying responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// The response event.
    pub event: Event,
}

/// Response event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    /// Event header.
    pub header: EventHeader,
    /// Echoed endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<EventEndpoint>,
    /// Event payload.
    pub payload: serde_json::Value,
}

/// Response event header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHeader {
    /// Interface namespace.
    pub namespace: String,
    /// Event name.
    pub name: String,
    /// Always [`PAYLOAD_VERSION`].
    pub payload_version: String,
    /// Freshly generated message id.
    pub message_id: String,
    /// Correlation token echoed from the directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,
}

impl EventHeader {
    fn new(namespace: &str, name: &str, correlation_token: Option<&str>) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            payload_version: PAYLOAD_VERSION.to_string(),
            message_id: Uuid::new_v4().to_string(),
            correlation_token: correlation_token.map(str::to_string),
        }
    }
}

/// Echoed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEndpoint {
    /// Endpoint id from the directive.
    pub endpoint_id: String,
}

/// Set of property observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    /// Observed properties. An empty context serializes as `{}`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// A single property observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Interface the property belongs to.
    pub namespace: String,
    /// Property name.
    pub name: String,
    /// Observed value.
    pub value: serde_json::Value,
    /// UTC time of the observation.
    pub time_of_sample: String,
    /// Expected staleness of the value.
    pub uncertainty_in_milliseconds: u32,
}

impl Property {
    fn new(
        namespace: &str,
        name: &str,
        value: serde_json::Value,
        sampled_at: DateTime<Utc>,
        uncertainty_in_milliseconds: u32,
    ) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            value,
            time_of_sample: sampled_at.format(TIME_OF_SAMPLE_FORMAT).to_string(),
            uncertainty_in_milliseconds,
        }
    }

    fn celsius(reading: &str) -> serde_json::Value {
        json!({ "value": reading, "scale": "CELSIUS" })
    }
}

impl Context {
    /// Context holding only the power state.
    #[must_use]
    pub fn power(state: PowerState, sampled_at: DateTime<Utc>) -> Self {
        Self {
            properties: vec![Property::new(
                "Alexa.PowerController",
                "powerState",
                json!(state.as_str()),
                sampled_at,
                POWER_UNCERTAINTY_MS,
            )],
        }
    }

    /// Context projecting a unit status onto power state, ambient
    /// temperature, target setpoint and thermostat mode.
    ///
    /// A mode code outside the table is reported as `null`.
    #[must_use]
    pub fn state_report(status: &UnitStatus, sampled_at: DateTime<Utc>) -> Self {
        let mode = status
            .mode()
            .map_or(serde_json::Value::Null, |mode| json!(mode.thermostat_mode()));

        Self {
            properties: vec![
                Property::new(
                    "Alexa.PowerController",
                    "powerState",
                    json!(status.power_state().as_str()),
                    sampled_at,
                    POWER_UNCERTAINTY_MS,
                ),
                Property::new(
                    "Alexa.TemperatureSensor",
                    "temperature",
                    Property::celsius(&status.roomtemp),
                    sampled_at,
                    POWER_UNCERTAINTY_MS,
                ),
                Property::new(
                    "Alexa.ThermostatController",
                    "targetSetpoint",
                    Property::celsius(&status.settemp),
                    sampled_at,
                    THERMOSTAT_UNCERTAINTY_MS,
                ),
                Property::new(
                    "Alexa.ThermostatController",
                    "thermostatMode",
                    mode,
                    sampled_at,
                    THERMOSTAT_UNCERTAINTY_MS,
                ),
            ],
        }
    }

    /// Returns the property with the given name, if present.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl Envelope {
    /// Builds a control response in the `Alexa` namespace.
    #[must_use]
    pub fn response(
        name: &str,
        context: Context,
        endpoint_id: &str,
        correlation_token: Option<&str>,
    ) -> Self {
        Self {
            context: Some(context),
            event: Event {
                header: EventHeader::new("Alexa", name, correlation_token),
                endpoint: Some(EventEndpoint {
                    endpoint_id: endpoint_id.to_string(),
                }),
                payload: json!({}),
            },
        }
    }

    /// Builds a discovery response advertising `endpoints`.
    #[must_use]
    pub fn discovery(endpoints: Vec<serde_json::Value>, correlation_token: Option<&str>) -> Self {
        Self {
            context: None,
            event: Event {
                header: EventHeader::new("Alexa.Discovery", "Discover.Response", correlation_token),
                endpoint: None,
                payload: json!({ "endpoints": endpoints }),
            },
        }
    }

    /// Builds an error response.
    ///
    /// The endpoint is echoed only when non-empty.
    #[must_use]
    pub fn error(
        error_type: &str,
        message: &str,
        endpoint_id: &str,
        correlation_token: Option<&str>,
    ) -> Self {
        let endpoint = (!endpoint_id.is_empty()).then(|| EventEndpoint {
            endpoint_id: endpoint_id.to_string(),
        });

        Self {
            context: None,
            event: Event {
                header: EventHeader::new("Alexa", "ErrorResponse", correlation_token),
                endpoint,
                payload: json!({ "type": error_type, "message": message }),
            },
        }
    }

    /// Returns whether this is an error response.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.event.header.name == "ErrorResponse"
    }

    /// Returns the error type of an error response.
    #[must_use]
    pub fn error_type(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.event.payload.get("type").and_then(serde_json::Value::as_str)
    }
}
