// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Directive routing and execution.

use chrono::Utc;
use thiserror::Error;

use crate::controller::HeatpumpController;
use crate::directive::envelope::{Context, Envelope};
use crate::directive::validation::{AcceptAnyToken, AlwaysOnline, LivenessCheck, TokenValidator};
use crate::directive::{Directive, DirectiveRequest, Namespace, Operation};
use crate::error::Error;
use crate::registry::DeviceRegistry;
use crate::types::PowerState;

/// Categories of directive failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The access token is empty or rejected by the validator.
    InvalidAccessToken,
    /// A control directive carried no endpoint id.
    MissingEndpointId,
    /// The namespace is not routed by the bridge.
    UnsupportedNamespace,
    /// The directive name is not a supported operation.
    UnsupportedOperation,
    /// The endpoint is offline or the remote API could not be reached.
    EndpointUnreachable,
    /// The endpoint id is not in the registry.
    NoSuchEndpoint,
    /// The directive document could not be decoded.
    InvalidDirective,
    /// A value in the directive or the device state is invalid.
    InvalidValue,
    /// The remote API answered with something the bridge cannot decode.
    InternalError,
}

impl ErrorKind {
    /// Returns the error `type` string reported to the voice platform.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidAccessToken => "INVALID_AUTHORIZATION_CREDENTIAL",
            Self::MissingEndpointId | Self::UnsupportedNamespace | Self::InvalidDirective => {
                "INVALID_DIRECTIVE"
            }
            Self::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            Self::EndpointUnreachable => "ENDPOINT_UNREACHABLE",
            Self::NoSuchEndpoint => "NO_SUCH_ENDPOINT",
            Self::InvalidValue => "INVALID_VALUE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// A directive that could not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DirectiveError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
}

impl DirectiveError {
    /// Creates a directive error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<Error> for DirectiveError {
    fn from(error: Error) -> Self {
        let kind = match &error {
            Error::DeviceNotFound(_) => ErrorKind::NoSuchEndpoint,
            Error::AuthFailure { .. } | Error::RemoteCallFailure { .. } | Error::Protocol(_) => {
                ErrorKind::EndpointUnreachable
            }
            Error::Value(_) => ErrorKind::InvalidValue,
            Error::Parse(_) => ErrorKind::InternalError,
        };
        Self::new(kind, error.to_string())
    }
}

/// Routes directives to heat-pump operations and builds response envelopes.
///
/// Every call returns an envelope; failures become `ErrorResponse` envelopes
/// carrying the echoed correlation token and, when known, the endpoint id.
///
/// # Examples
///
/// ```no_run
/// use melview_bridge::controller::HeatpumpController;
/// use melview_bridge::directive::Dispatcher;
/// use melview_bridge::protocol::CloudConfig;
/// use melview_bridge::registry::StaticRegistry;
///
/// # async fn example(request: serde_json::Value) -> melview_bridge::Result<()> {
/// let client = CloudConfig::new("me@example.com", "secret").into_client()?;
/// let dispatcher = Dispatcher::new(HeatpumpController::new(client, StaticRegistry::default()));
///
/// let envelope = dispatcher.handle_value(request).await;
/// println!("{}", serde_json::to_string(&envelope).unwrap_or_default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dispatcher<R, V = AcceptAnyToken, L = AlwaysOnline> {
    controller: HeatpumpController<R>,
    validator: V,
    liveness: L,
}

impl<R: DeviceRegistry> Dispatcher<R> {
    /// Creates a dispatcher with the accept-all token validator and liveness
    /// check.
    #[must_use]
    pub fn new(controller: HeatpumpController<R>) -> Self {
        Self {
            controller,
            validator: AcceptAnyToken,
            liveness: AlwaysOnline,
        }
    }
}

impl<R, V, L> Dispatcher<R, V, L>
where
    R: DeviceRegistry,
    V: TokenValidator,
    L: LivenessCheck,
{
    /// Replaces the token validator.
    #[must_use]
    pub fn with_validator<V2: TokenValidator>(self, validator: V2) -> Dispatcher<R, V2, L> {
        Dispatcher {
            controller: self.controller,
            validator,
            liveness: self.liveness,
        }
    }

    /// Replaces the liveness check.
    #[must_use]
    pub fn with_liveness<L2: LivenessCheck>(self, liveness: L2) -> Dispatcher<R, V, L2> {
        Dispatcher {
            controller: self.controller,
            validator: self.validator,
            liveness,
        }
    }

    /// Returns the controller used to reach the devices.
    #[must_use]
    pub fn controller(&self) -> &HeatpumpController<R> {
        &self.controller
    }

    /// Decodes and handles a raw directive document.
    ///
    /// A document that does not decode yields an `INVALID_DIRECTIVE` error
    /// envelope.
    pub async fn handle_value(&self, request: serde_json::Value) -> Envelope {
        match serde_json::from_value::<DirectiveRequest>(request) {
            Ok(request) => self.handle(&request.directive).await,
            Err(e) => {
                tracing::error!(error = %e, "Malformed directive");
                Envelope::error(
                    ErrorKind::InvalidDirective.error_type(),
                    &format!("Malformed directive: {e}"),
                    "",
                    None,
                )
            }
        }
    }

    /// Handles a decoded directive.
    pub async fn handle(&self, directive: &Directive) -> Envelope {
        tracing::debug!(
            namespace = %directive.header.namespace,
            name = %directive.header.name,
            message_id = %directive.header.message_id,
            "Directive received"
        );

        let result = match directive.namespace() {
            Some(Namespace::Discovery) => self.discover(directive),
            Some(_) => self.control(directive).await,
            None => Err(DirectiveError::new(
                ErrorKind::UnsupportedNamespace,
                format!("No supported namespace: {}", directive.header.namespace),
            )),
        };

        result.unwrap_or_else(|e| Self::reject(directive, &e))
    }

    fn reject(directive: &Directive, error: &DirectiveError) -> Envelope {
        let message = format!(
            "{} request [{}] failed: {error}",
            directive.header.name, directive.header.message_id
        );
        tracing::error!(kind = ?error.kind, "{message}");
        Envelope::error(
            error.kind.error_type(),
            &message,
            directive.endpoint_id(),
            directive.correlation_token(),
        )
    }

    fn check_token(&self, token: &str) -> Result<(), DirectiveError> {
        if token.is_empty() || !self.validator.is_valid(token) {
            return Err(DirectiveError::new(
                ErrorKind::InvalidAccessToken,
                format!("Invalid access token: {token}"),
            ));
        }
        Ok(())
    }

    fn discover(&self, directive: &Directive) -> Result<Envelope, DirectiveError> {
        self.check_token(directive.discovery_token())?;
        let endpoints = self.controller.registry().endpoints();
        tracing::debug!(count = endpoints.len(), "Discovery response");
        Ok(Envelope::discovery(endpoints, directive.correlation_token()))
    }

    async fn control(&self, directive: &Directive) -> Result<Envelope, DirectiveError> {
        let token = directive.endpoint_token();
        self.check_token(token)?;

        let endpoint_id = directive.endpoint_id();
        if endpoint_id.is_empty() {
            return Err(DirectiveError::new(
                ErrorKind::MissingEndpointId,
                "No endpointId provided in request",
            ));
        }

        if !self.liveness.is_online(endpoint_id, token) {
            return Err(DirectiveError::new(
                ErrorKind::EndpointUnreachable,
                format!("Device offline: {endpoint_id}"),
            ));
        }

        let operation = Operation::parse(&directive.header.name).ok_or_else(|| {
            DirectiveError::new(
                ErrorKind::UnsupportedOperation,
                format!("No supported directive name: {}", directive.header.name),
            )
        })?;

        let correlation_token = directive.correlation_token();
        let envelope = match operation {
            Operation::TurnOn => {
                self.set_power(endpoint_id, PowerState::On, correlation_token)
                    .await?
            }
            Operation::TurnOff => {
                self.set_power(endpoint_id, PowerState::Off, correlation_token)
                    .await?
            }
            Operation::ReportState => self.report_state(endpoint_id, correlation_token).await?,
            Operation::SetTargetTemperature => {
                Self::set_target_temperature(endpoint_id, correlation_token)
            }
        };

        tracing::debug!(endpoint_id, event = %envelope.event.header.name, "Control confirmation");
        Ok(envelope)
    }

    async fn set_power(
        &self,
        endpoint_id: &str,
        power: PowerState,
        correlation_token: Option<&str>,
    ) -> Result<Envelope, DirectiveError> {
        let outcome = self.controller.set_power(endpoint_id, power).await?;
        tracing::info!(endpoint_id, "{outcome}");

        if !outcome.is_success() {
            return Err(DirectiveError::new(
                ErrorKind::EndpointUnreachable,
                outcome.to_string(),
            ));
        }

        Ok(Envelope::response(
            "Response",
            Context::power(power, Utc::now()),
            endpoint_id,
            correlation_token,
        ))
    }

    async fn report_state(
        &self,
        endpoint_id: &str,
        correlation_token: Option<&str>,
    ) -> Result<Envelope, DirectiveError> {
        let status = self.controller.report_status(endpoint_id).await?;

        Ok(Envelope::response(
            "StateReport",
            Context::state_report(&status, Utc::now()),
            endpoint_id,
            correlation_token,
        ))
    }

    // TODO: forward payload.targetSetpoint to HeatpumpController::set_temp.
    fn set_target_temperature(endpoint_id: &str, correlation_token: Option<&str>) -> Envelope {
        tracing::debug!(endpoint_id, "set_target_temperature");
        Envelope::response(
            "Response",
            Context::default(),
            endpoint_id,
            correlation_token,
        )
    }
}
