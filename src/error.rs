// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Melview bridge.
//!
//! This module provides the error hierarchy used by the remote device client
//! and the convenience wrappers: value validation, protocol communication,
//! JSON parsing, authentication and device lookup.
//!
//! Non-200 answers from device-facing endpoints are *not* errors at the client
//! level; they surface as `None`/`false` and are turned into
//! [`Error::RemoteCallFailure`] only by callers that need a hard failure.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The vendor API rejected the login.
    #[error("Login Failed (HTTP {status})")]
    AuthFailure {
        /// HTTP status code returned by the login endpoint.
        status: u16,
    },

    /// The device name is not known to the registry.
    #[error("Failed to find {0}")]
    DeviceNotFound(String),

    /// A device-facing call answered with a non-200 status.
    #[error("{operation} was rejected by the remote API")]
    RemoteCallFailure {
        /// The client operation that failed.
        operation: &'static str,
    },
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A mode string outside the supported table was provided.
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// A numeric mode code outside the supported table was reported.
    #[error("unknown mode code: {0}")]
    UnknownModeCode(u8),

    /// A target temperature is not a finite value inside the accepted range.
    #[error("invalid setpoint: {0}")]
    InvalidSetpoint(String),
}

/// Errors related to protocol communication with the vendor API.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The login succeeded but did not hand out a session cookie.
    #[error("login response carried no session cookie")]
    MissingSessionCookie,
}

/// Errors related to parsing vendor API responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to loading the bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration document is invalid.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
