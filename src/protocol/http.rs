// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Melview cloud API.

use std::fmt;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Client, Response, StatusCode};
use serde_json::json;

use crate::command::UnitCommand;
use crate::error::{Error, ParseError, ProtocolError};
use crate::protocol::Session;
use crate::response::{Unit, UnitStatus, units_from_topology};

const LOGIN: &str = "api/login.aspx";
const LOGOUT: &str = "api/logout.aspx";
const ROOMS: &str = "api/rooms.aspx";
const UNIT_COMMAND: &str = "api/unitcommand.aspx";
const UNIT_CAPABILITIES: &str = "api/unitcapabilities.aspx";

/// Protocol version sent with every unit command request.
const PROTOCOL_VERSION: u8 = 2;

// ============================================================================
// CloudConfig - Connection and credential settings
// ============================================================================

/// Configuration for the Melview cloud client.
///
/// Credentials are passed in explicitly; nothing is read from globals.
///
/// # Examples
///
/// ```
/// use melview_bridge::protocol::CloudConfig;
/// use std::time::Duration;
///
/// let config = CloudConfig::new("me@example.com", "secret")
///     .with_base_url("http://127.0.0.1:8080")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080/");
/// assert_eq!(config.app_version(), CloudConfig::DEFAULT_APP_VERSION);
/// ```
#[derive(Clone)]
pub struct CloudConfig {
    base_url: String,
    username: String,
    password: String,
    app_version: String,
    timeout: Option<Duration>,
}

impl CloudConfig {
    /// Default vendor API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.melview.net/";
    /// Client version string submitted at login.
    pub const DEFAULT_APP_VERSION: &'static str = "3.2.673";

    /// Creates a configuration for the given account.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            username: username.into(),
            password: password.into(),
            app_version: Self::DEFAULT_APP_VERSION.to_string(),
            timeout: None,
        }
    }

    /// Overrides the API root. A trailing slash is added if missing.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Overrides the client version string sent at login.
    #[must_use]
    pub fn with_app_version(mut self, app_version: impl Into<String>) -> Self {
        self.app_version = app_version.into();
        self
    }

    /// Sets a request timeout. Without one the transport default applies.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the API root, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the client version string.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Returns the request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Creates a [`MelviewClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not HTTP(S) or the HTTP client cannot
    /// be created.
    pub fn into_client(self) -> Result<MelviewClient, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ProtocolError::Http)?;

        Ok(MelviewClient {
            base_url: self.base_url,
            client,
            username: self.username,
            password: self.password,
            app_version: self.app_version,
        })
    }
}

impl fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("app_version", &self.app_version)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// MelviewClient - Session-scoped vendor API client
// ============================================================================

/// Client for the Melview cloud API.
///
/// Every call is a single attempt. Non-200 answers from device-facing
/// endpoints are soft failures (`None`, `false` or an empty list); only
/// transport and decoding problems are returned as errors.
///
/// # Examples
///
/// ```no_run
/// use melview_bridge::command::UnitCommand;
/// use melview_bridge::protocol::{CloudConfig, Session};
/// use melview_bridge::types::PowerState;
///
/// # async fn example() -> melview_bridge::Result<()> {
/// let client = CloudConfig::new("me@example.com", "secret").into_client()?;
///
/// let sent = client
///     .with_session(async |session: &Session| {
///         client
///             .send_command(session, "120001", &UnitCommand::Power(PowerState::On))
///             .await
///     })
///     .await?;
/// println!("accepted: {sent}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MelviewClient {
    base_url: String,
    client: Client,
    username: String,
    password: String,
    app_version: String,
}

impl MelviewClient {
    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Logs in with the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::AuthFailure` on any non-200 answer, and a protocol
    /// error if the request fails or no session cookie is handed out.
    pub async fn login(&self) -> Result<Session, Error> {
        let body = json!({
            "user": self.username,
            "pass": self.password,
            "appversion": self.app_version,
        });

        let response = self
            .client
            .post(self.url(LOGIN))
            .json(&body)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            reason = status.canonical_reason().unwrap_or("Unknown"),
            "login result"
        );

        if status != StatusCode::OK {
            return Err(Error::AuthFailure {
                status: status.as_u16(),
            });
        }

        let cookies: Vec<(String, String)> = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        tracing::debug!(count = cookies.len(), "login cookies");

        Session::from_cookies(cookies).ok_or_else(|| ProtocolError::MissingSessionCookie.into())
    }

    /// Releases a session.
    ///
    /// Best effort: failures are logged and never returned.
    pub async fn logout(&self, session: Session) {
        let result = self
            .client
            .post(self.url(LOGOUT))
            .header(COOKIE, session.cookie())
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                tracing::debug!(status = response.status().as_u16(), "logout result");
            }
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "logout rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout failed");
            }
        }
    }

    /// Runs `op` inside a fresh session.
    ///
    /// Logs in, awaits `op` with the session, then logs out whatever `op`
    /// returned. If the login fails `op` is never called.
    ///
    /// # Errors
    ///
    /// Returns the login error, or whatever `op` returns.
    pub async fn with_session<T, F>(&self, op: F) -> Result<T, Error>
    where
        F: AsyncFnOnce(&Session) -> Result<T, Error>,
    {
        let session = self.login().await?;
        let result = op(&session).await;
        self.logout(session).await;
        result
    }

    async fn post(
        &self,
        session: &Session,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<Response, ProtocolError> {
        self.client
            .post(self.url(endpoint))
            .header(COOKIE, session.cookie())
            .json(body)
            .send()
            .await
            .map_err(ProtocolError::Http)
    }

    async fn read_json(response: Response) -> Result<serde_json::Value, Error> {
        let body = response.text().await.map_err(ProtocolError::Http)?;
        tracing::trace!(body = %body, "Received response body");
        Ok(serde_json::from_str(&body).map_err(ParseError::from)?)
    }

    /// Lists every unit of the account's first building.
    ///
    /// A non-200 answer or an empty topology yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not a building list.
    pub async fn list_rooms(&self, session: &Session) -> Result<Vec<Unit>, Error> {
        let response = self
            .client
            .get(self.url(ROOMS))
            .header(COOKIE, session.cookie())
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "list_rooms result");
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Room listing rejected");
            return Ok(Vec::new());
        }

        let body = Self::read_json(response).await?;
        let units = units_from_topology(body).map_err(ParseError::from)?;
        for unit in &units {
            tracing::debug!(room = %unit.room, unit_id = %unit.unit_id, "found room");
        }
        Ok(units)
    }

    /// Fetches the current status of a unit.
    ///
    /// Returns `None` on a non-200 answer.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is missing any status
    /// field.
    pub async fn get_unit_status(
        &self,
        session: &Session,
        unit_id: &str,
    ) -> Result<Option<UnitStatus>, Error> {
        let body = json!({ "unitid": unit_id, "v": PROTOCOL_VERSION });
        let response = self.post(session, UNIT_COMMAND, &body).await?;

        let status = response.status();
        tracing::debug!(unit_id, status = status.as_u16(), "get_unit_status result");
        if status != StatusCode::OK {
            return Ok(None);
        }

        let body = Self::read_json(response).await?;
        Ok(Some(UnitStatus::from_json(&body)?))
    }

    /// Fetches the capability description of a unit.
    ///
    /// Returns `None` on a non-200 answer. The body is returned undecoded.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is not JSON.
    pub async fn get_unit_capabilities(
        &self,
        session: &Session,
        unit_id: &str,
    ) -> Result<Option<serde_json::Value>, Error> {
        let body = json!({ "unitid": unit_id });
        let response = self.post(session, UNIT_CAPABILITIES, &body).await?;

        let status = response.status();
        tracing::debug!(
            unit_id,
            status = status.as_u16(),
            "get_unit_capabilities result"
        );
        if status != StatusCode::OK {
            return Ok(None);
        }

        Ok(Some(Self::read_json(response).await?))
    }

    /// Sends a single command to a unit.
    ///
    /// Returns `true` only on a 200 answer. Whether the unit actually applied
    /// the change is not verified.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn send_command(
        &self,
        session: &Session,
        unit_id: &str,
        command: &UnitCommand,
    ) -> Result<bool, Error> {
        let body = json!({
            "unitid": unit_id,
            "v": PROTOCOL_VERSION,
            "commands": command.encode(),
        });
        let response = self.post(session, UNIT_COMMAND, &body).await?;

        let status = response.status();
        tracing::debug!(
            unit_id,
            command = %command,
            status = status.as_u16(),
            "send_command result"
        );
        Ok(status == StatusCode::OK)
    }
}

impl fmt::Debug for MelviewClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MelviewClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
