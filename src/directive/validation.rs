// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access-token and liveness checks applied before a directive is executed.
//!
//! Both checks are seams: the bundled implementations accept everything, and
//! a deployment can substitute its own without touching dispatch logic.

/// Decides whether an access token may use the bridge.
///
/// Empty tokens are rejected by the dispatcher before the validator is asked.
pub trait TokenValidator {
    /// Returns whether `token` is valid.
    fn is_valid(&self, token: &str) -> bool;
}

/// Accepts every non-empty token.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAnyToken;

impl TokenValidator for AcceptAnyToken {
    fn is_valid(&self, _token: &str) -> bool {
        true
    }
}

/// Decides whether an endpoint can currently be reached.
pub trait LivenessCheck {
    /// Returns whether `endpoint_id` is online for the holder of `token`.
    fn is_online(&self, endpoint_id: &str, token: &str) -> bool;
}

/// Reports every endpoint as online.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl LivenessCheck for AlwaysOnline {
    fn is_online(&self, endpoint_id: &str, _token: &str) -> bool {
        tracing::debug!(endpoint_id, "is_device_online");
        true
    }
}

impl<F> TokenValidator for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid(&self, token: &str) -> bool {
        self(token)
    }
}
