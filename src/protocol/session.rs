// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authenticated session handle.

use std::fmt;

/// An authenticated vendor API session.
///
/// Obtained from [`MelviewClient::login`](super::MelviewClient::login) and
/// released by [`MelviewClient::logout`](super::MelviewClient::logout), which
/// takes the session by value. The handle is deliberately not `Clone`, so a
/// session can be released at most once.
///
/// Prefer [`MelviewClient::with_session`](super::MelviewClient::with_session),
/// which guarantees the release on every exit path.
#[derive(PartialEq, Eq)]
pub struct Session {
    cookie: String,
}

impl Session {
    /// Builds a session from the cookies handed out at login.
    ///
    /// Each cookie is kept as a `name=value` pair; attributes such as `path`
    /// or `expires` were already stripped by the cookie parser. Returns `None`
    /// if there is no cookie.
    pub(crate) fn from_cookies<N, V>(cookies: impl IntoIterator<Item = (N, V)>) -> Option<Self>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<String> = cookies
            .into_iter()
            .map(|(name, value)| format!("{}={}", name.as_ref(), value.as_ref()))
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(Self {
                cookie: pairs.join("; "),
            })
        }
    }

    /// Returns the value replayed in the `Cookie` header.
    #[must_use]
    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
