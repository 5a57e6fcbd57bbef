// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote device client for the Melview cloud API.
//!
//! # Endpoints
//!
//! | Endpoint | Method | Body |
//! |----------|--------|------|
//! | `/api/login.aspx` | POST | `{user, pass, appversion}` |
//! | `/api/logout.aspx` | POST | - |
//! | `/api/rooms.aspx` | GET | - |
//! | `/api/unitcommand.aspx` | POST | `{unitid, v: 2}` (status) or `{unitid, v: 2, commands}` |
//! | `/api/unitcapabilities.aspx` | POST | `{unitid}` |
//!
//! # Sessions
//!
//! Login hands out a session cookie that every other call replays. A
//! [`Session`] must not outlive the operation that created it; use
//! [`MelviewClient::with_session`] so the logout happens on every exit path.

mod http;
mod session;

pub use http::{CloudConfig, MelviewClient};
pub use session::Session;
