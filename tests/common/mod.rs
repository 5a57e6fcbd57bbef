// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared wiremock fixtures standing in for the Melview cloud API.

#![allow(dead_code)]

use melview_bridge::protocol::{CloudConfig, MelviewClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER: &str = "user@example.com";
pub const PASS: &str = "secret";
pub const COOKIE: &str = "auth=abc123";
pub const LOUNGE_UNIT: &str = "120001";

pub fn client(server: &MockServer) -> MelviewClient {
    CloudConfig::new(USER, PASS)
        .with_base_url(server.uri())
        .into_client()
        .unwrap()
}

pub fn status_body(power: u8, setmode: u8, roomtemp: &str, settemp: &str) -> serde_json::Value {
    json!({
        "id": LOUNGE_UNIT,
        "power": power,
        "standby": 0,
        "setmode": setmode,
        "automode": 0,
        "setfan": 1,
        "settemp": settemp,
        "roomtemp": roomtemp,
        "airdir": 2,
        "airdirh": 3,
        "sendcount": 0,
        "fault": "",
        "error": "ok"
    })
}

/// Accepts the configured credentials exactly `times` times.
pub async fn mount_login(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/login.aspx"))
        .and(body_json(json!({
            "user": USER,
            "pass": PASS,
            "appversion": CloudConfig::DEFAULT_APP_VERSION
        })))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "auth=abc123; path=/; HttpOnly"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Expects exactly `times` logouts carrying the session cookie.
pub async fn mount_logout(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/api/logout.aspx"))
        .and(header("Cookie", COOKIE))
        .respond_with(ResponseTemplate::new(200))
        .expect(times)
        .mount(server)
        .await;
}

/// Answers status requests for `unit_id`.
pub async fn mount_status(
    server: &MockServer,
    unit_id: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path("/api/unitcommand.aspx"))
        .and(header("Cookie", COOKIE))
        .and(body_json(json!({ "unitid": unit_id, "v": 2 })))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Answers a single encoded command for `unit_id`.
pub async fn mount_command(
    server: &MockServer,
    unit_id: &str,
    command: &str,
    status: u16,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path("/api/unitcommand.aspx"))
        .and(header("Cookie", COOKIE))
        .and(body_json(
            json!({ "unitid": unit_id, "v": 2, "commands": command }),
        ))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Returns whether any request reached the mock server.
pub async fn no_requests(server: &MockServer) -> bool {
    server
        .received_requests()
        .await
        .is_none_or(|requests| requests.is_empty())
}
