// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the Melview client and controller using wiremock.

mod common;

use common::{
    COOKIE, LOUNGE_UNIT, client, mount_command, mount_login, mount_logout, mount_status,
    no_requests, status_body,
};
use melview_bridge::command::UnitCommand;
use melview_bridge::controller::{HeatpumpController, OutcomeKind, describe};
use melview_bridge::error::{Error, ParseError, ProtocolError, ValueError};
use melview_bridge::protocol::Session;
use melview_bridge::registry::{DeviceEntry, StaticRegistry};
use melview_bridge::types::{FanSpeed, OperatingMode, PowerState, Setpoint};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller(server: &MockServer) -> HeatpumpController<StaticRegistry> {
    let registry = StaticRegistry::new(vec![
        DeviceEntry::new("lounge", LOUNGE_UNIT),
        DeviceEntry::new("bedroom", "120002"),
    ]);
    HeatpumpController::new(client(server), registry)
}

// ============================================================================
// MelviewClient Tests
// ============================================================================

mod session {
    use super::*;

    #[tokio::test]
    async fn login_returns_session_cookie() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;

        let session = client(&server).login().await.unwrap();
        assert_eq!(session.cookie(), COOKIE);
    }

    #[tokio::test]
    async fn login_keeps_every_cookie_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.aspx"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("Set-Cookie", "auth=abc123; path=/; HttpOnly")
                    .append_header("Set-Cookie", "lang=en; Secure; Max-Age=3600"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let session = client(&server).login().await.unwrap();
        assert_eq!(session.cookie(), "auth=abc123; lang=en");
    }

    #[tokio::test]
    async fn login_rejected_is_auth_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.aspx"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();
        assert!(matches!(err, Error::AuthFailure { status: 401 }));
    }

    #[tokio::test]
    async fn login_without_cookie_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.aspx"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = client(&server).login().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::MissingSessionCookie)
        ));
    }

    #[tokio::test]
    async fn logout_failure_is_swallowed() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/api/logout.aspx"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        client.logout(session).await;
    }

    #[tokio::test]
    async fn with_session_logs_out_after_success() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;

        let client = client(&server);
        let value = client
            .with_session(async |session: &Session| Ok(session.cookie().to_string()))
            .await
            .unwrap();
        assert_eq!(value, COOKIE);
    }

    #[tokio::test]
    async fn with_session_logs_out_after_error() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;

        let client = client(&server);
        let result: Result<(), Error> = client
            .with_session(async |_session: &Session| {
                Err(Error::DeviceNotFound("attic".to_string()))
            })
            .await;
        assert!(matches!(result, Err(Error::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn with_session_skips_op_when_login_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.aspx"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        mount_logout(&server, 0).await;

        let client = client(&server);
        let mut ran = false;
        let result = client
            .with_session(async |_session: &Session| {
                ran = true;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(Error::AuthFailure { status: 403 })));
        assert!(!ran);
    }
}

mod rooms {
    use super::*;

    #[tokio::test]
    async fn list_rooms_flattens_first_building() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/rooms.aspx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"building": "Home", "units": [
                    {"room": "Lounge", "unitid": LOUNGE_UNIT},
                    {"room": "Bedroom", "unitid": "120002"}
                ]}
            ])))
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let units = client.list_rooms(&session).await.unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].room, "Lounge");
        assert_eq!(units[1].unit_id, "120002");
    }

    #[tokio::test]
    async fn list_rooms_with_zero_units_is_empty() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/rooms.aspx"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"building": "Home", "units": []}])),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        assert!(client.list_rooms(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_rooms_rejected_is_empty() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/rooms.aspx"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        assert!(client.list_rooms(&session).await.unwrap().is_empty());
    }
}

mod unit_calls {
    use super::*;

    #[tokio::test]
    async fn get_unit_status_parses_all_fields() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(1, 3, "24", "19")),
            1,
        )
        .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let status = client
            .get_unit_status(&session, LOUNGE_UNIT)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(status.power_state(), PowerState::On);
        assert_eq!(status.mode().unwrap(), OperatingMode::Cool);
        assert_eq!(status.roomtemp, "24");
        assert_eq!(status.settemp, "19");
        assert_eq!(status.airdirh, 3);
        assert_eq!(status.error, "ok");
    }

    #[tokio::test]
    async fn get_unit_status_rejected_is_none() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_status(&server, LOUNGE_UNIT, ResponseTemplate::new(500), 1).await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        assert!(
            client
                .get_unit_status(&session, LOUNGE_UNIT)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn get_unit_status_missing_field_fails() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        let mut body = status_body(1, 3, "24", "19");
        body.as_object_mut().unwrap().remove("roomtemp");
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(body),
            1,
        )
        .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let err = client
            .get_unit_status(&session, LOUNGE_UNIT)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingField(ref f)) if f == "roomtemp"));
    }

    #[tokio::test]
    async fn send_command_posts_encoded_opcode() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_command(&server, LOUNGE_UNIT, "TS22.5", 200, 1).await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let command = UnitCommand::Temperature(Setpoint::new(22.5).unwrap());
        assert!(
            client
                .send_command(&session, LOUNGE_UNIT, &command)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn send_command_rejected_is_false() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_command(&server, LOUNGE_UNIT, "PW0", 503, 1).await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let command = UnitCommand::Power(PowerState::Off);
        assert!(
            !client
                .send_command(&session, LOUNGE_UNIT, &command)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn get_unit_capabilities_returns_body() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/api/unitcapabilities.aspx"))
            .and(body_json(json!({ "unitid": LOUNGE_UNIT })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"max": {"heat": 31}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let session = client.login().await.unwrap();
        let caps = client
            .get_unit_capabilities(&session, LOUNGE_UNIT)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(caps["max"]["heat"], 31);
    }
}

// ============================================================================
// HeatpumpController Tests
// ============================================================================

mod power {
    use super::*;

    #[tokio::test]
    async fn already_in_state_sends_no_command() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(1, 1, "20", "21")),
            1,
        )
        .await;
        mount_command(&server, LOUNGE_UNIT, "PW1", 200, 0).await;

        let outcome = controller(&server).turn_on("lounge").await.unwrap();
        assert_eq!(outcome.kind(), OutcomeKind::Unchanged);
        assert_eq!(outcome.to_string(), "Heatpump is already on");
    }

    #[tokio::test]
    async fn turn_on_sends_power_command() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(0, 1, "20", "21")),
            1,
        )
        .await;
        mount_command(&server, LOUNGE_UNIT, "PW1", 200, 1).await;

        let outcome = controller(&server).turn_on("lounge").await.unwrap();
        assert_eq!(outcome.kind(), OutcomeKind::Changed);
        assert_eq!(outcome.to_string(), "Successfully turned on lounge");
    }

    #[tokio::test]
    async fn rejected_command_still_logs_out() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(1, 1, "20", "21")),
            1,
        )
        .await;
        mount_command(&server, LOUNGE_UNIT, "PW0", 500, 1).await;

        let outcome = controller(&server).turn_off("lounge").await.unwrap();
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
        assert_eq!(outcome.to_string(), "Failed to turn off lounge");
    }

    #[tokio::test]
    async fn unavailable_status_still_sends_command() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(&server, LOUNGE_UNIT, ResponseTemplate::new(500), 1).await;
        mount_command(&server, LOUNGE_UNIT, "PW1", 200, 1).await;

        let outcome = controller(&server).turn_on("lounge").await.unwrap();
        assert_eq!(outcome.kind(), OutcomeKind::Changed);
    }

    #[tokio::test]
    async fn unknown_device_logs_out() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(&server, LOUNGE_UNIT, ResponseTemplate::new(200), 0).await;

        let result = controller(&server).turn_on("attic").await;
        assert!(matches!(result, Err(Error::DeviceNotFound(ref name)) if name == "attic"));
        assert_eq!(describe(&result), "Failed to find attic");
    }

    #[tokio::test]
    async fn login_failure_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login.aspx"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        mount_logout(&server, 0).await;

        let result = controller(&server).turn_on("lounge").await;
        assert!(describe(&result).starts_with("Login Failed"));
    }
}

mod settings {
    use super::*;

    #[tokio::test]
    async fn set_mode_sends_numeric_code() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_command(&server, LOUNGE_UNIT, "MD3", 200, 1).await;

        let outcome = controller(&server)
            .set_mode("lounge", "cool")
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "Successfully set lounge mode to cool");
    }

    #[tokio::test]
    async fn every_supported_mode_uses_the_table() {
        let server = MockServer::start().await;
        let table = [("heat", "MD1"), ("dry", "MD2"), ("cool", "MD3"), ("fan", "MD7"), ("auto", "MD8")];
        mount_login(&server, 5).await;
        mount_logout(&server, 5).await;
        for (_, command) in table {
            mount_command(&server, LOUNGE_UNIT, command, 200, 1).await;
        }

        let controller = controller(&server);
        for (mode, _) in table {
            let outcome = controller.set_mode("lounge", mode).await.unwrap();
            assert_eq!(outcome.kind(), OutcomeKind::Changed, "{mode}");
        }
    }

    #[tokio::test]
    async fn unknown_mode_fails_before_any_request() {
        let server = MockServer::start().await;

        let result = controller(&server).set_mode("lounge", "turbo").await;
        assert!(matches!(
            result,
            Err(Error::Value(ValueError::UnknownMode(ref m))) if m == "turbo"
        ));
        assert!(no_requests(&server).await);
    }

    #[tokio::test]
    async fn set_temp_and_fan() {
        let server = MockServer::start().await;
        mount_login(&server, 2).await;
        mount_logout(&server, 2).await;
        mount_command(&server, "120002", "TS19", 200, 1).await;
        mount_command(&server, "120002", "FS3", 200, 1).await;

        let controller = controller(&server);
        let temp = controller
            .set_temp("bedroom", Setpoint::new(19.0).unwrap())
            .await
            .unwrap();
        assert_eq!(temp.to_string(), "Successfully set bedroom temperature to 19");

        let fan = controller
            .set_fan("Bedroom", FanSpeed::new(3).unwrap())
            .await
            .unwrap();
        assert_eq!(fan.kind(), OutcomeKind::Changed);
    }

    #[tokio::test]
    async fn rejected_setting_is_failed_outcome() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_command(&server, LOUNGE_UNIT, "FS0", 400, 1).await;

        let outcome = controller(&server)
            .set_fan("lounge", FanSpeed::AUTO)
            .await
            .unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.to_string(), "Failed to set lounge fan speed to 0");
    }
}

mod status {
    use super::*;

    #[tokio::test]
    async fn report_status_returns_snapshot() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(0, 8, "17", "22")),
            1,
        )
        .await;

        let status = controller(&server).report_status("lounge").await.unwrap();
        assert_eq!(status.mode().unwrap(), OperatingMode::Auto);
        assert_eq!(status.power_state(), PowerState::Off);
    }

    #[tokio::test]
    async fn report_status_rejected_is_remote_failure() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(&server, LOUNGE_UNIT, ResponseTemplate::new(502), 1).await;

        let err = controller(&server)
            .report_status("lounge")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteCallFailure { .. }));
    }

    #[tokio::test]
    async fn report_status_partial_body_logs_out() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(json!({"power": 1, "setmode": 3})),
            1,
        )
        .await;

        let err = controller(&server)
            .report_status("lounge")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MissingField(_))));
    }

    #[tokio::test]
    async fn list_heatpumps_skips_units_without_status() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/rooms.aspx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"building": "Home", "units": [
                    {"room": "Lounge", "unitid": LOUNGE_UNIT},
                    {"room": "Bedroom", "unitid": "120002"}
                ]}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(1, 1, "20", "21")),
            1,
        )
        .await;
        mount_status(&server, "120002", ResponseTemplate::new(500), 1).await;
        Mock::given(method("POST"))
            .and(path("/api/unitcapabilities.aspx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(2)
            .mount(&server)
            .await;

        let heatpumps = controller(&server).list_heatpumps().await.unwrap();
        assert_eq!(heatpumps.len(), 1);
        assert_eq!(heatpumps[0].room, "Lounge");
        assert_eq!(heatpumps[0].unit_id, LOUNGE_UNIT);
        assert_eq!(heatpumps[0].status.power_state(), PowerState::On);
    }

    #[tokio::test]
    async fn list_heatpumps_ignores_undecodable_capabilities() {
        let server = MockServer::start().await;
        mount_login(&server, 1).await;
        mount_logout(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/api/rooms.aspx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"building": "Home", "units": [{"room": "Lounge", "unitid": LOUNGE_UNIT}]}
            ])))
            .mount(&server)
            .await;
        mount_status(
            &server,
            LOUNGE_UNIT,
            ResponseTemplate::new(200).set_body_json(status_body(0, 2, "20", "21")),
            1,
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/api/unitcapabilities.aspx"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let heatpumps = controller(&server).list_heatpumps().await.unwrap();
        assert_eq!(heatpumps.len(), 1);
        assert_eq!(heatpumps[0].status.mode().unwrap(), OperatingMode::Dry);
    }
}
