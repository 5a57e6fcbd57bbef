// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handles a single directive.
//!
//! Reads one directive document from stdin, writes the response envelope to
//! stdout. Configuration comes from the file named by
//! `MELVIEW_BRIDGE_CONFIG`; logs go to stderr and are filtered by `RUST_LOG`.
//! A configuration problem is answered with an `INTERNAL_ERROR` envelope.
//!
//! ```bash
//! MELVIEW_BRIDGE_CONFIG=bridge.json melview-bridge < directive.json
//! ```

use melview_bridge::config::BridgeConfig;
use melview_bridge::controller::HeatpumpController;
use melview_bridge::directive::{Dispatcher, Envelope, ErrorKind};
use melview_bridge::registry::StaticRegistry;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;

    let envelope = match load_dispatcher() {
        Ok(dispatcher) => {
            let request = serde_json::from_str(&input).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Input is not JSON");
                serde_json::Value::Null
            });
            dispatcher.handle_value(request).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Bridge is not configured");
            Envelope::error(
                ErrorKind::InternalError.error_type(),
                &format!("Bridge is not configured: {e}"),
                "",
                None,
            )
        }
    };

    let mut output = serde_json::to_vec(&envelope)?;
    output.push(b'\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(&output).await?;
    stdout.flush().await?;
    Ok(())
}

fn load_dispatcher() -> Result<Dispatcher<StaticRegistry>, Box<dyn std::error::Error>> {
    let config = BridgeConfig::from_env()?;
    let client = config.cloud_config().into_client()?;
    Ok(Dispatcher::new(HeatpumpController::new(client, config.devices)))
}
