// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for vendor API JSON bodies.

mod rooms;
mod status;

pub use rooms::{Building, Unit, units_from_topology};
pub use status::UnitStatus;

use serde::{Deserialize, Deserializer};

/// Accepts either a JSON string or a JSON number and keeps its text.
///
/// The vendor API is not consistent about quoting identifiers and
/// temperatures.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
