// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room topology parsing for `/api/rooms.aspx`.

use serde::Deserialize;

use crate::response::string_or_number;

/// A building as listed by the rooms endpoint.
///
/// Only the unit list is decoded; building metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Building {
    /// Units installed in this building.
    #[serde(default)]
    pub units: Vec<Unit>,
}

/// An indoor unit with the room it is installed in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Unit {
    /// Human-readable room name.
    pub room: String,
    /// Vendor-assigned unit identifier.
    #[serde(rename = "unitid", deserialize_with = "string_or_number")]
    pub unit_id: String,
}

/// Flattens a rooms body to the units of its first building.
///
/// An empty topology yields an empty list.
///
/// # Errors
///
/// Returns error if the body is not a list of buildings.
pub fn units_from_topology(value: serde_json::Value) -> Result<Vec<Unit>, serde_json::Error> {
    let buildings: Vec<Building> = serde_json::from_value(value)?;
    Ok(buildings
        .into_iter()
        .next()
        .map(|building| building.units)
        .unwrap_or_default())
}
