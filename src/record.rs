//! JSON exchange format of profiles
//!
//! A profile is stored as its name, airframe and a flat list of waypoint
//! records. Loading is fail-soft: records that can't be turned into
//! waypoints are skipped and reported as [`Warning::SkippedWaypoint`].

use crate::aircraft::Aircraft;
use crate::error::{Result, Warning};
use crate::profile::Profile;
use crate::types::{Position, Waypoint, WaypointKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use tracing::debug;

/// Persisted shape of a [`Profile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub aircraft: Aircraft,
    #[serde(default)]
    pub waypoints: Vec<WaypointRecord>,
}

/// Persisted shape of a [`Waypoint`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Elevation in feet
    #[serde(default)]
    pub elevation: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sequence: u32,
    /// Type tag such as `WP` or `MSN`
    pub wp_type: String,
    #[serde(default)]
    pub station: Option<u32>,
    /// Informational, recomputed on load
    #[serde(default)]
    pub number: u32,
}

/// Document with unparsed waypoint records, so a single bad record doesn't
/// reject the whole profile
#[derive(Deserialize)]
struct ProfileDocument {
    name: String,
    aircraft: Aircraft,
    #[serde(default)]
    waypoints: Vec<Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl WaypointRecord {
    pub fn from_waypoint(waypoint: &Waypoint) -> Self {
        Self {
            name: waypoint.name.clone(),
            latitude: waypoint.position.latitude().decimal_degree(),
            longitude: waypoint.position.longitude().decimal_degree(),
            elevation: waypoint.elevation,
            sequence: waypoint.sequence,
            wp_type: waypoint.kind().tag().to_string(),
            station: waypoint.station(),
            number: waypoint.number(),
        }
    }

    /// Build the waypoint; the number is assigned once it joins a profile
    pub fn to_waypoint(&self) -> Result<Waypoint> {
        let kind: WaypointKind = self.wp_type.parse()?;
        let position = Position::new(self.latitude, self.longitude)?;

        Ok(Waypoint::with_kind(position, kind, self.station)?
            .with_name(self.name.as_str())
            .with_elevation(self.elevation)
            .with_sequence(self.sequence))
    }
}

impl Profile {
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            name: self.name.clone(),
            aircraft: self.aircraft(),
            waypoints: self
                .waypoints()
                .iter()
                .map(WaypointRecord::from_waypoint)
                .collect(),
        }
    }

    /// Rebuild a profile, skipping records that are rejected
    pub fn from_record(record: &ProfileRecord, warnings: &mut Vec<Warning>) -> Self {
        let mut profile = Profile::new(record.name.as_str(), record.aircraft);
        profile.add_records(record.waypoints.iter().map(Ok), warnings);
        profile
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record())?)
    }

    /// Load a profile from its JSON document
    ///
    /// Fails only if the document itself is unusable (not JSON, or missing
    /// the name or airframe). Bad waypoint records are skipped.
    pub fn from_json(json: &str, warnings: &mut Vec<Warning>) -> Result<Self> {
        let document: ProfileDocument = serde_json::from_str(json)?;

        let records = document.waypoints.into_iter().map(|value| {
            serde_json::from_value::<WaypointRecord>(value).map_err(|error| error.to_string())
        });

        let mut profile = Profile::new(document.name, document.aircraft);
        profile.add_records(records, warnings);
        Ok(profile)
    }

    /// Add records in order; a record that fails to decode or is rejected
    /// is reported with its index
    fn add_records<R>(
        &mut self,
        records: impl IntoIterator<Item = std::result::Result<R, String>>,
        warnings: &mut Vec<Warning>,
    ) where
        R: Borrow<WaypointRecord>,
    {
        for (index, record) in records.into_iter().enumerate() {
            let added = record.and_then(|record| {
                record
                    .borrow()
                    .to_waypoint()
                    .and_then(|waypoint| self.add(waypoint))
                    .map_err(|error| error.to_string())
            });

            if let Err(reason) = added {
                skip_waypoint(index, reason, warnings);
            }
        }
    }
}

fn skip_waypoint(index: usize, reason: String, warnings: &mut Vec<Warning>) {
    debug!(index, %reason, "skipping waypoint record");
    warnings.push(Warning::SkippedWaypoint { index, reason });
}
