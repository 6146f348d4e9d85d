#![doc = include_str!("../README.md")]

pub use crate::aircraft::{Aircraft, CockpitEntry, Elevation, EntryContext, Limit};
pub use crate::bases::{Base, BaseDirectory};
pub use crate::error::{Error, Result, Warning};
pub use crate::format::{CockpitCoordinates, FormatOptions, format_position};
pub use crate::geodesy::{Ellipsoid, GeodesicSolution};
pub use crate::profile::{EntryPlan, MAX_SEQUENCE_LEN, PlannedEntry, Profile};
pub use crate::record::{ProfileRecord, WaypointRecord};
pub use crate::types::*;

pub mod aircraft;
pub mod bases;
pub mod capture;
mod error;
pub mod format;
pub mod geodesy;
pub mod mgrs;
pub mod profile;
pub mod record;
mod types;
