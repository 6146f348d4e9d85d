use crate::bases::BaseDirectory;
use crate::error::{Error, Result};
use crate::types::Position;
use std::fmt;
use std::str::FromStr;

/// Navigation point categories
///
/// Most airframes only know plain waypoints, the Tomcat additionally has
/// dedicated slots for the other categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WaypointType {
    Waypoint,
    FixPoint,
    InitialPoint,
    SurfaceTarget,
    HostileArea,
    DefendedPoint,
    HomeBase,
}

impl WaypointType {
    pub const ALL: [WaypointType; 7] = [
        WaypointType::Waypoint,
        WaypointType::FixPoint,
        WaypointType::InitialPoint,
        WaypointType::SurfaceTarget,
        WaypointType::HostileArea,
        WaypointType::DefendedPoint,
        WaypointType::HomeBase,
    ];

    /// Parse from the two-letter tag (e.g. `WP`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            WaypointType::Waypoint => "WP",
            WaypointType::FixPoint => "FP",
            WaypointType::InitialPoint => "IP",
            WaypointType::SurfaceTarget => "ST",
            WaypointType::HostileArea => "HA",
            WaypointType::DefendedPoint => "DP",
            WaypointType::HomeBase => "HB",
        }
    }
}

/// Generic navigation point or preplanned mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaypointKind {
    Generic(WaypointType),
    Mission,
}

impl WaypointKind {
    pub const MISSION_TAG: &'static str = "MSN";

    pub fn tag(self) -> &'static str {
        match self {
            WaypointKind::Generic(wp_type) => wp_type.tag(),
            WaypointKind::Mission => Self::MISSION_TAG,
        }
    }

    pub fn is_mission(self) -> bool {
        self == WaypointKind::Mission
    }
}

impl FromStr for WaypointKind {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self> {
        if tag == Self::MISSION_TAG {
            return Ok(WaypointKind::Mission);
        }
        WaypointType::from_tag(tag)
            .map(WaypointKind::Generic)
            .ok_or_else(|| Error::UnknownWaypointType(tag.to_string()))
    }
}

impl fmt::Display for WaypointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Where a waypoint's position comes from
#[derive(Debug, Clone)]
pub enum PositionInput {
    Coordinates(Position),
    /// Name of a known base, resolved through a [`BaseDirectory`]
    BaseName(String),
}

/// A navigation point or preplanned mission of a profile
///
/// Missions always carry a non-zero weapon station, generic waypoints never
/// do. The running `number` is maintained by the owning
/// [`Profile`](crate::Profile).
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub position: Position,
    /// Elevation in feet
    pub elevation: f64,
    pub name: String,
    /// Sequence identifier, 0 for none
    pub sequence: u32,
    kind: WaypointKind,
    station: Option<u32>,
    number: u32,
}

impl Waypoint {
    /// Plain `WP` waypoint at `position`
    pub fn new(position: Position) -> Self {
        Self {
            position,
            elevation: 0.0,
            name: String::new(),
            sequence: 0,
            kind: WaypointKind::Generic(WaypointType::Waypoint),
            station: None,
            number: 0,
        }
    }

    /// Preplanned mission on weapon `station`
    pub fn mission(position: Position, station: u32) -> Result<Self> {
        Self::with_kind(position, WaypointKind::Mission, Some(station))
    }

    /// Waypoint of any kind
    ///
    /// Missions need a non-zero station, generic waypoints must not have
    /// one (a zero station counts as none).
    pub fn with_kind(position: Position, kind: WaypointKind, station: Option<u32>) -> Result<Self> {
        let station = station.filter(|station| *station != 0);
        match (kind, station) {
            (WaypointKind::Mission, None) => return Err(Error::MissingStation),
            (WaypointKind::Generic(_), Some(station)) => {
                return Err(Error::UnexpectedStation(station));
            }
            _ => {}
        }

        Ok(Self {
            kind,
            station,
            ..Self::new(position)
        })
    }

    /// Resolve `input` and create a plain waypoint
    ///
    /// A base name takes the base's position, elevation and name.
    pub fn from_input(input: PositionInput, bases: &BaseDirectory) -> Result<Self> {
        match input {
            PositionInput::Coordinates(position) => Ok(Self::new(position)),
            PositionInput::BaseName(name) => {
                let base = bases.get(&name).ok_or(Error::UnknownBase(name))?;
                Ok(Self::new(base.position.clone())
                    .with_name(&base.name)
                    .with_elevation(base.elevation))
            }
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_elevation(mut self, feet: f64) -> Self {
        self.elevation = feet;
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn kind(&self) -> WaypointKind {
        self.kind
    }

    pub fn is_mission(&self) -> bool {
        self.kind.is_mission()
    }

    pub fn station(&self) -> Option<u32> {
        self.station
    }

    /// 1-based running number within the waypoint's type or station group
    pub fn number(&self) -> u32 {
        self.number
    }

    pub(crate) fn set_number(&mut self, number: u32) {
        self.number = number;
    }

    /// Short label such as `WP3` or `MSN1`
    pub fn label(&self) -> String {
        format!("{}{}", self.kind.tag(), self.number)
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())?;

        match (self.kind, self.station) {
            (WaypointKind::Mission, Some(station)) => write!(f, " | STA{station}")?,
            (WaypointKind::Generic(WaypointType::Waypoint), _) if self.sequence != 0 => {
                write!(f, " | SEQ{}", self.sequence)?
            }
            _ => {}
        }

        if !self.name.is_empty() {
            write!(f, " | {}", self.name)?;
        }
        Ok(())
    }
}
