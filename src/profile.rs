use crate::aircraft::{Aircraft, CockpitEntry, EntryContext};
use crate::error::{Error, Result};
use crate::format::cockpit_name;
use crate::types::{Axis, GeoCoord, Waypoint, WaypointKind};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

/// Maximum number of waypoints in one sequence
pub const MAX_SEQUENCE_LEN: usize = 15;

/// Named set of waypoints and preplanned missions for one airframe
///
/// Waypoint numbers are kept up to date on every change: generic waypoints
/// are numbered per type, missions per station, both in insertion order.
/// Airframe limits are not enforced here. Waypoints beyond a limit stay in
/// the profile and are left out of the [`EntryPlan`].
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    aircraft: Aircraft,
    waypoints: Vec<Waypoint>,
}

/// A single position ready for cockpit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Label such as `WP2` or `MSN1`
    pub label: String,
    /// Name as typed into the cockpit
    pub cockpit_name: String,
    pub station: Option<u32>,
    pub entry: CockpitEntry,
}

/// Everything to enter for a profile, in entry order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPlan {
    pub aircraft: Aircraft,
    /// Valid missions, grouped by station in the airframe's station order
    pub missions: Vec<PlannedEntry>,
    /// Valid generic waypoints, sorted by type tag
    pub waypoints: Vec<PlannedEntry>,
    /// Sequence id to 1-based positions in the generic waypoint list
    pub sequences: BTreeMap<u32, Vec<usize>>,
}

impl Profile {
    pub fn new(name: impl Into<String>, aircraft: Aircraft) -> Self {
        Self {
            name: name.into(),
            aircraft,
            waypoints: Vec::new(),
        }
    }

    /// Create a profile holding `waypoints`
    ///
    /// Fails like [`add`](Self::add) if a sequence would overflow.
    pub fn with_waypoints(
        name: impl Into<String>,
        aircraft: Aircraft,
        waypoints: impl IntoIterator<Item = Waypoint>,
    ) -> Result<Self> {
        let mut profile = Self::new(name, aircraft);
        for waypoint in waypoints {
            profile.add(waypoint)?;
        }
        Ok(profile)
    }

    pub fn aircraft(&self) -> Aircraft {
        self.aircraft
    }

    pub fn set_aircraft(&mut self, aircraft: Aircraft) {
        self.aircraft = aircraft;
    }

    /// All waypoints and missions in insertion order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Append a waypoint or mission
    ///
    /// The profile is left untouched if the waypoint's sequence is full.
    pub fn add(&mut self, waypoint: Waypoint) -> Result<()> {
        self.check_sequence_capacity(&waypoint, None)?;
        self.waypoints.push(waypoint);
        self.renumber();
        Ok(())
    }

    /// Remove the waypoint at `index`
    pub fn remove(&mut self, index: usize) -> Option<Waypoint> {
        if index >= self.waypoints.len() {
            return None;
        }
        let removed = self.waypoints.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Replace the waypoint at `index`, returns the previous one
    ///
    /// Returns `None` for an out-of-range index.
    pub fn replace(&mut self, index: usize, waypoint: Waypoint) -> Result<Option<Waypoint>> {
        if index >= self.waypoints.len() {
            return Ok(None);
        }
        self.check_sequence_capacity(&waypoint, Some(index))?;
        let previous = std::mem::replace(&mut self.waypoints[index], waypoint);
        self.renumber();
        Ok(Some(previous))
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    fn check_sequence_capacity(&self, waypoint: &Waypoint, replacing: Option<usize>) -> Result<()> {
        if waypoint.is_mission() || waypoint.sequence == 0 {
            return Ok(());
        }

        let members = self
            .waypoints
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != replacing)
            .filter(|(_, other)| !other.is_mission() && other.sequence == waypoint.sequence)
            .count();

        if members >= MAX_SEQUENCE_LEN {
            return Err(Error::SequenceFull {
                sequence: waypoint.sequence,
                max: MAX_SEQUENCE_LEN,
            });
        }
        Ok(())
    }

    fn renumber(&mut self) {
        let mut counters: HashMap<(WaypointKind, Option<u32>), u32> = HashMap::new();
        for waypoint in &mut self.waypoints {
            let counter = counters
                .entry((waypoint.kind(), waypoint.station()))
                .or_default();
            *counter += 1;
            waypoint.set_number(*counter);
        }
    }

    /// Generic (non-mission) waypoints in insertion order
    pub fn generic_waypoints(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|waypoint| !waypoint.is_mission())
    }

    pub fn missions(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|waypoint| waypoint.is_mission())
    }

    pub fn waypoints_of_kind(&self, kind: WaypointKind) -> impl Iterator<Item = &Waypoint> {
        self.waypoints
            .iter()
            .filter(move |waypoint| waypoint.kind() == kind)
    }

    /// Missions grouped by station
    pub fn stations(&self) -> BTreeMap<u32, Vec<&Waypoint>> {
        let mut stations: BTreeMap<u32, Vec<&Waypoint>> = BTreeMap::new();
        for mission in self.missions() {
            if let Some(station) = mission.station() {
                stations.entry(station).or_default().push(mission);
            }
        }
        stations
    }

    /// Sequence ids in use, ascending
    pub fn sequences(&self) -> Vec<u32> {
        self.sequence_members().into_keys().collect()
    }

    /// 1-based positions of the members of `sequence` in the generic
    /// waypoint list
    pub fn sequence(&self, sequence: u32) -> Vec<usize> {
        self.sequence_members()
            .remove(&sequence)
            .unwrap_or_default()
    }

    fn sequence_members(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut sequences: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (index, waypoint) in self.generic_waypoints().enumerate() {
            if waypoint.sequence != 0 {
                sequences.entry(waypoint.sequence).or_default().push(index + 1);
            }
        }
        sequences
    }

    /// `true` if the airframe has room for this waypoint
    pub fn is_valid(&self, waypoint: &Waypoint) -> bool {
        self.aircraft.accepts(waypoint.kind(), waypoint.number())
    }

    /// Valid waypoints and missions in the order they are entered
    pub fn entry_plan(&self) -> EntryPlan {
        let mut missions: Vec<&Waypoint> = self
            .missions()
            .filter(|mission| self.is_valid(mission))
            .collect();
        missions.sort_by_key(|mission| {
            self.aircraft
                .station_rank(mission.station().unwrap_or_default())
        });

        let mut waypoints: Vec<&Waypoint> = self
            .generic_waypoints()
            .filter(|waypoint| self.is_valid(waypoint))
            .collect();
        waypoints.sort_by_key(|waypoint| waypoint.kind().tag());

        EntryPlan {
            aircraft: self.aircraft,
            missions: missions.into_iter().map(|m| self.planned_entry(m)).collect(),
            waypoints: waypoints.into_iter().map(|w| self.planned_entry(w)).collect(),
            sequences: self.sequence_members(),
        }
    }

    fn planned_entry(&self, waypoint: &Waypoint) -> PlannedEntry {
        let label = waypoint.label();
        PlannedEntry {
            cockpit_name: cockpit_name(&waypoint.name, &label),
            station: waypoint.station(),
            entry: self.aircraft.entry(
                &waypoint.position,
                waypoint.elevation,
                EntryContext::from(waypoint.kind()),
            ),
            label,
        }
    }

    /// Human readable listing of all waypoints, missions sorted by station
    pub fn to_readable_string(&self) -> String {
        let mut output = String::from("Waypoints:\n\n");
        for waypoint in self.generic_waypoints() {
            write_readable_line(&mut output, waypoint);
        }

        output.push_str("\nPreplanned missions:\n\n");
        let mut missions: Vec<&Waypoint> = self.missions().collect();
        missions.sort_by_key(|mission| mission.station());
        for mission in missions {
            write_readable_line(&mut output, mission);
        }

        output
    }
}

fn write_readable_line(output: &mut String, waypoint: &Waypoint) {
    let _ = writeln!(
        output,
        "{waypoint}: {} {} | {}ft",
        readable_dms(&waypoint.position.latitude()),
        readable_dms(&waypoint.position.longitude()),
        waypoint.elevation
    );
}

fn readable_dms<A: Axis>(coord: &GeoCoord<A>) -> String {
    // hundredths of an arc second
    let total = (coord.decimal_degree().abs() * 360_000.0).round() as u64;
    format!(
        "{}°{}'{:02}.{:02}\"{}",
        total / 360_000,
        (total % 360_000) / 6_000,
        (total % 6_000) / 100,
        total % 100,
        coord.hemisphere()
    )
}
