use crate::error::{Error, Result, Warning};
use crate::types::Position;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Moving carriers have no fixed position
const SKIPPED_BASES: [&str; 4] = ["Stennis", "Kuznetsov", "Kuznetsov North", "Kuznetsov South"];

/// A named airfield or landmark with a known position
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub name: String,
    pub position: Position,
    /// Elevation in feet
    pub elevation: f64,
}

/// Name to base lookup table
///
/// Built from one or more base feeds and handed to everything that needs
/// to resolve base names.
#[derive(Debug, Clone, Default)]
pub struct BaseDirectory {
    bases: BTreeMap<String, Base>,
}

#[derive(Debug, Deserialize)]
struct BaseEntry {
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: Option<f64>,
    #[serde(rename = "locationDetails")]
    location_details: Option<LocationDetails>,
}

#[derive(Debug, Deserialize)]
struct LocationDetails {
    lat: Option<f64>,
    lon: Option<f64>,
    altitude: Option<f64>,
}

impl BaseEntry {
    fn into_base(self) -> std::result::Result<Base, String> {
        let details = self.location_details.as_ref();
        let latitude = self
            .latitude
            .or_else(|| details.and_then(|d| d.lat))
            .ok_or("missing latitude")?;
        let longitude = self
            .longitude
            .or_else(|| details.and_then(|d| d.lon))
            .ok_or("missing longitude")?;
        let elevation = self
            .elevation
            .or_else(|| details.and_then(|d| d.altitude))
            .ok_or("missing elevation")?;

        let position = Position::new(latitude, longitude)
            .map_err(|error| error.to_string())?
            .with_name(&self.name);

        Ok(Base {
            name: self.name,
            position,
            elevation,
        })
    }
}

impl BaseDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from a single JSON base feed
    ///
    /// See [`load_json`](Self::load_json) for the accepted shapes.
    pub fn from_json(json: &str, warnings: &mut Vec<Warning>) -> Result<Self> {
        let mut directory = Self::new();
        directory.load_json(json, warnings)?;
        Ok(directory)
    }

    /// Add all bases of a JSON base feed, returns the number of bases added
    ///
    /// The feed is either `{"waypoints": [ ... ]}` or an object mapping
    /// arbitrary keys to bases. Each base has a `name` and either
    /// `latitude`/`longitude`/`elevation` or
    /// `locationDetails.{lat,lon,altitude}`. Entries that can't be used are
    /// skipped with a warning; moving carriers are skipped silently.
    pub fn load_json(&mut self, json: &str, warnings: &mut Vec<Warning>) -> Result<usize> {
        let document: Value = serde_json::from_str(json)?;

        let entries: Vec<Value> = match document {
            Value::Object(mut map) => match map.remove("waypoints") {
                Some(Value::Array(list)) => list,
                Some(other) => {
                    map.insert("waypoints".to_string(), other);
                    map.into_iter().map(|(_, value)| value).collect()
                }
                None => map.into_iter().map(|(_, value)| value).collect(),
            },
            _ => {
                return Err(Error::InvalidFormat(
                    "base feed must be a JSON object".to_string(),
                ));
            }
        };

        let mut added = 0;
        for value in entries {
            let name = value.get("name").and_then(Value::as_str).map(str::to_string);

            if name.as_deref().is_some_and(|name| SKIPPED_BASES.contains(&name)) {
                continue;
            }

            let base = serde_json::from_value::<BaseEntry>(value)
                .map_err(|error| error.to_string())
                .and_then(BaseEntry::into_base);

            match base {
                Ok(base) => {
                    self.insert(base);
                    added += 1;
                }
                Err(reason) => {
                    debug!(?name, %reason, "skipping base feed entry");
                    warnings.push(Warning::SkippedBase { name, reason });
                }
            }
        }

        Ok(added)
    }

    /// Add or replace a base
    pub fn insert(&mut self, base: Base) -> Option<Base> {
        self.bases.insert(base.name.clone(), base)
    }

    pub fn get(&self, name: &str) -> Option<&Base> {
        self.bases.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bases.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Base> {
        self.bases.values()
    }

    /// Bases whose name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Base> {
        let query = query.to_lowercase();
        self.bases
            .values()
            .filter(|base| base.name.to_lowercase().contains(&query))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_none, assert_ok, assert_some};

    #[test]
    fn waypoints_list_feed() {
        let json = r#"{
            "waypoints": [
                {"name": "Kutaisi", "latitude": 42.1792, "longitude": 42.4958, "elevation": 147},
                {"name": "Batumi", "latitude": 41.6103, "longitude": 41.6000, "elevation": 32}
            ]
        }"#;

        let mut warnings = Vec::new();
        let bases = assert_ok!(BaseDirectory::from_json(json, &mut warnings));
        assert!(warnings.is_empty());
        assert_eq!(bases.names().collect::<Vec<_>>(), ["Batumi", "Kutaisi"]);

        let kutaisi = assert_some!(bases.get("Kutaisi"));
        assert_eq!(kutaisi.elevation, 147.0);
        assert_eq!(kutaisi.position.latitude().decimal_degree(), 42.1792);
        assert_eq!(kutaisi.position.name(), Some("Kutaisi"));
    }

    #[test]
    fn keyed_feed_with_location_details() {
        let json = r#"{
            "1": {"name": "Al Dhafra AB", "locationDetails": {"lat": 24.2483, "lon": 54.5478, "altitude": 52}},
            "2": {"name": "Stennis", "locationDetails": {"lat": 25.0, "lon": 55.0, "altitude": 0}},
            "3": {"name": "Kuznetsov North", "latitude": 25.0, "longitude": 55.0, "elevation": 0}
        }"#;

        let mut warnings = Vec::new();
        let bases = assert_ok!(BaseDirectory::from_json(json, &mut warnings));
        assert!(warnings.is_empty());
        assert_eq!(bases.len(), 1);
        assert_eq!(assert_some!(bases.get("Al Dhafra AB")).elevation, 52.0);
        assert_none!(bases.get("Stennis"));
    }

    #[test]
    fn bad_entries_are_skipped() {
        let json = r#"{
            "waypoints": [
                {"name": "Kutaisi", "latitude": 42.1792, "longitude": 42.4958, "elevation": 147},
                {"name": "Nowhere", "latitude": 42.0},
                {"name": "North of North", "latitude": 95.0, "longitude": 0.0, "elevation": 0},
                {"latitude": 42.0, "longitude": 42.0, "elevation": 0}
            ]
        }"#;

        let mut warnings = Vec::new();
        let bases = assert_ok!(BaseDirectory::from_json(json, &mut warnings));
        assert_eq!(bases.len(), 1);
        assert_eq!(warnings.len(), 3);
        assert_eq!(
            warnings[0],
            Warning::SkippedBase {
                name: Some("Nowhere".to_string()),
                reason: "missing longitude".to_string(),
            }
        );
        assert_matches!(&warnings[1], Warning::SkippedBase { name: Some(_), .. });
        assert_matches!(&warnings[2], Warning::SkippedBase { name: None, .. });
    }

    #[test]
    fn invalid_documents() {
        let mut warnings = Vec::new();
        assert_matches!(
            BaseDirectory::from_json("[1, 2]", &mut warnings),
            Err(Error::InvalidFormat(_))
        );
        assert_matches!(
            BaseDirectory::from_json("not json", &mut warnings),
            Err(Error::Json(_))
        );
    }

    #[test]
    fn multiple_feeds() {
        let mut warnings = Vec::new();
        let mut bases = BaseDirectory::new();
        let caucasus = r#"{"waypoints": [{"name": "Kutaisi", "latitude": 42.1792, "longitude": 42.4958, "elevation": 147}]}"#;
        let gulf = r#"{"1": {"name": "Khasab", "latitude": 26.1710, "longitude": 56.2406, "elevation": 60}}"#;

        assert_eq!(assert_ok!(bases.load_json(caucasus, &mut warnings)), 1);
        assert_eq!(assert_ok!(bases.load_json(gulf, &mut warnings)), 1);
        assert_eq!(bases.len(), 2);
    }

    #[test]
    fn search_ignores_case() {
        let json = r#"{"waypoints": [
            {"name": "Kutaisi", "latitude": 42.1792, "longitude": 42.4958, "elevation": 147},
            {"name": "Kobuleti", "latitude": 41.9297, "longitude": 41.8714, "elevation": 59},
            {"name": "Batumi", "latitude": 41.6103, "longitude": 41.6000, "elevation": 32}
        ]}"#;
        let bases = BaseDirectory::from_json(json, &mut Vec::new()).unwrap();

        let found: Vec<_> = bases.search("KU").into_iter().map(|base| base.name.as_str()).collect();
        assert_eq!(found, ["Kutaisi"]);

        let found: Vec<_> = bases.search("i").into_iter().map(|base| base.name.as_str()).collect();
        assert_eq!(found, ["Batumi", "Kobuleti", "Kutaisi"]);
    }
}
