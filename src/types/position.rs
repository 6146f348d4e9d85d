use crate::error::{Error, Result};
use crate::geodesy::{self, Ellipsoid, GeodesicSolution};
use crate::types::{GeoVector, Latitude, Longitude};
use std::fmt;
use std::ops::{Add, Sub};

/// Distance below which two positions count as equal, in kilometers (1 mm)
pub const ALMOST_EQ_TOLERANCE_KM: f64 = 1e-6;

/// A point on the earth's surface with an optional name
#[derive(Debug, Clone)]
pub struct Position {
    latitude: Latitude,
    longitude: Longitude,
    name: Option<String>,
}

impl Position {
    /// Create from decimal degrees
    ///
    /// Fails if the latitude is outside [-90, 90]. The longitude is wrapped
    /// into (-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Self::from_coords(
            Latitude::from_decimal_degree(latitude),
            Longitude::from_decimal_degree(longitude),
        )
    }

    pub fn from_coords(latitude: Latitude, longitude: Longitude) -> Result<Self> {
        let value = latitude.decimal_degree();
        if !(-90.0..=90.0).contains(&value) {
            return Err(Error::LatitudeOutOfRange(value));
        }
        let value = longitude.decimal_degree();
        if !value.is_finite() {
            return Err(Error::InvalidLongitude(value));
        }
        Ok(Self {
            latitude,
            longitude,
            name: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn latitude(&self) -> Latitude {
        self.latitude
    }

    pub fn longitude(&self) -> Longitude {
        self.longitude
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Solve the inverse problem towards `other`
    pub fn distance_to(&self, other: &Position, ellipsoid: Ellipsoid) -> Result<GeodesicSolution> {
        geodesy::inverse(
            self.latitude.decimal_degree(),
            self.longitude.decimal_degree(),
            other.latitude.decimal_degree(),
            other.longitude.decimal_degree(),
            ellipsoid,
        )
    }

    /// WGS84 distance to `other` in kilometers
    pub fn distance(&self, other: &Position) -> Result<f64> {
        Ok(self.distance_to(other, Ellipsoid::WGS84)?.distance_km)
    }

    pub fn initial_bearing(&self, other: &Position) -> Result<f64> {
        Ok(self.distance_to(other, Ellipsoid::WGS84)?.initial_bearing)
    }

    pub fn reverse_bearing(&self, other: &Position) -> Result<f64> {
        Ok(self.distance_to(other, Ellipsoid::WGS84)?.reverse_bearing)
    }

    /// New position `distance_km` away along `bearing`
    pub fn offset(&self, bearing: f64, distance_km: f64, ellipsoid: Ellipsoid) -> Position {
        let (lat, lon) = geodesy::direct(
            self.latitude.decimal_degree(),
            self.longitude.decimal_degree(),
            bearing,
            distance_km,
            ellipsoid,
        );
        Position {
            latitude: Latitude::from_decimal_degree(lat),
            longitude: Longitude::from_decimal_degree(lon),
            name: None,
        }
    }

    /// Vector pointing from this position to `other` (WGS84)
    pub fn vector_to(&self, other: &Position) -> Result<GeoVector> {
        let solution = self.distance_to(other, Ellipsoid::WGS84)?;
        Ok(GeoVector::new(solution.initial_bearing, solution.distance_km))
    }

    /// `true` if both positions are less than 1 mm apart
    pub fn almost_eq(&self, other: &Position) -> bool {
        self.almost_eq_within(other, ALMOST_EQ_TOLERANCE_KM)
    }

    /// `true` if both positions are less than `tolerance_km` apart
    ///
    /// Pairs the geodesic solver cannot handle never compare equal.
    pub fn almost_eq_within(&self, other: &Position, tolerance_km: f64) -> bool {
        self.distance(other)
            .map(|distance| distance < tolerance_km)
            .unwrap_or(false)
    }

    /// MGRS reference with `precision` digits per axis (0..=5)
    pub fn to_mgrs(&self, precision: usize) -> Result<String> {
        crate::mgrs::to_mgrs(self, precision)
    }

    /// South-west corner of the grid cell addressed by `text`
    pub fn from_mgrs(text: &str) -> Result<Position> {
        crate::mgrs::from_mgrs(text)
    }

    /// Render latitude and longitude with the same template
    pub fn to_formatted_strings(&self, template: &str) -> (String, String) {
        (
            self.latitude.to_formatted_string(template),
            self.longitude.to_formatted_string(template),
        )
    }

    /// Parse latitude and longitude strings that share a template
    pub fn parse(latitude: &str, longitude: &str, template: &str) -> Result<Position> {
        Self::from_coords(
            Latitude::parse(latitude, template)?,
            Longitude::parse(longitude, template)?,
        )
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl Add<GeoVector> for &Position {
    type Output = Position;

    fn add(self, vector: GeoVector) -> Position {
        self.offset(vector.heading(), vector.magnitude(), Ellipsoid::WGS84)
    }
}

impl Add<GeoVector> for Position {
    type Output = Position;

    fn add(self, vector: GeoVector) -> Position {
        &self + vector
    }
}

impl Sub<GeoVector> for &Position {
    type Output = Position;

    fn sub(self, vector: GeoVector) -> Position {
        self.offset(vector.heading() + 180.0, vector.magnitude(), Ellipsoid::WGS84)
    }
}

impl Sub<GeoVector> for Position {
    type Output = Position;

    fn sub(self, vector: GeoVector) -> Position {
        &self - vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hemisphere;
    use claims::{assert_matches, assert_ok};
    use insta::assert_snapshot;

    fn palmyra() -> Position {
        Position::new(5.8833, -162.0833).unwrap().with_name("Palmyra")
    }

    fn honolulu() -> Position {
        Position::new(21.3, -157.8167).unwrap()
    }

    #[test]
    fn latitude_range_is_checked() {
        assert_ok!(Position::new(90.0, 0.0));
        assert_ok!(Position::new(-90.0, 0.0));
        assert_matches!(Position::new(90.5, 0.0), Err(Error::LatitudeOutOfRange(_)));
        assert_matches!(Position::new(f64::NAN, 0.0), Err(Error::LatitudeOutOfRange(_)));
    }

    #[test]
    fn longitude_must_be_finite() {
        assert_matches!(Position::new(10.0, f64::INFINITY), Err(Error::InvalidLongitude(_)));
        assert_matches!(Position::new(10.0, f64::NEG_INFINITY), Err(Error::InvalidLongitude(_)));
        assert_matches!(Position::new(10.0, f64::NAN), Err(Error::InvalidLongitude(_)));
        assert_ok!(Position::new(10.0, 540.0));
    }

    #[test]
    fn longitude_is_normalized() {
        let position = assert_ok!(Position::new(0.0, 200.0));
        assert_eq!(position.longitude().decimal_degree(), -160.0);
    }

    #[test]
    fn equality_ignores_name() {
        let named = palmyra();
        let unnamed = Position::new(5.8833, -162.0833).unwrap();
        assert_eq!(named, unnamed);
        assert_eq!(named.name(), Some("Palmyra"));
        assert_ne!(named, honolulu());
    }

    #[test]
    fn distance_and_bearings() {
        let from = palmyra();
        let to = honolulu();

        let distance = assert_ok!(from.distance(&to));
        assert!((distance - 1766.691303758).abs() < 1e-6);
        assert!((assert_ok!(to.distance(&from)) - distance).abs() < 1e-9);

        let initial = assert_ok!(from.initial_bearing(&to));
        let reverse = assert_ok!(from.reverse_bearing(&to));
        assert!((initial - 14.690792202).abs() < 1e-6);
        assert!((reverse - 195.703070602).abs() < 1e-6);

        let sphere = assert_ok!(from.distance_to(&to, Ellipsoid::SPHERE));
        assert!((sphere.distance_km - 1774.771046101).abs() < 1e-6);
    }

    #[test]
    fn offset_reaches_target() {
        let from = palmyra();
        let to = honolulu();
        let solution = assert_ok!(from.distance_to(&to, Ellipsoid::WGS84));

        let reached = from.offset(solution.initial_bearing, solution.distance_km, Ellipsoid::WGS84);
        assert!(reached.almost_eq_within(&to, 0.001));
    }

    #[test]
    fn vector_arithmetic() {
        let from = palmyra();
        let to = honolulu();

        let vector = assert_ok!(from.vector_to(&to));
        let reached = &from + vector;
        assert!(reached.almost_eq(&to));

        let north = GeoVector::new(0.0, 111.0);
        let moved = &from + north;
        assert!(moved.latitude() > from.latitude());
        let back = moved - north;
        assert!(back.almost_eq(&from));
    }

    #[test]
    fn due_north_reverse_bearing() {
        let south = Position::new(10.0, 20.0).unwrap();
        let north = Position::new(30.0, 20.0).unwrap();
        assert_eq!(assert_ok!(south.initial_bearing(&north)), 0.0);
        assert_eq!(assert_ok!(south.reverse_bearing(&north)), 180.0);
    }

    #[test]
    fn almost_eq_tolerance() {
        let a = Position::new(45.0, 7.0).unwrap();
        let b = Position::new(45.000000001, 7.0).unwrap();
        let c = Position::new(45.0001, 7.0).unwrap();
        assert!(a.almost_eq(&b));
        assert!(!a.almost_eq(&c));
        assert!(a.almost_eq_within(&c, 0.1));
    }

    #[test]
    fn formatted_strings() {
        let (lat, lon) = palmyra().to_formatted_strings("H% %D");
        assert_snapshot!(lat, @"N 5.8833");
        assert_snapshot!(lon, @"W 162.0833");
        assert_snapshot!(palmyra(), @"5.8833, -162.0833");
    }

    #[test]
    fn parse_position() {
        let position = assert_ok!(Position::parse("N42-43-17.55", "E40-38-21.69", "H%d%-%m%-%S"));
        assert_eq!(position.latitude().hemisphere(), Hemisphere::North);
        assert_eq!(position.longitude().hemisphere(), Hemisphere::East);
        assert_eq!(position.latitude().degree(), 42.0);
        assert_eq!(position.longitude().minute(), 38.0);
    }
}
