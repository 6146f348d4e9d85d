use crate::error::{Error, Result};
use crate::types::Hemisphere;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};

const TOKENS: [&str; 6] = ["H", "D", "d", "M", "m", "S"];

/// Axis marker for [`GeoCoord`]
///
/// Decides the hemisphere letters, the valid range and the name used in
/// debug output. Implemented by [`Lat`] and [`Lon`] only.
pub trait Axis: Copy + Default + private::Sealed {
    const NAME: &'static str;
    const POSITIVE: Hemisphere;
    const NEGATIVE: Hemisphere;
    /// Human readable list of accepted hemisphere letters
    const EXPECTED: &'static str;

    /// Bring a raw decimal degree value into the canonical range of the axis
    fn normalize(decimal_degree: f64) -> f64;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Lat {}
    impl Sealed for super::Lon {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lat;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Lon;

impl Axis for Lat {
    const NAME: &'static str = "Latitude";
    const POSITIVE: Hemisphere = Hemisphere::North;
    const NEGATIVE: Hemisphere = Hemisphere::South;
    const EXPECTED: &'static str = "N or S";

    fn normalize(decimal_degree: f64) -> f64 {
        decimal_degree
    }
}

impl Axis for Lon {
    const NAME: &'static str = "Longitude";
    const POSITIVE: Hemisphere = Hemisphere::East;
    const NEGATIVE: Hemisphere = Hemisphere::West;
    const EXPECTED: &'static str = "E or W";

    /// Wraps into (-180, 180]; -180 itself is reported as +180
    fn normalize(decimal_degree: f64) -> f64 {
        if decimal_degree > -180.0 && decimal_degree <= 180.0 {
            return decimal_degree;
        }
        let wrapped = (decimal_degree + 180.0).rem_euclid(360.0) - 180.0;
        if wrapped == -180.0 { 180.0 } else { wrapped }
    }
}

/// A single angular value (latitude or longitude)
///
/// The degree, minute and second components always agree with the
/// decimal degree value: every constructor and setter recomputes all of
/// them from the (normalized) decimal degree. Components carry the sign
/// of the coordinate, `decimal_minute` is unsigned.
#[derive(Clone, Copy)]
pub struct GeoCoord<A: Axis> {
    degree: f64,
    minute: f64,
    second: f64,
    decimal_degree: f64,
    decimal_minute: f64,
    axis: PhantomData<A>,
}

pub type Latitude = GeoCoord<Lat>;
pub type Longitude = GeoCoord<Lon>;

impl<A: Axis> GeoCoord<A> {
    /// Create from degree, minute and second components
    ///
    /// Any real values are accepted, e.g. 75 minutes carry into the degree.
    pub fn from_dms(degree: f64, minute: f64, second: f64) -> Self {
        Self::from_decimal_degree(degree + minute / 60.0 + second / 3600.0)
    }

    pub fn from_decimal_degree(value: f64) -> Self {
        let decimal_degree = A::normalize(value);

        let sign = if decimal_degree > 0.0 {
            1.0
        } else if decimal_degree < 0.0 {
            -1.0
        } else {
            0.0
        };
        let abs = decimal_degree.abs();
        let whole_degree = abs.floor();
        let decimal_minute = (abs - whole_degree) * 60.0;
        let whole_minute = decimal_minute.floor();
        let second = (decimal_minute - whole_minute) * 60.0;

        Self {
            degree: whole_degree * sign,
            minute: whole_minute * sign,
            second: second * sign,
            decimal_degree,
            decimal_minute,
            axis: PhantomData,
        }
    }

    pub fn degree(&self) -> f64 {
        self.degree
    }

    pub fn minute(&self) -> f64 {
        self.minute
    }

    pub fn second(&self) -> f64 {
        self.second
    }

    pub fn decimal_degree(&self) -> f64 {
        self.decimal_degree
    }

    /// Unsigned minutes component including the fraction
    pub fn decimal_minute(&self) -> f64 {
        self.decimal_minute
    }

    pub fn set_degree(&mut self, degree: f64) {
        *self = Self::from_dms(degree, self.minute, self.second);
    }

    pub fn set_minute(&mut self, minute: f64) {
        *self = Self::from_dms(self.degree, minute, self.second);
    }

    pub fn set_second(&mut self, second: f64) {
        *self = Self::from_dms(self.degree, self.minute, second);
    }

    /// Hemisphere derived from the sign of the decimal degree
    pub fn hemisphere(&self) -> Hemisphere {
        if self.decimal_degree < 0.0 {
            A::NEGATIVE
        } else {
            A::POSITIVE
        }
    }

    /// Force the sign of all components to match `hemisphere`
    ///
    /// Only the two hemispheres of this axis are accepted.
    pub fn set_hemisphere(&mut self, hemisphere: Hemisphere) -> Result<()> {
        let sign = Self::hemisphere_sign(hemisphere)?;
        *self = Self::from_dms(
            self.degree.abs() * sign,
            self.minute.abs() * sign,
            self.second.abs() * sign,
        );
        Ok(())
    }

    pub fn with_hemisphere(mut self, hemisphere: Hemisphere) -> Result<Self> {
        self.set_hemisphere(hemisphere)?;
        Ok(self)
    }

    fn hemisphere_sign(hemisphere: Hemisphere) -> Result<f64> {
        if hemisphere == A::POSITIVE {
            Ok(1.0)
        } else if hemisphere == A::NEGATIVE {
            Ok(-1.0)
        } else {
            Err(Error::InvalidHemisphere {
                letter: hemisphere.as_char(),
                expected: A::EXPECTED,
            })
        }
    }

    /// Render using a `%`-separated template
    ///
    /// Tokens: `H` hemisphere letter, `D` decimal degree, `d` whole degree,
    /// `M` decimal minute, `m` whole minute, `S` second. Anything else is
    /// copied literally. When `H` is part of the template, `-` signs are
    /// stripped from the output.
    ///
    /// ```
    /// use dcs_waypoints::Longitude;
    ///
    /// let lon = Longitude::from_decimal_degree(-162.0833);
    /// assert_eq!(lon.to_formatted_string("H% %D"), "W 162.0833");
    /// ```
    pub fn to_formatted_string(&self, template: &str) -> String {
        let elements: Vec<&str> = template.split('%').collect();

        let mut output = String::new();
        for element in &elements {
            match *element {
                "H" => output.push(self.hemisphere().as_char()),
                "D" => output.push_str(&self.decimal_degree.to_string()),
                "d" => output.push_str(&(self.degree as i64).to_string()),
                "M" => output.push_str(&self.decimal_minute.abs().to_string()),
                "m" => output.push_str(&(self.minute.abs() as i64).to_string()),
                "S" => output.push_str(&self.second.abs().to_string()),
                literal => output.push_str(literal),
            }
        }

        if elements.contains(&"H") {
            output.retain(|c| c != '-');
        }

        output
    }

    /// Parse a string using the same template language as
    /// [`to_formatted_string`](Self::to_formatted_string)
    ///
    /// Every component must be followed by one of the literal separators of
    /// the template, e.g. `"5, 52, 59.88_N"` with `"d%, %m%, %S%_%H"`. A
    /// template starting with `H` has the hemisphere letter moved to the end
    /// of both the template and the input before parsing.
    ///
    /// ```
    /// use dcs_waypoints::{Hemisphere, Latitude};
    ///
    /// let lat = Latitude::parse("N43-10-14.64", "H%d%-%m%-%S").unwrap();
    /// assert_eq!(lat.hemisphere(), Hemisphere::North);
    /// assert_eq!(lat.degree(), 43.0);
    /// assert_eq!(lat.minute(), 10.0);
    /// ```
    pub fn parse(input: &str, template: &str) -> Result<Self> {
        let (input, template) = if template.starts_with('H') {
            relocate_leading_hemisphere(input, template)?
        } else {
            (input.to_string(), template.to_string())
        };

        let elements: Vec<&str> = template.split('%').collect();
        let formatters: Vec<&str> = elements
            .iter()
            .copied()
            .filter(|element| TOKENS.contains(element))
            .collect();
        if formatters.is_empty() {
            return Err(Error::InvalidFormat(format!(
                "template {template:?} has no coordinate tokens"
            )));
        }

        let mut separators: Vec<&str> = elements
            .iter()
            .copied()
            .filter(|element| !TOKENS.contains(element))
            .collect();
        separators.push("%");
        if separators.len() < formatters.len() {
            return Err(Error::InvalidFormat(format!(
                "template {template:?} has adjacent tokens without a separator"
            )));
        }

        let mut degree = 0.0;
        let mut minute = 0.0;
        let mut second = 0.0;
        let mut hemisphere = None;

        let mut rest = input.as_str();
        for (formatter, separator) in formatters.into_iter().zip(separators) {
            if separator.is_empty() {
                return Err(Error::InvalidFormat(format!(
                    "template {template:?} has an empty separator"
                )));
            }

            let (value, remainder) = rest.split_once(separator).unwrap_or((rest, ""));
            rest = remainder;

            match formatter {
                "H" => hemisphere = Some(parse_hemisphere(value)?),
                "D" | "d" => degree = parse_number(value)?,
                "M" | "m" => minute = parse_number(value)?,
                _ => second = parse_number(value)?,
            }
        }

        let coord = Self::from_dms(degree, minute, second);
        match hemisphere {
            Some(hemisphere) => coord.with_hemisphere(hemisphere),
            None => Ok(coord),
        }
    }
}

impl GeoCoord<Lon> {
    /// Longitude reported in the range [0, 360)
    pub fn range_360(&self) -> f64 {
        (self.decimal_degree + 360.0).rem_euclid(360.0)
    }
}

fn relocate_leading_hemisphere(input: &str, template: &str) -> Result<(String, String)> {
    let invalid = || Error::InvalidFormat(format!("cannot parse {input:?} with {template:?}"));

    let first = input.chars().next().ok_or_else(invalid)?;
    let digits_start = input.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let template_start = template
        .find(|c: char| c.is_ascii_alphabetic() && c != 'h' && c != 'H')
        .ok_or_else(invalid)?;

    Ok((
        format!("{} {first}", &input[digits_start..]),
        format!("{}% %H", &template[template_start..]),
    ))
}

fn parse_number(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(Error::InvalidFormat(format!("{trimmed:?} is not a number"))),
    }
}

fn parse_hemisphere(value: &str) -> Result<Hemisphere> {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Hemisphere::from_char(letter)
            .ok_or_else(|| Error::InvalidFormat(format!("{letter:?} is not a hemisphere"))),
        _ => Err(Error::InvalidFormat(format!(
            "{trimmed:?} is not a hemisphere"
        ))),
    }
}

impl<A: Axis> Default for GeoCoord<A> {
    fn default() -> Self {
        Self::from_decimal_degree(0.0)
    }
}

impl<A: Axis> fmt::Debug for GeoCoord<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", A::NAME, self.decimal_degree)
    }
}

impl<A: Axis> fmt::Display for GeoCoord<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decimal_degree)
    }
}

impl<A: Axis> PartialEq for GeoCoord<A> {
    fn eq(&self, other: &Self) -> bool {
        self.decimal_degree == other.decimal_degree
    }
}

impl<A: Axis> PartialOrd for GeoCoord<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.decimal_degree.partial_cmp(&other.decimal_degree)
    }
}

impl<A: Axis> Add<f64> for GeoCoord<A> {
    type Output = Self;

    fn add(self, degrees: f64) -> Self {
        Self::from_decimal_degree(self.decimal_degree + degrees)
    }
}

impl<A: Axis> Sub<f64> for GeoCoord<A> {
    type Output = Self;

    fn sub(self, degrees: f64) -> Self {
        Self::from_decimal_degree(self.decimal_degree - degrees)
    }
}

impl<A: Axis> Neg for GeoCoord<A> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_decimal_degree(-self.decimal_degree)
    }
}

impl<A: Axis> From<GeoCoord<A>> for f64 {
    fn from(coord: GeoCoord<A>) -> f64 {
        coord.decimal_degree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_matches, assert_ok};
    use insta::assert_snapshot;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn decompose_positive_latitude() {
        let lat = Latitude::from_decimal_degree(5.8833);
        assert_eq!(lat.degree(), 5.0);
        assert_eq!(lat.minute(), 52.0);
        assert_close(lat.second(), 59.88);
        assert_close(lat.decimal_minute(), 52.998);
        assert_eq!(lat.hemisphere(), Hemisphere::North);
    }

    #[test]
    fn decompose_negative_longitude() {
        let lon = Longitude::from_decimal_degree(-162.0833);
        assert_eq!(lon.degree(), -162.0);
        assert_eq!(lon.minute(), -4.0);
        assert_close(lon.second(), -59.88);
        assert_close(lon.decimal_minute(), 4.998);
        assert_eq!(lon.hemisphere(), Hemisphere::West);
    }

    #[test]
    fn from_dms_carries_overflowing_components() {
        let lat = Latitude::from_dms(10.0, 75.0, 0.0);
        assert_eq!(lat.degree(), 11.0);
        assert_eq!(lat.minute(), 15.0);
        assert_close(lat.decimal_degree(), 11.25);

        let lat = Latitude::from_dms(0.0, 0.0, 7200.0);
        assert_close(lat.decimal_degree(), 2.0);
    }

    #[test]
    fn decimal_degree_round_trip() {
        for value in [-89.999, -45.123456789, -0.5, 0.0, 0.0001, 33.3333333, 89.5] {
            let lat = Latitude::from_decimal_degree(value);
            assert_close(lat.decimal_degree(), value);

            let rebuilt = Latitude::from_dms(lat.degree(), lat.minute(), lat.second());
            assert_close(rebuilt.decimal_degree(), value);
        }
    }

    #[test]
    fn longitude_wraps_into_half_open_range() {
        assert_close(Longitude::from_decimal_degree(200.0).decimal_degree(), -160.0);
        assert_close(Longitude::from_decimal_degree(-200.0).decimal_degree(), 160.0);
        assert_eq!(Longitude::from_decimal_degree(180.0).decimal_degree(), 180.0);
        assert_eq!(Longitude::from_decimal_degree(-180.0).decimal_degree(), 180.0);
        assert_eq!(Longitude::from_decimal_degree(540.0).decimal_degree(), 180.0);
        assert_close(Longitude::from_decimal_degree(359.5).decimal_degree(), -0.5);
        assert_eq!(Longitude::from_decimal_degree(41.7778).decimal_degree(), 41.7778);
    }

    #[test]
    fn latitude_is_not_wrapped() {
        assert_eq!(Latitude::from_decimal_degree(95.0).decimal_degree(), 95.0);
    }

    #[test]
    fn range_360() {
        assert_close(Longitude::from_decimal_degree(-90.0).range_360(), 270.0);
        assert_close(Longitude::from_decimal_degree(90.0).range_360(), 90.0);
        assert_eq!(Longitude::from_decimal_degree(0.0).range_360(), 0.0);
    }

    #[test]
    fn set_hemisphere_forces_sign() {
        let mut lat = Latitude::from_decimal_degree(12.5);
        assert_ok!(lat.set_hemisphere(Hemisphere::South));
        assert_eq!(lat.hemisphere(), Hemisphere::South);
        assert_close(lat.decimal_degree(), -12.5);

        assert_ok!(lat.set_hemisphere(Hemisphere::South));
        assert_close(lat.decimal_degree(), -12.5);

        assert_ok!(lat.set_hemisphere(Hemisphere::North));
        assert_close(lat.decimal_degree(), 12.5);
    }

    #[test]
    fn set_hemisphere_rejects_other_axis() {
        let mut lat = Latitude::from_decimal_degree(12.5);
        let err = assert_err!(lat.set_hemisphere(Hemisphere::East));
        assert_matches!(err, Error::InvalidHemisphere { letter: 'E', expected: "N or S" });
        assert_close(lat.decimal_degree(), 12.5);

        let lon = Longitude::from_decimal_degree(12.5);
        assert_err!(lon.with_hemisphere(Hemisphere::North));
    }

    #[test]
    fn setters_recompute_all_fields() {
        let mut lon = Longitude::from_dms(40.0, 30.0, 0.0);
        lon.set_minute(90.0);
        assert_eq!(lon.degree(), 41.0);
        assert_eq!(lon.minute(), 30.0);

        lon.set_degree(179.0);
        lon.set_minute(60.0);
        assert_eq!(lon.decimal_degree(), 180.0);

        lon.set_second(1800.0);
        assert_close(lon.decimal_degree(), -179.5);
    }

    #[test]
    fn formatted_strings() {
        let lat = Latitude::from_decimal_degree(5.8833);
        let lon = Longitude::from_decimal_degree(-162.0833);

        assert_snapshot!(lat.to_formatted_string("D"), @"5.8833");
        assert_snapshot!(lon.to_formatted_string("D"), @"-162.0833");
        assert_snapshot!(lat.to_formatted_string("H% %D"), @"N 5.8833");
        assert_snapshot!(lon.to_formatted_string("H% %D"), @"W 162.0833");
        assert_snapshot!(lon.to_formatted_string("d%_%m"), @"-162_4");
        assert_snapshot!(lon.to_formatted_string("d%° %m%' %H"), @"162° 4' W");
    }

    #[test]
    fn parse_with_trailing_hemisphere() {
        let lat = assert_ok!(Latitude::parse("5, 52, 59.88_N", "d%, %m%, %S%_%H"));
        assert_close(lat.decimal_degree(), 5.8833);

        let lon = assert_ok!(Longitude::parse("162, 4, 59.88_W", "d%, %m%, %S%_%H"));
        assert_close(lon.decimal_degree(), -162.0833);
    }

    #[test]
    fn parse_with_leading_hemisphere() {
        let lat = assert_ok!(Latitude::parse("N42-43-17.55", "H%d%-%m%-%S"));
        assert_close(lat.decimal_degree(), 42.0 + 43.0 / 60.0 + 17.55 / 3600.0);

        let lon = assert_ok!(Longitude::parse("W40-38-21.69", "H%d%-%m%-%S"));
        assert_close(lon.decimal_degree(), -(40.0 + 38.0 / 60.0 + 21.69 / 3600.0));

        let lat = assert_ok!(Latitude::parse("S43°10.244", "H%d%°%M"));
        assert_close(lat.decimal_degree(), -(43.0 + 10.244 / 60.0));
    }

    #[test]
    fn parse_decimal_degree() {
        let lon = assert_ok!(Longitude::parse("-162.0833", "D"));
        assert_close(lon.decimal_degree(), -162.0833);
    }

    #[test]
    fn parse_errors() {
        assert_matches!(
            Latitude::parse("5, x, 1", "d%, %m%, %S"),
            Err(Error::InvalidFormat(_))
        );
        assert_matches!(Latitude::parse("5", "%"), Err(Error::InvalidFormat(_)));
        assert_matches!(Latitude::parse("552", "d%m"), Err(Error::InvalidFormat(_)));
        assert_matches!(Latitude::parse("5 52", "d%%m"), Err(Error::InvalidFormat(_)));
        assert_matches!(
            Latitude::parse("5 52 E", "d% %m% %H"),
            Err(Error::InvalidHemisphere { letter: 'E', .. })
        );
        assert_matches!(
            Latitude::parse("5 52 Q", "d% %m% %H"),
            Err(Error::InvalidFormat(_))
        );
    }

    #[test]
    fn scalar_arithmetic() {
        let lat = Latitude::from_decimal_degree(10.0);
        assert_close((lat + 2.5).decimal_degree(), 12.5);
        assert_close((lat - 12.5).decimal_degree(), -2.5);
        assert_close((-lat).decimal_degree(), -10.0);

        let lon = Longitude::from_decimal_degree(179.0);
        assert_close((lon + 2.0).decimal_degree(), -179.0);
    }

    #[test]
    fn comparison_uses_decimal_degree() {
        let a = Latitude::from_dms(10.0, 30.0, 0.0);
        let b = Latitude::from_decimal_degree(10.5);
        assert_eq!(a, b);
        assert!(Latitude::from_decimal_degree(-1.0) < a);
    }

    #[test]
    fn debug_output() {
        let lat = Latitude::from_decimal_degree(5.8833);
        assert_snapshot!(format!("{lat:?}"), @"Latitude(5.8833)");
    }
}
