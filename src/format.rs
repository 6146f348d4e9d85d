//! Fixed-width digit strings for cockpit data entry
//!
//! Cockpit keypads take coordinates as a bare run of digits; the sign is
//! entered separately through a hemisphere key. The exact digit sequence
//! depends on the airframe, see [`FormatOptions`].

use crate::types::{Axis, GeoCoord, Hemisphere, Position};

/// Feet per meter, used for every elevation conversion
pub const FEET_PER_METER: f64 = 3.2808;

/// Most minute decimals an f64 degree value resolves; larger
/// `minute_precision` values are capped to this
pub const MAX_MINUTE_PRECISION: usize = 10;

/// Formatting rules of a cockpit coordinate entry field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Degrees and decimal minutes instead of degrees, minutes and seconds
    pub decimal_minutes: bool,
    /// Width the longitude degree is zero-padded to
    pub easting_zero_fill: usize,
    /// Width the (integer) minutes are zero-padded to
    pub minute_zero_fill: usize,
    /// Enter only the tens digit of the rounded seconds
    pub one_digit_seconds: bool,
    /// Decimals of the minutes in decimal-minutes mode, at most
    /// [`MAX_MINUTE_PRECISION`]
    pub minute_precision: usize,
    /// Characters removed from the end of each string
    pub trailing_digits_dropped: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            decimal_minutes: false,
            easting_zero_fill: 2,
            minute_zero_fill: 2,
            one_digit_seconds: false,
            minute_precision: 4,
            trailing_digits_dropped: 0,
        }
    }
}

impl FormatOptions {
    /// Degrees, minutes and seconds with the given longitude degree width
    pub fn dms(easting_zero_fill: usize) -> Self {
        Self {
            easting_zero_fill,
            ..Self::default()
        }
    }

    /// Degrees and decimal minutes with the given precision
    pub fn decimal_minutes(easting_zero_fill: usize, minute_precision: usize) -> Self {
        Self {
            decimal_minutes: true,
            easting_zero_fill,
            minute_precision,
            ..Self::default()
        }
    }
}

/// Latitude and longitude digit strings plus the hemisphere of each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CockpitCoordinates {
    pub latitude: String,
    pub longitude: String,
    pub lat_hemisphere: Hemisphere,
    pub lon_hemisphere: Hemisphere,
}

/// Format a position for cockpit entry
///
/// Rounding is applied once to the smallest unit that is entered, so a
/// carry propagates into the minutes and degrees (59.999" becomes the next
/// full minute).
///
/// ```
/// use dcs_waypoints::{format_position, FormatOptions, Position};
///
/// let palmyra = Position::new(5.8833, -162.0833).unwrap();
/// let coords = format_position(&palmyra, &FormatOptions::dms(2));
/// assert_eq!(coords.latitude, "55259.88");
/// assert_eq!(coords.longitude, "1620459.88");
/// ```
pub fn format_position(position: &Position, options: &FormatOptions) -> CockpitCoordinates {
    let latitude = position.latitude();
    let longitude = position.longitude();

    CockpitCoordinates {
        latitude: format_angle(&latitude, 0, options),
        longitude: format_angle(&longitude, options.easting_zero_fill, options),
        lat_hemisphere: latitude.hemisphere(),
        lon_hemisphere: longitude.hemisphere(),
    }
}

fn format_angle<A: Axis>(coord: &GeoCoord<A>, degree_width: usize, options: &FormatOptions) -> String {
    let magnitude = coord.decimal_degree().abs();
    let minute_width = options.minute_zero_fill;

    let mut output = if options.decimal_minutes {
        let precision = options.minute_precision.min(MAX_MINUTE_PRECISION);
        let scale = 10_u64.pow(precision as u32);
        let total = (magnitude * 60.0 * scale as f64).round() as u64;

        let degree = total / (60 * scale);
        let minute = (total % (60 * scale)) / scale;
        let fraction = total % scale;

        let mut output = format!("{degree:0degree_width$}{minute:0minute_width$}");
        if precision > 0 {
            output.push_str(&format!(".{fraction:0precision$}"));
        }
        output
    } else if options.one_digit_seconds {
        let total = (magnitude * 3600.0).round_ties_even() as u64;

        let degree = total / 3600;
        let minute = (total % 3600) / 60;
        let tens_of_seconds = (total % 60) / 10;

        format!("{degree:0degree_width$}{minute:0minute_width$}{tens_of_seconds}")
    } else {
        // hundredths of an arc second
        let total = (magnitude * 360_000.0).round() as u64;

        let degree = total / 360_000;
        let minute = (total % 360_000) / 6_000;
        let hundredths = total % 6_000;
        let second = hundredths / 100;
        let fraction = hundredths % 100;

        let mut output = format!("{degree:0degree_width$}{minute:0minute_width$}{second:02}");
        if fraction != 0 {
            output.push('.');
            output.push_str(format!("{fraction:02}").trim_end_matches('0'));
        }
        output
    };

    let kept = output.len().saturating_sub(options.trailing_digits_dropped);
    output.truncate(kept);
    output
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Name as accepted by cockpit keypads: ASCII letters and digits, upper case
///
/// Returns `fallback` if nothing is left.
pub fn cockpit_name(name: &str, fallback: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned
    }
}
