//! Parsing of the coordinate readout shown by the in-game map
//!
//! The map shows the cursor position in one of four formats, always
//! followed by the terrain elevation:
//!
//! - `37 T FJ 36255 11628, 5300 FT` (MGRS)
//! - `N43°10.244 E40°40.204, 477 FT` (degrees and decimal minutes)
//! - `N42-43-17.55 E40-38-21.69, 0 FT` (degrees, minutes and seconds)
//! - `43°34'37"N 29°11'18"E, 0 FT` (degrees, minutes and seconds)
//!
//! Input is case-insensitive. Elevations in meters (`M`) are converted to
//! feet.

use crate::error::{Error, Result};
use crate::format::meters_to_feet;
use crate::types::{Axis, GeoCoord, Hemisphere, Lat, Lon, Position};

/// Parse a map readout into a position and an elevation in feet
///
/// ```
/// use dcs_waypoints::capture::parse_map_coordinates;
///
/// let (position, elevation) = parse_map_coordinates("N43°10.244 E40°40.204, 477 FT").unwrap();
/// assert_eq!(position.latitude().degree(), 43.0);
/// assert_eq!(elevation, 477.0);
/// ```
pub fn parse_map_coordinates(text: &str) -> Result<(Position, f64)> {
    let text = text.trim().to_uppercase();
    let (coordinates, elevation) = text
        .rsplit_once(',')
        .ok_or_else(|| invalid("missing elevation", &text))?;

    let elevation = parse_elevation(elevation.trim())?;

    let tokens: Vec<&str> = coordinates.split_whitespace().collect();
    let position = match tokens.as_slice() {
        [_, _, _, _, _] => Position::from_mgrs(coordinates)?,
        [latitude, longitude] => Position::from_coords(
            parse_coordinate::<Lat>(latitude)?,
            parse_coordinate::<Lon>(longitude)?,
        )?,
        _ => return Err(invalid("unrecognized coordinates", coordinates)),
    };

    Ok((position, elevation))
}

fn parse_elevation(text: &str) -> Result<f64> {
    let (value, unit) = text
        .split_once(' ')
        .ok_or_else(|| invalid("elevation without unit", text))?;

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("elevation", text));
    }
    let value = number(value)?;

    match unit.trim() {
        "FT" => Ok(value),
        "M" => Ok(meters_to_feet(value)),
        _ => Err(invalid("elevation unit", text)),
    }
}

/// `N43°10.244`, `N42-43-17.55` or `43°34'37"N`
fn parse_coordinate<A: Axis>(token: &str) -> Result<GeoCoord<A>> {
    let first = token.chars().next().and_then(Hemisphere::from_char);
    let last = token.chars().last().and_then(Hemisphere::from_char);

    let (hemisphere, degree, minute, second) = match (first, last) {
        (Some(hemisphere), _) => {
            let body = &token[1..];
            if let Some((degree, minute)) = body.split_once('°') {
                (hemisphere, number(degree)?, number(minute)?, 0.0)
            } else {
                let parts: Vec<&str> = body.split('-').collect();
                let [degree, minute, second] = parts.as_slice() else {
                    return Err(invalid("coordinate", token));
                };
                (hemisphere, number(degree)?, number(minute)?, number(second)?)
            }
        }
        (None, Some(hemisphere)) => {
            let body = &token[..token.len() - 1];
            let (degree, rest) = body
                .split_once('°')
                .ok_or_else(|| invalid("coordinate", token))?;
            let (minute, second) = rest
                .split_once('\'')
                .ok_or_else(|| invalid("coordinate", token))?;
            let second = second.strip_suffix('"').unwrap_or(second);
            (hemisphere, number(degree)?, number(minute)?, number(second)?)
        }
        (None, None) => return Err(invalid("missing hemisphere", token)),
    };

    GeoCoord::from_dms(degree, minute, second).with_hemisphere(hemisphere)
}

fn number(text: &str) -> Result<f64> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidFormat(format!("not a number: {text:?}"))),
    }
}

fn invalid(what: &str, text: &str) -> Error {
    Error::InvalidFormat(format!("{what}: {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_matches, assert_ok};
    use insta::assert_snapshot;

    #[track_caller]
    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-8,
            "expected {expected}, got {actual}"
        );
    }

    fn parse(text: &str) -> (f64, f64, f64) {
        let (position, elevation) = assert_ok!(parse_map_coordinates(text));
        (
            position.latitude().decimal_degree(),
            position.longitude().decimal_degree(),
            elevation,
        )
    }

    #[test]
    fn mgrs() {
        let (lat, lon, elevation) = parse("37 T FJ 36255 11628, 5300 FT");
        assert_close(lat, 43.445159801);
        assert_close(lon, 40.683862783);
        assert_eq!(elevation, 5300.0);
    }

    #[test]
    fn degrees_decimal_minutes() {
        let (lat, lon, elevation) = parse("N43°10.244 E40°40.204, 477 FT");
        assert_close(lat, 43.0 + 10.244 / 60.0);
        assert_close(lon, 40.0 + 40.204 / 60.0);
        assert_eq!(elevation, 477.0);
    }

    #[test]
    fn dashed_dms() {
        let (lat, lon, elevation) = parse("N42-43-17.55 E40-38-21.69, 0 FT");
        assert_close(lat, 42.0 + 43.0 / 60.0 + 17.55 / 3600.0);
        assert_close(lon, 40.0 + 38.0 / 60.0 + 21.69 / 3600.0);
        assert_eq!(elevation, 0.0);
    }

    #[test]
    fn symbol_dms() {
        let (lat, lon, _) = parse(r#"43°34'37"N 29°11'18"E, 0 FT"#);
        assert_close(lat, 43.0 + 34.0 / 60.0 + 37.0 / 3600.0);
        assert_close(lon, 29.0 + 11.0 / 60.0 + 18.0 / 3600.0);
    }

    #[test]
    fn southern_and_western_hemispheres() {
        let (lat, lon, _) = parse("s33°51.408 w151°12.918, 12 ft");
        assert_close(lat, -(33.0 + 51.408 / 60.0));
        assert_close(lon, -(151.0 + 12.918 / 60.0));

        let (lat, lon, _) = parse(r#"33°51'24"S 151°12'55"W, 0 FT"#);
        assert!(lat < 0.0);
        assert!(lon < 0.0);
    }

    #[test]
    fn elevation_in_meters() {
        let (_, _, elevation) = parse("N43°10.244 E40°40.204, 100 M");
        assert_close(elevation, 328.08);
    }

    #[test]
    fn wrong_hemisphere_for_axis() {
        assert_matches!(
            parse_map_coordinates("E43°10.244 N40°40.204, 0 FT"),
            Err(Error::InvalidHemisphere { letter: 'E', .. })
        );
    }

    #[test]
    fn malformed_input() {
        let err = assert_err!(parse_map_coordinates("X-00199287 Z+00523070, 0 FT"));
        assert_snapshot!(err, @r#"Invalid coordinate format: missing hemisphere: "X-00199287""#);

        let err = assert_err!(parse_map_coordinates("N43°10.244 E40°40.204"));
        assert_snapshot!(err, @r#"Invalid coordinate format: missing elevation: "N43°10.244 E40°40.204""#);

        let err = assert_err!(parse_map_coordinates("N43°10.244 E40°40.204, 12 YD"));
        assert_snapshot!(err, @r#"Invalid coordinate format: elevation unit: "12 YD""#);

        let err = assert_err!(parse_map_coordinates("N43°10.244 E40°40.204, -5 FT"));
        assert_snapshot!(err, @r#"Invalid coordinate format: elevation: "-5 FT""#);

        let err = assert_err!(parse_map_coordinates("N43-10 E40-40, 0 FT"));
        assert_snapshot!(err, @r#"Invalid coordinate format: coordinate: "N43-10""#);

        let err = assert_err!(parse_map_coordinates("N43°10.244 E40°INF, 0 FT"));
        assert_snapshot!(err, @r#"Invalid coordinate format: not a number: "INF""#);
        assert_err!(parse_map_coordinates("N43°NAN E40°40.204, 0 FT"));
        assert_err!(parse_map_coordinates("N43-10-INFINITY E40-40-0, 0 FT"));

        assert_err!(parse_map_coordinates("somewhere, 0 FT"));
        assert_err!(parse_map_coordinates("37 T FJ 36255, 0 FT"));
    }
}
