//! UTM projection and Military Grid Reference System strings
//!
//! The projection is the Krüger series of the transverse Mercator on the
//! WGS84 ellipsoid, accurate to well below a millimeter inside a zone.
//! Grid squares use the standard (AA) lettering scheme.

use crate::error::{Error, Result};
use crate::types::{Hemisphere, Latitude, Longitude, Position};

const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING: f64 = 10_000_000.0;

const BANDS: &[u8; 20] = b"CDEFGHJKLMNPQRSTUVWX";
const COLUMNS: [&[u8; 8]; 3] = [b"ABCDEFGH", b"JKLMNPQR", b"STUVWXYZ"];
const ROWS: &[u8; 20] = b"ABCDEFGHJKLMNPQRSTUV";

const MIN_LATITUDE: f64 = -80.0;
const MAX_LATITUDE: f64 = 84.0;

/// Position in the Universal Transverse Mercator system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utm {
    pub zone: u8,
    pub hemisphere: Hemisphere,
    /// Meters, including the 500 km false easting
    pub easting: f64,
    /// Meters, including the 10 000 km false northing in the south
    pub northing: f64,
}

impl Utm {
    /// Project a position into its standard UTM zone
    ///
    /// Applies the Norway and Svalbard zone exceptions. Latitudes outside
    /// [-80, 84] are not covered by UTM.
    pub fn from_position(position: &Position) -> Result<Utm> {
        let lat = position.latitude().decimal_degree();
        let lon = position.longitude().decimal_degree();
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(Error::Mgrs(format!(
                "latitude {lat} is outside the UTM domain"
            )));
        }

        Ok(project(lat, lon, zone_number(lat, lon)))
    }

    /// Inverse projection back to latitude and longitude
    pub fn to_position(&self) -> Result<Position> {
        let projection = Projection::wgs84();

        let x = self.easting - FALSE_EASTING;
        let y = match self.hemisphere {
            Hemisphere::South => self.northing - FALSE_NORTHING,
            _ => self.northing,
        };

        let eta = x / (SCALE_FACTOR * projection.rectifying_radius);
        let xi = y / (SCALE_FACTOR * projection.rectifying_radius);

        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, beta) in projection.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_prime -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = eta_prime.sinh();
        let (sin_xi, cos_xi) = xi_prime.sin_cos();
        let tau_prime = sin_xi / (sinh_eta * sinh_eta + cos_xi * cos_xi).sqrt();

        // Newton iteration for tan(phi) from the conformal tan(phi')
        let e = projection.eccentricity;
        let mut tau = tau_prime;
        for _ in 0..20 {
            let tau_i = conformal_tan(tau, e);
            let delta = (tau_prime - tau_i) / (1.0 + tau_i * tau_i).sqrt()
                * (1.0 + (1.0 - e * e) * tau * tau)
                / ((1.0 - e * e) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }

        let lat = tau.atan().to_degrees();
        let lon = central_meridian(self.zone) + sinh_eta.atan2(cos_xi).to_degrees();

        Position::from_coords(
            Latitude::from_decimal_degree(lat),
            Longitude::from_decimal_degree(lon),
        )
    }
}

/// Coefficients of the 6th order Krüger series
struct Projection {
    eccentricity: f64,
    rectifying_radius: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl Projection {
    fn wgs84() -> Self {
        let f = FLATTENING;
        let n = f / (2.0 - f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        Self {
            eccentricity: (f * (2.0 - f)).sqrt(),
            rectifying_radius: SEMI_MAJOR_AXIS / (1.0 + n)
                * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0
                    - 127.0 * n5 / 288.0
                    + 7891.0 * n6 / 37800.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                    - 1983433.0 * n6 / 1935360.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0
                    + 15061.0 * n5 / 26880.0
                    + 167603.0 * n6 / 181440.0,
                49561.0 * n4 / 161280.0 - 179.0 * n5 / 168.0 + 6601661.0 * n6 / 7257600.0,
                34729.0 * n5 / 80640.0 - 3418889.0 * n6 / 1995840.0,
                212378941.0 * n6 / 319334400.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                    + 96199.0 * n6 / 604800.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0
                    - 1118711.0 * n6 / 3870720.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0
                    + 5569.0 * n6 / 90720.0,
                4397.0 * n4 / 161280.0 - 11.0 * n5 / 504.0 - 830251.0 * n6 / 7257600.0,
                4583.0 * n5 / 161280.0 - 108847.0 * n6 / 3991680.0,
                20648693.0 * n6 / 638668800.0,
            ],
        }
    }
}

fn conformal_tan(tau: f64, e: f64) -> f64 {
    let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
    tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
}

fn central_meridian(zone: u8) -> f64 {
    f64::from(zone) * 6.0 - 183.0
}

fn zone_number(lat: f64, lon: f64) -> u8 {
    let zone = (((lon + 180.0) / 6.0).floor() as i64 + 1).clamp(1, 60) as u8;

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lon) {
        return 32;
    }

    if (72.0..84.0).contains(&lat) {
        match lon {
            lon if (0.0..9.0).contains(&lon) => return 31,
            lon if (9.0..21.0).contains(&lon) => return 33,
            lon if (21.0..33.0).contains(&lon) => return 35,
            lon if (33.0..42.0).contains(&lon) => return 37,
            _ => {}
        }
    }

    zone
}

/// Forward projection into a given zone
fn project(lat: f64, lon: f64, zone: u8) -> Utm {
    let projection = Projection::wgs84();
    let e = projection.eccentricity;

    let phi = lat.to_radians();
    let lambda = (lon - central_meridian(zone)).to_radians();

    let tau_prime = conformal_tan(phi.tan(), e);
    let cos_lambda = lambda.cos();
    let xi_prime = tau_prime.atan2(cos_lambda);
    let eta_prime = (lambda.sin() / (tau_prime * tau_prime + cos_lambda * cos_lambda).sqrt()).asinh();

    let mut xi = xi_prime;
    let mut eta = eta_prime;
    for (j, alpha) in projection.alpha.iter().enumerate() {
        let k = 2.0 * (j + 1) as f64;
        xi += alpha * (k * xi_prime).sin() * (k * eta_prime).cosh();
        eta += alpha * (k * xi_prime).cos() * (k * eta_prime).sinh();
    }

    let x = SCALE_FACTOR * projection.rectifying_radius * eta;
    let y = SCALE_FACTOR * projection.rectifying_radius * xi;

    let hemisphere = if lat >= 0.0 {
        Hemisphere::North
    } else {
        Hemisphere::South
    };
    let northing = match hemisphere {
        Hemisphere::South => y + FALSE_NORTHING,
        _ => y,
    };

    Utm {
        zone,
        hemisphere,
        easting: x + FALSE_EASTING,
        northing,
    }
}

fn band_index(lat: f64) -> usize {
    (((lat + 80.0) / 8.0).floor() as usize).min(BANDS.len() - 1)
}

/// MGRS reference of `position` with `precision` digits per axis
///
/// Digits are truncated, so the reference addresses the grid cell that
/// contains the position.
///
/// ```
/// use dcs_waypoints::{mgrs, Position};
///
/// let eiffel_tower = Position::new(48.8582, 2.2945).unwrap();
/// assert_eq!(mgrs::to_mgrs(&eiffel_tower, 5).unwrap(), "31UDQ4825111932");
/// assert_eq!(mgrs::to_mgrs(&eiffel_tower, 2).unwrap(), "31UDQ4811");
/// ```
pub fn to_mgrs(position: &Position, precision: usize) -> Result<String> {
    if precision > 5 {
        return Err(Error::Mgrs(format!(
            "precision {precision} is not in 0..=5"
        )));
    }

    let utm = Utm::from_position(position)?;
    let band = BANDS[band_index(position.latitude().decimal_degree())] as char;

    let column_set = COLUMNS[usize::from(utm.zone - 1) % 3];
    let column_index = ((utm.easting / 100_000.0).floor() as usize)
        .checked_sub(1)
        .filter(|index| *index < column_set.len())
        .ok_or_else(|| Error::Mgrs(format!("easting {} is outside the zone", utm.easting)))?;
    let column = column_set[column_index] as char;

    let row_offset = if utm.zone % 2 == 0 { 5 } else { 0 };
    let row = ROWS[((utm.northing / 100_000.0).floor() as usize + row_offset) % ROWS.len()] as char;

    let divisor = 10_u64.pow(5 - precision as u32);
    let easting = (utm.easting.rem_euclid(100_000.0).floor() as u64) / divisor;
    let northing = (utm.northing.rem_euclid(100_000.0).floor() as u64) / divisor;

    let mut reference = format!("{:02}{band}{column}{row}", utm.zone);
    if precision > 0 {
        reference.push_str(&format!("{easting:0precision$}{northing:0precision$}"));
    }
    Ok(reference)
}

/// Position of the south-west corner of the grid cell addressed by `text`
///
/// Whitespace is ignored and letters may be lower case. The decoded
/// position has to fall into (or within one degree of) the latitude band
/// named by the reference.
pub fn from_mgrs(text: &str) -> Result<Position> {
    let reference: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    let invalid = |reason: &str| Error::Mgrs(format!("{reason} in {text:?}"));

    let zone_len = reference
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if zone_len == 0 || zone_len > 2 {
        return Err(invalid("missing or malformed zone number"));
    }
    let zone: u8 = reference[..zone_len]
        .parse()
        .map_err(|_| invalid("malformed zone number"))?;
    if !(1..=60).contains(&zone) {
        return Err(invalid("zone number out of range"));
    }

    let rest = reference[zone_len..].as_bytes();
    if rest.len() < 3 {
        return Err(invalid("missing band or grid square letters"));
    }

    let band_index = BANDS
        .iter()
        .position(|b| *b == rest[0])
        .ok_or_else(|| invalid("invalid latitude band"))?;
    let column_index = COLUMNS[usize::from(zone - 1) % 3]
        .iter()
        .position(|c| *c == rest[1])
        .ok_or_else(|| invalid("invalid grid column letter"))?;
    let row_index = ROWS
        .iter()
        .position(|r| *r == rest[2])
        .ok_or_else(|| invalid("invalid grid row letter"))?;

    let digits = &reference[zone_len + 3..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("non-numeric grid digits"));
    }
    if digits.len() % 2 != 0 || digits.len() > 10 {
        return Err(invalid("unbalanced grid digits"));
    }

    let precision = digits.len() / 2;
    let scale = 10_f64.powi(5 - precision as i32);
    let (easting_digits, northing_digits) = digits.split_at(precision);
    let easting_in_square = parse_digits(easting_digits)? * scale;
    let northing_in_square = parse_digits(northing_digits)? * scale;

    let hemisphere = if rest[0] >= b'N' {
        Hemisphere::North
    } else {
        Hemisphere::South
    };

    let row_offset = if zone % 2 == 0 { 5 } else { 0 };
    let row_number = (row_index + ROWS.len() - row_offset) % ROWS.len();

    let easting = (column_index + 1) as f64 * 100_000.0 + easting_in_square;
    let mut northing = row_number as f64 * 100_000.0 + northing_in_square;

    // Row letters repeat every 2000 km; anchor at the bottom of the band
    let band_bottom = band_index as f64 * 8.0 - 80.0;
    let bottom_northing = project(band_bottom, central_meridian(zone), zone).northing;
    let min_northing = (bottom_northing / 100_000.0).floor() * 100_000.0 - 100_000.0;
    while northing < min_northing {
        northing += 2_000_000.0;
    }

    let position = Utm {
        zone,
        hemisphere,
        easting,
        northing,
    }
    .to_position()?;

    let band_top = if band_index == BANDS.len() - 1 {
        MAX_LATITUDE
    } else {
        band_bottom + 8.0
    };
    let lat = position.latitude().decimal_degree();
    if lat < band_bottom - 1.0 || lat > band_top + 1.0 {
        return Err(invalid("grid square does not lie in the latitude band"));
    }

    Ok(position)
}

fn parse_digits(digits: &str) -> Result<f64> {
    if digits.is_empty() {
        return Ok(0.0);
    }
    digits
        .parse::<u32>()
        .map(f64::from)
        .map_err(|_| Error::Mgrs(format!("malformed grid digits {digits:?}")))
}
