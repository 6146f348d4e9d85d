//! Vincenty solutions of the inverse and direct geodesic problems
//!
//! Angles are in decimal degrees, distances in kilometers.

use crate::error::{Error, Result};

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE: f64 = 1e-12;

/// Reference ellipsoid used for geodesic computations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters
    pub semi_major_axis: f64,
    /// Flattening
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// Perfect sphere with a radius of 6 370 997 m, used for FAI-style distances
    pub const SPHERE: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_370_997.0,
        flattening: 0.0,
    };

    fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening)
    }

    /// `(A, B)` series coefficients for the squared second eccentricity `u²`
    fn series(u_sq: f64) -> (f64, f64) {
        let a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
        let b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
        (a, b)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

/// Result of the inverse problem between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicSolution {
    pub distance_km: f64,
    /// Bearing at the start point, in [0, 360)
    pub initial_bearing: f64,
    /// Bearing from the end point back to the start point, in [0, 360)
    pub reverse_bearing: f64,
}

/// Distance and bearings between two points
///
/// A point straight north of the start (initial bearing exactly 0) always
/// reports a reverse bearing of exactly 180. Nearly antipodal points may
/// fail to converge.
pub fn inverse(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
    ellipsoid: Ellipsoid,
) -> Result<GeodesicSolution> {
    let f = ellipsoid.flattening;
    let a = ellipsoid.semi_major_axis;
    let b = ellipsoid.semi_minor_axis();

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let l = ((lon2 - lon1 + 540.0).rem_euclid(360.0) - 180.0).to_radians();

    let (sin_u1, cos_u1) = reduced_latitude(phi1, f);
    let (sin_u2, cos_u2) = reduced_latitude(phi2, f);

    let antipodal = l.abs() > std::f64::consts::FRAC_PI_2
        || (phi2 - phi1).abs() > std::f64::consts::FRAC_PI_2;

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 1.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 1.0;
    let mut cos_2sigma_m = 1.0;

    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sq_sigma = (cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2);

        // coincident points
        if sin_sq_sigma.abs() < 1e-24 {
            sin_sigma = 0.0;
            converged = true;
            break;
        }

        sin_sigma = sin_sq_sigma.sqrt();
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        let overshoot = if antipodal {
            lambda.abs() - std::f64::consts::PI
        } else {
            lambda.abs()
        };
        if overshoot > std::f64::consts::PI {
            return Err(Error::NoConvergence);
        }

        if (lambda - previous).abs() < CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(Error::NoConvergence);
    }

    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let (series_a, series_b) = Ellipsoid::series(u_sq);
    let delta_sigma = series_b
        * sin_sigma
        * (cos_2sigma_m
            + series_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - series_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
    let distance = b * series_a * (sigma - delta_sigma);

    let (alpha1, alpha2) = if sin_sigma == 0.0 {
        (0.0, 0.0)
    } else {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        (
            (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda),
            (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda),
        )
    };

    let initial_bearing = normalize_bearing(alpha1.to_degrees());
    let reverse_bearing = if initial_bearing == 0.0 {
        180.0
    } else {
        normalize_bearing(alpha2.to_degrees() + 180.0)
    };

    Ok(GeodesicSolution {
        distance_km: distance / 1000.0,
        initial_bearing,
        reverse_bearing,
    })
}

/// Destination reached from a start point along `bearing` after `distance_km`
///
/// Returns `(latitude, longitude)` of the destination; the longitude is not
/// normalized.
pub fn direct(
    lat: f64,
    lon: f64,
    bearing: f64,
    distance_km: f64,
    ellipsoid: Ellipsoid,
) -> (f64, f64) {
    let f = ellipsoid.flattening;
    let a = ellipsoid.semi_major_axis;
    let b = ellipsoid.semi_minor_axis();
    let s = distance_km * 1000.0;

    let (sin_alpha1, cos_alpha1) = bearing.to_radians().sin_cos();
    let (sin_u1, cos_u1) = reduced_latitude(lat.to_radians(), f);
    let tan_u1 = sin_u1 / cos_u1;

    let sigma1 = tan_u1.atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let (series_a, series_b) = Ellipsoid::series(u_sq);

    let mut sigma = s / (b * series_a);
    for _ in 0..100 {
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let delta_sigma = series_b
            * sin_sigma
            * (cos_2sigma_m
                + series_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                        - series_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma.powi(2))
                            * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
        let previous = sigma;
        sigma = s / (b * series_a) + delta_sigma;
        if (sigma - previous).abs() < CONVERGENCE {
            break;
        }
    }

    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let x = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + x * x).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

    (phi2.to_degrees(), lon + l.to_degrees())
}

/// `(sin U, cos U)` of the reduced latitude
fn reduced_latitude(phi: f64, flattening: f64) -> (f64, f64) {
    let tan_u = (1.0 - flattening) * phi.tan();
    let cos_u = 1.0 / (1.0 + tan_u * tan_u).sqrt();
    (tan_u * cos_u, cos_u)
}

/// Bearing in [0, 360), never negative zero
pub(crate) fn normalize_bearing(degrees: f64) -> f64 {
    let bearing = degrees.rem_euclid(360.0);
    if bearing >= 360.0 { 0.0 } else { bearing + 0.0 }
}
