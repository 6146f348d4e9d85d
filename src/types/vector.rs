use std::ops::{Add, Div, Mul, Neg, Sub};

/// Displacement on the earth's surface
///
/// Expressed both as heading (degrees clockwise from north) plus magnitude
/// in kilometers, and as zonal (`dx`, east positive) and meridional (`dy`,
/// north positive) components in kilometers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoVector {
    heading: f64,
    magnitude: f64,
    dx: f64,
    dy: f64,
}

impl GeoVector {
    /// Create from a heading and a distance in kilometers
    pub fn new(heading: f64, magnitude: f64) -> Self {
        let theta = (90.0 - heading).rem_euclid(360.0).to_radians();
        Self {
            heading: crate::geodesy::normalize_bearing(heading),
            magnitude,
            dx: magnitude * theta.cos(),
            dy: magnitude * theta.sin(),
        }
    }

    /// Create from zonal and meridional components in kilometers
    pub fn from_components(dx: f64, dy: f64) -> Self {
        let angle = dy.atan2(dx).to_degrees();
        Self {
            heading: crate::geodesy::normalize_bearing(90.0 - angle),
            magnitude: dx.hypot(dy),
            dx,
            dy,
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Length in kilometers
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Component-wise comparison with a 1 mm tolerance
    pub fn almost_eq(&self, other: &GeoVector) -> bool {
        self.almost_eq_within(other, 1e-6)
    }

    pub fn almost_eq_within(&self, other: &GeoVector, tolerance_km: f64) -> bool {
        (self.dx - other.dx).abs() < tolerance_km && (self.dy - other.dy).abs() < tolerance_km
    }
}

impl Add for GeoVector {
    type Output = GeoVector;

    fn add(self, other: GeoVector) -> GeoVector {
        GeoVector::from_components(self.dx + other.dx, self.dy + other.dy)
    }
}

impl Sub for GeoVector {
    type Output = GeoVector;

    fn sub(self, other: GeoVector) -> GeoVector {
        GeoVector::from_components(self.dx - other.dx, self.dy - other.dy)
    }
}

impl Neg for GeoVector {
    type Output = GeoVector;

    fn neg(self) -> GeoVector {
        GeoVector::from_components(-self.dx, -self.dy)
    }
}

impl Mul<f64> for GeoVector {
    type Output = GeoVector;

    fn mul(self, scalar: f64) -> GeoVector {
        GeoVector::from_components(self.dx * scalar, self.dy * scalar)
    }
}

impl Div<f64> for GeoVector {
    type Output = GeoVector;

    fn div(self, scalar: f64) -> GeoVector {
        GeoVector::from_components(self.dx / scalar, self.dy / scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn components_from_heading() {
        let east = GeoVector::new(90.0, 10.0);
        assert_close(east.dx(), 10.0);
        assert_close(east.dy(), 0.0);

        let south_west = GeoVector::new(225.0, 2.0_f64.sqrt());
        assert_close(south_west.dx(), -1.0);
        assert_close(south_west.dy(), -1.0);
    }

    #[test]
    fn heading_from_components() {
        let north = GeoVector::from_components(0.0, 5.0);
        assert_close(north.heading(), 0.0);
        assert_close(north.magnitude(), 5.0);

        let west = GeoVector::from_components(-3.0, 0.0);
        assert_close(west.heading(), 270.0);

        let north_west = GeoVector::from_components(-1.0, 1.0);
        assert_close(north_west.heading(), 315.0);
    }

    #[test]
    fn arithmetic() {
        let north = GeoVector::new(0.0, 3.0);
        let east = GeoVector::new(90.0, 4.0);

        let sum = north + east;
        assert_close(sum.magnitude(), 5.0);
        assert!(sum.almost_eq(&GeoVector::from_components(4.0, 3.0)));

        let difference = sum - east;
        assert!(difference.almost_eq(&north));

        let reversed = -north;
        assert_close(reversed.heading(), 180.0);
        assert_close(reversed.magnitude(), 3.0);

        let scaled = east * 2.5;
        assert_close(scaled.magnitude(), 10.0);
        assert_close(scaled.heading(), 90.0);

        let halved = east / 2.0;
        assert_close(halved.dx(), 2.0);
    }

    #[test]
    fn almost_eq_tolerance() {
        let a = GeoVector::from_components(1.0, 1.0);
        let b = GeoVector::from_components(1.0 + 5e-7, 1.0);
        let c = GeoVector::from_components(1.0 + 5e-6, 1.0);
        assert!(a.almost_eq(&b));
        assert!(!a.almost_eq(&c));
        assert!(a.almost_eq_within(&c, 1e-5));
    }
}
