//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the coordinate is finite and within lat/lon ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Haversine distance between two coordinates, in kilometers.
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // rounding can push h slightly outside [0, 1] for antipodal points
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Distances from `origin` to every point, in input order.
pub fn haversine_vector(origin: &Coordinate, points: &[Coordinate]) -> Vec<f64> {
    points.iter().map(|p| haversine(origin, p)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinate::new(-42.09235170986195, 94.0);
        assert_eq!(haversine(&p, &p), 0.0);
    }

    #[test]
    fn quarter_meridian() {
        let equator = Coordinate::new(0.0, 0.0);
        let pole = Coordinate::new(90.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::FRAC_PI_2;
        assert!((haversine(&equator, &pole) - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodes_do_not_produce_nan() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = haversine(&a, &b);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn vector_keeps_order() {
        let origin = Coordinate::new(10.0, 10.0);
        let points = [
            Coordinate::new(10.0, 10.0),
            Coordinate::new(20.0, 10.0),
            Coordinate::new(11.0, 10.0),
        ];
        let d = haversine_vector(&origin, &points);
        assert_eq!(d.len(), 3);
        assert_eq!(d[0], 0.0);
        assert!(d[1] > d[2]);
    }

    #[test]
    fn validity() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::NAN).is_valid());
    }
}
