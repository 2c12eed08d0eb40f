//! Tests for the geo module

use starlink_history::geo::*;

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[test]
fn test_haversine_symmetric() {
    let points = [
        Coordinate::new(-42.09235170986195, 94.0),
        Coordinate::new(51.5074, -0.1278),
        Coordinate::new(0.0, 179.9),
        Coordinate::new(-89.0, -120.0),
    ];
    for a in &points {
        assert_eq!(haversine(a, a), 0.0);
        for b in &points {
            let ab = haversine(a, b);
            assert!(ab >= 0.0);
            assert!(approx_eq(ab, haversine(b, a), 1e-9));
        }
    }
}

#[test]
fn test_haversine_known_value() {
    // London to Paris is approximately 344 km
    let london = Coordinate::new(51.5074, -0.1278);
    let paris = Coordinate::new(48.8566, 2.3522);
    assert!(approx_eq(haversine(&london, &paris), 343.6, 5.0));
}

#[test]
fn test_crossing_antimeridian() {
    let a = Coordinate::new(0.0, 179.5);
    let b = Coordinate::new(0.0, -179.5);
    // one degree of arc along the equator
    let expected = EARTH_RADIUS_KM * 1f64.to_radians();
    assert!(approx_eq(haversine(&a, &b), expected, 1e-6));
}

#[test]
fn test_vector_matches_scalar() {
    let origin = Coordinate::from((10.0, 10.0));
    let points = vec![Coordinate::new(12.0, 8.0), Coordinate::new(-30.0, 100.0)];
    let batch = haversine_vector(&origin, &points);
    for (p, d) in points.iter().zip(&batch) {
        assert_eq!(*d, haversine(&origin, p));
    }
    assert!(haversine_vector(&origin, &[]).is_empty());
}
