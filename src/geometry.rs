//! Great-circle geometry on the globe.
//!
//! Computes the synthetic atmospheric entry point of a meteor, the central
//! angle between two coordinates, and the 3D positions used to draw markers
//! and entry trails.

use bevy::math::{DVec3, Vec3};
use rand::Rng;
use std::f64::consts::{PI, TAU};

use crate::types::GeoPoint;

/// Angular distance between an impact point and its entry point, in degrees.
pub const ENTRY_DISTANCE_DEG: f64 = 15.0;

/// Destination point `ENTRY_DISTANCE_DEG` away from `impact` along `bearing`
/// (radians, clockwise from north).
///
/// Longitude is not wrapped into [-180, 180].
pub fn entry_point(impact: GeoPoint, bearing: f64) -> GeoPoint {
    let delta = ENTRY_DISTANCE_DEG.to_radians();
    let lat1 = impact.lat_rad();
    let lng1 = impact.lng_rad();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lng2 = lng1
        + (bearing.sin() * delta.sin() * lat1.cos())
            .atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), lng2.to_degrees())
}

/// Entry point along a bearing drawn from `bearing`.
///
/// With a random source the result differs on every call.
pub fn random_entry_point(impact: GeoPoint, mut bearing: impl FnMut() -> f64) -> GeoPoint {
    entry_point(impact, bearing())
}

/// Uniform bearing in [0, 2π).
pub fn uniform_bearing<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}

/// Central angle between two coordinates in degrees (haversine).
pub fn angular_distance_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = b.lat_rad() - a.lat_rad();
    let dlng = b.lng_rad() - a.lng_rad();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat_rad().cos() * b.lat_rad().cos() * (dlng / 2.0).sin().powi(2);
    (2.0 * h.sqrt().min(1.0).asin()).to_degrees()
}

/// Unit vector for a coordinate in the Y-up render frame.
///
/// Latitude 0, longitude 0 faces +Z; longitude 90 faces +X; the north pole is +Y.
pub fn unit_vector(point: GeoPoint) -> DVec3 {
    let (lat, lng) = (point.lat_rad(), point.lng_rad());
    DVec3::new(lat.cos() * lng.sin(), lat.sin(), lat.cos() * lng.cos())
}

/// Position of a coordinate on (or above) a globe of `radius`.
///
/// `altitude` is a fraction of the radius.
pub fn to_globe_position(point: GeoPoint, radius: f32, altitude: f32) -> Vec3 {
    (unit_vector(point) * (radius * (1.0 + altitude)) as f64).as_vec3()
}

/// Sample a great-circle arc from `start` to `end` lifted off the surface.
///
/// The lift follows `sin(πt)` and peaks at `peak_altitude` (fraction of the
/// radius) halfway along. Returns `segments + 1` points.
pub fn arc_path(
    start: GeoPoint,
    end: GeoPoint,
    radius: f32,
    peak_altitude: f32,
    segments: usize,
) -> Vec<Vec3> {
    let segments = segments.max(1);
    let a = unit_vector(start);
    let b = unit_vector(end);
    let omega = a.dot(b).clamp(-1.0, 1.0).acos();
    let sin_omega = omega.sin();

    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let dir = if sin_omega.abs() < 1e-9 {
                a.lerp(b, t).normalize_or(a)
            } else {
                (a * ((1.0 - t) * omega).sin() + b * (t * omega).sin()) / sin_omega
            };
            let lift = 1.0 + peak_altitude as f64 * (PI * t).sin();
            (dir * radius as f64 * lift).as_vec3()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_entry_point_due_north_from_equator() {
        let entry = entry_point(GeoPoint::new(0.0, 0.0), 0.0);
        assert_relative_eq!(entry.lat, 15.0, epsilon = 1e-9);
        assert_relative_eq!(entry.lng, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_entry_point_due_east_from_equator() {
        let entry = entry_point(GeoPoint::new(0.0, 10.0), PI / 2.0);
        assert_relative_eq!(entry.lat, 0.0, epsilon = 1e-9);
        assert_relative_eq!(entry.lng, 25.0, epsilon = 1e-9);
    }

    #[test]
    fn test_entry_point_fixed_bearing_is_reproducible() {
        let impact = GeoPoint::new(-33.9, 151.2);
        let a = entry_point(impact, 1.234);
        let b = entry_point(impact, 1.234);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_entry_point_uses_supplied_bearing() {
        let impact = GeoPoint::new(48.0, 2.3);
        let entry = random_entry_point(impact, || 2.0);
        assert_eq!(entry, entry_point(impact, 2.0));
    }

    #[test]
    fn test_random_entry_point_varies_between_calls() {
        let impact = GeoPoint::new(10.0, 20.0);
        let mut rng = rand::thread_rng();
        let samples: Vec<GeoPoint> = (0..8)
            .map(|_| random_entry_point(impact, || uniform_bearing(&mut rng)))
            .collect();
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_uniform_bearing_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let b = uniform_bearing(&mut rng);
            assert!((0.0..TAU).contains(&b));
        }
    }

    #[test]
    fn test_angular_distance_quarter_turn() {
        let d = angular_distance_deg(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 90.0));
        assert_relative_eq!(d, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unit_vector_axes() {
        let north = unit_vector(GeoPoint::new(90.0, 0.0));
        assert_relative_eq!(north.y, 1.0, epsilon = 1e-12);

        let origin = unit_vector(GeoPoint::new(0.0, 0.0));
        assert_relative_eq!(origin.z, 1.0, epsilon = 1e-12);

        let east = unit_vector(GeoPoint::new(0.0, 90.0));
        assert_relative_eq!(east.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_to_globe_position_altitude() {
        let p = to_globe_position(GeoPoint::new(12.0, 34.0), 100.0, 0.1);
        assert_relative_eq!(p.length(), 110.0, epsilon = 1e-3);
    }

    #[test]
    fn test_arc_path_endpoints_and_peak() {
        let start = GeoPoint::new(0.0, 0.0);
        let end = GeoPoint::new(0.0, 30.0);
        let path = arc_path(start, end, 100.0, 0.3, 10);
        assert_eq!(path.len(), 11);

        let first = path[0];
        let last = path[10];
        assert!((first - to_globe_position(start, 100.0, 0.0)).length() < 1e-3);
        assert!((last - to_globe_position(end, 100.0, 0.0)).length() < 1e-3);
        assert_relative_eq!(path[5].length(), 130.0, epsilon = 1e-3);
    }

    #[test]
    fn test_arc_path_degenerate_same_point() {
        let p = GeoPoint::new(5.0, 5.0);
        let path = arc_path(p, p, 100.0, 0.3, 4);
        assert_eq!(path.len(), 5);
        assert!(path.iter().all(|v| v.is_finite()));
    }
}
