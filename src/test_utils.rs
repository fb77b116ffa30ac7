//! Test utilities for the meteor viewer.
//!
//! Provides fixtures for building backend records and assertions for
//! checking globe geometry.

use crate::meteor::{Image, Media, MeteorEvent, Video};

/// Fixtures for creating test meteor records.
pub mod fixtures {
    use super::*;

    /// A bare event at the given impact point with only the required fields.
    pub fn event(lat: f64, lng: f64, magnitude: f64) -> MeteorEvent {
        MeteorEvent {
            id: None,
            lat,
            lng,
            magnitude,
            velocity_kms: None,
            time_utc: None,
            source: None,
            kind: None,
            map_link: None,
            media: None,
        }
    }

    /// `n` distinct events spread over the globe with magnitudes 3..8.
    pub fn events(n: usize) -> Vec<MeteorEvent> {
        (0..n)
            .map(|i| {
                let mut e = event(
                    -60.0 + (i as f64 * 17.0) % 120.0,
                    -170.0 + (i as f64 * 41.0) % 340.0,
                    3.0 + (i % 5) as f64,
                );
                e.id = Some(format!("meteor_{i}"));
                e
            })
            .collect()
    }

    pub fn image(title: &str) -> Image {
        Image {
            url: format!("https://media.example/{}.jpg", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            description: format!("{title} (photo)"),
            source: "NASA".to_string(),
        }
    }

    pub fn video(title: &str) -> Video {
        Video {
            url: format!("https://media.example/{}.mp4", title.to_lowercase()),
            thumbnail: format!("https://media.example/{}.png", title.to_lowercase()),
            title: title.to_string(),
            source: "AMS".to_string(),
        }
    }

    /// A high-magnitude event with one image and one video.
    pub fn event_with_media(lat: f64, lng: f64) -> MeteorEvent {
        let mut e = event(lat, lng, 6.5);
        e.kind = Some("Fireball".to_string());
        e.media = Some(Media {
            images: vec![image("Bolide trail")],
            videos: vec![video("Dashcam")],
        });
        e
    }
}

/// Assertions for globe geometry.
pub mod assertions {
    use crate::geometry::angular_distance_deg;
    use crate::types::GeoPoint;

    /// Assert the central angle between `a` and `b` is `expected_deg` within `tolerance`.
    ///
    /// # Panics
    /// Panics if the distance is off by more than `tolerance` degrees.
    pub fn assert_angular_distance(a: GeoPoint, b: GeoPoint, expected_deg: f64, tolerance: f64) {
        let actual = angular_distance_deg(a, b);
        assert!(
            (actual - expected_deg).abs() <= tolerance,
            "Angular distance {a:?} -> {b:?} was {actual:.9}, expected {expected_deg} ± {tolerance:e}"
        );
    }

    /// Assert a latitude lies in [-90, 90].
    pub fn assert_valid_latitude(point: GeoPoint) {
        assert!(
            (-90.0..=90.0).contains(&point.lat),
            "Latitude out of range: {}",
            point.lat
        );
    }
}

/// Utilities for creating headless Bevy apps for testing.
pub mod bevy_test {
    use bevy::prelude::*;

    /// Create a minimal Bevy app for testing without rendering.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::entry_point;
    use crate::types::GeoPoint;

    #[test]
    fn test_events_are_distinct() {
        let events = fixtures::events(6);
        assert_eq!(events.len(), 6);
        for pair in events.windows(2) {
            assert_ne!(pair[0].impact(), pair[1].impact());
        }
    }

    #[test]
    fn test_event_with_media_has_media() {
        assert!(fixtures::event_with_media(0.0, 0.0).has_media());
        assert!(!fixtures::event(0.0, 0.0, 6.5).has_media());
    }

    #[test]
    fn test_entry_point_passes_distance_assertion() {
        let impact = GeoPoint::new(45.0, 10.0);
        let entry = entry_point(impact, 1.0);
        assertions::assert_angular_distance(impact, entry, 15.0, 1e-6);
        assertions::assert_valid_latitude(entry);
    }

    #[test]
    fn test_headless_app_updates() {
        let mut app = bevy_test::headless_app();
        app.update();
    }
}
