//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};

use bevy::prelude::*;
use meteor_globe::client::FetchResult;
use meteor_globe::meteor::{Image, Media, MeteorEvent, Video};

/// Create a minimal Bevy app for testing without rendering.
pub fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app
}

/// A bare event with only the required fields.
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

/// `n` events with distinct impact points.
pub fn events(n: usize) -> Vec<MeteorEvent> {
    (0..n)
        .map(|i| event(-45.0 + 10.0 * i as f64, -120.0 + 25.0 * i as f64, 4.0 + (i % 3) as f64))
        .collect()
}

/// An event carrying videos but no images.
pub fn event_with_videos_only() -> MeteorEvent {
    let mut e = event(35.0, -110.0, 6.3);
    e.kind = Some("Fireball".to_string());
    e.media = Some(Media {
        images: Vec::<Image>::new(),
        videos: vec![Video {
            url: "https://media.example/clip.mp4".to_string(),
            thumbnail: "https://media.example/clip.png".to_string(),
            title: "Dashcam footage".to_string(),
            source: "AMS".to_string(),
        }],
    });
    e
}

/// A fetch channel that already holds `result`.
pub fn resolved_fetch(result: FetchResult) -> Receiver<FetchResult> {
    let (tx, rx) = mpsc::channel();
    let _ = tx.send(result);
    rx
}

/// A fetch channel that stays empty while the sender is kept alive.
pub fn hanging_fetch() -> (Sender<FetchResult>, Receiver<FetchResult>) {
    mpsc::channel()
}
