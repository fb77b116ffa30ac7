//! Meteor event records and the derived globe dataset.
//!
//! `MeteorEvent` mirrors the backend's JSON. Everything else in this module
//! is derived on the client: severity from magnitude, a synthetic entry point
//! per event, and the point/arc sets handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::geometry::random_entry_point;
use crate::types::{GeoPoint, HexColor};

/// A meteor/fireball event as served by `/api/meteors`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeteorEvent {
    #[serde(default)]
    pub id: Option<String>,
    /// Impact latitude in degrees.
    pub lat: f64,
    /// Impact longitude in degrees.
    pub lng: f64,
    pub magnitude: f64,
    #[serde(default)]
    pub velocity_kms: Option<f64>,
    #[serde(default)]
    pub time_utc: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, rename = "mapLink")]
    pub map_link: Option<String>,
    #[serde(default)]
    pub media: Option<Media>,
}

impl MeteorEvent {
    /// Impact location.
    pub fn impact(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Whether the event carries at least one image or video.
    pub fn has_media(&self) -> bool {
        self.media.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// Media attached to an event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

impl Media {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
}

/// Severity band derived from magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    /// magnitude < 5 (NaN also lands here)
    Low,
    /// 5 <= magnitude < 6
    Medium,
    /// magnitude >= 6
    High,
}

impl Severity {
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 6.0 {
            Severity::High
        } else if magnitude >= 5.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Marker and arc color.
    pub fn color_hex(&self) -> &'static str {
        match self {
            Severity::High => "#ff0000",
            Severity::Medium => "#ff4444",
            Severity::Low => "#ffa500",
        }
    }

    /// Marker footprint radius in degrees of arc.
    pub fn radius(&self) -> f64 {
        match self {
            Severity::High => 0.5,
            Severity::Medium => 0.4,
            Severity::Low => 0.3,
        }
    }

    /// Marker label glyph.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "\u{1F6A8}",
            Severity::Medium | Severity::Low => "\u{2604}\u{FE0F}",
        }
    }

    /// Whether the tooltip shows the high-impact badge.
    pub fn is_high_impact(&self) -> bool {
        matches!(self, Severity::High)
    }
}

/// An event enriched with everything the renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPoint {
    pub event: MeteorEvent,
    /// Synthetic atmospheric entry point.
    pub entry: GeoPoint,
    pub severity: Severity,
    pub color: HexColor,
    pub radius: f64,
    pub label: &'static str,
}

impl RenderPoint {
    /// Enrich `event`, drawing the entry bearing from `bearing`.
    pub fn from_event(event: MeteorEvent, bearing: impl FnMut() -> f64) -> Self {
        let severity = Severity::from_magnitude(event.magnitude);
        let entry = random_entry_point(event.impact(), bearing);
        Self {
            entry,
            severity,
            color: severity_color(severity),
            radius: severity.radius(),
            label: severity.label(),
            event,
        }
    }

    pub fn impact(&self) -> GeoPoint {
        self.event.impact()
    }
}

/// Trail from the entry point to the impact point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderArc {
    pub start: GeoPoint,
    pub end: GeoPoint,
    pub color: HexColor,
}

impl From<&RenderPoint> for RenderArc {
    fn from(point: &RenderPoint) -> Self {
        Self {
            start: point.entry,
            end: point.impact(),
            color: point.color,
        }
    }
}

fn severity_color(severity: Severity) -> HexColor {
    // The severity palette is a fixed table of valid hex strings.
    HexColor::parse(severity.color_hex()).unwrap_or(HexColor { r: 255, g: 165, b: 0 })
}

/// Points and arcs currently shown on the globe.
///
/// Both sets are always replaced together; `generation` increases on every
/// replacement so render systems can tell when to rebuild.
#[derive(Clone, Debug, Default)]
pub struct GlobeDataset {
    points: Vec<RenderPoint>,
    arcs: Vec<RenderArc>,
    generation: u64,
}

impl GlobeDataset {
    /// Build the point and arc sets for `events`.
    pub fn build(events: Vec<MeteorEvent>, mut bearing: impl FnMut() -> f64) -> (Vec<RenderPoint>, Vec<RenderArc>) {
        let points: Vec<RenderPoint> = events
            .into_iter()
            .map(|event| RenderPoint::from_event(event, &mut bearing))
            .collect();
        let arcs = points.iter().map(RenderArc::from).collect();
        (points, arcs)
    }

    /// Replace the whole dataset with the enriched `events`.
    pub fn replace(&mut self, events: Vec<MeteorEvent>, bearing: impl FnMut() -> f64) {
        let (points, arcs) = Self::build(events, bearing);
        self.points = points;
        self.arcs = arcs;
        self.generation += 1;
    }

    /// Remove every point and arc.
    pub fn clear(&mut self) {
        self.points.clear();
        self.arcs.clear();
        self.generation += 1;
    }

    pub fn points(&self) -> &[RenderPoint] {
        &self.points
    }

    pub fn arcs(&self) -> &[RenderArc] {
        &self.arcs
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
