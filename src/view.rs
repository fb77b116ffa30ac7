//! View models for the tooltip and the media gallery.
//!
//! Pure data built from meteor records. The egui systems only lay these out.

use bevy::prelude::Resource;

use crate::meteor::{Image, MeteorEvent, RenderPoint, Video};

pub const DEFAULT_EVENT_TYPE: &str = "Fireball";
pub const HIGH_IMPACT_BADGE: &str = "HIGH IMPACT";
pub const NO_IMAGES: &str = "No images available";
pub const NO_VIDEOS: &str = "No videos available";
const UNKNOWN: &str = "unknown";

/// Contents of the hover tooltip for one point.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipView {
    /// Shown for high-severity events.
    pub badge: Option<&'static str>,
    pub label: &'static str,
    pub title: String,
    /// (caption, value) rows in display order.
    pub rows: Vec<(&'static str, String)>,
    pub map_link: String,
    pub has_media: bool,
}

impl TooltipView {
    pub fn from_point(point: &RenderPoint) -> Self {
        let event = &point.event;
        Self {
            badge: point.severity.is_high_impact().then_some(HIGH_IMPACT_BADGE),
            label: point.label,
            title: event
                .kind
                .clone()
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            rows: vec![
                ("Magnitude:", format_number(event.magnitude)),
                (
                    "Velocity:",
                    event
                        .velocity_kms
                        .map(|v| format!("{} km/s", format_number(v)))
                        .unwrap_or_else(|| UNKNOWN.to_string()),
                ),
                ("Time (UTC):", text_or_unknown(event.time_utc.as_deref())),
                ("Source:", text_or_unknown(event.source.as_deref())),
            ],
            map_link: map_link(event),
            has_media: event.has_media(),
        }
    }
}

/// Map URL for an event: the backend's link if it sent one, else OpenStreetMap.
pub fn map_link(event: &MeteorEvent) -> String {
    match event.map_link.as_deref().map(str::trim) {
        Some(link) if !link.is_empty() => link.to_string(),
        _ => format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=5/{lat}/{lng}",
            lat = event.lat,
            lng = event.lng
        ),
    }
}

fn format_number(value: f64) -> String {
    // Trim to at most two decimals without trailing zeros, like the backend rounds.
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}

fn text_or_unknown(text: Option<&str>) -> String {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// One image card.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageCard {
    pub url: String,
    pub title: String,
    pub description: String,
    pub source_line: String,
}

impl From<&Image> for ImageCard {
    fn from(image: &Image) -> Self {
        Self {
            url: image.url.clone(),
            title: image.title.clone(),
            description: image.description.clone(),
            source_line: format!("Source: {}", image.source),
        }
    }
}

/// One video card.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoCard {
    pub url: String,
    pub thumbnail: String,
    pub title: String,
    pub source_line: String,
}

impl From<&Video> for VideoCard {
    fn from(video: &Video) -> Self {
        Self {
            url: video.url.clone(),
            thumbnail: video.thumbnail.clone(),
            title: video.title.clone(),
            source_line: format!("Source: {}", video.source),
        }
    }
}

/// A gallery tab pane: either cards or a placeholder line.
#[derive(Clone, Debug, PartialEq)]
pub enum Pane<T> {
    Empty(&'static str),
    Cards(Vec<T>),
}

impl<T> Pane<T> {
    fn from_cards(cards: Vec<T>, placeholder: &'static str) -> Self {
        if cards.is_empty() {
            Pane::Empty(placeholder)
        } else {
            Pane::Cards(cards)
        }
    }
}

/// Contents of the media gallery for one event.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryView {
    pub title: String,
    pub images: Pane<ImageCard>,
    pub videos: Pane<VideoCard>,
}

impl GalleryView {
    pub fn from_event(event: &MeteorEvent) -> Self {
        let (images, videos) = match &event.media {
            Some(media) => (
                media.images.iter().map(ImageCard::from).collect(),
                media.videos.iter().map(VideoCard::from).collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            title: event
                .kind
                .clone()
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            images: Pane::from_cards(images, NO_IMAGES),
            videos: Pane::from_cards(videos, NO_VIDEOS),
        }
    }
}

/// Gallery tabs, images first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GalleryTab {
    #[default]
    Images,
    Videos,
}

impl GalleryTab {
    pub const ALL: [GalleryTab; 2] = [GalleryTab::Images, GalleryTab::Videos];

    pub fn label(&self) -> &'static str {
        match self {
            GalleryTab::Images => "Images",
            GalleryTab::Videos => "Videos",
        }
    }
}

/// The media gallery modal: which event it shows and the active tab.
#[derive(Resource, Clone, Debug, Default)]
pub struct GalleryState {
    view: Option<GalleryView>,
    pub tab: GalleryTab,
}

impl GalleryState {
    /// Open the gallery for `event`, starting on the Images tab.
    pub fn open(&mut self, event: &MeteorEvent) {
        self.view = Some(GalleryView::from_event(event));
        self.tab = GalleryTab::Images;
    }

    pub fn close(&mut self) {
        self.view = None;
    }

    /// A click landed on the modal layer. Only clicks outside the content close it.
    pub fn click(&mut self, inside_content: bool) {
        if !inside_content {
            self.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&GalleryView> {
        self.view.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meteor::Media;
    use crate::test_utils::fixtures;

    #[test]
    fn test_tooltip_high_impact_badge() {
        let point = RenderPoint::from_event(fixtures::event(10.0, 20.0, 6.0), || 0.0);
        let view = TooltipView::from_point(&point);
        assert_eq!(view.badge, Some(HIGH_IMPACT_BADGE));

        let calm = RenderPoint::from_event(fixtures::event(10.0, 20.0, 5.9), || 0.0);
        assert_eq!(TooltipView::from_point(&calm).badge, None);
    }

    #[test]
    fn test_tooltip_rows() {
        let mut event = fixtures::event(10.0, 20.0, 4.256);
        event.velocity_kms = Some(17.5);
        event.time_utc = Some("2024-05-01 12:00:00".to_string());
        event.source = Some("CNEOS".to_string());
        event.kind = Some("High-Energy Fireball".to_string());
        let view = TooltipView::from_point(&RenderPoint::from_event(event, || 0.0));

        assert_eq!(view.title, "High-Energy Fireball");
        assert_eq!(
            view.rows,
            vec![
                ("Magnitude:", "4.26".to_string()),
                ("Velocity:", "17.5 km/s".to_string()),
                ("Time (UTC):", "2024-05-01 12:00:00".to_string()),
                ("Source:", "CNEOS".to_string()),
            ]
        );
        assert!(!view.has_media);
    }

    #[test]
    fn test_tooltip_defaults_for_missing_fields() {
        let view = TooltipView::from_point(&RenderPoint::from_event(fixtures::event(0.0, 0.0, 1.0), || 0.0));
        assert_eq!(view.title, DEFAULT_EVENT_TYPE);
        assert_eq!(view.rows[1].1, "unknown");
        assert_eq!(view.rows[3].1, "unknown");
    }

    #[test]
    fn test_map_link_prefers_backend() {
        let mut event = fixtures::event(1.5, -2.5, 3.0);
        assert_eq!(
            map_link(&event),
            "https://www.openstreetmap.org/?mlat=1.5&mlon=-2.5#map=5/1.5/-2.5"
        );
        event.map_link = Some("https://maps.example/x".to_string());
        assert_eq!(map_link(&event), "https://maps.example/x");
    }

    #[test]
    fn test_gallery_images_empty_videos_present() {
        let mut event = fixtures::event(0.0, 0.0, 6.5);
        event.media = Some(Media {
            images: Vec::new(),
            videos: vec![fixtures::video("Dashcam"), fixtures::video("Doorbell")],
        });

        let view = GalleryView::from_event(&event);
        assert_eq!(view.images, Pane::Empty(NO_IMAGES));
        match &view.videos {
            Pane::Cards(cards) => {
                assert_eq!(cards.len(), 2);
                assert_eq!(cards[0].title, "Dashcam");
                assert_eq!(cards[0].source_line, "Source: AMS");
            }
            Pane::Empty(_) => panic!("expected video cards"),
        }
    }

    #[test]
    fn test_gallery_without_media() {
        let view = GalleryView::from_event(&fixtures::event(0.0, 0.0, 6.5));
        assert_eq!(view.images, Pane::Empty(NO_IMAGES));
        assert_eq!(view.videos, Pane::Empty(NO_VIDEOS));
    }

    #[test]
    fn test_gallery_image_cards() {
        let mut event = fixtures::event(0.0, 0.0, 6.5);
        event.media = Some(Media {
            images: vec![fixtures::image("Trail over Nevada")],
            videos: Vec::new(),
        });
        let view = GalleryView::from_event(&event);
        let Pane::Cards(cards) = view.images else {
            panic!("expected image cards");
        };
        assert_eq!(cards[0].title, "Trail over Nevada");
        assert_eq!(view.videos, Pane::Empty(NO_VIDEOS));
    }

    #[test]
    fn test_gallery_state_open_resets_tab() {
        let mut state = GalleryState::default();
        let event = fixtures::event_with_media(0.0, 0.0);
        state.open(&event);
        state.tab = GalleryTab::Videos;
        state.close();
        assert!(!state.is_open());

        state.open(&event);
        assert!(state.is_open());
        assert_eq!(state.tab, GalleryTab::Images);
    }

    #[test]
    fn test_gallery_click_inside_keeps_open() {
        let mut state = GalleryState::default();
        state.open(&fixtures::event_with_media(0.0, 0.0));
        state.click(true);
        assert!(state.is_open());
        state.click(false);
        assert!(!state.is_open());
    }
}
