//! Rendering systems for the meteor globe.
//!
//! This module provides the globe itself, the starfield, meteor markers with
//! their entry trails, hover picking, and marker labels.

mod background;
pub mod globe;
mod labels;
pub mod markers;
pub mod picking;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use self::background::BackgroundPlugin;
use self::globe::GlobePlugin;
use self::markers::{ArcPaths, draw_arcs, sync_markers};
use self::picking::{detect_hover, draw_highlight, open_gallery_on_click};
use crate::view::GalleryState;

pub use self::markers::MeteorMarker;
pub use self::picking::HoveredMeteor;

/// Plugin aggregating all rendering functionality.
pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GlobePlugin, BackgroundPlugin))
            .init_resource::<ArcPaths>()
            .init_resource::<HoveredMeteor>()
            .init_resource::<GalleryState>()
            // Markers must be rebuilt before hover picking looks at the dataset,
            // and picking must settle before the click handler reads it.
            .add_systems(
                Update,
                (
                    sync_markers,
                    (detect_hover, open_gallery_on_click).chain(),
                    (draw_arcs, draw_highlight),
                )
                    .chain(),
            )
            .add_systems(EguiPrimaryContextPass, labels::draw_marker_labels);
    }
}

/// Colors shared by the scene.
pub mod palette {
    use bevy::prelude::Color;

    pub const OCEAN: Color = Color::srgb(0.03, 0.12, 0.30);
    pub const ATMOSPHERE: Color = Color::srgba(1.0, 1.0, 1.0, 0.08);
    pub const GRATICULE: Color = Color::srgba(0.55, 0.7, 0.9, 0.25);
    pub const HIGHLIGHT: Color = Color::srgba(0.0, 1.0, 1.0, 0.9);
    pub const STAR: Color = Color::WHITE;
}
