//! UI module providing the egui-based interface.
//!
//! A control bar along the top, a hover tooltip, the media gallery modal and
//! a notice banner. The globe stays fully interactive outside these.

pub mod controls;
mod gallery;
pub mod icons;
pub mod notices;
pub mod tooltip;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::view::GalleryState;

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GalleryState>()
            .init_resource::<icons::FontsInitialized>()
            // Font initialization MUST run before any UI systems that use icons
            .add_systems(EguiPrimaryContextPass, icons::setup_fonts)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    controls::controls_system,
                    notices::notice_system,
                    tooltip::tooltip_system,
                    gallery::gallery_system,
                )
                    .chain()
                    .after(icons::setup_fonts)
                    .run_if(|init: Res<icons::FontsInitialized>| init.0),
            );
    }
}
