//! Phosphor icon definitions for the UI.
//!
//! Icons are initialized via `setup_fonts` when the app starts.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Resource to track if fonts have been initialized.
#[derive(Resource, Default)]
pub struct FontsInitialized(pub bool);

/// System to initialize Phosphor icon fonts.
/// Runs in EguiPrimaryContextPass where the egui context is guaranteed to be ready.
pub fn setup_fonts(mut contexts: EguiContexts, mut initialized: ResMut<FontsInitialized>) {
    if initialized.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
    initialized.0 = true;

    info!("Phosphor icon fonts initialized");
}

// Browse all icons at https://phosphoricons.com/

/// Realtime mode
pub const REALTIME: &str = egui_phosphor::regular::CLOCK;
/// Date range picker
pub const CALENDAR: &str = egui_phosphor::regular::CALENDAR;
/// Apply custom range
pub const APPLY: &str = egui_phosphor::regular::CHECK;
/// Close/X icon
pub const CLOSE: &str = egui_phosphor::regular::X;
/// Error notice
pub const WARNING: &str = egui_phosphor::regular::WARNING;
/// No-data notice
pub const INFO: &str = egui_phosphor::regular::INFO;
/// Event count
pub const GLOBE: &str = egui_phosphor::regular::GLOBE;
/// Map link
pub const MAP_PIN: &str = egui_phosphor::regular::MAP_PIN;
/// Media button and images tab
pub const IMAGE: &str = egui_phosphor::regular::IMAGE;
/// Videos tab
pub const VIDEO: &str = egui_phosphor::regular::FILM_STRIP;
/// Play video
pub const PLAY: &str = egui_phosphor::regular::PLAY;
/// External link
pub const EXTERNAL: &str = egui_phosphor::regular::ARROW_SQUARE_OUT;
