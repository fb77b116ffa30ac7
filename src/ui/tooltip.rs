//! Hover tooltip for meteor markers.
//!
//! A floating card next to the cursor with the event details, a map link and,
//! when the event has media, a button opening the gallery.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::camera::GlobeViewport;
use crate::pipeline::MeteorPipeline;
use crate::render::HoveredMeteor;
use crate::view::{GalleryState, TooltipView};

use super::icons;

/// Colors for the tooltip card.
mod colors {
    use bevy_egui::egui::Color32;

    pub const CARD_BG: Color32 = Color32::from_rgba_premultiplied(26, 26, 36, 235);
    pub const CARD_BORDER: Color32 = Color32::from_rgb(60, 60, 80);
    pub const BADGE_BG: Color32 = Color32::from_rgb(200, 30, 30);
    pub const BADGE_TEXT: Color32 = Color32::WHITE;
    pub const CAPTION: Color32 = Color32::from_rgb(150, 150, 165);
}

/// Offset of the card from the cursor, in pixels.
pub const CURSOR_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Card dimensions for positioning calculations.
pub const CARD_WIDTH: f32 = 240.0;
pub const CARD_HEIGHT: f32 = 210.0; // Approximate height

/// Top-left corner of the card for a cursor at `anchor`, kept on screen.
pub fn tooltip_position(anchor: Vec2, card: Vec2, screen: Vec2) -> Vec2 {
    let desired = anchor + CURSOR_OFFSET;
    let max = (screen - card).max(Vec2::ZERO);
    desired.clamp(Vec2::ZERO, max)
}

/// System to render the tooltip for the hovered marker.
pub fn tooltip_system(
    mut contexts: EguiContexts,
    pipeline: Res<MeteorPipeline>,
    viewport: Res<GlobeViewport>,
    mut hovered: ResMut<HoveredMeteor>,
    mut gallery: ResMut<GalleryState>,
) {
    let Some(point) = hovered.point(&pipeline) else {
        hovered.over_tooltip = false;
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let view = TooltipView::from_point(point);
    let screen = if viewport.width > 0.0 && viewport.height > 0.0 {
        Vec2::new(viewport.width, viewport.height)
    } else {
        let rect = ctx.screen_rect();
        Vec2::new(rect.width(), rect.height())
    };
    let pos = tooltip_position(hovered.anchor, Vec2::new(CARD_WIDTH, CARD_HEIGHT), screen);

    let mut open_media = false;
    let response = egui::Window::new("Meteor")
        .id(egui::Id::new("meteor_tooltip"))
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .fixed_pos(egui::pos2(pos.x, pos.y))
        .frame(
            egui::Frame::new()
                .fill(colors::CARD_BG)
                .inner_margin(12)
                .stroke(egui::Stroke::new(1.0, colors::CARD_BORDER))
                .corner_radius(4),
        )
        .show(ctx, |ui| {
            ui.set_max_width(CARD_WIDTH - 24.0);
            render_tooltip(ui, &view, &mut open_media);
        });

    hovered.over_tooltip = response.is_some_and(|r| r.response.contains_pointer());

    if open_media {
        info!("Opening media gallery for {:?}", point.event.id);
        gallery.open(&point.event);
    }
}

fn render_tooltip(ui: &mut egui::Ui, view: &TooltipView, open_media: &mut bool) {
    if let Some(badge) = view.badge {
        egui::Frame::new()
            .fill(colors::BADGE_BG)
            .corner_radius(3)
            .inner_margin(egui::Margin::symmetric(6, 2))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(badge).strong().size(11.0).color(colors::BADGE_TEXT));
            });
    }

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(view.label).size(16.0));
        ui.label(egui::RichText::new(&view.title).strong().size(16.0));
    });

    ui.separator();

    egui::Grid::new("meteor_tooltip_rows")
        .num_columns(2)
        .spacing([8.0, 2.0])
        .show(ui, |ui| {
            for (caption, value) in &view.rows {
                ui.label(egui::RichText::new(*caption).size(12.0).color(colors::CAPTION));
                ui.label(egui::RichText::new(value).size(13.0));
                ui.end_row();
            }
        });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.hyperlink_to(format!("{} View on Map", icons::MAP_PIN), &view.map_link);
        if view.has_media && ui.button(format!("{} View Media", icons::IMAGE)).clicked() {
            *open_media = true;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tooltip_offset_from_cursor() {
        let pos = tooltip_position(Vec2::new(100.0, 100.0), Vec2::new(240.0, 210.0), Vec2::new(1280.0, 720.0));
        assert_eq!(pos, Vec2::new(110.0, 110.0));
    }

    #[test]
    fn test_tooltip_clamped_to_screen() {
        let pos = tooltip_position(Vec2::new(1270.0, 710.0), Vec2::new(240.0, 210.0), Vec2::new(1280.0, 720.0));
        assert_eq!(pos, Vec2::new(1040.0, 510.0));
    }

    #[test]
    fn test_tooltip_on_tiny_screen() {
        let pos = tooltip_position(Vec2::new(50.0, 50.0), Vec2::new(240.0, 210.0), Vec2::new(100.0, 100.0));
        assert_eq!(pos, Vec2::ZERO);
    }
}
