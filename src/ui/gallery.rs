//! Media gallery modal.
//!
//! A dimmed backdrop over the whole window with a centered card holding the
//! Images/Videos tabs. Closes on the close button, Escape, or a click on the
//! backdrop.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::view::{GalleryState, GalleryTab, GalleryView, ImageCard, Pane, VideoCard};

use super::icons;

/// Colors for the gallery.
mod colors {
    use bevy_egui::egui::Color32;

    pub const BACKDROP: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 170);
    pub const MODAL_BG: Color32 = Color32::from_rgba_premultiplied(26, 26, 36, 250);
    pub const MODAL_BORDER: Color32 = Color32::from_rgb(60, 60, 80);
    pub const CARD_BG: Color32 = Color32::from_rgb(36, 36, 48);
    pub const TAB_ACTIVE: Color32 = Color32::from_rgb(85, 153, 221);
    pub const TAB_INACTIVE: Color32 = Color32::from_rgb(120, 120, 130);
    pub const MUTED: Color32 = Color32::from_rgb(150, 150, 165);
}

const MODAL_WIDTH: f32 = 560.0;
const MODAL_MAX_HEIGHT: f32 = 480.0;

/// What the user did with the modal this frame.
#[derive(Default)]
struct GalleryInput {
    close: bool,
    backdrop_clicked: bool,
    tab: Option<GalleryTab>,
}

/// System to render the gallery while it's open.
pub fn gallery_system(mut contexts: EguiContexts, mut gallery: ResMut<GalleryState>) {
    let Some(view) = gallery.view().cloned() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let input = render_gallery(ctx, &view, gallery.tab);

    if let Some(tab) = input.tab {
        gallery.tab = tab;
    }
    if input.close {
        debug!("Gallery closed");
        gallery.close();
    } else if input.backdrop_clicked {
        gallery.click(false);
    }
}

fn render_gallery(ctx: &egui::Context, view: &GalleryView, active: GalleryTab) -> GalleryInput {
    let mut input = GalleryInput {
        close: ctx.input(|i| i.key_pressed(egui::Key::Escape)),
        ..default()
    };
    let screen = ctx.screen_rect();

    // Backdrop: dims the scene and swallows clicks that miss the card.
    egui::Area::new(egui::Id::new("gallery_backdrop"))
        .fixed_pos(screen.min)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            ui.painter().rect_filled(screen, 0.0, colors::BACKDROP);
            let response = ui.interact(screen, egui::Id::new("gallery_backdrop_click"), egui::Sense::click());
            input.backdrop_clicked = response.clicked();
        });

    egui::Window::new("Media")
        .id(egui::Id::new("gallery_modal"))
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .fixed_size(egui::vec2(MODAL_WIDTH, MODAL_MAX_HEIGHT))
        .frame(
            egui::Frame::new()
                .fill(colors::MODAL_BG)
                .inner_margin(16)
                .stroke(egui::Stroke::new(1.0, colors::MODAL_BORDER))
                .corner_radius(6),
        )
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&view.title).strong().size(18.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::new(egui::RichText::new(icons::CLOSE).size(18.0)).frame(false))
                        .on_hover_text("Close (Esc)")
                        .clicked()
                    {
                        input.close = true;
                    }
                });
            });

            ui.horizontal(|ui| {
                for tab in GalleryTab::ALL {
                    let icon = match tab {
                        GalleryTab::Images => icons::IMAGE,
                        GalleryTab::Videos => icons::VIDEO,
                    };
                    let color = if tab == active { colors::TAB_ACTIVE } else { colors::TAB_INACTIVE };
                    let text = egui::RichText::new(format!("{icon} {}", tab.label())).size(15.0).color(color);
                    if ui.add(egui::Button::new(text).frame(false)).clicked() {
                        input.tab = Some(tab);
                    }
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| match active {
                GalleryTab::Images => render_pane(ui, &view.images, render_image_card),
                GalleryTab::Videos => render_pane(ui, &view.videos, render_video_card),
            });
        });

    input
}

fn render_pane<T>(ui: &mut egui::Ui, pane: &Pane<T>, card: fn(&mut egui::Ui, &T)) {
    match pane {
        Pane::Empty(message) => {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(*message).size(14.0).color(colors::MUTED));
            });
        }
        Pane::Cards(cards) => {
            for item in cards {
                egui::Frame::new()
                    .fill(colors::CARD_BG)
                    .corner_radius(4)
                    .inner_margin(10)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        card(ui, item);
                    });
                ui.add_space(8.0);
            }
        }
    }
}

fn render_image_card(ui: &mut egui::Ui, image: &ImageCard) {
    ui.label(egui::RichText::new(&image.title).strong().size(14.0));
    if !image.description.is_empty() {
        ui.label(egui::RichText::new(&image.description).size(13.0));
    }
    ui.label(egui::RichText::new(&image.source_line).size(12.0).color(colors::MUTED));
    ui.hyperlink_to(format!("{} Open image", icons::EXTERNAL), &image.url);
}

fn render_video_card(ui: &mut egui::Ui, video: &VideoCard) {
    ui.label(egui::RichText::new(&video.title).strong().size(14.0));
    ui.label(egui::RichText::new(&video.source_line).size(12.0).color(colors::MUTED));
    ui.horizontal(|ui| {
        if !video.thumbnail.is_empty() {
            ui.hyperlink_to(format!("{} Thumbnail", icons::IMAGE), &video.thumbnail);
        }
        ui.hyperlink_to(format!("{} Play", icons::PLAY), &video.url);
    });
}
