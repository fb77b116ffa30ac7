//! Notice banner for fetch errors and empty results.
//!
//! Slides below the control bar without blocking the globe. The banner
//! fades as its lifetime runs out and can be dismissed early.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::notice::{Notice, NoticeKind};
use crate::pipeline::MeteorPipeline;

use super::icons;

/// Colors for banners.
mod colors {
    use bevy_egui::egui::Color32;

    pub const ERROR_BG: Color32 = Color32::from_rgba_premultiplied(80, 30, 30, 240);
    pub const ERROR_BORDER: Color32 = Color32::from_rgb(224, 85, 85);
    pub const INFO_BG: Color32 = Color32::from_rgba_premultiplied(30, 50, 80, 240);
    pub const INFO_BORDER: Color32 = Color32::from_rgb(85, 153, 221);
    pub const TEXT: Color32 = Color32::from_rgb(235, 235, 240);
}

const BANNER_WIDTH: f32 = 420.0;
const BANNER_TOP: f32 = super::controls::BAR_HEIGHT + 12.0;

/// Icon, background and border for a notice kind.
pub fn notice_style(kind: NoticeKind) -> (&'static str, egui::Color32, egui::Color32) {
    match kind {
        NoticeKind::Error => (icons::WARNING, colors::ERROR_BG, colors::ERROR_BORDER),
        NoticeKind::NoData => (icons::INFO, colors::INFO_BG, colors::INFO_BORDER),
    }
}

/// System to render the current notice, if any.
pub fn notice_system(mut contexts: EguiContexts, mut pipeline: ResMut<MeteorPipeline>) {
    let Some(notice) = pipeline.notice().cloned() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    if render_notice(ctx, &notice) {
        debug!("Notice dismissed: {}", notice.message);
        pipeline.dismiss_notice();
    }
}

/// Draw the banner. Returns true when the dismiss button was clicked.
fn render_notice(ctx: &egui::Context, notice: &Notice) -> bool {
    let (icon, bg, border) = notice_style(notice.kind);
    // Fade over the last fifth of the lifetime.
    let opacity = (notice.remaining_fraction() * 5.0).clamp(0.0, 1.0);
    let x = (ctx.screen_rect().center().x - BANNER_WIDTH / 2.0).max(0.0);
    let mut dismissed = false;

    egui::Area::new(egui::Id::new("notice_banner"))
        .fixed_pos(egui::pos2(x, BANNER_TOP))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            ui.set_opacity(opacity);
            egui::Frame::new()
                .fill(bg)
                .stroke(egui::Stroke::new(1.5, border))
                .corner_radius(6)
                .inner_margin(egui::Margin::symmetric(14, 10))
                .show(ui, |ui| {
                    ui.set_width(BANNER_WIDTH - 28.0);
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(icon).size(18.0).color(border));
                        ui.label(egui::RichText::new(&notice.message).size(14.0).color(colors::TEXT));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui
                                .add(egui::Button::new(egui::RichText::new(icons::CLOSE).size(14.0)).frame(false))
                                .on_hover_text("Dismiss")
                                .clicked()
                            {
                                dismissed = true;
                            }
                        });
                    });
                });
        });

    dismissed
}
