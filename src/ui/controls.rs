//! Top bar with the time-range controls.
//!
//! Holds the range selector, the custom date inputs (custom mode only), the
//! Apply button, a loading spinner and the number of events shown.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::pipeline::{FetchReason, FetchRequested, MeteorPipeline, QueryControls};
use crate::polling::RealtimePoller;
use crate::query::TimeRange;

use super::icons;

/// Height of the top bar in pixels.
pub const BAR_HEIGHT: f32 = 44.0;

/// Colors for the control bar.
mod colors {
    use bevy_egui::egui::Color32;

    pub const BAR_BG: Color32 = Color32::from_rgba_premultiplied(26, 26, 36, 240);
    pub const TEXT: Color32 = Color32::from_rgb(220, 220, 230);
    pub const MUTED: Color32 = Color32::from_rgb(140, 140, 150);
    pub const LIVE: Color32 = Color32::from_rgb(85, 221, 136);
}

/// Switch the selected range.
///
/// Restarts the realtime timer as needed and returns the fetch to issue, or
/// `None` when the range didn't actually change.
pub fn change_range(
    controls: &mut QueryControls,
    poller: &mut RealtimePoller,
    range: TimeRange,
) -> Option<FetchRequested> {
    if controls.range == range {
        return None;
    }
    info!("Time range changed: {} -> {}", controls.range.wire_value(), range.wire_value());
    controls.range = range;
    poller.set_range(range);
    Some(FetchRequested {
        reason: FetchReason::RangeChanged,
    })
}

/// System that renders the control bar at the top.
pub fn controls_system(
    mut contexts: EguiContexts,
    mut controls: ResMut<QueryControls>,
    mut poller: ResMut<RealtimePoller>,
    pipeline: Res<MeteorPipeline>,
    mut requests: MessageWriter<FetchRequested>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::top("controls")
        .exact_height(BAR_HEIGHT)
        .frame(
            egui::Frame::new()
                .fill(colors::BAR_BG)
                .inner_margin(egui::Margin::symmetric(16, 8)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.spacing_mut().item_spacing.x = 12.0;

                let mut selected = controls.range;
                let icon = if selected.is_realtime() { icons::REALTIME } else { icons::CALENDAR };
                ui.label(egui::RichText::new(icon).size(18.0).color(colors::TEXT));
                egui::ComboBox::from_id_salt("time_range")
                    .selected_text(selected.label())
                    .show_ui(ui, |ui| {
                        for range in TimeRange::ALL {
                            ui.selectable_value(&mut selected, range, range.label());
                        }
                    });
                if let Some(request) = change_range(&mut controls, &mut poller, selected) {
                    requests.write(request);
                }

                if controls.range == TimeRange::Custom {
                    render_custom_inputs(ui, &mut controls, &mut requests);
                }

                if poller.is_active() {
                    ui.label(egui::RichText::new("LIVE").strong().size(12.0).color(colors::LIVE));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let count = pipeline.dataset().len();
                    ui.label(
                        egui::RichText::new(format!("{} {count} events", icons::GLOBE))
                            .size(14.0)
                            .color(colors::MUTED),
                    );
                    if pipeline.is_loading() {
                        ui.spinner();
                    }
                });
            });
        });
}

fn render_custom_inputs(
    ui: &mut egui::Ui,
    controls: &mut QueryControls,
    requests: &mut MessageWriter<FetchRequested>,
) {
    ui.label(egui::RichText::new("From").color(colors::MUTED));
    ui.add(
        egui::TextEdit::singleline(&mut controls.custom.start)
            .desired_width(90.0)
            .hint_text("YYYY-MM-DD"),
    );
    ui.label(egui::RichText::new("to").color(colors::MUTED));
    ui.add(
        egui::TextEdit::singleline(&mut controls.custom.end)
            .desired_width(90.0)
            .hint_text("YYYY-MM-DD"),
    );

    if ui.button(format!("{} Apply", icons::APPLY)).clicked() {
        info!("Applying custom range {} .. {}", controls.custom.start, controls.custom.end);
        requests.write(FetchRequested {
            reason: FetchReason::ApplyCustomRange,
        });
    }
}
