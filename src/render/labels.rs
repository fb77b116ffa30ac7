//! Marker label glyphs drawn with egui.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::camera::MainCamera;
use crate::pipeline::MeteorPipeline;
use crate::render::picking::visible_markers;

/// Offset of the glyph from the projected marker tip, in pixels.
const LABEL_OFFSET: f32 = 8.0;

const LABEL_SIZE: f32 = 14.0;

/// Draw each visible marker's label glyph next to it.
pub fn draw_marker_labels(
    mut contexts: EguiContexts,
    pipeline: Res<MeteorPipeline>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    let points = pipeline.dataset().points();
    if points.is_empty() {
        return;
    }
    let Ok((camera, camera_transform)) = camera.single() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let visible = visible_markers(points, camera, camera_transform);

    egui::Area::new(egui::Id::new("marker_labels"))
        .fixed_pos(egui::pos2(0.0, 0.0))
        .order(egui::Order::Background)
        .interactable(false)
        .show(ctx, |ui| {
            let painter = ui.painter();
            for (index, screen_pos) in visible {
                let point = &points[index];
                painter.text(
                    egui::pos2(screen_pos.x + LABEL_OFFSET, screen_pos.y - LABEL_OFFSET),
                    egui::Align2::LEFT_BOTTOM,
                    point.label,
                    egui::FontId::proportional(LABEL_SIZE),
                    point.color.to_egui(),
                );
            }
        });
}
