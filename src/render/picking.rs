//! Hover picking and highlighting for meteor markers.
//!
//! Markers are picked in screen space: every marker on the camera-facing
//! hemisphere is projected to the viewport and the closest one within a few
//! pixels of the cursor wins.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::camera::MainCamera;
use crate::geometry::{to_globe_position, unit_vector};
use crate::meteor::RenderPoint;
use crate::pipeline::MeteorPipeline;
use crate::render::markers::{footprint_radius, marker_height};
use crate::render::palette;
use crate::types::{GLOBE_RADIUS, POINT_ALTITUDE};
use crate::view::GalleryState;

/// Pick radius around a projected marker, in logical pixels.
pub const PICK_RADIUS_PX: f32 = 12.0;

/// The marker currently under the cursor, if any.
#[derive(Resource, Debug, Default)]
pub struct HoveredMeteor {
    /// Index into the dataset's points.
    pub index: Option<usize>,
    /// Dataset generation the index refers to.
    pub generation: u64,
    /// Cursor position when the hover started; the tooltip hangs off it.
    pub anchor: Vec2,
    /// Set by the tooltip while the pointer is over it, so the hover
    /// survives the pointer leaving the marker for the card.
    pub over_tooltip: bool,
}

impl HoveredMeteor {
    pub fn clear(&mut self) {
        self.index = None;
        self.over_tooltip = false;
    }

    /// The hovered point, provided it still belongs to the shown dataset.
    pub fn point<'a>(&self, pipeline: &'a MeteorPipeline) -> Option<&'a RenderPoint> {
        let dataset = pipeline.dataset();
        if dataset.generation() != self.generation {
            return None;
        }
        dataset.points().get(self.index?)
    }
}

/// Tip of a marker column in render coordinates.
pub fn marker_tip(point: &RenderPoint) -> Vec3 {
    to_globe_position(point.impact(), GLOBE_RADIUS, POINT_ALTITUDE)
}

/// Whether a surface position faces a camera at `camera_pos`.
pub fn faces_camera(position: Vec3, camera_pos: Vec3) -> bool {
    position.normalize_or_zero().dot(camera_pos - position) > 0.0
}

/// Closest candidate to `cursor` within `radius` pixels.
pub fn pick_nearest(
    candidates: impl IntoIterator<Item = (usize, Vec2)>,
    cursor: Vec2,
    radius: f32,
) -> Option<usize> {
    candidates
        .into_iter()
        .map(|(index, screen)| (index, screen.distance(cursor)))
        .filter(|&(_, d)| d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

/// Screen positions of all camera-facing markers.
pub fn visible_markers(
    points: &[RenderPoint],
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Vec<(usize, Vec2)> {
    let camera_pos = camera_transform.translation();
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let tip = marker_tip(point);
            if !faces_camera(tip, camera_pos) {
                return None;
            }
            camera
                .world_to_viewport(camera_transform, tip)
                .ok()
                .map(|screen| (index, screen))
        })
        .collect()
}

/// Find the marker under the cursor.
pub fn detect_hover(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    pipeline: Res<MeteorPipeline>,
    mut hovered: ResMut<HoveredMeteor>,
    gallery: Res<GalleryState>,
) {
    let generation = pipeline.dataset().generation();
    if hovered.generation != generation {
        hovered.clear();
        hovered.generation = generation;
    }

    // The modal covers the globe.
    if gallery.is_open() {
        hovered.clear();
        return;
    }

    if hovered.over_tooltip && hovered.index.is_some() {
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };

    let Some(cursor_pos) = window.cursor_position() else {
        hovered.clear();
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let candidates = visible_markers(pipeline.dataset().points(), camera, camera_transform);
    let picked = pick_nearest(candidates, cursor_pos, PICK_RADIUS_PX);

    if picked.is_some() && picked != hovered.index {
        hovered.anchor = cursor_pos;
    }
    hovered.index = picked;
}

/// Clicking a hovered marker with media opens the gallery.
pub fn open_gallery_on_click(
    mut contexts: EguiContexts,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    pipeline: Res<MeteorPipeline>,
    hovered: Res<HoveredMeteor>,
    mut gallery: ResMut<GalleryState>,
) {
    if !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_pointer_input()
    {
        return;
    }
    if let Some(point) = hovered.point(&pipeline)
        && point.event.has_media()
    {
        info!("Opening media gallery for {:?}", point.event.id);
        gallery.open(&point.event);
    }
}

/// Ring points around `center` in the plane perpendicular to `normal`.
pub fn ring_points(center: Vec3, normal: Vec3, radius: f32, segments: usize) -> Vec<Vec3> {
    let rotation = Quat::from_rotation_arc(Vec3::Y, normal.normalize_or(Vec3::Y));
    (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + rotation * Vec3::new(radius * t.cos(), 0.0, radius * t.sin())
        })
        .collect()
}

/// Draw a highlight ring around the hovered marker's base.
pub fn draw_highlight(mut gizmos: Gizmos, hovered: Res<HoveredMeteor>, pipeline: Res<MeteorPipeline>) {
    let Some(point) = hovered.point(&pipeline) else {
        return;
    };

    let normal = unit_vector(point.impact()).as_vec3();
    let center = normal * (GLOBE_RADIUS + marker_height() * 0.05);
    let ring_radius = footprint_radius(point.radius).max(0.4) * 2.0;

    gizmos.linestrip(ring_points(center, normal, ring_radius, 32), palette::HIGHLIGHT);
}
