//! Meteor markers and their animated entry trails.
//!
//! Markers are plain entities rebuilt wholesale whenever the dataset
//! generation changes. Trails are drawn every frame with gizmos from paths
//! cached at the same moment.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::geometry::{arc_path, unit_vector};
use crate::meteor::Severity;
use crate::pipeline::MeteorPipeline;
use crate::types::{ARC_ALTITUDE, GLOBE_RADIUS, GeoPoint, POINT_ALTITUDE};

/// Samples per trail arc.
pub const ARC_SEGMENTS: usize = 64;

/// Dash length as a fraction of the arc.
pub const DASH_LENGTH: f32 = 0.4;

/// Gap between dashes as a fraction of the arc.
pub const DASH_GAP: f32 = 0.2;

/// Seconds for the dash pattern to travel the whole arc.
pub const DASH_PERIOD_SECS: f32 = 2.0;

/// A marker standing on the globe for one dataset point.
#[derive(Component, Debug)]
pub struct MeteorMarker {
    /// Index into the dataset's points.
    pub index: usize,
}

/// Trail paths for the current dataset, in render coordinates.
#[derive(Resource, Debug, Default)]
pub struct ArcPaths {
    pub generation: Option<u64>,
    pub paths: Vec<(Vec<Vec3>, Color)>,
}

/// Marker height in render units.
pub fn marker_height() -> f32 {
    GLOBE_RADIUS * POINT_ALTITUDE
}

/// Footprint radius in render units for a radius given in degrees of arc.
pub fn footprint_radius(radius_deg: f64) -> f32 {
    (radius_deg.to_radians() as f32) * GLOBE_RADIUS
}

/// Transform placing a column of `height` on the surface at `point`, its
/// axis along the surface normal.
pub fn marker_transform(point: GeoPoint, height: f32) -> Transform {
    let normal = unit_vector(point).as_vec3();
    Transform::from_translation(normal * (GLOBE_RADIUS + height / 2.0))
        .with_rotation(Quat::from_rotation_arc(Vec3::Y, normal))
}

/// Visible dash intervals `(t0, t1)` along an arc for animation `phase` in [0, 1).
///
/// Dashes travel from the entry point towards the impact point as the phase
/// grows.
pub fn dash_ranges(phase: f32) -> Vec<(f32, f32)> {
    let pattern = DASH_LENGTH + DASH_GAP;
    let mut start = phase.rem_euclid(pattern) - pattern;
    let mut ranges = Vec::new();
    while start < 1.0 {
        let t0 = start.max(0.0);
        let t1 = (start + DASH_LENGTH).min(1.0);
        if t1 > t0 {
            ranges.push((t0, t1));
        }
        start += pattern;
    }
    ranges
}

/// Point at fraction `t` along a uniformly sampled path.
fn point_at(path: &[Vec3], t: f32) -> Vec3 {
    let Some(last) = path.len().checked_sub(1) else {
        return Vec3::ZERO;
    };
    if last == 0 {
        return path[0];
    }
    let x = t.clamp(0.0, 1.0) * last as f32;
    let i = (x.floor() as usize).min(last - 1);
    path[i].lerp(path[i + 1], x - i as f32)
}

/// Sub-path of `path` between fractions `t0` and `t1`.
pub fn sub_path(path: &[Vec3], t0: f32, t1: f32) -> Vec<Vec3> {
    let Some(last) = path.len().checked_sub(1) else {
        return Vec::new();
    };
    let mut points = vec![point_at(path, t0)];
    for (i, p) in path.iter().enumerate() {
        let t = if last == 0 { 0.0 } else { i as f32 / last as f32 };
        if t > t0 && t < t1 {
            points.push(*p);
        }
    }
    points.push(point_at(path, t1));
    points
}

/// Rebuild markers and trail paths when the dataset changes.
pub fn sync_markers(
    mut commands: Commands,
    pipeline: Res<MeteorPipeline>,
    markers: Query<Entity, With<MeteorMarker>>,
    mut arcs: ResMut<ArcPaths>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let dataset = pipeline.dataset();
    if arcs.generation == Some(dataset.generation()) {
        return;
    }

    for entity in markers.iter() {
        commands.entity(entity).despawn();
    }

    // One mesh and material per severity band.
    let height = marker_height();
    let mut styles: HashMap<Severity, (Handle<Mesh>, Handle<StandardMaterial>)> = HashMap::new();

    for (index, point) in dataset.points().iter().enumerate() {
        let (mesh, material) = styles
            .entry(point.severity)
            .or_insert_with(|| {
                (
                    meshes.add(Cylinder::new(footprint_radius(point.radius), height)),
                    materials.add(StandardMaterial {
                        base_color: point.color.to_bevy(),
                        unlit: true,
                        ..default()
                    }),
                )
            })
            .clone();

        commands.spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            marker_transform(point.impact(), height),
            MeteorMarker { index },
        ));
    }

    arcs.paths = dataset
        .arcs()
        .iter()
        .map(|arc| {
            (
                arc_path(arc.start, arc.end, GLOBE_RADIUS, ARC_ALTITUDE, ARC_SEGMENTS),
                arc.color.to_bevy(),
            )
        })
        .collect();
    arcs.generation = Some(dataset.generation());

    debug!(
        "Rebuilt {} markers and {} trails (generation {})",
        dataset.len(),
        arcs.paths.len(),
        dataset.generation()
    );
}

/// Draw the dashed, animated trails.
pub fn draw_arcs(mut gizmos: Gizmos, time: Res<Time>, arcs: Res<ArcPaths>) {
    if arcs.paths.is_empty() {
        return;
    }
    let phase = (time.elapsed_secs() / DASH_PERIOD_SECS).fract();
    let dashes = dash_ranges(phase);

    for (path, color) in &arcs.paths {
        for &(t0, t1) in &dashes {
            gizmos.linestrip(sub_path(path, t0, t1), *color);
        }
    }
}
