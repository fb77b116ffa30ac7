//! Starfield behind the globe.

use bevy::prelude::*;
use rand::Rng;

use crate::render::palette;
use crate::types::GLOBE_RADIUS;

/// Number of background stars.
const STAR_COUNT: usize = 800;

/// Radius of the shell the stars sit on.
const STAR_SHELL_RADIUS: f32 = GLOBE_RADIUS * 15.0;

/// Plugin providing background visual elements.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_starfield);
    }
}

/// Uniformly distributed direction on the unit sphere.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let y: f32 = rng.gen_range(-1.0..1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - y * y).sqrt();
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Spawn stars scattered over a large shell around the globe.
fn spawn_starfield(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let star_material = materials.add(StandardMaterial {
        base_color: palette::STAR,
        emissive: LinearRgba::WHITE * 0.5,
        unlit: true,
        ..default()
    });
    let star_mesh = meshes.add(Sphere::new(1.5));

    let mut rng = rand::thread_rng();
    for _ in 0..STAR_COUNT {
        let position = random_direction(&mut rng) * STAR_SHELL_RADIUS;
        let scale = rng.gen_range(0.5..1.5);

        commands.spawn((
            Mesh3d(star_mesh.clone()),
            MeshMaterial3d(star_material.clone()),
            Transform::from_translation(position).with_scale(Vec3::splat(scale)),
        ));
    }

    info!("Spawned {} background stars", STAR_COUNT);
}
