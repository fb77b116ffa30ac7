//! The globe: Earth-textured sphere, atmosphere shell and a graticule.
//!
//! The sphere starts out ocean blue and switches to the equirectangular Earth
//! image once it has loaded. A missing or broken image leaves it ocean blue.

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::geometry::{to_globe_position, unit_vector};
use crate::render::palette;
use crate::settings::ViewerSettings;
use crate::types::{ATMOSPHERE_ALTITUDE, GLOBE_RADIUS, GeoPoint};

/// Longitude divisions of the globe mesh.
const GLOBE_SECTORS: u32 = 96;

/// Latitude divisions of the globe mesh.
const GLOBE_STACKS: u32 = 48;

/// Degrees between graticule lines.
pub const GRATICULE_STEP_DEG: f64 = 30.0;

/// Segments per graticule line.
const GRATICULE_SEGMENTS: usize = 72;

/// Lift of the graticule above the surface so it doesn't z-fight the sphere.
const GRATICULE_ALTITUDE: f32 = 0.002;

/// Plugin spawning the globe.
pub struct GlobePlugin;

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Graticule::new(GRATICULE_STEP_DEG, GRATICULE_SEGMENTS))
            .add_systems(Startup, spawn_globe)
            .add_systems(Update, (apply_globe_texture, draw_graticule));
    }
}

/// Marker component for the globe sphere.
#[derive(Component)]
pub struct Globe;

/// Marker component for the atmosphere shell.
#[derive(Component)]
pub struct Atmosphere;

/// Precomputed graticule polylines.
#[derive(Resource, Debug, Default)]
pub struct Graticule {
    pub lines: Vec<Vec<Vec3>>,
}

impl Graticule {
    /// Parallels and meridians every `step_deg` degrees.
    ///
    /// The poles themselves are skipped; meridians run pole to pole.
    pub fn new(step_deg: f64, segments: usize) -> Self {
        let mut lines = Vec::new();
        let steps = (180.0 / step_deg).round() as i32;

        for i in 1..steps {
            let lat = -90.0 + i as f64 * step_deg;
            lines.push(
                (0..=segments)
                    .map(|s| {
                        let lng = -180.0 + 360.0 * s as f64 / segments as f64;
                        to_globe_position(GeoPoint::new(lat, lng), GLOBE_RADIUS, GRATICULE_ALTITUDE)
                    })
                    .collect(),
            );
        }

        for i in 0..steps * 2 {
            let lng = -180.0 + i as f64 * step_deg;
            lines.push(
                (0..=segments)
                    .map(|s| {
                        let lat = -90.0 + 180.0 * s as f64 / segments as f64;
                        to_globe_position(GeoPoint::new(lat, lng), GLOBE_RADIUS, GRATICULE_ALTITUDE)
                    })
                    .collect(),
            );
        }

        Self { lines }
    }
}

/// Texture coordinates of `point` in an equirectangular image.
///
/// u runs west to east from longitude -180; v runs north to south.
pub fn globe_uv(point: GeoPoint) -> [f32; 2] {
    [
        ((point.lng + 180.0) / 360.0) as f32,
        ((90.0 - point.lat) / 180.0) as f32,
    ]
}

/// Latitude/longitude sphere whose UVs line up with [`to_globe_position`].
///
/// The seam at ±180° gets its own column of vertices so the texture wraps
/// cleanly.
pub fn globe_mesh(radius: f32, sectors: u32, stacks: u32) -> Mesh {
    let (sectors, stacks) = (sectors.max(3), stacks.max(2));
    let columns = sectors + 1;
    let vertex_count = (columns * (stacks + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for i in 0..=stacks {
        let lat = 90.0 - 180.0 * i as f64 / stacks as f64;
        for j in 0..=sectors {
            let point = GeoPoint::new(lat, -180.0 + 360.0 * j as f64 / sectors as f64);
            positions.push(to_globe_position(point, radius, 0.0).to_array());
            normals.push(unit_vector(point).as_vec3().to_array());
            uvs.push(globe_uv(point));
        }
    }

    let mut indices = Vec::with_capacity((sectors * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..sectors {
            let top = i * columns + j;
            let bottom = top + columns;
            if i != 0 {
                indices.extend([top, bottom, top + 1]);
            }
            if i != stacks - 1 {
                indices.extend([top + 1, bottom, bottom + 1]);
            }
        }
    }

    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_indices(Indices::U32(indices))
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
}

/// The Earth image and the material waiting for it.
#[derive(Resource, Debug)]
pub struct GlobeTexture {
    pub image: Handle<Image>,
    pub material: Handle<StandardMaterial>,
}

/// Show `image` on the globe material in its own colors.
pub fn apply_texture(material: &mut StandardMaterial, image: Handle<Image>) {
    material.base_color = Color::WHITE;
    material.base_color_texture = Some(image);
}

fn spawn_globe(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<ViewerSettings>,
) {
    // The texture is attached only once loaded; until then the ocean color shows.
    let material = materials.add(StandardMaterial {
        base_color: palette::OCEAN,
        perceptual_roughness: 0.8,
        ..default()
    });
    commands.spawn((
        Mesh3d(meshes.add(globe_mesh(GLOBE_RADIUS, GLOBE_SECTORS, GLOBE_STACKS))),
        MeshMaterial3d(material.clone()),
        Transform::IDENTITY,
        Globe,
    ));

    if settings.globe_texture.is_empty() {
        info!("No globe texture configured");
    } else {
        debug!("Loading globe texture {}", settings.globe_texture);
        commands.insert_resource(GlobeTexture {
            image: asset_server.load(settings.globe_texture.clone()),
            material,
        });
    }

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(GLOBE_RADIUS * (1.0 + ATMOSPHERE_ALTITUDE)).mesh().uv(96, 48))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: palette::ATMOSPHERE,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::IDENTITY,
        Atmosphere,
    ));

    info!("Globe spawned (radius {})", GLOBE_RADIUS);
}

/// Put the Earth image on the globe once it is available.
fn apply_globe_texture(
    mut commands: Commands,
    texture: Option<Res<GlobeTexture>>,
    asset_server: Res<AssetServer>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(texture) = texture else {
        return;
    };
    match asset_server.load_state(texture.image.id()) {
        LoadState::Loaded => {
            if let Some(material) = materials.get_mut(texture.material.id()) {
                apply_texture(material, texture.image.clone());
                info!("Globe texture applied");
            }
        }
        LoadState::Failed(error) => {
            warn!("Globe texture unavailable, keeping plain ocean: {}", error);
        }
        LoadState::NotLoaded | LoadState::Loading => return,
    }
    commands.remove_resource::<GlobeTexture>();
}

fn draw_graticule(mut gizmos: Gizmos, graticule: Res<Graticule>) {
    for line in &graticule.lines {
        gizmos.linestrip(line.iter().copied(), palette::GRATICULE);
    }
}
