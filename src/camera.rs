//! Orbit camera around the globe.
//!
//! Spins slowly on its own, rotates with a left-drag and zooms with the
//! scroll wheel. Also tracks the window size for UI placement.

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
    window::WindowResized,
};
use bevy_egui::EguiContexts;

use crate::settings::ViewerSettings;
use crate::types::GLOBE_RADIUS;

/// Closest camera distance from the globe center.
pub const MIN_DISTANCE: f32 = GLOBE_RADIUS * 1.3;

/// Furthest camera distance from the globe center.
pub const MAX_DISTANCE: f32 = GLOBE_RADIUS * 6.0;

/// Starting camera distance.
pub const DEFAULT_DISTANCE: f32 = GLOBE_RADIUS * 3.0;

/// Zoom speed multiplier for scroll wheel.
pub const ZOOM_SPEED: f32 = 0.1;

/// Pixel scroll deltas per wheel line.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Radians of rotation per dragged pixel at the default distance.
pub const ROTATE_SPEED: f32 = 0.005;

/// Pitch limit, short of the poles so `looking_at` stays well defined.
const MAX_PITCH: f32 = 1.45;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Spherical camera placement around the globe center.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Rotation about the Y axis, radians.
    pub yaw: f32,
    /// Elevation above the equatorial plane, radians.
    pub pitch: f32,
    pub distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.35,
            distance: DEFAULT_DISTANCE,
        }
    }
}

impl OrbitCamera {
    /// Camera position for the current angles.
    pub fn translation(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(Vec3::ZERO, Vec3::Y)
    }

    /// Apply a drag of `delta` pixels. Rotation slows down as the camera closes in.
    pub fn drag(&mut self, delta: Vec2) {
        let scale = ROTATE_SPEED * self.distance / DEFAULT_DISTANCE;
        self.yaw -= delta.x * scale;
        self.pitch = (self.pitch + delta.y * scale).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Logarithmic zoom by scroll amount in wheel lines.
    pub fn zoom(&mut self, scroll: f32) {
        let factor = (-scroll * ZOOM_SPEED).exp();
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance the idle spin by `angle` radians.
    pub fn spin(&mut self, angle: f32) {
        self.yaw = (self.yaw + angle).rem_euclid(std::f32::consts::TAU);
    }
}

/// Current size of the primary window in logical pixels.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct GlobeViewport {
    pub width: f32,
    pub height: f32,
}

/// Whether the user is dragging the globe this frame.
#[derive(Resource, Default)]
pub struct CameraInteraction {
    pub dragging: bool,
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GlobeViewport>()
            .init_resource::<CameraInteraction>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (
                    track_viewport,
                    (camera_drag, camera_zoom, auto_rotate, apply_orbit).chain(),
                ),
            );
    }
}

/// Spawn the perspective camera and a light that follows it.
fn setup_camera(mut commands: Commands) {
    let orbit = OrbitCamera::default();
    commands
        .spawn((
            Camera3d::default(),
            Camera {
                clear_color: ClearColorConfig::Custom(Color::BLACK),
                ..default()
            },
            // Far enough to keep the starfield shell in view at any zoom.
            Projection::from(PerspectiveProjection {
                far: 5000.0,
                ..default()
            }),
            AmbientLight {
                color: Color::WHITE,
                brightness: 300.0,
                ..default()
            },
            orbit.transform(),
            orbit,
            MainCamera,
        ))
        .with_children(|parent| {
            // Lights the hemisphere facing the viewer.
            parent.spawn((
                DirectionalLight {
                    illuminance: 4000.0,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_xyz(-0.5, 0.5, 0.0).looking_at(Vec3::new(0.0, 0.0, -1.0), Vec3::Y),
            ));
        });
}

/// Record window size changes.
pub fn track_viewport(mut resized: MessageReader<WindowResized>, mut viewport: ResMut<GlobeViewport>) {
    if let Some(event) = resized.read().last() {
        viewport.width = event.width;
        viewport.height = event.height;
        debug!("Viewport resized to {}x{}", event.width, event.height);
    }
}

fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
}

/// Left-drag rotates the globe.
fn camera_drag(
    mut contexts: EguiContexts,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mut interaction: ResMut<CameraInteraction>,
    mut camera_query: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if !mouse_buttons.pressed(MouseButton::Left) {
        interaction.dragging = false;
        return;
    }
    if mouse_buttons.just_pressed(MouseButton::Left) && egui_wants_pointer(&mut contexts) {
        return;
    }
    if !interaction.dragging && !mouse_buttons.just_pressed(MouseButton::Left) {
        return;
    }

    interaction.dragging = true;
    if mouse_motion.delta == Vec2::ZERO {
        return;
    }
    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };
    orbit.drag(mouse_motion.delta);
}

/// Scroll zooms towards the globe.
fn camera_zoom(
    mut contexts: EguiContexts,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mut camera_query: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if mouse_scroll.delta.y == 0.0 || egui_wants_pointer(&mut contexts) {
        return;
    }
    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };
    orbit.zoom(scroll_lines(mouse_scroll.delta.y, mouse_scroll.unit));
}

/// Scroll delta in wheel lines.
pub fn scroll_lines(delta: f32, unit: MouseScrollUnit) -> f32 {
    match unit {
        MouseScrollUnit::Line => delta,
        MouseScrollUnit::Pixel => delta / PIXELS_PER_LINE,
    }
}

/// Idle spin while the user isn't dragging.
fn auto_rotate(
    time: Res<Time>,
    settings: Res<ViewerSettings>,
    interaction: Res<CameraInteraction>,
    mut camera_query: Query<&mut OrbitCamera, With<MainCamera>>,
) {
    if !settings.auto_rotate || interaction.dragging {
        return;
    }
    let Ok(mut orbit) = camera_query.single_mut() else {
        return;
    };
    orbit.spin(settings.auto_rotate_speed() * time.delta_secs());
}

fn apply_orbit(mut camera_query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in camera_query.iter_mut() {
        *transform = orbit.transform();
    }
}
