//! Meteor Globe
//!
//! A desktop and browser application plotting recent meteor and fireball
//! events on a 3D globe.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use meteor_globe::camera::CameraPlugin;
use meteor_globe::pipeline::PipelinePlugin;
use meteor_globe::polling::PollingPlugin;
use meteor_globe::render::RenderPlugin;
use meteor_globe::settings::ViewerSettings;
use meteor_globe::ui::UiPlugin;

fn main() {
    let settings = ViewerSettings::from_env();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Meteor Globe".to_string(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        // Insert settings before plugins that read them at startup
        .insert_resource(settings)
        .add_plugins((PipelinePlugin, PollingPlugin, CameraPlugin, RenderPlugin, UiPlugin))
        .run();
}
