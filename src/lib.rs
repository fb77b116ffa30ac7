//! Meteor Globe - interactive 3D viewer for meteor and fireball events
//!
//! A library crate exposing the data model, backend client, fetch pipeline
//! and Bevy plugins for testing and integration purposes.

pub mod camera;
pub mod client;
pub mod error;
pub mod geometry;
pub mod meteor;
pub mod notice;
pub mod pipeline;
pub mod polling;
pub mod query;
pub mod render;
pub mod settings;
pub mod types;
pub mod ui;
pub mod view;

#[cfg(test)]
pub mod test_utils;
