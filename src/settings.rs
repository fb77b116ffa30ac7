//! Runtime configuration for the viewer.

use bevy::prelude::*;

use crate::notice::DEFAULT_NOTICE_TTL_SECS;

/// Environment variable overriding the API base URL (native only).
pub const API_URL_ENV: &str = "METEOR_API_URL";

/// Environment variable overriding the realtime poll interval (native only).
pub const POLL_SECS_ENV: &str = "METEOR_POLL_SECS";

/// Environment variable overriding the globe texture asset path (native only).
pub const GLOBE_TEXTURE_ENV: &str = "METEOR_GLOBE_TEXTURE";

/// Equirectangular Earth image, relative to the `assets/` directory.
pub const DEFAULT_GLOBE_TEXTURE: &str = "textures/earth/earth_2k.jpg";

/// Default realtime poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: f32 = 60.0;

/// Longest accepted realtime poll interval (one day).
pub const MAX_POLL_INTERVAL_SECS: f32 = 86_400.0;

/// Viewer configuration.
#[derive(Resource, Clone, Debug)]
pub struct ViewerSettings {
    /// Prefix for backend URLs. Empty means same-origin.
    pub api_base_url: String,
    /// Seconds between fetches in realtime mode.
    pub poll_interval_secs: f32,
    /// Lifetime of error and no-data notices.
    pub notice_ttl_secs: f32,
    /// Whether the camera spins on its own while idle.
    pub auto_rotate: bool,
    /// Seconds per full auto-rotation.
    pub auto_rotate_period_secs: f32,
    /// Earth image asset path. Empty keeps the plain ocean sphere.
    pub globe_texture: String,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url().to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            notice_ttl_secs: DEFAULT_NOTICE_TTL_SECS,
            auto_rotate: true,
            auto_rotate_period_secs: 120.0,
            globe_texture: DEFAULT_GLOBE_TEXTURE.to_string(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_api_base_url() -> &'static str {
    "http://localhost:8080"
}

#[cfg(target_arch = "wasm32")]
fn default_api_base_url() -> &'static str {
    ""
}

impl ViewerSettings {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let settings = Self::default();
        #[cfg(not(target_arch = "wasm32"))]
        let settings = settings
            .with_overrides(
                std::env::var(API_URL_ENV).ok().as_deref(),
                std::env::var(POLL_SECS_ENV).ok().as_deref(),
            )
            .with_globe_texture(std::env::var(GLOBE_TEXTURE_ENV).ok().as_deref());
        settings
    }

    /// Apply override values as read from the environment.
    ///
    /// Poll intervals that don't parse, aren't finite, or fall outside
    /// `(0, MAX_POLL_INTERVAL_SECS]` are ignored.
    pub fn with_overrides(mut self, api_url: Option<&str>, poll_secs: Option<&str>) -> Self {
        if let Some(url) = api_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.api_base_url = url.to_string();
        }
        if let Some(raw) = poll_secs {
            match raw.trim().parse::<f32>() {
                Ok(secs) if secs.is_finite() && secs > 0.0 && secs <= MAX_POLL_INTERVAL_SECS => {
                    self.poll_interval_secs = secs;
                }
                _ => warn!("Ignoring invalid {}={:?}", POLL_SECS_ENV, raw),
            }
        }
        self
    }

    /// Replace the globe texture path; an empty value disables the texture.
    pub fn with_globe_texture(mut self, path: Option<&str>) -> Self {
        if let Some(path) = path {
            self.globe_texture = path.trim().to_string();
        }
        self
    }

    /// Auto-rotation speed in radians per second.
    pub fn auto_rotate_speed(&self) -> f32 {
        if self.auto_rotate_period_secs <= 0.0 {
            return 0.0;
        }
        std::f32::consts::TAU / self.auto_rotate_period_secs
    }
}
