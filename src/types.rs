//! Core geographic types and constants shared by the viewer.

/// Radius of the rendered globe in render units.
pub const GLOBE_RADIUS: f32 = 100.0;

/// Altitude of marker columns as a fraction of the globe radius.
pub const POINT_ALTITUDE: f32 = 0.1;

/// Peak altitude of entry trail arcs as a fraction of the globe radius.
pub const ARC_ALTITUDE: f32 = 0.3;

/// Altitude of the atmosphere shell as a fraction of the globe radius.
pub const ATMOSPHERE_ALTITUDE: f32 = 0.1;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in radians.
    pub fn lat_rad(&self) -> f64 {
        self.lat.to_radians()
    }

    /// Longitude in radians.
    pub fn lng_rad(&self) -> f64 {
        self.lng.to_radians()
    }
}

/// An sRGB color parsed from a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Parse `#rrggbb`. Returns `None` for anything else.
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Convert to a Bevy color.
    pub fn to_bevy(self) -> bevy::color::Color {
        bevy::color::Color::srgb_u8(self.r, self.g, self.b)
    }

    /// Convert to an egui color.
    pub fn to_egui(self) -> bevy_egui::egui::Color32 {
        bevy_egui::egui::Color32::from_rgb(self.r, self.g, self.b)
    }
}
