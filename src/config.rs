//! Tableau configuration.
//!
//! Every number the scene is dressed with (camera, lights, pointer response)
//! lives here with its default. The landmark layout itself is not configurable.

use std::{env, str::FromStr};

use crate::error::{Result, TableauError};

/// Which of the two scene variants is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneVariant {
    #[default]
    Base,
    /// Adds the strip decorations around the cathedral's rose window.
    Ornate,
}

impl FromStr for SceneVariant {
    type Err = TableauError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(SceneVariant::Base),
            "ornate" => Ok(SceneVariant::Ornate),
            other => Err(TableauError::invalid(
                "variant",
                format!("expected `base` or `ornate`, got `{other}`"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

/// Pointer response: target angle = offset * gain, corrected per frame by a
/// fraction of the remaining distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    pub gain: f32,
    pub yaw_rate: f32,
    pub pitch_rate: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            gain: 0.001,
            yaw_rate: 0.1,
            pitch_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightingConfig {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub key_colour: [f32; 3],
    pub key_position: [f32; 3],
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableauConfig {
    pub variant: SceneVariant,
    pub asset_root: String,
    pub tower_segments: u32,
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
    pub lighting: LightingConfig,
    /// Fully transparent so the host page shows through.
    pub clear_colour: [f64; 4],
}

impl Default for TableauConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::Base,
            asset_root: "assets".to_string(),
            tower_segments: 6,
            camera: CameraConfig {
                eye: [-7.0, 8.0, 20.0],
                target: [0.0, 0.0, 0.0],
                fovy_degrees: 45.0,
                znear: 0.1,
                zfar: 1000.0,
            },
            interaction: InteractionConfig::default(),
            lighting: LightingConfig {
                sky: hex_rgb(0xddeeff),
                ground: hex_rgb(0x202020),
                key_colour: hex_rgb(0xffffff),
                key_position: [10.0, 10.0, 10.0],
            },
            clear_colour: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

impl TableauConfig {
    /// Defaults overridden by `TABLEAU_VARIANT` and `TABLEAU_ASSETS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(variant) = env::var("TABLEAU_VARIANT") {
            config.variant = variant.parse()?;
        }
        if let Ok(root) = env::var("TABLEAU_ASSETS") {
            config.asset_root = root;
        }
        Ok(config)
    }

    pub fn with_variant(mut self, variant: SceneVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// Converts a `0xRRGGBB` colour into linear RGB.
pub fn hex_rgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variants_case_insensitively() {
        assert_eq!("base".parse::<SceneVariant>().unwrap(), SceneVariant::Base);
        assert_eq!(" Ornate ".parse::<SceneVariant>().unwrap(), SceneVariant::Ornate);
        let err = "gothic".parse::<SceneVariant>().unwrap_err();
        assert!(matches!(err, TableauError::InvalidParameter { what: "variant", .. }));
    }

    #[test]
    fn hex_colours_map_to_linear_rgb() {
        assert!(hex_rgb(0xffffff).iter().all(|c| (c - 1.0).abs() < 1e-6));
        assert_eq!(hex_rgb(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = hex_rgb(0xddeeff);
        assert!(r < g && g < b);
        assert!((b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn defaults_match_the_scene_dressing() {
        let config = TableauConfig::default();
        assert_eq!(config.camera.eye, [-7.0, 8.0, 20.0]);
        assert_eq!(config.camera.fovy_degrees, 45.0);
        assert_eq!(config.interaction.gain, 0.001);
        assert_eq!(config.tower_segments, 6);
        assert_eq!(config.clear_colour[3], 0.0);
    }
}
