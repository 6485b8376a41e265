//! Scene configuration.
//!
//! Every tunable of the scene lives in [`SceneConfig`]. The defaults
//! reproduce the shipped look; `run` takes the whole struct so a caller can
//! override any of them before start-up.

use std::f32::consts::FRAC_PI_2;

use anyhow::Context;

use crate::{
    data_structures::{color::Color, particles::{FIREFLY_COUNT, ParticleBounds}},
    materials::MaterialRules,
    transition::FadeTimings,
    viewport::DEFAULT_MAX_PIXEL_RATIO,
};

#[derive(Clone, Debug, PartialEq)]
pub struct AssetPaths {
    /// Directory the relative paths are resolved against when running natively.
    pub assets_root: String,
    pub model: String,
    pub baked_texture: String,
    /// Where a Draco decoder would be served from. Draco decoding is not
    /// built in, so this only names the location in the refusal message.
    pub decoder_path: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            assets_root: "assets".to_string(),
            model: "models/baked/portal.glb".to_string(),
            baked_texture: "models/baked/baking-final.jpg".to_string(),
            decoder_path: "draco/".to_string(),
        }
    }
}

/// Colours exposed in the debug panel, as `#rrggbb` strings.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub clear_color: String,
    pub portal_color_start: String,
    pub portal_color_end: String,
    pub point_light: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            clear_color: "#191b1f".to_string(),
            portal_color_start: "#383838".to_string(),
            portal_color_end: "#b4b4fe".to_string(),
            point_light: "#ffffe5".to_string(),
        }
    }
}

/// The palette parsed to linear colours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedPalette {
    pub clear_color: Color,
    pub portal_color_start: Color,
    pub portal_color_end: Color,
    pub point_light: Color,
}

impl Palette {
    pub fn resolve(&self) -> anyhow::Result<ResolvedPalette> {
        Ok(ResolvedPalette {
            clear_color: Color::from_hex(&self.clear_color).context("clear colour")?,
            portal_color_start: Color::from_hex(&self.portal_color_start)
                .context("portal start colour")?,
            portal_color_end: Color::from_hex(&self.portal_color_end)
                .context("portal end colour")?,
            point_light: Color::from_hex(&self.point_light).context("point light colour")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_y: cgmath::Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub position: cgmath::Point3<f32>,
    pub target: cgmath::Point3<f32>,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub enable_zoom: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y: cgmath::Deg(75.0),
            near: 0.1,
            far: 100.0,
            position: cgmath::Point3::new(8.0, 8.0, -8.0),
            target: cgmath::Point3::new(0.0, 0.0, 0.0),
            damping_factor: 0.05,
            rotate_speed: 1.0,
            enable_zoom: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FireflyConfig {
    pub count: usize,
    pub bounds: ParticleBounds,
    /// World-space sprite size.
    pub size: f32,
    pub color: String,
}

impl Default for FireflyConfig {
    fn default() -> Self {
        Self {
            count: FIREFLY_COUNT,
            bounds: ParticleBounds::default(),
            size: 0.1,
            color: "#ffd700".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoxConfig {
    pub size: [f32; 3],
    pub position: [f32; 3],
}

impl Default for BoxConfig {
    fn default() -> Self {
        Self {
            size: [10.0, 0.5, 10.0],
            position: [0.0, -0.25, -0.2],
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelPlacement {
    pub scale: f32,
    pub yaw: cgmath::Rad<f32>,
}

impl Default for ModelPlacement {
    fn default() -> Self {
        Self {
            scale: 2.5,
            yaw: cgmath::Rad(FRAC_PI_2),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub assets: AssetPaths,
    pub palette: Palette,
    pub camera: CameraConfig,
    pub fireflies: FireflyConfig,
    pub test_box: BoxConfig,
    pub model: ModelPlacement,
    pub materials: MaterialRules,
    pub fade: FadeTimings,
    pub max_pixel_ratio: f64,
    pub sample_count: u32,
    /// Element id of the canvas to render into (web only).
    pub canvas_id: String,
    /// CSS selector of the loading bar element (web only).
    pub loading_bar_selector: String,
    pub title: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            assets: AssetPaths::default(),
            palette: Palette::default(),
            camera: CameraConfig::default(),
            fireflies: FireflyConfig::default(),
            test_box: BoxConfig::default(),
            model: ModelPlacement::default(),
            materials: MaterialRules::default(),
            fade: FadeTimings::default(),
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            sample_count: 4,
            canvas_id: "canvas".to_string(),
            loading_bar_selector: ".loading-bar".to_string(),
            title: "Portal".to_string(),
        }
    }
}
