//! Named shader uniforms.
//!
//! Each shader material owns a small set of named values. The per-frame
//! update, the debug panel and the fade transition all write through these
//! sets; the GPU copy is refreshed from them once per frame via `to_raw`.

use anyhow::bail;

use crate::data_structures::color::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Color(Color),
}

/// Lookup and last-write-wins update of uniforms by their shader name.
pub trait UniformSet {
    fn names(&self) -> &'static [&'static str];

    fn get(&self, name: &str) -> Option<UniformValue>;

    fn set(&mut self, name: &str, value: UniformValue) -> anyhow::Result<()>;

    fn has(&self, name: &str) -> bool {
        self.names().contains(&name)
    }
}

fn expect_float(set: &str, name: &str, value: UniformValue) -> anyhow::Result<f32> {
    match value {
        UniformValue::Float(v) => Ok(v),
        other => bail!("{set}.{name} expects a float, got {:?}", other),
    }
}

fn expect_color(set: &str, name: &str, value: UniformValue) -> anyhow::Result<Color> {
    match value {
        UniformValue::Color(c) => Ok(c),
        other => bail!("{set}.{name} expects a colour, got {:?}", other),
    }
}

/// Uniforms of the animated portal surface.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalUniforms {
    pub time: f32,
    pub color_start: Color,
    pub color_end: Color,
}

impl PortalUniforms {
    pub const NAMES: &'static [&'static str] = &["uTime", "uColorStart", "uColorEnd"];

    pub fn new(color_start: Color, color_end: Color) -> Self {
        Self {
            time: 0.0,
            color_start,
            color_end,
        }
    }

    pub fn to_raw(&self) -> PortalUniformRaw {
        PortalUniformRaw {
            color_start: self.color_start.to_array(),
            time: self.time,
            color_end: self.color_end.to_array(),
            _padding: 0.0,
        }
    }
}

impl UniformSet for PortalUniforms {
    fn names(&self) -> &'static [&'static str] {
        Self::NAMES
    }

    fn get(&self, name: &str) -> Option<UniformValue> {
        match name {
            "uTime" => Some(UniformValue::Float(self.time)),
            "uColorStart" => Some(UniformValue::Color(self.color_start)),
            "uColorEnd" => Some(UniformValue::Color(self.color_end)),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: UniformValue) -> anyhow::Result<()> {
        match name {
            "uTime" => self.time = expect_float("portal", name, value)?,
            "uColorStart" => self.color_start = expect_color("portal", name, value)?,
            "uColorEnd" => self.color_end = expect_color("portal", name, value)?,
            _ => bail!("portal material has no uniform {:?}", name),
        }
        Ok(())
    }
}

/// Uniforms of the firefly point sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct FireflyUniforms {
    pub time: f32,
    pub size: f32,
    pub color: Color,
}

impl FireflyUniforms {
    pub const NAMES: &'static [&'static str] = &["uTime", "uSize", "uColor"];

    pub fn new(size: f32, color: Color) -> Self {
        Self {
            time: 0.0,
            size,
            color,
        }
    }

    pub fn to_raw(&self) -> FireflyUniformRaw {
        FireflyUniformRaw {
            color: self.color.to_rgba(1.0),
            time: self.time,
            size: self.size,
            _padding: [0.0; 2],
        }
    }
}

impl UniformSet for FireflyUniforms {
    fn names(&self) -> &'static [&'static str] {
        Self::NAMES
    }

    fn get(&self, name: &str) -> Option<UniformValue> {
        match name {
            "uTime" => Some(UniformValue::Float(self.time)),
            "uSize" => Some(UniformValue::Float(self.size)),
            "uColor" => Some(UniformValue::Color(self.color)),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: UniformValue) -> anyhow::Result<()> {
        match name {
            "uTime" => self.time = expect_float("fireflies", name, value)?,
            "uSize" => self.size = expect_float("fireflies", name, value)?,
            "uColor" => self.color = expect_color("fireflies", name, value)?,
            _ => bail!("firefly material has no uniform {:?}", name),
        }
        Ok(())
    }
}

/// Uniforms of the full-screen loading overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayUniforms {
    pub alpha: f32,
}

impl OverlayUniforms {
    pub const NAMES: &'static [&'static str] = &["uAlpha"];

    pub fn opaque() -> Self {
        Self { alpha: 1.0 }
    }

    pub fn to_raw(&self) -> OverlayUniformRaw {
        OverlayUniformRaw {
            alpha: self.alpha,
            _padding: [0.0; 3],
        }
    }
}

impl UniformSet for OverlayUniforms {
    fn names(&self) -> &'static [&'static str] {
        Self::NAMES
    }

    fn get(&self, name: &str) -> Option<UniformValue> {
        match name {
            "uAlpha" => Some(UniformValue::Float(self.alpha)),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: UniformValue) -> anyhow::Result<()> {
        match name {
            "uAlpha" => self.alpha = expect_float("overlay", name, value)?,
            _ => bail!("overlay material has no uniform {:?}", name),
        }
        Ok(())
    }
}

// Uniform buffers require 16 byte (4 float) alignment; the padding fields keep
// these structs in step with the WGSL declarations.

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PortalUniformRaw {
    color_start: [f32; 3],
    time: f32,
    color_end: [f32; 3],
    _padding: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FireflyUniformRaw {
    color: [f32; 4],
    time: f32,
    size: f32,
    _padding: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OverlayUniformRaw {
    alpha: f32,
    _padding: [f32; 3],
}

/// Flat colour material (point lights, test box, unmatched glTF meshes).
/// The colour is tone mapped on upload.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorUniformRaw {
    color: [f32; 4],
}

impl ColorUniformRaw {
    pub fn color(&self) -> [f32; 4] {
        self.color
    }
}

impl From<Color> for ColorUniformRaw {
    fn from(c: Color) -> Self {
        Self {
            color: c.neutral_tone_mapped().to_rgba(1.0),
        }
    }
}

impl From<[f32; 4]> for ColorUniformRaw {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self {
            color: Color::new(r, g, b).neutral_tone_mapped().to_rgba(a),
        }
    }
}
