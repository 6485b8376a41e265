//! Colours as they travel between the debug panel, uniforms and the clear colour.
//!
//! Colours are authored as sRGB hex strings (`#rrggbb`, the colour-picker
//! format) and stored in linear space, which is what the shaders and the sRGB
//! surface expect.

use anyhow::{Context, bail};

/// A linear-space RGB colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional) and convert to linear.
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            bail!("expected a colour in #rrggbb form, got {:?}", hex);
        }
        let channel = |range: std::ops::Range<usize>| -> anyhow::Result<f32> {
            let byte = u8::from_str_radix(&digits[range], 16)
                .with_context(|| format!("invalid hex digits in colour {:?}", hex))?;
            Ok(srgb_to_linear(byte as f32 / 255.0))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Hex form (sRGB), as shown in a colour picker.
    pub fn to_hex(&self) -> String {
        let to_byte = |c: f32| (linear_to_srgb(c).clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.r),
            to_byte(self.g),
            to_byte(self.b)
        )
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// Khronos PBR Neutral tone mapping at exposure 1. `neutral_tone_map`
    /// in baked.wgsl applies the same curve per texel.
    pub fn neutral_tone_mapped(&self) -> Color {
        const START_COMPRESSION: f32 = 0.8 - 0.04;
        const DESATURATION: f32 = 0.15;

        let x = self.r.min(self.g).min(self.b);
        let offset = if x < 0.08 { x - 6.25 * x * x } else { 0.04 };
        let mut c = [self.r - offset, self.g - offset, self.b - offset];

        let peak = c[0].max(c[1]).max(c[2]);
        if peak < START_COMPRESSION {
            return Color::new(c[0], c[1], c[2]);
        }
        let d = 1.0 - START_COMPRESSION;
        let new_peak = 1.0 - d * d / (peak + d - START_COMPRESSION);
        for channel in c.iter_mut() {
            *channel *= new_peak / peak;
        }
        let g = 1.0 - 1.0 / (DESATURATION * (peak - new_peak) + 1.0);
        let mix = |v: f32| v * (1.0 - g) + new_peak * g;
        Color::new(mix(c[0]), mix(c[1]), mix(c[2]))
    }
}

impl From<Color> for wgpu::Color {
    fn from(c: Color) -> Self {
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}
