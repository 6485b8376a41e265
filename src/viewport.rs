//! Drawable size and pixel ratio.

use winit::dpi::PhysicalSize;

pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Cap the device pixel ratio so high-density screens don't multiply the
/// fill-rate cost.
pub fn clamp_pixel_ratio(device_pixel_ratio: f64, max_pixel_ratio: f64) -> f64 {
    device_pixel_ratio.min(max_pixel_ratio)
}

/// Logical (CSS) size of the drawable area plus the effective pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio, max_pixel_ratio),
        }
    }

    /// Build from winit's physical size, which already includes the device
    /// scale factor.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            size.width as f64 / scale_factor,
            size.height as f64 / scale_factor,
            scale_factor,
            max_pixel_ratio,
        )
    }

    /// Width over height. A zero height (minimised window) yields 1.
    pub fn aspect(&self) -> f32 {
        if self.height <= 0.0 {
            return 1.0;
        }
        (self.width / self.height) as f32
    }

    /// Size of the render surface in physical pixels, never zero.
    pub fn surface_size(&self) -> PhysicalSize<u32> {
        let scale = |v: f64| ((v * self.pixel_ratio).round() as u32).max(1);
        PhysicalSize::new(scale(self.width), scale(self.height))
    }

    /// [`Viewport::surface_size`] scaled down, keeping its proportions, until
    /// neither side exceeds `max_dimension` (the device's texture limit).
    pub fn surface_size_within(&self, max_dimension: u32) -> PhysicalSize<u32> {
        let size = self.surface_size();
        let max_dimension = max_dimension.max(1);
        let longest = size.width.max(size.height);
        if longest <= max_dimension {
            return size;
        }
        let factor = max_dimension as f64 / longest as f64;
        let scale = |v: u32| ((v as f64 * factor).round() as u32).clamp(1, max_dimension);
        PhysicalSize::new(scale(size.width), scale(size.height))
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
