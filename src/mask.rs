//! Per-pixel collision masks.
//!
//! A mask is a bitmap of "solid" pixels derived from an image's alpha channel.
//! Two masks collide when any solid pixel of one lands on a solid pixel of the
//! other once both are placed at their top-left origins.

use bevy::prelude::*;
use bevy::render::render_resource::TextureFormat;
use thiserror::Error;

/// Alpha above this counts as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaskError {
    #[error("unsupported texture format {0:?}")]
    UnsupportedFormat(TextureFormat),
    #[error("pixel data is {actual} bytes, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    pub fn empty(size: UVec2) -> Self {
        Self { width: size.x, height: size.y, bits: vec![false; (size.x * size.y) as usize] }
    }

    pub fn solid(size: UVec2) -> Self {
        Self { width: size.x, height: size.y, bits: vec![true; (size.x * size.y) as usize] }
    }

    /// Builds a mask from packed 4-byte pixels, reading alpha at `alpha_index`.
    pub fn from_rgba(width: u32, height: u32, data: &[u8], alpha_index: usize) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MaskError::DataLength { expected, actual: data.len() });
        }
        let bits = data.chunks_exact(4).map(|px| px[alpha_index] > ALPHA_THRESHOLD).collect();
        Ok(Self { width, height, bits })
    }

    pub fn from_image(image: &Image) -> Result<Self, MaskError> {
        let format = image.texture_descriptor.format;
        match format {
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8UnormSrgb
            | TextureFormat::Bgra8Unorm
            | TextureFormat::Bgra8UnormSrgb => Self::from_rgba(image.width(), image.height(), &image.data, 3),
            other => Err(MaskError::UnsupportedFormat(other)),
        }
    }

    pub fn size(&self) -> UVec2 { UVec2::new(self.width, self.height) }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Nearest-neighbour resize, so a mask covers the same area as a sprite
    /// drawn stretched to `size`.
    pub fn scaled(&self, size: UVec2) -> Self {
        if size == self.size() {
            return self.clone();
        }
        let mut out = Self::empty(size);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        let step = self.size().as_vec2() / size.as_vec2();
        for y in 0..size.y {
            for x in 0..size.x {
                let src = (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * step).floor();
                if self.get(src.x as i32, src.y as i32) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }

    /// Rotates counter-clockwise on screen by `degrees`, growing the bitmap to
    /// fit the rotated bounds. Sampling is nearest-neighbour at pixel centres.
    pub fn rotated(&self, degrees: f32) -> Self {
        let turn = degrees.rem_euclid(360.0);
        if turn == 0.0 {
            return self.clone();
        }
        let (sin, cos) = turn.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        // Trim float noise so exact quarter turns keep their dimensions.
        let out_w = (w * cos.abs() + h * sin.abs() - 1e-3).ceil().max(1.0) as u32;
        let out_h = (w * sin.abs() + h * cos.abs() - 1e-3).ceil().max(1.0) as u32;
        let src_center = Vec2::new(w, h) / 2.0;
        let out_center = Vec2::new(out_w as f32, out_h as f32) / 2.0;

        let mut out = Self::empty(UVec2::new(out_w, out_h));
        for y in 0..out_h {
            for x in 0..out_w {
                // Screen space is y-down, so a visual ccw turn maps back through
                // the transpose of [[cos, sin], [-sin, cos]].
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - out_center;
                let src = Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y) + src_center;
                if self.get(src.x.floor() as i32, src.y.floor() as i32) {
                    out.set(x, y, true);
                }
            }
        }
        out
    }

    /// True when any solid pixel overlaps, with `other` placed at `offset`
    /// relative to this mask's top-left corner.
    pub fn overlaps(&self, other: &CollisionMask, offset: IVec2) -> bool {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (self.width as i32).min(offset.x + other.width as i32);
        let y1 = (self.height as i32).min(offset.y + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        (y0..y1).any(|y| (x0..x1).any(|x| self.get(x, y) && other.get(x - offset.x, y - offset.y)))
    }
}
