//! Color and pixel-buffer primitives.
//!
//! All compositing in this crate operates on premultiplied RGBA8. Colors are
//! authored straight-alpha (CSS-style hex strings) and premultiplied at the
//! point they enter a [`Bitmap`].

use crate::foundation::error::{MontageError, MontageResult};
use crate::foundation::math::mul_div255;

/// Straight-alpha RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Construct from straight-alpha channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a CSS-style hex color: `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> MontageResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(MontageError::validation(format!("invalid hex color: {s:?}")));
        }
        let channel = |i: usize| -> MontageResult<u8> {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MontageError::validation(format!("invalid hex color: {s:?}")))
        };
        match hex.len() {
            3 => {
                let nibble = |i: usize| -> MontageResult<u8> {
                    let v = u8::from_str_radix(&hex[i..i + 1], 16)
                        .map_err(|_| MontageError::validation(format!("invalid hex color: {s:?}")))?;
                    Ok(v * 17)
                };
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, 255))
            }
            6 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(MontageError::validation(format!(
                "invalid hex color: {s:?}"
            ))),
        }
    }

    /// Premultiplied RGBA bytes, with an extra straight-alpha `coverage`
    /// factor (0-255) folded in.
    pub fn premultiplied_with(&self, coverage: u8) -> [u8; 4] {
        let a = mul_div255(self.a, coverage);
        [
            mul_div255(self.r, a),
            mul_div255(self.g, a),
            mul_div255(self.b, a),
            a,
        ]
    }

    /// Premultiplied RGBA bytes.
    pub fn premultiplied(&self) -> [u8; 4] {
        self.premultiplied_with(255)
    }
}

/// Premultiplied RGBA8 pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// A transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Wrap an existing premultiplied RGBA8 byte buffer.
    pub fn from_premul_data(width: u32, height: u32, data: Vec<u8>) -> MontageResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(MontageError::validation(format!(
                "bitmap data length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`; callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Pixel at `(x, y)` with clamp-to-edge addressing.
    pub fn sample_clamped(&self, x: i64, y: i64) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(cx, cy)
    }

    /// Fill the whole buffer with one straight-alpha color.
    pub fn fill(&mut self, color: Rgba8) {
        let px = color.premultiplied();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;
