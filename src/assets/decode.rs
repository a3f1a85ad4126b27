//! Media byte decoding into premultiplied RGBA8.

use std::io::Cursor;

use image::AnimationDecoder;

use crate::{
    foundation::error::{MontageError, MontageResult},
    foundation::math::mul_div255,
    foundation::pixel::Bitmap,
};

/// Decode image bytes (PNG/JPEG/etc.) into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> MontageResult<Bitmap> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| MontageError::decode(format!("image decode failed: {e}")))?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    Bitmap::from_premul_data(w, h, data)
}

/// Convert straight-alpha RGBA8 bytes to premultiplied alpha in place.
pub(crate) fn premultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        if a == 255 {
            continue;
        }
        px[0] = mul_div255(px[0], a);
        px[1] = mul_div255(px[1], a);
        px[2] = mul_div255(px[2], a);
    }
}

/// A decoded GIF: its frames and the frame delay.
///
/// The first frame's delay is applied uniformly to the whole animation.
#[derive(Clone, Debug)]
pub struct GifFrames {
    /// Decoded frames in presentation order.
    pub frames: Vec<Bitmap>,
    /// Uniform frame delay in milliseconds.
    pub delay_ms: i64,
}

impl GifFrames {
    /// Frame index shown at absolute timeline time `time_ms`.
    ///
    /// The animation loops from the timeline origin, independent of the
    /// element's start (`floor(time / delay) mod frame_count`); a
    /// non-positive delay or negative time pins the first frame.
    pub fn frame_index_at(&self, time_ms: i64) -> usize {
        if self.frames.len() < 2 || self.delay_ms <= 0 || time_ms < 0 {
            return 0;
        }
        (time_ms / self.delay_ms) as usize % self.frames.len()
    }
}

/// Decode GIF bytes into frames.
pub fn decode_gif(bytes: &[u8]) -> MontageResult<GifFrames> {
    let decoder = image::codecs::gif::GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| MontageError::decode(format!("gif decode failed: {e}")))?;
    let raw_frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| MontageError::decode(format!("gif frame decode failed: {e}")))?;
    if raw_frames.is_empty() {
        return Err(MontageError::decode("gif has no frames"));
    }
    let (numer, denom) = raw_frames[0].delay().numer_denom_ms();
    let delay_ms = if denom == 0 { 0 } else { (numer / denom) as i64 };
    let mut frames = Vec::with_capacity(raw_frames.len());
    for frame in raw_frames {
        let buf = frame.into_buffer();
        let (w, h) = buf.dimensions();
        let mut data = buf.into_raw();
        premultiply_rgba8_in_place(&mut data);
        frames.push(Bitmap::from_premul_data(w, h, data)?);
    }
    Ok(GifFrames { frames, delay_ms })
}

/// Load a font for text measurement and rasterization.
pub fn decode_font(bytes: &[u8]) -> MontageResult<fontdue::Font> {
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| MontageError::decode(format!("font parse failed: {e}")))
}

/// Gray checkerboard substituted for images whose decode failed.
pub fn placeholder_bitmap(width: u32, height: u32) -> Bitmap {
    const CELL: u32 = 8;
    let mut bitmap = Bitmap::new(width.max(1), height.max(1));
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let dark = ((x / CELL) + (y / CELL)) % 2 == 0;
            let v = if dark { 96 } else { 160 };
            bitmap.put_pixel(x, y, [v, v, v, 255]);
        }
    }
    bitmap
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
