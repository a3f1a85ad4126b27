//! Premultiplied source-over blending.

use crate::foundation::math::{add_sat_u8, mul_div255};
use crate::foundation::pixel::Bitmap;

/// Source-over for premultiplied RGBA8: `src + dst * (1 - src.a)`.
pub(crate) fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let inv = 255 - src[3];
    [
        add_sat_u8(src[0], mul_div255(dst[0], inv)),
        add_sat_u8(src[1], mul_div255(dst[1], inv)),
        add_sat_u8(src[2], mul_div255(dst[2], inv)),
        add_sat_u8(src[3], mul_div255(dst[3], inv)),
    ]
}

/// Scale a premultiplied pixel by a 0-255 alpha factor.
pub(crate) fn scale_premul(px: [u8; 4], alpha: u8) -> [u8; 4] {
    if alpha == 255 {
        return px;
    }
    [
        mul_div255(px[0], alpha),
        mul_div255(px[1], alpha),
        mul_div255(px[2], alpha),
        mul_div255(px[3], alpha),
    ]
}

/// Blend one premultiplied pixel into the frame, skipping fully transparent
/// sources and clipping to the frame bounds.
pub(crate) fn blend_pixel(frame: &mut Bitmap, x: i64, y: i64, src: [u8; 4]) {
    if src[3] == 0 && src[0] == 0 && src[1] == 0 && src[2] == 0 {
        return;
    }
    if x < 0 || y < 0 || x >= frame.width() as i64 || y >= frame.height() as i64 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let blended = over(frame.pixel(x, y), src);
    frame.put_pixel(x, y, blended);
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
