//! CPU pixel kernels backing the filter pipeline.
//!
//! Each kernel reads a source bitmap and writes a same-size destination,
//! sampling nearest-texel with clamp-to-edge addressing. Pixels stay
//! premultiplied RGBA8; kernels convert to f64 per tap only where the math
//! needs it.

use crate::filter::params::{BlurParams, ChromaKeyParams};
use crate::foundation::pixel::Bitmap;

/// Copy `src` into `dst` with a vertical flip.
///
/// The pipeline's load stage runs this once so the kernel stages see the
/// same bottom-up row order the original render target used; the present
/// stage flips back.
pub fn flip_vertical(src: &Bitmap, dst: &mut Bitmap) {
    let (w, h) = (src.width(), src.height());
    for y in 0..h {
        for x in 0..w {
            dst.put_pixel(x, y, src.pixel(x, h - 1 - y));
        }
    }
}

/// Key out pixels whose color sits within `threshold` of the key color.
///
/// Distance is Euclidean over normalized RGB; matching pixels become fully
/// transparent, everything else passes through untouched.
pub fn chroma_key(src: &Bitmap, dst: &mut Bitmap, params: &ChromaKeyParams) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let px = src.pixel(x, y);
            let dr = px[0] as f64 / 255.0 - params.key[0];
            let dg = px[1] as f64 / 255.0 - params.key[1];
            let db = px[2] as f64 / 255.0 - params.key[2];
            let diff = (dr * dr + dg * dg + db * db).sqrt();
            dst.put_pixel(x, y, if diff < params.threshold { [0; 4] } else { px });
        }
    }
}

/// 3x3 box blur with taps spread `factor` texels apart.
pub fn box_blur(src: &Bitmap, dst: &mut Bitmap, params: &BlurParams) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let mut sum = [0u32; 4];
            for j in -1i64..=1 {
                for i in -1i64..=1 {
                    let sx = (x as f64 + i as f64 * params.factor).round() as i64;
                    let sy = (y as f64 + j as f64 * params.factor).round() as i64;
                    let px = src.sample_clamped(sx, sy);
                    for c in 0..4 {
                        sum[c] += px[c] as u32;
                    }
                }
            }
            dst.put_pixel(x, y, [
                (sum[0] / 9) as u8,
                (sum[1] / 9) as u8,
                (sum[2] / 9) as u8,
                (sum[3] / 9) as u8,
            ]);
        }
    }
}

const RADIAL_SAMPLES: usize = 66;
const RADIAL_CENTER: (f64, f64) = (0.5, 0.5);

fn smoothstep(e0: f64, e1: f64, x: f64) -> f64 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn rotate(v: (f64, f64), angle: f64) -> (f64, f64) {
    let (s, c) = angle.sin_cos();
    (v.0 * c - v.1 * s, v.0 * s + v.1 * c)
}

fn sample_uv(src: &Bitmap, u: f64, v: f64) -> [u8; 4] {
    let x = (u * src.width() as f64).floor() as i64;
    let y = (v * src.height() as f64).floor() as i64;
    src.sample_clamped(x, y)
}

/// Rotational blur around the frame center.
///
/// 66 samples walk inward along the center direction while rotating by an
/// angle that grows with the sample index; sample `i` is weighted
/// `1/(samples+i)` and the sum is scaled by 1.5.
pub fn radial_blur(src: &Bitmap, dst: &mut Bitmap, params: &BlurParams) {
    let power = params.factor;
    let (mx, my) = RADIAL_CENTER;
    for y in 0..src.height() {
        for x in 0..src.width() {
            let u0 = (x as f64 + 0.5) / src.width() as f64;
            let v0 = (y as f64 + 0.5) / src.height() as f64;

            let dist = ((u0 - mx).powi(2) + (v0 - my).powi(2)).sqrt();
            let rotate_dir =
                smoothstep(-0.3, 0.3, (dist / (0.005 + power * 5.0)).sin()) - 0.5;
            let shift_dir = (-(u0 - mx), -(v0 - my));

            let (mut u, mut v) = (u0, v0);
            let mut acc = [0.0f64; 4];
            for i in 0..RADIAL_SAMPLES {
                let step = i as f64 / RADIAL_SAMPLES as f64 * 0.01;
                u += step * shift_dir.0;
                v += step * shift_dir.1;
                let rotated = rotate((u - mx, v - my), rotate_dir * power * i as f64);
                u = rotated.0 + mx;
                v = rotated.1 + my;
                let px = sample_uv(src, u, v);
                let weight = 1.0 / (RADIAL_SAMPLES + i) as f64;
                for c in 0..4 {
                    acc[c] += px[c] as f64 * weight;
                }
            }
            dst.put_pixel(x, y, [
                (acc[0] * 1.5).clamp(0.0, 255.0) as u8,
                (acc[1] * 1.5).clamp(0.0, 255.0) as u8,
                (acc[2] * 1.5).clamp(0.0, 255.0) as u8,
                (acc[3] * 1.5).clamp(0.0, 255.0) as u8,
            ]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/kernels.rs"]
mod tests;
