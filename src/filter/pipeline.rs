//! Ping-pong filter pipeline.
//!
//! Mirrors a two-texture render-target pipeline: a load stage copies the
//! decoded frame in with one vertical flip, then each filter in the chain
//! reads the current source texture and writes the framebuffer, and the two
//! swap roles after every stage. The final source texture is presented,
//! flipping back to top-down row order.

use crate::{
    filter::kernels::{box_blur, chroma_key, flip_vertical, radial_blur},
    filter::params::{parse_blur, parse_chroma_key},
    foundation::error::{MontageError, MontageResult},
    foundation::pixel::Bitmap,
    timeline::model::{FilterChain, FilterName},
};

/// Run a filter chain over one decoded frame.
///
/// A disabled chain bypasses the pipeline entirely and returns the frame
/// byte-for-byte unchanged.
#[tracing::instrument(skip(frame, chain), fields(filters = chain.list.len()))]
pub fn apply_filters(frame: &Bitmap, chain: &FilterChain) -> MontageResult<Bitmap> {
    if !chain.enable {
        return Ok(frame.clone());
    }
    if frame.width() == 0 || frame.height() == 0 {
        return Err(MontageError::evaluation("cannot filter an empty frame"));
    }

    let mut src = Bitmap::new(frame.width(), frame.height());
    let mut framebuffer = Bitmap::new(frame.width(), frame.height());

    flip_vertical(frame, &mut framebuffer);
    std::mem::swap(&mut src, &mut framebuffer);

    for filter in &chain.list {
        match filter.name {
            FilterName::ChromaKey => {
                chroma_key(&src, &mut framebuffer, &parse_chroma_key(&filter.value));
            }
            FilterName::Blur => {
                box_blur(&src, &mut framebuffer, &parse_blur(&filter.value));
            }
            FilterName::RadialBlur => {
                radial_blur(&src, &mut framebuffer, &parse_blur(&filter.value));
            }
        }
        std::mem::swap(&mut src, &mut framebuffer);
    }

    flip_vertical(&src, &mut framebuffer);
    Ok(framebuffer)
}

#[cfg(test)]
#[path = "../../tests/unit/filter/pipeline.rs"]
mod tests;
