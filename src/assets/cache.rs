//! Side caches for decoded media.
//!
//! Decoded media never lives inside timeline elements. The compositor reads
//! these id-keyed caches and simply skips elements whose media has not
//! arrived yet; decode completion is "insert into the cache, request a
//! redraw". Caches are append-only: a duplicate completion keeps the first
//! entry, so late or repeated loads are harmless.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    assets::decode::{GifFrames, decode_font, placeholder_bitmap},
    foundation::error::MontageResult,
    foundation::pixel::Bitmap,
    timeline::model::{Element, ElementId, ElementKind},
};

/// Live video decode handle owned by the cache.
///
/// The compositor pulls frames by source time and toggles mute when the
/// cursor leaves the clip's trim window; everything else about decoding is
/// the host's concern.
pub trait VideoHandle {
    /// Decoded frame at the given source-relative time, if available.
    fn frame_at(&mut self, source_time_ms: i64) -> Option<Bitmap>;

    /// Mute or unmute the clip's audio.
    fn set_muted(&mut self, muted: bool);

    /// Current mute state.
    fn muted(&self) -> bool;
}

/// Decoded media produced by an [`AssetLoader`].
pub enum DecodedAsset {
    /// Still bitmap.
    Image(Bitmap),
    /// GIF animation frames.
    Gif(GifFrames),
    /// Live video handle.
    Video(Box<dyn VideoHandle>),
    /// Raw font bytes, parsed on insert.
    Font(Vec<u8>),
}

/// Decode seam the host implements.
///
/// The engine never performs IO; the host drives loading off the hot path
/// and delivers results through [`AssetCache::store`].
pub trait AssetLoader {
    /// Decode the media behind one element.
    fn load(&mut self, id: &ElementId, element: &Element) -> MontageResult<DecodedAsset>;
}

/// Append-only caches of decoded media, keyed by element id (fonts are
/// keyed by font path and shared across elements).
#[derive(Default)]
pub struct AssetCache {
    images: HashMap<ElementId, Arc<Bitmap>>,
    gifs: HashMap<ElementId, Arc<GifFrames>>,
    videos: HashMap<ElementId, Box<dyn VideoHandle>>,
    fonts: HashMap<String, Arc<fontdue::Font>>,
}

impl AssetCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decode result under the element's key.
    ///
    /// Duplicate completions are ignored; fonts are keyed by the element's
    /// font path so siblings share the parsed font.
    pub fn store(&mut self, id: &ElementId, element: &Element, asset: DecodedAsset) -> MontageResult<()> {
        match asset {
            DecodedAsset::Image(bitmap) => {
                self.images.entry(id.clone()).or_insert_with(|| Arc::new(bitmap));
            }
            DecodedAsset::Gif(frames) => {
                self.gifs.entry(id.clone()).or_insert_with(|| Arc::new(frames));
            }
            DecodedAsset::Video(handle) => {
                self.videos.entry(id.clone()).or_insert(handle);
            }
            DecodedAsset::Font(bytes) => {
                let key = match &element.kind {
                    ElementKind::Text(text) => text.font_path.clone(),
                    _ => id.as_str().to_owned(),
                };
                if !self.fonts.contains_key(&key) {
                    self.fonts.insert(key, Arc::new(decode_font(&bytes)?));
                }
            }
        }
        Ok(())
    }

    /// Substitute the built-in placeholder for a failed image decode.
    pub fn store_image_placeholder(&mut self, id: &ElementId, element: &Element) {
        self.images
            .entry(id.clone())
            .or_insert_with(|| Arc::new(placeholder_bitmap(element.width as u32, element.height as u32)));
    }

    /// Cached bitmap for an image element.
    pub fn image(&self, id: &ElementId) -> Option<&Arc<Bitmap>> {
        self.images.get(id)
    }

    /// Cached frames for a GIF element.
    pub fn gif(&self, id: &ElementId) -> Option<&Arc<GifFrames>> {
        self.gifs.get(id)
    }

    /// Cached video handle, mutable for frame pulls and mute toggles.
    pub fn video_mut(&mut self, id: &ElementId) -> Option<&mut Box<dyn VideoHandle>> {
        self.videos.get_mut(id)
    }

    /// Cached font for a font path.
    pub fn font(&self, font_path: &str) -> Option<&Arc<fontdue::Font>> {
        self.fonts.get(font_path)
    }

    /// Whether the element's media has arrived.
    pub fn contains(&self, id: &ElementId, element: &Element) -> bool {
        match &element.kind {
            ElementKind::Image(_) => self.images.contains_key(id),
            ElementKind::Gif(_) => self.gifs.contains_key(id),
            ElementKind::Video(_) => self.videos.contains_key(id),
            ElementKind::Text(text) => self.fonts.contains_key(&text.font_path),
            ElementKind::Shape(_) | ElementKind::Audio(_) => true,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
