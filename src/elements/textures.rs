//! Tileable element textures
//!
//! The few textured types (stone, wood) sample a small raster with wrap at
//! construction time instead of jittering their base color. Textures are
//! loaded once when the engine is built; a missing or broken file is logged
//! and the type silently falls back to jitter.

use super::{ElementType, Rgba, ALL_ELEMENTS, ELEMENT_COUNT};

/// A decoded raster, sampled with wrap on both axes.
pub struct Texture {
    width: i32,
    height: i32,
    pixels: Vec<Rgba>,
}

impl Texture {
    /// Build from raw RGBA8 rows (len must be `w * h * 4`).
    pub fn from_rgba8(width: i32, height: i32, data: &[u8]) -> Option<Self> {
        if width <= 0 || height <= 0 || data.len() != (width * height * 4) as usize {
            return None;
        }
        let pixels = data
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Some(Self { width, height, pixels })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_png_bytes(bytes: &[u8]) -> Option<Self> {
        let img = image::load_from_memory(bytes).ok()?.to_rgba8();
        Self::from_rgba8(img.width() as i32, img.height() as i32, img.as_raw())
    }

    /// Sample at world coordinates, tiling the raster.
    #[inline]
    pub fn sample(&self, x: i32, y: i32) -> Rgba {
        let tx = x.rem_euclid(self.width);
        let ty = y.rem_euclid(self.height);
        self.pixels[(ty * self.width + tx) as usize]
    }
}

/// Per-type texture slots, indexed by element id.
pub struct TextureStore {
    slots: [Option<Texture>; ELEMENT_COUNT],
}

impl TextureStore {
    /// Empty store: every type uses color jitter.
    pub fn empty() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Load every texture the metadata table names. Failures are warned once
    /// here and never retried.
    pub fn load_all() -> Self {
        let mut store = Self::empty();
        for &t in ALL_ELEMENTS.iter() {
            if let Some(path) = t.props().texture {
                match load_file(path) {
                    Some(tex) => store.set(t, tex),
                    None => log::warn!(
                        "texture for {} not loadable from {}, using color jitter",
                        t.props().name,
                        path
                    ),
                }
            }
        }
        store
    }

    pub fn set(&mut self, t: ElementType, texture: Texture) {
        self.slots[t as usize] = Some(texture);
    }

    #[inline]
    pub fn get(&self, t: ElementType) -> Option<&Texture> {
        self.slots[t as usize].as_ref()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_file(path: &str) -> Option<Texture> {
    let bytes = std::fs::read(path).ok()?;
    Texture::from_png_bytes(&bytes)
}

// No filesystem on wasm; the host is expected to run without texture assets
// and the factory falls back to jitter.
#[cfg(target_arch = "wasm32")]
fn load_file(_path: &str) -> Option<Texture> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_wraps_both_axes() {
        // 2x2 checker
        let data: Vec<u8> = [
            [255u8, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [255, 255, 255, 255],
        ]
        .concat();
        let tex = Texture::from_rgba8(2, 2, &data).unwrap();
        assert_eq!(tex.sample(0, 0), Rgba::new(255, 0, 0, 255));
        assert_eq!(tex.sample(2, 0), Rgba::new(255, 0, 0, 255));
        assert_eq!(tex.sample(-1, 0), Rgba::new(0, 255, 0, 255));
        assert_eq!(tex.sample(3, 3), Rgba::new(255, 255, 255, 255));
    }

    #[test]
    fn bad_dimensions_are_rejected() {
        assert!(Texture::from_rgba8(2, 2, &[0u8; 3]).is_none());
        assert!(Texture::from_rgba8(0, 2, &[]).is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn png_bytes_round_trip() {
        use image::{ImageFormat, RgbaImage};
        use std::io::Cursor;

        let mut img = RgbaImage::new(3, 2);
        for (i, px) in img.pixels_mut().enumerate() {
            *px = image::Rgba([i as u8 * 10, 50, 100, 255]);
        }
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let tex = Texture::from_png_bytes(&bytes).expect("png decodes");
        assert_eq!(tex.sample(0, 0), Rgba::new(0, 50, 100, 255));
        assert_eq!(tex.sample(4, 0), Rgba::new(10, 50, 100, 255));
    }

    #[test]
    fn missing_asset_leaves_slot_empty() {
        let store = TextureStore::load_all();
        // no assets/ directory ships with the engine crate itself
        assert!(store.get(ElementType::Sand).is_none());
    }
}
