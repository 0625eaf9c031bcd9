//! Frame composer
//!
//! Packs cell colors into a RGBA8888 pixel buffer, refreshed only for
//! chunks that were processed or visually dirtied this frame, then
//! composites the live particles over a copy and optionally outlines the
//! active chunks for the debug HUD.

use crate::chunks::ChunkGrid;
use crate::elements::Rgba;
use crate::grid::Grid;
use crate::particles::ParticlePool;

const DEBUG_OUTLINE: Rgba = Rgba::new(64, 255, 64, 255);

pub struct FrameComposer {
    width: i32,
    height: i32,
    /// Grid colors only; persists across frames so stable chunks keep their
    /// last pixels.
    base: Vec<u32>,
    /// What the presenter reads: base plus particles plus overlay.
    frame: Vec<u32>,
    debug_overlay: bool,
}

impl FrameComposer {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            base: vec![0; size],
            frame: vec![0; size],
            debug_overlay: false,
        }
    }

    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Raw access to the composed frame for the wasm presenter.
    pub fn frame_ptr(&self) -> *const u32 {
        self.frame.as_ptr()
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Produce the packed frame. Valid until the next call.
    pub fn compose(
        &mut self,
        grid: &Grid,
        chunks: &mut ChunkGrid,
        particles: &ParticlePool,
    ) -> &[u32] {
        self.refresh_base(grid, chunks);
        self.frame.copy_from_slice(&self.base);
        self.composite_particles(particles);
        if self.debug_overlay {
            self.outline_active_chunks(chunks);
        }
        &self.frame
    }

    /// Re-pack pixels for chunks that were processed this frame or carry a
    /// pending visual change; everything else keeps its last pixels.
    fn refresh_base(&mut self, grid: &Grid, chunks: &mut ChunkGrid) {
        let width = self.width;
        for idx in 0..chunks.total_chunks() {
            let chunk = chunks.chunks()[idx];
            if !(chunk.was_active || chunk.visual_dirty) {
                continue;
            }
            for y in chunk.top..=chunk.bottom {
                let row = (y * width) as usize;
                for x in chunk.left..=chunk.right {
                    self.base[row + x as usize] = grid.cell(x, y).color.pack();
                }
            }
            chunks.clear_visual_dirty(idx);
        }
    }

    /// "Over" compositing of each live particle onto the frame buffer; the
    /// output alpha keeps the more opaque of the two layers.
    fn composite_particles(&mut self, particles: &ParticlePool) {
        for p in particles.iter() {
            for dy in 0..p.height {
                for dx in 0..p.width {
                    let px = p.x + dx;
                    let py = p.y + dy;
                    if px < 0 || px >= self.width || py < 0 || py >= self.height {
                        continue;
                    }
                    let idx = (py * self.width + px) as usize;
                    self.frame[idx] = blend_over(p.color, self.frame[idx]);
                }
            }
        }
    }

    fn outline_active_chunks(&mut self, chunks: &ChunkGrid) {
        let outline = DEBUG_OUTLINE.pack();
        let width = self.width;
        for chunk in chunks.chunks() {
            if !chunk.active {
                continue;
            }
            for x in chunk.left..=chunk.right {
                self.frame[(chunk.top * width + x) as usize] = outline;
                self.frame[(chunk.bottom * width + x) as usize] = outline;
            }
            for y in chunk.top..=chunk.bottom {
                self.frame[(y * width + chunk.left) as usize] = outline;
                self.frame[(y * width + chunk.right) as usize] = outline;
            }
        }
    }
}

#[inline]
fn blend_over(fg: Rgba, bg: u32) -> u32 {
    let bg_r = (bg >> 24) & 0xFF;
    let bg_g = (bg >> 16) & 0xFF;
    let bg_b = (bg >> 8) & 0xFF;
    let bg_a = bg & 0xFF;

    let alpha = fg.a as f32 / 255.0;
    let inv = 1.0 - alpha;

    let out_r = (fg.r as f32 * alpha + bg_r as f32 * inv) as u32;
    let out_g = (fg.g as f32 * alpha + bg_g as f32 * inv) as u32;
    let out_b = (fg.b as f32 * alpha + bg_b as f32 * inv) as u32;
    let out_a = (fg.a as u32).max(bg_a);

    (out_r << 24) | (out_g << 16) | (out_b << 8) | out_a
}
