//! JS-facing facade
//!
//! Thin `wasm_bindgen` wrapper around the pure-Rust `World`. Element types
//! cross the boundary as u8 ids; the presenter reads the composed frame via
//! pointer + length straight out of wasm memory.

use wasm_bindgen::prelude::*;

use crate::elements::ElementType;
use crate::particles::Particle;
use crate::world::World;

#[wasm_bindgen]
pub struct Sandbox {
    core: World,
}

#[wasm_bindgen]
impl Sandbox {
    #[wasm_bindgen(constructor)]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            core: World::new(width, height),
        }
    }

    /// Deterministic construction for replays and harnesses.
    #[wasm_bindgen(js_name = newWithSeed)]
    pub fn new_with_seed(width: i32, height: i32, seed: u32) -> Self {
        Self {
            core: World::new_with_seed(width, height, seed),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> i32 {
        self.core.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> i32 {
        self.core.height()
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.core.frame()
    }

    pub fn place(&mut self, element: u8, x: i32, y: i32) {
        if let Some(t) = ElementType::from_id(element) {
            self.core.place(t, x, y);
        }
    }

    pub fn place_area(&mut self, element: u8, cx: i32, cy: i32, radius: i32) {
        if let Some(t) = ElementType::from_id(element) {
            self.core.place_area(t, cx, cy, radius);
        }
    }

    pub fn destroy(&mut self, x: i32, y: i32) {
        self.core.destroy(x, y);
    }

    pub fn update(&mut self) {
        self.core.update();
    }

    /// Re-pack the frame; read it back through `pixels_ptr`/`pixels_len`.
    pub fn compose_frame(&mut self) {
        self.core.compose_frame();
    }

    pub fn pixels_ptr(&self) -> *const u32 {
        self.core.frame_ptr()
    }

    pub fn pixels_len(&self) -> usize {
        self.core.frame_len()
    }

    pub fn active_chunk_count(&self) -> usize {
        self.core.active_chunk_count()
    }

    pub fn chunks_x(&self) -> i32 {
        self.core.chunk_grid_size().0
    }

    pub fn chunks_y(&self) -> i32 {
        self.core.chunk_grid_size().1
    }

    pub fn get_type_at(&self, x: i32, y: i32) -> u8 {
        self.core.get_type_at(x, y).id()
    }

    pub fn particle_count(&self) -> usize {
        self.core.particle_count()
    }

    /// Element palette JSON for the toolbar.
    pub fn element_manifest(&self) -> String {
        self.core.element_manifest()
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.core.set_debug_mode(enabled);
    }

    /// Spawn a free-flying particle; returns false when the pool is full.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_particle(
        &mut self,
        x: i32,
        y: i32,
        r: u8,
        g: u8,
        b: u8,
        a: u8,
        velocity_x: f32,
        velocity_y: f32,
        acceleration_x: f32,
        acceleration_y: f32,
        lifetime: i32,
        fade_threshold: f32,
    ) -> bool {
        let color = crate::elements::Rgba::new(r, g, b, a);
        let p = Particle::new(
            x,
            y,
            1,
            1,
            color,
            velocity_x,
            velocity_y,
            acceleration_x,
            acceleration_y,
            lifetime,
            0.0,
            fade_threshold,
            self.core.rng_mut(),
        );
        self.core.spawn_particle(p)
    }

    /// Launch the element at `(x, y)` as a ballistic shell.
    pub fn convert_to_particle(&mut self, x: i32, y: i32, velocity_x: f32, velocity_y: f32) {
        self.core.convert_to_particle(x, y, velocity_x, velocity_y);
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }
}
