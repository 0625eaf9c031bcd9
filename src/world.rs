//! World - the engine instance
//!
//! Owns the grid, the chunk scheduler, the RNG, the particle pool and the
//! frame composer. One caller drives `update()`; pacing (fixed timestep,
//! lag accumulation) is the host's job. Everything is pre-allocated at
//! construction; the steady-state frame performs no heap allocation.

use crate::behaviors::{make_ballistic, update_cell, UpdateContext};
use crate::cell::Cell;
use crate::chunks::{ChunkGrid, CHUNK_SIZE};
use crate::elements::{element_manifest_json, ElementFactory, ElementType};
use crate::grid::Grid;
use crate::particles::{Particle, ParticlePool};
use crate::render::FrameComposer;
use crate::rng::ElementRng;

/// Simulation rate the host is expected to pace `update()` at.
pub const PHYSICS_HZ: f32 = 60.0;

pub struct World {
    factory: ElementFactory,
    rng: ElementRng,
    grid: Grid,
    chunks: ChunkGrid,
    particles: ParticlePool,
    composer: FrameComposer,
    /// Global step bit; toggles exactly once per `update()`.
    step: bool,
    frame: u64,
    /// Reusable per-row column permutation scratch.
    column_order: Vec<i32>,
}

impl World {
    /// Engine with entropy seeding. Dimensions are fixed for the lifetime of
    /// the instance.
    pub fn new(width: i32, height: i32) -> Self {
        Self::build(width, height, ElementRng::from_entropy())
    }

    /// Deterministic engine for tests and replays.
    pub fn new_with_seed(width: i32, height: i32, seed: u32) -> Self {
        Self::build(width, height, ElementRng::from_seed(seed))
    }

    fn build(width: i32, height: i32, mut rng: ElementRng) -> Self {
        assert!(width > 0 && height > 0, "world dimensions must be positive");
        let factory = ElementFactory::new();
        let step = false;
        let grid = Grid::new(width, height, &factory, &mut rng, !step);
        log::info!("world created: {}x{} cells", width, height);
        Self {
            factory,
            rng,
            grid,
            chunks: ChunkGrid::new(width, height),
            particles: ParticlePool::new(),
            composer: FrameComposer::new(width, height),
            step,
            frame: 0,
            column_order: Vec::with_capacity(width as usize),
        }
    }

    // === Introspection ===

    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The global step bit (exposed for invariant checks).
    #[inline]
    pub fn step_bit(&self) -> bool {
        self.step
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.grid.get(x, y)
    }

    pub fn get_type_at(&self, x: i32, y: i32) -> ElementType {
        self.grid.get_type(x, y)
    }

    pub fn active_chunk_count(&self) -> usize {
        self.chunks.active_chunk_count()
    }

    pub fn chunk_grid_size(&self) -> (i32, i32) {
        self.chunks.dimensions()
    }

    pub fn total_chunks(&self) -> usize {
        self.chunks.total_chunks()
    }

    /// Live free-flying particle count.
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Element palette JSON for the toolbar UI.
    pub fn element_manifest(&self) -> String {
        element_manifest_json()
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.composer.set_debug_overlay(enabled);
    }

    pub fn debug_mode(&self) -> bool {
        self.composer.debug_overlay()
    }

    // === Mutation ===

    /// Overwrite `(x, y)` with `t`; idempotent on same type, silent no-op
    /// out of bounds.
    pub fn place(&mut self, t: ElementType, x: i32, y: i32) {
        let fresh = !self.step;
        self.grid
            .place(&mut self.chunks, &self.factory, &mut self.rng, t, x, y, fresh);
    }

    /// Disk brush around `(cx, cy)`.
    pub fn place_area(&mut self, t: ElementType, cx: i32, cy: i32, radius: i32) {
        let fresh = !self.step;
        self.grid.place_area(
            &mut self.chunks,
            &self.factory,
            &mut self.rng,
            t,
            cx,
            cy,
            radius,
            fresh,
        );
    }

    /// Replace `(x, y)` with `Empty`.
    pub fn destroy(&mut self, x: i32, y: i32) {
        let fresh = !self.step;
        self.grid
            .destroy(&mut self.chunks, &self.factory, &mut self.rng, x, y, fresh);
    }

    /// Exchange two cells through the full swap contract.
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.grid.swap(&mut self.chunks, self.step, x1, y1, x2, y2);
    }

    /// Spawn a free-flying particle; `false` when the pool is full.
    pub fn spawn_particle(&mut self, p: Particle) -> bool {
        self.particles.spawn(p)
    }

    pub fn rng_mut(&mut self) -> &mut ElementRng {
        &mut self.rng
    }

    /// Launch the element at `(x, y)` as a ballistic shell with the given
    /// velocity; it reverts to its element once it settles.
    pub fn convert_to_particle(&mut self, x: i32, y: i32, vx: f32, vy: f32) {
        let fresh = !self.step;
        let Some(cell) = self.grid.get(x, y) else {
            return;
        };
        if cell.is_empty() || cell.element_type() == ElementType::PhysicsParticle {
            return;
        }
        let shell = make_ballistic(cell, vx, vy, fresh);
        self.grid.put_cell(&mut self.chunks, shell, x, y);
    }

    /// Wipe the grid, the scheduler and the pool without reconstructing the
    /// engine.
    pub fn clear(&mut self) {
        let fresh = !self.step;
        self.grid.clear(&self.factory, &mut self.rng, fresh);
        self.chunks.reset();
        self.particles.clear();
        self.frame = 0;
    }

    // === Stepping ===

    /// Advance the simulation one step.
    ///
    /// Rows are processed bottom-up so gravity converges in a single pass;
    /// within each row the columns of active chunks are visited in a fresh
    /// uniform permutation to avoid left/right bias. Cells outside the
    /// frame-start active set are not dispatched at all, and whole chunk
    /// rows without work are skipped, so an idle grid costs O(chunks).
    pub fn update(&mut self) {
        self.chunks.begin_frame();

        let (chunks_x, chunks_y) = self.chunks.dimensions();
        let height = self.grid.height();
        let mut order = std::mem::take(&mut self.column_order);

        for cy in (0..chunks_y).rev() {
            if !self.chunks.row_has_work(cy) {
                continue;
            }
            let row_top = cy * CHUNK_SIZE;
            let row_bottom = (row_top + CHUNK_SIZE - 1).min(height - 1);

            for y in (row_top..=row_bottom).rev() {
                order.clear();
                for cx in 0..chunks_x {
                    let chunk = self.chunks.chunk(cx, cy);
                    if chunk.was_active {
                        order.extend(chunk.left..=chunk.right);
                    }
                }
                if order.is_empty() {
                    continue;
                }
                // Fisher-Yates; a fresh uniform permutation per row
                for i in (1..order.len()).rev() {
                    let j = self.rng.random_int(0, i as i32) as usize;
                    order.swap(i, j);
                }

                for &x in order.iter() {
                    let mut ctx = UpdateContext {
                        grid: &mut self.grid,
                        chunks: &mut self.chunks,
                        rng: &mut self.rng,
                        particles: &mut self.particles,
                        factory: &self.factory,
                        step: self.step,
                        x,
                        y,
                    };
                    update_cell(&mut ctx);
                }
            }
        }

        self.column_order = order;
        self.chunks.end_frame();
        self.particles.update_all(self.grid.width(), self.grid.height());
        self.step = !self.step;
        self.frame += 1;
    }

    // === Frame output ===

    /// Pack the current state into the RGBA8888 pixel buffer. May be called
    /// any number of times per `update()`; the slice is valid until the next
    /// call.
    pub fn compose_frame(&mut self) -> &[u32] {
        self.composer
            .compose(&self.grid, &mut self.chunks, &self.particles)
    }

    /// Pointer/length pair for the wasm presenter (valid after the last
    /// `compose_frame` call).
    pub fn frame_ptr(&self) -> *const u32 {
        self.composer.frame_ptr()
    }

    pub fn frame_len(&self) -> usize {
        self.composer.frame_len()
    }
}
