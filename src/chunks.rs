//! Chunk scheduler - dirty tracking for the update and render passes
//!
//! The grid is tiled into fixed-size chunks; per-frame work is confined to
//! chunks that saw activity recently. A chunk stays awake for a few frames
//! after its last activation (countdown policy) so settling piles don't
//! flicker between asleep and awake.

/// Chunk side length in cells.
pub const CHUNK_SIZE: i32 = 16;

/// Frames a chunk stays active after its last activation.
pub const CHUNK_KEEPALIVE: u32 = 10;

/// One scheduling tile: world-space extents plus activity flags.
#[derive(Clone, Copy, Debug)]
pub struct Chunk {
    pub chunk_x: i32,
    pub chunk_y: i32,
    /// Inclusive world-space extents, clipped to the grid.
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    /// Will be / is being considered this frame.
    pub active: bool,
    /// Snapshot taken at frame start: the set actually processed this frame.
    /// Doubles as the render gate.
    pub was_active: bool,
    /// Set by mid-frame activations; folded into the countdown at frame end.
    pub active_next_frame: bool,
    /// Pixels in this chunk need re-packing even if nothing moved.
    pub visual_dirty: bool,
    countdown: u32,
}

impl Chunk {
    fn new(chunk_x: i32, chunk_y: i32, world_w: i32, world_h: i32) -> Self {
        let left = chunk_x * CHUNK_SIZE;
        let top = chunk_y * CHUNK_SIZE;
        Self {
            chunk_x,
            chunk_y,
            left,
            top,
            right: (left + CHUNK_SIZE - 1).min(world_w - 1),
            bottom: (top + CHUNK_SIZE - 1).min(world_h - 1),
            // everything is processed and rendered once on the first frame
            active: true,
            was_active: true,
            active_next_frame: false,
            visual_dirty: true,
            countdown: 0,
        }
    }

    #[inline]
    fn activate(&mut self) {
        self.active = true;
        self.active_next_frame = true;
        self.visual_dirty = true;
    }

    fn step_activity(&mut self) {
        if self.active_next_frame {
            self.countdown = CHUNK_KEEPALIVE;
        } else if self.countdown > 0 {
            self.countdown -= 1;
        }
        self.active = self.countdown > 0;
        self.active_next_frame = false;
    }
}

/// Owns the chunk tiling for one grid and the per-frame activity discipline.
pub struct ChunkGrid {
    chunks_x: i32,
    chunks_y: i32,
    chunks: Vec<Chunk>,
}

impl ChunkGrid {
    pub fn new(world_w: i32, world_h: i32) -> Self {
        let chunks_x = (world_w + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let chunks_y = (world_h + CHUNK_SIZE - 1) / CHUNK_SIZE;
        let mut chunks = Vec::with_capacity((chunks_x * chunks_y) as usize);
        for cy in 0..chunks_y {
            for cx in 0..chunks_x {
                chunks.push(Chunk::new(cx, cy, world_w, world_h));
            }
        }
        Self {
            chunks_x,
            chunks_y,
            chunks,
        }
    }

    // === Indexing ===

    #[inline]
    pub fn dimensions(&self) -> (i32, i32) {
        (self.chunks_x, self.chunks_y)
    }

    #[inline]
    pub fn total_chunks(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    fn chunk_idx(&self, cx: i32, cy: i32) -> usize {
        (cy * self.chunks_x + cx) as usize
    }

    #[inline]
    pub fn in_chunk_bounds(&self, cx: i32, cy: i32) -> bool {
        cx >= 0 && cx < self.chunks_x && cy >= 0 && cy < self.chunks_y
    }

    #[inline]
    pub fn chunk(&self, cx: i32, cy: i32) -> &Chunk {
        &self.chunks[self.chunk_idx(cx, cy)]
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    // === Activation ===

    /// Activate the chunk containing `(x, y)`, plus the adjacent chunk on
    /// each chunk edge the cell sits on. This is the sole mechanism by which
    /// rules propagate work into neighboring regions.
    pub fn activate_at(&mut self, x: i32, y: i32) {
        let cx = x / CHUNK_SIZE;
        let cy = y / CHUNK_SIZE;
        if x < 0 || y < 0 || !self.in_chunk_bounds(cx, cy) {
            return;
        }
        let idx = self.chunk_idx(cx, cy);
        self.chunks[idx].activate();

        let on_left = x % CHUNK_SIZE == 0;
        let on_right = x % CHUNK_SIZE == CHUNK_SIZE - 1;
        let on_top = y % CHUNK_SIZE == 0;
        let on_bottom = y % CHUNK_SIZE == CHUNK_SIZE - 1;

        if on_left && self.in_chunk_bounds(cx - 1, cy) {
            let i = self.chunk_idx(cx - 1, cy);
            self.chunks[i].activate();
        }
        if on_right && self.in_chunk_bounds(cx + 1, cy) {
            let i = self.chunk_idx(cx + 1, cy);
            self.chunks[i].activate();
        }
        if on_top && self.in_chunk_bounds(cx, cy - 1) {
            let i = self.chunk_idx(cx, cy - 1);
            self.chunks[i].activate();
        }
        if on_bottom && self.in_chunk_bounds(cx, cy + 1) {
            let i = self.chunk_idx(cx, cy + 1);
            self.chunks[i].activate();
        }
    }

    // === Frame discipline ===

    /// Snapshot the active set; only chunks in the snapshot are dispatched
    /// this frame, so a mid-frame activation cannot extend the current pass.
    pub fn begin_frame(&mut self) {
        for chunk in &mut self.chunks {
            chunk.was_active = chunk.active;
        }
    }

    /// Fold activations into countdowns and derive next frame's active set.
    pub fn end_frame(&mut self) {
        for chunk in &mut self.chunks {
            chunk.step_activity();
        }
    }

    /// True if any chunk in chunk-row `cy` was snapshotted active.
    pub fn row_has_work(&self, cy: i32) -> bool {
        let start = (cy * self.chunks_x) as usize;
        self.chunks[start..start + self.chunks_x as usize]
            .iter()
            .any(|c| c.was_active)
    }

    #[inline]
    pub fn is_processing(&self, cx: i32, cy: i32) -> bool {
        self.chunks[self.chunk_idx(cx, cy)].was_active
    }

    pub fn clear_visual_dirty(&mut self, idx: usize) {
        self.chunks[idx].visual_dirty = false;
    }

    // === Statistics ===

    pub fn active_chunk_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.active).count()
    }

    /// Back to the post-construction state (everything awake once).
    pub fn reset(&mut self) {
        for chunk in &mut self.chunks {
            chunk.active = true;
            chunk.was_active = true;
            chunk.active_next_frame = false;
            chunk.visual_dirty = true;
            chunk.countdown = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiesce(chunks: &mut ChunkGrid) {
        chunks.begin_frame();
        chunks.end_frame();
        assert_eq!(chunks.active_chunk_count(), 0);
    }

    #[test]
    fn layout_covers_and_clips() {
        let chunks = ChunkGrid::new(40, 20);
        assert_eq!(chunks.dimensions(), (3, 2));
        let last = chunks.chunk(2, 1);
        assert_eq!(last.left, 32);
        assert_eq!(last.right, 39);
        assert_eq!(last.bottom, 19);
    }

    #[test]
    fn interior_activation_wakes_one_chunk() {
        let mut chunks = ChunkGrid::new(64, 64);
        quiesce(&mut chunks);
        chunks.activate_at(8, 8);
        assert_eq!(chunks.active_chunk_count(), 1);
        assert!(chunks.chunk(0, 0).active);
    }

    #[test]
    fn edge_activation_wakes_the_neighbor() {
        let mut chunks = ChunkGrid::new(64, 64);
        quiesce(&mut chunks);
        chunks.activate_at(CHUNK_SIZE - 1, 8);
        assert_eq!(chunks.active_chunk_count(), 2);
        assert!(chunks.chunk(0, 0).active);
        assert!(chunks.chunk(1, 0).active);
    }

    #[test]
    fn corner_activation_wakes_both_side_neighbors() {
        let mut chunks = ChunkGrid::new(64, 64);
        quiesce(&mut chunks);
        chunks.activate_at(CHUNK_SIZE, CHUNK_SIZE);
        // containing chunk plus left and top neighbors
        assert_eq!(chunks.active_chunk_count(), 3);
    }

    #[test]
    fn out_of_grid_activation_is_ignored() {
        let mut chunks = ChunkGrid::new(32, 32);
        quiesce(&mut chunks);
        chunks.activate_at(-1, 5);
        chunks.activate_at(5, 400);
        assert_eq!(chunks.active_chunk_count(), 0);
    }

    #[test]
    fn countdown_keeps_chunk_alive_then_expires() {
        let mut chunks = ChunkGrid::new(32, 32);
        quiesce(&mut chunks);
        chunks.activate_at(5, 5);

        // first frame folds the activation into a fresh countdown
        chunks.begin_frame();
        chunks.end_frame();
        assert!(chunks.chunk(0, 0).active);

        // the chunk then survives KEEPALIVE-1 further idle frames
        for _ in 0..CHUNK_KEEPALIVE - 1 {
            chunks.begin_frame();
            chunks.end_frame();
            assert!(chunks.chunk(0, 0).active);
        }
        chunks.begin_frame();
        chunks.end_frame();
        assert!(!chunks.chunk(0, 0).active);
    }

    #[test]
    fn reactivation_refreshes_the_countdown() {
        let mut chunks = ChunkGrid::new(32, 32);
        quiesce(&mut chunks);
        chunks.activate_at(5, 5);
        for _ in 0..5 {
            chunks.begin_frame();
            chunks.end_frame();
        }
        chunks.activate_at(5, 5);
        for _ in 0..CHUNK_KEEPALIVE {
            chunks.begin_frame();
            chunks.end_frame();
            assert!(chunks.chunk(0, 0).active);
        }
        // one more idle frame past the refreshed countdown and it expires
        chunks.begin_frame();
        chunks.end_frame();
        assert!(!chunks.chunk(0, 0).active);
    }

    #[test]
    fn snapshot_gates_mid_frame_activations() {
        let mut chunks = ChunkGrid::new(64, 64);
        quiesce(&mut chunks);
        chunks.begin_frame();
        chunks.activate_at(40, 40); // mid-frame
        assert!(!chunks.is_processing(2, 2));
        chunks.end_frame();
        assert!(chunks.chunk(2, 2).active);
    }

    #[test]
    fn fresh_grid_is_fully_awake_once() {
        let chunks = ChunkGrid::new(48, 48);
        assert_eq!(chunks.active_chunk_count(), chunks.total_chunks());
        assert!(chunks.chunks().iter().all(|c| c.was_active && c.visual_dirty));
    }
}
