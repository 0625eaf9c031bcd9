//! Grid - the owned W x H cell array and its mutation contract
//!
//! Every slot always holds exactly one element by value; there are no nulls
//! and no per-cell allocation. Swap is a value swap that rewrites both
//! stored positions, marks both cells updated and activates the touched
//! chunks; place destroys the old element in place. All public entries are
//! bounds-checked and out-of-bounds mutations are silent no-ops.

use crate::cell::Cell;
use crate::chunks::ChunkGrid;
use crate::elements::{ElementFactory, ElementType};
use crate::rng::ElementRng;

pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Fully populated with `Empty` cells.
    pub fn new(
        width: i32,
        height: i32,
        factory: &ElementFactory,
        rng: &mut ElementRng,
        not_updated_step: bool,
    ) -> Self {
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(factory.create(ElementType::Empty, x, y, rng, not_updated_step));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    // === Dimensions ===

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    // === Bounds and reads ===

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Unchecked-by-contract accessor for rule code that has already done
    /// the bounds check. Still panics in debug if the contract is broken.
    #[inline]
    pub(crate) fn cell(&self, x: i32, y: i32) -> &Cell {
        debug_assert!(self.in_bounds(x, y), "cell({}, {}) out of bounds", x, y);
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> &mut Cell {
        debug_assert!(self.in_bounds(x, y), "cell_mut({}, {}) out of bounds", x, y);
        let idx = self.index(x, y);
        &mut self.cells[idx]
    }

    /// Element tag at `(x, y)`; `Empty` when out of bounds, so neighbor scans
    /// can treat the border as inert.
    #[inline]
    pub fn get_type(&self, x: i32, y: i32) -> ElementType {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)].element_type()
        } else {
            ElementType::Empty
        }
    }

    #[inline]
    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[self.index(x, y)].is_empty()
    }

    /// Updated-this-step check against the engine's step bit.
    #[inline]
    pub fn is_updated(&self, x: i32, y: i32, step: bool) -> bool {
        self.in_bounds(x, y) && self.cells[self.index(x, y)].step == step
    }

    // === Mutations ===

    /// Exchange two cells. Rewrites both stored positions, marks both as
    /// updated this step and activates both containing chunks (plus edge
    /// neighbors). Same-coordinate and out-of-bounds calls are no-ops.
    pub fn swap(
        &mut self,
        chunks: &mut ChunkGrid,
        step: bool,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
    ) {
        if x1 == x2 && y1 == y2 {
            return;
        }
        if !self.in_bounds(x1, y1) || !self.in_bounds(x2, y2) {
            return;
        }
        let idx1 = self.index(x1, y1);
        let idx2 = self.index(x2, y2);
        self.cells.swap(idx1, idx2);

        let a = &mut self.cells[idx1];
        a.x = x1;
        a.y = y1;
        a.step = step;
        let b = &mut self.cells[idx2];
        b.x = x2;
        b.y = y2;
        b.step = step;

        chunks.activate_at(x1, y1);
        chunks.activate_at(x2, y2);
    }

    /// Overwrite `(x, y)` with a fresh element of `t`. Idempotent when the
    /// cell already holds the same type; silent no-op out of bounds.
    pub fn place(
        &mut self,
        chunks: &mut ChunkGrid,
        factory: &ElementFactory,
        rng: &mut ElementRng,
        t: ElementType,
        x: i32,
        y: i32,
        not_updated_step: bool,
    ) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        if self.cells[idx].element_type() == t {
            return;
        }
        self.cells[idx] = factory.create(t, x, y, rng, not_updated_step);
        chunks.activate_at(x, y);
    }

    /// Disk brush: `dx^2 + dy^2 <= max(1, r^2 - 1)`, degenerating to a
    /// single cell at radius 1.
    pub fn place_area(
        &mut self,
        chunks: &mut ChunkGrid,
        factory: &ElementFactory,
        rng: &mut ElementRng,
        t: ElementType,
        cx: i32,
        cy: i32,
        radius: i32,
        not_updated_step: bool,
    ) {
        let r2 = (radius * radius - 1).max(1);
        if r2 == 1 {
            self.place(chunks, factory, rng, t, cx, cy, not_updated_step);
            return;
        }
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= r2 {
                    self.place(chunks, factory, rng, t, cx + dx, cy + dy, not_updated_step);
                }
            }
        }
    }

    /// Replace with `Empty`.
    pub fn destroy(
        &mut self,
        chunks: &mut ChunkGrid,
        factory: &ElementFactory,
        rng: &mut ElementRng,
        x: i32,
        y: i32,
        not_updated_step: bool,
    ) {
        self.place(chunks, factory, rng, ElementType::Empty, x, y, not_updated_step);
    }

    /// Overwrite a slot with an already-built cell (revert paths that carry
    /// state over, e.g. a ballistic shell settling back into its element).
    pub(crate) fn put_cell(&mut self, chunks: &mut ChunkGrid, mut cell: Cell, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        cell.x = x;
        cell.y = y;
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        chunks.activate_at(x, y);
    }

    /// Reset every cell to `Empty`.
    pub fn clear(
        &mut self,
        factory: &ElementFactory,
        rng: &mut ElementRng,
        not_updated_step: bool,
    ) {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                self.cells[idx] =
                    factory.create(ElementType::Empty, x, y, rng, not_updated_step);
            }
        }
    }

    pub(crate) fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(w: i32, h: i32) -> (Grid, ChunkGrid, ElementFactory, ElementRng) {
        let factory = ElementFactory::without_textures();
        let mut rng = ElementRng::from_seed(77);
        let grid = Grid::new(w, h, &factory, &mut rng, true);
        let chunks = ChunkGrid::new(w, h);
        (grid, chunks, factory, rng)
    }

    #[test]
    fn starts_fully_populated_with_empty() {
        let (grid, ..) = fixture(8, 6);
        for y in 0..6 {
            for x in 0..8 {
                let cell = grid.get(x, y).unwrap();
                assert!(cell.is_empty());
                assert_eq!(cell.position(), (x, y));
            }
        }
    }

    #[test]
    fn out_of_bounds_reads_are_typed_none() {
        let (grid, ..) = fixture(4, 4);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert_eq!(grid.get_type(99, 99), ElementType::Empty);
        assert!(!grid.is_empty(-1, -1));
    }

    #[test]
    fn place_constructs_and_is_idempotent() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 3, 3, true);
        let first_color = grid.get(3, 3).unwrap().color;
        assert_eq!(grid.get_type(3, 3), ElementType::Sand);

        // same type again: the cell must not be reconstructed (jitter would
        // almost surely re-roll the color)
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 3, 3, true);
        assert_eq!(grid.get(3, 3).unwrap().color, first_color);
    }

    #[test]
    fn place_out_of_bounds_is_a_silent_noop() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, -5, 3, true);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 3, 800, true);
        for cell in grid.cells() {
            assert!(cell.is_empty());
        }
    }

    #[test]
    fn destroy_yields_empty() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Wood, 2, 2, true);
        grid.destroy(&mut chunks, &factory, &mut rng, 2, 2, true);
        assert!(grid.is_empty(2, 2));
    }

    #[test]
    fn swap_rewrites_positions_and_marks_updated() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 1, 1, true);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Water, 5, 5, true);

        grid.swap(&mut chunks, true, 1, 1, 5, 5);
        assert_eq!(grid.get_type(1, 1), ElementType::Water);
        assert_eq!(grid.get_type(5, 5), ElementType::Sand);
        assert_eq!(grid.get(1, 1).unwrap().position(), (1, 1));
        assert_eq!(grid.get(5, 5).unwrap().position(), (5, 5));
        assert!(grid.is_updated(1, 1, true));
        assert!(grid.is_updated(5, 5, true));
    }

    #[test]
    fn double_swap_restores_identities() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 1, 1, true);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Coal, 2, 1, true);
        let sand_color = grid.get(1, 1).unwrap().color;
        let coal_color = grid.get(2, 1).unwrap().color;

        grid.swap(&mut chunks, true, 1, 1, 2, 1);
        grid.swap(&mut chunks, true, 1, 1, 2, 1);

        assert_eq!(grid.get_type(1, 1), ElementType::Sand);
        assert_eq!(grid.get(1, 1).unwrap().color, sand_color);
        assert_eq!(grid.get(2, 1).unwrap().color, coal_color);
    }

    #[test]
    fn self_swap_and_oob_swap_are_noops() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place(&mut chunks, &factory, &mut rng, ElementType::Sand, 1, 1, false);
        grid.swap(&mut chunks, true, 1, 1, 1, 1);
        // self-swap must not even mark the cell updated
        assert!(!grid.is_updated(1, 1, true));
        grid.swap(&mut chunks, true, 1, 1, 99, 1);
        assert_eq!(grid.get_type(1, 1), ElementType::Sand);
    }

    #[test]
    fn place_area_is_a_disk_with_degenerate_radius_one() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(16, 16);
        grid.place_area(&mut chunks, &factory, &mut rng, ElementType::Stone, 8, 8, 1, true);
        let placed: usize = grid.cells().iter().filter(|c| !c.is_empty()).count();
        assert_eq!(placed, 1);

        let (mut grid, mut chunks, factory, mut rng) = fixture(16, 16);
        grid.place_area(&mut chunks, &factory, &mut rng, ElementType::Stone, 8, 8, 3, true);
        let r2 = 3 * 3 - 1;
        for y in 0..16 {
            for x in 0..16 {
                let dx = x - 8;
                let dy = y - 8;
                let inside = dx * dx + dy * dy <= r2;
                assert_eq!(
                    grid.get_type(x, y) == ElementType::Stone,
                    inside,
                    "at ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn place_area_clips_at_the_border() {
        let (mut grid, mut chunks, factory, mut rng) = fixture(8, 8);
        grid.place_area(&mut chunks, &factory, &mut rng, ElementType::Dirt, 0, 0, 3, true);
        assert_eq!(grid.get_type(0, 0), ElementType::Dirt);
        assert!(grid.cells().iter().all(|c| {
            let (x, y) = c.position();
            grid.in_bounds(x, y)
        }));
    }
}
