//! Per-category movement and reaction rules
//!
//! One file per category. Dispatch is a plain match on the element tag; the
//! shared header work (step-flag guard, movement-flag bookkeeping, swap
//! notifications) lives here so the category files only contain their rules.

mod ballistic;
mod fire;
mod gas;
mod liquid;
mod powder;

pub(crate) use ballistic::make_ballistic;

use crate::cell::ElementState;
use crate::chunks::ChunkGrid;
use crate::elements::{Category, ElementFactory, ElementType};
use crate::grid::Grid;
use crate::particles::ParticlePool;
use crate::rng::ElementRng;

/// Gravitational acceleration per frame, in cells.
pub(crate) const GRAVITY: f32 = 0.2;

/// Clamp for vertical fall speed.
pub(crate) const MAX_FALL_SPEED: f32 = 10.0;

/// Everything a rule may touch during one cell update.
pub struct UpdateContext<'a> {
    pub grid: &'a mut Grid,
    pub chunks: &'a mut ChunkGrid,
    pub rng: &'a mut ElementRng,
    pub particles: &'a mut ParticlePool,
    pub factory: &'a ElementFactory,
    /// The engine's step bit for this frame.
    pub step: bool,
    pub x: i32,
    pub y: i32,
}

impl<'a> UpdateContext<'a> {
    /// Step-flag value meaning "not updated yet" for cells born mid-frame.
    #[inline]
    pub fn fresh_step(&self) -> bool {
        !self.step
    }

    /// Swap `(x1, y1)` with `(x2, y2)` through the grid API, marking any
    /// movable participant as moving.
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        for &(x, y) in &[(x1, y1), (x2, y2)] {
            if let Some(cell) = self.grid.get_mut(x, y) {
                if let Some(falling) = cell.state.as_falling_mut() {
                    falling.is_moving = true;
                    falling.moved_this_frame = true;
                }
            }
        }
        self.grid.swap(self.chunks, self.step, x1, y1, x2, y2);
    }

    /// Construct a fresh element at `(x, y)`.
    pub fn place(&mut self, t: ElementType, x: i32, y: i32) {
        let fresh = self.fresh_step();
        self.grid
            .place(self.chunks, self.factory, self.rng, t, x, y, fresh);
    }

    /// Replace `(x, y)` with `Empty`.
    pub fn destroy(&mut self, x: i32, y: i32) {
        let fresh = self.fresh_step();
        self.grid
            .destroy(self.chunks, self.factory, self.rng, x, y, fresh);
    }

    /// Notify the two horizontal neighbors that this element moved; each may
    /// wake up depending on its inertial resistance. Activates both
    /// neighboring chunks either way.
    pub fn notify_neighbors(&mut self, x: i32, y: i32) {
        for nx in [x - 1, x + 1] {
            if !self.grid.in_bounds(nx, y) {
                continue;
            }
            let resistance = self.grid.cell(nx, y).element_type().props().inertial_resistance;
            let wakes = !self.rng.random_chance(resistance);
            if let Some(falling) = self.grid.cell_mut(nx, y).state.as_falling_mut() {
                if wakes {
                    falling.is_moving = true;
                }
            }
            self.chunks.activate_at(nx, y);
        }
    }

    /// Hand the current vertical velocity to a movable directly above,
    /// reduced by the receiver's impact absorption.
    pub fn share_momentum_up(&mut self, x: i32, y: i32, velocity_y: f32) {
        if let Some(above) = self.grid.get_mut(x, y - 1) {
            let absorb = above.element_type().props().impact_absorption;
            if let Some(falling) = above.state.as_falling_mut() {
                falling.velocity_y = velocity_y * (1.0 - absorb);
            }
        }
    }
}

/// Dispatch one cell update: once-per-step guard, then the category rule.
pub fn update_cell(ctx: &mut UpdateContext) {
    let cell = ctx.grid.cell(ctx.x, ctx.y);
    if cell.step == ctx.step {
        return; // already updated this step
    }
    let t = cell.element_type();
    ctx.grid.cell_mut(ctx.x, ctx.y).step = ctx.step;

    match t.category() {
        Category::Static => {}
        Category::Powder => powder::update(ctx, t),
        Category::Liquid => liquid::update(ctx, t),
        Category::Gas => gas::update(ctx, t),
        Category::Reactive => fire::update(ctx),
        Category::Particle => ballistic::update(ctx),
    }
}

/// Begin-of-update bookkeeping for the falling categories: remember whether
/// the element was moving and reset the per-frame moved flag.
pub(crate) fn refresh_movement_flags(ctx: &mut UpdateContext) {
    if let Some(falling) = ctx.grid.cell_mut(ctx.x, ctx.y).state.as_falling_mut() {
        falling.was_moving = falling.is_moving;
        falling.moved_this_frame = false;
    }
}

/// Accumulator-driven descent shared by powders and liquids.
///
/// Applies gravity, accumulates sub-cell motion, then steps downward through
/// consecutive swappable cells, stopping at the first blocker. Returns the
/// row the element ended on, or `None` when the cell below is not swappable
/// at all (the grounded case).
pub(crate) fn fall(
    ctx: &mut UpdateContext,
    my_type: ElementType,
    can_swap: fn(&UpdateContext, ElementType, i32, i32) -> bool,
) -> Option<i32> {
    let (x, y) = (ctx.x, ctx.y);
    if !can_swap(ctx, my_type, x, y + 1) {
        if let Some(falling) = ctx.grid.cell_mut(x, y).state.as_falling_mut() {
            falling.velocity_y = 0.0;
            falling.accumulated_y = 0.0;
        }
        return None;
    }

    let delta_y = {
        let Some(falling) = ctx.grid.cell_mut(x, y).state.as_falling_mut() else {
            return Some(y);
        };
        falling.is_moving = true;
        falling.velocity_y = (falling.velocity_y + GRAVITY).clamp(-MAX_FALL_SPEED, MAX_FALL_SPEED);
        falling.accumulated_y += falling.velocity_y;
        falling.accumulated_y as i32
    };

    if delta_y == 0 {
        return Some(y);
    }

    let mut last_valid = y;
    for i in 1..=delta_y {
        if can_swap(ctx, my_type, x, y + i) {
            last_valid = y + i;
        } else {
            break;
        }
    }

    if last_valid != y {
        let velocity_y = ctx.grid.cell(x, y).state.velocity_y();
        ctx.share_momentum_up(x, y, velocity_y);
        ctx.swap(x, y, x, last_valid);
        ctx.notify_neighbors(x, last_valid);
        if let Some(falling) = ctx.grid.cell_mut(x, last_valid).state.as_falling_mut() {
            falling.accumulated_y -= (last_valid - y) as f32;
        }
    }
    Some(last_valid)
}

/// Density of the movable at `(x, y)`, if any. Buoyancy only ever compares
/// against movables; statics report nothing.
pub(crate) fn movable_density(ctx: &UpdateContext, x: i32, y: i32) -> Option<f32> {
    let t = ctx.grid.get(x, y)?.element_type();
    if t.is_movable() {
        Some(t.density())
    } else {
        None
    }
}

/// Shorthand for "this target has already been updated this step".
pub(crate) fn updated(ctx: &UpdateContext, x: i32, y: i32) -> bool {
    ctx.grid.is_updated(x, y, ctx.step)
}

pub(crate) fn zero_vertical_motion(state: &mut ElementState) {
    if let Some(falling) = state.as_falling_mut() {
        falling.velocity_y = 0.0;
        falling.accumulated_y = 0.0;
    }
}
