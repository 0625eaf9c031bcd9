//! In-grid ballistic shells
//!
//! A `PhysicsParticle` temporarily replaces a cell while remembering the
//! element it stands for. It flies with full x/y velocity, bounces off
//! blockers, and once effectively stationary rewrites the cell with a fresh
//! instance of the represented type carrying the shell's color.

use super::{UpdateContext, GRAVITY};
use crate::cell::{BallisticState, Cell, ElementState};
use crate::elements::Category;

/// Velocity retained after bouncing off a blocker.
const BOUNCE_DAMPING: f32 = 0.7;

/// Below this speed on both axes (and without a move this frame) the shell
/// reverts to its represented element.
const MIN_VELOCITY_THRESHOLD: f32 = 0.1;

/// Drag applied to both axes each frame.
const AIR_RESISTANCE: f32 = 0.99;

const MAX_SPEED: f32 = 10.0;

/// Shells pass through empty cells, gases and liquids only.
fn can_swap(ctx: &UpdateContext, x: i32, y: i32) -> bool {
    let Some(target) = ctx.grid.get(x, y) else {
        return false;
    };
    if target.is_empty() {
        return true;
    }
    matches!(
        target.element_type().category(),
        Category::Gas | Category::Liquid
    )
}

pub(super) fn update(ctx: &mut UpdateContext) {
    let (x, y) = (ctx.x, ctx.y);
    let mut state = match ctx.grid.cell(x, y).state {
        ElementState::PhysicsParticle(b) => b,
        _ => return,
    };

    state.moved_this_frame = false;
    state.velocity_x = (state.velocity_x * AIR_RESISTANCE).clamp(-MAX_SPEED, MAX_SPEED);
    state.velocity_y =
        (state.velocity_y * AIR_RESISTANCE + GRAVITY).clamp(-MAX_SPEED, MAX_SPEED);
    state.accumulated_x += state.velocity_x;
    state.accumulated_y += state.velocity_y;
    let move_x = state.accumulated_x as i32;
    let move_y = state.accumulated_y as i32;

    let mut cur_x = x;

    if move_x != 0 {
        let target_x = x + move_x;
        if can_swap(ctx, target_x, y) {
            ctx.swap(x, y, target_x, y);
            state.accumulated_x -= move_x as f32;
            state.moved_this_frame = true;
            cur_x = target_x;
        } else {
            state.velocity_x = -state.velocity_x * BOUNCE_DAMPING;
            state.accumulated_x = 0.0;
        }
    }

    let mut cur_y = y;
    if move_y != 0 {
        let target_y = y + move_y;
        if can_swap(ctx, cur_x, target_y) {
            ctx.swap(cur_x, y, cur_x, target_y);
            state.accumulated_y -= move_y as f32;
            state.moved_this_frame = true;
            cur_y = target_y;
        } else {
            state.velocity_y = -state.velocity_y * BOUNCE_DAMPING;
            state.accumulated_y = 0.0;
        }
    }

    let stationary = state.velocity_x.abs() < MIN_VELOCITY_THRESHOLD
        && state.velocity_y.abs() < MIN_VELOCITY_THRESHOLD
        && !state.moved_this_frame;

    if stationary {
        revert(ctx, state, cur_x, cur_y);
        return;
    }

    ctx.grid.cell_mut(cur_x, cur_y).state = ElementState::PhysicsParticle(state);
}

/// Rewrite the cell with a fresh instance of the represented type, keeping
/// the color the shell has been wearing.
fn revert(ctx: &mut UpdateContext, state: BallisticState, x: i32, y: i32) {
    let shell_color = ctx.grid.cell(x, y).color;
    let fresh = ctx.fresh_step();
    let mut cell = ctx
        .factory
        .create(state.represented, x, y, ctx.rng, fresh);
    cell.color = shell_color;
    cell.original_color = shell_color;
    ctx.grid.put_cell(ctx.chunks, cell, x, y);
}

/// Turn an existing cell into a flying shell that remembers it.
pub(crate) fn make_ballistic(
    source: &Cell,
    velocity_x: f32,
    velocity_y: f32,
    not_updated_step: bool,
) -> Cell {
    Cell {
        state: ElementState::PhysicsParticle(BallisticState {
            represented: source.element_type(),
            velocity_x,
            velocity_y,
            accumulated_x: 0.0,
            accumulated_y: 0.0,
            moved_this_frame: false,
        }),
        color: source.color,
        original_color: source.original_color,
        x: source.x,
        y: source.y,
        step: not_updated_step,
    }
}
