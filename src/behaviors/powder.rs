//! Powder rules: sand, dirt, coal, salt, ash
//!
//! Powders fall with accumulator gravity, pile by rolling diagonally when
//! grounded, sink through lighter liquids and bubble up through denser ones.
//! Friction decides when a grounded grain stops; a neighbor's movement can
//! shake it loose again (inertial resistance). Salt additionally dissolves
//! into adjacent water.

use super::{fall, movable_density, refresh_movement_flags, zero_vertical_motion, UpdateContext};
use crate::elements::{Category, ElementType};

/// Chance per frame that salt dissolves into a neighboring carrier.
const SALT_DISSOLVE_CHANCE: f32 = 0.005;

/// Carrier-empty solvent neighbors required before dissolution may fire.
const SALT_DISSOLVE_THRESHOLD: usize = 1;

/// Powder swap eligibility: empty always; liquids and gases yes (density is
/// buoyancy's concern, not eligibility's); never the same type, powders or
/// statics.
fn can_swap(ctx: &UpdateContext, my_type: ElementType, x: i32, y: i32) -> bool {
    let Some(target) = ctx.grid.get(x, y) else {
        return false;
    };
    if target.is_empty() {
        return true;
    }
    let t = target.element_type();
    if t == my_type {
        return false;
    }
    matches!(t.category(), Category::Liquid | Category::Gas)
}

pub(super) fn update(ctx: &mut UpdateContext, my_type: ElementType) {
    refresh_movement_flags(ctx);

    if my_type == ElementType::Salt && try_dissolve(ctx) {
        return;
    }

    if handle_buoyancy(ctx, my_type) {
        return;
    }

    let (x, y) = (ctx.x, ctx.y);
    if fall(ctx, my_type, can_swap).is_none() {
        handle_grounded(ctx, my_type, x, y);
    }
}

/// Density exchange with the movable directly above. A grain lighter than
/// its upstairs neighbor rises (straight up, or sideways to make room); a
/// denser one presses downward.
fn handle_buoyancy(ctx: &mut UpdateContext, my_type: ElementType) -> bool {
    let (x, y) = (ctx.x, ctx.y);
    let Some(above_density) = movable_density(ctx, x, y - 1) else {
        return false;
    };
    let diff = my_type.density() - above_density;

    if diff < 0.0 {
        let chance = diff.abs();
        if can_swap(ctx, my_type, x, y - 1) && ctx.rng.random_chance(chance) {
            ctx.swap(x, y, x, y - 1);
            zero_vertical_motion(&mut ctx.grid.cell_mut(x, y - 1).state);
            return true;
        }
        let dir = ctx.rng.random_direction();
        if can_swap(ctx, my_type, x + dir, y) && ctx.rng.random_chance(chance) {
            ctx.swap(x, y, x + dir, y);
            zero_vertical_motion(&mut ctx.grid.cell_mut(x + dir, y).state);
            return true;
        }
    } else if can_swap(ctx, my_type, x, y + 1) && ctx.rng.random_chance(diff) {
        ctx.swap(x, y, x, y + 1);
        zero_vertical_motion(&mut ctx.grid.cell_mut(x, y + 1).state);
        return true;
    }
    false
}

/// Blocked below: maybe settle, otherwise roll down a random diagonal.
fn handle_grounded(ctx: &mut UpdateContext, my_type: ElementType, x: i32, y: i32) {
    let is_moving = ctx
        .grid
        .cell_mut(x, y)
        .state
        .as_falling_mut()
        .map(|f| f.is_moving)
        .unwrap_or(false);
    if !is_moving {
        return;
    }

    if ctx.rng.random_chance(my_type.props().friction) {
        if let Some(falling) = ctx.grid.cell_mut(x, y).state.as_falling_mut() {
            falling.is_moving = false;
        }
        return;
    }

    let dir = ctx.rng.random_direction();
    for tx in [x + dir, x - dir] {
        if can_swap(ctx, my_type, tx, y + 1) {
            ctx.swap(x, y, tx, y + 1);
            ctx.notify_neighbors(tx, y + 1);
            return;
        }
    }
}

/// Salt melts into a neighboring solvent cell whose carrier slot is free.
/// Requires `SALT_DISSOLVE_THRESHOLD` such neighbors before the roll fires.
fn try_dissolve(ctx: &mut UpdateContext) -> bool {
    let (x, y) = (ctx.x, ctx.y);
    let mut carriers: [(i32, i32); 8] = [(0, 0); 8];
    let mut count = 0;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            let Some(cell) = ctx.grid.get(nx, ny) else {
                continue;
            };
            if cell.element_type() != ElementType::Water {
                continue;
            }
            if let Some(liquid) = cell.state.as_liquid() {
                if liquid.dissolved == ElementType::Empty {
                    carriers[count] = (nx, ny);
                    count += 1;
                }
            }
        }
    }

    if count < SALT_DISSOLVE_THRESHOLD {
        return false;
    }
    // dissolving is ongoing activity: keep the chunk awake until it fires
    ctx.chunks.activate_at(x, y);
    if !ctx.rng.random_chance(SALT_DISSOLVE_CHANCE) {
        return false;
    }

    let (nx, ny) = carriers[ctx.rng.random_int(0, count as i32 - 1) as usize];
    if let Some(liquid) = ctx.grid.cell_mut(nx, ny).state.as_liquid_mut() {
        liquid.dissolved = ElementType::Salt;
    }
    ctx.destroy(x, y);
    true
}
