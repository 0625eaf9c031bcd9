//! Liquid rules: water, oil
//!
//! No pressure model; liquids fall, equalize by scanning sideways up to
//! their dispersion rate and sliding into the lowest reachable spot, and
//! sort themselves by density (a denser liquid above a lighter one swaps
//! down through it over a few frames). A solvent liquid carries at most one
//! dissolved tag and spreads it to carrier-free neighbors by diffusion.

use super::{fall, refresh_movement_flags, updated, zero_vertical_motion, UpdateContext};
use crate::elements::{Category, ElementType};

/// Chance per step that a carried dissolved tag diffuses to a neighbor.
const DIFFUSION_CHANCE: f32 = 0.2;

/// Hard cap on how far a spreading liquid may slide down in one step.
const MAX_SLIDE_DEPTH: i32 = 20;

/// Liquid swap eligibility: empty always; another liquid only when this one
/// is strictly denser. Powders handle density sinking themselves; gases and
/// statics block. The updated-this-step guard lives on the buoyancy path,
/// whose target sits above and has not been dispatched yet.
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
    t.category() == Category::Liquid && my_type.density() > t.density()
}

pub(super) fn update(ctx: &mut UpdateContext, my_type: ElementType) {
    refresh_movement_flags(ctx);

    if try_diffuse_dissolved(ctx, my_type) {
        return;
    }

    if handle_buoyancy(ctx, my_type) {
        return;
    }

    let (x, y) = (ctx.x, ctx.y);
    if fall(ctx, my_type, can_swap).is_none() {
        handle_spreading(ctx, my_type, x, y);
    }
}

/// A denser liquid of the same category sitting directly above swaps down
/// through this one with probability equal to the density difference.
fn handle_buoyancy(ctx: &mut UpdateContext, my_type: ElementType) -> bool {
    let (x, y) = (ctx.x, ctx.y);
    let Some(above) = ctx.grid.get(x, y - 1) else {
        return false;
    };
    let above_type = above.element_type();
    if above_type == my_type
        || above_type.category() != Category::Liquid
        || updated(ctx, x, y - 1)
    {
        return false;
    }
    let diff = my_type.density() - above_type.density();
    if diff < 0.0 && ctx.rng.random_chance(diff.abs()) {
        ctx.swap(x, y, x, y - 1);
        zero_vertical_motion(&mut ctx.grid.cell_mut(x, y - 1).state);
        return true;
    }
    false
}

/// Grounded: diagonal slide first, then the scan-and-slide dispersion walk.
fn handle_spreading(ctx: &mut UpdateContext, my_type: ElementType, x: i32, y: i32) {
    let dir = ctx.rng.random_direction();

    for tx in [x + dir, x - dir] {
        if can_swap(ctx, my_type, tx, y + 1) {
            ctx.swap(x, y, tx, y + 1);
            return;
        }
    }

    // Weighted-random maximum distance: weight k proportional to k, so far
    // columns are likelier but never certain.
    let rate = my_type.props().dispersion_rate.max(1);
    let total_weight = rate * (rate + 1) / 2;
    let roll = ctx.rng.random_int(1, total_weight);
    let mut distance = 1;
    let mut acc = 0;
    for k in 1..=rate {
        acc += k;
        if roll <= acc {
            distance = k;
            break;
        }
    }

    for sign in [dir, -dir] {
        let mut landing = x;
        for i in 1..=distance {
            let tx = x + sign * i;
            if can_swap(ctx, my_type, tx, y) {
                landing = tx;
            } else {
                break;
            }
        }
        if landing == x {
            continue;
        }
        // slide down from the landing column as far as possible
        let mut lowest = y;
        while lowest - y < MAX_SLIDE_DEPTH && can_swap(ctx, my_type, landing, lowest + 1) {
            lowest += 1;
        }
        ctx.swap(x, y, landing, lowest);
        return;
    }
}

/// Carried-tag diffusion: hand the whole cell (tag included) to a uniformly
/// chosen same-type neighbor whose carrier slot is empty.
fn try_diffuse_dissolved(ctx: &mut UpdateContext, my_type: ElementType) -> bool {
    let (x, y) = (ctx.x, ctx.y);
    let carrying = ctx
        .grid
        .cell(x, y)
        .state
        .as_liquid()
        .map(|l| l.dissolved != ElementType::Empty)
        .unwrap_or(false);
    if !carrying {
        return false;
    }

    let mut candidates: [(i32, i32); 8] = [(0, 0); 8];
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
            if cell.element_type() != my_type {
                continue;
            }
            if let Some(liquid) = cell.state.as_liquid() {
                if liquid.dissolved == ElementType::Empty {
                    candidates[count] = (nx, ny);
                    count += 1;
                }
            }
        }
    }

    if count == 0 || !ctx.rng.random_chance(DIFFUSION_CHANCE) {
        return false;
    }
    let (nx, ny) = candidates[ctx.rng.random_int(0, count as i32 - 1) as usize];
    ctx.swap(x, y, nx, ny);
    true
}
