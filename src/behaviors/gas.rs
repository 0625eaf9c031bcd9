//! Gas rules: smoke, steam
//!
//! Gases are inverted powders: they rise, drift diagonally, spread along
//! ceilings and die off probabilistically once their timer runs out. A gas
//! only ever moves into empty cells.

use super::UpdateContext;
use crate::cell::ElementState;
use crate::elements::ElementType;

/// Death roll per frame once the lifetime timer has expired.
const CHANCE_OF_DEATH: f32 = 0.01;

/// Chance to drift diagonally/sideways instead of rising straight up.
const CHANCE_OF_HORIZONTAL: f32 = 0.5;

/// Gases yield only to empty cells; never same type, never updated targets.
fn can_swap(ctx: &UpdateContext, x: i32, y: i32) -> bool {
    let Some(target) = ctx.grid.get(x, y) else {
        return false;
    };
    if target.step == ctx.step {
        return false;
    }
    target.is_empty()
}

pub(super) fn update(ctx: &mut UpdateContext, _my_type: ElementType) {
    let (x, y) = (ctx.x, ctx.y);

    // visual churn and the death timer must keep the chunk alive
    ctx.chunks.activate_at(x, y);

    let expired = {
        let cell = ctx.grid.cell_mut(x, y);
        match &mut cell.state {
            ElementState::Smoke(gas) | ElementState::Steam(gas) => {
                gas.time_until_death -= 1;
                gas.time_until_death < 0
            }
            _ => return,
        }
    };
    if expired && ctx.rng.random_chance(CHANCE_OF_DEATH) {
        ctx.destroy(x, y);
        return;
    }

    handle_rising(ctx, x, y);
}

fn handle_rising(ctx: &mut UpdateContext, x: i32, y: i32) {
    if !ctx.rng.random_chance(CHANCE_OF_HORIZONTAL) {
        if can_swap(ctx, x, y - 1) {
            ctx.swap(x, y, x, y - 1);
            return;
        }
    } else {
        let dir = ctx.rng.random_direction();
        let ladder = [(x + dir, y - 1), (x - dir, y - 1), (x + dir, y), (x - dir, y)];
        for (tx, ty) in ladder {
            if can_swap(ctx, tx, ty) {
                ctx.swap(x, y, tx, ty);
                return;
            }
        }
    }

    handle_ceilinged(ctx, x, y);
}

/// Blocked above: spread along the ceiling, or give up and sit still.
fn handle_ceilinged(ctx: &mut UpdateContext, x: i32, y: i32) {
    for tx in [x - 1, x + 1] {
        if can_swap(ctx, tx, y) {
            ctx.swap(x, y, tx, y);
            return;
        }
    }
    if let Some(cell) = ctx.grid.get_mut(x, y) {
        match &mut cell.state {
            ElementState::Smoke(gas) | ElementState::Steam(gas) => gas.is_moving = false,
            _ => {}
        }
    }
}
