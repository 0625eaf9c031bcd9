//! Fire rules
//!
//! Fire never moves. It consumes fuels in its eight-neighborhood by table
//! lookup, cooks non-fuel neighbors through the heat table, vents smoke on a
//! cadence, flickers through a small palette and occasionally throws a spark
//! into the particle pool. Without fuel in range it burns out quickly.

use super::UpdateContext;
use crate::cell::ElementState;
use crate::elements::{ElementType, Rgba};
use crate::particles::Particle;
use crate::reactions::{fuel_for, react_to_heat};

/// Flicker palette: yellow, orange-yellow, orange, orange-red, red.
const FLAME_PALETTE: [Rgba; 5] = [
    Rgba::new(255, 255, 0, 200),
    Rgba::new(255, 210, 0, 200),
    Rgba::new(255, 165, 0, 200),
    Rgba::new(255, 110, 0, 200),
    Rgba::new(255, 69, 0, 200),
];

/// Chance per frame to throw a spark particle.
const SPARK_CHANCE: f32 = 0.1;

pub(super) fn update(ctx: &mut UpdateContext) {
    let (x, y) = (ctx.x, ctx.y);

    // flicker alone must keep this chunk rendering
    ctx.chunks.activate_at(x, y);

    let mut state = match ctx.grid.cell(x, y).state {
        ElementState::Fire(f) => f,
        _ => return,
    };

    state.lifetime -= 1;
    if state.lifetime <= 0 {
        if state.spawn_on_death != ElementType::Empty
            && ctx.rng.random_chance(state.chance_to_spawn_on_death)
        {
            ctx.place(state.spawn_on_death, x, y);
        } else {
            ctx.destroy(x, y);
        }
        return;
    }

    let found_fuel = consume_neighbors(ctx, x, y);
    if !found_fuel {
        // starve faster with nothing to burn
        state.lifetime -= 1;
    }

    // smoke cadence; <= 0 disables emission entirely
    if state.frames_per_smoke_spawn > 0 {
        state.smoke_timer += 1;
        if state.smoke_timer >= state.frames_per_smoke_spawn {
            state.smoke_timer = 0;
            if ctx.grid.is_empty(x, y - 1) {
                ctx.place(ElementType::Smoke, x, y - 1);
            }
        }
    }

    let flame = FLAME_PALETTE[ctx.rng.random_int(0, FLAME_PALETTE.len() as i32 - 1) as usize];
    {
        let cell = ctx.grid.cell_mut(x, y);
        cell.color = flame;
        cell.state = ElementState::Fire(state);
    }

    if ctx.rng.random_chance(SPARK_CHANCE) {
        let spark = Particle::new(
            x,
            y - 1,
            1,
            1,
            flame,
            ctx.rng.random_float(-0.3, 0.3),
            ctx.rng.random_float(-1.5, -0.5),
            0.0,
            0.0,
            24,
            0.3,
            0.5,
            ctx.rng,
        );
        // pool exhaustion just drops the effect
        let _ = ctx.particles.spawn(spark);
    }
}

/// Roll the fuel table over the eight neighbors; returns whether any fuel
/// was in range. Matching neighbors may ignite, inheriting the entry's
/// lifetime, smoke cadence and spawn-on-death fields; heat-reactive
/// neighbors (water) may phase-change instead.
fn consume_neighbors(ctx: &mut UpdateContext, x: i32, y: i32) -> bool {
    let mut found_fuel = false;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            let t = ctx.grid.get_type(nx, ny);
            if t == ElementType::Empty {
                continue;
            }

            if let Some(fuel) = fuel_for(t) {
                found_fuel = true;
                if ctx.rng.random_chance(fuel.chance_of_consumption) {
                    ctx.place(ElementType::Fire, nx, ny);
                    if let ElementState::Fire(new_fire) =
                        &mut ctx.grid.cell_mut(nx, ny).state
                    {
                        new_fire.lifetime += fuel.life_gained;
                        new_fire.frames_per_smoke_spawn = fuel.frames_per_smoke_spawn;
                        new_fire.spawn_on_death = fuel.spawn_on_death;
                        new_fire.chance_to_spawn_on_death = fuel.chance_to_spawn_on_death;
                    }
                }
                continue;
            }

            if let Some(reaction) = react_to_heat(t) {
                if ctx.rng.random_chance(reaction.chance) {
                    ctx.place(reaction.becomes, nx, ny);
                }
            }
        }
    }

    found_fuel
}
