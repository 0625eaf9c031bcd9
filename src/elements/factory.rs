//! Element construction
//!
//! The factory is the only place cells are born: it rolls the construction
//! color (texture tile or jitter) and the per-type initial state. Owned by
//! the engine next to the RNG so construction stays deterministic under a
//! seeded run.

use super::{ElementType, Rgba, TextureStore};
use crate::cell::{
    BallisticState, Cell, ElementState, FallingState, FireState, GasState, LiquidState,
};
use crate::rng::ElementRng;

/// Frames a fresh gas cell lives before death rolls begin.
pub const GAS_TIME_UNTIL_DEATH: i32 = 100;

/// Fresh fire burns 10..=19 frames unless it finds fuel.
pub const FIRE_BASE_LIFETIME: i32 = 10;
pub const FIRE_LIFETIME_JITTER: i32 = 10;

/// Default smoke emission cadence; fuel table entries override it.
pub const FIRE_SMOKE_CADENCE: i32 = 5;

pub struct ElementFactory {
    textures: TextureStore,
}

impl ElementFactory {
    pub fn new() -> Self {
        Self {
            textures: TextureStore::load_all(),
        }
    }

    /// Texture-free factory for tests and headless runs.
    pub fn without_textures() -> Self {
        Self {
            textures: TextureStore::empty(),
        }
    }

    pub fn textures_mut(&mut self) -> &mut TextureStore {
        &mut self.textures
    }

    /// Construct a cell of `t` at `(x, y)`.
    ///
    /// `not_updated_step` is the step-flag value meaning "not yet updated
    /// this frame" (the inverse of the engine's current step bit), so a
    /// freshly placed element may still move in the frame that created it.
    pub fn create(
        &self,
        t: ElementType,
        x: i32,
        y: i32,
        rng: &mut ElementRng,
        not_updated_step: bool,
    ) -> Cell {
        let color = self.construction_color(t, x, y, rng);
        Cell {
            state: initial_state(t, rng),
            color,
            original_color: color,
            x,
            y,
            step: not_updated_step,
        }
    }

    /// Color for a cell of `t` at world position: texture tile when the type
    /// has one, otherwise base color with a single jitter offset applied to
    /// all three channels. Alpha always comes from the base color.
    pub fn construction_color(
        &self,
        t: ElementType,
        x: i32,
        y: i32,
        rng: &mut ElementRng,
    ) -> Rgba {
        let props = t.props();
        if let Some(texture) = self.textures.get(t) {
            return texture.sample(x, y);
        }
        if props.color_offset == 0 {
            return props.base_color;
        }
        let offset = rng.random_int(-props.color_offset, props.color_offset);
        let base = props.base_color;
        Rgba::new(
            (base.r as i32 + offset).clamp(0, 255) as u8,
            (base.g as i32 + offset).clamp(0, 255) as u8,
            (base.b as i32 + offset).clamp(0, 255) as u8,
            base.a,
        )
    }
}

fn initial_state(t: ElementType, rng: &mut ElementRng) -> ElementState {
    match t {
        ElementType::Empty => ElementState::Empty,
        ElementType::Sand => ElementState::Sand(FallingState::new()),
        ElementType::Dirt => ElementState::Dirt(FallingState::new()),
        ElementType::Coal => ElementState::Coal(FallingState::new()),
        ElementType::Salt => ElementState::Salt(FallingState::new()),
        ElementType::Ash => ElementState::Ash(FallingState::new()),
        ElementType::Stone => ElementState::Stone,
        ElementType::Wood => ElementState::Wood,
        ElementType::Water => ElementState::Water(LiquidState::new()),
        ElementType::Oil => ElementState::Oil(LiquidState::new()),
        ElementType::Smoke => ElementState::Smoke(GasState {
            time_until_death: GAS_TIME_UNTIL_DEATH,
            is_moving: true,
        }),
        ElementType::Steam => ElementState::Steam(GasState {
            time_until_death: GAS_TIME_UNTIL_DEATH,
            is_moving: true,
        }),
        ElementType::Fire => ElementState::Fire(FireState {
            lifetime: FIRE_BASE_LIFETIME + rng.random_int(0, FIRE_LIFETIME_JITTER - 1),
            smoke_timer: 0,
            frames_per_smoke_spawn: FIRE_SMOKE_CADENCE,
            spawn_on_death: ElementType::Empty,
            chance_to_spawn_on_death: 0.0,
        }),
        ElementType::PhysicsParticle => ElementState::PhysicsParticle(BallisticState {
            represented: ElementType::Sand,
            velocity_x: 0.0,
            velocity_y: 0.0,
            accumulated_x: 0.0,
            accumulated_y: 0.0,
            moved_this_frame: false,
        }),
    }
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Texture;

    #[test]
    fn jitter_keeps_alpha_and_bounds() {
        let factory = ElementFactory::without_textures();
        let mut rng = ElementRng::from_seed(5);
        for _ in 0..100 {
            let c = factory.construction_color(ElementType::Water, 3, 4, &mut rng);
            assert_eq!(c.a, ElementType::Water.props().base_color.a);
            let base = ElementType::Water.props().base_color;
            assert!((c.r as i32 - base.r as i32).abs() <= 1);
        }
    }

    #[test]
    fn jitter_is_uniform_across_channels() {
        // one offset for all three channels keeps the hue
        let factory = ElementFactory::without_textures();
        let mut rng = ElementRng::from_seed(5);
        for _ in 0..100 {
            let c = factory.construction_color(ElementType::Salt, 0, 0, &mut rng);
            assert_eq!(c.r, c.g);
            assert_eq!(c.g, c.b);
            assert!(c.r >= 250); // base 255, offset range 5, clamped at white
        }
    }

    #[test]
    fn texture_overrides_jitter() {
        let mut factory = ElementFactory::without_textures();
        let data: Vec<u8> = vec![9, 8, 7, 255];
        factory
            .textures_mut()
            .set(ElementType::Stone, Texture::from_rgba8(1, 1, &data).unwrap());
        let mut rng = ElementRng::from_seed(1);
        let c = factory.construction_color(ElementType::Stone, 17, -3, &mut rng);
        assert_eq!(c, Rgba::new(9, 8, 7, 255));
    }

    #[test]
    fn fire_lifetime_is_in_range() {
        let factory = ElementFactory::without_textures();
        let mut rng = ElementRng::from_seed(2);
        for _ in 0..50 {
            let cell = factory.create(ElementType::Fire, 0, 0, &mut rng, true);
            match cell.state {
                ElementState::Fire(f) => {
                    assert!((FIRE_BASE_LIFETIME
                        ..FIRE_BASE_LIFETIME + FIRE_LIFETIME_JITTER)
                        .contains(&f.lifetime));
                    assert_eq!(f.frames_per_smoke_spawn, FIRE_SMOKE_CADENCE);
                }
                other => panic!("expected fire, got {:?}", other),
            }
        }
    }

    #[test]
    fn created_cell_carries_position_and_step() {
        let factory = ElementFactory::without_textures();
        let mut rng = ElementRng::from_seed(2);
        let cell = factory.create(ElementType::Sand, 7, 9, &mut rng, false);
        assert_eq!(cell.position(), (7, 9));
        assert!(!cell.step);
        assert_eq!(cell.color, cell.original_color);
    }
}
