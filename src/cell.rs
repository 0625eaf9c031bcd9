//! Cell storage: one owned element instance per grid slot
//!
//! The original-style class hierarchy is flattened into a tagged variant with
//! one arm per element type. Shared header fields (color, position, step
//! flag) live on `Cell`; each arm carries exactly the state its rules touch.

use crate::elements::{ElementType, Rgba};

/// Movement state shared by the falling categories.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallingState {
    pub velocity_y: f32,
    pub accumulated_y: f32,
    pub is_moving: bool,
    pub was_moving: bool,
    pub moved_this_frame: bool,
}

impl FallingState {
    pub fn new() -> Self {
        Self {
            // enters the grid already at unit fall speed, so a freshly
            // placed grain visibly drops on its first step
            velocity_y: 1.0,
            is_moving: true,
            was_moving: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LiquidState {
    pub falling: FallingState,
    /// Tag carried by a solvent liquid; `Empty` when nothing is dissolved.
    pub dissolved: ElementType,
}

impl LiquidState {
    pub fn new() -> Self {
        Self {
            falling: FallingState::new(),
            dissolved: ElementType::Empty,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GasState {
    pub time_until_death: i32,
    pub is_moving: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct FireState {
    pub lifetime: i32,
    pub smoke_timer: i32,
    /// Smoke emission cadence in frames; <= 0 disables emission.
    pub frames_per_smoke_spawn: i32,
    pub spawn_on_death: ElementType,
    pub chance_to_spawn_on_death: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct BallisticState {
    /// What this shell turns back into once it settles.
    pub represented: ElementType,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub accumulated_x: f32,
    pub accumulated_y: f32,
    pub moved_this_frame: bool,
}

/// Tagged per-type state, one arm per `ElementType`.
#[derive(Clone, Copy, Debug)]
pub enum ElementState {
    Empty,
    Sand(FallingState),
    Dirt(FallingState),
    Coal(FallingState),
    Salt(FallingState),
    Ash(FallingState),
    Stone,
    Wood,
    Water(LiquidState),
    Oil(LiquidState),
    Smoke(GasState),
    Steam(GasState),
    Fire(FireState),
    PhysicsParticle(BallisticState),
}

impl ElementState {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementState::Empty => ElementType::Empty,
            ElementState::Sand(_) => ElementType::Sand,
            ElementState::Dirt(_) => ElementType::Dirt,
            ElementState::Coal(_) => ElementType::Coal,
            ElementState::Salt(_) => ElementType::Salt,
            ElementState::Ash(_) => ElementType::Ash,
            ElementState::Stone => ElementType::Stone,
            ElementState::Wood => ElementType::Wood,
            ElementState::Water(_) => ElementType::Water,
            ElementState::Oil(_) => ElementType::Oil,
            ElementState::Smoke(_) => ElementType::Smoke,
            ElementState::Steam(_) => ElementType::Steam,
            ElementState::Fire(_) => ElementType::Fire,
            ElementState::PhysicsParticle(_) => ElementType::PhysicsParticle,
        }
    }

    pub fn as_falling_mut(&mut self) -> Option<&mut FallingState> {
        match self {
            ElementState::Sand(s)
            | ElementState::Dirt(s)
            | ElementState::Coal(s)
            | ElementState::Salt(s)
            | ElementState::Ash(s) => Some(s),
            ElementState::Water(l) | ElementState::Oil(l) => Some(&mut l.falling),
            _ => None,
        }
    }

    pub fn as_liquid_mut(&mut self) -> Option<&mut LiquidState> {
        match self {
            ElementState::Water(l) | ElementState::Oil(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_liquid(&self) -> Option<&LiquidState> {
        match self {
            ElementState::Water(l) | ElementState::Oil(l) => Some(l),
            _ => None,
        }
    }

    /// Vertical velocity of any falling element, for momentum hand-off.
    pub fn velocity_y(&self) -> f32 {
        match self {
            ElementState::Sand(s)
            | ElementState::Dirt(s)
            | ElementState::Coal(s)
            | ElementState::Salt(s)
            | ElementState::Ash(s) => s.velocity_y,
            ElementState::Water(l) | ElementState::Oil(l) => l.falling.velocity_y,
            ElementState::PhysicsParticle(b) => b.velocity_y,
            _ => 0.0,
        }
    }
}

/// One grid slot. The grid owns exactly one of these per coordinate; there is
/// no empty slot, only the `Empty` element.
#[derive(Clone, Copy, Debug)]
pub struct Cell {
    pub state: ElementState,
    pub color: Rgba,
    /// Color assigned at construction; rules that tint a cell restore from
    /// this rather than re-rolling the jitter.
    pub original_color: Rgba,
    pub x: i32,
    pub y: i32,
    /// Updated-this-step marker, compared against the engine's step bit.
    pub step: bool,
}

impl Cell {
    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.state.element_type()
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.state, ElementState::Empty)
    }
}
