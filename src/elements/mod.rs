//! Element definitions and per-type metadata
//!
//! One closed enum tag per element, one metadata row per tag. Adding an
//! element is a local change: a new tag, a row in `ELEMENT_DATA`, a state arm
//! in `cell.rs`, and (if it moves or reacts) a rule in `behaviors/`.

mod factory;
mod textures;

pub use factory::ElementFactory;
pub use textures::{Texture, TextureStore};

use serde::Serialize;

/// RGBA color, packed for the frame composer as `(r<<24)|(g<<16)|(b<<8)|a`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn pack(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }
}

/// Closed element taxonomy. The u8 discriminants are the wire ids the wasm
/// facade exchanges with the UI.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum ElementType {
    Empty = 0,
    Sand = 1,
    Dirt = 2,
    Coal = 3,
    Salt = 4,
    Ash = 5,
    Stone = 6,
    Wood = 7,
    Water = 8,
    Oil = 9,
    Smoke = 10,
    Steam = 11,
    Fire = 12,
    PhysicsParticle = 13,
}

pub const ELEMENT_COUNT: usize = 14;

/// Every type, in id order. Drives the metadata table and the UI manifest.
pub const ALL_ELEMENTS: [ElementType; ELEMENT_COUNT] = [
    ElementType::Empty,
    ElementType::Sand,
    ElementType::Dirt,
    ElementType::Coal,
    ElementType::Salt,
    ElementType::Ash,
    ElementType::Stone,
    ElementType::Wood,
    ElementType::Water,
    ElementType::Oil,
    ElementType::Smoke,
    ElementType::Steam,
    ElementType::Fire,
    ElementType::PhysicsParticle,
];

/// Semantic category: decides what may swap with what.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Category {
    Static,
    Powder,
    Liquid,
    Gas,
    Reactive,
    Particle,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Static => "static",
            Category::Powder => "powder",
            Category::Liquid => "liquid",
            Category::Gas => "gas",
            Category::Reactive => "reactive",
            Category::Particle => "particle",
        }
    }
}

impl ElementType {
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        ALL_ELEMENTS.get(id as usize).copied()
    }

    #[inline]
    pub fn category(self) -> Category {
        match self {
            ElementType::Empty | ElementType::Stone | ElementType::Wood => Category::Static,
            ElementType::Sand
            | ElementType::Dirt
            | ElementType::Coal
            | ElementType::Salt
            | ElementType::Ash => Category::Powder,
            ElementType::Water | ElementType::Oil => Category::Liquid,
            ElementType::Smoke | ElementType::Steam => Category::Gas,
            ElementType::Fire => Category::Reactive,
            ElementType::PhysicsParticle => Category::Particle,
        }
    }

    #[inline]
    pub fn props(self) -> &'static ElementProps {
        &ELEMENT_DATA[self as usize]
    }

    #[inline]
    pub fn density(self) -> f32 {
        self.props().density
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == ElementType::Empty
    }

    #[inline]
    pub fn is_static(self) -> bool {
        self.category() == Category::Static
    }

    #[inline]
    pub fn is_powder(self) -> bool {
        self.category() == Category::Powder
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        self.category() == Category::Liquid
    }

    #[inline]
    pub fn is_gas(self) -> bool {
        self.category() == Category::Gas
    }

    /// Anything with motion rules: powder, liquid, gas or ballistic shell.
    /// Buoyancy only ever acts against these.
    #[inline]
    pub fn is_movable(self) -> bool {
        matches!(
            self.category(),
            Category::Powder | Category::Liquid | Category::Gas | Category::Particle
        )
    }
}

/// Per-type metadata, populated once at startup.
pub struct ElementProps {
    pub name: &'static str,
    pub base_color: Rgba,
    /// Per-construction color jitter: one offset in [-n, +n] applied to all
    /// three channels so the hue is kept. Zero for flat/textured types.
    pub color_offset: i32,
    /// Tileable raster sampled with wrap at construction. Load failure is
    /// non-fatal and falls back to jitter.
    pub texture: Option<&'static str>,
    /// 0..1, relative; drives buoyancy and displacement.
    pub density: f32,
    /// Chance per grounded frame that a powder stops rolling.
    pub friction: f32,
    /// Fraction of vertical momentum swallowed when passing it upward.
    pub impact_absorption: f32,
    /// Chance a powder refuses to wake when a neighbor moves.
    pub inertial_resistance: f32,
    /// Max horizontal distance a liquid may spread in one step.
    pub dispersion_rate: i32,
}

const fn props(
    name: &'static str,
    base_color: Rgba,
    color_offset: i32,
    texture: Option<&'static str>,
    density: f32,
    friction: f32,
    impact_absorption: f32,
    inertial_resistance: f32,
    dispersion_rate: i32,
) -> ElementProps {
    ElementProps {
        name,
        base_color,
        color_offset,
        texture,
        density,
        friction,
        impact_absorption,
        inertial_resistance,
        dispersion_rate,
    }
}

/// Metadata table, indexed by element id.
pub static ELEMENT_DATA: [ElementProps; ELEMENT_COUNT] = [
    props("Empty", Rgba::new(0, 0, 0, 0), 0, None, 0.0, 0.0, 0.0, 0.0, 0),
    props("Sand", Rgba::new(194, 178, 128, 255), 5, None, 0.8, 0.035, 0.5, 0.0, 0),
    props("Dirt", Rgba::new(98, 50, 19, 255), 5, None, 0.85, 0.2, 0.5, 0.5, 0),
    props("Coal", Rgba::new(35, 35, 35, 255), 5, None, 0.9, 0.2, 0.5, 0.3, 0),
    props("Salt", Rgba::new(255, 255, 255, 255), 5, None, 0.2, 0.1, 0.5, 0.0, 0),
    props("Ash", Rgba::new(120, 110, 100, 255), 5, None, 0.1, 0.1, 0.5, 0.0, 0),
    props(
        "Stone",
        Rgba::new(128, 128, 128, 255),
        5,
        Some("assets/textures/stone.png"),
        1.0,
        0.0,
        0.0,
        0.0,
        0,
    ),
    props(
        "Wood",
        Rgba::new(134, 97, 45, 255),
        5,
        Some("assets/textures/wood.png"),
        1.0,
        0.0,
        0.0,
        0.0,
        0,
    ),
    props("Water", Rgba::new(51, 82, 172, 100), 1, None, 0.5, 0.0, 0.0, 0.0, 32),
    props("Oil", Rgba::new(40, 40, 40, 100), 1, None, 0.4, 0.0, 0.0, 0.0, 32),
    props("Smoke", Rgba::new(33, 33, 33, 125), 1, None, 0.05, 0.0, 0.0, 0.0, 0),
    props("Steam", Rgba::new(100, 100, 100, 125), 1, None, 0.02, 0.0, 0.0, 0.0, 0),
    props("Fire", Rgba::new(255, 165, 0, 200), 0, None, 0.1, 0.0, 0.0, 0.0, 0),
    props("Particle", Rgba::new(255, 255, 255, 255), 0, None, 0.5, 0.0, 0.0, 0.0, 0),
];

/// One palette row handed to the UI toolbar.
#[derive(Serialize)]
pub struct ManifestEntry {
    pub id: u8,
    pub name: &'static str,
    pub category: &'static str,
    pub color: [u8; 4],
}

/// Element palette as JSON, for the external toolbar/brush UI.
pub fn element_manifest_json() -> String {
    let entries: Vec<ManifestEntry> = ALL_ELEMENTS
        .iter()
        .map(|&t| {
            let p = t.props();
            ManifestEntry {
                id: t.id(),
                name: p.name,
                category: t.category().name(),
                color: [p.base_color.r, p.base_color.g, p.base_color.b, p.base_color.a],
            }
        })
        .collect();
    serde_json::to_string(&entries).expect("manifest serialization cannot fail")
}
