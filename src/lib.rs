//! Embercell Engine - falling-sand cellular automaton
//!
//! Architecture:
//! - elements/   - element taxonomy, metadata table, construction
//! - cell.rs     - per-cell storage (tagged state + shared header)
//! - grid.rs     - owned W x H cell array and the swap/place contract
//! - chunks.rs   - chunk scheduler (dirty tracking, countdown lifecycle)
//! - behaviors/  - per-category movement and reaction rules
//! - reactions.rs- fuel and phase-change tables
//! - particles.rs- transient free-flying particle pool
//! - render.rs   - RGBA frame composition
//! - world.rs    - orchestration only
//! - facade.rs   - wasm/JS boundary

mod behaviors;
mod cell;
mod chunks;
mod elements;
mod facade;
mod grid;
mod particles;
mod reactions;
mod render;
mod rng;
mod world;

pub use cell::{Cell, ElementState};
pub use chunks::{CHUNK_KEEPALIVE, CHUNK_SIZE};
pub use elements::{ElementType, Rgba, ELEMENT_COUNT};
pub use facade::Sandbox;
pub use particles::{Particle, MAX_PARTICLES};
pub use rng::ElementRng;
pub use world::{World, PHYSICS_HZ};

use wasm_bindgen::prelude::*;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Better error messages in debug wasm builds
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine module (wasm entry).
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&"embercell engine initialized".into());
}

/// Engine version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Element id constants for the JS toolbar
#[wasm_bindgen]
pub fn el_empty() -> u8 {
    ElementType::Empty.id()
}
#[wasm_bindgen]
pub fn el_sand() -> u8 {
    ElementType::Sand.id()
}
#[wasm_bindgen]
pub fn el_dirt() -> u8 {
    ElementType::Dirt.id()
}
#[wasm_bindgen]
pub fn el_coal() -> u8 {
    ElementType::Coal.id()
}
#[wasm_bindgen]
pub fn el_salt() -> u8 {
    ElementType::Salt.id()
}
#[wasm_bindgen]
pub fn el_ash() -> u8 {
    ElementType::Ash.id()
}
#[wasm_bindgen]
pub fn el_stone() -> u8 {
    ElementType::Stone.id()
}
#[wasm_bindgen]
pub fn el_wood() -> u8 {
    ElementType::Wood.id()
}
#[wasm_bindgen]
pub fn el_water() -> u8 {
    ElementType::Water.id()
}
#[wasm_bindgen]
pub fn el_oil() -> u8 {
    ElementType::Oil.id()
}
#[wasm_bindgen]
pub fn el_smoke() -> u8 {
    ElementType::Smoke.id()
}
#[wasm_bindgen]
pub fn el_steam() -> u8 {
    ElementType::Steam.id()
}
#[wasm_bindgen]
pub fn el_fire() -> u8 {
    ElementType::Fire.id()
}
#[wasm_bindgen]
pub fn el_physics_particle() -> u8 {
    ElementType::PhysicsParticle.id()
}
