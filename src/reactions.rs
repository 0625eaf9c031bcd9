//! Combustion and phase-change tables
//!
//! Rules are data, not code: fire looks its neighbors up in the fuel table,
//! and the heat table says what an element turns into when the spread path
//! cooks it. Extending either is adding an entry.

use crate::elements::ElementType;

/// How a flammable element behaves when fire consumes it.
#[derive(Clone, Copy)]
pub struct FuelEntry {
    /// Chance per frame that a matching neighbor ignites.
    pub chance_of_consumption: f32,
    /// Lifetime the replacement fire inherits on top of its base roll.
    pub life_gained: i32,
    /// What the burnt cell leaves behind when the fire dies.
    pub spawn_on_death: ElementType,
    pub chance_to_spawn_on_death: f32,
    /// Smoke emission cadence for the replacement fire; -1 = no smoke.
    pub frames_per_smoke_spawn: i32,
}

/// Fuel lookup for fire's neighbor scan.
pub fn fuel_for(t: ElementType) -> Option<&'static FuelEntry> {
    static WOOD: FuelEntry = FuelEntry {
        chance_of_consumption: 0.01,
        life_gained: 1000,
        spawn_on_death: ElementType::Ash,
        chance_to_spawn_on_death: 0.1,
        frames_per_smoke_spawn: 1,
    };
    static OIL: FuelEntry = FuelEntry {
        chance_of_consumption: 0.8,
        life_gained: 0,
        spawn_on_death: ElementType::Empty,
        chance_to_spawn_on_death: 1.0,
        frames_per_smoke_spawn: -1,
    };
    static COAL: FuelEntry = FuelEntry {
        chance_of_consumption: 0.005,
        life_gained: 2000,
        spawn_on_death: ElementType::Ash,
        chance_to_spawn_on_death: 0.3,
        frames_per_smoke_spawn: 2,
    };

    match t {
        ElementType::Wood => Some(&WOOD),
        ElementType::Oil => Some(&OIL),
        ElementType::Coal => Some(&COAL),
        _ => None,
    }
}

/// What an element becomes when the fire spread path heats it.
#[derive(Clone, Copy)]
pub struct HeatReaction {
    pub becomes: ElementType,
    pub chance: f32,
}

/// Heat lookup, invoked from the fire spread path (not from a general heat
/// field). Fuels are handled by `fuel_for` and are absent here.
pub fn react_to_heat(t: ElementType) -> Option<&'static HeatReaction> {
    static WATER: HeatReaction = HeatReaction {
        becomes: ElementType::Steam,
        chance: 0.05,
    };

    match t {
        ElementType::Water => Some(&WATER),
        _ => None,
    }
}
