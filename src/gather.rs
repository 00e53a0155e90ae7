//! Steady-state gather rate model.
//!
//! Converts a raw per-second yield, a one-way walking distance and the
//! active modifiers into a sustained per-worker rate. Pure arithmetic, no
//! state: the same inputs always give bit-identical output.

/// Fixed drop-off and pickup animation cost charged once per carry cycle.
const HANDLING_OVERHEAD_SECS: f64 = 2.0;

/// Exponent of the power-law crowding penalty.
const CROWDING_EXPONENT: f64 = 0.6;

/// The crowding penalty never drops a source below this share of nominal.
const CROWDING_FLOOR: f64 = 0.4;

/// A multiplicative upgrade effect. Which stat it touches depends on the
/// research that granted it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    CarryCapacity(f64),
    MoveSpeed(f64),
    RawYield(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct GatherParams {
    /// Base units extracted per second while standing at the source.
    pub raw_yield_per_sec: f64,
    /// One-way distance from source to drop-off, tiles.
    pub distance_tiles: f64,
    /// Civilization yield factor for this source kind.
    pub civ_multiplier: f64,
    pub carry_capacity: f64,
    pub movement_speed: f64,
    /// Workers currently assigned to the source.
    pub workers: u32,
    /// Tiles of physical access around the source.
    pub access_points: u32,
}

/// Penalty applied when more workers share a source than it has access
/// points. Degrades as a power law in worker density, floored so a heavily
/// crowded source still produces.
pub fn crowding_penalty(workers: u32, access_points: u32) -> f64 {
    if workers <= access_points || workers == 0 {
        return 1.0;
    }
    let density = access_points.max(1) as f64 / workers as f64;
    density.powf(CROWDING_EXPONENT).max(CROWDING_FLOOR)
}

/// Sustained rate in units per minute for one worker.
///
/// A full cycle fills the carry capacity at the modified yield, walks the
/// round trip at the modified speed and pays the fixed handling overhead.
pub fn sustained_rate_per_min(params: &GatherParams, upgrades: &[UpgradeEffect]) -> f64 {
    let mut capacity = params.carry_capacity;
    let mut speed = params.movement_speed;
    let mut yield_per_sec = params.raw_yield_per_sec * params.civ_multiplier;
    for upgrade in upgrades {
        match *upgrade {
            UpgradeEffect::CarryCapacity(factor) => capacity *= factor,
            UpgradeEffect::MoveSpeed(factor) => speed *= factor,
            UpgradeEffect::RawYield(factor) => yield_per_sec *= factor,
        }
    }
    if capacity <= 0.0 || speed <= 0.0 || yield_per_sec <= 0.0 {
        return 0.0;
    }

    let fill_secs = capacity / yield_per_sec;
    let walk_secs = 2.0 * params.distance_tiles / speed;
    let cycle_secs = fill_secs + walk_secs + HANDLING_OVERHEAD_SECS;
    let nominal = capacity * 60.0 / cycle_secs;
    nominal * crowding_penalty(params.workers, params.access_points)
}
