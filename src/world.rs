//! Simulation state owned by the engine, plus the result-record types the
//! pass hands to its consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::tables::{StructureKind, CENTER_POP_ROOM};

/// Per-resource stockpile. Stone is stocked but never gathered in the early
/// game; it rides along for completeness of the ledger.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stockpile {
    pub food: f64,
    pub wood: f64,
    pub gold: f64,
    pub stone: f64,
}

impl Stockpile {
    pub fn clamp_non_negative(&mut self) {
        self.food = self.food.max(0.0);
        self.wood = self.wood.max(0.0);
        self.gold = self.gold.max(0.0);
        self.stone = self.stone.max(0.0);
    }

    pub fn add(&mut self, other: &Stockpile) {
        self.food += other.food;
        self.wood += other.wood;
        self.gold += other.gold;
        self.stone += other.stone;
    }

    pub fn pay(&mut self, cost: &crate::tables::Cost) {
        self.food -= cost.food;
        self.wood -= cost.wood;
        self.gold -= cost.gold;
        self.clamp_non_negative();
    }
}

/// Boolean research flags carried by the pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechFlags {
    pub loom: bool,
    pub double_bit_axe: bool,
    pub horse_collar: bool,
    pub wheelbarrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Age {
    Dark,
    Feudal,
}

/// The single mutable state of a pass. Owned exclusively by the engine and
/// mutated only inside the tick step.
#[derive(Debug, Clone)]
pub struct EconomyState {
    pub population: u32,
    pub housing_capacity: u32,
    pub stocks: Stockpile,
    pub structures: BTreeMap<StructureKind, u32>,
    pub tech: TechFlags,
    pub age: Age,
    pub elapsed_secs: f64,
}

impl EconomyState {
    pub fn new(population: u32, stocks: Stockpile) -> Self {
        Self {
            population,
            housing_capacity: CENTER_POP_ROOM,
            stocks,
            structures: BTreeMap::new(),
            tech: TechFlags::default(),
            age: Age::Dark,
            elapsed_secs: 0.0,
        }
    }

    /// Population minus the unit permanently reserved for scouting.
    pub fn working_population(&self) -> u32 {
        self.population.saturating_sub(1)
    }

    pub fn count(&self, kind: StructureKind) -> u32 {
        self.structures.get(&kind).copied().unwrap_or(0)
    }

    pub fn has(&self, kind: StructureKind) -> bool {
        self.count(kind) > 0
    }

    pub fn add_structure(&mut self, kind: StructureKind) {
        *self.structures.entry(kind).or_insert(0) += 1;
    }
}

/// Category tag on a build step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepCategory {
    Creation,
    Construction,
    Research,
    Relocation,
}

/// One immutable entry of the externally consumed timeline. Appended by the
/// engine, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildStep {
    pub time_secs: f64,
    pub population: u32,
    pub label: String,
    pub category: StepCategory,
    pub stocks: Stockpile,
    pub allocation: Allocation,
}

/// Periodic stockpile sample for the resource curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub time_secs: f64,
    pub population: u32,
    pub stocks: Stockpile,
}

/// Periodic efficiency sample. Utilization is one minus the idle share of
/// elapsed time so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencySample {
    pub time_secs: f64,
    pub utilization: f64,
    pub decayed_food: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestones {
    /// Simulated second the age advancement was clicked, if ever.
    pub age_click_secs: Option<f64>,
    /// Simulated second the advancement completed, if ever.
    pub age_reached_secs: Option<f64>,
    /// The same two stamps formatted mm:ss for reporting.
    pub age_click: Option<String>,
    pub age_reached: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassStats {
    pub idle_secs: f64,
    pub decayed_food: f64,
    pub farms_seeded: u32,
}

/// Everything a pass hands back. This record is the sole contract consumed
/// by presentation and advisory collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassResult {
    pub scenario: String,
    pub log: Vec<BuildStep>,
    pub resource_curve: Vec<ResourceSample>,
    pub efficiency_curve: Vec<EfficiencySample>,
    pub score: f64,
    pub milestones: Milestones,
    pub stats: PassStats,
    pub final_population: u32,
    pub counter_hint: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stockpile_never_goes_negative_after_payment() {
        let mut stock = Stockpile {
            food: 10.0,
            wood: 5.0,
            gold: 0.0,
            stone: 0.0,
        };
        stock.pay(&crate::tables::Cost {
            food: 25.0,
            wood: 0.0,
            gold: 0.0,
        });
        assert_eq!(stock.food, 0.0);
        assert_eq!(stock.wood, 5.0);
    }

    #[test]
    fn working_population_reserves_the_scout() {
        let state = EconomyState::new(4, Stockpile::default());
        assert_eq!(state.working_population(), 3);
        let empty = EconomyState::new(0, Stockpile::default());
        assert_eq!(empty.working_population(), 0);
    }

    #[test]
    fn structure_counts_accumulate() {
        let mut state = EconomyState::new(4, Stockpile::default());
        assert!(!state.has(StructureKind::House));
        state.add_structure(StructureKind::House);
        state.add_structure(StructureKind::House);
        assert_eq!(state.count(StructureKind::House), 2);
    }
}
