//! Construction goal planner.
//!
//! Recomputes the full desired-structure list from scratch every tick and
//! returns it freshly sorted. Nothing here is stateful; the driver keeps at
//! most the top affordable entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tables::{structure_cost, Civilization, Cost, Strategy, StructureKind};

/// Ticks-from-target window in which the late barracks gets proposed.
const BARRACKS_POP_LOOKAHEAD: u32 = 2;

/// A candidate structure with its urgency. Regenerated each call, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingGoal {
    pub kind: StructureKind,
    pub cost: Cost,
    pub priority: u32,
    pub gates_age: bool,
}

fn discounted(kind: StructureKind, civ: Civilization) -> Cost {
    structure_cost(kind).scaled(civ.cost_multiplier(kind))
}

/// Propose the structures the current strategy wants, highest priority
/// first. Ties keep declaration order; the sort is stable.
pub fn next_goals(
    strategy: Strategy,
    built: &BTreeMap<StructureKind, u32>,
    civ: Civilization,
    population: u32,
    target_population: u32,
) -> Vec<BuildingGoal> {
    let count = |kind: StructureKind| built.get(&kind).copied().unwrap_or(0);
    let mut goals = Vec::new();

    if count(StructureKind::LumberCamp) == 0 {
        let mut priority = 80;
        if strategy.wood_dependent() {
            priority += 10;
        }
        goals.push(BuildingGoal {
            kind: StructureKind::LumberCamp,
            cost: discounted(StructureKind::LumberCamp, civ),
            priority,
            gates_age: true,
        });
    }

    if count(StructureKind::Mill) == 0 {
        let mut priority = 65;
        if !strategy.needs_gold() {
            priority += 10;
        }
        goals.push(BuildingGoal {
            kind: StructureKind::Mill,
            cost: discounted(StructureKind::Mill, civ),
            priority,
            gates_age: true,
        });
    }

    if count(StructureKind::MiningCamp) == 0
        && strategy.needs_gold()
        && population >= strategy.gold_pop_threshold()
    {
        goals.push(BuildingGoal {
            kind: StructureKind::MiningCamp,
            cost: discounted(StructureKind::MiningCamp, civ),
            priority: 75,
            gates_age: true,
        });
    }

    if count(StructureKind::Barracks) == 0 {
        if strategy.military_immediate() {
            goals.push(BuildingGoal {
                kind: StructureKind::Barracks,
                cost: discounted(StructureKind::Barracks, civ),
                priority: 85,
                gates_age: false,
            });
        } else if population + BARRACKS_POP_LOOKAHEAD >= target_population {
            goals.push(BuildingGoal {
                kind: StructureKind::Barracks,
                cost: discounted(StructureKind::Barracks, civ),
                priority: 60,
                gates_age: false,
            });
        }
    }

    let secondary = strategy.secondary_structure();
    if count(secondary) == 0 && population >= target_population {
        goals.push(BuildingGoal {
            kind: secondary,
            cost: discounted(secondary, civ),
            priority: 50,
            gates_age: false,
        });
    }

    goals.sort_by(|a, b| b.priority.cmp(&a.priority));
    goals
}
