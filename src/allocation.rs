//! Per-tick worker allocation heuristic.
//!
//! Splits the working population across food, wood, gold and construction.
//! The decision order matters: housing first, then the first affordable
//! construction goal, then the food floor, then proportional wood/gold
//! needs, then the pre-camp wood cap.

use serde::{Deserialize, Serialize};

use crate::goals::BuildingGoal;
use crate::tables::{
    build_time_secs, Cost, FoodKind, Strategy, StructureKind, AGE_ADVANCE_FOOD_COST,
    LOOM_GOLD_COST, TRAIN_INTERVAL_SECS,
};
use crate::variants::HeuristicProfile;
use crate::world::{Age, EconomyState};

/// What the reserved builder should put up this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildIntent {
    House,
    Goal(StructureKind),
}

/// Worker counts for one tick. All fields are non-negative and the sum
/// never exceeds the working population.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub food: u32,
    pub wood: u32,
    pub gold: u32,
    pub builders: u32,
    pub intent: Option<BuildIntent>,
}

impl Allocation {
    pub fn assigned(&self) -> u32 {
        self.food + self.wood + self.gold + self.builders
    }
}

/// Everything the heuristic looks at for one tick. Borrowed views only;
/// allocation never mutates state.
#[derive(Debug, Clone, Copy)]
pub struct AllocContext<'a> {
    pub state: &'a EconomyState,
    pub active_food: Option<FoodKind>,
    /// Current goal list, highest priority first.
    pub goals: &'a [BuildingGoal],
    /// Builders already committed to an in-progress construction.
    pub committed_builders: u32,
    pub strategy: Strategy,
    pub house_cost: Cost,
    pub target_population: u32,
    pub skip_loom: bool,
}

fn outstanding(cost: f64, stocked: f64) -> f64 {
    (cost - stocked).max(0.0)
}

pub fn allocate(ctx: &AllocContext<'_>, profile: &HeuristicProfile) -> Allocation {
    let state = ctx.state;
    let working = state.working_population();
    if working == 0 {
        return Allocation::default();
    }

    // Builder reservation. An in-progress construction keeps its crew;
    // otherwise housing pressure outranks the strategic goals, and the
    // first affordable goal in priority order wins.
    let mut builders = 0;
    let mut intent = None;
    let idle_slots = state.housing_capacity.saturating_sub(state.population);
    let time_to_full = idle_slots as f64 * TRAIN_INTERVAL_SECS;
    let housing_pressed =
        time_to_full <= build_time_secs(StructureKind::House) + profile.house_buffer_secs;
    if ctx.committed_builders > 0 {
        builders = ctx.committed_builders.min(working);
    } else if housing_pressed && state.stocks.wood >= ctx.house_cost.wood {
        builders = 1;
        intent = Some(BuildIntent::House);
    } else if let Some(goal) = ctx
        .goals
        .iter()
        .find(|goal| goal.cost.covered_by(&state.stocks))
    {
        builders = 1;
        intent = Some(BuildIntent::Goal(goal.kind));
    }
    let mut remaining = working - builders;

    // Food floor, with the pre-advancement rush override. The override is
    // clamped to the workers actually left after reservations.
    let mut food = 0;
    if let Some(kind) = ctx.active_food {
        let mut floor = profile.food_floor(kind);
        let rushing = state.age == Age::Dark
            && state.population + 1 >= ctx.target_population
            && state.stocks.food < AGE_ADVANCE_FOOD_COST;
        if rushing {
            floor = remaining.saturating_sub(profile.rush_spare_workers);
        }
        food = floor.min(remaining);
    }
    remaining -= food;

    // Outstanding wood and gold needs, booked against the top-priority
    // goal. Housing pressure keeps the house price on the books even when
    // wood is short, so gatherers move before the builder can.
    let mut wood_need = 0.0;
    let mut gold_need = 0.0;
    if housing_pressed {
        wood_need += outstanding(ctx.house_cost.wood, state.stocks.wood);
    }
    if let Some(goal) = ctx.goals.first() {
        wood_need += outstanding(goal.cost.wood, state.stocks.wood);
        gold_need += outstanding(goal.cost.gold, state.stocks.gold);
    }
    let loom_soon = !state.tech.loom
        && !ctx.skip_loom
        && state.population + profile.loom_lookahead >= ctx.target_population;
    if loom_soon {
        gold_need += outstanding(LOOM_GOLD_COST, state.stocks.gold);
    }

    let mut wood;
    let mut gold = 0;
    if wood_need <= 0.0 && gold_need <= 0.0 {
        match state.age {
            // The whole early game is wood starved.
            Age::Dark => wood = remaining,
            Age::Feudal => {
                wood = remaining / 2;
                food += remaining - wood;
            }
        }
    } else {
        let weighted_gold = gold_need * profile.gold_weight;
        let total = wood_need + weighted_gold;
        wood = ((remaining as f64) * wood_need / total).round() as u32;
        wood = wood.min(remaining);
        gold = remaining - wood;
    }

    // A standing mining camp keeps a skeleton crew on gold for strategies
    // that will spend it, whether or not a cost is outstanding right now.
    if state.has(StructureKind::MiningCamp) && ctx.strategy.needs_gold() {
        let floor = profile.min_gold_workers.min(remaining);
        if gold < floor {
            let moved = (floor - gold).min(wood);
            wood -= moved;
            gold += moved;
        }
    }

    // Without a lumber camp only the deadfall near the drop-off is worth
    // walking to; surplus hands feed instead.
    if !state.has(StructureKind::LumberCamp) && wood > profile.precamp_wood_cap {
        food += wood - profile.precamp_wood_cap;
        wood = profile.precamp_wood_cap;
    }

    Allocation {
        food,
        wood,
        gold,
        builders,
        intent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::structure_cost;
    use crate::world::Stockpile;

    fn state(population: u32, housing: u32, stocks: Stockpile) -> EconomyState {
        let mut state = EconomyState::new(population, stocks);
        state.housing_capacity = housing;
        state
    }

    fn ctx<'a>(state: &'a EconomyState, goals: &'a [BuildingGoal]) -> AllocContext<'a> {
        AllocContext {
            state,
            active_food: Some(FoodKind::Sheep),
            goals,
            committed_builders: 0,
            strategy: Strategy::Scouts,
            house_cost: structure_cost(StructureKind::House),
            target_population: 21,
            skip_loom: false,
        }
    }

    fn goal(kind: StructureKind, priority: u32) -> BuildingGoal {
        BuildingGoal {
            kind,
            cost: structure_cost(kind),
            priority,
            gates_age: false,
        }
    }

    fn stocked(food: f64, wood: f64, gold: f64) -> Stockpile {
        Stockpile {
            food,
            wood,
            gold,
            stone: 0.0,
        }
    }

    #[test]
    fn assignment_never_exceeds_the_working_population() {
        let state = state(12, 15, stocked(200.0, 200.0, 100.0));
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        assert!(allocation.assigned() <= state.working_population());
        assert_eq!(allocation.assigned(), state.working_population());
    }

    #[test]
    fn tight_housing_reserves_a_builder_when_wood_allows() {
        let state = state(14, 15, stocked(100.0, 50.0, 0.0));
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        assert_eq!(allocation.builders, 1);
        assert_eq!(allocation.intent, Some(BuildIntent::House));
    }

    #[test]
    fn no_wood_means_no_house_but_the_need_is_booked() {
        let state = state(14, 15, stocked(100.0, 0.0, 0.0));
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        assert_eq!(allocation.builders, 0);
        assert_eq!(allocation.intent, None);
        assert!(allocation.wood > 0, "shortfall should pull gatherers to wood");
    }

    #[test]
    fn first_affordable_goal_gets_the_builder() {
        let goals = [
            goal(StructureKind::Barracks, 85),
            goal(StructureKind::LumberCamp, 80),
        ];
        // Barracks is out of reach, the camp is not.
        let state = state(10, 20, stocked(100.0, 150.0, 0.0));
        let allocation = allocate(&ctx(&state, &goals), &HeuristicProfile::default());
        assert_eq!(allocation.builders, 1);
        assert_eq!(
            allocation.intent,
            Some(BuildIntent::Goal(StructureKind::LumberCamp))
        );
    }

    #[test]
    fn rush_override_clamps_to_available_workers() {
        // One off the target with no food banked: nearly everyone feeds.
        let mut state = state(20, 25, stocked(100.0, 500.0, 100.0));
        state.add_structure(StructureKind::LumberCamp);
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        let working = state.working_population();
        assert!(allocation.food >= working - allocation.builders - 2);
        assert!(allocation.assigned() <= working);
    }

    #[test]
    fn rush_override_survives_a_zero_worker_remainder() {
        let state = state(2, 25, stocked(0.0, 0.0, 0.0));
        let allocation = allocate(
            &AllocContext {
                target_population: 3,
                ..ctx(&state, &[])
            },
            &HeuristicProfile::default(),
        );
        assert!(allocation.assigned() <= 1);
    }

    #[test]
    fn gold_strategies_keep_miners_once_the_camp_stands() {
        let goals = [goal(StructureKind::Barracks, 60)];
        let mut state = state(18, 25, stocked(600.0, 0.0, 0.0));
        state.add_structure(StructureKind::LumberCamp);
        state.add_structure(StructureKind::MiningCamp);
        let context = AllocContext {
            strategy: Strategy::Archers,
            ..ctx(&state, &goals)
        };
        let allocation = allocate(&context, &HeuristicProfile::default());
        assert!(allocation.gold >= 3);
    }

    #[test]
    fn pre_camp_wood_is_capped_and_the_rest_feeds() {
        let state = state(15, 25, stocked(1000.0, 1000.0, 1000.0));
        let profile = HeuristicProfile::default();
        let allocation = allocate(&ctx(&state, &[]), &profile);
        assert!(allocation.wood <= profile.precamp_wood_cap);
        assert!(allocation.food > profile.food_floor(FoodKind::Sheep));
    }

    #[test]
    fn dark_age_surplus_defaults_to_wood() {
        let mut state = state(15, 25, stocked(1000.0, 1000.0, 1000.0));
        state.add_structure(StructureKind::LumberCamp);
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        let working = state.working_population();
        assert_eq!(
            allocation.wood,
            working - allocation.food - allocation.builders
        );
        assert_eq!(allocation.gold, 0);
    }

    #[test]
    fn post_transition_surplus_splits_between_wood_and_food() {
        let mut state = state(22, 30, stocked(1000.0, 1000.0, 1000.0));
        state.age = Age::Feudal;
        state.tech.loom = true;
        state.add_structure(StructureKind::LumberCamp);
        let context = AllocContext {
            target_population: 21,
            ..ctx(&state, &[])
        };
        let allocation = allocate(&context, &HeuristicProfile::default());
        assert!(allocation.wood > 0);
        assert!(allocation.food > HeuristicProfile::default().food_floor(FoodKind::Sheep));
    }

    #[test]
    fn committed_builders_stay_on_the_job() {
        let goals = [goal(StructureKind::LumberCamp, 80)];
        let state = state(10, 20, stocked(500.0, 500.0, 0.0));
        let context = AllocContext {
            committed_builders: 1,
            ..ctx(&state, &goals)
        };
        let allocation = allocate(&context, &HeuristicProfile::default());
        assert_eq!(allocation.builders, 1);
        assert_eq!(allocation.intent, None);
    }

    #[test]
    fn zero_population_allocates_nothing() {
        let state = state(1, 5, stocked(0.0, 0.0, 0.0));
        let allocation = allocate(&ctx(&state, &[]), &HeuristicProfile::default());
        assert_eq!(allocation, Allocation::default());
    }
}
