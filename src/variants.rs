//! Heuristic profile threading and the opening-variant extension point.
//!
//! Every tuning knob of the allocation heuristic lives in an explicit
//! profile object handed through each call. Passes never read ambient
//! state, so any number of them can run side by side on isolated inputs.

use serde::{Deserialize, Serialize};

use crate::engine::run_pass;
use crate::scenario::Scenario;
use crate::tables::FoodKind;
use crate::world::PassResult;

/// Tuning knobs of the allocation heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicProfile {
    /// Slack added to the house build time when projecting housing demand.
    pub house_buffer_secs: f64,
    /// Workers left off food during the pre-advancement food rush.
    pub rush_spare_workers: u32,
    /// How many villagers before target the loom savings start.
    pub loom_lookahead: u32,
    /// Minimum miners once a mining camp stands for a gold strategy.
    pub min_gold_workers: u32,
    /// Wood workers allowed before a lumber camp exists.
    pub precamp_wood_cap: u32,
    /// Gold weighting in the proportional need split.
    pub gold_weight: f64,
    /// Minimum food gatherers per source kind.
    pub food_floor_prey: u32,
    pub food_floor_berries: u32,
    pub food_floor_farm: u32,
}

impl Default for HeuristicProfile {
    fn default() -> Self {
        Self {
            house_buffer_secs: 15.0,
            rush_spare_workers: 1,
            loom_lookahead: 2,
            min_gold_workers: 3,
            precamp_wood_cap: 3,
            gold_weight: 2.0,
            food_floor_prey: 6,
            food_floor_berries: 7,
            food_floor_farm: 8,
        }
    }
}

impl HeuristicProfile {
    /// Slower sources need more hands for the same throughput.
    pub fn food_floor(&self, kind: FoodKind) -> u32 {
        match kind {
            FoodKind::Boar | FoodKind::Sheep | FoodKind::Deer => self.food_floor_prey,
            FoodKind::Berries => self.food_floor_berries,
            FoodKind::Farm => self.food_floor_farm,
        }
    }
}

/// Produce the candidate profiles for a scenario.
///
/// Deliberately a stub: exactly one configuration comes back today. A
/// future search would return several and let [`run_best`] pick.
pub fn generate_variants(_scenario: &Scenario) -> Vec<HeuristicProfile> {
    vec![HeuristicProfile::default()]
}

/// Run one isolated pass per profile and keep the best outcome.
///
/// Pure comparator: higher score wins, earlier completed transition breaks
/// ties. Each pass builds its own state; nothing is shared between them.
pub fn run_best(scenario: &Scenario, profiles: &[HeuristicProfile]) -> Option<PassResult> {
    let mut best: Option<PassResult> = None;
    for profile in profiles {
        let candidate = run_pass(scenario, profile);
        best = match best {
            None => Some(candidate),
            Some(current) => {
                if better(&candidate, &current) {
                    Some(candidate)
                } else {
                    Some(current)
                }
            }
        };
    }
    best
}

fn better(a: &PassResult, b: &PassResult) -> bool {
    if a.score != b.score {
        return a.score > b.score;
    }
    match (a.milestones.age_reached_secs, b.milestones.age_reached_secs) {
        (Some(ta), Some(tb)) => ta < tb,
        (Some(_), None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_variant_generator_is_a_single_profile_stub() {
        let scenario = Scenario::example();
        let variants = generate_variants(&scenario);
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0], HeuristicProfile::default());
    }

    #[test]
    fn food_floors_rise_for_slower_sources() {
        let profile = HeuristicProfile::default();
        assert!(profile.food_floor(FoodKind::Farm) >= profile.food_floor(FoodKind::Sheep));
    }
}
