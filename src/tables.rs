//! Static cost and rate tables supplied to a pass at start.
//!
//! Everything in here is read-only reference data: structure costs and build
//! times, villager stats, per-civilization bonus descriptors, per-map
//! resource counts. A missing entry for a known enumeration value is a
//! programming error, not a runtime condition.

use serde::{Deserialize, Serialize};

use crate::world::Stockpile;

/// Seconds to train one villager at the population center.
pub const TRAIN_INTERVAL_SECS: f64 = 25.0;
/// Food price of one villager.
pub const VILLAGER_FOOD_COST: f64 = 50.0;
/// One-way walking speed of a villager, tiles per second.
pub const VILLAGER_WALK_SPEED: f64 = 0.8;
/// Resource units a villager holds before walking back to a drop-off.
pub const VILLAGER_CARRY_CAPACITY: f64 = 10.0;

/// Housing room granted by the population center itself.
pub const CENTER_POP_ROOM: u32 = 5;
/// Housing room granted by each completed house.
pub const HOUSE_POP_ROOM: u32 = 5;

/// Food price of the age advancement purchase.
pub const AGE_ADVANCE_FOOD_COST: f64 = 500.0;
/// Research time of the age advancement, seconds.
pub const AGE_RESEARCH_SECS: f64 = 130.0;

/// Gold price of loom.
pub const LOOM_GOLD_COST: f64 = 50.0;
/// Research time of loom, seconds.
pub const LOOM_RESEARCH_SECS: f64 = 25.0;

/// Yield factor granted by double-bit axe on the tree line.
pub const DOUBLE_BIT_AXE_YIELD: f64 = 1.2;
/// Yield factor granted by horse collar on farms.
pub const HORSE_COLLAR_FARM_YIELD: f64 = 1.1;
/// Carry and speed factors granted by wheelbarrow.
pub const WHEELBARROW_CARRY: f64 = 1.25;
pub const WHEELBARROW_SPEED: f64 = 1.1;

/// Base gather rate on a tree line, food-units equivalent per second.
pub const WOOD_RAW_YIELD: f64 = 0.39;
/// Base gather rate on a gold pile per second.
pub const GOLD_RAW_YIELD: f64 = 0.38;
/// Tiles walked one way to the tree line, with and without a lumber camp.
pub const WOOD_DISTANCE_CAMPED: f64 = 1.0;
pub const WOOD_DISTANCE_UNCAMPED: f64 = 3.0;
/// Tiles walked one way to the gold pile, with and without a mining camp.
pub const GOLD_DISTANCE_CAMPED: f64 = 1.0;
pub const GOLD_DISTANCE_UNCAMPED: f64 = 6.0;
/// Access points around a tree line and a gold pile.
pub const WOOD_ACCESS_POINTS: u32 = 20;
pub const GOLD_ACCESS_POINTS: u32 = 8;

/// Resource price of a structure. Stone is never charged in the early game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub food: f64,
    pub wood: f64,
    pub gold: f64,
}

impl Cost {
    pub fn covered_by(&self, stock: &Stockpile) -> bool {
        stock.food >= self.food && stock.wood >= self.wood && stock.gold >= self.gold
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            food: self.food * factor,
            wood: self.wood * factor,
            gold: self.gold * factor,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    House,
    LumberCamp,
    Mill,
    MiningCamp,
    Barracks,
    ArcheryRange,
    Stable,
    Farm,
}

impl StructureKind {
    pub fn label(self) -> &'static str {
        match self {
            StructureKind::House => "house",
            StructureKind::LumberCamp => "lumber camp",
            StructureKind::Mill => "mill",
            StructureKind::MiningCamp => "mining camp",
            StructureKind::Barracks => "barracks",
            StructureKind::ArcheryRange => "archery range",
            StructureKind::Stable => "stable",
            StructureKind::Farm => "farm",
        }
    }
}

/// Undiscounted price of a structure.
pub fn structure_cost(kind: StructureKind) -> Cost {
    match kind {
        StructureKind::House => Cost {
            food: 0.0,
            wood: 25.0,
            gold: 0.0,
        },
        StructureKind::LumberCamp | StructureKind::Mill | StructureKind::MiningCamp => Cost {
            food: 0.0,
            wood: 100.0,
            gold: 0.0,
        },
        StructureKind::Barracks | StructureKind::ArcheryRange | StructureKind::Stable => Cost {
            food: 0.0,
            wood: 175.0,
            gold: 0.0,
        },
        StructureKind::Farm => Cost {
            food: 0.0,
            wood: 60.0,
            gold: 0.0,
        },
    }
}

/// Nominal single-builder construction time, seconds.
pub fn build_time_secs(kind: StructureKind) -> f64 {
    match kind {
        StructureKind::House => 25.0,
        StructureKind::LumberCamp | StructureKind::Mill | StructureKind::MiningCamp => 35.0,
        StructureKind::Barracks | StructureKind::ArcheryRange | StructureKind::Stable => 50.0,
        StructureKind::Farm => 15.0,
    }
}

/// Economy-efficiency researches eligible for the post-advancement
/// auto-purchase, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcoTech {
    DoubleBitAxe,
    HorseCollar,
    Wheelbarrow,
}

pub const ECO_TECHS: &[EcoTech] = &[EcoTech::DoubleBitAxe, EcoTech::HorseCollar, EcoTech::Wheelbarrow];

impl EcoTech {
    pub fn cost(self) -> Cost {
        match self {
            EcoTech::DoubleBitAxe => Cost {
                food: 100.0,
                wood: 50.0,
                gold: 0.0,
            },
            EcoTech::HorseCollar => Cost {
                food: 75.0,
                wood: 75.0,
                gold: 0.0,
            },
            EcoTech::Wheelbarrow => Cost {
                food: 175.0,
                wood: 50.0,
                gold: 0.0,
            },
        }
    }

    /// Structure that must already stand before the research is offered.
    pub fn prerequisite(self) -> Option<StructureKind> {
        match self {
            EcoTech::DoubleBitAxe => Some(StructureKind::LumberCamp),
            EcoTech::HorseCollar => Some(StructureKind::Mill),
            EcoTech::Wheelbarrow => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EcoTech::DoubleBitAxe => "double-bit axe",
            EcoTech::HorseCollar => "horse collar",
            EcoTech::Wheelbarrow => "wheelbarrow",
        }
    }
}

/// Kinds of food source a pass can gather from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Boar,
    Sheep,
    Deer,
    Berries,
    Farm,
}

impl FoodKind {
    pub fn label(self) -> &'static str {
        match self {
            FoodKind::Boar => "boar",
            FoodKind::Sheep => "sheep",
            FoodKind::Deer => "deer",
            FoodKind::Berries => "berry patch",
            FoodKind::Farm => "farm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Civilization {
    Generic,
    Britons,
    Celts,
    Mongols,
    Mayans,
    Franks,
    Persians,
    Spanish,
    Japanese,
}

impl Civilization {
    /// Multiplicative raw-yield bonus on a food source kind.
    pub fn food_yield_multiplier(self, kind: FoodKind) -> f64 {
        match (self, kind) {
            (Civilization::Britons, FoodKind::Sheep) => 1.25,
            (Civilization::Mongols, FoodKind::Boar | FoodKind::Deer) => 1.4,
            (Civilization::Franks, FoodKind::Berries) => 1.15,
            _ => 1.0,
        }
    }

    /// Multiplicative raw-yield bonus on the tree line.
    pub fn wood_yield_multiplier(self) -> f64 {
        match self {
            Civilization::Celts => 1.15,
            _ => 1.0,
        }
    }

    /// Multiplicative raw-yield bonus on the gold pile.
    pub fn gold_yield_multiplier(self) -> f64 {
        1.0
    }

    /// Flat cost discount factor for a structure kind.
    pub fn cost_multiplier(self, kind: StructureKind) -> f64 {
        match (self, kind) {
            (
                Civilization::Japanese,
                StructureKind::LumberCamp | StructureKind::Mill | StructureKind::MiningCamp,
            ) => 0.5,
            _ => 1.0,
        }
    }

    /// Food sources last longer for civilizations that waste less.
    pub fn source_longevity_multiplier(self) -> f64 {
        match self {
            Civilization::Mayans => 1.15,
            _ => 1.0,
        }
    }

    /// Construction speed factor applied to every builder.
    pub fn build_rate_multiplier(self) -> f64 {
        match self {
            Civilization::Spanish => 1.3,
            _ => 1.0,
        }
    }

    /// Extra starting resources on top of the map baseline.
    pub fn starting_bonus(self) -> Stockpile {
        match self {
            Civilization::Persians => Stockpile {
                food: 50.0,
                wood: 50.0,
                gold: 0.0,
                stone: 0.0,
            },
            _ => Stockpile::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Scouts,
    Archers,
    Drush,
}

impl Strategy {
    /// Whether the follow-up army spends gold at the age transition.
    pub fn needs_gold(self) -> bool {
        matches!(self, Strategy::Archers)
    }

    /// Population at which a gold-processing structure becomes worthwhile.
    pub fn gold_pop_threshold(self) -> u32 {
        match self {
            Strategy::Archers => 16,
            _ => u32::MAX,
        }
    }

    /// Whether a military production structure is wanted from the start.
    pub fn military_immediate(self) -> bool {
        matches!(self, Strategy::Drush)
    }

    /// Whether the opening leans on wood income (farm and house heavy).
    pub fn wood_dependent(self) -> bool {
        matches!(self, Strategy::Scouts | Strategy::Drush)
    }

    /// Military structure unlocked right after the age transition.
    pub fn secondary_structure(self) -> StructureKind {
        match self {
            Strategy::Scouts => StructureKind::Stable,
            Strategy::Archers | Strategy::Drush => StructureKind::ArcheryRange,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Strategy::Scouts => "scouts",
            Strategy::Archers => "archers",
            Strategy::Drush => "drush",
        }
    }
}

/// Table-driven counter estimate for reporting. No combat is simulated;
/// this string rides along in the result for the advisory collaborator.
pub fn counter_hint(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Scouts => "spearman line behind early palisades",
        Strategy::Archers => "skirmisher line and forward towers",
        Strategy::Drush => "quick-walled resources and a defensive spearman pair",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapType {
    Arabia,
    Arena,
    Highland,
}

/// Starting wildlife and forage counts for a map type.
#[derive(Debug, Clone, Copy)]
pub struct MapProfile {
    pub sheep: u32,
    pub boars: u32,
    pub deer: u32,
    pub berry_food: f64,
}

pub fn map_profile(map: MapType) -> MapProfile {
    match map {
        MapType::Arabia => MapProfile {
            sheep: 8,
            boars: 2,
            deer: 3,
            berry_food: 750.0,
        },
        MapType::Arena => MapProfile {
            sheep: 8,
            boars: 2,
            deer: 4,
            berry_food: 875.0,
        },
        MapType::Highland => MapProfile {
            sheep: 8,
            boars: 1,
            deer: 4,
            berry_food: 750.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_structure_has_a_cost_and_build_time() {
        let kinds = [
            StructureKind::House,
            StructureKind::LumberCamp,
            StructureKind::Mill,
            StructureKind::MiningCamp,
            StructureKind::Barracks,
            StructureKind::ArcheryRange,
            StructureKind::Stable,
            StructureKind::Farm,
        ];
        for kind in kinds {
            let cost = structure_cost(kind);
            assert!(cost.wood > 0.0, "{} should price wood", kind.label());
            assert!(build_time_secs(kind) > 0.0);
        }
    }

    #[test]
    fn civilization_bonuses_stay_multiplicative() {
        assert_eq!(
            Civilization::Britons.food_yield_multiplier(FoodKind::Sheep),
            1.25
        );
        assert_eq!(
            Civilization::Britons.food_yield_multiplier(FoodKind::Boar),
            1.0
        );
        assert_eq!(Civilization::Celts.wood_yield_multiplier(), 1.15);
        assert_eq!(Civilization::Generic.source_longevity_multiplier(), 1.0);
    }

    #[test]
    fn gold_threshold_only_binds_for_gold_strategies() {
        assert_eq!(Strategy::Archers.gold_pop_threshold(), 16);
        assert_eq!(Strategy::Scouts.gold_pop_threshold(), u32::MAX);
        assert!(!Strategy::Scouts.needs_gold());
    }
}
