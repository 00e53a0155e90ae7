//! Simulation driver.
//!
//! Advances a pass one simulated second at a time. Every mutation of the
//! economy state funnels through the tick step here; the other modules are
//! pure functions or self-contained ledgers the driver consults in a fixed
//! order. A pass does no I/O and holds no hidden state, so identical
//! scenarios always replay to identical results.

use tracing::{debug, info};

use crate::allocation::{allocate, AllocContext, Allocation, BuildIntent};
use crate::food::{FoodLedger, Substitution};
use crate::gather::{sustained_rate_per_min, GatherParams, UpgradeEffect};
use crate::goals::{next_goals, BuildingGoal};
use crate::scenario::Scenario;
use crate::score::{efficiency_score, format_time};
use crate::tables::{
    build_time_secs, counter_hint, structure_cost, Cost, EcoTech, FoodKind, StructureKind,
    AGE_ADVANCE_FOOD_COST, AGE_RESEARCH_SECS, DOUBLE_BIT_AXE_YIELD, ECO_TECHS,
    GOLD_ACCESS_POINTS, GOLD_DISTANCE_CAMPED, GOLD_DISTANCE_UNCAMPED, GOLD_RAW_YIELD,
    HORSE_COLLAR_FARM_YIELD, HOUSE_POP_ROOM, LOOM_GOLD_COST, LOOM_RESEARCH_SECS,
    TRAIN_INTERVAL_SECS, VILLAGER_CARRY_CAPACITY, VILLAGER_FOOD_COST, VILLAGER_WALK_SPEED,
    WHEELBARROW_CARRY, WHEELBARROW_SPEED, WOOD_ACCESS_POINTS, WOOD_DISTANCE_CAMPED,
    WOOD_DISTANCE_UNCAMPED, WOOD_RAW_YIELD,
};
use crate::variants::HeuristicProfile;
use crate::world::{
    Age, BuildStep, EconomyState, EfficiencySample, Milestones, PassResult, PassStats,
    ResourceSample, StepCategory,
};

/// Hard tick cap of a pass, one simulated second per tick.
pub const DEFAULT_TICK_CAP: u64 = 1300;

const TICK_SECS: f64 = 1.0;

/// How long a pass keeps running after the first age transition completes.
const POST_TRANSITION_BUFFER_SECS: f64 = 120.0;

pub struct EngineSettings {
    pub tick_cap: u64,
    pub sample_interval_ticks: u64,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            tick_cap: scenario.ticks.unwrap_or(DEFAULT_TICK_CAP),
            sample_interval_ticks: scenario.sample_interval_ticks,
        }
    }
}

pub struct Engine {
    settings: EngineSettings,
    profile: HeuristicProfile,
}

impl Engine {
    pub fn new(settings: EngineSettings, profile: HeuristicProfile) -> Self {
        Self { settings, profile }
    }

    /// Run one isolated pass over the scenario and score the outcome.
    pub fn run(&self, scenario: &Scenario) -> PassResult {
        let mut pass = Pass::new(scenario, &self.profile);
        for tick in 1..=self.settings.tick_cap {
            pass.step(tick, self.settings.sample_interval_ticks);
            if let Some(reached) = pass.age_reached_secs {
                if pass.state.elapsed_secs >= reached + POST_TRANSITION_BUFFER_SECS {
                    break;
                }
            }
        }
        pass.finish()
    }
}

/// Run a pass with default engine settings derived from the scenario.
pub fn run_pass(scenario: &Scenario, profile: &HeuristicProfile) -> PassResult {
    Engine::new(EngineSettings::from_scenario(scenario), profile.clone()).run(scenario)
}

/// The single structure under construction. A second one cannot start
/// while this exists; building throughput is serialized.
#[derive(Debug, Clone)]
struct ActiveConstruction {
    kind: StructureKind,
    remaining_secs: f64,
    builders: u32,
}

/// The one production slot at the population center.
#[derive(Debug, Clone, Copy)]
enum CenterActivity {
    Villager { remaining_secs: f64 },
    Loom { remaining_secs: f64 },
    AgeResearch { remaining_secs: f64 },
}

struct Pass<'a> {
    scenario: &'a Scenario,
    profile: &'a HeuristicProfile,
    state: EconomyState,
    ledger: FoodLedger,
    construction: Option<ActiveConstruction>,
    center: Option<CenterActivity>,
    log: Vec<BuildStep>,
    resource_curve: Vec<ResourceSample>,
    efficiency_curve: Vec<EfficiencySample>,
    pending: Vec<(String, StepCategory)>,
    idle_secs: f64,
    age_click_secs: Option<f64>,
    age_reached_secs: Option<f64>,
    now: f64,
}

impl<'a> Pass<'a> {
    fn new(scenario: &'a Scenario, profile: &'a HeuristicProfile) -> Self {
        Self {
            scenario,
            profile,
            state: scenario.build_state(),
            ledger: scenario.build_ledger(),
            construction: None,
            center: None,
            log: Vec::new(),
            resource_curve: Vec::new(),
            efficiency_curve: Vec::new(),
            pending: Vec::new(),
            idle_secs: 0.0,
            age_click_secs: None,
            age_reached_secs: None,
            now: 0.0,
        }
    }

    fn step(&mut self, tick: u64, sample_interval_ticks: u64) {
        self.now = self.state.elapsed_secs;

        self.advance_construction();
        self.refresh_food();

        let goals = next_goals(
            self.scenario.strategy,
            &self.state.structures,
            self.scenario.civilization,
            self.state.population,
            self.scenario.target_population,
        );
        let allocation = allocate(
            &AllocContext {
                state: &self.state,
                active_food: self.ledger.active().map(|source| source.kind),
                goals: &goals,
                committed_builders: self
                    .construction
                    .as_ref()
                    .map(|c| c.builders)
                    .unwrap_or(0),
                strategy: self.scenario.strategy,
                house_cost: self.house_cost(),
                target_population: self.scenario.target_population,
                skip_loom: self.scenario.skip_loom,
            },
            self.profile,
        );
        self.flush_pending(&allocation);

        self.apply_gather(&allocation);
        self.start_construction(&allocation, &goals);
        self.center_slot(&allocation);
        self.flush_pending(&allocation);

        self.state.elapsed_secs += TICK_SECS;
        if tick % sample_interval_ticks == 0 {
            self.sample();
        }
    }

    fn house_cost(&self) -> Cost {
        structure_cost(StructureKind::House).scaled(
            self.scenario
                .civilization
                .cost_multiplier(StructureKind::House),
        )
    }

    fn advance_construction(&mut self) {
        let Some(active) = self.construction.as_mut() else {
            return;
        };
        // Extra builders share the work at diminishing returns.
        let crew_rate = (active.builders as f64 + 2.0) / 3.0;
        let rate = crew_rate * self.scenario.civilization.build_rate_multiplier();
        active.remaining_secs -= TICK_SECS * rate;
        if active.remaining_secs <= 0.0 {
            let kind = active.kind;
            let builders = active.builders;
            self.construction = None;
            self.state.add_structure(kind);
            if kind == StructureKind::House {
                self.state.housing_capacity += HOUSE_POP_ROOM;
            }
            debug!(structure = kind.label(), builders, "construction complete");
        }
    }

    /// Spoil, discard and substitute food sources before any gathering
    /// happens, so an emptied source is never drawn from again.
    fn refresh_food(&mut self) {
        self.ledger.decay(TICK_SECS);
        let farm_cost = structure_cost(StructureKind::Farm).scaled(
            self.scenario
                .civilization
                .cost_multiplier(StructureKind::Farm),
        );
        let can_afford_farm = self.state.stocks.wood >= farm_cost.wood;
        let mill_built = self.state.has(StructureKind::Mill);
        match self
            .ledger
            .ensure_active(self.state.population, mill_built, can_afford_farm)
        {
            Substitution::Unchanged | Substitution::Starved => {}
            Substitution::Switched(kind) => {
                let label = match kind {
                    FoodKind::Boar => "Lure a boar in",
                    FoodKind::Sheep => "Herd the next sheep in",
                    FoodKind::Deer => "Push the deer toward camp",
                    FoodKind::Berries => "Move foragers to the berry patch",
                    FoodKind::Farm => "Move farmers to the next farm",
                };
                self.pending
                    .push((label.to_string(), StepCategory::Relocation));
            }
            Substitution::FarmSeeded => {
                self.state.stocks.pay(&farm_cost);
                self.state.add_structure(StructureKind::Farm);
                self.pending
                    .push(("Seed a new farm".to_string(), StepCategory::Construction));
            }
        }
    }

    fn flush_pending(&mut self, allocation: &Allocation) {
        let pending = std::mem::take(&mut self.pending);
        for (label, category) in pending {
            self.log_step(label, category, allocation);
        }
    }

    fn apply_gather(&mut self, allocation: &Allocation) {
        let civ = self.scenario.civilization;
        let tech = self.state.tech;
        let mut common: Vec<UpgradeEffect> = Vec::new();
        if tech.wheelbarrow {
            common.push(UpgradeEffect::CarryCapacity(WHEELBARROW_CARRY));
            common.push(UpgradeEffect::MoveSpeed(WHEELBARROW_SPEED));
        }

        if allocation.wood > 0 {
            let mut upgrades = common.clone();
            if tech.double_bit_axe {
                upgrades.push(UpgradeEffect::RawYield(DOUBLE_BIT_AXE_YIELD));
            }
            let distance = if self.state.has(StructureKind::LumberCamp) {
                WOOD_DISTANCE_CAMPED
            } else {
                WOOD_DISTANCE_UNCAMPED
            };
            let rate = sustained_rate_per_min(
                &GatherParams {
                    raw_yield_per_sec: WOOD_RAW_YIELD,
                    distance_tiles: distance,
                    civ_multiplier: civ.wood_yield_multiplier(),
                    carry_capacity: VILLAGER_CARRY_CAPACITY,
                    movement_speed: VILLAGER_WALK_SPEED,
                    workers: allocation.wood,
                    access_points: WOOD_ACCESS_POINTS,
                },
                &upgrades,
            );
            self.state.stocks.wood += rate * allocation.wood as f64 * TICK_SECS / 60.0;
        }

        if allocation.gold > 0 {
            let distance = if self.state.has(StructureKind::MiningCamp) {
                GOLD_DISTANCE_CAMPED
            } else {
                GOLD_DISTANCE_UNCAMPED
            };
            let rate = sustained_rate_per_min(
                &GatherParams {
                    raw_yield_per_sec: GOLD_RAW_YIELD,
                    distance_tiles: distance,
                    civ_multiplier: civ.gold_yield_multiplier(),
                    carry_capacity: VILLAGER_CARRY_CAPACITY,
                    movement_speed: VILLAGER_WALK_SPEED,
                    workers: allocation.gold,
                    access_points: GOLD_ACCESS_POINTS,
                },
                &common,
            );
            self.state.stocks.gold += rate * allocation.gold as f64 * TICK_SECS / 60.0;
        }

        if allocation.food > 0 {
            if let Some(source) = self.ledger.active() {
                let mut upgrades = common;
                if source.kind == FoodKind::Farm && tech.horse_collar {
                    upgrades.push(UpgradeEffect::RawYield(HORSE_COLLAR_FARM_YIELD));
                }
                let rate = sustained_rate_per_min(
                    &GatherParams {
                        raw_yield_per_sec: source.kind.raw_yield_per_sec(),
                        distance_tiles: source.distance_tiles,
                        civ_multiplier: civ.food_yield_multiplier(source.kind),
                        carry_capacity: VILLAGER_CARRY_CAPACITY,
                        movement_speed: VILLAGER_WALK_SPEED,
                        workers: allocation.food,
                        access_points: source.kind.access_points(),
                    },
                    &upgrades,
                );
                let demand = rate * allocation.food as f64 * TICK_SECS / 60.0;
                let consumed = self.ledger.consume(demand);
                self.state.stocks.food += consumed;
            }
        }
    }

    /// Houses take precedence over strategic goals when both want the
    /// builder. Nothing starts while another construction is up.
    fn start_construction(&mut self, allocation: &Allocation, goals: &[BuildingGoal]) {
        if self.construction.is_some() || allocation.builders == 0 {
            return;
        }
        match allocation.intent {
            Some(BuildIntent::House) => {
                let cost = self.house_cost();
                if cost.covered_by(&self.state.stocks) {
                    self.state.stocks.pay(&cost);
                    self.construction = Some(ActiveConstruction {
                        kind: StructureKind::House,
                        remaining_secs: build_time_secs(StructureKind::House),
                        builders: allocation.builders,
                    });
                    self.log_step("Build a house", StepCategory::Construction, allocation);
                }
            }
            Some(BuildIntent::Goal(kind)) => {
                let Some(goal) = goals.iter().find(|goal| goal.kind == kind) else {
                    return;
                };
                if goal.cost.covered_by(&self.state.stocks) {
                    self.state.stocks.pay(&goal.cost);
                    self.construction = Some(ActiveConstruction {
                        kind,
                        remaining_secs: build_time_secs(kind),
                        builders: allocation.builders,
                    });
                    self.log_step(
                        format!("Build a {}", kind.label()),
                        StepCategory::Construction,
                        allocation,
                    );
                }
            }
            None => {}
        }
    }

    fn center_slot(&mut self, allocation: &Allocation) {
        if let Some(activity) = self.center {
            match self.advance_center(activity) {
                Some(still_running) => {
                    self.center = Some(still_running);
                    return;
                }
                None => self.center = None,
            }
        }

        let target = self.scenario.target_population;
        let supports_met = self.state.has(StructureKind::LumberCamp)
            && (self.state.has(StructureKind::Mill) || self.state.has(StructureKind::MiningCamp));
        if self.state.age == Age::Dark
            && self.state.population >= target
            && supports_met
            && self.state.stocks.food >= AGE_ADVANCE_FOOD_COST
        {
            self.state.stocks.food -= AGE_ADVANCE_FOOD_COST;
            self.center = Some(CenterActivity::AgeResearch {
                remaining_secs: AGE_RESEARCH_SECS,
            });
            self.age_click_secs = Some(self.now);
            info!(at = %format_time(self.now), "age advancement clicked");
            self.log_step(
                "Click up to the next age",
                StepCategory::Research,
                allocation,
            );
        } else if !self.state.tech.loom
            && !self.scenario.skip_loom
            && self.state.population + self.profile.loom_lookahead >= target
            && self.state.stocks.gold >= LOOM_GOLD_COST
        {
            self.state.stocks.gold -= LOOM_GOLD_COST;
            self.center = Some(CenterActivity::Loom {
                remaining_secs: LOOM_RESEARCH_SECS,
            });
            self.log_step("Research loom", StepCategory::Research, allocation);
        } else if self.state.population < target
            && self.state.population < self.state.housing_capacity
            && self.state.stocks.food >= VILLAGER_FOOD_COST
        {
            // Creation is logged at completion, when the population it
            // produced is known.
            self.state.stocks.food -= VILLAGER_FOOD_COST;
            self.center = Some(CenterActivity::Villager {
                remaining_secs: TRAIN_INTERVAL_SECS,
            });
        } else if self.state.population < target {
            // Housing is full or food is short: the slot sits unused.
            self.idle_secs += TICK_SECS;
        }
    }

    /// Returns the activity if it still has time on the clock.
    fn advance_center(&mut self, activity: CenterActivity) -> Option<CenterActivity> {
        match activity {
            CenterActivity::Villager { remaining_secs } => {
                let left = remaining_secs - TICK_SECS;
                if left > 0.0 {
                    return Some(CenterActivity::Villager {
                        remaining_secs: left,
                    });
                }
                self.state.population += 1;
                self.pending
                    .push(("Create a villager".to_string(), StepCategory::Creation));
                None
            }
            CenterActivity::Loom { remaining_secs } => {
                let left = remaining_secs - TICK_SECS;
                if left > 0.0 {
                    return Some(CenterActivity::Loom {
                        remaining_secs: left,
                    });
                }
                self.state.tech.loom = true;
                debug!("loom finished");
                None
            }
            CenterActivity::AgeResearch { remaining_secs } => {
                let left = remaining_secs - TICK_SECS;
                if left > 0.0 {
                    return Some(CenterActivity::AgeResearch {
                        remaining_secs: left,
                    });
                }
                self.state.age = Age::Feudal;
                self.age_reached_secs = Some(self.now);
                info!(at = %format_time(self.now), "age transition complete");
                self.pending
                    .push(("Reach the next age".to_string(), StepCategory::Research));
                self.auto_purchase_eco_tech();
                None
            }
        }
    }

    /// One cheap efficiency research bought straight after the transition,
    /// first eligible and affordable entry wins.
    fn auto_purchase_eco_tech(&mut self) {
        for tech in ECO_TECHS {
            if self.eco_flag(*tech) {
                continue;
            }
            if let Some(prereq) = tech.prerequisite() {
                if !self.state.has(prereq) {
                    continue;
                }
            }
            let cost = tech.cost();
            if cost.covered_by(&self.state.stocks) {
                self.state.stocks.pay(&cost);
                self.set_eco_flag(*tech);
                self.pending.push((
                    format!("Research {}", tech.label()),
                    StepCategory::Research,
                ));
                break;
            }
        }
    }

    fn eco_flag(&self, tech: EcoTech) -> bool {
        match tech {
            EcoTech::DoubleBitAxe => self.state.tech.double_bit_axe,
            EcoTech::HorseCollar => self.state.tech.horse_collar,
            EcoTech::Wheelbarrow => self.state.tech.wheelbarrow,
        }
    }

    fn set_eco_flag(&mut self, tech: EcoTech) {
        match tech {
            EcoTech::DoubleBitAxe => self.state.tech.double_bit_axe = true,
            EcoTech::HorseCollar => self.state.tech.horse_collar = true,
            EcoTech::Wheelbarrow => self.state.tech.wheelbarrow = true,
        }
    }

    fn log_step(
        &mut self,
        label: impl Into<String>,
        category: StepCategory,
        allocation: &Allocation,
    ) {
        self.log.push(BuildStep {
            time_secs: self.now,
            population: self.state.population,
            label: label.into(),
            category,
            stocks: self.state.stocks,
            allocation: *allocation,
        });
    }

    fn sample(&mut self) {
        let elapsed = self.state.elapsed_secs;
        self.resource_curve.push(ResourceSample {
            time_secs: elapsed,
            population: self.state.population,
            stocks: self.state.stocks,
        });
        let utilization = if elapsed > 0.0 {
            (1.0 - self.idle_secs / elapsed).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.efficiency_curve.push(EfficiencySample {
            time_secs: elapsed,
            utilization,
            decayed_food: self.ledger.decayed_total(),
        });
    }

    fn finish(self) -> PassResult {
        let milestones = Milestones {
            age_click_secs: self.age_click_secs,
            age_reached_secs: self.age_reached_secs,
            age_click: self.age_click_secs.map(format_time),
            age_reached: self.age_reached_secs.map(format_time),
        };
        let score = efficiency_score(
            self.scenario.starting_population,
            self.scenario.target_population,
            &milestones,
            self.idle_secs,
        );
        PassResult {
            scenario: self.scenario.name.clone(),
            log: self.log,
            resource_curve: self.resource_curve,
            efficiency_curve: self.efficiency_curve,
            score,
            milestones,
            stats: PassStats {
                idle_secs: self.idle_secs,
                decayed_food: self.ledger.decayed_total(),
                farms_seeded: self.ledger.farms_seeded(),
            },
            final_population: self.state.population,
            counter_hint: counter_hint(self.scenario.strategy).to_string(),
        }
    }
}
