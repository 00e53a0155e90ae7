//! Food source ledger.
//!
//! Holds the queues of depletable and renewable food sources and the single
//! active source being gathered from. Substitution follows a fixed priority
//! order: boar once the camp can spare the feeders, remaining sheep, lured
//! deer when enabled, the shared berry patch once a mill stands, then farms
//! seeded on demand for wood.

use crate::tables::{FoodKind, MapProfile};

/// Population required before a boar is pulled in.
const BOAR_POP_MIN: u32 = 9;

const BOAR_FOOD: f64 = 340.0;
const SHEEP_FOOD: f64 = 100.0;
const DEER_FOOD: f64 = 140.0;
const FARM_FOOD: f64 = 175.0;

/// Spoilage per second while a carcass sits on the ground.
const BOAR_DECAY: f64 = 0.15;
const SHEEP_DECAY: f64 = 0.06;
const DEER_DECAY: f64 = 0.10;

/// Farms walk farther as the close ring around the drop-off fills up.
const FARM_RING_SIZE: u32 = 8;
const FARM_DISTANCE_NEAR: f64 = 1.0;
const FARM_DISTANCE_MID: f64 = 2.5;
const FARM_DISTANCE_FAR: f64 = 4.0;

impl FoodKind {
    /// Base extraction rate while standing at the source, units per second.
    pub fn raw_yield_per_sec(self) -> f64 {
        match self {
            FoodKind::Boar => 0.40,
            FoodKind::Sheep => 0.33,
            FoodKind::Deer => 0.35,
            FoodKind::Berries => 0.31,
            FoodKind::Farm => 0.32,
        }
    }

    /// Physical access around the source before crowding sets in.
    pub fn access_points(self) -> u32 {
        match self {
            FoodKind::Boar => 9,
            FoodKind::Sheep => 8,
            FoodKind::Deer => 8,
            FoodKind::Berries => 10,
            FoodKind::Farm => 12,
        }
    }
}

/// One live food source. Created when drawn from its queue, discarded once
/// the remaining amount reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodSource {
    pub kind: FoodKind,
    pub remaining: f64,
    pub max_amount: f64,
    pub decay_per_sec: f64,
    pub renewable: bool,
    pub distance_tiles: f64,
}

impl FoodSource {
    fn new(kind: FoodKind, amount: f64, decay_per_sec: f64, distance_tiles: f64) -> Self {
        Self {
            kind,
            remaining: amount,
            max_amount: amount,
            decay_per_sec,
            renewable: decay_per_sec == 0.0,
            distance_tiles,
        }
    }
}

/// Outcome of a substitution check at the top of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    /// The active source still holds food.
    Unchanged,
    /// A fresh source was drawn from a queue.
    Switched(FoodKind),
    /// A farm was seeded; the caller owes the wood for it.
    FarmSeeded,
    /// Every queue is empty and no farm could be afforded.
    Starved,
}

#[derive(Debug, Clone)]
pub struct FoodLedger {
    boars: u32,
    sheep: u32,
    deer: u32,
    berry_pool: f64,
    active: Option<FoodSource>,
    farms_seeded: u32,
    decayed_total: f64,
    longevity: f64,
}

impl FoodLedger {
    /// Build the queues for a map. Disabled lure toggles remove their queue
    /// entirely; substitution then skips that kind without further checks.
    pub fn from_map(profile: &MapProfile, longevity: f64, lure_boar: bool, lure_deer: bool) -> Self {
        Self {
            boars: if lure_boar { profile.boars } else { 0 },
            sheep: profile.sheep,
            deer: if lure_deer { profile.deer } else { 0 },
            berry_pool: profile.berry_food * longevity,
            active: None,
            farms_seeded: 0,
            decayed_total: 0.0,
            longevity,
        }
    }

    pub fn active(&self) -> Option<&FoodSource> {
        self.active.as_ref()
    }

    pub fn farms_seeded(&self) -> u32 {
        self.farms_seeded
    }

    pub fn decayed_total(&self) -> f64 {
        self.decayed_total
    }

    /// Spoil the active carcass. Runs every tick whether or not anyone is
    /// gathering from it.
    pub fn decay(&mut self, dt_secs: f64) {
        if let Some(source) = self.active.as_mut() {
            if source.decay_per_sec > 0.0 && source.remaining > 0.0 {
                let lost = (source.decay_per_sec * dt_secs).min(source.remaining);
                source.remaining -= lost;
                self.decayed_total += lost;
            }
        }
    }

    /// Take up to `demand` units from the active source. Excess demand is
    /// clipped to what is left; the amount never goes negative.
    pub fn consume(&mut self, demand: f64) -> f64 {
        match self.active.as_mut() {
            Some(source) if demand > 0.0 => {
                let taken = demand.min(source.remaining);
                source.remaining -= taken;
                taken
            }
            _ => 0.0,
        }
    }

    /// Discard an exhausted active source and draw the next candidate in
    /// priority order. Must run before gather application so an emptied
    /// source is never gathered from on the tick after it empties.
    pub fn ensure_active(
        &mut self,
        population: u32,
        mill_built: bool,
        can_afford_farm: bool,
    ) -> Substitution {
        if let Some(source) = self.active.as_ref() {
            if source.remaining > 0.0 {
                return Substitution::Unchanged;
            }
        }
        self.active = None;

        if self.boars > 0 && population >= BOAR_POP_MIN {
            self.boars -= 1;
            self.active = Some(FoodSource::new(
                FoodKind::Boar,
                BOAR_FOOD * self.longevity,
                BOAR_DECAY,
                0.1,
            ));
            return Substitution::Switched(FoodKind::Boar);
        }
        if self.sheep > 0 {
            self.sheep -= 1;
            self.active = Some(FoodSource::new(
                FoodKind::Sheep,
                SHEEP_FOOD * self.longevity,
                SHEEP_DECAY,
                0.1,
            ));
            return Substitution::Switched(FoodKind::Sheep);
        }
        if self.deer > 0 {
            self.deer -= 1;
            self.active = Some(FoodSource::new(
                FoodKind::Deer,
                DEER_FOOD * self.longevity,
                DEER_DECAY,
                0.6,
            ));
            return Substitution::Switched(FoodKind::Deer);
        }
        if self.berry_pool > 0.0 && mill_built {
            let amount = self.berry_pool;
            self.berry_pool = 0.0;
            self.active = Some(FoodSource::new(FoodKind::Berries, amount, 0.0, 2.0));
            return Substitution::Switched(FoodKind::Berries);
        }
        if can_afford_farm {
            let distance = farm_distance(self.farms_seeded);
            self.farms_seeded += 1;
            self.active = Some(FoodSource::new(
                FoodKind::Farm,
                FARM_FOOD * self.longevity,
                0.0,
                distance,
            ));
            return Substitution::FarmSeeded;
        }
        Substitution::Starved
    }
}

fn farm_distance(farms_already: u32) -> f64 {
    if farms_already < FARM_RING_SIZE {
        FARM_DISTANCE_NEAR
    } else if farms_already < FARM_RING_SIZE * 2 {
        FARM_DISTANCE_MID
    } else {
        FARM_DISTANCE_FAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{map_profile, MapType};

    fn ledger(lure_boar: bool, lure_deer: bool) -> FoodLedger {
        FoodLedger::from_map(&map_profile(MapType::Arabia), 1.0, lure_boar, lure_deer)
    }

    fn drain(ledger: &mut FoodLedger) {
        let remaining = ledger.active().map(|s| s.remaining).unwrap_or(0.0);
        ledger.consume(remaining);
    }

    #[test]
    fn sheep_come_first_below_the_boar_threshold() {
        let mut ledger = ledger(true, true);
        assert_eq!(
            ledger.ensure_active(4, false, false),
            Substitution::Switched(FoodKind::Sheep)
        );
    }

    #[test]
    fn boars_take_priority_once_population_allows() {
        let mut ledger = ledger(true, true);
        assert_eq!(
            ledger.ensure_active(BOAR_POP_MIN, false, false),
            Substitution::Switched(FoodKind::Boar)
        );
    }

    #[test]
    fn substitution_order_runs_to_farms() {
        let mut ledger = ledger(true, true);
        let profile = map_profile(MapType::Arabia);
        // Two boars, then sheep, then deer, then berries, then a farm.
        for _ in 0..profile.boars {
            assert_eq!(
                ledger.ensure_active(20, true, true),
                Substitution::Switched(FoodKind::Boar)
            );
            drain(&mut ledger);
        }
        for _ in 0..profile.sheep {
            assert_eq!(
                ledger.ensure_active(20, true, true),
                Substitution::Switched(FoodKind::Sheep)
            );
            drain(&mut ledger);
        }
        for _ in 0..profile.deer {
            assert_eq!(
                ledger.ensure_active(20, true, true),
                Substitution::Switched(FoodKind::Deer)
            );
            drain(&mut ledger);
        }
        assert_eq!(
            ledger.ensure_active(20, true, true),
            Substitution::Switched(FoodKind::Berries)
        );
        drain(&mut ledger);
        assert_eq!(ledger.ensure_active(20, true, true), Substitution::FarmSeeded);
        assert_eq!(ledger.farms_seeded(), 1);
    }

    #[test]
    fn disabled_lures_drop_out_of_the_order() {
        let mut ledger = ledger(false, false);
        let profile = map_profile(MapType::Arabia);
        for _ in 0..profile.sheep {
            assert_eq!(
                ledger.ensure_active(20, true, true),
                Substitution::Switched(FoodKind::Sheep)
            );
            drain(&mut ledger);
        }
        // No boar, no deer: straight to berries.
        assert_eq!(
            ledger.ensure_active(20, true, true),
            Substitution::Switched(FoodKind::Berries)
        );
    }

    #[test]
    fn berries_wait_for_a_mill_and_farms_wait_for_wood() {
        let mut ledger = ledger(false, false);
        for _ in 0..map_profile(MapType::Arabia).sheep {
            ledger.ensure_active(20, false, false);
            drain(&mut ledger);
        }
        assert_eq!(ledger.ensure_active(20, false, false), Substitution::Starved);
        assert!(ledger.active().is_none());
        assert_eq!(ledger.ensure_active(20, false, true), Substitution::FarmSeeded);
    }

    #[test]
    fn consumption_is_clipped_to_the_remaining_amount() {
        let mut ledger = ledger(false, false);
        ledger.ensure_active(4, false, false);
        let taken = ledger.consume(SHEEP_FOOD * 3.0);
        assert_eq!(taken, SHEEP_FOOD);
        assert_eq!(ledger.active().unwrap().remaining, 0.0);
        let extra = ledger.consume(10.0);
        assert_eq!(extra, 0.0);
    }

    #[test]
    fn decay_spoils_carcasses_and_is_accounted() {
        let mut ledger = ledger(false, false);
        ledger.ensure_active(4, false, false);
        ledger.decay(10.0);
        let source = ledger.active().unwrap();
        assert!(source.remaining < source.max_amount);
        assert!(ledger.decayed_total() > 0.0);
        assert!(
            (source.max_amount - source.remaining - ledger.decayed_total()).abs() < 1e-9
        );
    }

    #[test]
    fn renewable_sources_do_not_decay() {
        let mut ledger = ledger(false, false);
        for _ in 0..map_profile(MapType::Arabia).sheep {
            ledger.ensure_active(20, true, false);
            drain(&mut ledger);
        }
        ledger.ensure_active(20, true, false);
        assert_eq!(ledger.active().unwrap().kind, FoodKind::Berries);
        let before = ledger.decayed_total();
        ledger.decay(30.0);
        assert_eq!(ledger.decayed_total(), before);
    }

    #[test]
    fn farm_rings_step_outward() {
        assert_eq!(farm_distance(0), FARM_DISTANCE_NEAR);
        assert_eq!(farm_distance(7), FARM_DISTANCE_NEAR);
        assert_eq!(farm_distance(8), FARM_DISTANCE_MID);
        assert_eq!(farm_distance(16), FARM_DISTANCE_FAR);
    }

    #[test]
    fn longevity_scales_the_queued_amounts() {
        let mut generous =
            FoodLedger::from_map(&map_profile(MapType::Arabia), 1.15, false, false);
        generous.ensure_active(4, false, false);
        assert_eq!(generous.active().unwrap().max_amount, SHEEP_FOOD * 1.15);
    }
}
