//! Scenario loading and validation.
//!
//! A scenario is the configuration record for one pass: civilization,
//! strategy archetype, target population, map type and the optional lure
//! toggles. Everything is checked against the known enumerations and sane
//! ranges before a pass is allowed to start; the loop itself never sees an
//! invalid value.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::food::FoodLedger;
use crate::tables::{map_profile, Civilization, MapType, Strategy};
use crate::world::{EconomyState, Stockpile};

fn default_true() -> bool {
    true
}

fn default_sample_interval_ticks() -> u64 {
    15
}

fn default_starting_population() -> u32 {
    4
}

fn default_starting_stock() -> Stockpile {
    Stockpile {
        food: 200.0,
        wood: 200.0,
        gold: 100.0,
        stone: 200.0,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub civilization: Civilization,
    pub strategy: Strategy,
    pub map: MapType,
    pub target_population: u32,
    #[serde(default = "default_true")]
    pub lure_boar: bool,
    #[serde(default)]
    pub lure_deer: bool,
    #[serde(default)]
    pub skip_loom: bool,
    #[serde(default = "default_starting_population")]
    pub starting_population: u32,
    #[serde(default = "default_starting_stock")]
    pub starting_stock: Stockpile,
    #[serde(default = "default_sample_interval_ticks")]
    pub sample_interval_ticks: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario validation error: {0}")]
    Validation(String),
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::Validation(
                "scenario must have a name".into(),
            ));
        }
        if self.starting_population < 2 {
            return Err(ScenarioError::Validation(
                "starting population needs at least one worker and the scout".into(),
            ));
        }
        if self.target_population <= self.starting_population {
            return Err(ScenarioError::Validation(format!(
                "target population {} must exceed the starting population {}",
                self.target_population, self.starting_population
            )));
        }
        if self.target_population > 60 {
            return Err(ScenarioError::Validation(format!(
                "target population {} is beyond the early game",
                self.target_population
            )));
        }
        if self.sample_interval_ticks == 0 {
            return Err(ScenarioError::Validation(
                "sample interval must be at least one tick".into(),
            ));
        }
        for (label, value) in [
            ("food", self.starting_stock.food),
            ("wood", self.starting_stock.wood),
            ("gold", self.starting_stock.gold),
            ("stone", self.starting_stock.stone),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScenarioError::Validation(format!(
                    "starting {label} stock must be finite and non-negative"
                )));
            }
        }
        Ok(())
    }

    /// Fresh state for one pass. Each call builds an isolated copy so
    /// passes can never share mutable structures.
    pub fn build_state(&self) -> EconomyState {
        let mut stocks = self.starting_stock;
        stocks.add(&self.civilization.starting_bonus());
        EconomyState::new(self.starting_population, stocks)
    }

    /// Fresh food queues for one pass.
    pub fn build_ledger(&self) -> FoodLedger {
        FoodLedger::from_map(
            &map_profile(self.map),
            self.civilization.source_longevity_multiplier(),
            self.lure_boar,
            self.lure_deer,
        )
    }

    /// The stock scouts opening used across the test suite and docs.
    pub fn example() -> Self {
        Self {
            name: "scouts_21".into(),
            description: None,
            civilization: Civilization::Generic,
            strategy: Strategy::Scouts,
            map: MapType::Arabia,
            target_population: 21,
            lure_boar: true,
            lure_deer: false,
            skip_loom: false,
            starting_population: default_starting_population(),
            starting_stock: default_starting_stock(),
            sample_interval_ticks: default_sample_interval_ticks(),
            ticks: None,
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario in {}", path.display()))?;
        Ok(scenario)
    }
}
