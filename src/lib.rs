pub mod advisory;
pub mod allocation;
pub mod engine;
pub mod food;
pub mod gather;
pub mod goals;
pub mod report;
pub mod scenario;
pub mod score;
pub mod tables;
pub mod variants;
pub mod world;

pub use engine::{run_pass, Engine, EngineSettings};
pub use scenario::{Scenario, ScenarioLoader};
pub use variants::{generate_variants, run_best, HeuristicProfile};
pub use world::PassResult;
