use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agerush::{
    engine::{Engine, EngineSettings},
    report::ReportWriter,
    scenario::ScenarioLoader,
    score::format_time,
    variants::{generate_variants, run_best, HeuristicProfile},
    world::StepCategory,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Early-game build order pass runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/scouts_21.yaml")]
    scenario: PathBuf,

    /// Override tick cap (uses the engine default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Directory for the JSON report (skipped when omitted)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Score every generated heuristic profile and keep the best pass
    #[arg(long)]
    variants: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agerush=info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if cli.ticks.is_some() {
        scenario.ticks = cli.ticks;
    }

    let result = if cli.variants {
        let profiles = generate_variants(&scenario);
        run_best(&scenario, &profiles).context("variant generator returned no profiles")?
    } else {
        let settings = EngineSettings::from_scenario(&scenario);
        Engine::new(settings, HeuristicProfile::default()).run(&scenario)
    };

    for step in &result.log {
        let tag = match step.category {
            StepCategory::Creation => "pop",
            StepCategory::Construction => "bld",
            StepCategory::Research => "res",
            StepCategory::Relocation => "mov",
        };
        println!(
            "{} [{}] {:>2}  {}",
            format_time(step.time_secs),
            tag,
            step.population,
            step.label
        );
    }
    println!();
    println!(
        "Scenario '{}' finished at population {} with score {:.3}",
        result.scenario, result.final_population, result.score
    );
    if let (Some(click), Some(reached)) =
        (&result.milestones.age_click, &result.milestones.age_reached)
    {
        println!("Age advancement clicked {click}, completed {reached}");
    } else {
        println!("Age advancement was not reached");
    }
    println!(
        "Idle {}, food lost to spoilage {:.0}, farms seeded {}",
        format_time(result.stats.idle_secs),
        result.stats.decayed_food,
        result.stats.farms_seeded
    );
    println!("Expected counter: {}", result.counter_hint);

    if let Some(report_dir) = cli.report_dir {
        let path = ReportWriter::new(report_dir).write(&result)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
