#![deny(warnings)]

//! Headless runner: load a scenario, resolve days until relief or ruin,
//! and report how the settlement fared.

use anyhow::{Context, Result};
use persistence::{DayRecord, RunSummary, TelemetryWriter};
use siege_core::{GameRandom, GameState, ResourceKind, ScenarioConfig};
use siege_policy::StandingEffectRegistry;
use siege_runtime::{resolve_day, RunStatus};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    scenario: Option<String>,
    days: Option<u32>,
    seed: Option<u64>,
    telemetry: Option<String>,
    save: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next(),
            "--days" => args.days = it.next().and_then(|s| s.parse().ok()),
            "--seed" => args.seed = it.next().and_then(|s| s.parse().ok()),
            "--telemetry" => args.telemetry = it.next(),
            "--save" => args.save = it.next(),
            _ => {}
        }
    }
    args
}

fn load_scenario(path: Option<&str>) -> Result<ScenarioConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing scenario {}", path))
        }
        None => Ok(ScenarioConfig::default_scenario()),
    }
}

fn verdict(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Ongoing => "still holding",
        RunStatus::Relieved => "relieved: the siege is broken",
        RunStatus::Extinct => "fallen: no one is left",
        RunStatus::Overrun => "fallen: the walls are taken",
        RunStatus::Capitulated => "fallen: the gates were opened",
    }
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(git = env!("GIT_SHA"), ?args, "starting holdfast");

    let cfg = load_scenario(args.scenario.as_deref())?;
    let seed = args.seed.unwrap_or(cfg.rng_seed);
    let max_days = args.days.unwrap_or(cfg.days_to_relief);

    let mut state = GameState::from_scenario(&cfg)?;
    let registry = StandingEffectRegistry::standard();
    let mut rng = GameRandom::seeded(seed);
    let mut telemetry = args
        .telemetry
        .as_deref()
        .map(TelemetryWriter::create)
        .transpose()?;

    let mut status = RunStatus::Ongoing;
    for _ in 0..max_days {
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        if let Some(writer) = telemetry.as_mut() {
            writer.record_day(&DayRecord::capture(&state, &outcome.report))?;
        }
        status = outcome.status;
        if status.is_over() {
            break;
        }
    }

    if let Some(writer) = telemetry.take() {
        writer.finish(&RunSummary {
            scenario: cfg.name.clone(),
            seed,
            days_survived: state.day,
            status,
            final_population: state.population.total_population(),
            zones_lost: state.zones_lost() as u32,
            final_resources: state.resources.snapshot(),
        })?;
    }
    if let Some(path) = args.save.as_deref() {
        persistence::save_snapshot(path, &state)?;
    }

    println!(
        "{} | seed {} | day {} | {}",
        cfg.name,
        seed,
        state.day,
        verdict(status)
    );
    println!(
        "KPI | pop: {} | morale: {} | unrest: {} | food: {} | water: {} | medicine: {} | zones lost: {}/{}",
        state.population.total_population(),
        state.morale,
        state.unrest,
        state.resources.amount(ResourceKind::Food),
        state.resources.amount(ResourceKind::Water),
        state.resources.amount(ResourceKind::Medicine),
        state.zones_lost(),
        state.zones.len()
    );

    Ok(())
}
