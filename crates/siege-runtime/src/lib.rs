#![deny(warnings)]

//! The day-resolution engine: one fixed-order pass over the mutable
//! [`GameState`] per simulated day.
//!
//! Call order is the reproducibility contract. Every component draws from
//! the one injected [`RandomSource`], so reordering the pipeline changes
//! outcomes for a given seed; the order below is load-bearing and matches
//! what the telemetry/replay layer records.

use serde::{Deserialize, Serialize};
use siege_core::{
    BuildingKind, DailyReport, EntryTag, GameState, RandomSource, ResolutionEntry, ResourceKind,
};
use siege_econ::{allocate, resolve_trades};
use siege_policy::StandingEffectRegistry;
use tracing::info;

/// Food eaten per person per day.
pub const FOOD_PER_PERSON: u32 = 1;
/// Water drawn per person per day.
pub const WATER_PER_PERSON: u32 = 1;
/// One fuel heats and boils for this many people per day.
pub const PEOPLE_PER_FUEL: u32 = 5;
/// Recovery time for people sickened by hunger or thirst.
pub const SHORTAGE_SICK_DAYS: i32 = 3;
/// Recovery time for assault wounds.
pub const WOUND_RECOVERY_DAYS: i32 = 5;
/// Wounded cohorts this many days overdue die when the infirmary is idle.
pub const UNTREATED_DEATH_DAYS: i32 = 3;
/// Assault chance is this many percent at full siege intensity.
pub const ASSAULT_BASE_PCT: f64 = 45.0;

/// How a run stands after a resolved day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Ongoing,
    /// The relief column arrived; the settlement survived.
    Relieved,
    /// Nobody is left alive.
    Extinct,
    /// Every zone has been captured.
    Overrun,
    /// Morale collapsed and the gates were opened.
    Capitulated,
}

impl RunStatus {
    pub fn is_over(self) -> bool {
        self != RunStatus::Ongoing
    }
}

/// One resolved day: the report plus where the run stands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub report: DailyReport,
    pub status: RunStatus,
}

/// Per-worker daily output of a staffed job site.
pub fn per_worker_yield(kind: ResourceKind) -> u32 {
    match kind {
        ResourceKind::Food => 2,
        ResourceKind::Water => 4,
        ResourceKind::Fuel => 2,
        ResourceKind::Medicine => 1,
        ResourceKind::Materials => 2,
    }
}

/// Resolve one day. The pipeline order is fixed: labor, production,
/// consumption, health, trading, standing effects, siege pressure, then
/// the outcome check.
pub fn resolve_day(
    state: &mut GameState,
    rng: &mut dyn RandomSource,
    registry: &StandingEffectRegistry,
) -> DayOutcome {
    state.day += 1;
    state.date = state.date.succ_opt().unwrap_or(state.date);
    let mut report = DailyReport::new(state.day, state.date);

    allocate_labor(state);
    run_production(state, &mut report);
    run_consumption(state, &mut report);
    run_recovery(state, &mut report);
    resolve_trades(state, rng, &mut report);
    registry.apply_daily(state, rng, &mut report);
    run_assault(state, rng, &mut report);

    let status = run_status(state);
    info!(day = state.day, ?status, "day resolved");
    DayOutcome { report, status }
}

/// Drive [`resolve_day`] until the run ends or `max_days` elapse.
pub fn run_days(
    state: &mut GameState,
    rng: &mut dyn RandomSource,
    registry: &StandingEffectRegistry,
    max_days: u32,
) -> (Vec<DayOutcome>, RunStatus) {
    let mut outcomes = Vec::new();
    let mut status = RunStatus::Ongoing;
    for _ in 0..max_days {
        let outcome = resolve_day(state, rng, registry);
        status = outcome.status;
        outcomes.push(outcome);
        if status.is_over() {
            break;
        }
    }
    (outcomes, status)
}

fn allocate_labor(state: &mut GameState) {
    let available = state.population.healthy_workers();
    let policy = state.allocation_policy.clone();
    allocate(&policy, available, &mut state.buildings);
}

fn run_production(state: &mut GameState, report: &mut DailyReport) {
    let mut entry = ResolutionEntry::new("Work Details", EntryTag::Production);
    let outputs: Vec<(String, ResourceKind, u32)> = state
        .buildings
        .iter()
        .filter(|b| b.is_operational() && b.assigned_workers > 0)
        .filter_map(|b| {
            b.output
                .map(|kind| (b.name.clone(), kind, b.assigned_workers * per_worker_yield(kind)))
        })
        .collect();
    for (name, kind, produced) in outputs {
        let stored = state.resources.add(kind, produced);
        entry.push_line(format!("{}: +{} {}.", name, stored, kind));
    }
    report.push(entry);
}

fn run_consumption(state: &mut GameState, report: &mut DailyReport) {
    let people = state.population.total_population();
    if people == 0 {
        return;
    }
    let mut entry = ResolutionEntry::new("Stores", EntryTag::Consumption);
    let mut casualties = ResolutionEntry::new("Hardship", EntryTag::Casualty);

    let food_needed = people * FOOD_PER_PERSON;
    let eaten = state.resources.consume(ResourceKind::Food, food_needed);
    if eaten < food_needed {
        let hungry = food_needed - eaten;
        state.lower_morale(5);
        state.raise_unrest(3);
        let fell = state.population.remove_healthy_workers(hungry.min(2));
        state.population.add_sick_workers(fell, SHORTAGE_SICK_DAYS);
        entry.push_line(format!("The granary runs short: {} go hungry.", hungry));
        if fell > 0 {
            casualties.push_line(format!("{} collapse from hunger.", fell));
        }
    } else {
        entry.push_line(format!("Rations issued: {} food.", eaten));
    }

    let water_needed = people * WATER_PER_PERSON;
    let drawn = state.resources.consume(ResourceKind::Water, water_needed);
    if drawn < water_needed {
        let parched = water_needed - drawn;
        state.lower_morale(5);
        state.raise_unrest(3);
        let fell = state.population.remove_healthy_workers(parched.min(3));
        state.population.add_sick_workers(fell, SHORTAGE_SICK_DAYS);
        entry.push_line(format!("The cisterns run low: {} go thirsty.", parched));
        if fell > 0 {
            casualties.push_line(format!("{} are laid out by foul water.", fell));
        }
    } else {
        entry.push_line(format!("Water drawn: {}.", drawn));
    }

    let fuel_needed = people.div_ceil(PEOPLE_PER_FUEL);
    let burned = state.resources.consume(ResourceKind::Fuel, fuel_needed);
    if burned < fuel_needed {
        state.lower_morale(2);
        entry.push_line("The hearths go cold overnight.".to_string());
    } else {
        entry.push_line(format!("Hearths fed: {} fuel.", burned));
    }

    report.push(entry);
    report.push(casualties);
}

fn run_recovery(state: &mut GameState, report: &mut DailyReport) {
    let mut entry = ResolutionEntry::new("Infirmary", EntryTag::Recovery);
    let mut casualties = ResolutionEntry::new("Untended Wounded", EntryTag::Casualty);

    state.population.advance_recovery_timers();
    state.population.advance_wounded_recovery_timers();

    let treatable = state
        .population
        .ready_to_recover_count()
        .min(state.resources.amount(ResourceKind::Medicine));
    if treatable > 0 {
        let recovered = state.population.recover_workers(treatable);
        state.resources.consume(ResourceKind::Medicine, recovered);
        entry.push_line(format!("{} shake off the fever and return to work.", recovered));
    }

    let wounded_treatable = state
        .population
        .wounded_ready_to_recover_count()
        .min(state.resources.amount(ResourceKind::Medicine));
    if wounded_treatable > 0 {
        let recovered = state.population.recover_wounded_workers(wounded_treatable);
        state.resources.consume(ResourceKind::Medicine, recovered);
        entry.push_line(format!("{} wounded are back on their feet.", recovered));
    }

    let infirmary_staffed = state
        .buildings
        .iter()
        .any(|b| b.kind == BuildingKind::Infirmary && b.is_operational() && b.assigned_workers > 0);
    if !infirmary_staffed {
        let dying = state.population.wounded_untreated_deaths(UNTREATED_DEATH_DAYS);
        if dying > 0 {
            state.population.remove_wounded_workers(dying);
            state.lower_morale(4);
            casualties.push_line(format!("{} of the untended wounded die.", dying));
        }
    }

    report.push(entry);
    report.push(casualties);
}

fn run_assault(state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport) {
    let chance = ASSAULT_BASE_PCT * state.siege.intensity;
    let roll = rng.roll_percent();
    if f64::from(roll) < chance {
        let mut entry = ResolutionEntry::new("Assault", EntryTag::Siege);
        let raw_damage = rng.next_in(10, 25).max(0) as u32;
        // Guards on the wall blunt the blow.
        let damage = raw_damage.saturating_sub(state.population.guards() / 2).max(3);
        let hurt = rng.next_in(1, 3).max(0) as u32;

        let target = state
            .zones
            .iter()
            .enumerate()
            .filter(|(_, z)| !z.captured)
            .min_by_key(|(_, z)| z.integrity)
            .map(|(i, _)| i);
        if let Some(i) = target {
            state.zones[i].apply_damage(damage);
            entry.push_line(format!(
                "Ladders against {}: integrity down {} to {}.",
                state.zones[i].name, damage, state.zones[i].integrity
            ));
            let fell = state.population.remove_healthy_workers(hurt);
            state.population.add_wounded_workers(fell, WOUND_RECOVERY_DAYS);
            if fell > 0 {
                entry.push_line(format!("{} defenders are carried off the wall.", fell));
            }
            state.lower_morale(3);
            if state.zones[i].is_breached() {
                let lost = state.zones[i].capture();
                let lost_total: u32 = lost.values().sum();
                state.lower_morale(10);
                state.raise_unrest(5);
                entry.push_line(format!(
                    "{} falls; {} stored goods are lost.",
                    state.zones[i].name, lost_total
                ));
            }
        }
        report.push(entry);
    }
    // Pressure wanders a little every day.
    let drift = rng.next_in(-5, 5);
    state.siege.intensity = (state.siege.intensity + f64::from(drift) / 100.0).clamp(0.0, 1.0);
}

fn run_status(state: &GameState) -> RunStatus {
    if state.population.total_population() == 0 {
        RunStatus::Extinct
    } else if state.zones.iter().all(|z| z.captured) {
        RunStatus::Overrun
    } else if state.morale == 0 {
        RunStatus::Capitulated
    } else if state.day >= state.siege.days_to_relief {
        RunStatus::Relieved
    } else {
        RunStatus::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siege_core::{GameRandom, ScenarioConfig, ScriptedRandom};

    fn fresh() -> (GameState, StandingEffectRegistry) {
        let state = GameState::from_scenario(&ScenarioConfig::default_scenario()).unwrap();
        (state, StandingEffectRegistry::standard())
    }

    #[test]
    fn a_day_allocates_produces_and_consumes() {
        let (mut state, registry) = fresh();
        let pool = state.population.healthy_workers();
        let mut rng = GameRandom::seeded(42);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(state.day, 1);
        assert_eq!(outcome.status, RunStatus::Ongoing);
        let assigned: u32 = state.buildings.iter().map(|b| b.assigned_workers).sum();
        assert!(assigned <= pool);
        assert!(outcome
            .report
            .entries()
            .iter()
            .any(|e| e.tag == EntryTag::Production));
        assert!(outcome
            .report
            .entries()
            .iter()
            .any(|e| e.tag == EntryTag::Consumption));
    }

    #[test]
    fn same_seed_same_run() {
        let (mut a, registry_a) = fresh();
        let (mut b, registry_b) = fresh();
        let mut rng_a = GameRandom::seeded(1347);
        let mut rng_b = GameRandom::seeded(1347);
        let (days_a, status_a) = run_days(&mut a, &mut rng_a, &registry_a, 30);
        let (days_b, status_b) = run_days(&mut b, &mut rng_b, &registry_b, 30);
        assert_eq!(status_a, status_b);
        assert_eq!(days_a, days_b);
        assert_eq!(a, b);
    }

    #[test]
    fn surviving_to_relief_wins() {
        let (mut state, registry) = fresh();
        state.siege.days_to_relief = 1;
        state.siege.intensity = 0.0;
        let mut rng = GameRandom::seeded(7);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(outcome.status, RunStatus::Relieved);
    }

    #[test]
    fn extinction_beats_every_other_verdict() {
        let (mut state, registry) = fresh();
        state.population.remove_people_by_priority(u32::MAX);
        state.morale = 0;
        let mut rng = GameRandom::seeded(7);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(outcome.status, RunStatus::Extinct);
    }

    #[test]
    fn losing_every_zone_is_defeat() {
        let (mut state, registry) = fresh();
        for z in &mut state.zones {
            z.capture();
        }
        let mut rng = GameRandom::seeded(7);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(outcome.status, RunStatus::Overrun);
    }

    #[test]
    fn collapsed_morale_capitulates() {
        let (mut state, registry) = fresh();
        state.morale = 0;
        // Plenty of stores so the day cannot push morale back above zero.
        let mut rng = GameRandom::seeded(7);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(outcome.status, RunStatus::Capitulated);
    }

    #[test]
    fn forced_assault_wounds_and_damages_the_weakest_zone() {
        let (mut state, registry) = fresh();
        state.standing_trades.clear();
        state.population.stand_down_guards(u32::MAX);
        state.siege.intensity = 1.0;
        state.zones[1].integrity = 30; // weakest standing zone
        let healthy = state.population.healthy_workers();
        // Percent rolls: 0 forces the assault; ints: damage 20, 2 wounded,
        // drift 0.
        let mut rng = ScriptedRandom::new()
            .with_percents([0])
            .with_ints([20, 2, 0]);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert_eq!(state.zones[1].integrity, 10);
        assert_eq!(state.population.wounded_workers(), 2);
        assert_eq!(state.population.healthy_workers(), healthy - 2);
        assert!(outcome
            .report
            .entries()
            .iter()
            .any(|e| e.tag == EntryTag::Siege));
    }

    #[test]
    fn breach_captures_and_empties_the_zone() {
        let (mut state, registry) = fresh();
        state.standing_trades.clear();
        state.population.stand_down_guards(u32::MAX);
        state.siege.intensity = 1.0;
        state.zones[2].integrity = 5;
        state.zones[2].storage.add(ResourceKind::Food, 9);
        let mut rng = ScriptedRandom::new()
            .with_percents([0])
            .with_ints([20, 1, 0]);
        let outcome = resolve_day(&mut state, &mut rng, &registry);
        assert!(state.zones[2].captured);
        assert_eq!(state.zones[2].storage.total(), 0);
        assert!(outcome
            .report
            .entries()
            .iter()
            .flat_map(|e| e.lines.iter())
            .any(|l| l.contains("stored goods are lost")));
    }

    #[test]
    fn run_days_stops_at_the_verdict() {
        let (mut state, registry) = fresh();
        state.siege.days_to_relief = 3;
        state.siege.intensity = 0.0;
        let mut rng = GameRandom::seeded(9);
        let (outcomes, status) = run_days(&mut state, &mut rng, &registry, 30);
        assert_eq!(status, RunStatus::Relieved);
        assert_eq!(outcomes.len(), 3);
    }
}
