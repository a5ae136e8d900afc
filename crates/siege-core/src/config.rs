//! Scenario configuration: the declarative starting state of a run.
//!
//! Scenarios arrive as YAML from the CLI (or are built in code by tests),
//! get validated here, and are then lowered into a [`GameState`].

use crate::buildings::{Building, BuildingId, BuildingKind};
use crate::population::PopulationLedger;
use crate::resources::{BoundedResourcePool, ResourceKind};
use crate::state::{AllocationPolicy, GameState, SiegeState, StandingTrade};
use crate::zone::{Zone, ZoneId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Starting population pools.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PopulationSetup {
    pub healthy_workers: u32,
    pub guards: u32,
    pub elderly: u32,
}

/// One zone declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneSetup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub fortification: u32,
}

/// One building declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildingSetup {
    pub id: String,
    pub name: String,
    pub kind: BuildingKind,
    pub worker_capacity: u32,
    #[serde(default = "default_staff_step")]
    pub staff_step: u32,
    #[serde(default)]
    pub output: Option<ResourceKind>,
}

fn default_staff_step() -> u32 {
    1
}

fn default_morale() -> u32 {
    70
}

fn default_policy() -> AllocationPolicy {
    AllocationPolicy::Auto
}

/// Declarative starting state for a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub start_date: NaiveDate,
    pub rng_seed: u64,
    /// Days the settlement must hold out.
    pub days_to_relief: u32,
    /// Opening siege intensity in `[0, 1]`.
    pub siege_intensity: f64,
    #[serde(default = "default_morale")]
    pub morale: u32,
    #[serde(default)]
    pub unrest: u32,
    pub resources: BTreeMap<ResourceKind, u32>,
    pub population: PopulationSetup,
    pub zones: Vec<ZoneSetup>,
    pub buildings: Vec<BuildingSetup>,
    #[serde(default)]
    pub standing_trades: Vec<StandingTrade>,
    #[serde(default = "default_policy")]
    pub allocation_policy: AllocationPolicy,
}

/// Validation errors for scenario declarations.
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("scenario name is empty")]
    EmptyName,
    #[error("scenario declares no zones")]
    NoZones,
    #[error("scenario declares no buildings")]
    NoBuildings,
    #[error("duplicate zone id: {0}")]
    DuplicateZoneId(String),
    #[error("duplicate building id: {0}")]
    DuplicateBuildingId(String),
    #[error("siege intensity {0} is outside [0, 1]")]
    IntensityOutOfRange(f64),
    #[error("{field} {value} is outside 0..=100")]
    PercentOutOfRange { field: &'static str, value: u32 },
    #[error("days to relief must be at least 1")]
    NoReliefDate,
    #[error("building {0}: staff step must be >= 1 and divide worker capacity")]
    InvalidStaffStep(String),
}

/// Validate a scenario declaration, including cross-field rules.
pub fn validate_scenario(cfg: &ScenarioConfig) -> Result<(), ScenarioError> {
    if cfg.name.trim().is_empty() {
        return Err(ScenarioError::EmptyName);
    }
    if cfg.zones.is_empty() {
        return Err(ScenarioError::NoZones);
    }
    if cfg.buildings.is_empty() {
        return Err(ScenarioError::NoBuildings);
    }
    if !(0.0..=1.0).contains(&cfg.siege_intensity) || !cfg.siege_intensity.is_finite() {
        return Err(ScenarioError::IntensityOutOfRange(cfg.siege_intensity));
    }
    if cfg.morale > 100 {
        return Err(ScenarioError::PercentOutOfRange {
            field: "morale",
            value: cfg.morale,
        });
    }
    if cfg.unrest > 100 {
        return Err(ScenarioError::PercentOutOfRange {
            field: "unrest",
            value: cfg.unrest,
        });
    }
    if cfg.days_to_relief == 0 {
        return Err(ScenarioError::NoReliefDate);
    }

    let mut zone_ids: BTreeSet<&str> = BTreeSet::new();
    for z in &cfg.zones {
        if !zone_ids.insert(z.id.as_str()) {
            return Err(ScenarioError::DuplicateZoneId(z.id.clone()));
        }
    }
    let mut building_ids: BTreeSet<&str> = BTreeSet::new();
    for b in &cfg.buildings {
        if !building_ids.insert(b.id.as_str()) {
            return Err(ScenarioError::DuplicateBuildingId(b.id.clone()));
        }
        if b.staff_step == 0 || b.worker_capacity % b.staff_step != 0 {
            return Err(ScenarioError::InvalidStaffStep(b.id.clone()));
        }
    }
    Ok(())
}

impl ScenarioConfig {
    /// The built-in scenario used when the CLI is given none.
    pub fn default_scenario() -> Self {
        let resources = [
            (ResourceKind::Food, 120),
            (ResourceKind::Water, 150),
            (ResourceKind::Fuel, 80),
            (ResourceKind::Medicine, 25),
            (ResourceKind::Materials, 60),
        ]
        .into_iter()
        .collect();
        Self {
            name: "The Long Winter".to_string(),
            start_date: NaiveDate::from_ymd_opt(1347, 10, 1).expect("valid date"),
            rng_seed: 42,
            days_to_relief: 60,
            siege_intensity: 0.35,
            morale: 70,
            unrest: 10,
            resources,
            population: PopulationSetup {
                healthy_workers: 18,
                guards: 6,
                elderly: 5,
            },
            zones: vec![
                ZoneSetup {
                    id: "gatehouse".into(),
                    name: "Gatehouse".into(),
                    fortification: 2,
                },
                ZoneSetup {
                    id: "market-row".into(),
                    name: "Market Row".into(),
                    fortification: 1,
                },
                ZoneSetup {
                    id: "old-quarter".into(),
                    name: "Old Quarter".into(),
                    fortification: 0,
                },
            ],
            buildings: vec![
                BuildingSetup {
                    id: "farm-terrace".into(),
                    name: "Terrace Farm".into(),
                    kind: BuildingKind::Farm,
                    worker_capacity: 8,
                    staff_step: 1,
                    output: Some(ResourceKind::Food),
                },
                BuildingSetup {
                    id: "well-east".into(),
                    name: "East Well".into(),
                    kind: BuildingKind::Well,
                    worker_capacity: 4,
                    staff_step: 1,
                    output: Some(ResourceKind::Water),
                },
                BuildingSetup {
                    id: "kiln".into(),
                    name: "Charcoal Kiln".into(),
                    kind: BuildingKind::Workshop,
                    worker_capacity: 5,
                    staff_step: 1,
                    output: Some(ResourceKind::Fuel),
                },
                BuildingSetup {
                    id: "workshop-main".into(),
                    name: "Main Workshop".into(),
                    kind: BuildingKind::Workshop,
                    worker_capacity: 6,
                    staff_step: 1,
                    output: Some(ResourceKind::Materials),
                },
                BuildingSetup {
                    id: "infirmary".into(),
                    name: "Infirmary".into(),
                    kind: BuildingKind::Infirmary,
                    worker_capacity: 3,
                    staff_step: 1,
                    output: None,
                },
                BuildingSetup {
                    id: "trading-post".into(),
                    name: "Trading Post".into(),
                    kind: BuildingKind::TradingPost,
                    worker_capacity: 2,
                    staff_step: 1,
                    output: None,
                },
            ],
            standing_trades: vec![StandingTrade {
                give: ResourceKind::Materials,
                receive: ResourceKind::Food,
                amount: 5,
            }],
            allocation_policy: AllocationPolicy::Auto,
        }
    }
}

impl GameState {
    /// Validate `cfg` and lower it into a starting [`GameState`].
    pub fn from_scenario(cfg: &ScenarioConfig) -> Result<GameState, ScenarioError> {
        validate_scenario(cfg)?;
        let mut resources = BoundedResourcePool::unbounded();
        for (&kind, &amount) in &cfg.resources {
            resources.add(kind, amount);
        }
        let zones = cfg
            .zones
            .iter()
            .map(|z| Zone::new(ZoneId(z.id.clone()), z.name.clone(), z.fortification))
            .collect();
        let buildings = cfg
            .buildings
            .iter()
            .map(|b| {
                Building::new(
                    BuildingId(b.id.clone()),
                    b.name.clone(),
                    b.kind,
                    b.worker_capacity,
                    b.output,
                )
                .with_staff_step(b.staff_step)
            })
            .collect();
        Ok(GameState {
            date: cfg.start_date,
            day: 0,
            resources,
            population: PopulationLedger::new(
                cfg.population.healthy_workers,
                cfg.population.guards,
                cfg.population.elderly,
            ),
            zones,
            buildings,
            standing_trades: cfg.standing_trades.clone(),
            siege: SiegeState {
                intensity: cfg.siege_intensity,
                days_to_relief: cfg.days_to_relief,
            },
            morale: cfg.morale,
            unrest: cfg.unrest,
            tyranny_adopted: false,
            faith_adopted: false,
            active_effects: Vec::new(),
            allocation_policy: cfg.allocation_policy.clone(),
            trades_total: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_validates_and_lowers() {
        let cfg = ScenarioConfig::default_scenario();
        let state = GameState::from_scenario(&cfg).unwrap();
        assert_eq!(state.population.total_population(), 29);
        assert_eq!(state.resources.amount(ResourceKind::Food), 120);
        assert_eq!(state.zones.len(), 3);
        assert_eq!(state.zones[0].storage.capacity(), 80);
        assert!(state.trading_post().is_some());
    }

    #[test]
    fn duplicate_building_ids_are_rejected() {
        let mut cfg = ScenarioConfig::default_scenario();
        cfg.buildings[1].id = cfg.buildings[0].id.clone();
        assert_eq!(
            validate_scenario(&cfg),
            Err(ScenarioError::DuplicateBuildingId(cfg.buildings[0].id.clone()))
        );
    }

    #[test]
    fn off_step_capacity_is_rejected() {
        let mut cfg = ScenarioConfig::default_scenario();
        cfg.buildings[0].staff_step = 3; // capacity 8 is not a multiple
        assert_eq!(
            validate_scenario(&cfg),
            Err(ScenarioError::InvalidStaffStep("farm-terrace".into()))
        );
    }

    #[test]
    fn intensity_must_be_a_fraction() {
        let mut cfg = ScenarioConfig::default_scenario();
        cfg.siege_intensity = 1.4;
        assert!(matches!(
            validate_scenario(&cfg),
            Err(ScenarioError::IntensityOutOfRange(_))
        ));
    }

    #[test]
    fn scenario_round_trips_through_serde() {
        let cfg = ScenarioConfig::default_scenario();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: ScenarioConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.name, cfg.name);
        assert_eq!(back.buildings.len(), cfg.buildings.len());
        assert_eq!(back.resources[&ResourceKind::Water], 150);
    }
}
