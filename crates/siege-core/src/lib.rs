#![deny(warnings)]

//! Core domain state and invariants for Holdfast.
//!
//! This crate defines the serializable aggregate a run mutates (resource
//! pools, the population ledger and its recovery queues, fortified zones,
//! worker-staffed buildings) plus the daily report, the randomness
//! capability, and scenario configuration. The stateless services that
//! operate on this state live in `siege-econ` and `siege-policy`.

pub mod buildings;
pub mod config;
pub mod population;
pub mod report;
pub mod resources;
pub mod rng;
pub mod state;
pub mod zone;

pub use buildings::{Building, BuildingId, BuildingKind};
pub use config::{
    validate_scenario, BuildingSetup, PopulationSetup, ScenarioConfig, ScenarioError, ZoneSetup,
};
pub use population::{PopulationLedger, RecoveryCohort, RecoveryQueue};
pub use report::{DailyReport, EntryTag, ResolutionEntry};
pub use resources::{BoundedResourcePool, ResourceKind};
pub use rng::{GameRandom, RandomSource, ScriptedRandom};
pub use state::{AllocationPolicy, GameState, SiegeState, StandingTrade};
pub use zone::{Zone, ZoneId, ZoneStorage};
