//! The top-level mutable aggregate resolved once per day.

use crate::buildings::{Building, BuildingId, BuildingKind};
use crate::population::PopulationLedger;
use crate::resources::{BoundedResourcePool, ResourceKind};
use crate::zone::Zone;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the day's labor pool is spread across buildings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationPolicy {
    /// Assignments are whatever the manual setter left.
    Manual,
    /// Proportional fill of every standing building.
    Auto,
    /// Fill buildings producing the listed kinds, in the listed order.
    Priority(Vec<ResourceKind>),
    /// Proportional fill restricted to active buildings.
    Activation,
}

/// A persistent trade instruction: give `amount * rate` of one kind for
/// `amount` of another, once per resolution pass per available worker slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingTrade {
    pub give: ResourceKind,
    pub receive: ResourceKind,
    pub amount: u32,
}

/// Pressure the besiegers are applying.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SiegeState {
    /// In `[0, 1]`; scales trade rates, interception odds, and assaults.
    pub intensity: f64,
    /// Days until the relief column arrives; surviving that long wins.
    pub days_to_relief: u32,
}

impl SiegeState {
    /// Raise intensity, clamped at 1.
    pub fn harden(&mut self, amount: f64) {
        self.intensity = (self.intensity + amount).min(1.0);
    }

    /// Lower intensity, clamped at 0.
    pub fn ease(&mut self, amount: f64) {
        self.intensity = (self.intensity - amount).max(0.0);
    }
}

/// Everything the daily resolution mutates, in one owned aggregate.
///
/// Sub-ledgers (population, resources, zone caches) are mutated only
/// through their own transition operations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub date: NaiveDate,
    /// Days since the siege began.
    pub day: u32,
    /// The settlement's shared, unbounded stores.
    pub resources: BoundedResourcePool,
    pub population: PopulationLedger,
    pub zones: Vec<Zone>,
    pub buildings: Vec<Building>,
    pub standing_trades: Vec<StandingTrade>,
    pub siege: SiegeState,
    /// In `0..=100`; the settlement capitulates at zero.
    pub morale: u32,
    /// In `0..=100`; fed by tyranny tithes and shortages.
    pub unrest: u32,
    pub tyranny_adopted: bool,
    pub faith_adopted: bool,
    /// Ids of diplomatic actions currently in force, in activation order.
    /// The effect registry is the only writer.
    pub active_effects: Vec<String>,
    pub allocation_policy: AllocationPolicy,
    /// Cumulative executed trades; drives the tyranny tithe cadence.
    pub trades_total: u32,
}

impl GameState {
    pub fn building(&self, id: &BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| &b.id == id)
    }

    pub fn building_mut(&mut self, id: &BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| &b.id == id)
    }

    /// The trading facility, if the settlement built one.
    pub fn trading_post(&self) -> Option<&Building> {
        self.buildings
            .iter()
            .find(|b| b.kind == BuildingKind::TradingPost)
    }

    /// Zones still held by the settlement.
    pub fn standing_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter().filter(|z| !z.captured)
    }

    pub fn zones_lost(&self) -> usize {
        self.zones.iter().filter(|z| z.captured).count()
    }

    pub fn raise_morale(&mut self, amount: u32) {
        self.morale = (self.morale + amount).min(100);
    }

    pub fn lower_morale(&mut self, amount: u32) {
        self.morale = self.morale.saturating_sub(amount);
    }

    pub fn raise_unrest(&mut self, amount: u32) {
        self.unrest = (self.unrest + amount).min(100);
    }

    pub fn lower_unrest(&mut self, amount: u32) {
        self.unrest = self.unrest.saturating_sub(amount);
    }
}
