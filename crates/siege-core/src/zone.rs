//! Fortified zones and their bounded resource caches.

use crate::resources::{BoundedResourcePool, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Unique identifier for a zone, e.g. "gatehouse" or "granary-row".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub String);

/// Base cache capacity of an unfortified zone, per resource kind.
pub const BASE_STORAGE_CAPACITY: u32 = 40;

/// Extra per-kind cache capacity granted by each fortification level.
pub const STORAGE_PER_FORTIFICATION: u32 = 20;

/// A zone's bounded cache plus the record of whatever was lost when the
/// zone last fell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStorage {
    pool: BoundedResourcePool,
    lost_contents: Option<BTreeMap<ResourceKind, u32>>,
}

impl ZoneStorage {
    /// Empty cache where each kind stores at most `capacity`.
    pub fn new(capacity: u32) -> Self {
        Self {
            pool: BoundedResourcePool::with_capacity(capacity),
            lost_contents: None,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.pool.capacity().unwrap_or(0)
    }

    pub fn set_capacity(&mut self, capacity: u32) {
        self.pool.set_capacity(capacity);
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.pool.amount(kind)
    }

    pub fn total(&self) -> u32 {
        self.pool.total()
    }

    /// See [`BoundedResourcePool::add`].
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        self.pool.add(kind, amount)
    }

    /// See [`BoundedResourcePool::consume`].
    pub fn consume(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        self.pool.consume(kind, amount)
    }

    /// Atomically snapshot all five kinds, zero the cache, and retain the
    /// snapshot as the recorded loss (overwriting any prior loss).
    /// Returns the snapshot.
    pub fn clear_and_record_loss(&mut self) -> BTreeMap<ResourceKind, u32> {
        let snapshot = self.pool.snapshot();
        for &kind in &ResourceKind::ALL {
            let stored = self.pool.amount(kind);
            self.pool.consume(kind, stored);
        }
        self.lost_contents = Some(snapshot.clone());
        snapshot
    }

    /// Contents recorded by the most recent loss, if any.
    pub fn lost_contents(&self) -> Option<&BTreeMap<ResourceKind, u32>> {
        self.lost_contents.as_ref()
    }
}

/// A fortified district of the settlement. Integrity reaches zero under
/// assault; a breached zone is captured and its cache is lost.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    /// Structural integrity in `0..=100`.
    pub integrity: u32,
    /// Fortification level; each level widens the cache.
    pub fortification: u32,
    pub captured: bool,
    pub storage: ZoneStorage,
}

impl Zone {
    /// Intact zone at full integrity with a cache sized for `fortification`.
    pub fn new(id: ZoneId, name: impl Into<String>, fortification: u32) -> Self {
        Self {
            id,
            name: name.into(),
            integrity: 100,
            fortification,
            captured: false,
            storage: ZoneStorage::new(Self::storage_capacity_for(fortification)),
        }
    }

    /// Per-kind cache capacity at a given fortification level.
    pub fn storage_capacity_for(fortification: u32) -> u32 {
        BASE_STORAGE_CAPACITY + fortification * STORAGE_PER_FORTIFICATION
    }

    /// Reduce integrity, flooring at zero.
    pub fn apply_damage(&mut self, amount: u32) {
        self.integrity = self.integrity.saturating_sub(amount);
    }

    /// Integrity exhausted but capture not yet resolved.
    pub fn is_breached(&self) -> bool {
        self.integrity == 0 && !self.captured
    }

    /// Mark the zone captured and clear its cache, returning what was lost.
    pub fn capture(&mut self) -> BTreeMap<ResourceKind, u32> {
        self.captured = true;
        let lost = self.storage.clear_and_record_loss();
        info!(zone = %self.id.0, lost_total = lost.values().sum::<u32>(), "zone captured");
        lost
    }

    /// Raise the fortification level and widen the cache to match.
    pub fn upgrade_fortification(&mut self) {
        self.fortification += 1;
        self.storage
            .set_capacity(Self::storage_capacity_for(self.fortification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> Zone {
        Zone::new(ZoneId("gatehouse".into()), "Gatehouse", 1)
    }

    #[test]
    fn capacity_scales_with_fortification() {
        let mut z = zone();
        assert_eq!(z.storage.capacity(), 60);
        z.upgrade_fortification();
        assert_eq!(z.storage.capacity(), 80);
    }

    #[test]
    fn capture_clears_and_records_loss() {
        let mut z = zone();
        z.storage.add(ResourceKind::Food, 12);
        z.storage.add(ResourceKind::Fuel, 5);
        let lost = z.capture();
        assert!(z.captured);
        assert_eq!(lost[&ResourceKind::Food], 12);
        assert_eq!(lost[&ResourceKind::Fuel], 5);
        assert_eq!(z.storage.total(), 0);
        assert_eq!(z.storage.lost_contents().unwrap()[&ResourceKind::Food], 12);
    }

    #[test]
    fn later_loss_overwrites_earlier_record() {
        let mut z = zone();
        z.storage.add(ResourceKind::Water, 8);
        z.storage.clear_and_record_loss();
        z.storage.add(ResourceKind::Water, 3);
        let second = z.storage.clear_and_record_loss();
        assert_eq!(second[&ResourceKind::Water], 3);
        assert_eq!(z.storage.lost_contents().unwrap()[&ResourceKind::Water], 3);
    }

    #[test]
    fn damage_floors_at_zero() {
        let mut z = zone();
        z.apply_damage(250);
        assert_eq!(z.integrity, 0);
        assert!(z.is_breached());
    }
}
