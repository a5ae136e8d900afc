//! Resource kinds and the bounded integer ledgers that store them.
//!
//! Every stockpile in the game, from the settlement's shared stores to
//! each zone's cache, is a [`BoundedResourcePool`]. Amounts are non-negative
//! integers; `add` and `consume` clamp instead of failing and report the
//! amount actually applied so callers can detect partial application.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kinds of stockpiled goods tracked by the settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Rations consumed daily by every living person.
    Food,
    /// Drinking water, consumed daily alongside food.
    Water,
    /// Burned for heating and for boiling water.
    Fuel,
    /// Spent to convert recovered patients back into workers.
    Medicine,
    /// Timber and scrap for repairs and trade.
    Materials,
}

impl ResourceKind {
    /// Canonical ordering used for reports, telemetry, and snapshots.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Food,
        ResourceKind::Water,
        ResourceKind::Fuel,
        ResourceKind::Medicine,
        ResourceKind::Materials,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Food => "food",
            ResourceKind::Water => "water",
            ResourceKind::Fuel => "fuel",
            ResourceKind::Medicine => "medicine",
            ResourceKind::Materials => "materials",
        };
        f.write_str(name)
    }
}

/// Integer ledger mapping [`ResourceKind`] to a stored amount, optionally
/// bounded by a per-kind capacity ceiling.
///
/// The settlement's shared stores are unbounded; zone caches carry a
/// ceiling derived from fortification level.
///
/// Example:
/// ```
/// use siege_core::resources::{BoundedResourcePool, ResourceKind};
/// let mut pool = BoundedResourcePool::with_capacity(50);
/// assert_eq!(pool.add(ResourceKind::Food, 45), 45);
/// assert_eq!(pool.add(ResourceKind::Food, 20), 5);
/// assert_eq!(pool.amount(ResourceKind::Food), 50);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedResourcePool {
    amounts: BTreeMap<ResourceKind, u32>,
    capacity_per_kind: Option<u32>,
}

impl BoundedResourcePool {
    /// Empty pool with no capacity ceiling.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Empty pool where each kind stores at most `capacity`.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            amounts: BTreeMap::new(),
            capacity_per_kind: Some(capacity),
        }
    }

    /// Per-kind ceiling, if any.
    pub fn capacity(&self) -> Option<u32> {
        self.capacity_per_kind
    }

    /// Raise or lower the ceiling. Existing amounts above a lowered ceiling
    /// are kept; they simply block further additions of that kind.
    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity_per_kind = Some(capacity);
    }

    /// Stored amount of `kind`.
    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }

    /// Sum of all stored amounts.
    pub fn total(&self) -> u32 {
        self.amounts.values().sum()
    }

    /// Store up to `amount` of `kind`, clamped at the capacity ceiling.
    /// Returns the amount actually stored; zero input is a no-op.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let current = self.amount(kind);
        let applied = match self.capacity_per_kind {
            Some(cap) => amount.min(cap.saturating_sub(current)),
            None => amount,
        };
        if applied > 0 {
            self.amounts.insert(kind, current + applied);
        }
        applied
    }

    /// Remove up to `amount` of `kind`, clamped at the stored amount.
    /// Returns the amount actually removed; zero input is a no-op.
    pub fn consume(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let current = self.amount(kind);
        let removed = amount.min(current);
        if removed > 0 {
            self.amounts.insert(kind, current - removed);
        }
        removed
    }

    /// Zero-filled view of all five kinds in canonical order.
    pub fn snapshot(&self) -> BTreeMap<ResourceKind, u32> {
        ResourceKind::ALL
            .iter()
            .map(|&kind| (kind, self.amount(kind)))
            .collect()
    }
}
