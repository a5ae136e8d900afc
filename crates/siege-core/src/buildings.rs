//! Worker-staffed job sites.

use crate::resources::ResourceKind;
use serde::{Deserialize, Serialize};

/// Unique identifier for a building, e.g. "well-east".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub String);

/// Kinds of buildings the settlement can staff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    Farm,
    Well,
    Workshop,
    Infirmary,
    Watchtower,
    TradingPost,
}

/// A job site competing for workers from the shared labor pool.
///
/// `assigned_workers` is only written by the allocator and the validated
/// manual setter; it never exceeds `worker_capacity`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub kind: BuildingKind,
    /// Maximum workers the site can employ.
    pub worker_capacity: u32,
    /// Assignment granularity for manual staffing; always >= 1.
    pub staff_step: u32,
    pub assigned_workers: u32,
    /// Primary product, used by priority-based allocation. Sites like
    /// watchtowers and the trading post produce nothing directly.
    pub output: Option<ResourceKind>,
    pub destroyed: bool,
    pub active: bool,
}

impl Building {
    pub fn new(
        id: BuildingId,
        name: impl Into<String>,
        kind: BuildingKind,
        worker_capacity: u32,
        output: Option<ResourceKind>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            worker_capacity,
            staff_step: 1,
            assigned_workers: 0,
            output,
            destroyed: false,
            active: true,
        }
    }

    pub fn with_staff_step(mut self, staff_step: u32) -> Self {
        self.staff_step = staff_step.max(1);
        self
    }

    /// Unused capacity.
    pub fn headroom(&self) -> u32 {
        self.worker_capacity.saturating_sub(self.assigned_workers)
    }

    /// Eligible for auto allocation.
    pub fn is_standing(&self) -> bool {
        !self.destroyed
    }

    /// Eligible for activation-gated allocation.
    pub fn is_operational(&self) -> bool {
        !self.destroyed && self.active
    }
}
