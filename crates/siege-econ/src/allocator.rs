//! Distribution of the daily labor pool across competing job sites.
//!
//! The allocator is a stateless service over `&mut [Building]`: it writes
//! `assigned_workers` and owns no data of its own. Fractional shares floor
//! so the sum of assignments never exceeds the available pool; proportional
//! removal rounds to nearest instead. The asymmetry is deliberate and
//! balance-sensitive.

use siege_core::{AllocationPolicy, Building, BuildingId, ResourceKind};
use thiserror::Error;

/// Rejected staffing operations. These are caller errors and are never
/// clamped into a "nearest legal" assignment.
#[derive(Debug, Error, PartialEq)]
pub enum AllocationError {
    /// No building with the given id in the target set.
    #[error("no building with id: {0}")]
    TargetNotFound(String),
    /// The building has been destroyed and cannot be staffed.
    #[error("building {0} is destroyed")]
    TargetDestroyed(String),
    /// Requested assignment exceeds the building's worker capacity.
    #[error("assignment {requested} exceeds capacity {capacity} of {id}")]
    ExceedsCapacity {
        id: String,
        requested: u32,
        capacity: u32,
    },
    /// Requested assignment is not a multiple of the staffing step.
    #[error("assignment {requested} is not a multiple of staff step {step} for {id}")]
    OffStep {
        id: String,
        requested: u32,
        step: u32,
    },
}

/// Distribute `available` workers over `buildings` under `policy`.
///
/// Every policy guarantees `sum(assigned) <= available` and
/// `assigned <= worker_capacity` per building.
pub fn allocate(policy: &AllocationPolicy, available: u32, buildings: &mut [Building]) {
    match policy {
        AllocationPolicy::Manual => {}
        AllocationPolicy::Auto => allocate_proportional(available, buildings, false),
        AllocationPolicy::Priority(kinds) => allocate_by_priority(kinds, available, buildings),
        AllocationPolicy::Activation => allocate_proportional(available, buildings, true),
    }
}

fn allocate_proportional(available: u32, buildings: &mut [Building], require_active: bool) {
    let eligible = |b: &Building| {
        if require_active {
            b.is_operational()
        } else {
            b.is_standing()
        }
    };
    let total_demand: u32 = buildings
        .iter()
        .filter(|b| eligible(b))
        .map(|b| b.worker_capacity)
        .sum();
    if total_demand == 0 {
        // No eligible demand: leave assignments untouched rather than
        // divide by zero.
        return;
    }
    for b in buildings.iter_mut() {
        if !eligible(b) {
            b.assigned_workers = 0;
        }
    }
    if available >= total_demand {
        for b in buildings.iter_mut() {
            if eligible(b) {
                b.assigned_workers = b.worker_capacity;
            }
        }
        return;
    }
    for b in buildings.iter_mut() {
        if eligible(b) {
            b.assigned_workers =
                ((u64::from(b.worker_capacity) * u64::from(available)) / u64::from(total_demand)) as u32;
        }
    }
    let assigned: u32 = buildings
        .iter()
        .filter(|b| eligible(b))
        .map(|b| b.assigned_workers)
        .sum();
    let mut remainder = available - assigned;
    // Hand the flooring remainder out one worker at a time, declaration
    // order, until it is gone or nothing has headroom.
    while remainder > 0 {
        let mut placed = false;
        for b in buildings.iter_mut() {
            if remainder == 0 {
                break;
            }
            if eligible(b) && b.headroom() > 0 {
                b.assigned_workers += 1;
                remainder -= 1;
                placed = true;
            }
        }
        if !placed {
            break;
        }
    }
}

fn allocate_by_priority(kinds: &[ResourceKind], available: u32, buildings: &mut [Building]) {
    for b in buildings.iter_mut() {
        b.assigned_workers = 0;
    }
    let mut remaining = available;
    let mut visited = vec![false; buildings.len()];
    for kind in kinds {
        for (i, b) in buildings.iter_mut().enumerate() {
            if visited[i] || b.destroyed || b.output != Some(*kind) {
                continue;
            }
            // A site claimed by an earlier priority is never revisited.
            visited[i] = true;
            let granted = b.worker_capacity.min(remaining);
            b.assigned_workers = granted;
            remaining -= granted;
        }
    }
}

/// Manually staff one building. Validates instead of clamping.
pub fn set_assignment(
    buildings: &mut [Building],
    id: &BuildingId,
    workers: u32,
) -> Result<(), AllocationError> {
    let building = buildings
        .iter_mut()
        .find(|b| &b.id == id)
        .ok_or_else(|| AllocationError::TargetNotFound(id.0.clone()))?;
    if building.destroyed {
        return Err(AllocationError::TargetDestroyed(id.0.clone()));
    }
    if workers > building.worker_capacity {
        return Err(AllocationError::ExceedsCapacity {
            id: id.0.clone(),
            requested: workers,
            capacity: building.worker_capacity,
        });
    }
    if workers % building.staff_step != 0 {
        return Err(AllocationError::OffStep {
            id: id.0.clone(),
            requested: workers,
            step: building.staff_step,
        });
    }
    building.assigned_workers = workers;
    Ok(())
}

/// Pull `count` workers off the job, proportionally to current staffing.
///
/// First pass removes each building's rounded share; a second pass sweeps
/// buildings in declaration order for any rounding shortfall. Whenever
/// total staffing >= `count`, exactly `count` is removed. The two passes
/// may debit the same building; that compound behavior is intended.
pub fn remove_workers_proportionally(buildings: &mut [Building], count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    let total_assigned: u32 = buildings.iter().map(|b| b.assigned_workers).sum();
    if total_assigned == 0 {
        return 0;
    }
    let mut removed = 0u32;
    for b in buildings.iter_mut() {
        if removed >= count {
            break;
        }
        let share = ((u64::from(b.assigned_workers) * u64::from(count)
            + u64::from(total_assigned) / 2)
            / u64::from(total_assigned)) as u32;
        let taken = share.min(b.assigned_workers).min(count - removed);
        b.assigned_workers -= taken;
        removed += taken;
    }
    if removed < count {
        for b in buildings.iter_mut() {
            if removed >= count {
                break;
            }
            let taken = b.assigned_workers.min(count - removed);
            b.assigned_workers -= taken;
            removed += taken;
        }
    }
    removed
}
