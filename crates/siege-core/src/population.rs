//! Population pools and the timed recovery queues behind them.
//!
//! People only move between pools through the transition operations here.
//! The sick and wounded pools each own a [`RecoveryQueue`] whose summed
//! cohort counts track the pool in lock-step: every removal or recovery
//! evicts a matching head-count from the queue.

use serde::{Deserialize, Serialize};

/// A group of people sharing one recovery countdown timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryCohort {
    /// People in the cohort; cohorts at zero are dropped from the queue.
    pub count: u32,
    /// Days until recovery is eligible. Goes negative once overdue.
    pub days_remaining: i32,
}

/// Ordered multiset of [`RecoveryCohort`]s.
///
/// Insertion order is preserved for display, but eviction always prefers
/// the soonest timer first (ascending `days_remaining`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryQueue {
    cohorts: Vec<RecoveryCohort>,
}

impl RecoveryQueue {
    /// Append a cohort of `count` people due in `days_remaining` days.
    /// Empty cohorts are not recorded.
    pub fn enqueue(&mut self, count: u32, days_remaining: i32) {
        if count > 0 {
            self.cohorts.push(RecoveryCohort {
                count,
                days_remaining,
            });
        }
    }

    /// Decrement every cohort timer by one day. Timers keep counting below
    /// zero; negative values mark a cohort as overdue.
    pub fn advance(&mut self) {
        for cohort in &mut self.cohorts {
            cohort.days_remaining -= 1;
        }
    }

    /// People in cohorts whose timer has reached zero or gone below.
    pub fn ready_count(&self) -> u32 {
        self.cohorts
            .iter()
            .filter(|c| c.days_remaining <= 0)
            .map(|c| c.count)
            .sum()
    }

    /// People in cohorts at least `threshold` days overdue.
    pub fn overdue_count(&self, threshold: i32) -> u32 {
        self.cohorts
            .iter()
            .filter(|c| c.days_remaining <= -threshold)
            .map(|c| c.count)
            .sum()
    }

    /// People across all cohorts.
    pub fn total(&self) -> u32 {
        self.cohorts.iter().map(|c| c.count).sum()
    }

    /// Remove up to `count` people, draining cohorts with the soonest
    /// timers first. Returns the number actually evicted.
    pub fn evict(&mut self, count: u32) -> u32 {
        let mut remaining = count;
        let mut order: Vec<usize> = (0..self.cohorts.len()).collect();
        order.sort_by_key(|&i| self.cohorts[i].days_remaining);
        for i in order {
            if remaining == 0 {
                break;
            }
            let cohort = &mut self.cohorts[i];
            let taken = cohort.count.min(remaining);
            cohort.count -= taken;
            remaining -= taken;
        }
        self.cohorts.retain(|c| c.count > 0);
        count - remaining
    }

    /// Cohorts in insertion order.
    pub fn cohorts(&self) -> &[RecoveryCohort] {
        &self.cohorts
    }
}

/// Head-counts by category plus the two recovery queues.
///
/// `total_population` is always the sum of the five pools. Guards are
/// tracked separately from workers because they are the last to be
/// sacrificed in mass-casualty removal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationLedger {
    healthy_workers: u32,
    guards: u32,
    sick_workers: u32,
    wounded_workers: u32,
    elderly: u32,
    sick_queue: RecoveryQueue,
    wounded_queue: RecoveryQueue,
}

impl PopulationLedger {
    /// Ledger with the given starting pools and empty queues.
    pub fn new(healthy_workers: u32, guards: u32, elderly: u32) -> Self {
        Self {
            healthy_workers,
            guards,
            elderly,
            ..Self::default()
        }
    }

    pub fn healthy_workers(&self) -> u32 {
        self.healthy_workers
    }

    pub fn guards(&self) -> u32 {
        self.guards
    }

    pub fn sick_workers(&self) -> u32 {
        self.sick_workers
    }

    pub fn wounded_workers(&self) -> u32 {
        self.wounded_workers
    }

    pub fn elderly(&self) -> u32 {
        self.elderly
    }

    /// Sum of all five pools.
    pub fn total_population(&self) -> u32 {
        self.healthy_workers + self.guards + self.sick_workers + self.wounded_workers + self.elderly
    }

    pub fn sick_queue(&self) -> &RecoveryQueue {
        &self.sick_queue
    }

    pub fn wounded_queue(&self) -> &RecoveryQueue {
        &self.wounded_queue
    }

    pub fn add_healthy_workers(&mut self, count: u32) {
        self.healthy_workers += count;
    }

    pub fn add_elderly(&mut self, count: u32) {
        self.elderly += count;
    }

    /// Convert up to `count` healthy workers into guards. Returns the
    /// number actually converted.
    pub fn train_guards(&mut self, count: u32) -> u32 {
        let moved = self.healthy_workers.min(count);
        self.healthy_workers -= moved;
        self.guards += moved;
        moved
    }

    /// Convert up to `count` guards back into healthy workers. Returns the
    /// number actually converted.
    pub fn stand_down_guards(&mut self, count: u32) -> u32 {
        let moved = self.guards.min(count);
        self.guards -= moved;
        self.healthy_workers += moved;
        moved
    }

    /// Remove up to `count` healthy workers. Returns the number removed.
    pub fn remove_healthy_workers(&mut self, count: u32) -> u32 {
        let removed = self.healthy_workers.min(count);
        self.healthy_workers -= removed;
        removed
    }

    /// Remove up to `count` sick workers, evicting the same head-count
    /// from the sick queue (soonest timers first).
    pub fn remove_sick_workers(&mut self, count: u32) -> u32 {
        let removed = self.sick_workers.min(count);
        self.sick_workers -= removed;
        self.sick_queue.evict(removed);
        removed
    }

    /// Remove up to `count` wounded workers, evicting the same head-count
    /// from the wounded queue (soonest timers first).
    pub fn remove_wounded_workers(&mut self, count: u32) -> u32 {
        let removed = self.wounded_workers.min(count);
        self.wounded_workers -= removed;
        self.wounded_queue.evict(removed);
        removed
    }

    /// Move `count` people into the sick pool with a fresh cohort due in
    /// `recovery_days`.
    pub fn add_sick_workers(&mut self, count: u32, recovery_days: i32) {
        if count > 0 {
            self.sick_workers += count;
            self.sick_queue.enqueue(count, recovery_days);
        }
    }

    /// Move `count` people into the wounded pool with a fresh cohort due
    /// in `recovery_days`.
    pub fn add_wounded_workers(&mut self, count: u32, recovery_days: i32) {
        if count > 0 {
            self.wounded_workers += count;
            self.wounded_queue.enqueue(count, recovery_days);
        }
    }

    /// Tick the sick queue by one day.
    pub fn advance_recovery_timers(&mut self) {
        self.sick_queue.advance();
    }

    /// Tick the wounded queue by one day.
    pub fn advance_wounded_recovery_timers(&mut self) {
        self.wounded_queue.advance();
    }

    /// Sick people whose timer has elapsed.
    pub fn ready_to_recover_count(&self) -> u32 {
        self.sick_queue.ready_count()
    }

    /// Wounded people whose timer has elapsed.
    pub fn wounded_ready_to_recover_count(&self) -> u32 {
        self.wounded_queue.ready_count()
    }

    /// Move up to `count` sick workers back to healthy, evicting the same
    /// head-count from the queue (soonest timers first, which prefers
    /// cohorts already eligible).
    ///
    /// Callers that must respect eligibility pass at most
    /// [`ready_to_recover_count`](Self::ready_to_recover_count); the
    /// operation itself honors the raw pool count.
    pub fn recover_workers(&mut self, count: u32) -> u32 {
        let recovered = self.sick_workers.min(count);
        self.sick_workers -= recovered;
        self.healthy_workers += recovered;
        self.sick_queue.evict(recovered);
        recovered
    }

    /// Wounded counterpart of [`recover_workers`](Self::recover_workers).
    pub fn recover_wounded_workers(&mut self, count: u32) -> u32 {
        let recovered = self.wounded_workers.min(count);
        self.wounded_workers -= recovered;
        self.healthy_workers += recovered;
        self.wounded_queue.evict(recovered);
        recovered
    }

    /// Wounded people at least `death_days` overdue. Pure query; callers
    /// follow up with [`remove_wounded_workers`](Self::remove_wounded_workers).
    pub fn wounded_untreated_deaths(&self, death_days: i32) -> u32 {
        self.wounded_queue.overdue_count(death_days)
    }

    /// Remove up to `count` people in fixed priority order: healthy, sick,
    /// wounded, elderly, guards. Guards hold the walls and go last.
    /// Returns the total actually removed.
    pub fn remove_people_by_priority(&mut self, count: u32) -> u32 {
        let mut left = count;
        left -= self.remove_healthy_workers(left);
        left -= self.remove_sick_workers(left);
        left -= self.remove_wounded_workers(left);
        let elderly_taken = self.elderly.min(left);
        self.elderly -= elderly_taken;
        left -= elderly_taken;
        let guards_taken = self.guards.min(left);
        self.guards -= guards_taken;
        left -= guards_taken;
        count - left
    }
}
