#![deny(warnings)]

//! Standing effects: one-shot decrees and persistent diplomatic actions.
//!
//! Both shapes sit behind capability traits so the catalog stays open for
//! extension while the engine only ever sees `issue`, `activate`, and the
//! daily tick. The registry owns the catalog instances; which actions are
//! currently in force is recorded on [`GameState`] itself so snapshots
//! capture it.

pub mod decrees;
pub mod diplomacy;

use siege_core::{DailyReport, GameState, RandomSource};
use thiserror::Error;
use tracing::info;

/// A one-shot order. Stateless: issuing twice is legal whenever the
/// eligibility gate passes both times.
pub trait Decree {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    /// Human-readable cost/effect summary for the command surface.
    fn tooltip(&self) -> String;
    /// Eligibility gate; the refusal reason is shown to the player.
    fn can_issue(&self, state: &GameState) -> Result<(), String>;
    /// Apply the order's deltas and append order-effect report lines.
    fn apply(&self, state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport);
}

/// A persistent diplomatic stance: Inactive until activated, then ticked
/// once per day until deactivated. Some stances cannot be walked back.
pub trait DiplomaticAction {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;
    /// Human-readable cost/effect summary for the command surface.
    fn tooltip(&self) -> String;
    /// Eligibility gate; the refusal reason is shown to the player.
    fn can_activate(&self, state: &GameState) -> Result<(), String>;
    /// Whether the stance can ever be revoked once taken.
    fn supports_deactivation(&self) -> bool {
        true
    }
    /// Fires exactly once, on the Inactive -> Active transition.
    fn on_activate(&self, state: &mut GameState, report: &mut DailyReport);
    /// Fires once per simulated day while active.
    fn apply_daily(&self, state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport);
    /// Fires on the Active -> Inactive transition, when supported.
    fn on_deactivate(&self, _state: &mut GameState, _report: &mut DailyReport) {}
}

/// Rejected registry operations.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("no standing effect with id: {0}")]
    UnknownEffect(String),
    #[error("{id} is not eligible: {reason}")]
    NotEligible { id: String, reason: String },
    #[error("{0} is already in force")]
    AlreadyActive(String),
    #[error("{0} is not in force")]
    NotActive(String),
    #[error("{0} cannot be revoked once sworn")]
    Irreversible(String),
}

/// Catalog of every decree and diplomatic action, plus the activation
/// state machine over [`GameState::active_effects`].
pub struct StandingEffectRegistry {
    decrees: Vec<Box<dyn Decree>>,
    actions: Vec<Box<dyn DiplomaticAction>>,
}

impl StandingEffectRegistry {
    /// Empty registry; used by tests that register their own effects.
    pub fn new() -> Self {
        Self {
            decrees: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Registry holding the standard catalogs.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for decree in decrees::standard_decrees() {
            registry.register_decree(decree);
        }
        for action in diplomacy::standard_actions() {
            registry.register_action(action);
        }
        registry
    }

    pub fn register_decree(&mut self, decree: Box<dyn Decree>) {
        self.decrees.push(decree);
    }

    pub fn register_action(&mut self, action: Box<dyn DiplomaticAction>) {
        self.actions.push(action);
    }

    pub fn find_decree(&self, id: &str) -> Option<&dyn Decree> {
        self.decrees.iter().find(|d| d.id() == id).map(|d| d.as_ref())
    }

    pub fn find_action(&self, id: &str) -> Option<&dyn DiplomaticAction> {
        self.actions.iter().find(|a| a.id() == id).map(|a| a.as_ref())
    }

    pub fn decrees(&self) -> impl Iterator<Item = &dyn Decree> {
        self.decrees.iter().map(|d| d.as_ref())
    }

    pub fn actions(&self) -> impl Iterator<Item = &dyn DiplomaticAction> {
        self.actions.iter().map(|a| a.as_ref())
    }

    pub fn is_active(&self, state: &GameState, id: &str) -> bool {
        state.active_effects.iter().any(|e| e == id)
    }

    /// Issue a one-shot decree: eligibility gate first, then apply.
    pub fn issue_decree(
        &self,
        id: &str,
        state: &mut GameState,
        rng: &mut dyn RandomSource,
        report: &mut DailyReport,
    ) -> Result<(), PolicyError> {
        let decree = self
            .find_decree(id)
            .ok_or_else(|| PolicyError::UnknownEffect(id.to_string()))?;
        decree.can_issue(state).map_err(|reason| PolicyError::NotEligible {
            id: id.to_string(),
            reason,
        })?;
        info!(decree = id, "decree issued");
        decree.apply(state, rng, report);
        Ok(())
    }

    /// Take a diplomatic stance. Fires `on_activate` exactly once.
    pub fn activate(
        &self,
        id: &str,
        state: &mut GameState,
        report: &mut DailyReport,
    ) -> Result<(), PolicyError> {
        let action = self
            .find_action(id)
            .ok_or_else(|| PolicyError::UnknownEffect(id.to_string()))?;
        if self.is_active(state, id) {
            return Err(PolicyError::AlreadyActive(id.to_string()));
        }
        action
            .can_activate(state)
            .map_err(|reason| PolicyError::NotEligible {
                id: id.to_string(),
                reason,
            })?;
        state.active_effects.push(id.to_string());
        info!(action = id, "diplomatic action activated");
        action.on_activate(state, report);
        Ok(())
    }

    /// Revoke a stance, when the action supports it.
    pub fn deactivate(
        &self,
        id: &str,
        state: &mut GameState,
        report: &mut DailyReport,
    ) -> Result<(), PolicyError> {
        let action = self
            .find_action(id)
            .ok_or_else(|| PolicyError::UnknownEffect(id.to_string()))?;
        if !self.is_active(state, id) {
            return Err(PolicyError::NotActive(id.to_string()));
        }
        if !action.supports_deactivation() {
            return Err(PolicyError::Irreversible(id.to_string()));
        }
        state.active_effects.retain(|e| e != id);
        info!(action = id, "diplomatic action deactivated");
        action.on_deactivate(state, report);
        Ok(())
    }

    /// Tick every active action once. Actions are visited in registration
    /// order rather than activation order, so RNG consumption is stable
    /// no matter when each stance was taken.
    pub fn apply_daily(
        &self,
        state: &mut GameState,
        rng: &mut dyn RandomSource,
        report: &mut DailyReport,
    ) {
        for action in &self.actions {
            if self.is_active(state, action.id()) {
                action.apply_daily(state, rng, report);
            }
        }
    }
}

impl Default for StandingEffectRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
