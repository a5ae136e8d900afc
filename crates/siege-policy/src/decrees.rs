//! The standard decree catalog.

use crate::Decree;
use siege_core::{DailyReport, EntryTag, GameState, RandomSource, ResolutionEntry, ResourceKind};

fn order_entry(name: &str) -> ResolutionEntry {
    ResolutionEntry::new(name, EntryTag::OrderEffect)
}

/// Spend a full day of extra food for a morale surge.
pub struct DoubleRations;

impl Decree for DoubleRations {
    fn id(&self) -> &'static str {
        "double-rations"
    }

    fn name(&self) -> &'static str {
        "Double Rations"
    }

    fn tooltip(&self) -> String {
        "Spend one food per person; morale +8, unrest -2.".to_string()
    }

    fn can_issue(&self, state: &GameState) -> Result<(), String> {
        let needed = state.population.total_population();
        if state.resources.amount(ResourceKind::Food) < needed {
            return Err(format!("not enough food for a double ration ({needed} needed)"));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &mut dyn RandomSource, report: &mut DailyReport) {
        let eaten = state
            .resources
            .consume(ResourceKind::Food, state.population.total_population());
        state.raise_morale(8);
        state.lower_unrest(2);
        let mut entry = order_entry(self.name());
        entry.push_line(format!(
            "Double rations tonight: {} food eaten, the tables are full.",
            eaten
        ));
        report.push(entry);
    }
}

/// Trade a little goodwill for quiet streets.
pub struct Curfew;

impl Decree for Curfew {
    fn id(&self) -> &'static str {
        "curfew"
    }

    fn name(&self) -> &'static str {
        "Curfew"
    }

    fn tooltip(&self) -> String {
        "Unrest -10, morale -4. Requires unrest of at least 15.".to_string()
    }

    fn can_issue(&self, state: &GameState) -> Result<(), String> {
        if state.unrest < 15 {
            return Err("the streets are already quiet".to_string());
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &mut dyn RandomSource, report: &mut DailyReport) {
        state.lower_unrest(10);
        state.lower_morale(4);
        let mut entry = order_entry(self.name());
        entry.push_line("The watch clears the streets at dusk.");
        report.push(entry);
    }
}

/// Press five healthy workers into the guard.
pub struct Conscription;

impl Decree for Conscription {
    fn id(&self) -> &'static str {
        "conscription"
    }

    fn name(&self) -> &'static str {
        "Conscription"
    }

    fn tooltip(&self) -> String {
        "Move 5 healthy workers to the guard; unrest +5.".to_string()
    }

    fn can_issue(&self, state: &GameState) -> Result<(), String> {
        if state.population.healthy_workers() < 5 {
            return Err("too few able hands to conscript".to_string());
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &mut dyn RandomSource, report: &mut DailyReport) {
        let drafted = state.population.train_guards(5);
        state.raise_unrest(5);
        let mut entry = order_entry(self.name());
        entry.push_line(format!("{} workers take up spears on the wall.", drafted));
        report.push(entry);
    }
}

/// Burn fuel and scrap to distill field remedies.
pub struct DistillRemedies;

impl Decree for DistillRemedies {
    fn id(&self) -> &'static str {
        "distill-remedies"
    }

    fn name(&self) -> &'static str {
        "Distill Remedies"
    }

    fn tooltip(&self) -> String {
        "Spend 10 fuel and 5 materials for 5 medicine.".to_string()
    }

    fn can_issue(&self, state: &GameState) -> Result<(), String> {
        if state.resources.amount(ResourceKind::Fuel) < 10 {
            return Err("not enough fuel to fire the stills".to_string());
        }
        if state.resources.amount(ResourceKind::Materials) < 5 {
            return Err("not enough materials for the stills".to_string());
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, _rng: &mut dyn RandomSource, report: &mut DailyReport) {
        state.resources.consume(ResourceKind::Fuel, 10);
        state.resources.consume(ResourceKind::Materials, 5);
        state.resources.add(ResourceKind::Medicine, 5);
        let mut entry = order_entry(self.name());
        entry.push_line("The stills run all night; 5 medicine bottled.");
        report.push(entry);
    }
}

/// Every decree the engine ships with.
pub fn standard_decrees() -> Vec<Box<dyn Decree>> {
    vec![
        Box::new(DoubleRations),
        Box::new(Curfew),
        Box::new(Conscription),
        Box::new(DistillRemedies),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StandingEffectRegistry;
    use chrono::NaiveDate;
    use siege_core::{ScenarioConfig, ScriptedRandom};

    fn state() -> GameState {
        GameState::from_scenario(&ScenarioConfig::default_scenario()).unwrap()
    }

    fn report() -> DailyReport {
        DailyReport::new(1, NaiveDate::from_ymd_opt(1347, 10, 2).unwrap())
    }

    #[test]
    fn double_rations_spends_food_for_morale() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        let food = s.resources.amount(ResourceKind::Food);
        let people = s.population.total_population();
        let morale = s.morale;
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        registry
            .issue_decree("double-rations", &mut s, &mut rng, &mut rep)
            .unwrap();
        assert_eq!(s.resources.amount(ResourceKind::Food), food - people);
        assert_eq!(s.morale, morale + 8);
        assert_eq!(rep.entries()[0].tag, EntryTag::OrderEffect);
    }

    #[test]
    fn failed_eligibility_leaves_state_unmodified() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.resources.consume(ResourceKind::Food, u32::MAX);
        let before = s.clone();
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        let err = registry
            .issue_decree("double-rations", &mut s, &mut rng, &mut rep)
            .unwrap_err();
        assert!(matches!(err, crate::PolicyError::NotEligible { .. }));
        assert_eq!(s, before);
        assert!(rep.entries().is_empty());
    }

    #[test]
    fn reissuing_a_passing_decree_is_legal() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.unrest = 40;
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        registry.issue_decree("curfew", &mut s, &mut rng, &mut rep).unwrap();
        registry.issue_decree("curfew", &mut s, &mut rng, &mut rep).unwrap();
        assert_eq!(s.unrest, 20);
    }

    #[test]
    fn conscription_converts_rather_than_removes() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        let total = s.population.total_population();
        let guards = s.population.guards();
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        registry
            .issue_decree("conscription", &mut s, &mut rng, &mut rep)
            .unwrap();
        assert_eq!(s.population.total_population(), total);
        assert_eq!(s.population.guards(), guards + 5);
    }

    #[test]
    fn distillation_trades_fuel_for_medicine() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        let medicine = s.resources.amount(ResourceKind::Medicine);
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        registry
            .issue_decree("distill-remedies", &mut s, &mut rng, &mut rep)
            .unwrap();
        assert_eq!(s.resources.amount(ResourceKind::Medicine), medicine + 5);
    }
}
