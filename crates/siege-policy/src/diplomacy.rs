//! The standard diplomatic action catalog.

use crate::DiplomaticAction;
use siege_core::{DailyReport, EntryTag, GameState, RandomSource, ResolutionEntry, ResourceKind};

fn diplomacy_entry(name: &str) -> ResolutionEntry {
    ResolutionEntry::new(name, EntryTag::Diplomacy)
}

/// Buy a slackening of the siege with a daily shipment of goods.
/// The besiegers only treat once they have tasted a captured zone.
pub struct TributePact;

/// Daily food cost of the pact.
pub const TRIBUTE_FOOD: u32 = 5;
/// Daily materials cost of the pact.
pub const TRIBUTE_MATERIALS: u32 = 2;
/// Chance, in percent, that the besiegers demand extra materials.
pub const TRIBUTE_DEMAND_PCT: u32 = 15;

impl DiplomaticAction for TributePact {
    fn id(&self) -> &'static str {
        "tribute-pact"
    }

    fn name(&self) -> &'static str {
        "Tribute Pact"
    }

    fn tooltip(&self) -> String {
        format!(
            "Ship {TRIBUTE_FOOD} food and {TRIBUTE_MATERIALS} materials daily; the siege eases while the tribute flows."
        )
    }

    fn can_activate(&self, state: &GameState) -> Result<(), String> {
        if state.zones_lost() == 0 {
            return Err("the besiegers will not treat while the walls hold".to_string());
        }
        Ok(())
    }

    fn on_activate(&self, _state: &mut GameState, report: &mut DailyReport) {
        let mut entry = diplomacy_entry(self.name());
        entry.push_line("Envoys slip out through the postern with the first tribute.");
        report.push(entry);
    }

    fn apply_daily(&self, state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport) {
        let mut entry = diplomacy_entry(self.name());
        let has_food = state.resources.amount(ResourceKind::Food) >= TRIBUTE_FOOD;
        let has_materials = state.resources.amount(ResourceKind::Materials) >= TRIBUTE_MATERIALS;
        if !has_food || !has_materials {
            state.siege.harden(0.05);
            entry.push_line("The tribute wagon left empty; the besiegers press closer.");
            report.push(entry);
            return;
        }
        state.resources.consume(ResourceKind::Food, TRIBUTE_FOOD);
        state.resources.consume(ResourceKind::Materials, TRIBUTE_MATERIALS);
        state.siege.ease(0.02);
        entry.push_line(format!(
            "Tribute paid: {TRIBUTE_FOOD} food, {TRIBUTE_MATERIALS} materials."
        ));
        if rng.roll_percent() < TRIBUTE_DEMAND_PCT {
            let extra = state.resources.consume(ResourceKind::Materials, 3);
            if extra > 0 {
                entry.push_line(format!("The besiegers demand {extra} materials more."));
            } else {
                state.raise_unrest(3);
                entry.push_line("The besiegers demand more than the stores hold; word spreads.");
            }
        }
        report.push(entry);
    }
}

/// Nightly processions that lift spirits but pack the shrine crowds.
/// Once sworn, the rites cannot be abandoned.
pub struct ZealotsProcession;

impl DiplomaticAction for ZealotsProcession {
    fn id(&self) -> &'static str {
        "zealots-procession"
    }

    fn name(&self) -> &'static str {
        "Zealots' Procession"
    }

    fn tooltip(&self) -> String {
        "Nightly rites: usually morale +2, sometimes fever in the crowds. Irreversible.".to_string()
    }

    fn can_activate(&self, state: &GameState) -> Result<(), String> {
        if !state.faith_adopted {
            return Err("the crowd has no faith in processions".to_string());
        }
        Ok(())
    }

    fn supports_deactivation(&self) -> bool {
        false
    }

    fn on_activate(&self, state: &mut GameState, report: &mut DailyReport) {
        state.raise_morale(5);
        let mut entry = diplomacy_entry(self.name());
        entry.push_line("Torches wind through the streets; the oath is sworn.");
        report.push(entry);
    }

    fn apply_daily(&self, state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport) {
        let mut entry = diplomacy_entry(self.name());
        if rng.roll_percent() < 60 {
            state.raise_morale(2);
            entry.push_line("The procession steadies the settlement's nerve.");
        } else {
            state.population.add_sick_workers(1, 4);
            entry.push_line("Fever spreads in the press of the crowd.");
        }
        report.push(entry);
    }
}

/// Quiet requisitions from the populace, for those willing to rule by fear.
pub struct ShadowTithe;

impl DiplomaticAction for ShadowTithe {
    fn id(&self) -> &'static str {
        "shadow-tithe"
    }

    fn name(&self) -> &'static str {
        "Shadow Tithe"
    }

    fn tooltip(&self) -> String {
        "Daily materials +2 and fuel +1 seized from the populace; unrest may grow.".to_string()
    }

    fn can_activate(&self, state: &GameState) -> Result<(), String> {
        if !state.tyranny_adopted {
            return Err("only a hand already feared can take the tithe".to_string());
        }
        Ok(())
    }

    fn on_activate(&self, _state: &mut GameState, report: &mut DailyReport) {
        let mut entry = diplomacy_entry(self.name());
        entry.push_line("Collectors go door to door after dark.");
        report.push(entry);
    }

    fn apply_daily(&self, state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport) {
        state.resources.add(ResourceKind::Materials, 2);
        state.resources.add(ResourceKind::Fuel, 1);
        let mut entry = diplomacy_entry(self.name());
        entry.push_line("The tithe brings in 2 materials and 1 fuel.");
        if rng.roll_percent() < 25 {
            state.raise_unrest(2);
            entry.push_line("A household resists; the story travels.");
        }
        report.push(entry);
    }
}

/// Every diplomatic action the engine ships with.
pub fn standard_actions() -> Vec<Box<dyn DiplomaticAction>> {
    vec![
        Box::new(TributePact),
        Box::new(ZealotsProcession),
        Box::new(ShadowTithe),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PolicyError, StandingEffectRegistry};
    use chrono::NaiveDate;
    use siege_core::{ScenarioConfig, ScriptedRandom};

    fn state() -> GameState {
        GameState::from_scenario(&ScenarioConfig::default_scenario()).unwrap()
    }

    fn report() -> DailyReport {
        DailyReport::new(1, NaiveDate::from_ymd_opt(1347, 10, 2).unwrap())
    }

    #[test]
    fn tribute_requires_a_lost_zone() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        let mut rep = report();
        let err = registry.activate("tribute-pact", &mut s, &mut rep).unwrap_err();
        assert!(matches!(err, PolicyError::NotEligible { .. }));

        s.zones[2].capture();
        registry.activate("tribute-pact", &mut s, &mut rep).unwrap();
        assert!(registry.is_active(&s, "tribute-pact"));
    }

    #[test]
    fn tribute_pays_daily_and_eases_the_siege() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.zones[2].capture();
        let mut rep = report();
        registry.activate("tribute-pact", &mut s, &mut rep).unwrap();
        let food = s.resources.amount(ResourceKind::Food);
        let intensity = s.siege.intensity;
        let mut rng = ScriptedRandom::new(); // rolls 100: no extra demand
        let mut tick = report();
        registry.apply_daily(&mut s, &mut rng, &mut tick);
        assert_eq!(s.resources.amount(ResourceKind::Food), food - TRIBUTE_FOOD);
        assert!(s.siege.intensity < intensity);
    }

    #[test]
    fn empty_tribute_wagon_hardens_the_siege() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.zones[2].capture();
        let mut rep = report();
        registry.activate("tribute-pact", &mut s, &mut rep).unwrap();
        s.resources.consume(ResourceKind::Food, u32::MAX);
        let intensity = s.siege.intensity;
        let mut rng = ScriptedRandom::new();
        let mut tick = report();
        registry.apply_daily(&mut s, &mut rng, &mut tick);
        assert!(s.siege.intensity > intensity);
    }

    #[test]
    fn procession_is_irreversible() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.faith_adopted = true;
        let mut rep = report();
        registry.activate("zealots-procession", &mut s, &mut rep).unwrap();
        assert_eq!(
            registry.deactivate("zealots-procession", &mut s, &mut rep),
            Err(PolicyError::Irreversible("zealots-procession".into()))
        );
        assert!(registry.is_active(&s, "zealots-procession"));
    }

    #[test]
    fn procession_can_spread_fever() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        s.faith_adopted = true;
        let mut rep = report();
        registry.activate("zealots-procession", &mut s, &mut rep).unwrap();
        let sick = s.population.sick_workers();
        let mut rng = ScriptedRandom::new().with_percents([90]); // 90 >= 60: fever branch
        let mut tick = report();
        registry.apply_daily(&mut s, &mut rng, &mut tick);
        assert_eq!(s.population.sick_workers(), sick + 1);
    }

    #[test]
    fn shadow_tithe_is_gated_on_tyranny() {
        let registry = StandingEffectRegistry::standard();
        let mut s = state();
        let mut rep = report();
        assert!(registry.activate("shadow-tithe", &mut s, &mut rep).is_err());
        s.tyranny_adopted = true;
        registry.activate("shadow-tithe", &mut s, &mut rep).unwrap();
        let materials = s.resources.amount(ResourceKind::Materials);
        let mut rng = ScriptedRandom::new();
        let mut tick = report();
        registry.apply_daily(&mut s, &mut rng, &mut tick);
        assert_eq!(s.resources.amount(ResourceKind::Materials), materials + 2);
    }
}
