//! Resolution of standing trades at the trading post.
//!
//! One worker slot at the post buys one trade attempt per day. Rates float
//! around a base that worsens under heavy siege; convoys can be
//! intercepted on the way back in. Attempts that fail for lack of stock
//! are logged but do not spend a slot.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use siege_core::{
    DailyReport, EntryTag, GameState, RandomSource, ResolutionEntry, ResourceKind, StandingTrade,
};
use tracing::debug;

/// Siege intensity at and above which the exchange rate worsens.
pub const HIGH_SIEGE_THRESHOLD: f64 = 0.7;

/// Half-width of the uniform daily fluctuation applied to the base rate.
pub const RATE_SPREAD: f64 = 0.2;

/// Interception chance is this many percent at full siege intensity.
pub const INTERCEPT_BASE_PCT: f64 = 30.0;

/// Chance, in percent, that an executed trade smuggles in bonus medicine.
pub const BONUS_CHANCE_PCT: u32 = 10;

/// Under tyranny, every Nth completed trade stirs unrest.
pub const TYRANNY_TRIBUTE_EVERY: u32 = 5;

/// Unrest added when the tyranny tithe falls due.
pub const TYRANNY_TRIBUTE_UNREST: u32 = 2;

fn base_rate(state: &GameState) -> Decimal {
    let normal = Decimal::new(12, 1); // 1.2 input per unit received
    let elevated = Decimal::new(16, 1); // 1.6 under heavy siege
    let tyranny_cap = Decimal::new(13, 1); // dissenters trade cheap, at a price

    let mut rate = if state.siege.intensity >= HIGH_SIEGE_THRESHOLD {
        elevated
    } else {
        normal
    };
    if state.tyranny_adopted && rate > tyranny_cap {
        rate = tyranny_cap;
    }
    rate
}

fn effective_rate(state: &GameState, rng: &mut dyn RandomSource) -> Decimal {
    let noise = -RATE_SPREAD + 2.0 * RATE_SPREAD * rng.next_f64();
    let factor = Decimal::from_f64(1.0 + noise).unwrap_or(Decimal::ONE);
    base_rate(state) * factor
}

fn input_needed(trade: &StandingTrade, rate: Decimal) -> u32 {
    let needed = (Decimal::from(trade.amount) * rate).ceil();
    needed.to_u32().unwrap_or(u32::MAX).max(1)
}

fn intercept_chance_pct(state: &GameState) -> f64 {
    let mut chance = INTERCEPT_BASE_PCT * state.siege.intensity;
    if state.faith_adopted {
        chance /= 2.0;
    }
    chance
}

/// Resolve the day's standing trades into resource exchanges.
///
/// No-op when the settlement has no trading post or the post is destroyed,
/// inactive, or unstaffed. All lines for the day aggregate under a single
/// "Trading Post" entry; an idle post leaves no entry at all.
pub fn resolve_trades(state: &mut GameState, rng: &mut dyn RandomSource, report: &mut DailyReport) {
    let max_trades = match state.trading_post() {
        Some(post) if post.is_operational() => post.assigned_workers,
        _ => return,
    };
    if max_trades == 0 {
        return;
    }

    let mut entry = ResolutionEntry::new("Trading Post", EntryTag::Trade);
    let mut trades_executed = 0u32;
    let orders = state.standing_trades.clone();
    for trade in &orders {
        if trades_executed >= max_trades {
            break;
        }
        let rate = effective_rate(state, rng);
        let needed = input_needed(trade, rate);
        if state.resources.amount(trade.give) < needed {
            // Logged, but the slot is not spent.
            entry.push_line(format!(
                "No stock for the {} order: needed {} {}, had {}.",
                trade.receive,
                needed,
                trade.give,
                state.resources.amount(trade.give)
            ));
            continue;
        }
        state.resources.consume(trade.give, needed);
        let roll = rng.roll_percent();
        if f64::from(roll) < intercept_chance_pct(state) {
            entry.push_line(format!(
                "Convoy intercepted at the walls: {} {} lost.",
                needed, trade.give
            ));
        } else {
            state.resources.add(trade.receive, trade.amount);
            entry.push_line(format!(
                "Gave {} {}, received {} {}.",
                needed, trade.give, trade.amount, trade.receive
            ));
            if rng.roll_percent() < BONUS_CHANCE_PCT {
                let bonus = rng.next_in(1, 3).max(0) as u32;
                state.resources.add(ResourceKind::Medicine, bonus);
                entry.push_line(format!("The caravan smuggled in {} medicine.", bonus));
            }
            state.trades_total += 1;
            if state.tyranny_adopted && state.trades_total % TYRANNY_TRIBUTE_EVERY == 0 {
                state.raise_unrest(TYRANNY_TRIBUTE_UNREST);
                entry.push_line("The tithe on trade stirs resentment.".to_string());
            }
        }
        trades_executed += 1;
    }
    debug!(trades_executed, max_trades, "trading resolved");
    report.push(entry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use siege_core::{ScenarioConfig, ScriptedRandom};

    fn state() -> GameState {
        let mut state = GameState::from_scenario(&ScenarioConfig::default_scenario()).unwrap();
        state.siege.intensity = 0.0; // no interception unless a test raises it
        state
    }

    fn staffed(state: &mut GameState, workers: u32) {
        for b in &mut state.buildings {
            if b.kind == siege_core::BuildingKind::TradingPost {
                b.assigned_workers = workers;
            }
        }
    }

    fn report() -> DailyReport {
        DailyReport::new(1, NaiveDate::from_ymd_opt(1347, 10, 2).unwrap())
    }

    #[test]
    fn staffing_caps_trades_and_deltas_are_exact() {
        let mut s = state();
        staffed(&mut s, 2);
        s.standing_trades = vec![
            StandingTrade {
                give: ResourceKind::Materials,
                receive: ResourceKind::Food,
                amount: 5,
            },
            StandingTrade {
                give: ResourceKind::Fuel,
                receive: ResourceKind::Water,
                amount: 4,
            },
        ];
        let materials = s.resources.amount(ResourceKind::Materials);
        let fuel = s.resources.amount(ResourceKind::Fuel);
        let food = s.resources.amount(ResourceKind::Food);
        let water = s.resources.amount(ResourceKind::Water);

        // Scripted floats hold the rate at exactly 1.2; percent rolls of
        // 100 never intercept and never grant a bonus.
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);

        // ceil(5 * 1.2) = 6 materials, ceil(4 * 1.2) = 5 fuel.
        assert_eq!(s.resources.amount(ResourceKind::Materials), materials - 6);
        assert_eq!(s.resources.amount(ResourceKind::Fuel), fuel - 5);
        assert_eq!(s.resources.amount(ResourceKind::Food), food + 5);
        assert_eq!(s.resources.amount(ResourceKind::Water), water + 4);
        assert_eq!(s.trades_total, 2);
        assert_eq!(rep.entries().len(), 1);
        assert_eq!(rep.entries()[0].lines.len(), 2);
        assert_eq!(rep.entries()[0].tag, EntryTag::Trade);
    }

    #[test]
    fn insufficient_stock_does_not_spend_a_slot() {
        let mut s = state();
        staffed(&mut s, 1);
        s.resources.consume(ResourceKind::Medicine, u32::MAX);
        s.standing_trades = vec![
            StandingTrade {
                give: ResourceKind::Medicine, // out of stock
                receive: ResourceKind::Food,
                amount: 5,
            },
            StandingTrade {
                give: ResourceKind::Materials,
                receive: ResourceKind::Food,
                amount: 3,
            },
        ];
        let food = s.resources.amount(ResourceKind::Food);
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);

        // The skipped order left the single slot free for the second one.
        assert_eq!(s.resources.amount(ResourceKind::Food), food + 3);
        assert_eq!(s.trades_total, 1);
        assert_eq!(rep.entries()[0].lines.len(), 2);
    }

    #[test]
    fn interception_consumes_input_without_producing() {
        let mut s = state();
        staffed(&mut s, 1);
        s.siege.intensity = 1.0; // 30% interception
        s.standing_trades = vec![StandingTrade {
            give: ResourceKind::Materials,
            receive: ResourceKind::Food,
            amount: 5,
        }];
        let materials = s.resources.amount(ResourceKind::Materials);
        let food = s.resources.amount(ResourceKind::Food);
        let mut rng = ScriptedRandom::new().with_percents([10]); // under 30: intercepted
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);

        assert_eq!(s.resources.amount(ResourceKind::Materials), materials - 6);
        assert_eq!(s.resources.amount(ResourceKind::Food), food);
        assert_eq!(s.trades_total, 0);
        assert!(rep.entries()[0].lines[0].contains("intercepted"));
    }

    #[test]
    fn faith_halves_interception() {
        let mut s = state();
        staffed(&mut s, 1);
        s.siege.intensity = 1.0;
        s.faith_adopted = true;
        s.standing_trades = vec![StandingTrade {
            give: ResourceKind::Materials,
            receive: ResourceKind::Food,
            amount: 5,
        }];
        // A roll of 20 would be intercepted at 30% but passes at 15%.
        let mut rng = ScriptedRandom::new().with_percents([20]);
        let food = s.resources.amount(ResourceKind::Food);
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);
        assert_eq!(s.resources.amount(ResourceKind::Food), food + 5);
    }

    #[test]
    fn tyranny_caps_the_elevated_rate_and_tithes_every_fifth_trade() {
        let mut s = state();
        staffed(&mut s, 1);
        s.siege.intensity = 0.0;
        s.tyranny_adopted = true;
        s.trades_total = 4; // next completed trade is the fifth
        s.standing_trades = vec![StandingTrade {
            give: ResourceKind::Materials,
            receive: ResourceKind::Food,
            amount: 5,
        }];
        let unrest = s.unrest;
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);
        assert_eq!(s.unrest, unrest + TYRANNY_TRIBUTE_UNREST);
        assert!(rep.entries()[0].lines.iter().any(|l| l.contains("tithe")));
    }

    #[test]
    fn heavy_siege_elevates_the_rate() {
        let mut s = state();
        s.siege.intensity = 0.9;
        assert_eq!(base_rate(&s), Decimal::new(16, 1));
        s.tyranny_adopted = true;
        assert_eq!(base_rate(&s), Decimal::new(13, 1));
    }

    #[test]
    fn unstaffed_or_missing_post_leaves_no_entry() {
        let mut s = state();
        staffed(&mut s, 0);
        let mut rng = ScriptedRandom::new();
        let mut rep = report();
        resolve_trades(&mut s, &mut rng, &mut rep);
        assert!(rep.entries().is_empty());

        s.buildings.retain(|b| b.kind != siege_core::BuildingKind::TradingPost);
        resolve_trades(&mut s, &mut rng, &mut rep);
        assert!(rep.entries().is_empty());
    }
}
