//! Mango Clicker game logic: pure functions over the game state.
//!
//! Economy transitions take `&mut GameData` and are all-or-nothing: a refused
//! purchase leaves every field untouched. UI timers live in [`tick`].

use super::formulas::{self, MAX_COOLDOWN_LEVEL, MAX_DAMAGE_LEVEL, MAX_REBIRTH_COUNT};
use super::state::{GameData, MangoState};

/// Result of a tap attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapOutcome {
    pub damage: u64,
    pub accepted: bool,
}

impl TapOutcome {
    const REJECTED: TapOutcome = TapOutcome {
        damage: 0,
        accepted: false,
    };
}

/// Shop view of a purchase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offer {
    /// Can be bought now for this price.
    Affordable(u64),
    /// Costs this much, more than the balance.
    TooExpensive(u64),
    /// Level cap reached.
    Maxed,
}

impl Offer {
    fn for_price(balance: u64, cost: u64) -> Self {
        if balance >= cost {
            Offer::Affordable(cost)
        } else {
            Offer::TooExpensive(cost)
        }
    }

    pub fn cost(&self) -> Option<u64> {
        match self {
            Offer::Affordable(c) | Offer::TooExpensive(c) => Some(*c),
            Offer::Maxed => None,
        }
    }
}

/// Tap the mango at `now_ms`. Rejected without side effects while cooling down.
pub fn tap(data: &mut GameData, now_ms: u64) -> TapOutcome {
    if data.cooldown_remaining_ms(now_ms) > 0 {
        return TapOutcome::REJECTED;
    }
    let damage = data.tap_damage();
    data.clicks = data.clicks.saturating_add(damage);
    data.last_click_time = now_ms;
    TapOutcome {
        damage,
        accepted: true,
    }
}

pub fn cooldown_offer(data: &GameData) -> Offer {
    if data.cooldown_level >= MAX_COOLDOWN_LEVEL {
        return Offer::Maxed;
    }
    Offer::for_price(data.clicks, formulas::cooldown_upgrade_cost(data.cooldown_level))
}

pub fn damage_offer(data: &GameData) -> Offer {
    if data.mango_click_level >= MAX_DAMAGE_LEVEL {
        return Offer::Maxed;
    }
    Offer::for_price(
        data.clicks,
        formulas::damage_upgrade_cost(data.mango_click_level + 1),
    )
}

/// [`Offer::Maxed`] only at [`MAX_REBIRTH_COUNT`], far past any reachable price.
pub fn rebirth_offer(data: &GameData) -> Offer {
    if data.rebirth_count >= MAX_REBIRTH_COUNT {
        return Offer::Maxed;
    }
    Offer::for_price(data.clicks, formulas::rebirth_cost(data.rebirth_count))
}

/// Buy one cooldown level. Returns true if successful.
pub fn buy_cooldown_upgrade(data: &mut GameData) -> bool {
    let Offer::Affordable(cost) = cooldown_offer(data) else {
        return false;
    };
    data.clicks -= cost;
    data.cooldown_level += 1;
    data.click_cooldown = formulas::cooldown(data.cooldown_level);
    true
}

/// Buy one tap-damage level. Returns true if successful.
pub fn buy_damage_upgrade(data: &mut GameData) -> bool {
    let Offer::Affordable(cost) = damage_offer(data) else {
        return false;
    };
    data.clicks -= cost;
    data.mango_click_level += 1;
    true
}

/// Trade the current run for a permanent damage bonus. Returns true if successful.
///
/// Clicks, both upgrade levels and the cooldown reset to their first-run
/// values; the rebirth count, bonus and last tap time survive.
pub fn rebirth(data: &mut GameData) -> bool {
    let Offer::Affordable(cost) = rebirth_offer(data) else {
        return false;
    };
    let fresh = GameData::new();
    data.clicks -= cost;
    data.rebirth_count = data.rebirth_count.saturating_add(1);
    data.rebirth_bonus = formulas::rebirth_bonus(data.rebirth_count);
    data.clicks = fresh.clicks;
    data.cooldown_level = fresh.cooldown_level;
    data.click_cooldown = fresh.click_cooldown;
    data.mango_click_level = fresh.mango_click_level;
    true
}

/// Advance UI timers by `delta_ticks` (10 ticks/sec).
pub fn tick(state: &mut MangoState, delta_ticks: u32) {
    if delta_ticks == 0 {
        return;
    }
    state.anim_frame = state.anim_frame.wrapping_add(delta_ticks);
    state.tap_flash = state.tap_flash.saturating_sub(delta_ticks);
    state.purchase_flash = state.purchase_flash.saturating_sub(delta_ticks);

    for p in &mut state.particles {
        p.life = p.life.saturating_sub(delta_ticks);
    }
    state.particles.retain(|p| p.life > 0);

    if let Some(notice) = &mut state.notice {
        notice.ticks_left = notice.ticks_left.saturating_sub(delta_ticks);
        if notice.ticks_left == 0 {
            state.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mango::state::Particle;

    fn rich(clicks: u64) -> GameData {
        GameData {
            clicks,
            ..GameData::new()
        }
    }

    // ── tap ───────────────────────────────────────────────

    #[test]
    fn first_tap_accepted() {
        let mut d = GameData::new();
        let out = tap(&mut d, 10_000);
        assert!(out.accepted);
        assert_eq!(out.damage, 1);
        assert_eq!(d.clicks, 1);
        assert_eq!(d.last_click_time, 10_000);
    }

    #[test]
    fn tap_within_cooldown_rejected() {
        let mut d = GameData::new();
        tap(&mut d, 10_000);
        let before = d.clone();
        let out = tap(&mut d, 10_499);
        assert_eq!(out, TapOutcome { damage: 0, accepted: false });
        assert_eq!(d, before);
    }

    #[test]
    fn tap_after_cooldown_accepted() {
        let mut d = GameData::new();
        tap(&mut d, 10_000);
        assert!(tap(&mut d, 10_500).accepted);
        assert_eq!(d.clicks, 2);
    }

    #[test]
    fn tap_uses_upgraded_cooldown() {
        let mut d = GameData {
            cooldown_level: 5,
            click_cooldown: formulas::cooldown(5),
            ..GameData::new()
        };
        tap(&mut d, 10_000);
        assert!(!tap(&mut d, 10_349).accepted);
        assert!(tap(&mut d, 10_350).accepted);
    }

    #[test]
    fn tap_applies_rebirth_bonus() {
        let mut d = GameData {
            mango_click_level: 3,
            rebirth_count: 1,
            rebirth_bonus: formulas::rebirth_bonus(1),
            ..GameData::new()
        };
        // 3 × 1.2 = 3.6 → 4
        assert_eq!(tap(&mut d, 5_000).damage, 4);
        assert_eq!(d.clicks, 4);
    }

    #[test]
    fn tap_saturates_balance() {
        let mut d = rich(u64::MAX - 1);
        d.mango_click_level = 10;
        assert!(tap(&mut d, 5_000).accepted);
        assert_eq!(d.clicks, u64::MAX);
    }

    #[test]
    fn tap_with_clock_behind_last_tap_rejected() {
        let mut d = GameData {
            last_click_time: 50_000,
            ..GameData::new()
        };
        assert!(!tap(&mut d, 40_000).accepted);
        assert_eq!(d.last_click_time, 50_000);
    }

    // ── cooldown upgrade ──────────────────────────────────

    #[test]
    fn buy_cooldown_success() {
        let mut d = rich(200);
        assert!(buy_cooldown_upgrade(&mut d));
        assert_eq!(d.clicks, 70);
        assert_eq!(d.cooldown_level, 1);
        assert!((d.click_cooldown - 0.47).abs() < 1e-9);
    }

    #[test]
    fn buy_cooldown_insufficient_funds() {
        let mut d = rich(129);
        let before = d.clone();
        assert!(!buy_cooldown_upgrade(&mut d));
        assert_eq!(d, before);
    }

    #[test]
    fn buy_cooldown_capped_at_16() {
        let mut d = GameData {
            clicks: u64::MAX,
            cooldown_level: MAX_COOLDOWN_LEVEL,
            click_cooldown: formulas::cooldown(MAX_COOLDOWN_LEVEL),
            ..GameData::new()
        };
        let before = d.clone();
        assert!(!buy_cooldown_upgrade(&mut d));
        assert_eq!(d, before);
        assert_eq!(cooldown_offer(&d), Offer::Maxed);
    }

    #[test]
    fn cooldown_reaches_cap_from_zero() {
        let mut d = rich(u64::MAX / 2);
        let mut bought = 0;
        while buy_cooldown_upgrade(&mut d) {
            bought += 1;
        }
        assert_eq!(bought, MAX_COOLDOWN_LEVEL);
        assert!((d.click_cooldown - 0.2).abs() < 1e-9);
    }

    // ── damage upgrade ────────────────────────────────────

    #[test]
    fn buy_damage_success() {
        let mut d = rich(100);
        assert!(buy_damage_upgrade(&mut d));
        assert_eq!(d.clicks, 10); // level 2 costs 90
        assert_eq!(d.mango_click_level, 2);
    }

    #[test]
    fn buy_damage_insufficient_funds() {
        let mut d = rich(89);
        let before = d.clone();
        assert!(!buy_damage_upgrade(&mut d));
        assert_eq!(d, before);
        assert_eq!(damage_offer(&d), Offer::TooExpensive(90));
    }

    #[test]
    fn buy_damage_capped_at_100() {
        let mut d = GameData {
            clicks: u64::MAX,
            mango_click_level: MAX_DAMAGE_LEVEL,
            ..GameData::new()
        };
        let before = d.clone();
        assert!(!buy_damage_upgrade(&mut d));
        assert_eq!(d, before);
    }

    // ── rebirth ───────────────────────────────────────────

    #[test]
    fn rebirth_with_exact_cost() {
        let mut d = GameData {
            clicks: formulas::rebirth_cost(0),
            cooldown_level: 4,
            click_cooldown: formulas::cooldown(4),
            mango_click_level: 12,
            last_click_time: 777,
            ..GameData::new()
        };
        assert!(rebirth(&mut d));
        assert_eq!(d.clicks, 0);
        assert_eq!(d.cooldown_level, 0);
        assert_eq!(d.mango_click_level, 1);
        assert!((d.click_cooldown - 0.5).abs() < 1e-9);
        assert_eq!(d.rebirth_count, 1);
        assert!((d.rebirth_bonus - formulas::rebirth_bonus(1)).abs() < 1e-9);
        assert_eq!(d.last_click_time, 777);

        // Balance is now 0, far below the next price.
        assert!(!rebirth(&mut d));
        assert_eq!(d.rebirth_count, 1);
    }

    #[test]
    fn rebirth_discards_surplus() {
        let mut d = rich(formulas::rebirth_cost(0) + 1234);
        assert!(rebirth(&mut d));
        assert_eq!(d.clicks, 0);
    }

    #[test]
    fn rebirth_insufficient_funds() {
        let mut d = rich(formulas::rebirth_cost(0) - 1);
        let before = d.clone();
        assert!(!rebirth(&mut d));
        assert_eq!(d, before);
    }

    #[test]
    fn second_rebirth_costs_more() {
        let mut d = GameData {
            clicks: formulas::rebirth_cost(1),
            rebirth_count: 1,
            rebirth_bonus: formulas::rebirth_bonus(1),
            ..GameData::new()
        };
        assert_eq!(rebirth_offer(&d), Offer::Affordable(650_000));
        assert!(rebirth(&mut d));
        assert_eq!(d.rebirth_count, 2);
        assert!((d.rebirth_bonus - 0.4).abs() < 1e-9);
    }

    #[test]
    fn rebirth_count_stops_at_ceiling() {
        let mut d = GameData {
            clicks: u64::MAX,
            rebirth_count: MAX_REBIRTH_COUNT - 1,
            ..GameData::new()
        };
        assert!(rebirth(&mut d));
        assert_eq!(d.rebirth_count, MAX_REBIRTH_COUNT);

        d.clicks = u64::MAX;
        assert_eq!(rebirth_offer(&d), Offer::Maxed);
        let before = d.clone();
        assert!(!rebirth(&mut d));
        assert_eq!(d, before);
    }

    // ── offers ────────────────────────────────────────────

    #[test]
    fn offer_cost() {
        assert_eq!(Offer::Affordable(5).cost(), Some(5));
        assert_eq!(Offer::TooExpensive(9).cost(), Some(9));
        assert_eq!(Offer::Maxed.cost(), None);
    }

    // ── tick ──────────────────────────────────────────────

    #[test]
    fn tick_zero_is_noop() {
        let mut s = MangoState::new(GameData::new());
        s.tap_flash = 3;
        tick(&mut s, 0);
        assert_eq!(s.tap_flash, 3);
    }

    #[test]
    fn tick_expires_notice_and_particles() {
        let mut s = MangoState::new(GameData::new());
        s.notify("hello", false, 5);
        s.particles.push(Particle {
            text: "+1".into(),
            col_offset: 0,
            life: 3,
            max_life: 3,
        });
        tick(&mut s, 3);
        assert!(s.particles.is_empty());
        assert_eq!(s.notice.as_ref().unwrap().ticks_left, 2);
        tick(&mut s, 2);
        assert!(s.notice.is_none());
    }
}
