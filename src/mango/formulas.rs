//! Progression curves: pure functions of levels and counts.
//!
//! Every price and multiplier in the game comes from here. The functions are
//! deterministic and never fail for inputs inside the level caps.

/// Highest tap-damage level.
pub const MAX_DAMAGE_LEVEL: u32 = 100;
/// Highest cooldown level.
pub const MAX_COOLDOWN_LEVEL: u32 = 16;
/// Rebirth count ceiling. Prices saturate at `u64::MAX` long before it.
pub const MAX_REBIRTH_COUNT: u32 = i32::MAX as u32;

/// Tap cooldown at level 0, in seconds.
pub const BASE_COOLDOWN: f64 = 0.5;
/// Cooldown floor, in seconds.
pub const MIN_COOLDOWN: f64 = 0.2;
/// Seconds removed per cooldown level.
const COOLDOWN_STEP: f64 = 0.03;

const DAMAGE_BASE_COST: f64 = 60.0;
const COOLDOWN_BASE_COST: f64 = 130.0;
const UPGRADE_COST_GROWTH: f64 = 1.5;

const REBIRTH_BASE_COST: f64 = 500_000.0;
const REBIRTH_COST_GROWTH: f64 = 1.3;
/// Damage bonus granted by each rebirth, as a fraction (+20%).
const REBIRTH_BONUS_STEP: f64 = 0.2;

/// Fractional part at or below which damage is truncated instead of rounded up.
const DAMAGE_ROUND_THRESHOLD: f64 = 0.4;

/// Mangoes per tap before rebirth bonus.
pub fn damage_per_click(level: u32) -> u64 {
    level as u64
}

/// Price of reaching `level` from `level - 1`: `60 × 1.5^(level-1)`.
pub fn damage_upgrade_cost(level: u32) -> u64 {
    let exp = level.saturating_sub(1) as i32;
    (DAMAGE_BASE_COST * UPGRADE_COST_GROWTH.powi(exp)) as u64
}

/// Tap cooldown in seconds for a cooldown level, floored at 0.2s.
pub fn cooldown(level: u32) -> f64 {
    (BASE_COOLDOWN - level as f64 * COOLDOWN_STEP).max(MIN_COOLDOWN)
}

/// Price of going from cooldown `level` to `level + 1`: `130 × 1.5^level`.
pub fn cooldown_upgrade_cost(level: u32) -> u64 {
    (COOLDOWN_BASE_COST * UPGRADE_COST_GROWTH.powi(level as i32)) as u64
}

/// Price of the next rebirth after `rebirth_count` completed ones.
pub fn rebirth_cost(rebirth_count: u32) -> u64 {
    let exp = rebirth_count.min(MAX_REBIRTH_COUNT) as i32;
    (REBIRTH_BASE_COST * REBIRTH_COST_GROWTH.powi(exp)).round() as u64
}

/// Cumulative damage bonus after `rebirth_count` rebirths (0.2 = +20%).
pub fn rebirth_bonus(rebirth_count: u32) -> f64 {
    rebirth_count as f64 * REBIRTH_BONUS_STEP
}

/// Tap damage including the rebirth multiplier.
pub fn damage_with_rebirth_bonus(level: u32, rebirth_bonus: f64) -> u64 {
    round_damage(damage_per_click(level) as f64 * (1.0 + rebirth_bonus))
}

/// Biased rounding: a fractional part ≤ 0.4 truncates, anything above rounds up.
pub fn round_damage(damage: f64) -> u64 {
    let whole = damage.trunc();
    if damage - whole <= DAMAGE_ROUND_THRESHOLD {
        whole as u64
    } else {
        damage.ceil() as u64
    }
}
