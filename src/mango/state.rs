//! Mango Clicker state definitions.

use serde::{Deserialize, Serialize};

use crate::update::UpdateInfo;

use super::formulas::{self, MAX_COOLDOWN_LEVEL, MAX_DAMAGE_LEVEL, MAX_REBIRTH_COUNT};

/// Persisted progress snapshot. Field names match the remote record keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameData {
    /// Mango balance.
    pub clicks: u64,
    /// Seconds between accepted taps. Always `cooldown(cooldown_level)`.
    pub click_cooldown: f64,
    /// Tap-damage level, 1..=100.
    pub mango_click_level: u32,
    /// Cooldown upgrade level, 0..=16.
    pub cooldown_level: u32,
    pub rebirth_count: u32,
    /// Always `rebirth_bonus(rebirth_count)`.
    pub rebirth_bonus: f64,
    /// Timestamp (ms) of the last accepted tap.
    pub last_click_time: u64,
}

impl Default for GameData {
    fn default() -> Self {
        Self {
            clicks: 0,
            click_cooldown: formulas::BASE_COOLDOWN,
            mango_click_level: 1,
            cooldown_level: 0,
            rebirth_count: 0,
            rebirth_bonus: 0.0,
            last_click_time: 0,
        }
    }
}

impl GameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp levels into range and recompute the derived fields.
    ///
    /// Snapshots from storage may come from older builds with different
    /// constants; the levels are authoritative, the derived values are not.
    pub fn normalized(mut self) -> Self {
        self.mango_click_level = self.mango_click_level.clamp(1, MAX_DAMAGE_LEVEL);
        self.cooldown_level = self.cooldown_level.min(MAX_COOLDOWN_LEVEL);
        self.rebirth_count = self.rebirth_count.min(MAX_REBIRTH_COUNT);
        self.click_cooldown = formulas::cooldown(self.cooldown_level);
        self.rebirth_bonus = formulas::rebirth_bonus(self.rebirth_count);
        self
    }

    /// Mangoes the next accepted tap awards.
    pub fn tap_damage(&self) -> u64 {
        formulas::damage_with_rebirth_bonus(self.mango_click_level, self.rebirth_bonus)
    }

    /// Cooldown in whole milliseconds.
    pub fn cooldown_ms(&self) -> u64 {
        (self.click_cooldown * 1000.0).round() as u64
    }

    /// Milliseconds until the next tap is accepted (0 when ready).
    pub fn cooldown_remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.last_click_time);
        self.cooldown_ms().saturating_sub(elapsed)
    }
}

/// Which panel is shown below the counter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tab {
    Clicker,
    Shop,
}

/// Modal overlays drawn above the active tab.
#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    RebirthConfirm,
    SignInPrompt,
    UpdateAvailable(UpdateInfo),
}

/// A transient message line under the active tab.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub ticks_left: u32,
}

/// A floating "+N" rising from the mango after a tap.
#[derive(Clone, Debug)]
pub struct Particle {
    pub text: String,
    /// Column offset from the mango's centre.
    pub col_offset: i16,
    pub life: u32,
    pub max_life: u32,
}

/// Cloud status shown in the header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CloudStatus {
    /// No account; progress is local only.
    Offline,
    /// A remote load or save is running.
    Syncing,
    /// Signed in and the last remote call succeeded.
    Synced,
    /// Signed in but the last remote call failed.
    Failed,
}

/// Full state of a session: progress plus everything the UI needs.
pub struct MangoState {
    pub data: GameData,
    pub tab: Tab,
    pub overlay: Option<Overlay>,
    pub notice: Option<Notice>,
    pub cloud: CloudStatus,
    /// Ticks of "pressed" art after an accepted tap.
    pub tap_flash: u32,
    /// Ticks of border highlight after a purchase.
    pub purchase_flash: u32,
    pub particles: Vec<Particle>,
    pub anim_frame: u32,
    /// Xorshift state for particle placement.
    pub rng_state: u32,
}

impl MangoState {
    pub fn new(data: GameData) -> Self {
        Self {
            data,
            tab: Tab::Clicker,
            overlay: None,
            notice: None,
            cloud: CloudStatus::Offline,
            tap_flash: 0,
            purchase_flash: 0,
            particles: Vec::new(),
            anim_frame: 0,
            rng_state: 0x9E37_79B9,
        }
    }

    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Replace the current notice.
    pub fn notify(&mut self, text: impl Into<String>, is_error: bool, ticks: u32) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
            ticks_left: ticks,
        });
    }
}
