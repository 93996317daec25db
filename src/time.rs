//! Clocks.
//!
//! [`FrameClock`] turns the variable frame rate of `draw_web` into a steady
//! number of UI ticks. Wall-clock time for tap cooldowns and the calendar
//! date for the daily remote save come from the JS `Date`.

use chrono::NaiveDate;

/// Longest frame gap counted, so a backgrounded tab does not replay
/// seconds of animation at once.
const MAX_FRAME_MS: f64 = 500.0;

pub struct FrameClock {
    tick_ms: f64,
    carry: f64,
    last_frame: Option<f64>,
}

impl FrameClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            tick_ms: 1000.0 / ticks_per_sec.max(1) as f64,
            carry: 0.0,
            last_frame: None,
        }
    }

    /// Record a frame at `now_ms` and return how many ticks elapsed.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let elapsed = self
            .last_frame
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_MS));
        self.last_frame = Some(now_ms);

        self.carry += elapsed;
        let ticks = (self.carry / self.tick_ms).floor();
        self.carry -= ticks * self.tick_ms;
        ticks as u32
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Today's date in the player's local time zone.
pub fn today() -> Option<NaiveDate> {
    let d = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(d.get_full_year() as i32, d.get_month() + 1, d.get_date())
}
