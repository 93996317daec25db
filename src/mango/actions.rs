//! Action ids for Mango Clicker click targets.
//!
//! Registered by the renderer and dispatched back via `InputEvent::Click`.

pub const TAP_MANGO: u16 = 0;
/// Covers a modal so taps do not fall through to what is underneath.
pub const BLOCKED: u16 = u16::MAX;

// ── Tabs ────────────────────────────────────────────────────────
pub const TAB_CLICKER: u16 = 10;
pub const TAB_SHOP: u16 = 11;

// ── Shop ────────────────────────────────────────────────────────
pub const BUY_COOLDOWN: u16 = 100;
pub const BUY_DAMAGE: u16 = 101;
pub const REBIRTH: u16 = 102;

// ── Rebirth confirmation ────────────────────────────────────────
pub const CONFIRM_YES: u16 = 200;
pub const CONFIRM_NO: u16 = 201;

// ── Account ─────────────────────────────────────────────────────
pub const SIGN_IN: u16 = 300;
pub const SKIP_SIGN_IN: u16 = 301;
pub const SIGN_OUT: u16 = 302;

// ── Update prompt ───────────────────────────────────────────────
pub const UPDATE_DOWNLOAD: u16 = 400;
pub const UPDATE_LATER: u16 = 401;
