//! Build-time configuration.
//!
//! Values come from constants or `option_env!` so the wasm bundle needs no
//! runtime config file.

/// localStorage key of the versioned game snapshot.
pub const SAVE_KEY: &str = "mango_clicker_save";
/// localStorage key of the session preferences.
pub const SESSION_KEY: &str = "mango_clicker_session";
/// localStorage key where the embedding page leaves sign-in credentials.
pub const AUTH_KEY: &str = "mango_clicker_auth";

/// Base URL of the remote per-user records, e.g.
/// `https://mango-clicker-default-rtdb.firebaseio.com`. Cloud sync is off when unset.
pub const REMOTE_BASE_URL: Option<&str> = option_env!("MANGO_REMOTE_URL");

/// GitHub releases feed checked at start-up.
pub const RELEASES_URL: &str = "https://api.github.com/repos/Rifleks/MangoClicker/releases";

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build number compared against release asset codes.
pub fn app_version_code() -> u64 {
    option_env!("MANGO_VERSION_CODE")
        .and_then(|c| c.parse().ok())
        .unwrap_or(1)
}

/// UI ticks per second.
pub const TICKS_PER_SEC: u32 = 10;
/// How long a notice stays visible (3 seconds).
pub const NOTICE_TICKS: u32 = 30;
