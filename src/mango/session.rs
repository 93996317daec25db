//! Session context: who is signed in and whether to ask them to.
//!
//! A [`Session`] is created once at start-up and passed to whatever needs
//! the current user. The sign-in protocol itself belongs to an
//! [`AuthProvider`]; the session only keeps the resulting identity.

use serde::{Deserialize, Serialize};

use crate::config::{AUTH_KEY, SESSION_KEY};
use crate::error::SyncError;

use super::save::KeyValueStore;

/// Identity handed over by the auth provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuth {
    pub user_id: String,
    /// Token sent with remote requests.
    pub id_token: String,
}

/// Preferences that outlive a page load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionPrefs {
    pub first_run: bool,
    pub signed_in: bool,
}

impl Default for SessionPrefs {
    fn default() -> Self {
        Self {
            first_run: true,
            signed_in: false,
        }
    }
}

pub struct Session {
    user: Option<UserAuth>,
    prefs: SessionPrefs,
    /// Set when the player dismisses the prompt. Not persisted: the prompt
    /// comes back on the next launch.
    sign_in_skipped: bool,
    /// Whether this launch is the very first one on this device.
    first_launch: bool,
}

impl Session {
    /// Load prefs, record that the first run has happened, and adopt `user`.
    pub fn start(store: &mut dyn KeyValueStore, user: Option<UserAuth>) -> Self {
        let prefs: SessionPrefs = store
            .get(SESSION_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        let mut session = Self {
            first_launch: prefs.first_run,
            user,
            prefs,
            sign_in_skipped: false,
        };
        if session.prefs.first_run {
            log::info!("Mango Clicker: first launch");
            session.prefs.first_run = false;
        }
        if session.user.is_some() {
            session.prefs.signed_in = true;
        }
        session.persist(store);
        session
    }

    pub fn user(&self) -> Option<&UserAuth> {
        self.user.as_ref()
    }

    #[cfg(test)]
    pub fn prefs(&self) -> &SessionPrefs {
        &self.prefs
    }

    pub fn is_first_launch(&self) -> bool {
        self.first_launch
    }

    pub fn needs_sign_in_prompt(&self) -> bool {
        self.user.is_none() && !self.sign_in_skipped
    }

    pub fn signed_in(&mut self, store: &mut dyn KeyValueStore, user: UserAuth) {
        log::info!("Mango Clicker: signed in as {}", user.user_id);
        self.user = Some(user);
        self.prefs.signed_in = true;
        self.sign_in_skipped = false;
        self.persist(store);
    }

    pub fn skip_sign_in(&mut self) {
        self.sign_in_skipped = true;
    }

    pub fn sign_out(&mut self, store: &mut dyn KeyValueStore) {
        self.user = None;
        self.prefs.signed_in = false;
        self.sign_in_skipped = true;
        self.persist(store);
    }

    fn persist(&self, store: &mut dyn KeyValueStore) {
        let result = serde_json::to_string(&self.prefs)
            .map_err(Into::into)
            .and_then(|json| store.set(SESSION_KEY, &json));
        if let Err(e) = result {
            log::warn!("Mango Clicker: failed to save session prefs: {e}");
        }
    }
}

/// Sign-in collaborator. The game only consumes the [`UserAuth`] it yields.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    fn current_user(&self) -> Option<UserAuth>;
    async fn sign_in(&self) -> Result<UserAuth, SyncError>;
    fn sign_out(&self);
}

/// Credentials left in localStorage by the page that embeds the game.
///
/// The page runs the actual OAuth flow and writes `{"userId", "idToken"}`
/// under [`AUTH_KEY`]; signing out removes the entry.
pub struct HostAuth;

impl HostAuth {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl AuthProvider for HostAuth {
    fn current_user(&self) -> Option<UserAuth> {
        let json = Self::storage()?.get_item(AUTH_KEY).ok()??;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("Mango Clicker: ignoring malformed credentials: {e}");
                None
            }
        }
    }

    async fn sign_in(&self) -> Result<UserAuth, SyncError> {
        self.current_user()
            .ok_or_else(|| SyncError::Auth("no credentials provided by the host page".into()))
    }

    fn sign_out(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(AUTH_KEY);
        }
    }
}
