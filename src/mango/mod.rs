//! Mango Clicker: tap a mango, buy faster and juicier taps, rebirth for a
//! permanent bonus.
//!
//! [`MangoGame`] owns the progress, the local store and the session. Input
//! handlers mutate it synchronously; anything that needs the network is
//! returned as an [`Effect`] for the host to run, and the host reports the
//! result back through the `on_*` methods.
//!
//! Every change is saved locally at once. The remote copy gets one write per
//! day, sent when the page is hidden so it carries the newest snapshot, and
//! never before the remote record for the signed-in user has been read.

pub mod actions;
pub mod format;
pub mod formulas;
pub mod logic;
pub mod render;
pub mod save;
pub mod session;
pub mod state;
pub mod sync;

use chrono::NaiveDate;

use crate::config::NOTICE_TICKS;
use crate::error::{SyncError, UpdateError};
use crate::i18n::{fill, t, Lang, Text};
use crate::input::InputEvent;
use crate::update::{UpdateCheck, UpdateInfo};

use format::format_number;
use logic::Offer;
use save::KeyValueStore;
use session::{Session, UserAuth};
use state::{CloudStatus, GameData, MangoState, Overlay, Particle, Tab};
use sync::{RemotePushGate, RemoteSave, Resolved, SnapshotSource};

pub const KEY_ESC: char = '\u{1b}';
pub const KEY_TAB: char = '\t';

const PARTICLE_LIFE: u32 = 8;
const MAX_PARTICLES: usize = 12;
const TAP_FLASH_TICKS: u32 = 2;
const PURCHASE_FLASH_TICKS: u32 = 4;

/// Work for the host that cannot finish synchronously.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Run `save_remote` and report back with [`MangoGame::on_remote_saved`].
    PushRemote {
        user: UserAuth,
        data: GameData,
        today: NaiveDate,
    },
    /// Run the auth provider and report back with [`MangoGame::on_signed_in`].
    SignIn,
    /// Clear the auth provider's credentials.
    SignOut,
    /// Fetch the package and report back with [`MangoGame::on_update_started`].
    DownloadUpdate(UpdateInfo),
}

pub struct MangoGame {
    pub state: MangoState,
    pub session: Session,
    pub lang: Lang,
    store: Box<dyn KeyValueStore>,
    push_gate: RemotePushGate,
    cloud_enabled: bool,
    /// An update found while another overlay was open.
    pending_update: Option<UpdateInfo>,
    /// The signed-in user's remote record has not been read yet.
    remote_pending: bool,
    /// Local progress changed since the last remote push.
    unsynced: bool,
}

impl MangoGame {
    /// Start from the locally saved snapshot. With cloud saves enabled and
    /// nobody signed in, the sign-in prompt opens first.
    pub fn new(mut store: Box<dyn KeyValueStore>, session: Session, lang: Lang, cloud_enabled: bool) -> Self {
        let data = save::load_local(store.as_mut());
        let mut state = MangoState::new(data);
        let remote_pending = cloud_enabled && session.user().is_some();
        if cloud_enabled {
            if session.user().is_some() {
                state.cloud = CloudStatus::Syncing;
            } else if session.needs_sign_in_prompt() {
                state.overlay = Some(Overlay::SignInPrompt);
            }
        }
        Self {
            state,
            session,
            lang,
            store,
            push_gate: RemotePushGate::default(),
            cloud_enabled,
            pending_update: None,
            remote_pending,
            unsynced: false,
        }
    }

    pub fn cloud_enabled(&self) -> bool {
        self.cloud_enabled
    }

    fn text(&self, key: Text) -> &'static str {
        t(self.lang, key)
    }

    fn notify(&mut self, key: Text, is_error: bool) {
        let text = self.text(key);
        self.state.notify(text, is_error, NOTICE_TICKS);
    }

    pub fn handle_input(&mut self, event: &InputEvent, now_ms: u64) -> Option<Effect> {
        match self.state.overlay.clone() {
            Some(Overlay::RebirthConfirm) => match event {
                InputEvent::Key('y') | InputEvent::Click(actions::CONFIRM_YES) => {
                    self.close_overlay();
                    self.confirm_rebirth();
                    None
                }
                InputEvent::Key('n' | KEY_ESC) | InputEvent::Click(actions::CONFIRM_NO) => {
                    self.close_overlay();
                    None
                }
                _ => None,
            },
            Some(Overlay::SignInPrompt) => match event {
                InputEvent::Key('s') | InputEvent::Click(actions::SIGN_IN) => {
                    self.close_overlay();
                    self.state.cloud = CloudStatus::Syncing;
                    Some(Effect::SignIn)
                }
                InputEvent::Key('k' | KEY_ESC) | InputEvent::Click(actions::SKIP_SIGN_IN) => {
                    self.session.skip_sign_in();
                    self.close_overlay();
                    None
                }
                _ => None,
            },
            Some(Overlay::UpdateAvailable(info)) => match event {
                InputEvent::Key('d') | InputEvent::Click(actions::UPDATE_DOWNLOAD) => {
                    self.close_overlay();
                    Some(Effect::DownloadUpdate(info))
                }
                InputEvent::Key('l' | KEY_ESC) | InputEvent::Click(actions::UPDATE_LATER) => {
                    self.close_overlay();
                    None
                }
                _ => None,
            },
            None => self.handle_main_input(event, now_ms),
        }
    }

    fn handle_main_input(&mut self, event: &InputEvent, now_ms: u64) -> Option<Effect> {
        match event {
            InputEvent::Key(' ' | 'c') | InputEvent::Click(actions::TAP_MANGO) => {
                self.tap(now_ms);
                None
            }
            InputEvent::Key(KEY_TAB) => {
                self.state.tab = match self.state.tab {
                    Tab::Clicker => Tab::Shop,
                    Tab::Shop => Tab::Clicker,
                };
                None
            }
            InputEvent::Click(actions::TAB_CLICKER) => {
                self.state.tab = Tab::Clicker;
                None
            }
            InputEvent::Click(actions::TAB_SHOP) => {
                self.state.tab = Tab::Shop;
                None
            }
            InputEvent::Key('1') | InputEvent::Click(actions::BUY_COOLDOWN) => {
                let offer = logic::cooldown_offer(&self.state.data);
                let bought = logic::buy_cooldown_upgrade(&mut self.state.data);
                self.after_purchase(bought, offer);
                None
            }
            InputEvent::Key('2') | InputEvent::Click(actions::BUY_DAMAGE) => {
                let offer = logic::damage_offer(&self.state.data);
                let bought = logic::buy_damage_upgrade(&mut self.state.data);
                self.after_purchase(bought, offer);
                None
            }
            InputEvent::Key('r') | InputEvent::Click(actions::REBIRTH) => {
                match logic::rebirth_offer(&self.state.data) {
                    Offer::Affordable(_) => self.state.overlay = Some(Overlay::RebirthConfirm),
                    _ => self.notify(Text::NotEnoughForRebirth, true),
                }
                None
            }
            InputEvent::Key('s') | InputEvent::Click(actions::SIGN_IN)
                if self.cloud_enabled && self.session.user().is_none() =>
            {
                self.state.cloud = CloudStatus::Syncing;
                Some(Effect::SignIn)
            }
            InputEvent::Key('o') | InputEvent::Click(actions::SIGN_OUT) if self.session.user().is_some() => {
                self.sign_out()
            }
            _ => None,
        }
    }

    fn tap(&mut self, now_ms: u64) {
        let outcome = logic::tap(&mut self.state.data, now_ms);
        if !outcome.accepted {
            return;
        }
        self.state.tap_flash = TAP_FLASH_TICKS;
        let col_offset = (self.state.next_random() % 13) as i16 - 6;
        if self.state.particles.len() >= MAX_PARTICLES {
            self.state.particles.remove(0);
        }
        self.state.particles.push(Particle {
            text: format!("+{}", format_number(outcome.damage)),
            col_offset,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        });
        self.commit();
    }

    fn after_purchase(&mut self, bought: bool, offer: Offer) {
        if bought {
            self.state.purchase_flash = PURCHASE_FLASH_TICKS;
            self.notify(Text::UpgradeBought, false);
            self.commit();
            return;
        }
        match offer {
            Offer::Maxed => self.notify(Text::MaxLevel, true),
            Offer::TooExpensive(cost) | Offer::Affordable(cost) => {
                let text = fill(self.text(Text::NotEnoughMangoes), &[("cost", format_number(cost).as_str())]);
                self.state.notify(text, true, NOTICE_TICKS);
            }
        }
    }

    fn confirm_rebirth(&mut self) {
        if !logic::rebirth(&mut self.state.data) {
            self.notify(Text::NotEnoughForRebirth, true);
            return;
        }
        self.state.purchase_flash = PURCHASE_FLASH_TICKS;
        self.state.particles.clear();
        self.notify(Text::RebirthSuccessful, false);
        self.commit();
    }

    fn close_overlay(&mut self) {
        self.state.overlay = self.pending_update.take().map(Overlay::UpdateAvailable);
    }

    fn sign_out(&mut self) -> Option<Effect> {
        self.session.sign_out(self.store.as_mut());
        self.push_gate.reset();
        self.remote_pending = false;
        self.state.cloud = CloudStatus::Offline;
        self.notify(Text::SignedOut, false);
        Some(Effect::SignOut)
    }

    /// Persist locally and mark the snapshot for the next remote push.
    fn commit(&mut self) {
        if let Err(e) = save::save_local(self.store.as_mut(), &self.state.data) {
            log::warn!("Mango Clicker: local save failed: {e}");
            self.notify(Text::SaveFailed, true);
        }
        self.unsynced = true;
    }

    /// The page went to the background. Push the current snapshot if it
    /// changed, the user's record has been read and today's write is free.
    pub fn on_page_hidden(&mut self, today: Option<NaiveDate>) -> Option<Effect> {
        if !self.cloud_enabled || self.remote_pending || !self.unsynced {
            return None;
        }
        let user = self.session.user()?.clone();
        let today = today?;
        if !self.push_gate.try_begin(today) {
            return None;
        }
        self.unsynced = false;
        self.state.cloud = CloudStatus::Syncing;
        Some(Effect::PushRemote {
            user,
            data: self.state.data.clone(),
            today,
        })
    }

    /// Adopt the snapshot chosen at session start (or after signing in).
    ///
    /// After a failed read the remote record stays unknown, so no push is
    /// sent for the rest of the session.
    pub fn apply_resolved(&mut self, resolved: Resolved) {
        if let Some(e) = &resolved.failure {
            let text = fill(self.text(Text::LoadFailed), &[("error", e.to_string().as_str())]);
            self.state.notify(text, true, NOTICE_TICKS);
            self.state.cloud = CloudStatus::Failed;
            return;
        }
        self.remote_pending = false;
        // A user without a remote record gets the local progress uploaded.
        self.unsynced = resolved.source == SnapshotSource::Local;
        if resolved.source == SnapshotSource::Remote {
            self.state.data = resolved.data;
            if let Err(e) = save::save_local(self.store.as_mut(), &self.state.data) {
                log::warn!("Mango Clicker: local save failed: {e}");
            }
            self.notify(Text::DataLoaded, false);
        }
        self.state.cloud = if self.session.user().is_some() {
            CloudStatus::Synced
        } else {
            CloudStatus::Offline
        };
    }

    pub fn on_remote_saved(&mut self, today: NaiveDate, result: Result<RemoteSave, SyncError>) {
        self.push_gate.finish(today, &result);
        if self.session.user().is_none() {
            return;
        }
        self.state.cloud = match result {
            Ok(_) => CloudStatus::Synced,
            Err(e) => {
                log::warn!("Mango Clicker: remote save failed: {e}");
                self.unsynced = true;
                CloudStatus::Failed
            }
        };
    }

    /// Returns the user to load remote progress for, if sign-in worked.
    pub fn on_signed_in(&mut self, result: Result<UserAuth, SyncError>) -> Option<UserAuth> {
        match result {
            Ok(user) => {
                self.session.signed_in(self.store.as_mut(), user.clone());
                self.push_gate.reset();
                self.remote_pending = true;
                self.state.cloud = CloudStatus::Syncing;
                self.notify(Text::SignedIn, false);
                Some(user)
            }
            Err(e) => {
                log::warn!("Mango Clicker: sign-in failed: {e}");
                self.state.cloud = CloudStatus::Offline;
                self.notify(Text::SignInFailed, true);
                None
            }
        }
    }

    pub fn on_update_checked(&mut self, result: Result<UpdateCheck, UpdateError>) {
        match result {
            Ok(UpdateCheck::Available(info)) => {
                if self.state.overlay.is_none() {
                    self.state.overlay = Some(Overlay::UpdateAvailable(info));
                } else {
                    self.pending_update = Some(info);
                }
            }
            Ok(UpdateCheck::UpToDate) => {}
            Err(e) => log::info!("Mango Clicker: update check failed: {e}"),
        }
    }

    pub fn on_update_started(&mut self, result: Result<(), UpdateError>) {
        match result {
            Ok(()) => self.notify(Text::UpdateOpened, false),
            Err(e) => {
                log::warn!("Mango Clicker: update download failed: {e}");
                self.notify(Text::UpdateFailed, true);
            }
        }
    }

    pub fn tick(&mut self, delta_ticks: u32) {
        logic::tick(&mut self.state, delta_ticks);
    }
}
