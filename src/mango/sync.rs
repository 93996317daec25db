//! Remote (per-user) persistence and the session-start conflict policy.
//!
//! Remote writes are throttled to one per calendar day per user: the record
//! is written only when the stored `lastSaveDate` marker differs from today,
//! and the marker is written after the record. A remote copy can therefore
//! lag the local one by up to a day of play.

use chrono::NaiveDate;

use crate::error::SyncError;
use crate::net;

use super::session::UserAuth;
use super::state::GameData;

#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// The user's record, `None` if they never saved.
    async fn fetch(&self, user: &UserAuth) -> Result<Option<GameData>, SyncError>;
    async fn store(&self, user: &UserAuth, data: &GameData) -> Result<(), SyncError>;
    async fn last_save_date(&self, user: &UserAuth) -> Result<Option<NaiveDate>, SyncError>;
    async fn set_last_save_date(&self, user: &UserAuth, date: NaiveDate) -> Result<(), SyncError>;
}

/// The user's normalized record, `None` if they never saved.
async fn remote_record<R: RemoteStore>(remote: &R, user: &UserAuth) -> Result<Option<GameData>, SyncError> {
    Ok(remote.fetch(user).await?.map(GameData::normalized))
}

/// Remote snapshot, or a fresh game when the user has no record.
#[allow(dead_code)]
pub async fn load_remote<R: RemoteStore>(remote: &R, user: &UserAuth) -> Result<GameData, SyncError> {
    Ok(remote_record(remote, user).await?.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RemoteSave {
    Saved,
    /// Already saved today; nothing written.
    SkippedToday,
}

pub async fn save_remote<R: RemoteStore>(
    remote: &R,
    user: &UserAuth,
    data: &GameData,
    today: NaiveDate,
) -> Result<RemoteSave, SyncError> {
    if remote.last_save_date(user).await? == Some(today) {
        log::debug!("Mango Clicker: remote save already done on {today}");
        return Ok(RemoteSave::SkippedToday);
    }
    remote.store(user, data).await?;
    remote.set_last_save_date(user, today).await?;
    log::info!("Mango Clicker: remote save for {} on {today}", user.user_id);
    Ok(RemoteSave::Saved)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapshotSource {
    Local,
    Remote,
}

/// Snapshot chosen at session start.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved {
    pub data: GameData,
    pub source: SnapshotSource,
    /// Set when the remote could not be read; `data` is then the local copy.
    pub failure: Option<SyncError>,
}

/// Pick the snapshot to play with.
///
/// A signed-in user's remote record wins over local progress. Local progress
/// is kept when nobody is signed in, when the user has no remote record yet,
/// and when the remote cannot be reached.
pub async fn resolve_session_start<R: RemoteStore>(
    local: GameData,
    remote: &R,
    user: Option<&UserAuth>,
) -> Resolved {
    let Some(user) = user else {
        return Resolved {
            data: local,
            source: SnapshotSource::Local,
            failure: None,
        };
    };

    match remote_record(remote, user).await {
        Ok(Some(data)) => Resolved {
            data,
            source: SnapshotSource::Remote,
            failure: None,
        },
        Ok(None) => Resolved {
            data: local,
            source: SnapshotSource::Local,
            failure: None,
        },
        Err(e) => {
            log::warn!("Mango Clicker: remote load failed, keeping local progress: {e}");
            Resolved {
                data: local,
                source: SnapshotSource::Local,
                failure: Some(e),
            }
        }
    }
}

/// Keeps at most one remote push in flight and skips pushes once a save
/// for the day has gone through.
#[derive(Debug, Default)]
pub struct RemotePushGate {
    saved_on: Option<NaiveDate>,
    in_flight: bool,
}

impl RemotePushGate {
    /// Claim the slot for a push on `today`. The caller must call
    /// [`finish`](Self::finish) when the push completes.
    pub fn try_begin(&mut self, today: NaiveDate) -> bool {
        if self.in_flight || self.saved_on == Some(today) {
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn finish(&mut self, today: NaiveDate, result: &Result<RemoteSave, SyncError>) {
        self.in_flight = false;
        if result.is_ok() {
            self.saved_on = Some(today);
        }
    }

    /// Forget the day marker, e.g. after the user changes.
    pub fn reset(&mut self) {
        self.saved_on = None;
    }
}

/// Realtime-Database style REST endpoint: `{base}/users/{uid}.json`.
pub struct RealtimeDbStore {
    base_url: String,
}

impl RealtimeDbStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn request(
        &self,
        method: &str,
        user: &UserAuth,
        child: &str,
        body: Option<&str>,
    ) -> Result<String, SyncError> {
        let url = record_url(&self.base_url, user, child);
        let response = net::fetch_text(method, &url, body)
            .await
            .map_err(SyncError::Network)?;
        match SyncError::from_status(response.status, &response.body) {
            Some(e) => Err(e),
            None => Ok(response.body),
        }
    }
}

/// URL of a user's record, or of one of its children when `child` is set.
pub fn record_url(base_url: &str, user: &UserAuth, child: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = if child.is_empty() {
        format!("users/{}", user.user_id)
    } else {
        format!("users/{}/{child}", user.user_id)
    };
    format!("{base}/{path}.json?auth={}", user.id_token)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, SyncError> {
    serde_json::from_str(body).map_err(|e| SyncError::Decode(e.to_string()))
}

impl RemoteStore for RealtimeDbStore {
    async fn fetch(&self, user: &UserAuth) -> Result<Option<GameData>, SyncError> {
        let body = self.request("GET", user, "", None).await?;
        decode(&body)
    }

    async fn store(&self, user: &UserAuth, data: &GameData) -> Result<(), SyncError> {
        let json = serde_json::to_string(data).map_err(|e| SyncError::Decode(e.to_string()))?;
        // PATCH keeps sibling children such as the date marker.
        self.request("PATCH", user, "", Some(&json)).await?;
        Ok(())
    }

    async fn last_save_date(&self, user: &UserAuth) -> Result<Option<NaiveDate>, SyncError> {
        let body = self.request("GET", user, "lastSaveDate", None).await?;
        decode(&body)
    }

    async fn set_last_save_date(&self, user: &UserAuth, date: NaiveDate) -> Result<(), SyncError> {
        let json = serde_json::to_string(&date).map_err(|e| SyncError::Decode(e.to_string()))?;
        self.request("PUT", user, "lastSaveDate", Some(&json)).await?;
        Ok(())
    }
}
