//! Release feed check.
//!
//! Builds are published as GitHub release assets named
//! `MangoClicker_<major.minor>_<code>.apk`. The check reads the newest
//! release, parses the asset name and compares it with the running build.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::config;
use crate::error::UpdateError;
use crate::net;

/// A build identity: dotted version name plus monotonically growing code.
#[derive(Clone, Debug, PartialEq)]
pub struct VersionInfo {
    pub name: String,
    pub code: u64,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            name: config::APP_VERSION.to_string(),
            code: config::app_version_code(),
        }
    }
}

/// A newer build the player can fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateInfo {
    pub version: VersionInfo,
    /// Package size in bytes, 0 when the feed does not say.
    pub size: u64,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateCheck {
    UpToDate,
    Available(UpdateInfo),
}

#[derive(Deserialize)]
struct Release {
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
    #[serde(default)]
    size: u64,
}

/// Parse `MangoClicker_1.4_6.apk` into `("1.4", 6)`.
pub fn parse_asset_name(name: &str) -> Option<VersionInfo> {
    let rest = name.strip_prefix("MangoClicker_")?.strip_suffix(".apk")?;
    let (version, code) = rest.split_once('_')?;

    let (major, minor) = version.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(major) || !all_digits(minor) || !all_digits(code) {
        return None;
    }

    Some(VersionInfo {
        name: version.to_string(),
        code: code.parse().ok()?,
    })
}

/// Numeric dotted comparison; missing or non-numeric parts count as 0.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let parts = |s: &str| -> Vec<u64> { s.split('.').map(|p| p.parse().unwrap_or(0)).collect() };
    let (pa, pb) = (parts(a), parts(b));
    let len = pa.len().max(pb.len());
    (0..len)
        .map(|i| {
            let x = pa.get(i).copied().unwrap_or(0);
            let y = pb.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// When the version names differ the names decide, otherwise the codes do.
pub fn is_update_required(current: &VersionInfo, remote: &VersionInfo) -> bool {
    if current.name != remote.name {
        compare_versions(&current.name, &remote.name) == Ordering::Less
    } else {
        remote.code > current.code
    }
}

/// Pick the first `.apk` asset of the newest release in a releases feed.
///
/// `Ok(None)` when the feed is empty or has no package; an asset whose name
/// does not follow the naming scheme reports version `0.0` code 0.
pub fn select_release_asset(feed_json: &str) -> Result<Option<UpdateInfo>, UpdateError> {
    let releases: Vec<Release> =
        serde_json::from_str(feed_json).map_err(|e| UpdateError::Feed(e.to_string()))?;
    let Some(latest) = releases.into_iter().next() else {
        return Ok(None);
    };
    let Some(asset) = latest.assets.into_iter().find(|a| a.name.ends_with(".apk")) else {
        log::warn!("Mango Clicker: newest release has no package asset");
        return Ok(None);
    };

    let version = parse_asset_name(&asset.name).unwrap_or_else(|| {
        log::warn!("Mango Clicker: unexpected asset name {}", asset.name);
        VersionInfo {
            name: "0.0".into(),
            code: 0,
        }
    });

    Ok(Some(UpdateInfo {
        version,
        size: asset.size,
        url: asset.browser_download_url,
    }))
}

/// Decide from a feed body whether `current` is outdated.
pub fn check_feed(feed_json: &str, current: &VersionInfo) -> Result<UpdateCheck, UpdateError> {
    Ok(match select_release_asset(feed_json)? {
        Some(info) if is_update_required(current, &info.version) => {
            log::info!(
                "Mango Clicker: update {} ({}) available, running {} ({})",
                info.version.name,
                info.version.code,
                current.name,
                current.code
            );
            UpdateCheck::Available(info)
        }
        _ => UpdateCheck::UpToDate,
    })
}

#[allow(async_fn_in_trait)]
pub trait UpdateFeed {
    async fn check_for_update(&self) -> Result<UpdateCheck, UpdateError>;
    /// Fetch the package at `url`, reporting whole-percent progress.
    async fn download_and_install(
        &self,
        url: &str,
        on_progress: &mut dyn FnMut(Option<u8>),
    ) -> Result<(), UpdateError>;
}

/// GitHub releases feed. Installing hands the package URL to the browser.
pub struct GitHubReleases {
    feed_url: String,
    current: VersionInfo,
}

impl Default for GitHubReleases {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubReleases {
    pub fn new() -> Self {
        Self {
            feed_url: config::RELEASES_URL.to_string(),
            current: VersionInfo::current(),
        }
    }
}

impl UpdateFeed for GitHubReleases {
    async fn check_for_update(&self) -> Result<UpdateCheck, UpdateError> {
        let response = net::fetch_text("GET", &self.feed_url, None)
            .await
            .map_err(UpdateError::Network)?;
        if !(200..300).contains(&response.status) {
            return Err(UpdateError::Network(format!("HTTP {}", response.status)));
        }
        check_feed(&response.body, &self.current)
    }

    async fn download_and_install(
        &self,
        url: &str,
        on_progress: &mut dyn FnMut(Option<u8>),
    ) -> Result<(), UpdateError> {
        let window = web_sys::window().ok_or_else(|| UpdateError::Install("no window".into()))?;
        on_progress(None);
        window
            .open_with_url_and_target(url, "_blank")
            .map_err(|e| UpdateError::Install(format!("{e:?}")))?;
        on_progress(Some(100));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str, code: u64) -> VersionInfo {
        VersionInfo {
            name: name.into(),
            code,
        }
    }

    const FEED: &str = r#"[
        {"tag_name":"v1.5","assets":[
            {"name":"notes.txt","browser_download_url":"https://x/notes.txt","size":10},
            {"name":"MangoClicker_1.5_7.apk","browser_download_url":"https://x/MangoClicker_1.5_7.apk","size":5242880}
        ]},
        {"tag_name":"v1.4","assets":[
            {"name":"MangoClicker_1.4_6.apk","browser_download_url":"https://x/old.apk","size":1}
        ]}
    ]"#;

    #[test]
    fn parses_asset_names() {
        assert_eq!(parse_asset_name("MangoClicker_1.4_6.apk"), Some(v("1.4", 6)));
        assert_eq!(parse_asset_name("MangoClicker_10.12_140.apk"), Some(v("10.12", 140)));
        assert_eq!(parse_asset_name("MangoClicker_1.4.apk"), None);
        assert_eq!(parse_asset_name("MangoClicker_1_6.apk"), None);
        assert_eq!(parse_asset_name("Other_1.4_6.apk"), None);
        assert_eq!(parse_asset_name("MangoClicker_1.x_6.apk"), None);
    }

    #[test]
    fn dotted_comparison() {
        assert_eq!(compare_versions("1.4", "1.5"), Ordering::Less);
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.0", "2"), Ordering::Equal);
        assert_eq!(compare_versions("1.4.1", "1.4"), Ordering::Greater);
    }

    #[test]
    fn update_decision() {
        assert!(is_update_required(&v("1.4", 6), &v("1.5", 7)));
        assert!(!is_update_required(&v("1.5", 7), &v("1.4", 9)));
        assert!(is_update_required(&v("1.4", 6), &v("1.4", 7)));
        assert!(!is_update_required(&v("1.4", 6), &v("1.4", 6)));
        // Names decide even if the code went down.
        assert!(is_update_required(&v("1.4", 9), &v("1.5", 1)));
    }

    #[test]
    fn selects_first_package_of_newest_release() {
        let info = select_release_asset(FEED).unwrap().unwrap();
        assert_eq!(info.version, v("1.5", 7));
        assert_eq!(info.size, 5_242_880);
        assert!(info.url.ends_with("MangoClicker_1.5_7.apk"));
    }

    #[test]
    fn empty_feed_and_missing_package() {
        assert_eq!(select_release_asset("[]").unwrap(), None);
        let feed = r#"[{"assets":[{"name":"a.zip","browser_download_url":"u"}]}]"#;
        assert_eq!(select_release_asset(feed).unwrap(), None);
    }

    #[test]
    fn odd_asset_name_reports_zero_version() {
        let feed = r#"[{"assets":[{"name":"mango-latest.apk","browser_download_url":"u"}]}]"#;
        let info = select_release_asset(feed).unwrap().unwrap();
        assert_eq!(info.version, v("0.0", 0));
        assert_eq!(info.size, 0);
    }

    #[test]
    fn malformed_feed_is_an_error() {
        assert!(matches!(select_release_asset("{"), Err(UpdateError::Feed(_))));
        assert!(matches!(select_release_asset(r#"{"message":"rate limited"}"#), Err(UpdateError::Feed(_))));
    }

    #[test]
    fn feed_check() {
        assert!(matches!(check_feed(FEED, &v("1.4", 6)), Ok(UpdateCheck::Available(_))));
        assert_eq!(check_feed(FEED, &v("1.5", 7)), Ok(UpdateCheck::UpToDate));
        assert_eq!(check_feed("[]", &v("1.0", 1)), Ok(UpdateCheck::UpToDate));
    }
}
