//! UI strings in English and Russian.
//!
//! The language follows the browser locale; anything that is not Russian
//! falls back to English. Templates use `{name}` placeholders filled by
//! [`fill`].

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lang {
    En,
    Ru,
}

impl Lang {
    /// Map a BCP 47 tag such as `ru-RU` or `en` to a supported language.
    pub fn from_locale(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or("");
        if primary.eq_ignore_ascii_case("ru") {
            Lang::Ru
        } else {
            Lang::En
        }
    }

    /// Language of the browser, English outside the browser.
    pub fn detect() -> Self {
        web_sys::window()
            .and_then(|w| w.navigator().language())
            .map(|tag| Self::from_locale(&tag))
            .unwrap_or(Lang::En)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Text {
    Title,
    ClickerTab,
    ShopTab,
    Mangoes,
    TapHint,
    Ready,
    ClickDelay,
    Seconds,
    DamagePerTap,
    RebirthBonus,
    UpgradeCooldown,
    UpgradeDamage,
    Rebirth,
    MaxLevel,
    NotEnoughMangoes,
    NotEnoughForRebirth,
    RebirthConfirmTitle,
    RebirthConfirmMessage,
    Yes,
    No,
    RebirthSuccessful,
    UpgradeBought,
    SignInTitle,
    SignInMessage,
    SignIn,
    Skip,
    SignOut,
    SignedIn,
    SignedOut,
    SignInFailed,
    DataLoaded,
    LoadFailed,
    SaveFailed,
    CloudOffline,
    CloudSyncing,
    CloudSynced,
    CloudFailed,
    UpdateAvailable,
    UpdateCurrentVersion,
    UpdateNewVersion,
    UpdateSize,
    UpdateInstall,
    UpdateLater,
    UpdateOpened,
    UpdateFailed,
    Controls,
}

pub fn t(lang: Lang, text: Text) -> &'static str {
    match lang {
        Lang::En => en(text),
        Lang::Ru => ru(text),
    }
}

fn en(text: Text) -> &'static str {
    match text {
        Text::Title => "Mango Clicker",
        Text::ClickerTab => "Mango",
        Text::ShopTab => "Shop",
        Text::Mangoes => "Mangoes",
        Text::TapHint => "Tap the mango! [Space]",
        Text::Ready => "Ready",
        Text::ClickDelay => "Click delay",
        Text::Seconds => "s",
        Text::DamagePerTap => "Mangoes per tap",
        Text::RebirthBonus => "Rebirth bonus",
        Text::UpgradeCooldown => "Faster taps ({cost})",
        Text::UpgradeDamage => "Juicier taps ({cost})",
        Text::Rebirth => "Rebirth (+{bonus}%) ({cost})",
        Text::MaxLevel => "Max level reached",
        Text::NotEnoughMangoes => "Not enough mangoes! You need {cost}",
        Text::NotEnoughForRebirth => "Not enough mangoes for a rebirth",
        Text::RebirthConfirmTitle => "Rebirth?",
        Text::RebirthConfirmMessage => {
            "Spend {cost} mangoes? All mangoes and upgrades will be reset. Your permanent tap bonus becomes +{bonus}%."
        }
        Text::Yes => "Yes",
        Text::No => "No",
        Text::RebirthSuccessful => "Reborn! Taps are now stronger",
        Text::UpgradeBought => "Upgrade bought",
        Text::SignInTitle => "Cloud save",
        Text::SignInMessage => "Sign in to keep your progress across devices.",
        Text::SignIn => "Sign in",
        Text::Skip => "Not now",
        Text::SignOut => "Sign out",
        Text::SignedIn => "Signed in",
        Text::SignedOut => "Signed out",
        Text::SignInFailed => "Sign-in failed",
        Text::DataLoaded => "Progress loaded",
        Text::LoadFailed => "Load failed: {error}",
        Text::SaveFailed => "Could not save progress",
        Text::CloudOffline => "local",
        Text::CloudSyncing => "syncing",
        Text::CloudSynced => "cloud",
        Text::CloudFailed => "cloud error",
        Text::UpdateAvailable => "Update available",
        Text::UpdateCurrentVersion => "Current version",
        Text::UpdateNewVersion => "New version",
        Text::UpdateSize => "Size",
        Text::UpdateInstall => "Download",
        Text::UpdateLater => "Later",
        Text::UpdateOpened => "Download started",
        Text::UpdateFailed => "Could not start the download",
        Text::Controls => "[Space] tap  [Tab] switch  [1][2] upgrade  [r] rebirth",
    }
}

fn ru(text: Text) -> &'static str {
    match text {
        Text::Title => "Манго Кликер",
        Text::ClickerTab => "Манго",
        Text::ShopTab => "Магазин",
        Text::Mangoes => "Манго",
        Text::TapHint => "Жми на манго! [Space]",
        Text::Ready => "Готово",
        Text::ClickDelay => "Задержка клика",
        Text::Seconds => "с",
        Text::DamagePerTap => "Манго за клик",
        Text::RebirthBonus => "Бонус перерождения",
        Text::UpgradeCooldown => "Быстрее клики ({cost})",
        Text::UpgradeDamage => "Сочнее клики ({cost})",
        Text::Rebirth => "Перерождение (+{bonus}%) ({cost})",
        Text::MaxLevel => "Достигнут максимальный уровень",
        Text::NotEnoughMangoes => "Недостаточно манго! Нужно {cost}",
        Text::NotEnoughForRebirth => "Недостаточно манго для перерождения",
        Text::RebirthConfirmTitle => "Переродиться?",
        Text::RebirthConfirmMessage => {
            "Потратить {cost} манго? Все манго и улучшения будут сброшены. Постоянный бонус к клику станет +{bonus}%."
        }
        Text::Yes => "Да",
        Text::No => "Нет",
        Text::RebirthSuccessful => "Перерождение! Клики стали сильнее",
        Text::UpgradeBought => "Улучшение куплено",
        Text::SignInTitle => "Облачное сохранение",
        Text::SignInMessage => "Войдите, чтобы прогресс сохранялся на всех устройствах.",
        Text::SignIn => "Войти",
        Text::Skip => "Не сейчас",
        Text::SignOut => "Выйти",
        Text::SignedIn => "Вход выполнен",
        Text::SignedOut => "Вы вышли из аккаунта",
        Text::SignInFailed => "Ошибка входа",
        Text::DataLoaded => "Данные успешно загружены",
        Text::LoadFailed => "Ошибка загрузки: {error}",
        Text::SaveFailed => "Не удалось сохранить прогресс",
        Text::CloudOffline => "локально",
        Text::CloudSyncing => "синхронизация",
        Text::CloudSynced => "облако",
        Text::CloudFailed => "ошибка облака",
        Text::UpdateAvailable => "Доступно обновление",
        Text::UpdateCurrentVersion => "Текущая версия",
        Text::UpdateNewVersion => "Новая версия",
        Text::UpdateSize => "Размер",
        Text::UpdateInstall => "Скачать",
        Text::UpdateLater => "Позже",
        Text::UpdateOpened => "Загрузка начата",
        Text::UpdateFailed => "Не удалось начать загрузку",
        Text::Controls => "[Space] клик  [Tab] вкладка  [1][2] улучшения  [r] перерождение",
    }
}

/// Replace `{name}` placeholders.
pub fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Text; 46] = [
        Text::Title,
        Text::ClickerTab,
        Text::ShopTab,
        Text::Mangoes,
        Text::TapHint,
        Text::Ready,
        Text::ClickDelay,
        Text::Seconds,
        Text::DamagePerTap,
        Text::RebirthBonus,
        Text::UpgradeCooldown,
        Text::UpgradeDamage,
        Text::Rebirth,
        Text::MaxLevel,
        Text::NotEnoughMangoes,
        Text::NotEnoughForRebirth,
        Text::RebirthConfirmTitle,
        Text::RebirthConfirmMessage,
        Text::Yes,
        Text::No,
        Text::RebirthSuccessful,
        Text::UpgradeBought,
        Text::SignInTitle,
        Text::SignInMessage,
        Text::SignIn,
        Text::Skip,
        Text::SignOut,
        Text::SignedIn,
        Text::SignedOut,
        Text::SignInFailed,
        Text::DataLoaded,
        Text::LoadFailed,
        Text::SaveFailed,
        Text::CloudOffline,
        Text::CloudSyncing,
        Text::CloudSynced,
        Text::CloudFailed,
        Text::UpdateAvailable,
        Text::UpdateCurrentVersion,
        Text::UpdateNewVersion,
        Text::UpdateSize,
        Text::UpdateInstall,
        Text::UpdateLater,
        Text::UpdateOpened,
        Text::UpdateFailed,
        Text::Controls,
    ];

    #[test]
    fn locale_mapping() {
        assert_eq!(Lang::from_locale("ru"), Lang::Ru);
        assert_eq!(Lang::from_locale("ru-RU"), Lang::Ru);
        assert_eq!(Lang::from_locale("RU_ru"), Lang::Ru);
        assert_eq!(Lang::from_locale("en-US"), Lang::En);
        assert_eq!(Lang::from_locale("de"), Lang::En);
        assert_eq!(Lang::from_locale(""), Lang::En);
    }

    #[test]
    fn every_key_translated() {
        for key in ALL {
            assert!(!t(Lang::En, key).is_empty(), "{key:?} en");
            assert!(!t(Lang::Ru, key).is_empty(), "{key:?} ru");
        }
    }

    #[test]
    fn placeholders_match_between_languages() {
        for key in ALL {
            for name in ["{cost}", "{bonus}", "{error}"] {
                assert_eq!(
                    t(Lang::En, key).contains(name),
                    t(Lang::Ru, key).contains(name),
                    "{key:?} {name}"
                );
            }
        }
    }

    #[test]
    fn fill_replaces_placeholders() {
        let s = fill(t(Lang::En, Text::NotEnoughMangoes), &[("cost", "1.5K")]);
        assert_eq!(s, "Not enough mangoes! You need 1.5K");
        let s = fill(t(Lang::Ru, Text::Rebirth), &[("bonus", "20"), ("cost", "500K")]);
        assert_eq!(s, "Перерождение (+20%) (500K)");
        let s = fill(
            t(Lang::En, Text::RebirthConfirmMessage),
            &[("cost", "650K"), ("bonus", "40")],
        );
        assert!(s.starts_with("Spend 650K mangoes?"));
        assert!(s.ends_with("+40%."));
        assert_eq!(fill("no args", &[]), "no args");
    }
}
