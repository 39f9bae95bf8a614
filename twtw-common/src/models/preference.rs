// File: twtw-common/src/models/preference.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Every preference the plugin stores is namespaced with this prefix in the
/// host's preference file.
pub const PREF_PREFIX: &str = "twtw_";

/// The known preference keys. Anything else is rejected by `TWTWSET`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PrefKey {
    TwitchApiRoot,
    TwitchBaseDomain,
    TwitchClientId,
    TwitchOauthToken,
    BulletOffline,
    BulletOnline,
    ModifyTopic,
    ModifyTab,
    LookupOfflineNames,
    RefreshRate,
}

impl PrefKey {
    pub const ALL: [PrefKey; 10] = [
        PrefKey::TwitchApiRoot,
        PrefKey::TwitchBaseDomain,
        PrefKey::TwitchClientId,
        PrefKey::TwitchOauthToken,
        PrefKey::BulletOffline,
        PrefKey::BulletOnline,
        PrefKey::ModifyTopic,
        PrefKey::ModifyTab,
        PrefKey::LookupOfflineNames,
        PrefKey::RefreshRate,
    ];

    /// Key as the user types it (no prefix).
    pub fn as_str(&self) -> &'static str {
        match self {
            PrefKey::TwitchApiRoot => "twitch_api_root",
            PrefKey::TwitchBaseDomain => "twitch_base_domain",
            PrefKey::TwitchClientId => "twitch_client_id",
            PrefKey::TwitchOauthToken => "twitch_oauth_token",
            PrefKey::BulletOffline => "bullet_offline",
            PrefKey::BulletOnline => "bullet_online",
            PrefKey::ModifyTopic => "modify_topic",
            PrefKey::ModifyTab => "modify_tab",
            PrefKey::LookupOfflineNames => "lookup_offline_names",
            PrefKey::RefreshRate => "refresh_rate",
        }
    }

    /// Key as the host stores it.
    pub fn storage_key(&self) -> String {
        format!("{}{}", PREF_PREFIX, self.as_str())
    }

    /// Value seeded on first load when the host has nothing stored.
    pub fn default_value(&self) -> &'static str {
        match self {
            PrefKey::TwitchApiRoot => "https://api.twitch.tv/helix",
            PrefKey::TwitchBaseDomain => "twitch.tv",
            PrefKey::TwitchClientId => "gp762nuuoqcoxypju8c569th9wz7q5",
            PrefKey::TwitchOauthToken => "",
            PrefKey::BulletOffline => "\u{25A1} ",
            PrefKey::BulletOnline => "\u{25A0} ",
            PrefKey::ModifyTopic => "1",
            PrefKey::ModifyTab => "1",
            PrefKey::LookupOfflineNames => "1",
            PrefKey::RefreshRate => "600",
        }
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrefKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrefKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown preference: {}", s))
    }
}

/// Interprets the host's loosely typed flag values ("1", "true", "on" ...).
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
