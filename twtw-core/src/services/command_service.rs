// File: src/services/command_service.rs
//
// TWTWSET / TWTWREFRESH / TWTWLIST, the user-facing configuration commands.

use std::sync::Arc;
use tracing::{error, info, warn};

use twtw_common::models::PrefKey;
use crate::services::status_refresher::{RefreshOutcome, StatusRefresher};

pub const TWTWSET_HELP: &str =
    "Usage: TWTWSET <name> <value...> - Sets/gets the value of a twitch-tweaks configuration variable";
pub const TWTWREFRESH_HELP: &str =
    "Usage: TWTWREFRESH - Forces twitch-tweaks to refresh the statuses of all Twitch channels";
pub const TWTWLIST_HELP: &str =
    "Usage: TWTWLIST - Lists all preferences set for twitch-tweaks";

/// `(command, help)` pairs, for hosts that register commands up front.
pub const COMMANDS: [(&str, &str); 3] = [
    ("TWTWSET", TWTWSET_HELP),
    ("TWTWREFRESH", TWTWREFRESH_HELP),
    ("TWTWLIST", TWTWLIST_HELP),
];

pub struct CommandService {
    refresher: Arc<StatusRefresher>,
}

impl CommandService {
    pub fn new(refresher: Arc<StatusRefresher>) -> Self {
        Self { refresher }
    }

    /// Runs `line` if it is one of our commands and returns the text to
    /// show the user. `None` means the command belongs to someone else.
    pub async fn dispatch(&self, line: &str) -> Option<String> {
        let line = line.trim_start().trim_start_matches('/');
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest),
            None => (line, ""),
        };

        match cmd.to_uppercase().as_str() {
            "TWTWSET" => Some(self.set(rest)),
            "TWTWREFRESH" => Some(self.refresh().await),
            "TWTWLIST" => Some(self.list()),
            _ => None,
        }
    }

    /// `<key> [<value...>]`. The value is everything after the key, inner
    /// whitespace preserved.
    pub fn set(&self, args: &str) -> String {
        let args = args.trim_start();
        if args.is_empty() {
            return format!("Incorrect syntax. {}", TWTWSET_HELP);
        }

        let (name, value) = match args.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim_start()),
            None => (args, ""),
        };

        let key: PrefKey = match name.parse() {
            Ok(key) => key,
            Err(_) => {
                warn!("TWTWSET on unknown key '{}'", name);
                return "Unknown variable name. Use TWTWLIST to see existing variables".to_string();
            }
        };

        let prefs = self.refresher.prefs();
        if !value.is_empty() {
            if let Err(e) = prefs.set(key, value) {
                error!("Failed to store {}: {}", key, e);
                return format!("Could not set {}: {}", key, e);
            }
            info!("Preference {} updated", key);
        }
        format!("{} = {}", key, prefs.get(key))
    }

    pub async fn refresh(&self) -> String {
        match self.refresher.refresh_all().await {
            Ok(RefreshOutcome::Completed { .. }) => "Refreshed all Twitch channels!".to_string(),
            Ok(RefreshOutcome::Skipped) => "A refresh is already in progress.".to_string(),
            Err(e) => {
                error!("Manual refresh failed: {}", e);
                format!("Refresh failed: {}", e)
            }
        }
    }

    pub fn list(&self) -> String {
        self.refresher
            .prefs()
            .list()
            .into_iter()
            .map(|(key, value)| format!("{} = {}", key, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
