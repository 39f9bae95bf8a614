//! A stand-alone `Host` for running the plugin from a terminal.
//!
//! Preferences persist to a JSON file, channels are whatever the user has
//! joined during the session, and the topic/tab commands the plugin issues
//! are interpreted locally and echoed to stdout.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use twtw_common::Error;
use twtw_common::models::{ContextKind, HostChannel};
use twtw_common::traits::Host;
use twtw_core::formatting::strip_formatting;

#[derive(Default)]
struct ConsoleState {
    prefs: BTreeMap<String, String>,
    channels: Vec<HostChannel>,
    topics: HashMap<String, String>,
    tabs: HashMap<String, String>,
}

pub struct ConsoleHost {
    server: String,
    host_name: String,
    prefs_path: Option<PathBuf>,
    plain_topic: bool,
    state: Mutex<ConsoleState>,
}

impl ConsoleHost {
    /// Creates the host, loading preferences from `prefs_path` if the file
    /// exists. `None` keeps preferences in memory only.
    pub fn new(
        server: &str,
        host_name: &str,
        prefs_path: Option<PathBuf>,
        plain_topic: bool,
    ) -> Result<Self, Error> {
        let prefs = match &prefs_path {
            Some(path) if path.exists() => load_prefs(path)?,
            _ => BTreeMap::new(),
        };
        debug!("Loaded {} stored preference(s)", prefs.len());

        Ok(Self {
            server: server.to_string(),
            host_name: host_name.to_string(),
            prefs_path,
            plain_topic,
            state: Mutex::new(ConsoleState {
                prefs,
                ..ConsoleState::default()
            }),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a channel tab. Returns the normalised `#name`, or `None` if it
    /// was already open.
    pub fn join(&self, channel: &str) -> Option<String> {
        let channel = normalise_channel(channel);
        let mut state = self.lock();
        if state.channels.iter().any(|c| c.channel == channel) {
            return None;
        }
        state.channels.push(HostChannel {
            server: self.server.clone(),
            host: self.host_name.clone(),
            channel: channel.clone(),
            kind: ContextKind::Channel,
        });
        Some(channel)
    }

    pub fn part(&self, channel: &str) -> bool {
        let channel = normalise_channel(channel);
        let mut state = self.lock();
        let before = state.channels.len();
        state.channels.retain(|c| c.channel != channel);
        state.topics.remove(&channel);
        state.tabs.remove(&channel);
        state.channels.len() != before
    }

    /// One line per open tab: label and topic.
    pub fn describe_channels(&self) -> String {
        let state = self.lock();
        if state.channels.is_empty() {
            return "No channels open.".to_string();
        }
        state
            .channels
            .iter()
            .map(|c| {
                let tab = state.tabs.get(&c.channel).cloned().unwrap_or_else(|| c.channel.clone());
                let topic = state
                    .topics
                    .get(&c.channel)
                    .map(|t| strip_formatting(t))
                    .unwrap_or_default();
                format!("  [{}] {} {}", tab, c.channel, topic)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn persist(&self, prefs: &BTreeMap<String, String>) -> Result<(), Error> {
        let Some(path) = &self.prefs_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(prefs)?)?;
        Ok(())
    }
}

fn load_prefs(path: &Path) -> Result<BTreeMap<String, String>, Error> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn normalise_channel(channel: &str) -> String {
    let trimmed = channel.trim();
    if trimmed.starts_with('#') {
        trimmed.to_lowercase()
    } else {
        format!("#{}", trimmed.to_lowercase())
    }
}

impl Host for ConsoleHost {
    fn get_pref(&self, key: &str) -> Option<String> {
        self.lock().prefs.get(key).cloned()
    }

    fn set_pref(&self, key: &str, value: &str) -> bool {
        let mut state = self.lock();
        let mut prefs = state.prefs.clone();
        prefs.insert(key.to_string(), value.to_string());
        match self.persist(&prefs) {
            Ok(()) => {
                state.prefs = prefs;
                true
            }
            Err(e) => {
                warn!("Could not save preferences: {}", e);
                false
            }
        }
    }

    fn list_prefs(&self) -> Vec<String> {
        self.lock().prefs.keys().cloned().collect()
    }

    fn list_channels(&self) -> Vec<HostChannel> {
        self.lock().channels.clone()
    }

    fn topic(&self, server: &str, channel: &str) -> Option<String> {
        if server != self.server {
            return None;
        }
        self.lock().topics.get(channel).cloned()
    }

    fn command_in(&self, server: &str, channel: &str, command: &str) -> bool {
        let mut state = self.lock();
        if server != self.server || !state.channels.iter().any(|c| c.channel == channel) {
            return false;
        }

        if let Some(label) = command.strip_prefix("SETTAB ") {
            state.tabs.insert(channel.to_string(), label.to_string());
            println!("* Tab {} is now labelled \"{}\"", channel, label);
            return true;
        }

        // RECV :nick!user@host TOPIC #chan :text
        if let Some((head, text)) = command
            .strip_prefix("RECV ")
            .and_then(|rest| rest.split_once(" :"))
        {
            if head.split_whitespace().nth(1) == Some("TOPIC") {
                state.topics.insert(channel.to_string(), text.to_string());
                println!("* Topic for {} is: {}", channel, strip_formatting(text));
                return true;
            }
        }

        debug!("Ignoring unsupported command in {}: {}", channel, command);
        false
    }

    fn print(&self, text: &str) {
        println!("{}", text);
    }

    fn renders_topic_formatting(&self) -> bool {
        !self.plain_topic
    }
}
