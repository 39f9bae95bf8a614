// File: twtw-core/src/test_utils/fake_host.rs

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use twtw_common::models::{ContextKind, HostChannel};
use twtw_common::traits::Host;

#[derive(Default)]
struct FakeHostState {
    prefs: BTreeMap<String, String>,
    refuse_pref_writes: bool,
    channels: Vec<HostChannel>,
    topics: HashMap<(String, String), String>,
    commands: Vec<(String, String, String)>,
    printed: Vec<String>,
}

/// In-memory `Host` that records every command and printed line.
///
/// `RECV ... TOPIC` commands update the stored topic the same way a real
/// client would, so repeated refreshes can be checked for idempotence.
pub struct FakeHost {
    state: Mutex<FakeHostState>,
    renders_formatting: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeHostState::default()),
            renders_formatting: true,
        }
    }

    /// A host whose topic bar shows raw formatting codes.
    pub fn plain_topic() -> Self {
        Self {
            renders_formatting: false,
            ..Self::new()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeHostState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Opens a channel context on the given server/host pair.
    pub fn open_channel(&self, server: &str, host: &str, channel: &str) {
        self.lock().channels.push(HostChannel {
            server: server.to_string(),
            host: host.to_string(),
            channel: channel.to_string(),
            kind: ContextKind::Channel,
        });
    }

    pub fn open_context(&self, context: HostChannel) {
        self.lock().channels.push(context);
    }

    pub fn close_channel(&self, server: &str, channel: &str) {
        self.lock()
            .channels
            .retain(|c| !(c.server == server && c.channel == channel));
    }

    pub fn set_topic(&self, server: &str, channel: &str, topic: &str) {
        self.lock()
            .topics
            .insert((server.to_string(), channel.to_string()), topic.to_string());
    }

    pub fn refuse_pref_writes(&self) {
        self.lock().refuse_pref_writes = true;
    }

    /// `(server, channel, command)` for every command issued so far.
    pub fn commands(&self) -> Vec<(String, String, String)> {
        self.lock().commands.clone()
    }

    pub fn commands_starting_with(&self, prefix: &str) -> Vec<String> {
        self.lock()
            .commands
            .iter()
            .filter(|(_, _, cmd)| cmd.starts_with(prefix))
            .map(|(_, _, cmd)| cmd.clone())
            .collect()
    }

    pub fn printed(&self) -> Vec<String> {
        self.lock().printed.clone()
    }

    pub fn clear_log(&self) {
        let mut state = self.lock();
        state.commands.clear();
        state.printed.clear();
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for FakeHost {
    fn get_pref(&self, key: &str) -> Option<String> {
        self.lock().prefs.get(key).cloned()
    }

    fn set_pref(&self, key: &str, value: &str) -> bool {
        let mut state = self.lock();
        if state.refuse_pref_writes {
            return false;
        }
        state.prefs.insert(key.to_string(), value.to_string());
        true
    }

    fn list_prefs(&self) -> Vec<String> {
        self.lock().prefs.keys().cloned().collect()
    }

    fn list_channels(&self) -> Vec<HostChannel> {
        self.lock().channels.clone()
    }

    fn topic(&self, server: &str, channel: &str) -> Option<String> {
        self.lock()
            .topics
            .get(&(server.to_string(), channel.to_string()))
            .cloned()
    }

    fn command_in(&self, server: &str, channel: &str, command: &str) -> bool {
        let mut state = self.lock();
        let open = state
            .channels
            .iter()
            .any(|c| c.server == server && c.channel == channel);
        if !open {
            return false;
        }
        state
            .commands
            .push((server.to_string(), channel.to_string(), command.to_string()));

        // RECV :nick!user@host TOPIC #chan :text
        if let Some(rest) = command.strip_prefix("RECV ") {
            if let Some((head, text)) = rest.split_once(" :") {
                let mut words = head.split_whitespace();
                let _source = words.next();
                if words.next() == Some("TOPIC") {
                    if let Some(target) = words.next() {
                        state
                            .topics
                            .insert((server.to_string(), target.to_string()), text.to_string());
                    }
                }
            }
        }
        true
    }

    fn print(&self, text: &str) {
        self.lock().printed.push(text.to_string());
    }

    fn renders_topic_formatting(&self) -> bool {
        self.renders_formatting
    }
}
