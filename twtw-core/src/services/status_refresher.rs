// File: src/services/status_refresher.rs

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, trace};

use twtw_common::models::{ChannelStatus, ContextKind, HostChannel, PrefKey, strip_channel_prefix};
use twtw_common::traits::Host;
use crate::Error;
use crate::formatting::{strip_formatting, tab_text, topic_text};
use crate::http::HttpClient;
use crate::platforms::twitch_helix::HelixClient;
use crate::prefs::PreferenceStore;

/// Result of a full refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Every open platform channel was fetched and applied.
    Completed { channels: usize },
    /// Another cycle was already running; nothing was done.
    Skipped,
}

/// What `apply_status` actually changed in the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedChanges {
    pub topic: bool,
    pub tab: bool,
}

/// Mirrors live-stream status of open Twitch channels into the host's topic
/// bar and tab labels.
///
/// Full cycles are serialised by `cycle_gate`: a cycle requested while one is
/// running is skipped rather than run concurrently. Single-channel refreshes
/// wait for the running cycle to finish.
pub struct StatusRefresher {
    host: Arc<dyn Host>,
    prefs: PreferenceStore,
    helix: HelixClient,
    cycle_gate: Mutex<()>,
}

impl StatusRefresher {
    pub fn new(host: Arc<dyn Host>, http: Arc<dyn HttpClient>) -> Self {
        let prefs = PreferenceStore::new(host.clone());
        let helix = HelixClient::new(http, prefs.clone());
        Self {
            host,
            prefs,
            helix,
            cycle_gate: Mutex::new(()),
        }
    }

    pub fn prefs(&self) -> &PreferenceStore {
        &self.prefs
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// True if `host` (a connection's network host) belongs to the platform.
    pub fn is_platform_host(&self, host: &str) -> bool {
        let domain = self.prefs.get(PrefKey::TwitchBaseDomain);
        !domain.is_empty() && host.contains(domain.as_str())
    }

    /// Open channel contexts whose connection host contains the base domain,
    /// in host order.
    pub fn list_open_platform_channels(&self) -> Vec<HostChannel> {
        self.host
            .list_channels()
            .into_iter()
            .filter(|c| c.kind == ContextKind::Channel && self.is_platform_host(&c.host))
            .collect()
    }

    pub async fn fetch_status(&self, channel: &str) -> Result<ChannelStatus, Error> {
        self.helix.fetch_status(strip_channel_prefix(channel)).await
    }

    /// Pushes `status` into the topic and tab of `#<status.channel>` on `server`.
    ///
    /// The topic command is skipped when the host already shows the same
    /// topic. A context the host cannot find is ignored.
    pub fn apply_status(&self, server: &str, status: &ChannelStatus) -> AppliedChanges {
        let glyph = if status.online {
            self.prefs.get(PrefKey::BulletOnline)
        } else {
            self.prefs.get(PrefKey::BulletOffline)
        };
        let channel = format!("#{}", status.channel);
        let mut changes = AppliedChanges::default();

        if self.prefs.flag(PrefKey::ModifyTopic) {
            let mut topic = topic_text(status, &glyph);
            if !self.host.renders_topic_formatting() {
                topic = strip_formatting(&topic);
            }

            if self.host.topic(server, &channel).as_deref() != Some(topic.as_str()) {
                let command = format!(
                    "RECV :Topic!Topic@{domain} TOPIC {channel} :{topic}",
                    domain = self.prefs.get(PrefKey::TwitchBaseDomain),
                );
                changes.topic = self.host.command_in(server, &channel, &command);
            } else {
                trace!("Topic of {} unchanged", channel);
            }
        }

        if self.prefs.flag(PrefKey::ModifyTab) {
            let command = format!("SETTAB {}", tab_text(status, &glyph));
            changes.tab = self.host.command_in(server, &channel, &command);
        }

        debug!(
            "Applied status for {} (online={}): topic={}, tab={}",
            channel, status.online, changes.topic, changes.tab
        );
        changes
    }

    /// One full refresh cycle over every open platform channel, one channel
    /// at a time. The first failure aborts the rest of the cycle.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, Error> {
        let Ok(_guard) = self.cycle_gate.try_lock() else {
            debug!("Refresh cycle already running; skipping.");
            return Ok(RefreshOutcome::Skipped);
        };

        let channels = self.list_open_platform_channels();
        debug!("Refreshing {} Twitch channel(s)", channels.len());
        for chan in &channels {
            let status = self.fetch_status(chan.login()).await?;
            self.apply_status(&chan.server, &status);
        }

        info!("Refresh cycle finished for {} channel(s).", channels.len());
        Ok(RefreshOutcome::Completed { channels: channels.len() })
    }

    /// Fetches and applies a single channel, e.g. right after joining it.
    pub async fn refresh_one(&self, server: &str, channel: &str) -> Result<ChannelStatus, Error> {
        let _guard = self.cycle_gate.lock().await;
        let status = self.fetch_status(channel).await?;
        self.apply_status(server, &status);
        Ok(status)
    }
}
