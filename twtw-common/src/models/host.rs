// File: twtw-common/src/models/host.rs

use std::fmt;
use serde::{Deserialize, Serialize};

/// Kind of host context, mirroring the chat client's channel list types.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Server,
    Channel,
    Dialog,
    Other,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKind::Server => write!(f, "server"),
            ContextKind::Channel => write!(f, "channel"),
            ContextKind::Dialog => write!(f, "dialog"),
            ContextKind::Other => write!(f, "other"),
        }
    }
}

/// One open context (tab) in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostChannel {
    /// Server name the host shows for this connection.
    pub server: String,
    /// Network host the connection actually talks to, e.g. `irc.chat.twitch.tv`.
    pub host: String,
    /// Channel name including the leading '#'.
    pub channel: String,
    pub kind: ContextKind,
}

impl HostChannel {
    /// Channel login without the leading '#'.
    pub fn login(&self) -> &str {
        strip_channel_prefix(&self.channel)
    }
}

pub fn strip_channel_prefix(channel: &str) -> &str {
    channel.strip_prefix('#').unwrap_or(channel)
}
