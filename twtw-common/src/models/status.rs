// File: twtw-common/src/models/status.rs

use serde::{Deserialize, Serialize};

/// Title shown for a channel that is not live and whose channel metadata
/// was not looked up.
pub const OFFLINE_TITLE: &str = "Stream is offline";

/// Live status of a single channel, rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatus {
    /// Login name, without the leading '#'.
    pub channel: String,
    pub online: bool,
    pub display_name: String,
    pub game: String,
    pub title: String,
    /// Set only by `offline`, while `title` still holds `OFFLINE_TITLE`.
    #[serde(default)]
    pub placeholder_title: bool,
}

impl ChannelStatus {
    /// Status used when the stream is offline and nothing else is known.
    /// The channel login doubles as the display name.
    pub fn offline(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            online: false,
            display_name: channel.to_string(),
            game: String::new(),
            title: OFFLINE_TITLE.to_string(),
            placeholder_title: true,
        }
    }

    /// True when the title is the offline placeholder rather than a real
    /// stream/channel title, even one that reads the same.
    pub fn has_placeholder_title(&self) -> bool {
        self.placeholder_title
    }
}
