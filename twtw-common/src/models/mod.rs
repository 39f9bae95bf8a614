// File: twtw-common/src/models/mod.rs
pub mod host;
pub mod preference;
pub mod status;

pub use host::{ContextKind, HostChannel, strip_channel_prefix};
pub use preference::{PREF_PREFIX, PrefKey, parse_flag};
pub use status::{ChannelStatus, OFFLINE_TITLE};
