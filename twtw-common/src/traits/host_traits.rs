use crate::models::HostChannel;

/// Everything the plugin needs from the chat client it is loaded into.
///
/// The host owns preference persistence, the list of open contexts and
/// command dispatch. Implementations must tolerate calls from the refresh
/// task as well as from the host's own callback thread.
pub trait Host: Send + Sync {
    /// Reads a raw (already prefixed) preference.
    fn get_pref(&self, key: &str) -> Option<String>;

    /// Stores a raw (already prefixed) preference. Returns false if the host
    /// refused the write.
    fn set_pref(&self, key: &str, value: &str) -> bool;

    /// All stored preference keys, including those of other plugins.
    fn list_prefs(&self) -> Vec<String>;

    /// Every open context, in the order the host lists them.
    fn list_channels(&self) -> Vec<HostChannel>;

    /// Current topic of a channel context, if the context exists.
    fn topic(&self, server: &str, channel: &str) -> Option<String>;

    /// Runs a client command inside the given channel context.
    /// Returns false when no such context is open.
    fn command_in(&self, server: &str, channel: &str, command: &str) -> bool;

    /// Prints a line to the user.
    fn print(&self, text: &str);

    /// Whether the topic bar can hide IRC colour/attribute codes.
    fn renders_topic_formatting(&self) -> bool {
        !cfg!(windows)
    }
}
