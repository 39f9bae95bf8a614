//! twtw-tui: a terminal host for the twitch-tweaks plugin.

pub mod commands;
pub mod console_host;

pub use console_host::ConsoleHost;
