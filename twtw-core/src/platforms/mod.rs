// File: src/platforms/mod.rs

pub mod twitch_helix;

pub use twitch_helix::HelixClient;
