// File: src/platforms/twitch_helix/mod.rs

pub mod client;
pub mod models;

pub use client::HelixClient;
