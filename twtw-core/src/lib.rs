// src/lib.rs

pub mod formatting;
pub mod http;
pub mod platforms;
pub mod plugin;
pub mod prefs;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use twtw_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
pub use plugin::TwitchTweaks;
pub use prefs::PreferenceStore;
