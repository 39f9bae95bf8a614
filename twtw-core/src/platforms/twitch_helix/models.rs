// File: src/platforms/twitch_helix/models.rs
//
// The handful of Helix response fields the status refresher reads.
// Every field is optional so that a sparse or changed payload degrades to
// defaults instead of failing the whole cycle.

use serde::Deserialize;

/// Helix wraps every list endpoint in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Row of `GET /streams`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEntry {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Row of `GET /users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    pub id: String,
}

/// Row of `GET /channels`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelEntry {
    #[serde(default)]
    pub broadcaster_name: Option<String>,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
