// File: src/platforms/twitch_helix/client.rs

use std::collections::HashMap;
use std::sync::Arc;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use twtw_common::models::{ChannelStatus, PrefKey};
use crate::Error;
use crate::http::HttpClient;
use crate::prefs::PreferenceStore;
use super::models::{ChannelEntry, HelixResponse, StreamEntry, UserEntry};

/// Minimal Helix client: enough of `/streams`, `/users` and `/channels` to
/// describe whether a channel is live and what it is streaming.
///
/// Connection settings are read from the preference store on every call so
/// that `TWTWSET` changes apply to the next request.
#[derive(Clone)]
pub struct HelixClient {
    http: Arc<dyn HttpClient>,
    prefs: PreferenceStore,
}

impl HelixClient {
    pub fn new(http: Arc<dyn HttpClient>, prefs: PreferenceStore) -> Self {
        Self { http, prefs }
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Client-ID".to_string(), self.prefs.get(PrefKey::TwitchClientId));
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.prefs.get(PrefKey::TwitchOauthToken)),
        );
        headers
    }

    fn url(&self, endpoint: &str, param: &str, value: &str) -> String {
        let root = self.prefs.get(PrefKey::TwitchApiRoot);
        format!(
            "{root}/{endpoint}?{param}={value}",
            root = root.trim_end_matches('/'),
            value = urlencoding::encode(value),
        )
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        param: &str,
        value: &str,
    ) -> Result<Vec<T>, Error> {
        let url = self.url(endpoint, param, value);
        let body = self.http.get(url, self.headers()).await?;
        let parsed: HelixResponse<T> = serde_json::from_str(&body)?;
        Ok(parsed.data)
    }

    /// Live status of `channel` (login name, no '#').
    ///
    /// When the stream is offline and `lookup_offline_names` is enabled, two
    /// further lookups resolve the broadcaster's display name, last game and
    /// title from channel metadata. Any failure along the way is returned.
    pub async fn fetch_status(&self, channel: &str) -> Result<ChannelStatus, Error> {
        let streams: Vec<StreamEntry> = self.get_data("streams", "user_login", channel).await?;

        if let Some(stream) = streams.into_iter().next() {
            debug!("{} is live", channel);
            return Ok(ChannelStatus {
                channel: channel.to_string(),
                online: true,
                display_name: stream.user_name.unwrap_or_else(|| channel.to_string()),
                game: stream.game_name.unwrap_or_default(),
                title: stream.title.unwrap_or_default(),
                placeholder_title: false,
            });
        }

        debug!("{} is offline", channel);
        let mut status = ChannelStatus::offline(channel);
        if !self.prefs.flag(PrefKey::LookupOfflineNames) {
            return Ok(status);
        }

        let user_id = self.lookup_user_id(channel).await?;
        let info = self.lookup_channel(&user_id).await?;
        status.display_name = info.broadcaster_name.unwrap_or_else(|| channel.to_string());
        status.game = info.game_name.unwrap_or_default();
        status.title = info.title.unwrap_or_default();
        status.placeholder_title = false;
        Ok(status)
    }

    /// Numeric user id for a login name.
    pub async fn lookup_user_id(&self, login: &str) -> Result<String, Error> {
        let users: Vec<UserEntry> = self.get_data("users", "login", login).await?;
        users
            .into_iter()
            .next()
            .map(|u| u.id)
            .ok_or_else(|| Error::NotFound(format!("Twitch user '{}'", login)))
    }

    /// Channel metadata (name, last game, title) for a broadcaster id.
    pub async fn lookup_channel(&self, broadcaster_id: &str) -> Result<ChannelEntry, Error> {
        let channels: Vec<ChannelEntry> =
            self.get_data("channels", "broadcaster_id", broadcaster_id).await?;
        let entry = channels
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("Twitch channel for broadcaster {}", broadcaster_id)))?;
        info!(
            "Resolved offline channel {} => {:?}",
            broadcaster_id, entry.broadcaster_name
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockHttpClient;
    use crate::test_utils::FakeHost;
    use mockall::predicate::*;

    fn client_with(http: MockHttpClient, lookup_offline: bool) -> HelixClient {
        let host = Arc::new(FakeHost::new());
        let prefs = PreferenceStore::new(host);
        prefs.init_defaults().expect("defaults");
        prefs
            .set(PrefKey::LookupOfflineNames, if lookup_offline { "1" } else { "0" })
            .expect("set");
        prefs.set(PrefKey::TwitchOauthToken, "tok").expect("set");
        HelixClient::new(Arc::new(http), prefs)
    }

    #[tokio::test]
    async fn test_online_stream_uses_first_entry() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .with(
                eq("https://api.twitch.tv/helix/streams?user_login=foo".to_string()),
                always(),
            )
            .times(1)
            .returning(|_, _| {
                Ok(r#"{"data":[
                    {"user_name":"Foo","game_name":"Bar","title":"Baz"},
                    {"user_name":"Other","game_name":"x","title":"y"}
                ]}"#.to_string())
            });

        let status = client_with(http, true).fetch_status("foo").await.expect("status");
        assert!(status.online);
        assert_eq!(status.display_name, "Foo");
        assert_eq!(status.game, "Bar");
        assert_eq!(status.title, "Baz");
    }

    #[tokio::test]
    async fn test_headers_carry_client_id_and_bearer_token() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .withf(|_, headers| {
                headers.get("Client-ID").map(String::as_str) == Some("gp762nuuoqcoxypju8c569th9wz7q5")
                    && headers.get("Authorization").map(String::as_str) == Some("Bearer tok")
            })
            .times(1)
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));

        let status = client_with(http, false).fetch_status("foo").await.expect("status");
        assert!(!status.online);
    }

    #[tokio::test]
    async fn test_offline_without_lookup_uses_placeholder() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .times(1)
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));

        let status = client_with(http, false).fetch_status("foo").await.expect("status");
        assert_eq!(status, ChannelStatus::offline("foo"));
        assert_eq!(status.title, "Stream is offline");
        assert_eq!(status.game, "");
    }

    #[tokio::test]
    async fn test_missing_data_field_counts_as_offline() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .times(1)
            .returning(|_, _| Ok("{}".to_string()));

        let status = client_with(http, false).fetch_status("foo").await.expect("status");
        assert!(!status.online);
    }

    #[tokio::test]
    async fn test_offline_lookup_resolves_channel_metadata() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .withf(|url, _| url.contains("/streams?"))
            .times(1)
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));
        http.expect_get()
            .withf(|url, _| url.ends_with("/users?login=foo"))
            .times(1)
            .returning(|_, _| Ok(r#"{"data":[{"id":"123"}]}"#.to_string()));
        http.expect_get()
            .withf(|url, _| url.ends_with("/channels?broadcaster_id=123"))
            .times(1)
            .returning(|_, _| {
                Ok(r#"{"data":[{"broadcaster_name":"Foo","game_name":"Bar","title":"Baz"}]}"#.to_string())
            });

        let status = client_with(http, true).fetch_status("foo").await.expect("status");
        assert!(!status.online);
        assert_eq!(status.display_name, "Foo");
        assert_eq!(status.game, "Bar");
        assert_eq!(status.title, "Baz");
        assert!(!status.has_placeholder_title());
    }

    #[tokio::test]
    async fn test_looked_up_title_is_never_the_placeholder() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .withf(|url, _| url.contains("/streams?"))
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));
        http.expect_get()
            .withf(|url, _| url.contains("/users?"))
            .returning(|_, _| Ok(r#"{"data":[{"id":"123"}]}"#.to_string()));
        http.expect_get()
            .withf(|url, _| url.contains("/channels?"))
            .returning(|_, _| {
                Ok(r#"{"data":[{"broadcaster_name":"Foo","title":"Stream is offline"}]}"#.to_string())
            });

        let status = client_with(http, true).fetch_status("foo").await.expect("status");
        assert_eq!(status.title, "Stream is offline");
        assert!(!status.has_placeholder_title());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .withf(|url, _| url.contains("/streams?"))
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));
        http.expect_get()
            .withf(|url, _| url.contains("/users?"))
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));

        let err = client_with(http, true).fetch_status("ghost").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let mut http = MockHttpClient::new();
        http.expect_get().returning(|_, _| Ok("<html>".to_string()));

        let err = client_with(http, false).fetch_status("foo").await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_login_is_url_encoded() {
        let mut http = MockHttpClient::new();
        http.expect_get()
            .withf(|url, _| url.ends_with("user_login=a%26b"))
            .returning(|_, _| Ok(r#"{"data":[]}"#.to_string()));

        client_with(http, false).fetch_status("a&b").await.expect("status");
    }
}
