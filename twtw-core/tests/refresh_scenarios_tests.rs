// tests/refresh_scenarios_tests.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use twtw_common::models::{ChannelStatus, PrefKey};
use twtw_common::traits::Host;
use twtw_core::services::{RefreshOutcome, StatusRefresher};
use twtw_core::test_utils::{FakeHost, ScriptedHttpClient};

const SERVER: &str = "Twitch";
const TWITCH_HOST: &str = "irc.chat.twitch.tv";

fn setup() -> (Arc<FakeHost>, Arc<ScriptedHttpClient>, Arc<StatusRefresher>) {
    let host = Arc::new(FakeHost::new());
    let http = Arc::new(ScriptedHttpClient::new());
    let refresher = Arc::new(StatusRefresher::new(host.clone(), http.clone()));
    refresher.prefs().init_defaults().expect("defaults");
    (host, http, refresher)
}

#[tokio::test]
async fn test_offline_channel_with_lookup_shows_channel_metadata() {
    let (host, http, refresher) = setup();
    host.open_channel(SERVER, TWITCH_HOST, "#foo");
    http.respond("/streams?user_login=foo", r#"{"data":[]}"#)
        .respond("/users?login=foo", r#"{"data":[{"id":"123"}]}"#)
        .respond(
            "/channels?broadcaster_id=123",
            r#"{"data":[{"broadcaster_name":"Foo","game_name":"Bar","title":"Baz"}]}"#,
        );

    let outcome = refresher.refresh_all().await.expect("refresh");
    assert_eq!(outcome, RefreshOutcome::Completed { channels: 1 });

    assert_eq!(
        host.topic(SERVER, "#foo").as_deref(),
        Some("\u{25A1} \x0318Foo\x0399 | Bar | \x0318Baz\x0399")
    );
    assert_eq!(host.commands_starting_with("SETTAB"), vec!["SETTAB \u{25A1} Foo"]);

    let urls: Vec<String> = http.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.twitch.tv/helix/streams?user_login=foo",
            "https://api.twitch.tv/helix/users?login=foo",
            "https://api.twitch.tv/helix/channels?broadcaster_id=123",
        ]
    );
}

#[tokio::test]
async fn test_second_cycle_with_same_state_sends_no_topic() {
    let (host, http, refresher) = setup();
    host.open_channel(SERVER, TWITCH_HOST, "#foo");
    http.respond(
        "user_login=foo",
        r#"{"data":[{"user_name":"Foo","game_name":"Bar","title":"Baz"}]}"#,
    );

    refresher.refresh_all().await.expect("first");
    refresher.refresh_all().await.expect("second");

    assert_eq!(host.commands_starting_with("RECV").len(), 1);
    assert_eq!(host.commands_starting_with("SETTAB").len(), 2);
}

#[tokio::test]
async fn test_custom_api_root_and_domain() {
    let (host, http, refresher) = setup();
    refresher.prefs().set(PrefKey::TwitchApiRoot, "http://localhost:8080/mock/").expect("set");
    refresher.prefs().set(PrefKey::TwitchBaseDomain, "example.org").expect("set");
    refresher.prefs().set(PrefKey::LookupOfflineNames, "0").expect("set");
    host.open_channel("Mock", "irc.example.org", "#foo");
    host.open_channel(SERVER, TWITCH_HOST, "#bar");
    http.respond("user_login=foo", r#"{"data":[]}"#);

    refresher.refresh_all().await.expect("refresh");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://localhost:8080/mock/streams?user_login=foo");
    assert_eq!(
        host.commands_starting_with("RECV"),
        vec![
            "RECV :Topic!Topic@example.org TOPIC #foo :\u{25A1} \x0318foo\x0399 |  | \x0318\x1dStream is offline\x0f\x0399"
        ]
    );
}

/// Yields until the HTTP client has seen `n` requests.
async fn wait_for_requests(http: &ScriptedHttpClient, n: usize) {
    while http.request_count() < n {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_join_waits_for_running_cycle() {
    let (host, http, refresher) = setup();
    refresher.prefs().set(PrefKey::LookupOfflineNames, "0").expect("set");
    host.open_channel(SERVER, TWITCH_HOST, "#foo");
    host.open_channel(SERVER, TWITCH_HOST, "#bar");
    let release = http.respond_after("user_login=foo", r#"{"data":[]}"#);
    http.respond("user_login=bar", r#"{"data":[]}"#);

    let cycle = {
        let r = refresher.clone();
        tokio::spawn(async move { r.refresh_all().await })
    };
    wait_for_requests(&http, 1).await;

    let blocked = timeout(Duration::from_millis(50), refresher.refresh_one(SERVER, "#bar")).await;
    assert!(blocked.is_err(), "join must wait while the cycle is in flight");
    assert_eq!(http.request_count(), 1);

    release.notify_one();
    let outcome = cycle.await.expect("join handle").expect("cycle");
    assert_eq!(outcome, RefreshOutcome::Completed { channels: 2 });

    let joined = refresher.refresh_one(SERVER, "#bar").await.expect("join");
    assert_eq!(joined, ChannelStatus::offline("bar"));

    let urls: Vec<String> = http.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.twitch.tv/helix/streams?user_login=foo",
            "https://api.twitch.tv/helix/streams?user_login=bar",
            "https://api.twitch.tv/helix/streams?user_login=bar",
        ]
    );
}

#[tokio::test]
async fn test_cycle_requested_during_another_is_skipped() {
    let (host, http, refresher) = setup();
    refresher.prefs().set(PrefKey::LookupOfflineNames, "0").expect("set");
    host.open_channel(SERVER, TWITCH_HOST, "#foo");
    let release = http.respond_after("user_login=foo", r#"{"data":[]}"#);

    let cycle = {
        let r = refresher.clone();
        tokio::spawn(async move { r.refresh_all().await })
    };
    wait_for_requests(&http, 1).await;

    assert_eq!(refresher.refresh_all().await.expect("second"), RefreshOutcome::Skipped);

    release.notify_one();
    assert_eq!(
        cycle.await.expect("join handle").expect("cycle"),
        RefreshOutcome::Completed { channels: 1 }
    );
    assert_eq!(http.request_count(), 1);
}
