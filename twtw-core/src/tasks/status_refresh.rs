// twtw-core/src/tasks/status_refresh.rs

use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::services::status_refresher::{RefreshOutcome, StatusRefresher};

/// Handle to the background refresh loop. `stop()` is what unload calls;
/// dropping the handle also signals shutdown, but without waiting for the
/// loop to exit.
pub struct StatusRefreshTask {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl StatusRefreshTask {
    /// Cancels the pending wait and waits for the loop to exit. A cycle
    /// already in progress runs to completion first.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = (&mut self.handle).await {
            error!("Status refresh task ended abnormally: {:?}", e);
        }
        info!("Status refresh task stopped.");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StatusRefreshTask {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawns the refresh loop: one cycle right away, then one cycle every
/// `refresh_rate` seconds, counted from the end of the previous cycle.
///
/// The interval is re-read after each cycle. A failed cycle is logged and
/// the schedule continues.
pub fn spawn_status_refresh_task(refresher: Arc<StatusRefresher>) -> StatusRefreshTask {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            match refresher.refresh_all().await {
                Ok(RefreshOutcome::Completed { channels }) => {
                    debug!("Scheduled refresh covered {} channel(s)", channels);
                }
                Ok(RefreshOutcome::Skipped) => {
                    debug!("Scheduled refresh skipped; a manual refresh is running");
                }
                Err(e) => {
                    error!("Scheduled refresh failed: {}", e);
                }
            }

            let interval = refresher.prefs().refresh_interval();
            debug!("Next refresh in {:?}", interval);
            tokio::select! {
                _ = sleep(interval) => {}
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    StatusRefreshTask { shutdown_tx, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use twtw_common::models::PrefKey;
    use crate::test_utils::{FakeHost, ScriptedHttpClient};

    fn setup(rate: &str) -> (Arc<FakeHost>, Arc<ScriptedHttpClient>, Arc<StatusRefresher>) {
        let host = Arc::new(FakeHost::new());
        let http = Arc::new(ScriptedHttpClient::new());
        let refresher = Arc::new(StatusRefresher::new(host.clone(), http.clone()));
        refresher.prefs().init_defaults().expect("defaults");
        refresher.prefs().set(PrefKey::RefreshRate, rate).expect("set");
        refresher.prefs().set(PrefKey::LookupOfflineNames, "0").expect("set");
        host.open_channel("Twitch", "irc.chat.twitch.tv", "#foo");
        (host, http, refresher)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_cycle_runs_immediately_then_on_interval() {
        let (_host, http, refresher) = setup("60");
        http.respond("user_login=foo", r#"{"data":[]}"#);

        let task = spawn_status_refresh_task(refresher);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(http.request_count(), 1);

        sleep(Duration::from_secs(60)).await;
        assert_eq!(http.request_count(), 2);

        task.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_pending_cycle() {
        let (_host, http, refresher) = setup("10");
        http.respond("user_login=foo", r#"{"data":[]}"#);

        let task = spawn_status_refresh_task(refresher);
        sleep(Duration::from_secs(1)).await;
        let before = http.request_count();

        task.stop().await;
        sleep(Duration::from_secs(100)).await;
        assert_eq!(http.request_count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_ends_loop() {
        let (_host, http, refresher) = setup("10");
        http.respond("user_login=foo", r#"{"data":[]}"#);

        let task = spawn_status_refresh_task(refresher.clone());
        sleep(Duration::from_secs(1)).await;
        assert_eq!(http.request_count(), 1);

        drop(task);
        sleep(Duration::from_secs(100)).await;
        assert_eq!(http.request_count(), 1);
        assert_eq!(Arc::strong_count(&refresher), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cycle_keeps_schedule() {
        let (_host, http, refresher) = setup("5");
        http.fail("user_login=foo", "timed out");

        let task = spawn_status_refresh_task(refresher);
        sleep(Duration::from_secs(11)).await;
        assert_eq!(http.request_count(), 3);
        assert!(!task.is_finished());

        task.stop().await;
    }
}
