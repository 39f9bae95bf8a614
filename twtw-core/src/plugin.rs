//! src/plugin.rs
//!
//! The object a host creates once per load. It owns the refresher, the
//! command service and the background refresh task, and maps the host's
//! lifecycle callbacks (load, join, command, unload) onto them.

use std::sync::Arc;
use tracing::{error, info};

use twtw_common::traits::Host;
use crate::Error;
use crate::http::HttpClient;
use crate::services::{CommandService, StatusRefresher};
use crate::tasks::{StatusRefreshTask, spawn_status_refresh_task};

pub const PLUGIN_NAME: &str = "Twitch Tweaks";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PLUGIN_DESCRIPTION: &str =
    "Do Twitch better. Mirrors stream status into channel topics and tab names.";

pub struct TwitchTweaks {
    host: Arc<dyn Host>,
    refresher: Arc<StatusRefresher>,
    commands: CommandService,
    task: Option<StatusRefreshTask>,
}

impl TwitchTweaks {
    pub fn new(host: Arc<dyn Host>, http: Arc<dyn HttpClient>) -> Self {
        let refresher = Arc::new(StatusRefresher::new(host.clone(), http));
        let commands = CommandService::new(refresher.clone());
        Self {
            host,
            refresher,
            commands,
            task: None,
        }
    }

    pub fn refresher(&self) -> &Arc<StatusRefresher> {
        &self.refresher
    }

    /// Seeds preference defaults and starts the refresh loop. Must be called
    /// from inside a Tokio runtime.
    pub fn load(&mut self) -> Result<(), Error> {
        self.refresher.prefs().init_defaults()?;
        self.start();
        self.host
            .print(&format!("{} version {} loaded", PLUGIN_NAME, PLUGIN_VERSION));
        info!("{} {} loaded", PLUGIN_NAME, PLUGIN_VERSION);
        Ok(())
    }

    /// Starts the refresh loop if it is not already running.
    pub fn start(&mut self) {
        if self.task.is_none() {
            self.task = Some(spawn_status_refresh_task(self.refresher.clone()));
        }
    }

    /// Stops the refresh loop and waits for it to exit.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.stop().await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// "You Join" callback. Refreshes the joined channel if its connection
    /// host belongs to the platform; returns whether it did.
    pub async fn on_join(&self, server: &str, host_name: &str, channel: &str) -> bool {
        if !self.refresher.is_platform_host(host_name) {
            return false;
        }
        match self.refresher.refresh_one(server, channel).await {
            Ok(status) => {
                info!("Joined {} (online={})", channel, status.online);
            }
            Err(e) => {
                error!("Could not refresh {} after join: {}", channel, e);
                self.host
                    .print(&format!("{}: could not refresh {}: {}", PLUGIN_NAME, channel, e));
            }
        }
        true
    }

    /// Runs one of our commands and prints its output. Returns false for
    /// commands that belong to someone else.
    pub async fn handle_command(&self, line: &str) -> bool {
        match self.commands.dispatch(line).await {
            Some(output) => {
                for text in output.lines() {
                    self.host.print(text);
                }
                true
            }
            None => false,
        }
    }

    /// Unload callback: the refresh loop must be gone before the host tears
    /// down its contexts.
    pub async fn unload(&mut self) {
        self.stop().await;
        info!("{} unloaded", PLUGIN_NAME);
    }
}
