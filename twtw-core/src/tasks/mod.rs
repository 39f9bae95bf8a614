// twtw-core/src/tasks/mod.rs

pub mod status_refresh;

pub use status_refresh::{StatusRefreshTask, spawn_status_refresh_task};
