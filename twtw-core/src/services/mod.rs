// File: src/services/mod.rs

pub mod command_service;
pub mod status_refresher;

pub use command_service::CommandService;
pub use status_refresher::{AppliedChanges, RefreshOutcome, StatusRefresher};
