// File: twtw-core/src/test_utils/mod.rs
//
// Test doubles shared by unit tests and the integration tests under tests/.

pub mod fake_host;
pub mod scripted_http;

pub use fake_host::FakeHost;
pub use scripted_http::{RecordedRequest, ScriptedHttpClient};
