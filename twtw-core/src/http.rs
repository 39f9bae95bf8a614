//! HTTP client abstraction layer for the Helix API
//!
//! The status refresher only ever issues authenticated GETs. Routing them
//! through a trait keeps the Helix code testable without real network
//! requests: unit tests use the generated `MockHttpClient`, integration
//! tests use `test_utils::ScriptedHttpClient`.
//!
//! # Example Usage:
//! ``
//! use std::sync::Arc;
//! use crate::http::{HttpClient, DefaultHttpClient};
//!
//! let http: Arc<dyn HttpClient> = Arc::new(DefaultHttpClient::new()?);
//! let body = http.get(url, headers).await?;
//! ``

use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use tracing::trace;
use crate::Error;

/// Requests that take longer than this fail the refresh cycle instead of
/// stalling it (and the plugin's unload) indefinitely.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A generic trait for making HTTP requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues a GET and returns the response body. Non-2xx statuses are errors.
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error> {
        trace!("GET {}", url);
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(response)
    }
}
