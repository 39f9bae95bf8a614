// File: twtw-core/src/test_utils/scripted_http.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio::sync::Notify;

use crate::Error;
use crate::http::HttpClient;

struct Route {
    needle: String,
    reply: Result<String, String>,
    /// When set, the reply is held back until the test notifies it.
    gate: Option<Arc<Notify>>,
}

/// One recorded GET.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
}

/// `HttpClient` that answers from a table of URL substrings.
///
/// The first route whose needle occurs in the requested URL wins. A URL no
/// route matches fails with `Error::Api`, like a real endpoint would for a
/// request the test did not plan for.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, needle: &str, reply: Result<String, String>, gate: Option<Arc<Notify>>) {
        self.routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Route {
                needle: needle.to_string(),
                reply,
                gate,
            });
    }

    pub fn respond(&self, needle: &str, body: &str) -> &Self {
        self.push(needle, Ok(body.to_string()), None);
        self
    }

    pub fn fail(&self, needle: &str, message: &str) -> &Self {
        self.push(needle, Err(message.to_string()), None);
        self
    }

    /// Like `respond`, but each matching request waits until the returned
    /// `Notify` is signalled. Keeps a refresh cycle in flight for as long as
    /// a test needs.
    pub fn respond_after(&self, needle: &str, body: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.push(needle, Ok(body.to_string()), Some(gate.clone()));
        gate
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<String, Error> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest { url: url.clone(), headers });

        let matched = self
            .routes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|route| url.contains(route.needle.as_str()))
            .map(|route| (route.reply.clone(), route.gate.clone()));

        let Some((reply, gate)) = matched else {
            return Err(Error::Api(format!("no scripted response for {}", url)));
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        reply.map_err(Error::Api)
    }
}
