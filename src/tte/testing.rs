// In-memory transport for tests.
// Serves canned bodies per path (and optionally per page) and records every call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{BuddyError, Result};

use super::client::Transport;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Fail(String),
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    replies: HashMap<(String, Option<u64>), Reply>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Body served for any request to `path` without a more specific page reply.
    pub fn with_response(mut self, path: &str, body: &str) -> Self {
        self.replies
            .insert((path.to_string(), None), Reply::Body(body.to_string()));
        self
    }

    /// Body served for `_page_number=page` on `path`.
    pub fn with_page(mut self, path: &str, page: u64, body: &str) -> Self {
        self.replies
            .insert((path.to_string(), Some(page)), Reply::Body(body.to_string()));
        self
    }

    /// Simulate a network failure for `_page_number=page` on `path`.
    pub fn with_failure(mut self, path: &str, page: u64) -> Self {
        self.replies.insert(
            (path.to_string(), Some(page)),
            Reply::Fail(format!("connection reset fetching {path} page {page}")),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn reply(&self, method: &'static str, path: &str, params: &[(&str, String)]) -> Result<String> {
        let request = RecordedRequest {
            method,
            path: path.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        let page = request.param("_page_number").and_then(|p| p.parse().ok());
        self.requests.lock().unwrap().push(request);

        let reply = self
            .replies
            .get(&(path.to_string(), page))
            .or_else(|| self.replies.get(&(path.to_string(), None)));

        match reply {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Fail(message)) => Err(BuddyError::Other(message.clone())),
            None => Err(BuddyError::Other(format!("no canned response for {path}"))),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        self.reply("GET", path, params)
    }

    async fn post(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        self.reply("POST", path, params)
    }
}
