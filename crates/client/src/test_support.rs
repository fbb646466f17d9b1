//! In-memory transport for exercising pagination, counting, and update
//! flows without a live API.

use crate::error::{ClientError, Result};
use crate::fetch::Transport;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Scripted transport: queued responses per path, with an optional repeating
/// response for never-exhausting page sequences. Every call is recorded.
#[derive(Default)]
pub struct MockTransport {
    gets: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
    repeat_gets: Mutex<HashMap<String, Value>>,
    patch_response: Mutex<Option<Value>>,
    get_log: Mutex<Vec<(String, Vec<(String, String)>)>>,
    patch_log: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_get(&self, path: &str, response: Result<Value>) {
        self.gets
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    /// Serve `response` for every GET on `path` once the queue is empty.
    pub fn repeat_get(&self, path: &str, response: Value) {
        self.repeat_gets
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
    }

    pub fn set_patch_response(&self, response: Value) {
        *self.patch_response.lock().unwrap() = Some(response);
    }

    /// Query pairs of every recorded GET against `path`, in call order.
    pub fn get_calls(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.get_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == path)
            .map(|(_, query)| query.clone())
            .collect()
    }

    pub fn patch_calls(&self) -> Vec<(String, Value)> {
        self.patch_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        self.get_log
            .lock()
            .unwrap()
            .push((path.to_string(), query.to_vec()));

        if let Some(queue) = self.gets.lock().unwrap().get_mut(path) {
            if let Some(response) = queue.pop_front() {
                return response;
            }
        }
        if let Some(repeated) = self.repeat_gets.lock().unwrap().get(path) {
            return Ok(repeated.clone());
        }
        Err(ClientError::UpstreamStatus {
            status: 404,
            detail: format!("no scripted response for {path}"),
        })
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.patch_log
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        Ok(self.patch_response.lock().unwrap().clone().unwrap_or(body))
    }
}

/// Build a listing body in the upstream page shape.
pub fn page_body(items: Vec<Value>, has_more: bool, next_cursor: Option<&str>) -> Value {
    let mut body = json!({"items": items, "has_more": has_more});
    if let Some(cursor) = next_cursor {
        body["next_cursor"] = json!(cursor);
    }
    body
}
