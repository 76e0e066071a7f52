// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock tool-call dispatcher for deterministic testing.
//!
//! `MockToolCaller` implements `ToolCaller` with replies queued per tool
//! name and records every call it receives.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use recall_core::{RecallError, ToolCaller};
use serde_json::{json, Value};
use tokio::sync::Mutex;

enum Reply {
    Value(Value),
    Error(String),
}

/// A dispatcher that answers from per-tool FIFO queues.
///
/// When a tool's queue is empty the reply is `{}`.
#[derive(Default)]
pub struct MockToolCaller {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Value)>>,
    delay: Option<Duration>,
}

impl MockToolCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply for `tool`.
    pub async fn respond(&self, tool: &str, value: Value) {
        self.push(tool, Reply::Value(value)).await;
    }

    /// Queue a failure for `tool`.
    pub async fn fail(&self, tool: &str, message: &str) {
        self.push(tool, Reply::Error(message.to_string())).await;
    }

    async fn push(&self, tool: &str, reply: Reply) {
        self.replies
            .lock()
            .await
            .entry(tool.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Every `(tool, args)` pair received, in order.
    pub async fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().await.clone()
    }

    /// Arguments of the most recent call to `tool`.
    pub async fn last_args(&self, tool: &str) -> Option<Value> {
        self.calls
            .lock()
            .await
            .iter()
            .rev()
            .find(|(name, _)| name == tool)
            .map(|(_, args)| args.clone())
    }
}

#[async_trait]
impl ToolCaller for MockToolCaller {
    async fn call(&self, tool: &str, args: Value) -> Result<Value, RecallError> {
        self.calls.lock().await.push((tool.to_string(), args));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .await
            .get_mut(tool)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Value(value)) => Ok(value),
            Some(Reply::Error(message)) => Err(RecallError::Transport {
                message,
                status: None,
            }),
            None => Ok(json!({})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_per_tool_fifo() {
        let caller = MockToolCaller::new();
        caller.respond("memory_query", json!({"n": 1})).await;
        caller.respond("memory_query", json!({"n": 2})).await;
        caller.fail("memory_store", "down").await;

        assert_eq!(caller.call("memory_query", json!({})).await.unwrap()["n"], 1);
        assert!(caller.call("memory_store", json!({})).await.is_err());
        assert_eq!(caller.call("memory_query", json!({})).await.unwrap()["n"], 2);
        assert_eq!(caller.call("memory_query", json!({})).await.unwrap(), json!({}));
        assert_eq!(caller.calls().await.len(), 4);
    }
}
