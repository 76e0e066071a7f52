// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat JSON envelope returned to the host for every command.
//!
//! Success: `{"success": true, ...payload}`.
//! Failure: `{"success": false, "error": "..."}`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::RecallError;

/// Outcome of a command, serialized as a flat JSON object.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Success(Map<String, Value>),
    Failure(String),
}

impl CommandResult {
    /// Wrap a payload. Object payloads are flattened into the envelope;
    /// anything else lands under `result`.
    pub fn ok(payload: impl Serialize) -> Self {
        match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => CommandResult::Success(map),
            Ok(Value::Null) => CommandResult::Success(Map::new()),
            Ok(other) => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                CommandResult::Success(map)
            }
            Err(e) => CommandResult::Failure(format!("failed to serialize result: {e}")),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        CommandResult::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }

    /// The envelope as a JSON value.
    pub fn to_value(&self) -> Value {
        match self {
            CommandResult::Success(payload) => {
                let mut map = payload.clone();
                map.insert("success".to_string(), Value::Bool(true));
                Value::Object(map)
            }
            CommandResult::Failure(error) => {
                let mut map = Map::new();
                map.insert("success".to_string(), Value::Bool(false));
                map.insert("error".to_string(), Value::String(error.clone()));
                Value::Object(map)
            }
        }
    }

    /// The envelope as a JSON string.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl From<RecallError> for CommandResult {
    fn from(e: RecallError) -> Self {
        CommandResult::Failure(e.to_string())
    }
}

impl<T: Serialize> From<Result<T, RecallError>> for CommandResult {
    fn from(result: Result<T, RecallError>) -> Self {
        match result {
            Ok(payload) => CommandResult::ok(payload),
            Err(e) => e.into(),
        }
    }
}
