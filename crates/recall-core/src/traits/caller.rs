// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-supplied dispatcher for named remote procedures.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RecallError;

/// Invokes a named remote procedure with JSON arguments.
///
/// The host agent runtime owns the RPC surface; Recall only sees this
/// trait object, installed once through the tool-call adapter.
#[async_trait]
pub trait ToolCaller: Send + Sync {
    /// Calls `tool` with `args` and returns its JSON result.
    async fn call(&self, tool: &str, args: Value) -> Result<Value, RecallError>;
}
