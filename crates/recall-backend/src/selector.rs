// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport selection with per-call fallback.
//!
//! The tool-call transport wins whenever a dispatcher is installed. Otherwise
//! calls go to a REST adapter, built from configuration on first need and
//! reused afterwards. The check runs on every call, so installing a
//! dispatcher mid-process switches subsequent calls immediately.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use recall_config::model::RecallConfig;
use recall_core::{
    AddOptions, AddResponse, BackendKind, ListOptions, ListResponse, MemoryBackend, MemoryItem,
    ProfileResult, RecallError, ScopeContext, SearchOptions, SearchResponse, ToolCaller,
};
use tokio::sync::OnceCell;
use tracing::info;

use crate::rest::RestAdapter;
use crate::tool_call::ToolCallAdapter;

/// The process-wide backend handle.
///
/// Construct once per process and share behind an `Arc`.
pub struct BackendSelector {
    config: RecallConfig,
    tool_call: ToolCallAdapter,
    rest: OnceCell<RestAdapter>,
    last_kind: Mutex<Option<BackendKind>>,
}

impl BackendSelector {
    pub fn new(config: RecallConfig) -> Self {
        let tool_call = ToolCallAdapter::new(&config.memory);
        Self {
            config,
            tool_call,
            rest: OnceCell::new(),
            last_kind: Mutex::new(None),
        }
    }

    /// Replace the tool-call adapter (e.g. one with a shorter timeout).
    pub fn with_tool_call(mut self, adapter: ToolCallAdapter) -> Self {
        self.tool_call = adapter;
        self
    }

    /// Pre-build the REST fallback instead of deriving it from configuration.
    pub fn with_rest(self, adapter: RestAdapter) -> Self {
        let _ = self.rest.set(adapter);
        self
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    /// Install the host's dispatcher on the tool-call transport.
    pub fn set_caller(&self, caller: Arc<dyn ToolCaller>) {
        self.tool_call.set_caller(caller);
    }

    fn note_kind(&self, kind: BackendKind) {
        let mut last = self.last_kind.lock().unwrap_or_else(|e| e.into_inner());
        if *last != Some(kind) {
            info!(backend = %kind, "memory backend selected");
            *last = Some(kind);
        }
    }

    /// The transport serving the next call.
    pub async fn active(&self) -> Result<&dyn MemoryBackend, RecallError> {
        if self.tool_call.is_configured() {
            self.note_kind(BackendKind::ToolCall);
            return Ok(&self.tool_call);
        }
        let rest = self
            .rest
            .get_or_try_init(|| async { RestAdapter::from_config(&self.config) })
            .await?;
        self.note_kind(BackendKind::Rest);
        Ok(rest)
    }
}

#[async_trait]
impl MemoryBackend for BackendSelector {
    fn kind(&self) -> BackendKind {
        if self.tool_call.is_configured() {
            BackendKind::ToolCall
        } else {
            BackendKind::Rest
        }
    }

    async fn search_memories(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<SearchResponse, RecallError> {
        self.active()
            .await?
            .search_memories(query, scope, options)
            .await
    }

    async fn add_memory(
        &self,
        content: &str,
        scope: &ScopeContext,
        options: &AddOptions,
    ) -> Result<AddResponse, RecallError> {
        self.active().await?.add_memory(content, scope, options).await
    }

    async fn list_memories(
        &self,
        scope: &ScopeContext,
        options: &ListOptions,
    ) -> Result<ListResponse, RecallError> {
        self.active().await?.list_memories(scope, options).await
    }

    async fn delete_memory(&self, id: &str, scope: &ScopeContext) -> Result<(), RecallError> {
        self.active().await?.delete_memory(id, scope).await
    }

    async fn reinforce_memory(&self, id: &str, boost: f64) -> Result<(), RecallError> {
        self.active().await?.reinforce_memory(id, boost).await
    }

    async fn get_memory(
        &self,
        id: &str,
        scope: &ScopeContext,
    ) -> Result<Option<MemoryItem>, RecallError> {
        self.active().await?.get_memory(id, scope).await
    }

    async fn get_profile(
        &self,
        scope: &ScopeContext,
        query: Option<&str>,
    ) -> Result<ProfileResult, RecallError> {
        self.active().await?.get_profile(scope, query).await
    }
}
