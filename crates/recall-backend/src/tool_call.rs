// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool-call implementation of [`MemoryBackend`].
//!
//! Operations are named remote procedures dispatched through a
//! [`ToolCaller`] the host installs with [`ToolCallAdapter::set_caller`].
//! Until then every operation fails with [`RecallError::Config`] before any
//! I/O. The tool surface has no delete procedure.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use recall_config::model::MemoryConfig;
use recall_core::{
    AddOptions, AddResponse, BackendKind, ListOptions, ListResponse, MemoryBackend, MemoryItem,
    ProfileResult, RecallError, ScopeContext, SearchOptions, SearchResponse, Sector, ToolCaller,
};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

use crate::deadline::{bounded, REQUEST_TIMEOUT};
use crate::normalize::{apply_threshold, items, tool_memory, tool_payload};
use crate::profile::{fetch_limit, partition_by_salience, DEFAULT_PROFILE_QUERY};
use crate::scope::scope_tag;

pub const TOOL_QUERY: &str = "memory_query";
pub const TOOL_STORE: &str = "memory_store";
pub const TOOL_LIST: &str = "memory_list";
pub const TOOL_GET: &str = "memory_get";
pub const TOOL_REINFORCE: &str = "memory_reinforce";

const DEFAULT_SEARCH_LIMIT: usize = 10;
const DEFAULT_LIST_LIMIT: usize = 20;

/// Memory backend reached through host-dispatched tool calls.
///
/// Profiles are partitioned by salience.
pub struct ToolCallAdapter {
    caller: RwLock<Option<Arc<dyn ToolCaller>>>,
    tag_prefix: String,
    similarity_threshold: f64,
    default_sector: Sector,
    max_profile_items: usize,
    timeout: Duration,
}

impl ToolCallAdapter {
    /// An adapter with no dispatcher installed yet.
    pub fn new(memory: &MemoryConfig) -> Self {
        Self {
            caller: RwLock::new(None),
            tag_prefix: memory.container_tag_prefix.clone(),
            similarity_threshold: memory.similarity_threshold,
            default_sector: Sector::from_backend(Some(&memory.default_sector)),
            max_profile_items: memory.max_profile_items,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-call bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Install (or replace) the dispatcher. Takes effect on the next call.
    pub fn set_caller(&self, caller: Arc<dyn ToolCaller>) {
        let mut slot = self.caller.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(caller);
        info!("tool-call dispatcher installed");
    }

    pub fn is_configured(&self) -> bool {
        self.caller
            .read()
            .map(|slot| slot.is_some())
            .unwrap_or_else(|e| e.into_inner().is_some())
    }

    fn caller(&self) -> Result<Arc<dyn ToolCaller>, RecallError> {
        let slot = self.caller.read().unwrap_or_else(|e| e.into_inner());
        slot.clone().ok_or_else(|| {
            RecallError::Config("tool-call dispatcher not configured; call set_caller first".into())
        })
    }

    fn tag(&self, scope: &ScopeContext) -> String {
        scope_tag(&self.tag_prefix, scope)
    }

    async fn call(&self, tool: &str, args: Value) -> Result<Value, RecallError> {
        let caller = self.caller()?;
        debug!(tool, "dispatching tool call");
        let result = bounded(self.timeout, caller.call(tool, args)).await?;
        Ok(tool_payload(result))
    }

    async fn query(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<Vec<MemoryItem>, RecallError> {
        let mut args = Map::new();
        args.insert("query".into(), json!(query));
        args.insert(
            "k".into(),
            json!(options.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)),
        );
        args.insert("user_id".into(), json!(self.tag(scope)));
        if let Some(min) = options.min_salience {
            args.insert("min_salience".into(), json!(min));
        }
        if let Some(sector) = options.sector {
            args.insert("sector".into(), json!(sector));
        }

        let payload = self.call(TOOL_QUERY, Value::Object(args)).await?;
        Ok(items(&payload, &["matches", "results", "memories"])
            .iter()
            .map(tool_memory)
            .collect())
    }
}

#[async_trait]
impl MemoryBackend for ToolCallAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::ToolCall
    }

    async fn search_memories(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<SearchResponse, RecallError> {
        let results = apply_threshold(
            self.query(query, scope, options).await?,
            self.similarity_threshold,
        );
        Ok(SearchResponse {
            total: results.len(),
            results,
        })
    }

    async fn add_memory(
        &self,
        content: &str,
        scope: &ScopeContext,
        options: &AddOptions,
    ) -> Result<AddResponse, RecallError> {
        let mut args = Map::new();
        args.insert("content".into(), json!(content));
        args.insert("user_id".into(), json!(self.tag(scope)));
        args.insert("tags".into(), json!(options.tags));
        if let Some(memory_type) = &options.memory_type {
            args.insert("type".into(), json!(memory_type));
        }
        if let Some(metadata) = &options.metadata {
            args.insert("metadata".into(), metadata.clone());
        }

        let payload = self.call(TOOL_STORE, Value::Object(args)).await?;
        let stored = tool_memory(&payload);
        let sector = payload
            .get("primary_sector")
            .or_else(|| payload.get("sector"))
            .and_then(Value::as_str)
            .map(|_| stored.sector)
            .unwrap_or(self.default_sector);

        Ok(AddResponse {
            id: Some(stored.id).filter(|id| !id.is_empty()),
            sector: Some(sector),
        })
    }

    async fn list_memories(
        &self,
        scope: &ScopeContext,
        options: &ListOptions,
    ) -> Result<ListResponse, RecallError> {
        let mut args = Map::new();
        args.insert("user_id".into(), json!(self.tag(scope)));
        args.insert(
            "limit".into(),
            json!(options.limit.unwrap_or(DEFAULT_LIST_LIMIT)),
        );
        args.insert("offset".into(), json!(options.offset.unwrap_or(0)));
        if let Some(sector) = options.sector {
            args.insert("sector".into(), json!(sector));
        }

        let payload = self.call(TOOL_LIST, Value::Object(args)).await?;
        let memories: Vec<MemoryItem> = items(&payload, &["items", "memories", "results"])
            .iter()
            .map(tool_memory)
            .collect();
        let total = payload
            .get("total")
            .and_then(Value::as_u64)
            .map(|n| n as usize);

        Ok(ListResponse { memories, total })
    }

    async fn delete_memory(&self, _id: &str, _scope: &ScopeContext) -> Result<(), RecallError> {
        // Fail before touching the dispatcher: no tool can delete.
        Err(RecallError::Unsupported {
            operation: "delete".into(),
            backend: BackendKind::ToolCall,
            hint: Some("reinforce the memory with a negative boost instead".into()),
        })
    }

    async fn reinforce_memory(&self, id: &str, boost: f64) -> Result<(), RecallError> {
        self.call(TOOL_REINFORCE, json!({ "id": id, "boost": boost }))
            .await?;
        Ok(())
    }

    async fn get_memory(
        &self,
        id: &str,
        scope: &ScopeContext,
    ) -> Result<Option<MemoryItem>, RecallError> {
        let payload = self
            .call(TOOL_GET, json!({ "id": id, "user_id": self.tag(scope) }))
            .await?;
        if payload.is_null() {
            return Ok(None);
        }
        Ok(Some(tool_memory(payload.get("memory").unwrap_or(&payload))))
    }

    async fn get_profile(
        &self,
        scope: &ScopeContext,
        query: Option<&str>,
    ) -> Result<ProfileResult, RecallError> {
        let options = SearchOptions {
            limit: Some(fetch_limit(self.max_profile_items)),
            ..Default::default()
        };
        let results = self
            .query(
                query.unwrap_or(DEFAULT_PROFILE_QUERY),
                &scope.to_user_scope(),
                &options,
            )
            .await?;
        Ok(partition_by_salience(&results, self.max_profile_items))
    }
}
