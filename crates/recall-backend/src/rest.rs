// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST implementation of [`MemoryBackend`].

use async_trait::async_trait;
use chrono::Utc;
use recall_config::model::{MemoryConfig, RecallConfig};
use recall_core::{
    AddOptions, AddResponse, BackendKind, ListOptions, ListResponse, MemoryBackend, MemoryItem,
    ProfileResult, RecallError, ScopeContext, SearchOptions, SearchResponse, Sector,
};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::http::RestTransport;
use crate::normalize::{apply_threshold, items, rest_memory};
use crate::profile::{fetch_limit, partition_by_age, DEFAULT_PROFILE_QUERY};
use crate::scope::scope_tag;

/// Search size when the caller gives no limit.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Listing size when the caller gives no limit.
const DEFAULT_LIST_LIMIT: usize = 20;

/// Memory backend reached over HTTP.
///
/// Profiles are partitioned by memory age.
#[derive(Debug, Clone)]
pub struct RestAdapter {
    transport: RestTransport,
    tag_prefix: String,
    similarity_threshold: f64,
    default_sector: Sector,
    max_profile_items: usize,
}

impl RestAdapter {
    pub fn new(transport: RestTransport, memory: &MemoryConfig) -> Self {
        Self {
            transport,
            tag_prefix: memory.container_tag_prefix.clone(),
            similarity_threshold: memory.similarity_threshold,
            default_sector: Sector::from_backend(Some(&memory.default_sector)),
            max_profile_items: memory.max_profile_items,
        }
    }

    pub fn from_config(config: &RecallConfig) -> Result<Self, RecallError> {
        let transport = RestTransport::from_config(&config.backend)?;
        Ok(Self::new(transport, &config.memory))
    }

    pub fn transport(&self) -> &RestTransport {
        &self.transport
    }

    fn tag(&self, scope: &ScopeContext) -> String {
        scope_tag(&self.tag_prefix, scope)
    }

    /// Search without the similarity threshold.
    async fn query(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<Vec<MemoryItem>, RecallError> {
        let mut filters = Map::new();
        filters.insert("user_id".into(), json!(self.tag(scope)));
        if let Some(min) = options.min_salience {
            filters.insert("min_salience".into(), json!(min));
        }
        if let Some(sector) = options.sector {
            filters.insert("sector".into(), json!(sector));
        }

        let body = json!({
            "query": query,
            "k": options.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            "filters": filters,
        });
        let payload = self.transport.post(&["memory", "query"], &body).await?;
        Ok(items(&payload, &["matches", "results", "memories"])
            .iter()
            .map(rest_memory)
            .collect())
    }
}

#[async_trait]
impl MemoryBackend for RestAdapter {
    fn kind(&self) -> BackendKind {
        BackendKind::Rest
    }

    async fn search_memories(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<SearchResponse, RecallError> {
        let raw = self.query(query, scope, options).await?;
        let fetched = raw.len();
        let results = apply_threshold(raw, self.similarity_threshold);
        debug!(
            scope = %scope.kind(),
            fetched,
            kept = results.len(),
            "rest search complete"
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
        let mut metadata = match &options.metadata {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                let mut map = Map::new();
                map.insert("data".into(), other.clone());
                map
            }
            None => Map::new(),
        };
        if let Some(memory_type) = &options.memory_type {
            metadata.insert("type".into(), json!(memory_type));
        }
        if let Some(project) = &scope.project_id {
            metadata.insert("project_id".into(), json!(project));
        }

        let body = json!({
            "content": content,
            "tags": options.tags,
            "metadata": metadata,
            "user_id": self.tag(scope),
        });
        let payload = self.transport.post(&["memory", "add"], &body).await?;

        let id = payload
            .get("id")
            .and_then(|v| v.as_str().map(String::from).or_else(|| v.as_i64().map(|n| n.to_string())));
        let sector = payload
            .get("primary_sector")
            .or_else(|| payload.get("sector"))
            .and_then(Value::as_str)
            .map(|s| Sector::from_backend(Some(s)))
            .unwrap_or(self.default_sector);

        Ok(AddResponse {
            id,
            sector: Some(sector),
        })
    }

    async fn list_memories(
        &self,
        scope: &ScopeContext,
        options: &ListOptions,
    ) -> Result<ListResponse, RecallError> {
        let mut query = vec![
            ("user_id", self.tag(scope)),
            ("l", options.limit.unwrap_or(DEFAULT_LIST_LIMIT).to_string()),
            ("u", options.offset.unwrap_or(0).to_string()),
        ];
        if let Some(sector) = options.sector {
            query.push(("sector", sector.to_string()));
        }

        let payload = self.transport.get(&["memory", "all"], &query).await?;
        let memories: Vec<MemoryItem> = items(&payload, &["items", "memories"])
            .iter()
            .map(rest_memory)
            .collect();
        let total = payload
            .get("total")
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .or(Some(memories.len()));

        Ok(ListResponse { memories, total })
    }

    async fn delete_memory(&self, id: &str, scope: &ScopeContext) -> Result<(), RecallError> {
        self.transport
            .delete(&["memory", id], &[("user_id", self.tag(scope))])
            .await?;
        Ok(())
    }

    async fn reinforce_memory(&self, id: &str, boost: f64) -> Result<(), RecallError> {
        self.transport
            .post(&["memory", "reinforce"], &json!({ "id": id, "boost": boost }))
            .await?;
        Ok(())
    }

    async fn get_memory(
        &self,
        id: &str,
        scope: &ScopeContext,
    ) -> Result<Option<MemoryItem>, RecallError> {
        let payload = self
            .transport
            .get_optional(&["memory", id], &[("user_id", self.tag(scope))])
            .await?;
        Ok(payload
            .filter(|v| !v.is_null())
            .map(|v| rest_memory(v.get("memory").unwrap_or(&v))))
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
        Ok(partition_by_age(&results, Utc::now(), self.max_profile_items))
    }
}
