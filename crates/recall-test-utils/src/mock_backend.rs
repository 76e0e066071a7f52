// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock memory backend for deterministic testing.
//!
//! `MockBackend` implements `MemoryBackend` with results scripted per scope
//! kind, optional per-operation failures, and a record of every write.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use recall_core::{
    AddOptions, AddResponse, BackendKind, ListOptions, ListResponse, MemoryBackend, MemoryItem,
    ProfileResult, RecallError, ScopeContext, ScopeKind, SearchOptions, SearchResponse, Sector,
};
use tokio::sync::Mutex;

/// A captured `add_memory` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAdd {
    pub content: String,
    pub scope: ScopeContext,
    pub memory_type: Option<String>,
    pub tags: Vec<String>,
}

/// A captured `search_memories` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    pub query: String,
    pub scope: ScopeContext,
    pub limit: Option<usize>,
}

#[derive(Default)]
struct Records {
    adds: Vec<RecordedAdd>,
    searches: Vec<RecordedSearch>,
    lists: Vec<(ScopeContext, Option<usize>)>,
    deleted: Vec<String>,
    reinforced: Vec<(String, f64)>,
    profiles: usize,
}

/// A backend answering from scripted data.
pub struct MockBackend {
    kind: BackendKind,
    search: HashMap<ScopeKind, Vec<MemoryItem>>,
    list: HashMap<ScopeKind, Vec<MemoryItem>>,
    profile: ProfileResult,
    failing_search: HashSet<ScopeKind>,
    failing_list: HashSet<ScopeKind>,
    failing_profile: bool,
    records: Mutex<Records>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            kind: BackendKind::Rest,
            search: HashMap::new(),
            list: HashMap::new(),
            profile: ProfileResult::default(),
            failing_search: HashSet::new(),
            failing_list: HashSet::new(),
            failing_profile: false,
            records: Mutex::new(Records::default()),
        }
    }

    pub fn with_kind(mut self, kind: BackendKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_search(mut self, scope: ScopeKind, items: Vec<MemoryItem>) -> Self {
        self.search.insert(scope, items);
        self
    }

    pub fn with_list(mut self, scope: ScopeKind, items: Vec<MemoryItem>) -> Self {
        self.list.insert(scope, items);
        self
    }

    pub fn with_profile(mut self, profile: ProfileResult) -> Self {
        self.profile = profile;
        self
    }

    pub fn failing_search(mut self, scope: ScopeKind) -> Self {
        self.failing_search.insert(scope);
        self
    }

    pub fn failing_list(mut self, scope: ScopeKind) -> Self {
        self.failing_list.insert(scope);
        self
    }

    pub fn failing_profile(mut self) -> Self {
        self.failing_profile = true;
        self
    }

    pub async fn adds(&self) -> Vec<RecordedAdd> {
        self.records.lock().await.adds.clone()
    }

    pub async fn searches(&self) -> Vec<RecordedSearch> {
        self.records.lock().await.searches.clone()
    }

    pub async fn lists(&self) -> Vec<(ScopeContext, Option<usize>)> {
        self.records.lock().await.lists.clone()
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.records.lock().await.deleted.clone()
    }

    pub async fn reinforced(&self) -> Vec<(String, f64)> {
        self.records.lock().await.reinforced.clone()
    }

    pub async fn profile_calls(&self) -> usize {
        self.records.lock().await.profiles
    }

    /// Total backend calls observed so far.
    pub async fn call_count(&self) -> usize {
        let r = self.records.lock().await;
        r.adds.len() + r.searches.len() + r.lists.len() + r.deleted.len() + r.reinforced.len()
            + r.profiles
    }

    fn unavailable(what: &str) -> RecallError {
        RecallError::Transport {
            message: format!("mock {what} failure"),
            status: Some(503),
        }
    }
}

fn truncate(items: &[MemoryItem], limit: Option<usize>) -> Vec<MemoryItem> {
    items
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .cloned()
        .collect()
}

#[async_trait]
impl MemoryBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn search_memories(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<SearchResponse, RecallError> {
        self.records.lock().await.searches.push(RecordedSearch {
            query: query.to_string(),
            scope: scope.clone(),
            limit: options.limit,
        });
        if self.failing_search.contains(&scope.kind()) {
            return Err(Self::unavailable("search"));
        }
        let results = truncate(
            self.search.get(&scope.kind()).map(Vec::as_slice).unwrap_or_default(),
            options.limit,
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
        let mut records = self.records.lock().await;
        records.adds.push(RecordedAdd {
            content: content.to_string(),
            scope: scope.clone(),
            memory_type: options.memory_type.clone(),
            tags: options.tags.clone(),
        });
        Ok(AddResponse {
            id: Some(format!("mem-{}", records.adds.len())),
            sector: Some(Sector::Semantic),
        })
    }

    async fn list_memories(
        &self,
        scope: &ScopeContext,
        options: &ListOptions,
    ) -> Result<ListResponse, RecallError> {
        self.records
            .lock()
            .await
            .lists
            .push((scope.clone(), options.limit));
        if self.failing_list.contains(&scope.kind()) {
            return Err(Self::unavailable("list"));
        }
        let memories = truncate(
            self.list.get(&scope.kind()).map(Vec::as_slice).unwrap_or_default(),
            options.limit,
        );
        Ok(ListResponse {
            total: Some(memories.len()),
            memories,
        })
    }

    async fn delete_memory(&self, id: &str, _scope: &ScopeContext) -> Result<(), RecallError> {
        self.records.lock().await.deleted.push(id.to_string());
        Ok(())
    }

    async fn reinforce_memory(&self, id: &str, boost: f64) -> Result<(), RecallError> {
        self.records
            .lock()
            .await
            .reinforced
            .push((id.to_string(), boost));
        Ok(())
    }

    async fn get_memory(
        &self,
        id: &str,
        scope: &ScopeContext,
    ) -> Result<Option<MemoryItem>, RecallError> {
        let kind = scope.kind();
        Ok(self
            .search
            .get(&kind)
            .into_iter()
            .chain(self.list.get(&kind))
            .flatten()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn get_profile(
        &self,
        _scope: &ScopeContext,
        _query: Option<&str>,
    ) -> Result<ProfileResult, RecallError> {
        self.records.lock().await.profiles += 1;
        if self.failing_profile {
            return Err(Self::unavailable("profile"));
        }
        Ok(self.profile.clone())
    }
}
