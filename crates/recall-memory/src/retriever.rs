// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-turn retrieval fan-out.
//!
//! Three calls run concurrently: the user profile, a free-text search in
//! user scope, and a listing of the current project. A failed call leaves
//! its slot empty and is logged; the other two still complete.

use std::sync::Arc;

use recall_config::model::MemoryConfig;
use recall_core::{
    ListOptions, MemoryBackend, MemoryItem, ProfileResult, ScopeContext, SearchOptions,
};
use tracing::{debug, warn};

/// What the first turn of a session retrieved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedContext {
    pub profile: ProfileResult,
    pub user_memories: Vec<MemoryItem>,
    pub project_memories: Vec<MemoryItem>,
}

impl RetrievedContext {
    pub fn is_empty(&self) -> bool {
        self.profile.is_empty() && self.user_memories.is_empty() && self.project_memories.is_empty()
    }
}

/// Rank key: relevance when scored, else salience. Unranked sorts last.
pub fn rank(item: &MemoryItem) -> f64 {
    item.score.or(item.salience).unwrap_or(f64::NEG_INFINITY)
}

/// Order listed memories like search results, best first.
///
/// Listings carry no relevance score, so salience stands in. The stored
/// fields are left untouched so the formatter can still label salience as
/// such. Ties keep listing order.
pub fn rank_by_salience(mut items: Vec<MemoryItem>) -> Vec<MemoryItem> {
    items.sort_by(|a, b| rank(b).total_cmp(&rank(a)));
    items
}

pub struct RetrievalOrchestrator {
    backend: Arc<dyn MemoryBackend>,
    max_memories: usize,
    max_project_memories: usize,
    min_salience: f64,
}

impl RetrievalOrchestrator {
    pub fn new(backend: Arc<dyn MemoryBackend>, config: &MemoryConfig) -> Self {
        Self {
            backend,
            max_memories: config.max_memories,
            max_project_memories: config.max_project_memories,
            min_salience: config.min_salience,
        }
    }

    /// Run the three retrievals for `query` and the caller's `scope`.
    ///
    /// Never fails: a slot whose call failed comes back empty.
    pub async fn retrieve(&self, query: &str, scope: &ScopeContext) -> RetrievedContext {
        let user_scope = scope.to_user_scope();
        let search_options = SearchOptions {
            limit: Some(self.max_memories),
            min_salience: Some(self.min_salience),
            sector: None,
        };
        let list_options = ListOptions {
            limit: Some(self.max_project_memories),
            ..Default::default()
        };

        let profile = self.backend.get_profile(&user_scope, None);
        let search = self
            .backend
            .search_memories(query, &user_scope, &search_options);
        let listing = async {
            match scope.project_id {
                Some(_) => self.backend.list_memories(scope, &list_options).await.map(Some),
                None => Ok(None),
            }
        };

        let (profile, search, listing) = tokio::join!(profile, search, listing);

        let profile = profile.unwrap_or_else(|e| {
            warn!(error = %e, "profile retrieval failed, continuing without it");
            ProfileResult::default()
        });
        let user_memories = search.map(|r| r.results).unwrap_or_else(|e| {
            warn!(error = %e, "user memory search failed, continuing without it");
            Vec::new()
        });
        let project_memories = match listing {
            Ok(Some(list)) => rank_by_salience(list.memories),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "project memory listing failed, continuing without it");
                Vec::new()
            }
        };

        debug!(
            backend = %self.backend.kind(),
            static_facts = profile.static_facts.len(),
            dynamic_facts = profile.dynamic_facts.len(),
            user = user_memories.len(),
            project = project_memories.len(),
            "first-turn retrieval complete"
        );

        RetrievedContext {
            profile,
            user_memories,
            project_memories,
        }
    }
}
