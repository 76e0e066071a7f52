// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The memory backend contract.

use async_trait::async_trait;

use crate::error::RecallError;
use crate::types::{
    AddOptions, AddResponse, BackendKind, ListOptions, ListResponse, MemoryItem, ProfileResult,
    ScopeContext, SearchOptions, SearchResponse,
};

/// Salience boost applied by `reinforce_memory` when the caller gives none.
pub const DEFAULT_REINFORCE_BOOST: f64 = 0.1;

/// One contract over every memory store transport.
///
/// Implementations never panic on expected failures (network, HTTP status,
/// timeout); they return a [`RecallError`] instead. Optional capabilities
/// default to [`RecallError::Unsupported`].
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Which transport this is.
    fn kind(&self) -> BackendKind;

    /// Free-text search within `scope`.
    async fn search_memories(
        &self,
        query: &str,
        scope: &ScopeContext,
        options: &SearchOptions,
    ) -> Result<SearchResponse, RecallError>;

    /// Store a new memory in `scope`.
    async fn add_memory(
        &self,
        content: &str,
        scope: &ScopeContext,
        options: &AddOptions,
    ) -> Result<AddResponse, RecallError>;

    /// List memories in `scope`, most recent first as the backend orders them.
    async fn list_memories(
        &self,
        scope: &ScopeContext,
        options: &ListOptions,
    ) -> Result<ListResponse, RecallError>;

    /// Delete a memory by id.
    async fn delete_memory(&self, id: &str, scope: &ScopeContext) -> Result<(), RecallError>;

    /// Boost a memory's salience.
    async fn reinforce_memory(&self, id: &str, boost: f64) -> Result<(), RecallError> {
        let _ = (id, boost);
        Err(RecallError::Unsupported {
            operation: "reinforce".into(),
            backend: self.kind(),
            hint: None,
        })
    }

    /// Fetch a single memory. `Ok(None)` when it does not exist.
    async fn get_memory(
        &self,
        id: &str,
        scope: &ScopeContext,
    ) -> Result<Option<MemoryItem>, RecallError> {
        let _ = (id, scope);
        Err(RecallError::Unsupported {
            operation: "get".into(),
            backend: self.kind(),
            hint: None,
        })
    }

    /// Build the user profile from user-scope memories.
    ///
    /// A failed retrieval is returned as an error, never as an empty profile.
    async fn get_profile(
        &self,
        scope: &ScopeContext,
        query: Option<&str>,
    ) -> Result<ProfileResult, RecallError>;
}
