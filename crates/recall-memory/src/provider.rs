// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-turn memory injection.
//!
//! `MemoryContext` is the single per-process object owning the backend
//! handle and the set of sessions already injected. Construct it once at
//! startup and share it; the injected set lives in memory only, so a
//! restart injects again on the next first turn.

use std::collections::HashSet;
use std::sync::Arc;

use recall_config::model::MemoryConfig;
use recall_core::{MemoryBackend, ScopeContext};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::formatter::ContextFormatter;
use crate::retriever::RetrievalOrchestrator;

pub struct MemoryContext {
    orchestrator: RetrievalOrchestrator,
    formatter: ContextFormatter,
    injected: Mutex<HashSet<String>>,
}

impl MemoryContext {
    pub fn new(backend: Arc<dyn MemoryBackend>, config: &MemoryConfig) -> Self {
        Self {
            orchestrator: RetrievalOrchestrator::new(backend, config),
            formatter: ContextFormatter::new(config),
            injected: Mutex::new(HashSet::new()),
        }
    }

    /// The context block for `session_id`'s first turn.
    ///
    /// Returns `None` when the session was already handled or nothing
    /// relevant was found. The session is marked before retrieval starts, so
    /// concurrent first turns of one session inject at most once.
    pub async fn first_turn_context(
        &self,
        session_id: &str,
        query: &str,
        scope: &ScopeContext,
    ) -> Option<String> {
        if !self.injected.lock().await.insert(session_id.to_string()) {
            debug!(session_id, "session already injected");
            return None;
        }

        let retrieved = self.orchestrator.retrieve(query, scope).await;
        let block = self.formatter.format(&retrieved);
        if block.is_empty() {
            debug!(session_id, "no memories to inject");
            return None;
        }
        info!(session_id, bytes = block.len(), "injecting memory context");
        Some(block)
    }

    pub async fn was_injected(&self, session_id: &str) -> bool {
        self.injected.lock().await.contains(session_id)
    }
}
