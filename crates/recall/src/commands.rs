// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory subcommands. The verbs go through the command router so the CLI
//! and host integrations share one surface; `get` and `context` call the
//! backend and the first-turn path directly.

use std::sync::Arc;

use clap::Subcommand;
use recall_config::model::MemoryConfig;
use recall_core::{CommandResult, MemoryBackend, ScopeContext, ScopeKind, Sector};
use recall_memory::{CommandArgs, CommandRouter, MemoryContext, Verb};
use recall_security::PrivacyGate;
use serde_json::json;

#[derive(Subcommand, Debug)]
pub enum MemoryCommand {
    /// Store a memory.
    Add {
        content: String,
        /// `user` or `project` (default: project).
        #[arg(long)]
        scope: Option<ScopeKind>,
        /// Free-form memory type, e.g. `preference` or `decision`.
        #[arg(long = "type")]
        memory_type: Option<String>,
        /// Tag to attach; repeatable.
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Search memories in one scope, or both when no scope is given.
    Search {
        query: String,
        #[arg(long)]
        scope: Option<ScopeKind>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        sector: Option<Sector>,
    },
    /// Show the user profile.
    Profile {
        /// Narrow the profile to memories relevant to this query.
        query: Option<String>,
    },
    /// List memories, most recent first.
    List {
        #[arg(long)]
        scope: Option<ScopeKind>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        sector: Option<Sector>,
    },
    /// Delete a memory.
    Forget {
        memory_id: String,
        #[arg(long)]
        scope: Option<ScopeKind>,
    },
    /// Boost (or, with a negative value, decay) a memory's salience.
    Reinforce {
        memory_id: String,
        #[arg(long, allow_negative_numbers = true)]
        boost: Option<f64>,
    },
    /// List the command verbs.
    Commands,
}

impl MemoryCommand {
    /// The router verb and arguments for this command.
    fn into_call(self) -> (Verb, CommandArgs) {
        match self {
            Self::Add {
                content,
                scope,
                memory_type,
                tags,
            } => (
                Verb::Add,
                CommandArgs {
                    content: Some(content),
                    scope,
                    memory_type,
                    tags,
                    ..Default::default()
                },
            ),
            Self::Search {
                query,
                scope,
                limit,
                sector,
            } => (
                Verb::Search,
                CommandArgs {
                    query: Some(query),
                    scope,
                    limit,
                    sector,
                    ..Default::default()
                },
            ),
            Self::Profile { query } => (
                Verb::Profile,
                CommandArgs {
                    query,
                    ..Default::default()
                },
            ),
            Self::List {
                scope,
                limit,
                sector,
            } => (
                Verb::List,
                CommandArgs {
                    scope,
                    limit,
                    sector,
                    ..Default::default()
                },
            ),
            Self::Forget { memory_id, scope } => (
                Verb::Forget,
                CommandArgs {
                    memory_id: Some(memory_id),
                    scope,
                    ..Default::default()
                },
            ),
            Self::Reinforce { memory_id, boost } => (
                Verb::Reinforce,
                CommandArgs {
                    memory_id: Some(memory_id),
                    boost,
                    ..Default::default()
                },
            ),
            Self::Commands => (Verb::Help, CommandArgs::default()),
        }
    }
}

pub async fn run(
    command: MemoryCommand,
    backend: Arc<dyn MemoryBackend>,
    gate: PrivacyGate,
    config: &MemoryConfig,
    scope: &ScopeContext,
) -> CommandResult {
    let (verb, args) = command.into_call();
    let router = CommandRouter::new(backend, gate, config);
    router.execute(&verb.to_string(), &args, scope).await
}

/// Fetch one memory by id from the `kind` scope (default: project).
pub async fn get(
    backend: &dyn MemoryBackend,
    memory_id: &str,
    kind: Option<ScopeKind>,
    scope: &ScopeContext,
) -> CommandResult {
    let scope = scope.for_kind(kind.unwrap_or_default());
    match backend.get_memory(memory_id, &scope).await {
        Ok(Some(memory)) => CommandResult::ok(json!({ "memory": memory })),
        Ok(None) => CommandResult::err(format!("Memory {memory_id} not found")),
        Err(e) => e.into(),
    }
}

/// Run the first-turn injection path for `session` and report the block.
pub async fn preview_context(
    backend: Arc<dyn MemoryBackend>,
    config: &MemoryConfig,
    session: &str,
    query: &str,
    scope: &ScopeContext,
) -> CommandResult {
    let context = MemoryContext::new(backend, config);
    let block = context.first_turn_context(session, query, scope).await;
    CommandResult::ok(json!({
        "session": session,
        "injected": block.is_some(),
        "context": block.unwrap_or_default(),
    }))
}
