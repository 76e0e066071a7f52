// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command surface: one verb plus loosely-typed arguments in, one flat
//! JSON envelope out.
//!
//! Required arguments are checked before any backend call. Failures of any
//! kind come back as `{"success": false, "error": ...}`; nothing panics or
//! escapes as an `Err`.

use std::str::FromStr;
use std::sync::Arc;

use recall_config::model::MemoryConfig;
use recall_core::traits::backend::DEFAULT_REINFORCE_BOOST;
use recall_core::{
    AddOptions, CommandResult, ListOptions, MemoryBackend, MemoryItem, RecallError,
    ScopeContext, ScopeKind, SearchOptions, Sector,
};
use recall_security::PrivacyGate;
use serde::Deserialize;
use serde_json::{json, Value};
use strum::{Display, EnumString, VariantNames};
use tracing::debug;

/// Results returned by `search` when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Memories returned by `list` when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 20;

const HELP: &str = "\
add        store a memory (content, scope?, type?, tags?)
search     search memories (query, scope?, limit?, sector?)
profile    show the user profile (query?)
list       list memories (scope?, limit?, sector?)
forget     delete a memory (memory_id, scope?)
reinforce  boost a memory's salience (memory_id, boost?)
help       show this message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, VariantNames)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Add,
    Search,
    Profile,
    List,
    Forget,
    Reinforce,
    Help,
}

/// Arguments accepted by every verb; each verb reads the ones it needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandArgs {
    pub content: Option<String>,
    pub query: Option<String>,
    pub scope: Option<ScopeKind>,
    #[serde(alias = "memoryId", alias = "id")]
    pub memory_id: Option<String>,
    pub limit: Option<usize>,
    pub tags: Vec<String>,
    #[serde(alias = "type")]
    pub memory_type: Option<String>,
    pub boost: Option<f64>,
    pub sector: Option<Sector>,
}

fn required<'a>(value: &'a Option<String>, name: &str, verb: Verb) -> Result<&'a str, RecallError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RecallError::Validation(format!("{name} is required for {verb}")))
}

fn positive(limit: Option<usize>, default: usize) -> Result<usize, RecallError> {
    match limit {
        Some(0) => Err(RecallError::Validation("limit must be at least 1".into())),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

/// Merge per-scope results by relevance score, best first. Unscored items
/// go last; equal scores keep input order.
pub fn merge_ranked(batches: Vec<Vec<MemoryItem>>, limit: usize) -> Vec<MemoryItem> {
    let mut merged: Vec<MemoryItem> = batches.into_iter().flatten().collect();
    let score = |item: &MemoryItem| item.score.unwrap_or(f64::NEG_INFINITY);
    merged.sort_by(|a, b| score(b).total_cmp(&score(a)));
    merged.truncate(limit);
    merged
}

pub struct CommandRouter {
    backend: Arc<dyn MemoryBackend>,
    gate: PrivacyGate,
    min_salience: f64,
}

impl CommandRouter {
    pub fn new(backend: Arc<dyn MemoryBackend>, gate: PrivacyGate, config: &MemoryConfig) -> Self {
        Self {
            backend,
            gate,
            min_salience: config.min_salience,
        }
    }

    /// Run `mode` with JSON `args` and return the serialized envelope.
    pub async fn execute_json(&self, mode: &str, args: Value, scope: &ScopeContext) -> String {
        let args = if args.is_null() {
            Ok(CommandArgs::default())
        } else {
            serde_json::from_value::<CommandArgs>(args)
                .map_err(|e| RecallError::Validation(format!("invalid arguments: {e}")))
        };
        let result = match args {
            Ok(args) => self.execute(mode, &args, scope).await,
            Err(e) => e.into(),
        };
        result.to_json()
    }

    pub async fn execute(&self, mode: &str, args: &CommandArgs, scope: &ScopeContext) -> CommandResult {
        let Ok(verb) = Verb::from_str(mode.trim()) else {
            return CommandResult::err(format!("Unknown mode: {mode}"));
        };
        debug!(verb = %verb, backend = %self.backend.kind(), "executing command");
        self.run(verb, args, scope).await.into()
    }

    async fn run(&self, verb: Verb, args: &CommandArgs, scope: &ScopeContext) -> Result<Value, RecallError> {
        match verb {
            Verb::Add => self.add(args, scope).await,
            Verb::Search => self.search(args, scope).await,
            Verb::Profile => {
                let profile = self
                    .backend
                    .get_profile(&scope.to_user_scope(), args.query.as_deref())
                    .await?;
                Ok(json!({ "profile": profile }))
            }
            Verb::List => {
                let limit = positive(args.limit, DEFAULT_LIST_LIMIT)?;
                let kind = args.scope.unwrap_or_default();
                let options = ListOptions {
                    limit: Some(limit),
                    offset: None,
                    sector: args.sector,
                };
                let listed = self
                    .backend
                    .list_memories(&scope.for_kind(kind), &options)
                    .await?;
                Ok(json!({
                    "scope": kind,
                    "memories": listed.memories,
                    "total": listed.total.unwrap_or(listed.memories.len()),
                }))
            }
            Verb::Forget => {
                let id = required(&args.memory_id, "memory_id", verb)?;
                let kind = args.scope.unwrap_or_default();
                self.backend.delete_memory(id, &scope.for_kind(kind)).await?;
                Ok(json!({ "id": id, "message": format!("Memory {id} forgotten") }))
            }
            Verb::Reinforce => {
                let id = required(&args.memory_id, "memory_id", verb)?;
                let boost = args.boost.unwrap_or(DEFAULT_REINFORCE_BOOST);
                if !boost.is_finite() {
                    return Err(RecallError::Validation("boost must be a finite number".into()));
                }
                self.backend.reinforce_memory(id, boost).await?;
                Ok(json!({ "id": id, "boost": boost }))
            }
            Verb::Help => Ok(json!({ "help": HELP, "commands": Verb::VARIANTS })),
        }
    }

    async fn add(&self, args: &CommandArgs, scope: &ScopeContext) -> Result<Value, RecallError> {
        let content = required(&args.content, "content", Verb::Add)?;
        let content = self.gate.filter(content)?;
        let kind = args.scope.unwrap_or_default();
        let options = AddOptions {
            memory_type: args.memory_type.clone(),
            tags: args.tags.clone(),
            metadata: None,
        };
        let added = self
            .backend
            .add_memory(&content, &scope.for_kind(kind), &options)
            .await?;
        Ok(json!({
            "id": added.id,
            "sector": added.sector,
            "scope": kind,
            "message": "Memory added",
        }))
    }

    async fn search(&self, args: &CommandArgs, scope: &ScopeContext) -> Result<Value, RecallError> {
        let query = required(&args.query, "query", Verb::Search)?;
        let limit = positive(args.limit, DEFAULT_SEARCH_LIMIT)?;
        let options = SearchOptions {
            limit: Some(limit),
            min_salience: Some(self.min_salience),
            sector: args.sector,
        };

        let results = match args.scope {
            Some(kind) => {
                self.backend
                    .search_memories(query, &scope.for_kind(kind), &options)
                    .await?
                    .results
            }
            None if scope.project_id.is_none() => {
                self.backend
                    .search_memories(query, scope, &options)
                    .await?
                    .results
            }
            None => {
                let user_scope = scope.to_user_scope();
                let (user, project) = tokio::try_join!(
                    self.backend.search_memories(query, &user_scope, &options),
                    self.backend.search_memories(query, scope, &options),
                )?;
                merge_ranked(vec![user.results, project.results], limit)
            }
        };
        Ok(json!({ "results": results, "total": results.len() }))
    }
}
