// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalized data model shared by all backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Owner partition of a memory: the user across projects, or one project.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    User,
    #[default]
    Project,
}

/// Hashed identity of the caller, recomputed per call.
///
/// `project_id == None` denotes user (cross-project) scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeContext {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl ScopeContext {
    /// A user-scope context (no project).
    pub fn user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: None,
        }
    }

    /// A project-scope context.
    pub fn project(user_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            project_id: Some(project_id.into()),
        }
    }

    /// The same identity narrowed to user scope.
    pub fn to_user_scope(&self) -> Self {
        Self::user(self.user_id.clone())
    }

    /// The scope selected by `kind`. Asking for project scope on a
    /// context without a project id yields user scope.
    pub fn for_kind(&self, kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::User => self.to_user_scope(),
            ScopeKind::Project => self.clone(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        if self.project_id.is_some() {
            ScopeKind::Project
        } else {
            ScopeKind::User
        }
    }
}

/// Semantic category of memory content.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Episodic,
    #[default]
    Semantic,
    Procedural,
    Emotional,
    Reflective,
}

impl Sector {
    /// Parse a backend-supplied sector name, falling back to `Semantic`.
    pub fn from_backend(name: Option<&str>) -> Self {
        name.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

/// Which transport served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum BackendKind {
    #[strum(serialize = "tool-call")]
    #[serde(rename = "tool-call")]
    ToolCall,
    #[strum(serialize = "rest")]
    #[serde(rename = "rest")]
    Rest,
}

/// A memory as every backend response is normalized into.
///
/// Missing numeric scores stay `None`; they are never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: String,
    pub content: String,
    /// Retrieval relevance for the current query (0.0-1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Long-term importance (0.0-1.0), independent of the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salience: Option<f64>,
    #[serde(default)]
    pub sector: Sector,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl MemoryItem {
    /// Most recent activity time: last seen, else updated, else created.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_seen_at.or(self.updated_at).or(self.created_at)
    }
}

/// Profile facts partitioned into stable and recent buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    #[serde(rename = "static")]
    pub static_facts: Vec<String>,
    #[serde(rename = "dynamic")]
    pub dynamic_facts: Vec<String>,
}

impl ProfileResult {
    pub fn is_empty(&self) -> bool {
        self.static_facts.is_empty() && self.dynamic_facts.is_empty()
    }
}

/// Options for `search_memories`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    pub min_salience: Option<f64>,
    pub sector: Option<Sector>,
}

/// Options for `add_memory`.
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Free-form memory type label (e.g. "preference", "decision").
    pub memory_type: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Options for `list_memories`.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub sector: Option<Sector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MemoryItem>,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<Sector>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListResponse {
    pub memories: Vec<MemoryItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

fn default_confidence() -> f64 {
    1.0
}

/// A subject/predicate/object statement with a validity interval.
///
/// At most one version per `(subject, predicate)` has `valid_to == None`
/// at any moment. Invalidation closes the interval; history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalFact {
    pub id: String,
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub valid_from: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "crate::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub valid_to: Option<DateTime<Utc>>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TemporalFact {
    /// True when the interval is still open.
    pub fn is_current(&self) -> bool {
        self.valid_to.is_none()
    }

    /// `valid_from <= at < valid_to` (or `valid_to` unset).
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_to.is_none_or(|end| at < end)
    }
}

/// Input for creating a fact version.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewFact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Filters for fact queries. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct FactQuery {
    pub subject: Option<String>,
    pub predicate: Option<String>,
    pub object: Option<String>,
    pub at: Option<DateTime<Utc>>,
    pub min_confidence: Option<f64>,
}

/// Same predicate, different object between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactChange {
    pub predicate: String,
    pub before: TemporalFact,
    pub after: TemporalFact,
}

/// Difference between the facts valid at two instants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FactDiff {
    pub added: Vec<TemporalFact>,
    pub removed: Vec<TemporalFact>,
    pub changed: Vec<FactChange>,
    pub unchanged: Vec<TemporalFact>,
}

/// Aggregate counts reported by the fact store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactStats {
    #[serde(default)]
    pub total_facts: u64,
    #[serde(default)]
    pub active_facts: u64,
    #[serde(default)]
    pub historical_facts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fact(valid_from: DateTime<Utc>, valid_to: Option<DateTime<Utc>>) -> TemporalFact {
        TemporalFact {
            id: "f1".into(),
            subject: "alice".into(),
            predicate: "works_at".into(),
            object: "Acme".into(),
            valid_from,
            valid_to,
            confidence: 1.0,
            metadata: None,
        }
    }

    #[test]
    fn sector_parsing_defaults_to_semantic() {
        assert_eq!(Sector::from_backend(Some("episodic")), Sector::Episodic);
        assert_eq!(Sector::from_backend(Some("Procedural")), Sector::Procedural);
        assert_eq!(Sector::from_backend(Some("unknown")), Sector::Semantic);
        assert_eq!(Sector::from_backend(None), Sector::Semantic);
        assert_eq!(Sector::Reflective.to_string(), "reflective");
    }

    #[test]
    fn scope_kind_follows_project_id() {
        let user = ScopeContext::user("u1");
        let project = ScopeContext::project("u1", "p1");
        assert_eq!(user.kind(), ScopeKind::User);
        assert_eq!(project.kind(), ScopeKind::Project);
        assert_eq!(project.to_user_scope(), user);
        assert_eq!(project.for_kind(ScopeKind::User), user);
        assert_eq!(project.for_kind(ScopeKind::Project), project);
    }

    #[test]
    fn backend_kind_display() {
        assert_eq!(BackendKind::ToolCall.to_string(), "tool-call");
        assert_eq!(BackendKind::Rest.to_string(), "rest");
    }

    #[test]
    fn validity_interval_is_half_open() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(10);
        let closed = fact(start, Some(end));
        assert!(closed.is_valid_at(start));
        assert!(closed.is_valid_at(end - Duration::seconds(1)));
        assert!(!closed.is_valid_at(end));
        assert!(!closed.is_valid_at(start - Duration::seconds(1)));

        let open = fact(start, None);
        assert!(open.is_current());
        assert!(open.is_valid_at(start + Duration::days(1000)));
    }

    #[test]
    fn temporal_fact_accepts_millis_and_defaults_confidence() {
        let json = serde_json::json!({
            "id": "f9",
            "subject": "alice",
            "predicate": "lives_in",
            "object": "Paris",
            "valid_from": 1_772_366_400_000_i64,
            "valid_to": null
        });
        let fact: TemporalFact = serde_json::from_value(json).unwrap();
        assert_eq!(fact.confidence, 1.0);
        assert!(fact.valid_to.is_none());
        assert_eq!(fact.valid_from.to_rfc3339(), "2026-03-01T12:00:00+00:00");
    }

    #[test]
    fn profile_result_serializes_static_and_dynamic() {
        let profile = ProfileResult {
            static_facts: vec!["prefers tabs".into()],
            dynamic_facts: vec![],
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["static"][0], "prefers tabs");
        assert!(json["dynamic"].as_array().unwrap().is_empty());
        assert!(!profile.is_empty());
        assert!(ProfileResult::default().is_empty());
    }

    #[test]
    fn memory_item_omits_absent_scores() {
        let item = MemoryItem {
            id: "m1".into(),
            content: "uses nix".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("score").is_none());
        assert!(json.get("salience").is_none());
        assert_eq!(json["sector"], "semantic");
    }
}
