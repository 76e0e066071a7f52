// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bitemporal fact operations over the REST transport.
//!
//! A fact is a `(subject, predicate, object)` triple valid over
//! `[valid_from, valid_to)`. Creating a fact never closes an earlier one
//! with the same subject and predicate; callers do that explicitly with
//! [`TemporalFactClient::invalidate_fact`]. History is never deleted.

use chrono::{DateTime, SecondsFormat, Utc};
use recall_core::{
    FactChange, FactDiff, FactQuery, FactStats, NewFact, RecallError, TemporalFact,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::http::RestTransport;

const FACT_PATH: [&str; 3] = ["api", "temporal", "fact"];

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn decode_facts(payload: &Value, key: &str) -> Result<Vec<TemporalFact>, RecallError> {
    let list = match payload {
        Value::Array(_) => payload.clone(),
        _ => payload.get(key).cloned().unwrap_or(Value::Array(Vec::new())),
    };
    Ok(serde_json::from_value(list)?)
}

/// Client for the temporal fact endpoints.
#[derive(Debug, Clone)]
pub struct TemporalFactClient {
    transport: RestTransport,
}

impl TemporalFactClient {
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }

    /// Store a new fact version.
    pub async fn create_fact(&self, fact: &NewFact) -> Result<TemporalFact, RecallError> {
        for (name, value) in [
            ("subject", &fact.subject),
            ("predicate", &fact.predicate),
            ("object", &fact.object),
        ] {
            if value.trim().is_empty() {
                return Err(RecallError::Validation(format!("fact {name} is required")));
            }
        }
        if let Some(confidence) = fact.confidence
            && !(0.0..=1.0).contains(&confidence)
        {
            return Err(RecallError::Validation(format!(
                "confidence must be between 0.0 and 1.0, got {confidence}"
            )));
        }

        let mut body = serde_json::to_value(fact)?;
        if let Some(valid_from) = fact.valid_from {
            body["valid_from"] = json!(rfc3339(valid_from));
        }
        let payload = self.transport.post(&FACT_PATH, &body).await?;

        // Stores may echo the full fact or only its id.
        let created = payload.get("fact").unwrap_or(&payload);
        if created.get("subject").is_some() {
            return Ok(serde_json::from_value(created.clone())?);
        }
        let id = created
            .get("id")
            .and_then(|v| v.as_str().map(String::from).or_else(|| v.as_i64().map(|n| n.to_string())))
            .ok_or_else(|| RecallError::Decode("fact create response carries no id".into()))?;
        Ok(TemporalFact {
            id,
            subject: fact.subject.clone(),
            predicate: fact.predicate.clone(),
            object: fact.object.clone(),
            valid_from: fact.valid_from.unwrap_or_else(Utc::now),
            valid_to: None,
            confidence: fact.confidence.unwrap_or(1.0),
            metadata: fact.metadata.clone(),
        })
    }

    /// Every fact version matching `filter`.
    ///
    /// With `at` set only versions valid at that instant are returned. The
    /// interval is re-checked locally so a lenient store cannot widen it.
    pub async fn query_facts(&self, filter: &FactQuery) -> Result<Vec<TemporalFact>, RecallError> {
        let mut query = Vec::new();
        if let Some(subject) = &filter.subject {
            query.push(("subject", subject.clone()));
        }
        if let Some(predicate) = &filter.predicate {
            query.push(("predicate", predicate.clone()));
        }
        if let Some(object) = &filter.object {
            query.push(("object", object.clone()));
        }
        if let Some(at) = filter.at {
            query.push(("at", rfc3339(at)));
        }
        if let Some(min) = filter.min_confidence {
            query.push(("min_confidence", min.to_string()));
        }

        let payload = self.transport.get(&FACT_PATH, &query).await?;
        let mut facts = decode_facts(&payload, "facts")?;
        if let Some(at) = filter.at {
            facts.retain(|f| f.is_valid_at(at));
        }
        if let Some(min) = filter.min_confidence {
            facts.retain(|f| f.confidence >= min);
        }
        debug!(count = facts.len(), "fact query complete");
        Ok(facts)
    }

    /// The open-ended version for `(subject, predicate)`, if one exists.
    pub async fn get_current_fact(
        &self,
        subject: &str,
        predicate: &str,
    ) -> Result<Option<TemporalFact>, RecallError> {
        let query = [
            ("subject", subject.to_string()),
            ("predicate", predicate.to_string()),
        ];
        let path = ["api", "temporal", "fact", "current"];
        let Some(payload) = self.transport.get_optional(&path, &query).await? else {
            return Ok(None);
        };
        let fact = match payload.get("fact") {
            Some(inner) => inner,
            None if payload.get("subject").is_some() => &payload,
            None => return Ok(None),
        };
        if fact.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(fact.clone())?))
    }

    /// All versions of a relation, oldest first.
    pub async fn get_timeline(
        &self,
        subject: &str,
        predicate: Option<&str>,
    ) -> Result<Vec<TemporalFact>, RecallError> {
        let mut query = vec![("subject", subject.to_string())];
        if let Some(predicate) = predicate {
            query.push(("predicate", predicate.to_string()));
        }
        let payload = self
            .transport
            .get(&["api", "temporal", "timeline"], &query)
            .await?;
        let mut timeline = decode_facts(&payload, "timeline")?;
        timeline.sort_by(|a, b| {
            a.valid_from
                .cmp(&b.valid_from)
                .then_with(|| a.predicate.cmp(&b.predicate))
        });
        Ok(timeline)
    }

    /// Close a fact's validity interval at `valid_to`, or now.
    pub async fn invalidate_fact(
        &self,
        id: &str,
        valid_to: Option<DateTime<Utc>>,
    ) -> Result<DateTime<Utc>, RecallError> {
        if id.trim().is_empty() {
            return Err(RecallError::Validation("fact id is required".into()));
        }
        let valid_to = valid_to.unwrap_or_else(Utc::now);
        self.transport
            .patch(
                &["api", "temporal", "fact", id],
                &json!({ "valid_to": rfc3339(valid_to) }),
            )
            .await?;
        Ok(valid_to)
    }

    pub async fn get_stats(&self) -> Result<FactStats, RecallError> {
        let payload = self
            .transport
            .get(&["api", "temporal", "stats"], &[])
            .await?;
        let stats = payload.get("stats").unwrap_or(&payload);
        Ok(serde_json::from_value(stats.clone())?)
    }

    /// Diff the facts about `subject` valid at `t1` against those valid at `t2`.
    pub async fn compare_facts(
        &self,
        subject: &str,
        t1: DateTime<Utc>,
        t2: DateTime<Utc>,
    ) -> Result<FactDiff, RecallError> {
        let snapshot = |at| FactQuery {
            subject: Some(subject.to_string()),
            at: Some(at),
            ..Default::default()
        };
        let (q1, q2) = (snapshot(t1), snapshot(t2));
        let (before, after) = tokio::try_join!(self.query_facts(&q1), self.query_facts(&q2))?;
        Ok(diff_snapshots(&before, &after))
    }
}

/// Categorize two point-in-time snapshots.
///
/// A fact in `after` whose predicate and object both appear in `before` is
/// unchanged. Otherwise, if `before` holds an unmatched fact with the same
/// predicate, the pair is a change; else the fact was added. Whatever is
/// left unmatched in `before` was removed. Diffing a snapshot against itself
/// yields only unchanged facts.
pub fn diff_snapshots(before: &[TemporalFact], after: &[TemporalFact]) -> FactDiff {
    let mut used = vec![false; before.len()];
    let mut diff = FactDiff::default();

    let mut pending = Vec::new();
    for fact in after {
        let same = (0..before.len()).find(|&i| {
            !used[i] && before[i].predicate == fact.predicate && before[i].object == fact.object
        });
        match same {
            Some(i) => {
                used[i] = true;
                diff.unchanged.push(fact.clone());
            }
            None => pending.push(fact),
        }
    }

    for fact in pending {
        let prior = (0..before.len()).find(|&i| !used[i] && before[i].predicate == fact.predicate);
        match prior {
            Some(i) => {
                used[i] = true;
                diff.changed.push(FactChange {
                    predicate: fact.predicate.clone(),
                    before: before[i].clone(),
                    after: fact.clone(),
                });
            }
            None => diff.added.push(fact.clone()),
        }
    }

    diff.removed = before
        .iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|(fact, _)| fact.clone())
        .collect();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fact(id: &str, predicate: &str, object: &str) -> TemporalFact {
        TemporalFact {
            id: id.into(),
            subject: "alice".into(),
            predicate: predicate.into(),
            object: object.into(),
            valid_from: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            valid_to: None,
            confidence: 1.0,
            metadata: None,
        }
    }

    #[test]
    fn snapshot_against_itself_is_all_unchanged() {
        let snapshot = vec![
            fact("1", "works_at", "Acme"),
            fact("2", "lives_in", "Paris"),
        ];
        let diff = diff_snapshots(&snapshot, &snapshot);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert!(diff.changed.is_empty());
        assert_eq!(diff.unchanged, snapshot);
    }

    #[test]
    fn categorizes_added_removed_changed() {
        let before = vec![
            fact("1", "works_at", "Acme"),
            fact("2", "lives_in", "Paris"),
            fact("3", "owns", "bike"),
        ];
        let after = vec![
            fact("4", "works_at", "Globex"),
            fact("2", "lives_in", "Paris"),
            fact("5", "speaks", "French"),
        ];
        let diff = diff_snapshots(&before, &after);

        assert_eq!(diff.changed.len(), 1);
        assert_eq!(diff.changed[0].predicate, "works_at");
        assert_eq!(diff.changed[0].before.object, "Acme");
        assert_eq!(diff.changed[0].after.object, "Globex");
        assert_eq!(diff.unchanged.len(), 1);
        assert_eq!(diff.unchanged[0].object, "Paris");
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].predicate, "speaks");
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].predicate, "owns");
    }

    #[test]
    fn empty_snapshots() {
        let diff = diff_snapshots(&[], &[fact("1", "works_at", "Acme")]);
        assert_eq!(diff.added.len(), 1);
        let diff = diff_snapshots(&[fact("1", "works_at", "Acme")], &[]);
        assert_eq!(diff.removed.len(), 1);
    }
}
