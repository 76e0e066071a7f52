// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile partitioning: stable "static" facts versus recent "dynamic" ones.
//!
//! Two heuristics exist, one per transport:
//!
//! - **by age** (REST): created more than 7 days ago is static. Items
//!   without a creation time are dynamic.
//! - **by salience** (tool-call): salience >= 0.7 is static. The rest is
//!   dynamic, re-sorted most recently seen first.
//!
//! Both keep retrieval order within a bucket unless stated otherwise, cap
//! each bucket independently, and never put an item in both.

use chrono::{DateTime, Duration, Utc};
use recall_core::{MemoryItem, ProfileResult};

/// Probe used when the caller supplies no profile query.
pub const DEFAULT_PROFILE_QUERY: &str = "user preferences, coding style, and workflow";

/// Age beyond which a fact is considered stable.
pub const STATIC_AGE_DAYS: i64 = 7;

/// Salience at or above which a fact is considered stable.
pub const STATIC_SALIENCE: f64 = 0.7;

/// Retrieval size for a profile with `cap` items per bucket.
pub fn fetch_limit(cap: usize) -> usize {
    cap.saturating_mul(2).max(1)
}

fn contents<'a>(items: impl Iterator<Item = &'a MemoryItem>, cap: usize) -> Vec<String> {
    items
        .filter(|item| !item.content.is_empty())
        .take(cap)
        .map(|item| item.content.clone())
        .collect()
}

/// Partition by creation time relative to `now`.
pub fn partition_by_age(items: &[MemoryItem], now: DateTime<Utc>, cap: usize) -> ProfileResult {
    let boundary = now - Duration::days(STATIC_AGE_DAYS);
    let is_static = |item: &MemoryItem| item.created_at.is_some_and(|t| t < boundary);

    ProfileResult {
        static_facts: contents(items.iter().filter(|i| is_static(i)), cap),
        dynamic_facts: contents(items.iter().filter(|i| !is_static(i)), cap),
    }
}

/// Partition by backend-assigned salience.
pub fn partition_by_salience(items: &[MemoryItem], cap: usize) -> ProfileResult {
    let is_static = |item: &MemoryItem| item.salience.is_some_and(|s| s >= STATIC_SALIENCE);

    let mut recent: Vec<&MemoryItem> = items.iter().filter(|i| !is_static(i)).collect();
    // Stable: equal or missing timestamps keep retrieval order, missing sorts last.
    recent.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));

    ProfileResult {
        static_facts: contents(items.iter().filter(|i| is_static(i)), cap),
        dynamic_facts: contents(recent.into_iter(), cap),
    }
}
