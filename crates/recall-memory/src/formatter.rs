// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders retrieved memories into the block injected on a session's first turn.
//!
//! ```text
//! [MEMORY]
//!
//! ## User Profile
//! - prefers tabs
//!
//! ## Project Knowledge
//! - [sal: 70%] api lives in crates/server
//!
//! ## Relevant Memories
//! - [82%] [procedural] runs tests with nextest
//! ```
//!
//! Empty sections are omitted. When every section is empty the result is
//! the empty string, meaning "inject nothing".

use recall_config::model::MemoryConfig;
use recall_core::MemoryItem;

use crate::retriever::RetrievedContext;

/// First line of every non-empty context block.
pub const CONTEXT_MARKER: &str = "[MEMORY]";

fn percent(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// `[82%]` for relevance, `[sal: 40%]` for salience, nothing when unscored.
pub fn annotation(item: &MemoryItem) -> Option<String> {
    match (item.score, item.salience) {
        (Some(score), _) => Some(format!("[{}%]", percent(score))),
        (None, Some(salience)) => Some(format!("[sal: {}%]", percent(salience))),
        (None, None) => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContextFormatter {
    max_profile_items: usize,
    inject_profile: bool,
}

impl ContextFormatter {
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            max_profile_items: config.max_profile_items,
            inject_profile: config.inject_profile,
        }
    }

    pub fn format(&self, context: &RetrievedContext) -> String {
        let mut out = String::from(CONTEXT_MARKER);
        let empty_len = out.len();

        if self.inject_profile {
            section(
                &mut out,
                "User Profile",
                context
                    .profile
                    .static_facts
                    .iter()
                    .take(self.max_profile_items)
                    .cloned(),
            );
            section(
                &mut out,
                "Recent Context",
                context
                    .profile
                    .dynamic_facts
                    .iter()
                    .take(self.max_profile_items)
                    .cloned(),
            );
        }

        section(
            &mut out,
            "Project Knowledge",
            context.project_memories.iter().map(|item| line(item, false)),
        );
        section(
            &mut out,
            "Relevant Memories",
            context.user_memories.iter().map(|item| line(item, true)),
        );

        if out.len() == empty_len {
            return String::new();
        }
        out
    }
}

fn line(item: &MemoryItem, with_sector: bool) -> String {
    if item.content.trim().is_empty() {
        return String::new();
    }
    let mut parts = Vec::with_capacity(3);
    if let Some(note) = annotation(item) {
        parts.push(note);
    }
    if with_sector {
        parts.push(format!("[{}]", item.sector));
    }
    parts.push(item.content.clone());
    parts.join(" ")
}

fn section(out: &mut String, title: &str, lines: impl Iterator<Item = String>) {
    let mut lines = lines.filter(|l| !l.trim().is_empty()).peekable();
    if lines.peek().is_none() {
        return;
    }
    out.push_str(&format!("\n\n## {title}"));
    for l in lines {
        out.push_str(&format!("\n- {l}"));
    }
}
