// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval and command layer for Recall.
//!
//! Everything here talks to the memory store through
//! [`recall_core::MemoryBackend`], so any transport (or a mock) plugs in.
//!
//! - [`RetrievalOrchestrator`]: concurrent profile/search/list fan-out with
//!   per-slot failure isolation.
//! - [`ContextFormatter`]: renders retrieved memories into an injectable block.
//! - [`MemoryContext`]: first-turn injection, once per session.
//! - [`CommandRouter`]: the `add`/`search`/`profile`/`list`/`forget`/
//!   `reinforce`/`help` verbs behind one JSON envelope.

pub mod command;
pub mod formatter;
pub mod provider;
pub mod retriever;

pub use command::{CommandArgs, CommandRouter, Verb};
pub use formatter::{ContextFormatter, CONTEXT_MARKER};
pub use provider::MemoryContext;
pub use retriever::{RetrievalOrchestrator, RetrievedContext};
