// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Recall memory adapter.
//!
//! This crate provides the error taxonomy, the normalized memory data model,
//! and the traits every backend transport implements. Nothing here performs
//! I/O; the adapters live in `recall-backend`.

pub mod envelope;
pub mod error;
pub mod timestamp;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use envelope::CommandResult;
pub use error::RecallError;
pub use traits::{MemoryBackend, ToolCaller};
pub use types::{
    AddOptions, AddResponse, BackendKind, FactChange, FactDiff, FactQuery, FactStats,
    ListOptions, ListResponse, MemoryItem, NewFact, ProfileResult, ScopeContext, ScopeKind,
    SearchOptions, SearchResponse, Sector, TemporalFact,
};
