// SPDX-FileCopyrightText: 2026 Recall Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Recall integration tests.
//!
//! Provides scriptable mocks for fast, deterministic tests without a live
//! memory store.
//!
//! # Components
//!
//! - [`MockToolCaller`] - RPC dispatcher with per-tool scripted replies
//! - [`MockBackend`] - `MemoryBackend` with per-scope scripted results and failures

pub mod mock_backend;
pub mod mock_caller;

pub use mock_backend::{MockBackend, RecordedAdd, RecordedSearch};
pub use mock_caller::MockToolCaller;
